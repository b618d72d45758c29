//! # Linkage Module
//!
//! Batch job that scans recipe ingredient text, detects canonical ingredients
//! and records recipe ↔ ingredient links through an [`IngredientStore`].
//!
//! Canonical ingredients are created lazily the first time a term is seen and
//! are keyed by slug, so the same ingredient found in several recipes or
//! locales maps to one entry. Links are unique per (recipe, ingredient): running
//! the job twice over the same recipes creates nothing new the second time.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::errors::LexiconResult;
use crate::ingredient_model::{
    CanonicalIngredient, IngredientId, Locale, RecipeId, RecipeIngredientLink, RecipeText,
};
use crate::lexicon::{DedupPolicy, LexiconMatcher};
use crate::text_processing::slugify;

/// Persistence boundary for canonical ingredients and recipe links
#[async_trait]
pub trait IngredientStore: Send + Sync {
    /// Return the ingredient with this slug, creating it when missing
    ///
    /// The boolean is `true` when the ingredient was created by this call.
    async fn find_or_create_ingredient(
        &self,
        slug: &str,
        name: &str,
        locale: Locale,
    ) -> LexiconResult<(CanonicalIngredient, bool)>;

    /// Insert a link unless the (recipe, ingredient) pair already exists
    ///
    /// Returns `true` when a new link was inserted.
    async fn link_recipe_ingredient(&self, link: &RecipeIngredientLink) -> LexiconResult<bool>;

    /// Snapshot of all canonical ingredients
    async fn ingredients(&self) -> LexiconResult<Vec<CanonicalIngredient>>;

    /// Snapshot of the link table
    async fn links(&self) -> LexiconResult<Vec<RecipeIngredientLink>>;
}

#[derive(Debug, Default)]
struct MemoryState {
    ingredients: Vec<CanonicalIngredient>,
    by_slug: HashMap<String, usize>,
    link_keys: HashSet<(RecipeId, IngredientId)>,
    links: Vec<RecipeIngredientLink>,
}

/// In-memory [`IngredientStore`] with the same uniqueness rules as the database
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IngredientStore for MemoryStore {
    async fn find_or_create_ingredient(
        &self,
        slug: &str,
        name: &str,
        locale: Locale,
    ) -> LexiconResult<(CanonicalIngredient, bool)> {
        let mut state = self.state.lock().await;
        if let Some(&index) = state.by_slug.get(slug) {
            return Ok((state.ingredients[index].clone(), false));
        }

        let ingredient = CanonicalIngredient {
            id: state.ingredients.len() as IngredientId + 1,
            slug: slug.to_string(),
            name: name.to_string(),
            locale,
            created_at: chrono::Utc::now(),
        };
        let index = state.ingredients.len();
        state.ingredients.push(ingredient.clone());
        state.by_slug.insert(slug.to_string(), index);
        Ok((ingredient, true))
    }

    async fn link_recipe_ingredient(&self, link: &RecipeIngredientLink) -> LexiconResult<bool> {
        let mut state = self.state.lock().await;
        if !state.link_keys.insert((link.recipe_id, link.ingredient_id)) {
            return Ok(false);
        }
        state.links.push(link.clone());
        Ok(true)
    }

    async fn ingredients(&self) -> LexiconResult<Vec<CanonicalIngredient>> {
        Ok(self.state.lock().await.ingredients.clone())
    }

    async fn links(&self) -> LexiconResult<Vec<RecipeIngredientLink>> {
        Ok(self.state.lock().await.links.clone())
    }
}

/// What linking a single recipe did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeLinkSummary {
    pub recipe_id: RecipeId,
    /// Canonical terms detected in the recipe text
    pub terms: BTreeSet<String>,
    pub ingredients_created: usize,
    pub links_created: usize,
    pub links_existing: usize,
}

/// Totals for a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkReport {
    pub recipes_processed: usize,
    pub recipes_skipped: usize,
    pub recipes_failed: usize,
    pub ingredients_created: usize,
    pub links_created: usize,
    pub links_existing: usize,
}

impl LinkReport {
    fn record(&mut self, summary: &RecipeLinkSummary) {
        self.recipes_processed += 1;
        self.ingredients_created += summary.ingredients_created;
        self.links_created += summary.links_created;
        self.links_existing += summary.links_existing;
    }
}

/// Detects canonical ingredients in recipe texts and persists the links
pub struct LinkageJob<S> {
    store: S,
    matchers: BTreeMap<Locale, LexiconMatcher>,
}

impl<S: IngredientStore> LinkageJob<S> {
    /// Create a job with no matchers; add one per locale with [`LinkageJob::with_matcher`]
    pub fn new(store: S) -> Self {
        Self {
            store,
            matchers: BTreeMap::new(),
        }
    }

    /// Create a job using the built-in vocabulary of every locale
    pub fn with_builtin_vocabularies(store: S, policy: DedupPolicy) -> LexiconResult<Self> {
        let mut job = Self::new(store);
        for locale in Locale::ALL {
            job = job.with_matcher(locale, LexiconMatcher::builtin(locale, policy)?);
        }
        Ok(job)
    }

    pub fn with_matcher(mut self, locale: Locale, matcher: LexiconMatcher) -> Self {
        self.matchers.insert(locale, matcher);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Link one recipe
    ///
    /// Returns `Ok(None)` when no matcher is registered for the recipe's locale.
    pub async fn link_recipe(&self, recipe: &RecipeText) -> LexiconResult<Option<RecipeLinkSummary>> {
        let Some(matcher) = self.matchers.get(&recipe.locale) else {
            warn!(
                recipe_id = recipe.recipe_id,
                locale = %recipe.locale,
                "No vocabulary for recipe locale, skipping"
            );
            return Ok(None);
        };

        let terms = matcher.detect(&recipe.ingredients_text);
        let mut summary = RecipeLinkSummary {
            recipe_id: recipe.recipe_id,
            ..Default::default()
        };

        for term in &terms {
            let slug = slugify(term);
            if slug.is_empty() {
                warn!(term = %term, "Detected term has an empty slug, ignoring");
                continue;
            }

            let (ingredient, created) = self
                .store
                .find_or_create_ingredient(&slug, term, recipe.locale)
                .await?;
            if created {
                debug!(slug = %ingredient.slug, id = ingredient.id, "Created canonical ingredient");
                summary.ingredients_created += 1;
            }

            let link = RecipeIngredientLink::new(recipe.recipe_id, ingredient.id, recipe.locale);
            if self.store.link_recipe_ingredient(&link).await? {
                summary.links_created += 1;
            } else {
                summary.links_existing += 1;
            }
        }

        debug!(
            recipe_id = recipe.recipe_id,
            terms = terms.len(),
            links_created = summary.links_created,
            "Linked recipe ingredients"
        );
        summary.terms = terms;
        Ok(Some(summary))
    }

    /// Link every recipe, continuing past per-recipe failures
    pub async fn run(&self, recipes: &[RecipeText]) -> LinkReport {
        info!(recipes = recipes.len(), "Starting ingredient linkage run");
        let mut report = LinkReport::default();

        for recipe in recipes {
            match self.link_recipe(recipe).await {
                Ok(Some(summary)) => report.record(&summary),
                Ok(None) => report.recipes_skipped += 1,
                Err(e) => {
                    error!(recipe_id = recipe.recipe_id, error = %e, "Failed to link recipe");
                    report.recipes_failed += 1;
                }
            }
        }

        info!(
            processed = report.recipes_processed,
            skipped = report.recipes_skipped,
            failed = report.recipes_failed,
            ingredients_created = report.ingredients_created,
            links_created = report.links_created,
            "Ingredient linkage run finished"
        );
        report
    }
}
