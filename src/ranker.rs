//! # Recipe Ranker Module
//!
//! Answers "what can I cook with these ingredients?" by scoring every recipe
//! on the share of its linked ingredients present in the caller's selection.
//!
//! Results are ordered by match percentage (descending), then by number of
//! matching ingredients (descending), then by recipe id (ascending).
//!
//! ## Usage
//!
//! ```rust
//! use recipe_lexicon::ingredient_model::{Locale, RecipeIngredientLink};
//! use recipe_lexicon::ranker::rank;
//! use std::collections::HashSet;
//!
//! let links = vec![
//!     RecipeIngredientLink::new(1, 10, Locale::Fr),
//!     RecipeIngredientLink::new(1, 11, Locale::Fr),
//!     RecipeIngredientLink::new(2, 12, Locale::Fr),
//! ];
//! let selected: HashSet<i64> = [10].into_iter().collect();
//!
//! let results = rank(&selected, &links);
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].recipe_id, 1);
//! assert_eq!(results[0].match_percentage, 50);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

use crate::ingredient_model::{
    CanonicalIngredient, IngredientId, MatchResult, RecipeId, RecipeIngredientLink,
};
use crate::text_processing::slugify;

/// Post-sort filters for a ranking query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankOptions {
    /// Results below this percentage are dropped
    pub min_match_percentage: u32,
    /// Maximum number of results, `None` for all
    pub limit: Option<usize>,
}

/// Rank recipes by ingredient overlap with `selected`
///
/// Recipes with no matching ingredient are omitted. An empty selection or an
/// empty link table gives an empty list. Duplicate links count once.
pub fn rank(selected: &HashSet<IngredientId>, links: &[RecipeIngredientLink]) -> Vec<MatchResult> {
    if selected.is_empty() || links.is_empty() {
        return Vec::new();
    }

    let mut by_recipe: BTreeMap<RecipeId, HashSet<IngredientId>> = BTreeMap::new();
    for link in links {
        by_recipe
            .entry(link.recipe_id)
            .or_default()
            .insert(link.ingredient_id);
    }

    let mut results: Vec<MatchResult> = by_recipe
        .into_iter()
        .filter_map(|(recipe_id, linked)| {
            let matching = linked.intersection(selected).count();
            if matching == 0 {
                return None;
            }
            match (u32::try_from(matching), u32::try_from(linked.len())) {
                (Ok(matching), Ok(total)) => MatchResult::new(recipe_id, matching, total),
                _ => {
                    warn!(recipe_id, links = linked.len(), "Recipe has too many links to rank, skipping");
                    None
                }
            }
        })
        .collect();

    results.sort_by(|a, b| {
        b.match_percentage
            .cmp(&a.match_percentage)
            .then(b.matching_ingredients.cmp(&a.matching_ingredients))
            .then(a.recipe_id.cmp(&b.recipe_id))
    });

    debug!(
        selected = selected.len(),
        links = links.len(),
        results = results.len(),
        "Ranked recipes by ingredient overlap"
    );
    results
}

/// Rank and then apply the minimum percentage and the limit
pub fn rank_with_options(
    selected: &HashSet<IngredientId>,
    links: &[RecipeIngredientLink],
    options: &RankOptions,
) -> Vec<MatchResult> {
    rank(selected, links)
        .into_iter()
        .filter(|result| result.match_percentage >= options.min_match_percentage)
        .take(options.limit.unwrap_or(usize::MAX))
        .collect()
}

/// Resolve caller-supplied ingredient names to ids by slug
///
/// Names are compared through [`slugify`], so case and accents do not matter.
/// Unknown names are ignored.
pub fn select_by_slugs<S: AsRef<str>>(
    names: &[S],
    ingredients: &[CanonicalIngredient],
) -> HashSet<IngredientId> {
    let wanted: HashSet<String> = names.iter().map(|n| slugify(n.as_ref())).collect();
    ingredients
        .iter()
        .filter(|ingredient| wanted.contains(&ingredient.slug))
        .map(|ingredient| ingredient.id)
        .collect()
}
