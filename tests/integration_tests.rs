//! # Integration Tests
//!
//! End-to-end checks across the parser, the lexicon matcher, the linkage job
//! and the ranker, using the in-memory store.

use async_trait::async_trait;
use recipe_lexicon::errors::{LexiconError, LexiconResult};
use recipe_lexicon::ingredient_model::{
    CanonicalIngredient, Locale, ParsedIngredientLine, RecipeIngredientLink, RecipeText,
};
use recipe_lexicon::ingredient_parser::{parse, parse_ingredient_block, parse_lines};
use recipe_lexicon::lexicon::{DedupPolicy, LexiconMatcher};
use recipe_lexicon::linkage::{IngredientStore, LinkageJob, MemoryStore};
use recipe_lexicon::ranker::{rank, select_by_slugs};

#[test]
fn test_parse_recipe_card() {
    let card = r#"
    Recette de Crêpes

    Ingrédients:
    125 g de farine
    2 œufs
    1/2 litre de lait
    2 cuillères à soupe de sucre
    1 pincée de sel
    50 g de beurre fondu (ou margarine)
    pincée de muscade
    "#;

    let groups = parse_ingredient_block(card);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].title, None);
    assert_eq!(groups[0].items, vec![ParsedIngredientLine::new("Recette de Crêpes")]);
    assert_eq!(groups[1].title.as_deref(), Some("Ingrédients"));

    let items = &groups[1].items;
    assert_eq!(items.len(), 7);
    assert_eq!(items[0], ParsedIngredientLine::new("farine").with_quantity("125").with_unit("g"));
    assert_eq!(items[1], ParsedIngredientLine::new("œufs").with_quantity("2"));
    assert_eq!(items[2], ParsedIngredientLine::new("lait").with_quantity("1/2").with_unit("litre"));
    assert_eq!(
        items[3],
        ParsedIngredientLine::new("sucre")
            .with_quantity("2")
            .with_unit("cuillères à soupe")
    );
    assert_eq!(items[4], ParsedIngredientLine::new("sel").with_quantity("1").with_unit("pincée"));
    assert_eq!(
        items[5],
        ParsedIngredientLine::new("beurre fondu")
            .with_quantity("50")
            .with_unit("g")
            .with_note("ou margarine")
    );
    assert_eq!(items[6], ParsedIngredientLine::new("muscade").with_unit("pincée"));
}

#[test]
fn test_parse_is_total() {
    let inputs = vec![
        "",
        "   ",
        "()",
        "(",
        ")",
        "2",
        "2 g",
        "de",
        "½",
        "1 - 2",
        "🍅🍅🍅",
        "((nested) note)",
        "250 g de (tamisée)",
    ];

    for input in inputs {
        let parsed = parse(input);
        if !input.trim().is_empty() {
            assert!(!parsed.name.is_empty(), "empty name for '{}'", input);
        }
    }
}

#[test]
fn test_reparsing_display_is_stable() {
    let lines = vec![
        "250 g de farine tout usage (tamisée)",
        "2 1/2 cups of milk",
        "1 to 2 tbsp sugar",
        "2 à 3 c. à soupe d'eau froide",
        "3 œufs",
        "gousse d'ail (hachée)",
        "pinch of salt",
        "sel et poivre (au goût)",
        "(facultatif)",
        "2",
    ];

    for line in lines {
        let first = parse(line);
        let second = parse(&first.to_string());
        assert_eq!(first, second, "re-parsing '{}' changed the result", line);
    }
}

#[test]
fn test_parse_lines_skips_blanks_and_bullets() {
    let parsed = parse_lines("- 2 eggs\n\n• 1 cup sugar\n* salt");
    let names: Vec<&str> = parsed.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["eggs", "sugar", "salt"]);
}

fn crepes_and_omelette() -> Vec<RecipeText> {
    vec![
        RecipeText::new(1, Locale::Fr, "125 g de farine\n2 œufs\n1/2 litre de lait\n1 pincée de sel"),
        RecipeText::new(2, Locale::Fr, "3 oeufs\n20 g de beurre\nsel, poivre"),
        RecipeText::new(3, Locale::En, "2 cups flour\n1 cup sugar\n2 eggs"),
    ]
}

#[tokio::test]
async fn test_link_then_rank() {
    let job = LinkageJob::with_builtin_vocabularies(MemoryStore::new(), DedupPolicy::KeepAll).unwrap();
    let report = job.run(&crepes_and_omelette()).await;

    assert_eq!(report.recipes_processed, 3);
    assert_eq!(report.recipes_failed, 0);
    // farine, oeuf, lait, sel | beurre, poivre | flour, sugar, egg
    assert_eq!(report.ingredients_created, 9);
    assert_eq!(report.links_created, 11);

    let ingredients = job.store().ingredients().await.unwrap();
    let selected = select_by_slugs(&["œuf", "sel", "poivre", "beurre"], &ingredients);
    assert_eq!(selected.len(), 4);

    let results = rank(&selected, &job.store().links().await.unwrap());
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].recipe_id, 2);
    assert_eq!(results[0].match_percentage, 100);
    assert_eq!(results[1].recipe_id, 1);
    assert_eq!(results[1].matching_ingredients, 2);
    assert_eq!(results[1].total_ingredients, 4);
    assert_eq!(results[1].match_percentage, 50);
}

#[tokio::test]
async fn test_linkage_is_idempotent() {
    let job = LinkageJob::with_builtin_vocabularies(MemoryStore::new(), DedupPolicy::KeepAll).unwrap();
    let recipes = crepes_and_omelette();

    job.run(&recipes).await;
    let ingredients_before = job.store().ingredients().await.unwrap();
    let links_before = job.store().links().await.unwrap();

    let second = job.run(&recipes).await;
    assert_eq!(second.ingredients_created, 0);
    assert_eq!(second.links_created, 0);
    assert_eq!(second.links_existing, links_before.len());

    assert_eq!(job.store().ingredients().await.unwrap(), ingredients_before);
    assert_eq!(job.store().links().await.unwrap(), links_before);
}

/// Store that refuses to create one slug
struct FailingStore {
    inner: MemoryStore,
    failing_slug: &'static str,
}

#[async_trait]
impl IngredientStore for FailingStore {
    async fn find_or_create_ingredient(
        &self,
        slug: &str,
        name: &str,
        locale: Locale,
    ) -> LexiconResult<(CanonicalIngredient, bool)> {
        if slug == self.failing_slug {
            return Err(LexiconError::Store(format!("cannot store '{}'", slug)));
        }
        self.inner.find_or_create_ingredient(slug, name, locale).await
    }

    async fn link_recipe_ingredient(&self, link: &RecipeIngredientLink) -> LexiconResult<bool> {
        self.inner.link_recipe_ingredient(link).await
    }

    async fn ingredients(&self) -> LexiconResult<Vec<CanonicalIngredient>> {
        self.inner.ingredients().await
    }

    async fn links(&self) -> LexiconResult<Vec<RecipeIngredientLink>> {
        self.inner.links().await
    }
}

#[tokio::test]
async fn test_run_continues_after_store_failure() {
    let store = FailingStore {
        inner: MemoryStore::new(),
        failing_slug: "sucre",
    };
    let matcher = LexiconMatcher::new(&["farine", "sucre", "œuf"], DedupPolicy::KeepAll).unwrap();
    let job = LinkageJob::new(store).with_matcher(Locale::Fr, matcher);

    let recipes = vec![
        RecipeText::new(1, Locale::Fr, "250 g de farine"),
        RecipeText::new(2, Locale::Fr, "100 g de sucre"),
        RecipeText::new(3, Locale::Fr, "2 œufs"),
        RecipeText::new(4, Locale::En, "2 eggs"),
    ];

    let report = job.run(&recipes).await;
    assert_eq!(report.recipes_processed, 2);
    assert_eq!(report.recipes_failed, 1);
    assert_eq!(report.recipes_skipped, 1);

    let linked: Vec<i64> = job
        .store()
        .links()
        .await
        .unwrap()
        .iter()
        .map(|link| link.recipe_id)
        .collect();
    assert_eq!(linked, vec![1, 3]);
}
