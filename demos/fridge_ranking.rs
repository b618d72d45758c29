//! # Fridge Ranking Example
//!
//! Links a handful of recipes to canonical ingredients in memory, then ranks
//! them against what is in the fridge.
//!
//! Run with `cargo run --example fridge_ranking`.

use recipe_lexicon::ingredient_model::{Locale, RecipeText};
use recipe_lexicon::lexicon::DedupPolicy;
use recipe_lexicon::linkage::{IngredientStore, LinkageJob, MemoryStore};
use recipe_lexicon::ranker::{rank, select_by_slugs};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧊 What can I cook?");
    println!("===================\n");

    let recipes = vec![
        RecipeText::new(1, Locale::Fr, "250 g de farine\n3 œufs\n50 cl de lait\n1 pincée de sel"),
        RecipeText::new(2, Locale::Fr, "4 œufs\n20 g de beurre\nsel, poivre"),
        RecipeText::new(3, Locale::Fr, "500 g de pâtes\n200 g de lardons\n3 jaunes d'œufs\nparmesan"),
        RecipeText::new(4, Locale::En, "2 cups flour\n1 cup sugar\n2 eggs\n1 cup butter"),
    ];

    let job = LinkageJob::with_builtin_vocabularies(MemoryStore::new(), DedupPolicy::KeepAll)?;
    let report = job.run(&recipes).await;
    println!(
        "Linked {} recipes: {} canonical ingredients, {} links\n",
        report.recipes_processed, report.ingredients_created, report.links_created
    );

    let fridge = ["œuf", "beurre", "sel", "lait"];
    let ingredients = job.store().ingredients().await?;
    let selected = select_by_slugs(&fridge, &ingredients);

    println!("Fridge: {}", fridge.join(", "));
    for result in rank(&selected, &job.store().links().await?) {
        println!(
            "  recipe #{:<3} {:>3}%  ({}/{})",
            result.recipe_id,
            result.match_percentage,
            result.matching_ingredients,
            result.total_ingredients
        );
    }

    Ok(())
}
