//! # Recipe Parser Example
//!
//! Parses a French ingredient block into groups of structured lines, then
//! detects the canonical ingredients the same text mentions.
//!
//! Run with `cargo run --example recipe_parser`.

use recipe_lexicon::ingredient_model::Locale;
use recipe_lexicon::ingredient_parser::{parse, parse_ingredient_block};
use recipe_lexicon::lexicon::{DedupPolicy, LexiconMatcher};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🍳 Recipe Ingredient Parser Example");
    println!("===================================\n");

    let block = r#"
    Pâte :
    - 250 g de farine (tamisée)
    - 125 g de beurre
    - 1 pincée de sel
    - 2 à 3 c. à soupe d'eau froide

    Garniture :
    - 3 œufs
    - 20 cl de crème fraîche
    - 200 g de lardons
    - poivre
    "#;

    println!("📖 Example 1: Grouped ingredient block");
    println!("--------------------------------------");
    for group in parse_ingredient_block(block) {
        println!("{}", group.title.as_deref().unwrap_or("(untitled)"));
        for line in &group.items {
            println!(
                "  qty={:<6} unit={:<12} name={:<18} note={}",
                line.quantity.as_deref().unwrap_or("-"),
                line.unit.as_deref().unwrap_or("-"),
                line.name,
                line.note.as_deref().unwrap_or("-"),
            );
        }
    }

    println!("\n🔁 Example 2: Normalized re-serialization");
    println!("-----------------------------------------");
    for raw in ["1½ tasse de lait", "2 cups flour", "sel et poivre (au goût)"] {
        let parsed = parse(raw);
        println!("  {:<26} → {}", raw, parsed);
    }

    println!("\n🔎 Example 3: Canonical ingredients");
    println!("-----------------------------------");
    let matcher = LexiconMatcher::builtin(Locale::Fr, DedupPolicy::KeepAll)?;
    for term in matcher.detect(block) {
        println!("  • {}", term);
    }

    let longest = LexiconMatcher::builtin(Locale::Fr, DedupPolicy::PreferLongest)?;
    println!(
        "\n  with prefer-longest: {:?}",
        longest.detect("20 cl de crème fraîche")
    );

    Ok(())
}
