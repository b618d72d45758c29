//! # Recipe Lexicon
//!
//! Ingredient lexicon and recipe-matching engine: parses free-form ingredient
//! lines, detects canonical ingredients in French and English recipe text,
//! links recipes to canonical ingredients and ranks recipes by how many of
//! their ingredients the user already has.

pub mod config;
pub mod db;
pub mod errors;
pub mod ingredient_model;
pub mod ingredient_parser;
pub mod lexicon;
pub mod linkage;
pub mod ranker;
pub mod text_processing;
pub mod unit_patterns;

pub use errors::{LexiconError, LexiconResult};
pub use ingredient_model::{
    CanonicalIngredient, IngredientGroup, Locale, MatchResult, ParsedIngredientLine,
    RecipeIngredientLink, RecipeText,
};
pub use ingredient_parser::parse;
pub use lexicon::{detect, DedupPolicy, LexiconMatcher, Vocabulary};
pub use linkage::{IngredientStore, LinkReport, LinkageJob, MemoryStore};
pub use ranker::{rank, rank_with_options, RankOptions};
