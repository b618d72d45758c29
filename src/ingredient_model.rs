//! # Ingredient Data Model
//!
//! Data structures shared by the parser, the lexicon matcher and the ranker.
//!
//! ## Core Concepts
//!
//! - **ParsedIngredientLine**: one free-text ingredient line split into quantity, unit, name and note
//! - **IngredientGroup**: a titled block of parsed lines ("Pour la pâte :", "For the sauce:")
//! - **CanonicalIngredient**: the de-duplicated identity of an ingredient, keyed by slug
//! - **RecipeIngredientLink**: a recipe ↔ canonical ingredient association
//! - **MatchResult**: one ranked recipe for a "what can I cook" query
//!
//! ## Usage
//!
//! ```rust
//! use recipe_lexicon::ingredient_model::ParsedIngredientLine;
//!
//! let line = ParsedIngredientLine::new("farine tout usage")
//!     .with_quantity("250")
//!     .with_unit("g")
//!     .with_note("tamisée");
//!
//! assert_eq!(line.to_string(), "250 g farine tout usage (tamisée)");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::LexiconError;
use crate::unit_patterns::{classify_unit, UnitKind};

/// Identifier of a recipe in the external content store
pub type RecipeId = i64;

/// Identifier of a canonical ingredient in the external content store
pub type IngredientId = i64;

/// Content locale of a recipe text or vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Fr,
    En,
}

impl Locale {
    /// All supported locales, in canonical order
    pub const ALL: [Locale; 2] = [Locale::Fr, Locale::En];

    /// Two-letter language code
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Fr => "fr",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = LexiconError;

    /// Accepts plain codes and region-tagged ones ("fr", "FR", "fr-CA", "en_US")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let language = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase();
        match language.as_str() {
            "fr" => Ok(Locale::Fr),
            "en" => Ok(Locale::En),
            _ => Err(LexiconError::Config(format!("unsupported locale '{}'", s.trim()))),
        }
    }
}

/// One ingredient line split into its parts
///
/// `name` is never empty for non-empty input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedIngredientLine {
    /// Quantity as written ("250", "1/2", "2-3", "2 à 3"), never evaluated
    pub quantity: Option<String>,
    /// Unit token as written ("g", "cuillères à soupe", "tbsp")
    pub unit: Option<String>,
    /// Ingredient phrase ("farine tout usage", "œufs")
    pub name: String,
    /// Trailing parenthetical qualifier without the parentheses ("tamisée")
    pub note: Option<String>,
}

impl ParsedIngredientLine {
    /// Create a line with only a name
    pub fn new(name: &str) -> Self {
        Self {
            quantity: None,
            unit: None,
            name: name.to_string(),
            note: None,
        }
    }

    pub fn with_quantity(mut self, quantity: &str) -> Self {
        self.quantity = Some(quantity.to_string());
        self
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }

    /// Check if a quantity was isolated
    pub fn has_quantity(&self) -> bool {
        self.quantity.is_some()
    }

    /// Measurement family of the unit, if any
    pub fn unit_kind(&self) -> Option<UnitKind> {
        self.unit.as_deref().and_then(classify_unit)
    }
}

impl fmt::Display for ParsedIngredientLine {
    /// Re-serializes as "quantity unit name (note)", omitting absent parts
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(quantity) = &self.quantity {
            write!(f, "{} ", quantity)?;
        }
        if let Some(unit) = &self.unit {
            write!(f, "{} ", unit)?;
        }
        write!(f, "{}", self.name)?;
        if let Some(note) = &self.note {
            write!(f, " ({})", note)?;
        }
        Ok(())
    }
}

/// A titled block of ingredient lines within a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientGroup {
    /// Group heading without its trailing colon, `None` for the leading untitled group
    pub title: Option<String>,
    pub items: Vec<ParsedIngredientLine>,
}

impl IngredientGroup {
    pub fn new(title: Option<String>) -> Self {
        Self {
            title,
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Canonical identity of an ingredient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalIngredient {
    /// Surface identifier assigned by the store
    pub id: IngredientId,
    /// Unique join key derived from `name` with [`crate::text_processing::slugify`]
    pub slug: String,
    /// Display name as first encountered
    pub name: String,
    /// Locale of the text where the term was first detected
    pub locale: Locale,
    pub created_at: DateTime<Utc>,
}

/// Association between a recipe and a canonical ingredient
///
/// At most one link exists per (recipe, ingredient) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeIngredientLink {
    pub recipe_id: RecipeId,
    pub ingredient_id: IngredientId,
    /// Locale of the ingredient text the link was detected in
    pub locale: Locale,
}

impl RecipeIngredientLink {
    pub fn new(recipe_id: RecipeId, ingredient_id: IngredientId, locale: Locale) -> Self {
        Self {
            recipe_id,
            ingredient_id,
            locale,
        }
    }
}

/// Ingredient text of one recipe in one locale, as read from the content store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeText {
    pub recipe_id: RecipeId,
    pub locale: Locale,
    /// Raw ingredient lines, newline separated
    pub ingredients_text: String,
}

impl RecipeText {
    pub fn new(recipe_id: RecipeId, locale: Locale, ingredients_text: &str) -> Self {
        Self {
            recipe_id,
            locale,
            ingredients_text: ingredients_text.to_string(),
        }
    }
}

/// Ranking output for one recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub recipe_id: RecipeId,
    /// Linked ingredients present in the selection
    pub matching_ingredients: u32,
    /// All ingredients linked to the recipe
    pub total_ingredients: u32,
    /// `round(100 * matching / total)`
    pub match_percentage: u32,
}

impl MatchResult {
    /// Build a result, computing the rounded percentage
    ///
    /// Returns `None` when `total_ingredients` is zero or smaller than `matching_ingredients`.
    pub fn new(recipe_id: RecipeId, matching_ingredients: u32, total_ingredients: u32) -> Option<Self> {
        if total_ingredients == 0 || matching_ingredients > total_ingredients {
            return None;
        }
        // round half up in integer arithmetic, widened so large counts cannot overflow
        let (matching, total) = (u64::from(matching_ingredients), u64::from(total_ingredients));
        let match_percentage = u32::try_from((200 * matching + total) / (2 * total)).ok()?;
        Some(Self {
            recipe_id,
            matching_ingredients,
            total_ingredients,
            match_percentage,
        })
    }
}
