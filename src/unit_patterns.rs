//! # Unit Patterns Module
//!
//! This module contains the closed list of recognized unit tokens and the regex
//! patterns used by the ingredient line parser. Everything here is compiled once
//! and read-only afterwards.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Measurement family of a unit token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Volume,
    Weight,
    Count,
}

/// Volume units, English and French
pub const VOLUME_UNITS: &[&str] = &[
    // metric
    "ml", "cl", "dl", "l",
    "millilitre", "millilitres", "milliliter", "milliliters",
    "centilitre", "centilitres", "décilitre", "décilitres",
    "litre", "litres", "liter", "liters",
    // spoons and cups
    "tablespoon", "tablespoons", "tbsp", "tbsp.", "tbs",
    "teaspoon", "teaspoons", "tsp", "tsp.",
    "cup", "cups", "fl oz", "fluid ounce", "fluid ounces",
    "pint", "pints", "quart", "quarts", "gallon", "gallons",
    "cuillère à soupe", "cuillères à soupe", "cuillère à café", "cuillères à café",
    "cuillère à thé", "cuillères à thé", "cuillère", "cuillères",
    "c. à soupe", "c. à café", "c. à thé", "c. à s.", "c. à c.", "c.à.s.", "c.à.c.",
    "cas", "cac", "càs", "càc",
    "tasse", "tasses", "verre", "verres", "bol", "bols",
];

/// Weight units, English and French
pub const WEIGHT_UNITS: &[&str] = &[
    "mg", "g", "gr", "gr.", "kg",
    "gramme", "grammes", "gram", "grams", "kilogramme", "kilogrammes", "kilogram", "kilograms",
    "oz", "oz.", "ounce", "ounces", "lb", "lb.", "lbs", "lbs.", "pound", "pounds",
];

/// Count-like units, English and French
pub const COUNT_UNITS: &[&str] = &[
    "pinch", "pinches", "pincée", "pincées",
    "dash", "dashes", "trait", "traits",
    "slice", "slices", "tranche", "tranches",
    "clove", "cloves", "gousse", "gousses",
    "sprig", "sprigs", "brin", "brins", "branche", "branches",
    "can", "cans", "tin", "tins", "boîte", "boîtes", "conserve", "conserves",
    "packet", "packets", "package", "packages", "pkg", "sachet", "sachets", "paquet", "paquets",
    "bottle", "bottles", "bouteille", "bouteilles",
    "bunch", "bunches", "botte", "bottes", "bouquet", "bouquets",
    "leaf", "leaves", "feuille", "feuilles",
    "piece", "pieces", "morceau", "morceaux",
    "handful", "handfuls", "poignée", "poignées",
    "stick", "sticks", "bâton", "bâtons",
    "cube", "cubes", "sheet", "sheets",
];

/// Leading partitive prepositions stripped from ingredient names, longest alternatives first
const PREPOSITION_PATTERN: &str = r"(?i)^(?:de\s+la\s+|de\s+l['’]\s*|des\s+|du\s+|de\s+|d['’]\s*|of\s+)";

/// Vulgar fraction glyphs accepted as quantities
const FRACTION_GLYPHS: &str = "½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞";

lazy_static! {
    /// Leading quantity: decimals, fractions, mixed numbers and simple ranges ("2-3", "2 à 3", "1 to 2")
    pub static ref QUANTITY_REGEX: Regex = {
        let number = format!(
            r"(?:\d+(?:[.,/]\d+)*(?:\s+\d+/\d+)?[{glyphs}]?|[{glyphs}])",
            glyphs = FRACTION_GLYPHS
        );
        let pattern = format!(
            r"(?i)^(?P<qty>{number}(?:\s*[-–—]\s*{number}|\s+(?:à|a|to)\s+{number})?)\s*",
            number = number
        );
        Regex::new(&pattern).expect("Quantity pattern should be valid")
    };

    /// Leading unit token followed by mandatory whitespace, longest token first
    pub static ref UNIT_REGEX: Regex = {
        let mut units: Vec<&str> = VOLUME_UNITS
            .iter()
            .chain(WEIGHT_UNITS)
            .chain(COUNT_UNITS)
            .copied()
            .collect();
        units.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
        units.dedup();

        let alternation = units
            .iter()
            .map(|unit| {
                unit.split_whitespace()
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+")
            })
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"(?i)^(?P<unit>{})\s+", alternation))
            .expect("Unit pattern should be valid")
    };

    /// Trailing parenthetical note, without nested parentheses
    pub static ref NOTE_REGEX: Regex =
        Regex::new(r"\(\s*(?P<note>[^()]*?)\s*\)\s*$").expect("Note pattern should be valid");

    pub static ref PREPOSITION_REGEX: Regex =
        Regex::new(PREPOSITION_PATTERN).expect("Preposition pattern should be valid");

    /// Group heading such as "Pour la pâte :" or "For the glaze:"
    pub static ref GROUP_TITLE_REGEX: Regex =
        Regex::new(r"^(?P<title>[^:]*\S)\s*:\s*$").expect("Group title pattern should be valid");

    /// List bullet markers at the start of a line
    pub static ref BULLET_REGEX: Regex =
        Regex::new(r"^[-*•·]\s*").expect("Bullet pattern should be valid");
}

/// Classify a unit token into its measurement family
///
/// Matching is case-insensitive and tolerant of repeated inner whitespace.
pub fn classify_unit(unit: &str) -> Option<UnitKind> {
    let unit = unit.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    let tables = [
        (VOLUME_UNITS, UnitKind::Volume),
        (WEIGHT_UNITS, UnitKind::Weight),
        (COUNT_UNITS, UnitKind::Count),
    ];
    tables
        .iter()
        .find(|(table, _)| table.contains(&unit.as_str()))
        .map(|(_, kind)| *kind)
}
