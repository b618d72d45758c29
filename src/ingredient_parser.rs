//! # Ingredient Parser
//!
//! This module turns free-text ingredient lines into structured
//! `quantity / unit / name / note` records.
//!
//! ## Features
//!
//! - Trailing parenthetical notes ("(tamisée)", "(softened)")
//! - Leading quantities: decimals, fractions, mixed numbers, ranges (2-3, 2 à 3, 1 to 2)
//! - Leading units from a closed English/French list, longest match first
//! - Partitive preposition stripping ("de", "d'", "du", "des", "of")
//! - Grouped ingredient blocks with section titles
//!
//! Parsing never fails: anything that cannot be isolated stays in `name`.
//!
//! ## Usage
//!
//! ```rust
//! use recipe_lexicon::ingredient_parser::parse;
//!
//! let line = parse("250 g de farine tout usage (tamisée)");
//! assert_eq!(line.quantity.as_deref(), Some("250"));
//! assert_eq!(line.unit.as_deref(), Some("g"));
//! assert_eq!(line.name, "farine tout usage");
//! assert_eq!(line.note.as_deref(), Some("tamisée"));
//! ```

use tracing::trace;

use crate::ingredient_model::{IngredientGroup, ParsedIngredientLine};
use crate::unit_patterns::{
    BULLET_REGEX, GROUP_TITLE_REGEX, NOTE_REGEX, PREPOSITION_REGEX, QUANTITY_REGEX, UNIT_REGEX,
};

/// Parse a single ingredient line
///
/// Extraction order is note, quantity, unit, then prepositions. Each stage runs
/// whether or not the previous one matched, so "pincée de sel" still yields a unit.
///
/// When nothing is left for the name, the line degrades to `{name: line}`: any
/// isolated quantity and unit are discarded and only the note is kept. A line
/// that is nothing but a parenthetical becomes `{name: trimmed_input}`.
pub fn parse(line: &str) -> ParsedIngredientLine {
    let trimmed = line.trim();

    let (working, note) = split_note(trimmed);
    if working.is_empty() {
        trace!(line = trimmed, "Line has no content outside its note");
        return ParsedIngredientLine::new(trimmed);
    }

    let (quantity, rest) = split_quantity(working);
    let (unit, rest) = split_unit(rest);
    let name = strip_prepositions(rest);

    let mut parsed = if name.is_empty() {
        trace!(line = trimmed, "Nothing left for the ingredient name, keeping the whole line");
        ParsedIngredientLine::new(working)
    } else {
        ParsedIngredientLine {
            quantity: quantity.map(str::to_string),
            unit: unit.map(str::to_string),
            name: name.to_string(),
            note: None,
        }
    };
    parsed.note = note.map(str::to_string);

    trace!(
        line = trimmed,
        quantity = ?parsed.quantity,
        unit = ?parsed.unit,
        name = %parsed.name,
        note = ?parsed.note,
        "Parsed ingredient line"
    );
    parsed
}

/// Parse every non-empty line of a text
pub fn parse_lines(text: &str) -> Vec<ParsedIngredientLine> {
    text.lines()
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .map(parse)
        .collect()
}

/// Parse a multi-line ingredient block into titled groups
///
/// A line ending with `:` that does not start with a quantity opens a new group.
/// Lines before the first title form an untitled group. Empty groups are dropped.
///
/// ```rust
/// use recipe_lexicon::ingredient_parser::parse_ingredient_block;
///
/// let groups = parse_ingredient_block("Pâte :\n250 g de farine\n\nGarniture :\n3 pommes");
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].title.as_deref(), Some("Pâte"));
/// assert_eq!(groups[1].items[0].name, "pommes");
/// ```
pub fn parse_ingredient_block(text: &str) -> Vec<IngredientGroup> {
    let mut groups = vec![IngredientGroup::new(None)];

    for raw_line in text.lines() {
        let line = strip_bullet(raw_line);
        if line.is_empty() {
            continue;
        }

        if let Some(title) = group_title(line) {
            groups.push(IngredientGroup::new(Some(title.to_string())));
            continue;
        }

        if let Some(group) = groups.last_mut() {
            group.items.push(parse(line));
        }
    }

    groups.retain(|group| !group.is_empty());
    groups
}

/// Remove a trailing `(...)` and return its trimmed interior
fn split_note(line: &str) -> (&str, Option<&str>) {
    match NOTE_REGEX.captures(line) {
        Some(caps) => {
            let start = caps.get(0).map_or(line.len(), |m| m.start());
            let note = caps
                .name("note")
                .map(|m| m.as_str())
                .filter(|note| !note.is_empty());
            (line[..start].trim_end(), note)
        }
        None => (line, None),
    }
}

fn split_quantity(text: &str) -> (Option<&str>, &str) {
    match QUANTITY_REGEX.captures(text) {
        Some(caps) => {
            let consumed = caps.get(0).map_or(0, |m| m.end());
            let quantity = caps.name("qty").map(|m| m.as_str());
            (quantity, &text[consumed..])
        }
        None => (None, text),
    }
}

fn split_unit(text: &str) -> (Option<&str>, &str) {
    match UNIT_REGEX.captures(text) {
        Some(caps) => {
            let consumed = caps.get(0).map_or(0, |m| m.end());
            let unit = caps.name("unit").map(|m| m.as_str());
            (unit, &text[consumed..])
        }
        None => (None, text),
    }
}

/// Strip leading partitive prepositions until none remain
fn strip_prepositions(text: &str) -> &str {
    let mut rest = text.trim();
    while let Some(m) = PREPOSITION_REGEX.find(rest) {
        if m.end() == 0 {
            break;
        }
        rest = rest[m.end()..].trim_start();
    }
    rest
}

fn strip_bullet(line: &str) -> &str {
    let line = line.trim();
    match BULLET_REGEX.find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line,
    }
}

fn group_title(line: &str) -> Option<&str> {
    if QUANTITY_REGEX.is_match(line) {
        return None;
    }
    GROUP_TITLE_REGEX
        .captures(line)
        .and_then(|caps| caps.name("title"))
        .map(|m| m.as_str().trim())
}
