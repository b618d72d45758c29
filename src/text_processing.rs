//! # Text Processing Module
//!
//! Comparison-form normalization shared by the lexicon matcher and the
//! canonical ingredient keys.
//!
//! ## Features
//!
//! - Case folding and accent folding (NFD decomposition, combining marks dropped)
//! - Ligature expansion ("œ" → "oe", "æ" → "ae") so "œufs" and "oeufs" compare equal
//! - Whitespace collapsing and typographic apostrophe folding
//! - Deterministic URL-safe slugs used as the canonical ingredient join key
//! - Word-boundary term containment with an optional plural `s`

use std::ops::Range;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Produce the comparison form of a text
///
/// Lower-cases, strips diacritics, expands ligatures, folds typographic
/// apostrophes and collapses whitespace runs to a single space.
///
/// # Examples
///
/// ```rust
/// use recipe_lexicon::text_processing::normalize;
///
/// assert_eq!(normalize("Crème  Fraîche"), "creme fraiche");
/// assert_eq!(normalize("Œufs"), "oeufs");
/// ```
pub fn normalize(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.nfd() {
        if is_combining_mark(c) {
            continue;
        }
        match c {
            'œ' | 'Œ' => folded.push_str("oe"),
            'æ' | 'Æ' => folded.push_str("ae"),
            'ß' => folded.push_str("ss"),
            '’' | 'ʼ' | '`' => folded.push('\''),
            _ => folded.extend(c.to_lowercase()),
        }
    }
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Derive the canonical slug of an ingredient name
///
/// ASCII-folds the normalized name, maps every run of non-alphanumeric
/// characters to a single `-` and trims leading and trailing dashes.
///
/// # Examples
///
/// ```rust
/// use recipe_lexicon::text_processing::slugify;
///
/// assert_eq!(slugify("Crème fraîche"), "creme-fraiche");
/// assert_eq!(slugify("  Piment d'Espelette! "), "piment-d-espelette");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in normalize(name).chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Check whether `term` occurs in `text` as a whole word, optionally followed by a plural `s`
///
/// Both arguments must already be in comparison form (see [`normalize`]). A hit
/// must not be preceded or followed by an alphanumeric character.
///
/// # Examples
///
/// ```rust
/// use recipe_lexicon::text_processing::contains_term;
///
/// assert!(contains_term("3 pommes", "pomme"));
/// assert!(!contains_term("un pommier", "pomme"));
/// ```
pub fn contains_term(text: &str, term: &str) -> bool {
    !term_spans(text, term).is_empty()
}

/// Byte ranges of every whole-word occurrence of `term` in `text`
///
/// Same rules as [`contains_term`]; a range covers the term without its plural `s`.
/// Occurrences may overlap.
pub fn term_spans(text: &str, term: &str) -> Vec<Range<usize>> {
    if term.is_empty() {
        return Vec::new();
    }

    // every start position is tried, a multi-word term can overlap a rejected hit
    text.char_indices()
        .map(|(start, _)| start)
        .filter(|&start| {
            if !text[start..].starts_with(term) {
                return false;
            }

            let before_ok = text[..start]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric());

            let mut after = text[start + term.len()..].chars();
            let after_ok = match after.next() {
                None => true,
                Some('s') => after.next().map_or(true, |c| !c.is_alphanumeric()),
                Some(c) => !c.is_alphanumeric(),
            };

            before_ok && after_ok
        })
        .map(|start| start..start + term.len())
        .collect()
}
