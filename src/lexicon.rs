//! # Lexicon Module
//!
//! Curated canonical ingredient vocabularies and the matcher that finds which
//! canonical terms appear in a piece of recipe text.
//!
//! Matching is done on the comparison form of both sides (see
//! [`crate::text_processing::normalize`]): a term hits when it appears as a whole
//! word, optionally followed by a plural `s`. All vocabulary terms are compiled
//! into one `RegexSet`, so the text is scanned once whatever the vocabulary size.
//!
//! ## Usage
//!
//! ```rust
//! use recipe_lexicon::lexicon::detect;
//!
//! let found = detect("250 g de Creme fraiche et 3 oeufs", &["crème fraîche", "œuf", "sel"]);
//! assert!(found.contains("crème fraîche"));
//! assert!(found.contains("œuf"));
//! assert!(!found.contains("sel"));
//! ```

use regex::{RegexSet, RegexSetBuilder};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, trace, warn};

use crate::errors::{LexiconError, LexiconResult};
use crate::ingredient_model::Locale;
use crate::text_processing::{contains_term, normalize, slugify, term_spans};

/// Built-in French canonical ingredient terms
pub const FRENCH_INGREDIENTS: &[&str] = &[
    "farine", "sucre", "sucre roux", "sel", "poivre", "beurre", "lait", "crème", "crème fraîche",
    "œuf", "huile", "huile d'olive", "ail", "oignon", "échalote", "carotte", "pomme",
    "pomme de terre", "tomate", "courgette", "aubergine", "poivron", "champignon", "épinard",
    "poireau", "céleri", "chou", "chou-fleur", "brocoli", "haricot vert", "petit pois", "lentille",
    "pois chiche", "riz", "pâtes", "semoule", "quinoa", "pain", "levure", "bicarbonate de soude",
    "chocolat", "cacao", "vanille", "cannelle", "muscade", "cumin", "curry", "paprika",
    "gingembre", "persil", "basilic", "coriandre", "thym", "romarin", "laurier", "menthe",
    "ciboulette", "citron", "citron vert", "orange", "banane", "fraise", "framboise", "myrtille",
    "poire", "noix", "amande", "noisette", "miel", "sirop d'érable", "vinaigre", "moutarde",
    "fromage", "parmesan", "gruyère", "mozzarella", "chèvre", "yaourt", "poulet", "bœuf", "porc",
    "jambon", "lardon", "saumon", "thon", "crevette", "tofu", "eau", "vin blanc", "vin rouge",
    "bouillon de poulet", "lait de coco", "maïs",
];

/// Built-in English canonical ingredient terms
pub const ENGLISH_INGREDIENTS: &[&str] = &[
    "flour", "sugar", "brown sugar", "salt", "pepper", "black pepper", "butter", "milk", "cream",
    "heavy cream", "sour cream", "egg", "oil", "olive oil", "vegetable oil", "garlic", "onion",
    "shallot", "carrot", "apple", "potato", "sweet potato", "tomato", "zucchini", "eggplant",
    "bell pepper", "mushroom", "spinach", "leek", "celery", "cabbage", "broccoli", "cauliflower",
    "green bean", "pea", "lentil", "chickpea", "rice", "pasta", "bread", "yeast", "baking soda",
    "baking powder", "chocolate", "cocoa", "vanilla", "cinnamon", "nutmeg", "cumin", "curry",
    "paprika", "ginger", "parsley", "basil", "cilantro", "thyme", "rosemary", "bay leaf", "mint",
    "chive", "lemon", "lime", "orange", "banana", "strawberry", "raspberry", "blueberry", "pear",
    "walnut", "almond", "hazelnut", "honey", "maple syrup", "vinegar", "mustard", "cheese",
    "parmesan", "cheddar", "mozzarella", "goat cheese", "yogurt", "chicken", "beef", "pork", "ham",
    "bacon", "salmon", "tuna", "shrimp", "tofu", "water", "white wine", "red wine",
    "chicken broth", "coconut milk", "corn",
];

/// Size limit for the compiled term set, large enough for a few thousand terms
const TERM_SET_SIZE_LIMIT: usize = 64 * (1 << 20);

/// Characters that may surround a term: anything that is not a letter or a number
const BOUNDARY_CLASS: &str = r"[^\p{Alphabetic}\p{N}]";

/// Canonical terms of one locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub locale: Locale,
    terms: Vec<String>,
}

impl Vocabulary {
    /// Build a vocabulary, rejecting blank terms and terms sharing a slug
    pub fn new(locale: Locale, terms: Vec<String>) -> LexiconResult<Self> {
        let mut seen = HashSet::new();
        let mut cleaned = Vec::with_capacity(terms.len());

        for term in terms {
            let term = term.trim().to_string();
            let slug = slugify(&term);
            if slug.is_empty() {
                return Err(LexiconError::Vocabulary(format!(
                    "blank or symbol-only term '{}' in '{}' vocabulary",
                    term, locale
                )));
            }
            if !seen.insert(slug.clone()) {
                return Err(LexiconError::Vocabulary(format!(
                    "term '{}' duplicates slug '{}' in '{}' vocabulary",
                    term, slug, locale
                )));
            }
            cleaned.push(term);
        }

        Ok(Self {
            locale,
            terms: cleaned,
        })
    }

    /// The compiled-in vocabulary for a locale
    pub fn builtin(locale: Locale) -> Self {
        let terms = match locale {
            Locale::Fr => FRENCH_INGREDIENTS,
            Locale::En => ENGLISH_INGREDIENTS,
        };
        Self {
            locale,
            terms: terms.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Parse vocabularies from JSON shaped as `{"fr": ["farine", ...], "en": [...]}`
    pub fn from_json_str(json: &str) -> LexiconResult<Vec<Self>> {
        let raw: BTreeMap<Locale, Vec<String>> = serde_json::from_str(json)?;
        let vocabularies = raw
            .into_iter()
            .map(|(locale, terms)| Self::new(locale, terms))
            .collect::<LexiconResult<Vec<_>>>()?;
        debug!(count = vocabularies.len(), "Parsed vocabularies from JSON");
        Ok(vocabularies)
    }

    /// Load vocabularies from a JSON file
    pub fn from_file(path: &Path) -> LexiconResult<Vec<Self>> {
        info!(path = %path.display(), "Loading vocabulary file");
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Merge several vocabularies into one term list, first occurrence of a slug wins
    pub fn merge(vocabularies: &[Vocabulary]) -> Vec<String> {
        let mut seen = HashSet::new();
        vocabularies
            .iter()
            .flat_map(|v| v.terms.iter())
            .filter(|term| seen.insert(slugify(term)))
            .cloned()
            .collect()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// How overlapping term hits are reported
///
/// This is the single place where matched terms are filtered before being returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupPolicy {
    /// Report every matching term, even when it is part of a longer matching term
    #[default]
    KeepAll,
    /// Drop a term when all of its occurrences sit inside a longer matching term
    PreferLongest,
}

impl DedupPolicy {
    /// Filter the hits of one text and return their original spellings
    fn apply(&self, normalized_text: &str, hits: Vec<&Term>) -> BTreeSet<String> {
        match self {
            DedupPolicy::KeepAll => hits.into_iter().map(|t| t.original.clone()).collect(),
            DedupPolicy::PreferLongest => {
                let mut hits = hits;
                hits.sort_by(|a, b| b.normalized.len().cmp(&a.normalized.len()));

                let mut masked = normalized_text.to_string();
                let mut kept = BTreeSet::new();
                for term in hits {
                    let spans = term_spans(&masked, &term.normalized);
                    if !spans.is_empty() {
                        // only whole-word hits are covered, masking keeps byte offsets stable
                        for span in spans {
                            let mask = "|".repeat(span.len());
                            masked.replace_range(span, &mask);
                        }
                        kept.insert(term.original.clone());
                    } else {
                        trace!(term = %term.original, "Dropping term covered by a longer match");
                    }
                }
                kept
            }
        }
    }
}

impl FromStr for DedupPolicy {
    type Err = LexiconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keep-all" | "keep_all" | "all" => Ok(DedupPolicy::KeepAll),
            "prefer-longest" | "prefer_longest" | "longest" => Ok(DedupPolicy::PreferLongest),
            other => Err(LexiconError::Config(format!("unknown dedup policy '{}'", other))),
        }
    }
}

/// A vocabulary term with its comparison form
#[derive(Debug, Clone)]
struct Term {
    original: String,
    normalized: String,
}

/// Multi-pattern matcher over a fixed vocabulary
///
/// Read-only once built; share it freely across threads.
#[derive(Debug, Clone)]
pub struct LexiconMatcher {
    terms: Vec<Term>,
    set: RegexSet,
    policy: DedupPolicy,
}

impl LexiconMatcher {
    /// Compile a matcher for the given terms
    ///
    /// Terms that normalize to nothing are skipped, repeated terms are kept once.
    pub fn new<S: AsRef<str>>(vocabulary: &[S], policy: DedupPolicy) -> LexiconResult<Self> {
        let terms = prepare_terms(vocabulary);
        let patterns = terms.iter().map(|t| term_pattern(&t.normalized));
        let set = RegexSetBuilder::new(patterns)
            .size_limit(TERM_SET_SIZE_LIMIT)
            .dfa_size_limit(TERM_SET_SIZE_LIMIT)
            .build()?;

        info!(terms = terms.len(), policy = ?policy, "Compiled lexicon matcher");
        Ok(Self { terms, set, policy })
    }

    /// Matcher over the built-in vocabulary of a locale
    pub fn builtin(locale: Locale, policy: DedupPolicy) -> LexiconResult<Self> {
        Self::for_vocabulary(&Vocabulary::builtin(locale), policy)
    }

    pub fn for_vocabulary(vocabulary: &Vocabulary, policy: DedupPolicy) -> LexiconResult<Self> {
        Self::new(vocabulary.terms(), policy)
    }

    /// Return the vocabulary terms found in `text`, spelled as in the vocabulary
    pub fn detect(&self, text: &str) -> BTreeSet<String> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return BTreeSet::new();
        }

        let hits: Vec<&Term> = self
            .set
            .matches(&normalized)
            .into_iter()
            .map(|index| &self.terms[index])
            .collect();
        let found = self.policy.apply(&normalized, hits);

        trace!(text = %normalized, found = ?found, "Detected canonical terms");
        found
    }

    pub fn policy(&self) -> DedupPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Detect which vocabulary terms appear in `text`
///
/// Never fails: if the term set cannot be compiled, each term is scanned on its own.
pub fn detect<S: AsRef<str>>(text: &str, vocabulary: &[S]) -> BTreeSet<String> {
    match LexiconMatcher::new(vocabulary, DedupPolicy::default()) {
        Ok(matcher) => matcher.detect(text),
        Err(e) => {
            warn!(error = %e, "Falling back to per-term scanning");
            let normalized = normalize(text);
            prepare_terms(vocabulary)
                .into_iter()
                .filter(|term| contains_term(&normalized, &term.normalized))
                .map(|term| term.original)
                .collect()
        }
    }
}

fn prepare_terms<S: AsRef<str>>(vocabulary: &[S]) -> Vec<Term> {
    let mut seen = HashSet::new();
    let mut terms = Vec::with_capacity(vocabulary.len());

    for raw in vocabulary {
        let original = raw.as_ref().trim();
        let normalized = normalize(original);
        if normalized.is_empty() {
            warn!(term = original, "Skipping vocabulary term with an empty comparison form");
            continue;
        }
        if seen.insert(original.to_string()) {
            terms.push(Term {
                original: original.to_string(),
                normalized,
            });
        }
    }
    terms
}

/// Whole-word pattern for a normalized term, with an optional plural `s`
fn term_pattern(normalized: &str) -> String {
    format!(
        "(?:^|{boundary}){term}s?(?:{boundary}|$)",
        boundary = BOUNDARY_CLASS,
        term = regex::escape(normalized)
    )
}
