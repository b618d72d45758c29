#[cfg(test)]
mod tests {
    use recipe_lexicon::lexicon::{detect, DedupPolicy, LexiconMatcher, Vocabulary};
    use recipe_lexicon::ingredient_model::Locale;
    use recipe_lexicon::text_processing::{contains_term, normalize, slugify};

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = vec![
            "Crème Fraîche",
            "  ŒUFS   frais ",
            "Piment d’Espelette",
            "Jalapeño",
            "Pâte brisée",
        ];

        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "normalize not idempotent for '{}'", sample);
        }
    }

    #[test]
    fn test_slug_is_stable_under_case_and_accents() {
        let variants = vec!["crème fraîche", "Crème Fraîche", "CREME FRAICHE", "creme  fraiche"];
        for variant in variants {
            assert_eq!(slugify(variant), "creme-fraiche", "unexpected slug for '{}'", variant);
        }
        assert_eq!(slugify("œuf"), slugify("oeuf"));
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_contains_term_boundaries() {
        assert!(contains_term("200 g de sucre roux", "sucre"));
        assert!(contains_term("sucre", "sucre"));
        assert!(contains_term("2 eggs, beaten", "egg"));
        assert!(!contains_term("eggplant", "egg"));
        assert!(!contains_term("riz", "ri"));
        assert!(!contains_term("anything", ""));
    }

    #[test]
    fn test_detect_accent_and_case_insensitive() {
        let vocabulary = ["crème fraîche", "œuf", "sucre"];

        let variants = vec![
            "20 cl de crème fraîche et 2 œufs",
            "20 CL DE CREME FRAICHE ET 2 OEUFS",
            "20 cl de Crème Fraîche et 2 Œufs",
        ];

        for text in variants {
            let found = detect(text, &vocabulary);
            assert_eq!(found.len(), 2, "unexpected terms for '{}': {:?}", text, found);
            assert!(found.contains("crème fraîche"));
            assert!(found.contains("œuf"));
        }
    }

    #[test]
    fn test_detect_returns_vocabulary_spelling() {
        let found = detect("3 oeufs", &["œuf"]);
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["œuf".to_string()]);
    }

    #[test]
    fn test_detect_empty_inputs() {
        let empty: [&str; 0] = [];
        assert!(detect("250 g de farine", &empty).is_empty());
        assert!(detect("", &["farine"]).is_empty());
        assert!(detect("   ", &["farine"]).is_empty());
    }

    #[test]
    fn test_builtin_matchers() {
        for locale in Locale::ALL {
            let matcher = LexiconMatcher::builtin(locale, DedupPolicy::KeepAll).unwrap();
            assert_eq!(matcher.len(), Vocabulary::builtin(locale).len());
        }

        let french = LexiconMatcher::builtin(Locale::Fr, DedupPolicy::KeepAll).unwrap();
        let found = french.detect("250 g de farine\n3 œufs\n1 pincée de sel");
        assert!(found.contains("farine"));
        assert!(found.contains("œuf"));
        assert!(found.contains("sel"));

        let english = LexiconMatcher::builtin(Locale::En, DedupPolicy::KeepAll).unwrap();
        let found = english.detect("2 cups flour\n3 large eggs\n1 tbsp olive oil");
        assert!(found.contains("flour"));
        assert!(found.contains("egg"));
        assert!(found.contains("olive oil"));
        assert!(found.contains("oil"));
    }

    #[test]
    fn test_prefer_longest_policy() {
        let vocabulary = ["huile", "huile d'olive"];
        let keep_all = LexiconMatcher::new(&vocabulary, DedupPolicy::KeepAll).unwrap();
        let longest = LexiconMatcher::new(&vocabulary, DedupPolicy::PreferLongest).unwrap();

        assert_eq!(keep_all.detect("2 c. à soupe d'huile d'olive").len(), 2);

        let found = longest.detect("2 c. à soupe d'huile d'olive");
        assert_eq!(found.len(), 1);
        assert!(found.contains("huile d'olive"));

        // a separate bare occurrence keeps the shorter term
        let found = longest.detect("huile d'olive, puis un filet d'huile");
        assert_eq!(found.len(), 2);
    }
}
