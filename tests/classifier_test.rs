//! Integration tests for learner response classification

use pretty_assertions::assert_eq;
use serde_json::json;

use concept_map_scaffolding::classifier::{DisagreementKind, ResponseClassifier, ResponseType};
use concept_map_scaffolding::config::ClassifierConfig;

fn classify(text: &str) -> ResponseType {
    ResponseClassifier::new().classify(text).response_type
}

mod categories {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_inputs() {
        for text in ["", "   ", "\n\t  "] {
            assert_eq!(classify(text), ResponseType::Empty, "input {:?}", text);
        }
    }

    #[test]
    fn test_minimal_input_is_lenient() {
        for text in ["ok", "no", "Yes", "got it", "hmmm"] {
            let analysis = ResponseClassifier::new().classify(text);
            assert_eq!(analysis.response_type, ResponseType::MinimalInput, "input {:?}", text);
            assert!(!analysis.is_gibberish);
            assert!(!analysis.requires_pattern_response);
        }
    }

    #[test]
    fn test_each_category_example() {
        let cases = [
            ("asdf", ResponseType::Gibberish),
            ("this is stupid", ResponseType::InappropriateLanguage),
            ("What is AMG?", ResponseType::DomainQuestion),
            ("B2B strategy?", ResponseType::DomainQuestion),
            ("How do I delete a node?", ResponseType::SystemQuestion),
            ("I don't think that's right", ResponseType::Disagreement),
            ("What's the weather like today?", ResponseType::OffTopic),
            ("This is too hard for me", ResponseType::Frustration),
            ("I can't think of anything more", ResponseType::PrematureEnding),
            (
                "I think AMG blocks entry via regulatory barriers",
                ResponseType::ConcreteIdea,
            ),
            ("I added a few more concepts", ResponseType::Normal),
        ];
        for (text, expected) in cases {
            assert_eq!(classify(text), expected, "input {:?}", text);
        }
    }

    #[test]
    fn test_pattern_response_flag_matches_category() {
        for text in ["", "asdf", "What is AMG?", "I'm done"] {
            let analysis = ResponseClassifier::new().classify(text);
            assert!(analysis.requires_pattern_response, "input {:?}", text);
        }
        for text in ["ok", "I added a few more concepts", "I think AMG blocks entry via regulatory barriers"] {
            let analysis = ResponseClassifier::new().classify(text);
            assert!(!analysis.requires_pattern_response, "input {:?}", text);
        }
    }

    #[test]
    fn test_curly_apostrophe_closure() {
        let analysis = ResponseClassifier::new().classify("I\u{2019}m done");
        assert_eq!(analysis.response_type, ResponseType::PrematureEnding);
        assert!(analysis.wants_to_end);
    }

    #[test]
    fn test_disagreement_kind_is_reported() {
        let analysis = ResponseClassifier::new().classify("I don't think that's right");
        assert!(analysis.is_disagreement);
        assert_eq!(analysis.disagreement_kind, Some(DisagreementKind::General));
    }
}

mod gibberish {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_keyboard_mash_and_repeats() {
        for text in ["asdf", "qwerty", "zxcvbnm", "zzzzz", "fjfjfj", "123456", "!@#$%"] {
            let analysis = ResponseClassifier::new().classify(text);
            assert!(analysis.is_gibberish, "expected gibberish: {}", text);
            assert!(analysis.requires_pattern_response, "expected pattern response: {}", text);
        }
    }

    #[test]
    fn test_y_only_words_are_not_gibberish() {
        for text in ["why", "try", "fly", "rhythm"] {
            let analysis = ResponseClassifier::new().classify(text);
            assert!(!analysis.is_gibberish, "unexpected gibberish: {}", text);
            assert_ne!(analysis.response_type, ResponseType::Gibberish);
        }
    }

    #[test]
    fn test_real_sentences_are_not_gibberish() {
        for text in [
            "Regulatory barriers shape market entry",
            "Strategic alliances help startups",
            "Government policy protects incumbents",
            "Strengths",
            "SMBs",
            "B2B markets",
            "P2P networks",
        ] {
            assert!(
                !ResponseClassifier::new().classify(text).is_gibberish,
                "unexpected gibberish: {}",
                text
            );
        }
    }

    #[test]
    fn test_stricter_threshold_from_config() {
        let strict = ResponseClassifier::with_config(ClassifierConfig {
            vowel_ratio_threshold: 0.2,
            ..Default::default()
        });
        assert!(strict.classify("blocks").is_gibberish);
        assert!(!ResponseClassifier::new().classify("blocks").is_gibberish);
    }
}

mod coercion {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_non_string_values_never_fail() {
        let classifier = ResponseClassifier::new();
        assert_eq!(classifier.classify_value(&json!(null)).response_type, ResponseType::Empty);
        assert_eq!(
            classifier.classify_value(&json!("What is AMG?")).response_type,
            ResponseType::DomainQuestion
        );
        assert_eq!(
            classifier.classify_value(&json!(1234567)).response_type,
            ResponseType::Gibberish
        );
    }
}
