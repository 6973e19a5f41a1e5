/// Learner text prepared for rule evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedText {
    /// Trimmed original text, case preserved.
    pub original: String,
    /// Trimmed, lowercased text with typographic apostrophes folded to `'`.
    pub lower: String,
    /// Whitespace-separated words of `lower` with non-alphanumerics removed.
    pub tokens: Vec<String>,
}

impl NormalizedText {
    /// Normalize raw learner text.
    pub fn new(raw: &str) -> Self {
        let original = raw.trim().to_string();
        let lower = original
            .replace(['\u{2019}', '\u{2018}', '`'], "'")
            .to_lowercase();
        let tokens = lower
            .split_whitespace()
            .map(|word| word.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
            .filter(|token| !token.is_empty())
            .collect();
        Self {
            original,
            lower,
            tokens,
        }
    }

    /// Number of non-whitespace characters.
    pub fn visible_len(&self) -> usize {
        self.lower.chars().filter(|c| !c.is_whitespace()).count()
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.lower.split_whitespace().count()
    }

    /// First word with trailing punctuation removed.
    pub fn first_word(&self) -> Option<&str> {
        self.lower
            .split_whitespace()
            .next()
            .map(|w| w.trim_end_matches(|c: char| !c.is_alphanumeric()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        let text = NormalizedText::new("   What is AMG?  ");
        assert_eq!(text.original, "What is AMG?");
        assert_eq!(text.lower, "what is amg?");
        assert_eq!(text.tokens, vec!["what", "is", "amg"]);
    }

    #[test]
    fn test_normalize_folds_curly_apostrophes() {
        let text = NormalizedText::new("I\u{2019}m done");
        assert_eq!(text.lower, "i'm done");
        assert_eq!(text.tokens, vec!["im", "done"]);
    }

    #[test]
    fn test_punctuation_only_words_are_dropped_from_tokens() {
        let text = NormalizedText::new("!@# qwe ...");
        assert_eq!(text.tokens, vec!["qwe"]);
        assert_eq!(text.visible_len(), 9);
        assert_eq!(text.word_count(), 3);
    }

    #[test]
    fn test_first_word_strips_trailing_punctuation() {
        assert_eq!(NormalizedText::new("Why? Because").first_word(), Some("why"));
        assert_eq!(NormalizedText::new("can't stop").first_word(), Some("can't"));
        assert_eq!(NormalizedText::new("   ").first_word(), None);
    }
}
