//! Gibberish detection over normalized learner text.
//!
//! Whole-text checks catch digit-only and punctuation-only input. Everything
//! else is judged per token. Only tokens of three or more characters can be
//! flagged, and the text is gibberish when flagged tokens make up at least the
//! configured share of all non-numeric tokens.

use super::lexicon::{FILLER_PATTERN, VOWEL_POOR_WORDS};
use super::normalize::NormalizedText;
use crate::config::ClassifierConfig;

/// Rows, reversed rows and columns of a QWERTY keyboard.
const KEYBOARD_LINES: &[&str] = &[
    "qwertyuiop",
    "poiuytrewq",
    "asdfghjkl",
    "lkjhgfdsa",
    "zxcvbnm",
    "mnbvcxz",
    "qazwsxedcrfvtgbyhnujmikolp",
];

/// Minimum length of a keyboard fragment.
const MIN_KEYBOARD_FRAGMENT: usize = 3;

/// Shortest word whose vowel ratio is judged. Shorter tokens are usually acronyms.
const MIN_VOWEL_RATIO_LEN: usize = 5;

/// Longest letter-digit-letter token read as an acronym ("b2b", "p2p").
const MAX_ACRONYM_LEN: usize = 4;

/// Whether the text as a whole reads as gibberish.
pub fn is_gibberish(text: &NormalizedText, config: &ClassifierConfig) -> bool {
    let compact: String = text.lower.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return false;
    }
    if compact.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    if compact.chars().all(|c| !c.is_alphanumeric()) {
        return true;
    }

    // "a s d f" is judged as one token.
    let spaced = text.tokens.len() >= 3 && text.tokens.iter().all(|t| t.chars().count() == 1);
    let tokens: Vec<String> = if spaced {
        vec![text.tokens.concat()]
    } else {
        text.tokens.clone()
    };

    let words: Vec<&String> = tokens
        .iter()
        .filter(|t| !t.chars().all(|c| c.is_ascii_digit()))
        .collect();
    let flagged = words
        .iter()
        .filter(|t| t.chars().count() >= 3 && is_gibberish_token(t, config))
        .count();
    if flagged == 0 {
        return false;
    }
    flagged as f64 / words.len() as f64 >= config.gibberish_token_share
}

/// Whether a single alphanumeric token is gibberish.
pub fn is_gibberish_token(token: &str, config: &ClassifierConfig) -> bool {
    if FILLER_PATTERN.is_match(token) {
        return false;
    }
    let has_digit = token.chars().any(|c| c.is_ascii_digit());
    let has_alpha = token.chars().any(|c| c.is_alphabetic());

    if has_digit && has_alpha {
        if class_transitions(token) >= 2 && !is_acronym(token) {
            return true;
        }
        let letters: String = token.chars().filter(|c| c.is_alphabetic()).collect();
        return letters.chars().count() >= 3 && is_gibberish_word(&letters, config);
    }
    has_alpha && is_gibberish_word(token, config)
}

fn is_gibberish_word(word: &str, config: &ClassifierConfig) -> bool {
    if VOWEL_POOR_WORDS.contains(&word) {
        return false;
    }
    let chars: Vec<char> = word.chars().collect();
    let runs = run_lengths(&chars);

    if runs.iter().any(|&r| r >= 4) {
        return true;
    }
    if chars.len() >= 6 && runs.iter().all(|&r| r >= 3) {
        return true;
    }
    if chars.len() >= 6 && is_alternating(&chars) {
        return true;
    }
    if !word.is_ascii() {
        return false;
    }
    if chars.len() >= 3 && is_alphabet_run(&chars) {
        return true;
    }
    if chars.len() >= MIN_KEYBOARD_FRAGMENT && is_keyboard_sequence(word) {
        return true;
    }
    if chars.len() >= MIN_VOWEL_RATIO_LEN && vowel_ratio(&chars) < config.vowel_ratio_threshold {
        return true;
    }
    longest_consonant_run(&chars) >= config.consonant_run
}

/// Share of vowels among letters; `y` counts only when no other vowel is present.
pub fn vowel_ratio(chars: &[char]) -> f64 {
    let letters = chars.iter().filter(|c| c.is_ascii_alphabetic()).count();
    if letters == 0 {
        return 0.0;
    }
    let vowels = chars.iter().filter(|c| "aeiou".contains(**c)).count();
    let vowels = if vowels == 0 {
        chars.iter().filter(|c| **c == 'y').count()
    } else {
        vowels
    };
    vowels as f64 / letters as f64
}

/// Longest run of consonants; `y` is a vowel when no other vowel is present.
fn longest_consonant_run(chars: &[char]) -> usize {
    let vowels = if chars.iter().any(|c| "aeiou".contains(*c)) {
        "aeiou"
    } else {
        "aeiouy"
    };
    let mut longest = 0;
    let mut current = 0;
    for c in chars {
        if c.is_ascii_alphabetic() && !vowels.contains(*c) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

fn run_lengths(chars: &[char]) -> Vec<usize> {
    let mut runs = Vec::new();
    let mut iter = chars.iter().peekable();
    while let Some(c) = iter.next() {
        let mut len = 1;
        while iter.peek() == Some(&c) {
            iter.next();
            len += 1;
        }
        runs.push(len);
    }
    runs
}

fn is_alternating(chars: &[char]) -> bool {
    let (a, b) = (chars[0], chars[1]);
    a != b
        && chars
            .iter()
            .enumerate()
            .all(|(i, c)| *c == if i % 2 == 0 { a } else { b })
}

fn is_alphabet_run(chars: &[char]) -> bool {
    chars.windows(2).all(|w| (w[0] as u32) + 1 == w[1] as u32)
}

/// Letters around a single digit run, as in "b2b" or "g2g".
fn is_acronym(token: &str) -> bool {
    token.chars().count() <= MAX_ACRONYM_LEN
        && token.chars().next().is_some_and(|c| c.is_alphabetic())
        && token.chars().last().is_some_and(|c| c.is_alphabetic())
        && class_transitions(token) == 2
}

fn class_transitions(token: &str) -> usize {
    let classes: Vec<bool> = token.chars().map(|c| c.is_ascii_digit()).collect();
    classes.windows(2).filter(|w| w[0] != w[1]).count()
}

/// Whether `word` splits entirely into keyboard fragments of at least three keys.
fn is_keyboard_sequence(word: &str) -> bool {
    let mut rest = word;
    while !rest.is_empty() {
        let best = KEYBOARD_LINES
            .iter()
            .map(|line| longest_prefix_in(rest, line))
            .max()
            .unwrap_or(0);
        if best < MIN_KEYBOARD_FRAGMENT {
            return false;
        }
        rest = &rest[best..];
    }
    true
}

fn longest_prefix_in(rest: &str, line: &str) -> usize {
    (1..=rest.len())
        .take_while(|&k| line.contains(&rest[..k]))
        .last()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gibberish(text: &str) -> bool {
        is_gibberish(&NormalizedText::new(text), &ClassifierConfig::default())
    }

    #[test]
    fn test_keyboard_mashes() {
        for text in [
            "asdf",
            "qwerty",
            "zxcvbnm",
            "asdfasdfasdf",
            "qweqweqwe",
            "dfghj",
            "poiuyt",
            "mnbvcx",
            "qazwsx",
            "qweasdzxc",
        ] {
            assert!(gibberish(text), "expected gibberish: {}", text);
        }
    }

    #[test]
    fn test_repeats_and_patterns() {
        for text in ["aaaaa", "zzzzz", "fjfjfjfj", "dkdkdkdk", "aaabbbccc", "abcdefg", "AbCdEfG", "xyz"] {
            assert!(gibberish(text), "expected gibberish: {}", text);
        }
    }

    #[test]
    fn test_vowel_poor_tokens() {
        for text in ["bcdfgh", "qwrtpsdfgh", "xzywrtk"] {
            assert!(gibberish(text), "expected gibberish: {}", text);
        }
    }

    #[test]
    fn test_digits_and_punctuation() {
        for text in ["123456", "123456789", "!@#$%", "....", "???!!!", "a1b2c3d4", "zxc123zxc", "asdlkj123", "111aaa222bbb"] {
            assert!(gibberish(text), "expected gibberish: {}", text);
        }
    }

    #[test]
    fn test_mixed_noise() {
        assert!(gibberish("qwe!@#"));
        assert!(gibberish("!@#qwe!@#"));
        assert!(gibberish("a s d f"));
        assert!(gibberish("hello asdf"));
    }

    #[test]
    fn test_y_only_words_are_not_gibberish() {
        for text in ["why", "try", "fly", "sky", "gym", "rhythm", "rhythms", "myths"] {
            assert!(!gibberish(text), "expected not gibberish: {}", text);
        }
    }

    #[test]
    fn test_real_sentences_are_not_gibberish() {
        for text in [
            "I think AMG is important",
            "The concept map shows relationships",
            "I think AMG blocks entry via regulatory barriers",
            "qwerty is my password",
            "Financing costs rose 500 000 euros in 2024",
            "covid19 slowed market entry",
            "Strengths",
            "SMBs",
            "hmmm",
            "B2B markets",
            "P2P networks",
            "G2G partners",
        ] {
            assert!(!gibberish(text), "expected not gibberish: {}", text);
        }
    }

    #[test]
    fn test_short_tokens_are_not_judged() {
        assert!(!gibberish("ok"));
        assert!(!gibberish("hmm"));
        assert!(!gibberish(""));
    }

    #[test]
    fn test_consonant_run_treats_lone_y_as_vowel() {
        let rhythm: Vec<char> = "rhythm".chars().collect();
        assert_eq!(longest_consonant_run(&rhythm), 3);
        let strengths: Vec<char> = "strengths".chars().collect();
        assert_eq!(longest_consonant_run(&strengths), 5);
    }

    #[test]
    fn test_acronyms_are_not_interleave_noise() {
        let config = ClassifierConfig::default();
        for token in ["b2b", "p2p", "b2c"] {
            assert!(!is_gibberish_token(token, &config), "unexpected gibberish: {}", token);
        }
        assert!(is_gibberish_token("a1b2c3", &config));
        assert!(is_gibberish_token("zxc123zxc", &config));
    }

    #[test]
    fn test_vowel_ratio_y_rule() {
        let why: Vec<char> = "why".chars().collect();
        assert!((vowel_ratio(&why) - 1.0 / 3.0).abs() < 1e-9);
        let yes: Vec<char> = "yes".chars().collect();
        assert!((vowel_ratio(&yes) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_is_configurable() {
        let strict = ClassifierConfig {
            vowel_ratio_threshold: 0.3,
            ..Default::default()
        };
        // "blocks" has a vowel ratio of 1/6.
        assert!(is_gibberish_token("blocks", &strict));
        assert!(!is_gibberish_token("blocks", &ClassifierConfig::default()));
    }
}
