//! Curated word lists and marker patterns used by the classification rules.
//!
//! All patterns run against lowercased text with typographic apostrophes
//! already folded to `'`.

use std::sync::LazyLock;

use regex::Regex;

use super::normalize::NormalizedText;

/// Words that open an interrogative sentence.
pub const INTERROGATIVES: &[&str] = &[
    "what", "what's", "whats", "why", "how", "how's", "when", "where", "where's", "who", "who's",
    "whom", "whose", "which", "can", "could", "would", "should", "shall", "will", "is", "isn't",
    "are", "aren't", "do", "does", "doesn't", "did", "didn't", "was", "were", "may", "might", "am",
    "explain", "tell",
];

/// Bare acknowledgements treated as minimal input rather than content.
pub const ACKNOWLEDGEMENTS: &[&str] = &[
    "ok", "okay", "k", "kk", "yes", "yeah", "yep", "yup", "no", "nope", "nah", "sure", "fine",
    "alright", "right", "hmm", "hm", "mhm", "mm", "i see", "got it", "thanks", "thank you", "cool",
    "nice", "maybe", "idk",
];

/// Correctly spelled words whose vowel ratio falls below the gibberish threshold.
pub const VOWEL_POOR_WORDS: &[&str] = &[
    "strength", "strengths", "length", "lengths", "width", "widths", "depth", "depths", "twelfth",
    "twelfths", "eighth", "eighths", "rhythm", "rhythms", "angst", "crypt", "crypts", "glyph",
    "glyphs", "lymph", "nymph", "nymphs", "psych", "tryst",
];

/// Task-domain keyword stems for the market-entry / AMG concept-mapping task.
///
/// Single words match any token starting with the stem; entries containing a
/// space match as a phrase.
pub const DEFAULT_DOMAIN_KEYWORDS: &[&str] = &[
    "amg",
    "gatekeep",
    "market",
    "entry",
    "entries",
    "strateg",
    "barrier",
    "financ",
    "funding",
    "invest",
    "resource",
    "legal",
    "regulat",
    "network",
    "startup",
    "veyra",
    "joint venture",
    "export",
    "licens",
    "franchis",
    "competit",
    "international",
    "foreign",
    "partner",
    "allianc",
    "subsidiar",
    "adapt",
    "customer",
    "government",
    "policy",
    "policies",
    "protectionis",
    "tariff",
    "incumbent",
    "acquisition",
    "merger",
];

/// Drawn-out hesitation sounds such as "hmmm" or "ummm".
pub(crate) static FILLER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(h+m+|m+h?m+|u+m+|u+h+|e+r+m+)$").expect("Invalid regex: filler")
});

pub(crate) static INAPPROPRIATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(fuck\w*|shit\w*|damn\w*|crap|crappy|bitch\w*|bastard\w*|asshole\w*|idiot\w*|stupid\w*|dumb\w*|moron\w*|shut up|sucks?|wtf|stfu|piss(ed)? off|useless|screw (you|this))\b",
    )
    .expect("Invalid regex: inappropriate")
});

pub(crate) static INTERFACE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(nodes?|edges?|delete|deleting|remove|button|map|canvas|click|drag|arrows?|links?|labels?|tool|interface|undo|save|submit|zoom|create|add|connect|rename|edit|move|finish round|next round)\b",
    )
    .expect("Invalid regex: interface")
});

pub(crate) static CHIT_CHAT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(weather|sports?|football|soccer|basketball|baseball|games?|movies?|films?|music|songs?|lunch|dinner|breakfast|weekend|holidays?|vacation|birthday|party|netflix|tv|television|celebrit(y|ies)|something else|jokes?|instagram|tiktok|youtube|last night)\b",
    )
    .expect("Invalid regex: chit-chat")
});

pub(crate) static STRUCTURE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(organi[sz]\w*|structur\w*|layout|arrang\w*|position\w*|order|hierarch\w*|group\w*)\b")
        .expect("Invalid regex: structure")
});

pub(crate) static DISAGREEMENT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"\b(disagree\w*|don't agree|dont agree|do not agree)\b")
            .expect("Invalid regex: disagree"),
        Regex::new(r"\b(not right|not correct|not true|that's wrong|thats wrong|you're wrong|that is wrong)\b")
            .expect("Invalid regex: not right"),
        Regex::new(r"\b(i don't think|i dont think|i do not think|i think differently|i see it differently)\b")
            .expect("Invalid regex: i don't think"),
        Regex::new(r"^(no|nope|nah),?\s+but\b").expect("Invalid regex: no but"),
        Regex::new(r"^(no|nope|nah)\s*!+$").expect("Invalid regex: no!"),
    ]
});

pub(crate) static FRUSTRATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"\b(too|so|very|really|quite|extremely)\s+(hard|difficult|complicated|complex|confusing)\b")
            .expect("Invalid regex: too hard"),
        Regex::new(r"\b(this|it)('s|\s+is)\s+(hard|difficult|impossible|overwhelming|confusing)\b")
            .expect("Invalid regex: this is hard"),
        Regex::new(r"\b(hard|difficult)\s+(for me|to understand|to do)\b")
            .expect("Invalid regex: hard for me"),
        Regex::new(r"\b(overwhelm\w*|struggl\w*|frustrat\w*|confused)\b")
            .expect("Invalid regex: affect"),
        Regex::new(r"\b(don't|dont|do not)\s+(get|understand)\s+(it|this|anything)\b")
            .expect("Invalid regex: don't get it"),
        Regex::new(r"\b(give up|giving up|i'm lost|im lost|i'm stuck|im stuck|can't do (this|it)|cant do (this|it))\b")
            .expect("Invalid regex: give up"),
    ]
});

pub(crate) static CLOSURE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"\b(i'm|im|i am)\s+(done|finished)\b").expect("Invalid regex: i'm done"),
        Regex::new(r"\b(that's|thats|that is)\s+(all|it)\b").expect("Invalid regex: that's all"),
        Regex::new(r"\b(can't|cant|cannot)\s+think\s+of\s+anything\s*(more|else)?\b")
            .expect("Invalid regex: can't think"),
        Regex::new(r"\b(nothing (more|else) to (add|say)|no more ideas|i have nothing (more|else))\b")
            .expect("Invalid regex: nothing more"),
        Regex::new(r"\b(let's|lets)\s+(stop|finish|end)\b|\bi want to (stop|finish|end|quit)\b")
            .expect("Invalid regex: let's stop"),
        Regex::new(r"\b(end|finish)\s+(the|this)\s+(round|conversation|session)\b")
            .expect("Invalid regex: end round"),
    ]
});

pub(crate) static REASONING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(because|since|i think|i believe|i feel that|i guess|in my (understanding|view|opinion)|depends on|leads? to|results? in|causes?|therefore|which means|this means|so that|due to|as a result|affects?|influences?)\b",
    )
    .expect("Invalid regex: reasoning")
});

/// Any of `patterns` matches `text`.
pub(crate) fn any_match(patterns: &[Regex], text: &str) -> bool {
    patterns.iter().any(|p| p.is_match(text))
}

/// Domain keyword lexicon with optional configured extensions.
#[derive(Debug, Clone)]
pub struct DomainLexicon {
    stems: Vec<String>,
    phrases: Vec<String>,
}

impl DomainLexicon {
    /// Built-in lexicon plus `extra` entries.
    pub fn new<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stems = Vec::new();
        let mut phrases = Vec::new();
        let entries = DEFAULT_DOMAIN_KEYWORDS
            .iter()
            .map(|s| s.to_string())
            .chain(extra.into_iter().map(|s| s.as_ref().trim().to_lowercase()));
        for entry in entries.filter(|e| !e.is_empty()) {
            let bucket = if entry.contains(' ') {
                &mut phrases
            } else {
                &mut stems
            };
            if !bucket.contains(&entry) {
                bucket.push(entry);
            }
        }
        Self { stems, phrases }
    }

    /// Domain keywords found in the text, in order of first appearance.
    pub fn keywords(&self, text: &NormalizedText) -> Vec<String> {
        let mut found: Vec<(usize, String)> = Vec::new();
        for (position, token) in text.tokens.iter().enumerate() {
            if self.stems.iter().any(|stem| token.starts_with(stem.as_str()))
                && !found.iter().any(|(_, t)| t == token)
            {
                found.push((position, token.clone()));
            }
        }
        for phrase in &self.phrases {
            if let Some(offset) = text.lower.find(phrase.as_str()) {
                // Approximate the phrase position by the token count before it.
                let position = text.lower[..offset].split_whitespace().count();
                found.push((position, phrase.clone()));
            }
        }
        found.sort_by_key(|(position, _)| *position);
        found.into_iter().map(|(_, keyword)| keyword).collect()
    }

    /// Number of entries in the lexicon.
    pub fn len(&self) -> usize {
        self.stems.len() + self.phrases.len()
    }

    /// Whether the lexicon is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DomainLexicon {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>())
    }
}
