//! Static lexicons and the known-source table
//!
//! All terms are lowercase; matching is plain substring containment
//! against lowercased text.

use crate::types::Bias;

// =========================================================================
// Left-leaning terminology
// =========================================================================
pub const LEFT_TERMS: &[&str] = &[
    "progressive",
    "equality",
    "climate change",
    "healthcare for all",
    "social justice",
    "tax the rich",
    "medicare for all",
    "green new deal",
];

// =========================================================================
// Right-leaning terminology
// =========================================================================
pub const RIGHT_TERMS: &[&str] = &[
    "conservative",
    "freedom",
    "security",
    "tradition",
    "law and order",
    "tax cuts",
    "second amendment",
    "border security",
];

// =========================================================================
// Emotionally charged terms
// =========================================================================
pub const EMOTIONAL_TERMS: &[&str] = &[
    "outrageous",
    "devastating",
    "brilliant",
    "failed",
    "shocking",
    "amazing",
    "terrible",
    "wonderful",
    "disgraceful",
    "fantastic",
];

/// A publication with a known lean
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownSource {
    pub name: &'static str,
    pub bias: Bias,
    pub reliability: u8,
}

/// Checked in order, first match wins
pub const KNOWN_SOURCES: &[KnownSource] = &[
    KnownSource { name: "CNN", bias: Bias::Left, reliability: 75 },
    KnownSource { name: "Fox News", bias: Bias::Right, reliability: 70 },
    KnownSource { name: "BBC", bias: Bias::Neutral, reliability: 85 },
    KnownSource { name: "Reuters", bias: Bias::Neutral, reliability: 90 },
    KnownSource { name: "Associated Press", bias: Bias::Neutral, reliability: 88 },
    KnownSource { name: "New York Times", bias: Bias::Left, reliability: 80 },
    KnownSource { name: "Wall Street Journal", bias: Bias::Right, reliability: 82 },
];

/// Terms from `lexicon` present in `lower`, in lexicon order
pub fn matched_terms(lexicon: &[&'static str], lower: &str) -> Vec<&'static str> {
    lexicon.iter().copied().filter(|t| lower.contains(t)).collect()
}

/// True if any term from `lexicon` is present in `lower`
pub fn contains_any(lexicon: &[&str], lower: &str) -> bool {
    lexicon.iter().any(|t| lower.contains(t))
}

/// First known source named in `lower`
pub fn detect_source(lower: &str) -> Option<&'static KnownSource> {
    KNOWN_SOURCES
        .iter()
        .find(|s| lower.contains(&s.name.to_lowercase()))
}

/// True if `word` belongs to any of the three lexicons
pub fn is_trigger_term(word: &str) -> bool {
    LEFT_TERMS.contains(&word) || RIGHT_TERMS.contains(&word) || EMOTIONAL_TERMS.contains(&word)
}
