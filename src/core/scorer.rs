//! Heuristic bias scorer: keyword-driven stand-in for a real model
//!
//! Counts distinct left/right/emotional lexicon terms, derives the bias
//! label and score from them, annotates matching sentences and builds the
//! emotional tone. All randomness comes from the caller's `Rng`.

use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;
use tracing::debug;

use crate::core::lexicon::{self, EMOTIONAL_TERMS, LEFT_TERMS, RIGHT_TERMS};
use crate::types::{AnalysisResult, Bias, EmotionalTone, SentenceHighlight, SourceInfo};
use crate::{
    BIAS_SCORE_MAX, BIAS_SCORE_MIN, CONFIDENCE_LEANING_BASE, CONFIDENCE_LEANING_CAP,
    CONFIDENCE_LEANING_STEP, CONFIDENCE_NEUTRAL_BASE, CONFIDENCE_NEUTRAL_FLOOR,
    CONFIDENCE_NEUTRAL_STEP, INTENSITY_MAX, INTENSITY_MIN, MAX_HIGHLIGHTED_WORDS, NEUTRAL_JITTER,
    SCORE_BASE, SCORE_FLOOR_LEANING, SCORE_STEP_PER_TERM, TONE_ANGER_CAP, TONE_FEAR_CAP,
    TONE_JOY_CAP, TONE_NEUTRAL_FLOOR,
};

lazy_static! {
    /// Runs of terminal punctuation end a sentence
    static ref RE_SENTENCE_END: Regex = Regex::new(r"[.!?]+").unwrap();
}

/// Lexicon terms found in a text, each list in lexicon order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermHits {
    pub left: Vec<&'static str>,
    pub right: Vec<&'static str>,
    pub emotional: Vec<&'static str>,
}

impl TermHits {
    /// Find all distinct lexicon terms in `text` (case-insensitive)
    pub fn find(text: &str) -> Self {
        let lower = text.to_lowercase();
        Self {
            left: lexicon::matched_terms(LEFT_TERMS, &lower),
            right: lexicon::matched_terms(RIGHT_TERMS, &lower),
            emotional: lexicon::matched_terms(EMOTIONAL_TERMS, &lower),
        }
    }

    /// Left terms followed by right terms
    pub fn bias_terms(&self) -> Vec<&'static str> {
        self.left.iter().chain(self.right.iter()).copied().collect()
    }
}

/// Heuristic bias scorer
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicScorer;

impl HeuristicScorer {
    /// Create new scorer
    pub fn new() -> Self {
        Self
    }

    /// Analyze using the thread-local random source
    pub fn analyze(&self, text: &str) -> AnalysisResult {
        self.analyze_with_rng(text, &mut rand::rng())
    }

    /// Analyze drawing all jitter from `rng`; a seeded source gives
    /// reproducible output (apart from the timestamp)
    pub fn analyze_with_rng<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> AnalysisResult {
        let hits = TermHits::find(text);
        let left = hits.left.len() as i32;
        let right = hits.right.len() as i32;
        let emotional = hits.emotional.len() as i32;

        let (bias, bias_score, confidence) = if left > right {
            (
                Bias::Left,
                (-SCORE_BASE - SCORE_STEP_PER_TERM * left).min(-SCORE_FLOOR_LEANING),
                (CONFIDENCE_LEANING_BASE + CONFIDENCE_LEANING_STEP * left).min(CONFIDENCE_LEANING_CAP),
            )
        } else if right > left {
            (
                Bias::Right,
                (SCORE_BASE + SCORE_STEP_PER_TERM * right).max(SCORE_FLOOR_LEANING),
                (CONFIDENCE_LEANING_BASE + CONFIDENCE_LEANING_STEP * right).min(CONFIDENCE_LEANING_CAP),
            )
        } else {
            (
                Bias::Neutral,
                rng.random_range(-NEUTRAL_JITTER..=NEUTRAL_JITTER),
                (CONFIDENCE_NEUTRAL_BASE - CONFIDENCE_NEUTRAL_STEP * emotional).max(CONFIDENCE_NEUTRAL_FLOOR),
            )
        };
        let bias_score = bias_score.clamp(BIAS_SCORE_MIN, BIAS_SCORE_MAX);
        let confidence = confidence.clamp(0, 100) as u8;

        debug!(
            left,
            right,
            emotional,
            bias = %bias,
            bias_score,
            "term counts scored"
        );

        let sentence_highlights = highlight_sentences(text, rng);

        let source_detection = match lexicon::detect_source(&text.to_lowercase()) {
            Some(src) => SourceInfo::detected(src.name, src.bias, src.reliability),
            None => SourceInfo::not_detected(),
        };

        let emotional_tone = emotional_tone(hits.emotional.len(), bias, rng);

        let bias_terms = hits.bias_terms();
        let highlighted_words: Vec<String> = hits
            .emotional
            .iter()
            .chain(bias_terms.iter())
            .take(MAX_HIGHLIGHTED_WORDS)
            .map(|w| w.to_string())
            .collect();

        let explanation = explain(bias, bias_score, &bias_terms, &hits.emotional, &source_detection);
        let summary = summarize(bias);

        let id = uuid::Builder::from_random_bytes(rng.random()).into_uuid().to_string();

        AnalysisResult {
            bias,
            bias_score,
            confidence,
            explanation,
            emotional_tone,
            highlighted_words,
            sentence_highlights,
            summary,
            source_detection: Some(source_detection),
            timestamp: chrono::Utc::now(),
            id,
        }
    }
}

/// Tracks the char offset for a byte offset that only moves forward
struct CharCursor<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, byte: 0, chars: 0 }
    }

    /// Char offset of `byte`, which must not be behind the last call
    fn advance_to(&mut self, byte: usize) -> usize {
        self.chars += self.text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}

/// Sentence fragments as (byte start, trimmed text), empty ones dropped
fn split_sentences(text: &str) -> Vec<(usize, &str)> {
    let mut fragments = Vec::new();
    let mut start = 0;
    let ends = RE_SENTENCE_END
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .chain(std::iter::once((text.len(), text.len())));

    for (frag_end, next_start) in ends {
        let fragment = &text[start..frag_end];
        let trimmed = fragment.trim();
        if !trimmed.is_empty() {
            let lead = fragment.len() - fragment.trim_start().len();
            fragments.push((start + lead, trimmed));
        }
        start = next_start;
    }
    fragments
}

/// Annotate every sentence containing a trigger term
fn highlight_sentences<R: Rng + ?Sized>(text: &str, rng: &mut R) -> Vec<SentenceHighlight> {
    let mut cursor = CharCursor::new(text);
    let mut highlights = Vec::new();

    for (byte_start, sentence) in split_sentences(text) {
        let lower = sentence.to_lowercase();
        let label = if lexicon::contains_any(LEFT_TERMS, &lower) {
            Bias::Left
        } else if lexicon::contains_any(RIGHT_TERMS, &lower) {
            Bias::Right
        } else if lexicon::contains_any(EMOTIONAL_TERMS, &lower) {
            Bias::Neutral
        } else {
            continue;
        };

        let start_index = cursor.advance_to(byte_start);
        let end_index = cursor.advance_to(byte_start + sentence.len());
        highlights.push(SentenceHighlight {
            text: sentence.to_string(),
            bias: label,
            start_index,
            end_index,
            intensity: rng.random_range(INTENSITY_MIN..INTENSITY_MAX),
        });
    }
    highlights
}

/// Jittered tone, rebalanced to sum to exactly 100
fn emotional_tone<R: Rng + ?Sized>(emotional: usize, bias: Bias, rng: &mut R) -> EmotionalTone {
    let base = 5 * emotional as u32;
    let anger = (base + rng.random_range(0..15)).min(TONE_ANGER_CAP as u32);
    let fear = (base * 7 / 10 + rng.random_range(0..12)).min(TONE_FEAR_CAP as u32);
    let joy_bonus = if bias == Bias::Neutral { 10 } else { 5 };
    let joy = (rng.random_range(0..20) + joy_bonus).min(TONE_JOY_CAP as u32);
    balance_tone(anger, fear, joy)
}

/// Fill `neutral` so the total is 100. If that would push `neutral` under
/// its floor, the other three share the remaining points by largest
/// remainder.
pub(crate) fn balance_tone(anger: u32, fear: u32, joy: u32) -> EmotionalTone {
    let budget = 100 - TONE_NEUTRAL_FLOOR as u32;
    let sum = anger + fear + joy;
    if sum <= budget {
        return EmotionalTone {
            anger: anger as u8,
            fear: fear as u8,
            joy: joy as u8,
            neutral: (100 - sum) as u8,
        };
    }

    let parts = [anger, fear, joy];
    let mut shares = parts.map(|p| p * budget / sum);
    let mut order = [0usize, 1, 2];
    order.sort_by_key(|&i| std::cmp::Reverse(parts[i] * budget % sum));
    let leftover = budget - shares.iter().sum::<u32>();
    for &i in order.iter().take(leftover as usize) {
        shares[i] += 1;
    }

    EmotionalTone {
        anger: shares[0] as u8,
        fear: shares[1] as u8,
        joy: shares[2] as u8,
        neutral: TONE_NEUTRAL_FLOOR,
    }
}

fn explain(
    bias: Bias,
    score: i32,
    bias_terms: &[&str],
    emotional_terms: &[&str],
    source: &SourceInfo,
) -> String {
    let mut parts = vec![format!(
        "The text shows {} bias (score: {}) through {} and {}.",
        bias.lowercase(),
        score,
        if bias_terms.is_empty() { "language patterns" } else { "political terminology" },
        if emotional_terms.is_empty() { "neutral tone" } else { "emotional framing" },
    )];

    if !bias_terms.is_empty() {
        parts.push(format!("Key indicators include: {}.", first_three(bias_terms)));
    }
    if emotional_terms.is_empty() {
        parts.push("The text maintains a relatively neutral emotional tone.".to_string());
    } else {
        parts.push(format!("Emotional language detected: {}.", first_three(emotional_terms)));
    }
    if let (Some(name), Some(lean)) = (&source.source_name, source.known_bias) {
        parts.push(format!("Source bias detected: {} typically leans {}.", name, lean));
    }

    parts.join(" ")
}

fn first_three(terms: &[&str]) -> String {
    terms.iter().take(3).copied().collect::<Vec<_>>().join(", ")
}

fn summarize(bias: Bias) -> String {
    match bias {
        Bias::Neutral => "The text maintains a balanced perspective on the topic discussed.".to_string(),
        lean => format!(
            "A more balanced approach would present multiple viewpoints and avoid {}-leaning terminology, focusing on factual reporting rather than opinion-based framing.",
            lean.lowercase()
        ),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn test_empty_input() {
        let result = HeuristicScorer::new().analyze_with_rng("", &mut seeded(1));
        assert_eq!(result.bias, Bias::Neutral);
        assert!(result.sentence_highlights.is_empty());
        assert!(result.highlighted_words.is_empty());
        assert!((-10..=10).contains(&result.bias_score));
        assert_eq!(result.confidence, 90);
    }

    #[test]
    fn test_left_scenario() {
        let text = "The progressive healthcare for all plan is brilliant.";
        let result = HeuristicScorer::new().analyze_with_rng(text, &mut seeded(7));
        assert_eq!(result.bias, Bias::Left);
        assert_eq!(result.bias_score, -26);
        assert_eq!(result.confidence, 70);
        assert_eq!(
            result.highlighted_words,
            vec!["brilliant", "progressive", "healthcare for all"]
        );
        assert_eq!(result.sentence_highlights.len(), 1);
        assert_eq!(result.sentence_highlights[0].bias, Bias::Left);
    }

    #[test]
    fn test_right_scenario_with_source() {
        let text = "Reuters reports on border security and tax cuts.";
        let result = HeuristicScorer::new().analyze_with_rng(text, &mut seeded(7));
        assert_eq!(result.bias, Bias::Right);
        // security, tax cuts, border security
        assert_eq!(result.bias_score, 34);
        assert_eq!(result.confidence, 75);

        let source = result.source_detection.unwrap();
        assert!(source.detected);
        assert_eq!(source.source_name.as_deref(), Some("Reuters"));
        assert_eq!(source.known_bias, Some(Bias::Neutral));
        assert_eq!(source.reliability, Some(90));
        assert!(result.explanation.contains("Reuters typically leans Neutral"));
    }

    #[test]
    fn test_tie_is_neutral() {
        let text = "Equality and freedom.";
        let result = HeuristicScorer::new().analyze_with_rng(text, &mut seeded(3));
        assert_eq!(result.bias, Bias::Neutral);
        assert!((-10..=10).contains(&result.bias_score));
    }

    #[test]
    fn test_no_keywords_neutral() {
        let text = "The committee met on Tuesday. Minutes were recorded.";
        for seed in 0..50 {
            let result = HeuristicScorer::new().analyze_with_rng(text, &mut seeded(seed));
            assert_eq!(result.bias, Bias::Neutral);
            assert!((-10..=10).contains(&result.bias_score));
            assert!(result.confidence >= 70);
            assert!(result.sentence_highlights.is_empty());
            assert_eq!(result.summary, summarize(Bias::Neutral));
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let text = "A shocking failure. Tradition matters! Is climate change real?";
        let scorer = HeuristicScorer::new();
        let mut a = scorer.analyze_with_rng(text, &mut seeded(42));
        let b = scorer.analyze_with_rng(text, &mut seeded(42));
        a.timestamp = b.timestamp;
        assert_eq!(a, b);
    }

    #[test]
    fn test_sentence_labels_follow_priority() {
        let text = "Tradition and equality. Law and order now! What a terrible day? Nothing here.";
        let result = HeuristicScorer::new().analyze_with_rng(text, &mut seeded(5));
        let labels: Vec<Bias> = result.sentence_highlights.iter().map(|h| h.bias).collect();
        assert_eq!(labels, vec![Bias::Left, Bias::Right, Bias::Neutral]);
        for h in &result.sentence_highlights {
            assert!((30..70).contains(&h.intensity));
        }
    }

    #[test]
    fn test_offsets_match_original_text() {
        let text = "  First, tax cuts.   Then a  wonderful   plan!";
        let result = HeuristicScorer::new().analyze_with_rng(text, &mut seeded(9));
        let chars: Vec<char> = text.chars().collect();
        for h in &result.sentence_highlights {
            let span: String = chars[h.start_index..h.end_index].iter().collect();
            assert_eq!(span, h.text);
        }
        assert_eq!(result.sentence_highlights[0].start_index, 2);
    }

    #[test]
    fn test_duplicate_sentences_get_distinct_offsets() {
        let text = "Freedom matters. Freedom matters.";
        let result = HeuristicScorer::new().analyze_with_rng(text, &mut seeded(9));
        assert_eq!(result.sentence_highlights.len(), 2);
        assert_eq!(result.sentence_highlights[0].start_index, 0);
        assert_eq!(result.sentence_highlights[1].start_index, 17);
        assert_eq!(result.sentence_highlights[1].end_index, 32);
    }

    #[test]
    fn test_offsets_are_char_based() {
        let text = "Café talk. Équipe for social justice.";
        let result = HeuristicScorer::new().analyze_with_rng(text, &mut seeded(2));
        let h = &result.sentence_highlights[0];
        assert_eq!(h.text, "Équipe for social justice");
        assert_eq!(h.start_index, 11);
        assert_eq!(h.end_index, 11 + h.text.chars().count());
        assert!(h.end_index <= text.chars().count());
    }

    #[test]
    fn test_highlighted_words_capped() {
        let text = "outrageous devastating brilliant failed shocking amazing terrible \
                    wonderful disgraceful fantastic progressive equality";
        let result = HeuristicScorer::new().analyze_with_rng(text, &mut seeded(0));
        assert_eq!(result.highlighted_words.len(), MAX_HIGHLIGHTED_WORDS);
        assert!(result.highlighted_words.iter().all(|w| lexicon::is_trigger_term(w)));
    }

    #[test]
    fn test_tone_always_sums_to_100() {
        let texts = [
            "",
            "Plain words only.",
            "outrageous devastating brilliant failed shocking amazing terrible wonderful disgraceful fantastic",
            "Brilliant progressive equality.",
        ];
        for text in texts {
            for seed in 0..200 {
                let result = HeuristicScorer::new().analyze_with_rng(text, &mut seeded(seed));
                assert_eq!(result.emotional_tone.total(), 100, "text={:?} seed={}", text, seed);
            }
        }
    }

    #[test]
    fn test_balance_tone_keeps_small_values() {
        let tone = balance_tone(10, 5, 20);
        assert_eq!(tone, EmotionalTone { anger: 10, fear: 5, joy: 20, neutral: 65 });
    }

    #[test]
    fn test_balance_tone_rescales_overflow() {
        // 45 + 35 + 30 = 110 > 85
        let tone = balance_tone(45, 35, 30);
        assert_eq!(tone.neutral, 15);
        assert_eq!(tone.total(), 100);
        assert!(tone.anger >= tone.fear && tone.fear >= tone.joy);
    }

    #[test]
    fn test_split_sentences_drops_empty_fragments() {
        let parts: Vec<&str> = split_sentences("One... two?! ?  three").into_iter().map(|(_, s)| s).collect();
        assert_eq!(parts, vec!["One", "two", "three"]);
    }
}
