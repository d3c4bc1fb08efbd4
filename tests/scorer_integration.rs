//! Integration tests for the heuristic scorer
//!
//! Properties that must hold for every input, plus the documented scenarios

use biaslens::core::lexicon::is_trigger_term;
use biaslens::core::{HeuristicScorer, TermHits};
use biaslens::types::{AnalysisResult, Bias};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

const CORPUS: &[&str] = &[
    "",
    "   ",
    "No punctuation at all but plenty of freedom",
    "The progressive healthcare for all plan is brilliant.",
    "Reuters reports on border security and tax cuts.",
    "CNN says the green new deal is amazing! Fox News calls it a failed, outrageous idea?",
    "Tradition. Tradition. Tradition.",
    "Social justice and equality... Law and order!!! Second amendment???",
    "Terrible. Wonderful. Shocking. Fantastic. Disgraceful. Devastating.",
    "Über-progressive Café policy - climate change is débated. Naïve security.",
    "!!!???...",
    "The committee met on Tuesday. Minutes were recorded.",
];

fn analyze(text: &str, seed: u64) -> AnalysisResult {
    HeuristicScorer::new().analyze_with_rng(text, &mut StdRng::seed_from_u64(seed))
}

/// Score, confidence, tone, offsets and highlighted words stay in bounds
#[test]
fn test_invariants_hold_across_corpus() {
    for text in CORPUS {
        let len = text.chars().count();
        for seed in 0..25 {
            let result = analyze(text, seed);

            assert!((-100..=100).contains(&result.bias_score), "{:?}", text);
            assert!(result.confidence <= 100);
            assert_eq!(result.emotional_tone.total(), 100, "{:?} seed={}", text, seed);

            assert!(result.highlighted_words.len() <= 8);
            assert!(result.highlighted_words.iter().all(|w| is_trigger_term(w)));

            let mut last_start = 0;
            for h in &result.sentence_highlights {
                assert!(h.start_index <= h.end_index);
                assert!(h.end_index <= len);
                assert!(h.start_index >= last_start, "highlights must be in text order");
                assert!((30..70).contains(&h.intensity));
                last_start = h.start_index;
            }
        }
    }
}

/// Label follows left vs right term counts
#[test]
fn test_bias_follows_counts() {
    for text in CORPUS {
        let hits = TermHits::find(text);
        let result = analyze(text, 1);
        let expected = if hits.left.len() > hits.right.len() {
            Bias::Left
        } else if hits.right.len() > hits.left.len() {
            Bias::Right
        } else {
            Bias::Neutral
        };
        assert_eq!(result.bias, expected, "{:?}", text);
    }
}

#[test]
fn test_left_scenario() {
    let result = analyze("The progressive healthcare for all plan is brilliant.", 0);
    let hits = TermHits::find("The progressive healthcare for all plan is brilliant.");
    assert!(hits.left.len() >= 2);
    assert_eq!(hits.emotional, vec!["brilliant"]);
    assert_eq!(result.bias, Bias::Left);
    assert!(result.bias_score <= -20);
}

#[test]
fn test_right_scenario_with_reuters() {
    let result = analyze("Reuters reports on border security and tax cuts.", 0);
    assert_eq!(result.bias, Bias::Right);
    let source = result.source_detection.expect("source record");
    assert!(source.detected);
    assert_eq!(source.source_name.as_deref(), Some("Reuters"));
    assert_eq!(source.known_bias, Some(Bias::Neutral));
    assert_eq!(source.reliability, Some(90));
}

#[test]
fn test_empty_scenario() {
    let result = HeuristicScorer::new().analyze("");
    assert_eq!(result.bias, Bias::Neutral);
    assert!(result.sentence_highlights.is_empty());
    assert!(result.highlighted_words.is_empty());
    assert_eq!(result.source_detection.map(|s| s.detected), Some(false));
}

#[test]
fn test_no_keyword_scenario() {
    for seed in 0..100 {
        let result = analyze("The committee met on Tuesday. Minutes were recorded.", seed);
        assert_eq!(result.bias, Bias::Neutral);
        assert!((-10..=10).contains(&result.bias_score));
        assert!(result.confidence >= 70);
    }
}

#[test]
fn test_unseeded_calls_get_fresh_ids() {
    let scorer = HeuristicScorer::new();
    let a = scorer.analyze("Freedom.");
    let b = scorer.analyze("Freedom.");
    assert_ne!(a.id, b.id);
}

#[test]
fn test_json_wire_form_is_camel_case() {
    let result = analyze("Fox News praises tax cuts. Shocking!", 4);
    let json = serde_json::to_value(&result).unwrap();

    for key in [
        "bias",
        "biasScore",
        "confidence",
        "explanation",
        "emotionalTone",
        "highlightedWords",
        "sentenceHighlights",
        "summary",
        "sourceDetection",
        "timestamp",
        "id",
    ] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(json["bias"], "Right");
    assert_eq!(json["sourceDetection"]["sourceName"], "Fox News");
    assert!(json["sentenceHighlights"][0].get("startIndex").is_some());

    let back: AnalysisResult = serde_json::from_value(json).unwrap();
    assert_eq!(back, result);
}

#[test]
fn test_parseable_output_format() {
    let formatted = analyze("Equality now.", 2).to_parseable_string();
    assert!(formatted.starts_with("bias=Left"));
    assert!(formatted.contains("score="));
    assert!(formatted.contains("confidence="));
    assert!(formatted.contains("highlights=1"));
}
