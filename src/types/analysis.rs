//! Analysis record structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Bias;

/// Emotional tone breakdown in percent (sums to 100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmotionalTone {
    pub anger: u8,
    pub fear: u8,
    pub joy: u8,
    pub neutral: u8,
}

impl EmotionalTone {
    /// Sum of all four components
    pub fn total(&self) -> u32 {
        self.anger as u32 + self.fear as u32 + self.joy as u32 + self.neutral as u32
    }
}

/// One sentence that matched a trigger category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceHighlight {
    /// Sentence text, trimmed
    pub text: String,
    /// Lean of this sentence alone
    pub bias: Bias,
    /// Character offset of the first char in the original text
    pub start_index: usize,
    /// Character offset one past the last char
    pub end_index: usize,
    /// Strength of the lean (0-100)
    pub intensity: u8,
}

/// Known-publication detection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub detected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_bias: Option<Bias>,
    /// Reliability score (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reliability: Option<u8>,
}

impl SourceInfo {
    /// No known source found
    pub fn not_detected() -> Self {
        Self::default()
    }

    /// A known source was found in the text
    pub fn detected(name: &str, known_bias: Bias, reliability: u8) -> Self {
        Self {
            detected: true,
            source_name: Some(name.to_string()),
            source_url: None,
            known_bias: Some(known_bias),
            reliability: Some(reliability),
        }
    }
}

/// Full result of one analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub bias: Bias,
    /// -100 (far left) to +100 (far right)
    pub bias_score: i32,
    /// 0-100
    pub confidence: u8,
    pub explanation: String,
    pub emotional_tone: EmotionalTone,
    pub highlighted_words: Vec<String>,
    pub sentence_highlights: Vec<SentenceHighlight>,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_detection: Option<SourceInfo>,
    pub timestamp: DateTime<Utc>,
    pub id: String,
}

impl AnalysisResult {
    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let color = self.bias.color_code();
        let reset = Bias::color_reset();

        format!(
            "{}bias={} | score={:+} | confidence={}% | tone a{}/f{}/j{}/n{}{}",
            color,
            self.bias,
            self.bias_score,
            self.confidence,
            self.emotional_tone.anger,
            self.emotional_tone.fear,
            self.emotional_tone.joy,
            self.emotional_tone.neutral,
            reset
        )
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "bias={} | score={} | confidence={} | anger={} | fear={} | joy={} | neutral={} | highlights={}",
            self.bias,
            self.bias_score,
            self.confidence,
            self.emotional_tone.anger,
            self.emotional_tone.fear,
            self.emotional_tone.joy,
            self.emotional_tone.neutral,
            self.sentence_highlights.len()
        )
    }
}
