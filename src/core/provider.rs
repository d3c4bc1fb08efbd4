//! Remote analysis provider (Gemini `generateContent`)
//!
//! One request, no retry. Any transport error, non-2xx status or payload
//! that does not decode into a valid analysis is returned as an error so
//! the caller can fall back to the heuristic scorer.

use async_trait::async_trait;
use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::types::{AnalysisResult, Bias, EmotionalTone, SentenceHighlight, SourceInfo};
use crate::{BiasLensError, Result, BIAS_SCORE_MAX, BIAS_SCORE_MIN, MAX_HIGHLIGHTED_WORDS};

lazy_static! {
    /// First `{` through last `}`
    static ref RE_JSON_OBJECT: Regex = Regex::new(r"(?s)\{.*\}").unwrap();
}

/// Something that can produce an analysis for a text
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &str;

    /// Analyze `text`; the result carries a fresh id and timestamp
    async fn analyze(&self, text: &str) -> Result<AnalysisResult>;
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

/// Analysis shape the model is asked to return (no id or timestamp)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAnalysis {
    pub bias: Bias,
    pub bias_score: i32,
    pub confidence: u8,
    pub explanation: String,
    pub emotional_tone: EmotionalTone,
    #[serde(default)]
    pub highlighted_words: Vec<String>,
    #[serde(default)]
    pub sentence_highlights: Vec<SentenceHighlight>,
    pub summary: String,
    #[serde(default)]
    pub source_detection: Option<SourceInfo>,
}

impl RemoteAnalysis {
    /// Reject anything that breaks the result invariants for `input`
    pub fn validate(&self, input: &str) -> Result<()> {
        if !(BIAS_SCORE_MIN..=BIAS_SCORE_MAX).contains(&self.bias_score) {
            return Err(BiasLensError::MalformedPayload(format!(
                "biasScore {} out of range",
                self.bias_score
            )));
        }
        if self.confidence > 100 {
            return Err(BiasLensError::MalformedPayload(format!(
                "confidence {} out of range",
                self.confidence
            )));
        }
        if self.emotional_tone.total() != 100 {
            return Err(BiasLensError::MalformedPayload(format!(
                "emotional tone sums to {}, not 100",
                self.emotional_tone.total()
            )));
        }
        if self.highlighted_words.len() > MAX_HIGHLIGHTED_WORDS {
            return Err(BiasLensError::MalformedPayload(format!(
                "{} highlighted words, at most {} allowed",
                self.highlighted_words.len(),
                MAX_HIGHLIGHTED_WORDS
            )));
        }
        let input_len = input.chars().count();
        if let Some(h) = self.sentence_highlights.iter().find(|h| {
            h.start_index > h.end_index || h.end_index > input_len || h.intensity > 100
        }) {
            return Err(BiasLensError::MalformedPayload(format!(
                "invalid sentence highlight {:?} at {}..{}",
                h.text, h.start_index, h.end_index
            )));
        }
        Ok(())
    }

    /// Attach identity and timestamp
    pub fn into_result(self, id: String) -> AnalysisResult {
        AnalysisResult {
            bias: self.bias,
            bias_score: self.bias_score,
            confidence: self.confidence,
            explanation: self.explanation,
            emotional_tone: self.emotional_tone,
            highlighted_words: self.highlighted_words,
            sentence_highlights: self.sentence_highlights,
            summary: self.summary,
            source_detection: self.source_detection,
            timestamp: Utc::now(),
            id,
        }
    }
}

/// Slice from the first `{` to the last `}` of the model output
pub fn extract_json_object(text: &str) -> Option<&str> {
    RE_JSON_OBJECT.find(text).map(|m| m.as_str())
}

/// Decode model output into an analysis validated against `input`
pub fn parse_model_output(output: &str, input: &str) -> Result<RemoteAnalysis> {
    let json = extract_json_object(output)
        .ok_or_else(|| BiasLensError::MalformedPayload("no JSON object in model output".to_string()))?;
    let analysis: RemoteAnalysis = serde_json::from_str(json)
        .map_err(|e| BiasLensError::MalformedPayload(e.to_string()))?;
    analysis.validate(input)?;
    Ok(analysis)
}

/// Instruction sent alongside the text
pub fn build_prompt(text: &str) -> String {
    format!(
        r#"Analyze the following text for political bias. Provide:
1. Overall bias classification (Left, Right, or Neutral)
2. Bias score from -100 (far left) to +100 (far right)
3. Confidence level (0-100)
4. Explanation of the bias indicators
5. Emotional tone breakdown (anger, fear, joy, neutral as integer percentages summing to 100)
6. Highlighted biased words/phrases
7. Sentence-level bias highlights with character offsets and intensity (0-100)
8. Source detection if a news source is mentioned
9. A neutral summary suggestion

Text to analyze: "{}"

Respond with JSON only, using this structure:
{{
  "bias": "Left|Right|Neutral",
  "biasScore": number,
  "confidence": number,
  "explanation": "string",
  "emotionalTone": {{ "anger": number, "fear": number, "joy": number, "neutral": number }},
  "highlightedWords": ["string"],
  "sentenceHighlights": [
    {{ "text": "string", "bias": "Left|Right|Neutral", "startIndex": number, "endIndex": number, "intensity": number }}
  ],
  "sourceDetection": {{ "detected": boolean, "sourceName": "string", "sourceUrl": "string", "knownBias": "Left|Right|Neutral", "reliability": number }},
  "summary": "string"
}}"#,
        text
    )
}

// =============================================================================
// Gemini client
// =============================================================================

/// Gemini `generateContent` client
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiProvider {
    /// Build from config; fails with `ProviderDisabled` when no usable key
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = config.usable_key().ok_or(BiasLensError::ProviderDisabled)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl AnalysisProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: Some(build_prompt(text)) }],
            }],
        };

        debug!(model = %self.model, chars = text.chars().count(), "sending generateContent request");

        let response = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BiasLensError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| BiasLensError::MalformedPayload(e.to_string()))?;

        let output = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| BiasLensError::MalformedPayload("response has no candidate text".to_string()))?;

        let analysis = parse_model_output(&output, text)?;
        Ok(analysis.into_result(uuid::Uuid::new_v4().to_string()))
    }
}
