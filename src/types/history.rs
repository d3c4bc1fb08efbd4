//! History and analytics records

use serde::{Deserialize, Serialize};

use crate::types::AnalysisResult;

/// A stored analysis together with the text it was run on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    #[serde(flatten)]
    pub analysis: AnalysisResult,
    pub input_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_notes: Option<String>,
}

impl HistoryItem {
    pub fn new(analysis: AnalysisResult, input_text: impl Into<String>) -> Self {
        Self {
            analysis,
            input_text: input_text.into(),
            user_notes: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.analysis.id
    }
}

/// Count of analyses per bias label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BiasDistribution {
    pub left: usize,
    pub right: usize,
    pub neutral: usize,
}

/// Analyses in one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    /// `YYYY-MM`
    pub month: String,
    pub count: usize,
    pub avg_bias_score: f64,
}

/// Aggregate view of a user's history
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnalytics {
    pub total_analyses: usize,
    pub bias_distribution: BiasDistribution,
    pub monthly_trends: Vec<MonthlyTrend>,
}
