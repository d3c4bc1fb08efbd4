//! Core types for BiasLens

mod analysis;
mod bias;
mod history;
mod user;

pub use analysis::{AnalysisResult, EmotionalTone, SentenceHighlight, SourceInfo};
pub use bias::Bias;
pub use history::{BiasDistribution, HistoryItem, MonthlyTrend, UserAnalytics};
pub use user::User;
