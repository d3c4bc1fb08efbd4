//! BiasLens: political bias detection
//!
//! text → (remote provider | heuristic scorer) → AnalysisResult → history

pub mod config;
pub mod core;
pub mod error;
pub mod types;

pub use error::{BiasLensError, Result};

// =============================================================================
// SCORING CONSTANTS [C]
// =============================================================================

/// Bias score bounds
pub const BIAS_SCORE_MIN: i32 = -100;
pub const BIAS_SCORE_MAX: i32 = 100;

/// Per-term score step for leaning text
pub const SCORE_STEP_PER_TERM: i32 = 8;

/// Base offset applied before the per-term step
pub const SCORE_BASE: i32 = 10;

/// Weakest score a leaning result can carry (absolute value)
pub const SCORE_FLOOR_LEANING: i32 = 20;

/// Neutral results jitter inside [-NEUTRAL_JITTER, NEUTRAL_JITTER]
pub const NEUTRAL_JITTER: i32 = 10;

/// Confidence for leaning results: 60 + 5 per term, capped at 85
pub const CONFIDENCE_LEANING_BASE: i32 = 60;
pub const CONFIDENCE_LEANING_STEP: i32 = 5;
pub const CONFIDENCE_LEANING_CAP: i32 = 85;

/// Confidence for neutral results: 90 - 3 per emotional term, floored at 70
pub const CONFIDENCE_NEUTRAL_BASE: i32 = 90;
pub const CONFIDENCE_NEUTRAL_STEP: i32 = 3;
pub const CONFIDENCE_NEUTRAL_FLOOR: i32 = 70;

/// Sentence intensity range [min, max)
pub const INTENSITY_MIN: u8 = 30;
pub const INTENSITY_MAX: u8 = 70;

/// Maximum number of highlighted words in a result
pub const MAX_HIGHLIGHTED_WORDS: usize = 8;

// =============================================================================
// EMOTIONAL TONE CAPS [C]
// =============================================================================

pub const TONE_ANGER_CAP: u8 = 45;
pub const TONE_FEAR_CAP: u8 = 35;
pub const TONE_JOY_CAP: u8 = 30;
pub const TONE_NEUTRAL_FLOOR: u8 = 15;

// =============================================================================
// HISTORY
// =============================================================================

/// Entries kept per user, newest first
pub const HISTORY_CAP: usize = 50;

/// Minimum password length accepted by the mock auth service
pub const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
