//! Bias classification labels

use serde::{Deserialize, Serialize};

/// Political lean of a text or a sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bias {
    /// Left-leaning terminology dominates
    Left,
    /// Right-leaning terminology dominates
    Right,
    /// Balanced or no political terminology
    Neutral,
}

impl Bias {
    /// Get ANSI color code for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            Bias::Left => "\x1b[34m",    // Blue
            Bias::Right => "\x1b[31m",   // Red
            Bias::Neutral => "\x1b[32m", // Green
        }
    }

    /// Reset ANSI color
    pub fn color_reset() -> &'static str {
        "\x1b[0m"
    }

    /// Lowercase label, used in templated prose
    pub fn lowercase(&self) -> &'static str {
        match self {
            Bias::Left => "left",
            Bias::Right => "right",
            Bias::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Bias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Bias::Left => "Left",
            Bias::Right => "Right",
            Bias::Neutral => "Neutral",
        };
        write!(f, "{}", name)
    }
}
