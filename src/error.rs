//! Construction-time errors
//!
//! A running match has no recoverable errors: rejected ability activations
//! are plain `false` returns. Only building a match can fail.

use thiserror::Error;

/// Invalid match setup, reported once by `start_match`
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("win score must be positive")]
    InvalidWinScore,

    #[error("arcade threshold {threshold} must be positive and not above win score {win_score}")]
    InvalidArcadeThreshold { threshold: u32, win_score: u32 },

    #[error("paddle speed must be positive and finite, got {0}")]
    InvalidPaddleSpeed(f32),

    #[error("invalid field geometry: {0}")]
    InvalidField(String),

    #[error("ability pool needs at least {needed} distinct abilities, found {found}")]
    AbilityPoolTooSmall { found: usize, needed: usize },

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config read error: {0}")]
    Io(#[from] std::io::Error),
}
