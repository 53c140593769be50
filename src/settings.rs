//! Match configuration and win policy
//!
//! Loaded by the host (optionally from JSON) and validated once when the
//! match is built.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::Side;

/// Player win score used by the arcade preset (effectively unbounded)
pub const ARCADE_PLAYER_WIN_SCORE: u32 = 9999;

/// Game mode selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    #[default]
    Standard,
    Arcade,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Standard => "standard",
            GameMode::Arcade => "arcade",
        }
    }
}

/// Decides when a match is over. Injected into the simulation, never
/// evaluated by the collision resolver itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinPolicy {
    /// First side to `win_score` wins
    FirstTo { win_score: u32 },
    /// Player needs `win_score`; the AI only needs `ai_threshold`
    Arcade { win_score: u32, ai_threshold: u32 },
}

impl WinPolicy {
    /// Winner for the given score line, if the match is decided
    pub fn winner(&self, player: u32, ai: u32) -> Option<Side> {
        match *self {
            WinPolicy::FirstTo { win_score } => {
                if player >= win_score {
                    Some(Side::Player)
                } else if ai >= win_score {
                    Some(Side::Ai)
                } else {
                    None
                }
            }
            WinPolicy::Arcade {
                win_score,
                ai_threshold,
            } => {
                if ai >= ai_threshold {
                    Some(Side::Ai)
                } else if player >= win_score {
                    Some(Side::Player)
                } else {
                    None
                }
            }
        }
    }

    pub fn mode(&self) -> GameMode {
        match self {
            WinPolicy::FirstTo { .. } => GameMode::Standard,
            WinPolicy::Arcade { .. } => GameMode::Arcade,
        }
    }
}

/// Match configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Scoring ===
    /// Points needed to win
    pub win_score: u32,
    /// When set, the AI wins early at this score (arcade mode)
    pub arcade_win_threshold: Option<u32>,

    // === Paddles ===
    /// Base movement per tick
    pub paddle_speed: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Distance from each goal line to the paddle's back edge
    pub paddle_offset: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub serve_speed: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            win_score: WIN_SCORE,
            arcade_win_threshold: None,

            paddle_speed: PADDLE_SPEED,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_offset: PADDLE_OFFSET,

            ball_radius: BALL_RADIUS,
            serve_speed: SERVE_SPEED,
        }
    }
}

impl MatchConfig {
    /// Arcade preset: survive as long as possible, the AI wins at its threshold
    pub fn arcade() -> Self {
        Self {
            win_score: ARCADE_PLAYER_WIN_SCORE,
            arcade_win_threshold: Some(ARCADE_AI_THRESHOLD),
            ..Self::default()
        }
    }

    /// Apply a mode's scoring rules, keeping geometry and speeds
    pub fn with_mode(self, mode: GameMode) -> Self {
        match mode {
            GameMode::Standard => Self {
                arcade_win_threshold: None,
                ..self
            },
            GameMode::Arcade => {
                let arcade = Self::arcade();
                Self {
                    win_score: arcade.win_score,
                    arcade_win_threshold: arcade.arcade_win_threshold,
                    ..self
                }
            }
        }
    }

    /// Parse a JSON document; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check construction-time invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.win_score == 0 {
            return Err(ConfigError::InvalidWinScore);
        }
        if let Some(threshold) = self.arcade_win_threshold {
            if threshold == 0 || threshold > self.win_score {
                return Err(ConfigError::InvalidArcadeThreshold {
                    threshold,
                    win_score: self.win_score,
                });
            }
        }
        if !(self.paddle_speed.is_finite() && self.paddle_speed > 0.0) {
            return Err(ConfigError::InvalidPaddleSpeed(self.paddle_speed));
        }

        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.field_width) || !positive(self.field_height) {
            return Err(ConfigError::InvalidField(format!(
                "field must be positive, got {}x{}",
                self.field_width, self.field_height
            )));
        }
        if !positive(self.paddle_width) || !positive(self.paddle_height) {
            return Err(ConfigError::InvalidField(
                "paddle dimensions must be positive".into(),
            ));
        }
        // Giant Paddle must still fit in the field
        if self.paddle_height * GIANT_PADDLE_MULT > self.field_height {
            return Err(ConfigError::InvalidField(format!(
                "paddle height {} too tall for field height {}",
                self.paddle_height, self.field_height
            )));
        }
        if !(self.paddle_offset.is_finite() && self.paddle_offset >= 0.0)
            || 2.0 * (self.paddle_offset + self.paddle_width) >= self.field_width
        {
            return Err(ConfigError::InvalidField(
                "paddles do not fit inside the field".into(),
            ));
        }
        if !positive(self.ball_radius) || self.ball_radius * 2.0 >= self.field_height {
            return Err(ConfigError::InvalidField(format!(
                "ball radius {} does not fit",
                self.ball_radius
            )));
        }
        if !positive(self.serve_speed) || self.serve_speed > BALL_MAX_SPEED {
            return Err(ConfigError::InvalidField(format!(
                "serve speed {} outside (0, {}]",
                self.serve_speed, BALL_MAX_SPEED
            )));
        }
        Ok(())
    }

    /// Win policy derived from the arcade threshold
    pub fn win_policy(&self) -> WinPolicy {
        match self.arcade_win_threshold {
            Some(ai_threshold) => WinPolicy::Arcade {
                win_score: self.win_score,
                ai_threshold,
            },
            None => WinPolicy::FirstTo {
                win_score: self.win_score,
            },
        }
    }

    /// Left edge of the given side's paddle
    pub fn paddle_x(&self, side: Side) -> f32 {
        match side {
            Side::Player => self.paddle_offset,
            Side::Ai => self.field_width - self.paddle_offset - self.paddle_width,
        }
    }
}
