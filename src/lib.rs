//! Ability Pong - a two-paddle Pong simulation with randomized abilities
//!
//! Core modules:
//! - `sim`: Tick-driven simulation (entities, abilities, collisions, AI)
//! - `settings`: Match configuration and win policy
//! - `error`: Construction-time errors
//!
//! The crate performs no I/O. A host drives [`sim::Match::tick`] once per
//! frame and renders the returned [`sim::FrameSnapshot`].

pub mod error;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::{GameMode, MatchConfig, WinPolicy};
pub use sim::{FrameSnapshot, Match, TickInput, start_match, start_match_with_rng};

/// Game configuration constants
pub mod consts {
    /// Default field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 10.0;
    pub const PADDLE_HEIGHT: f32 = 100.0;
    pub const PADDLE_SPEED: f32 = 6.0;
    /// Gap between a goal line and the paddle's back edge
    pub const PADDLE_OFFSET: f32 = 20.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Horizontal serve speed; vertical is drawn from +/- this value
    pub const SERVE_SPEED: f32 = 4.0;
    /// Speed magnitude cap, enforced on every integrate
    pub const BALL_MAX_SPEED: f32 = 12.0;
    /// Downward acceleration per tick while Gravity is active
    pub const GRAVITY_PER_TICK: f32 = 0.15;
    /// Positions kept for the render trail
    pub const TRAIL_LENGTH: usize = 8;
    /// Rotation between multi-ball clone slots (radians)
    pub const CLONE_SPREAD: f32 = 0.5;

    /// Paddle hit response
    pub const HIT_DEFLECTION: f32 = 10.0;
    pub const RALLY_GROWTH: f32 = 1.05;
    pub const SMASH_MULT: (f32, f32) = (1.5, 1.2);
    pub const SUPER_SMASH_MULT: (f32, f32) = (2.0, 1.5);

    /// Ability effect strengths
    pub const SPEED_BOOST_MULT: f32 = 1.8;
    pub const GIANT_PADDLE_MULT: f32 = 1.5;
    pub const MINI_PADDLE_MULT: f32 = 0.5;
    pub const SLOW_MOTION_MULT: f32 = 0.5;
    /// Fraction of normal paddle speed left to a frozen paddle
    pub const FREEZE_DAMPING: f32 = 0.25;

    /// Magnet pull: active within this vertical distance of the paddle centre
    pub const MAGNET_RANGE: f32 = 200.0;
    pub const MAGNET_FORCE: f32 = 0.015;
    pub const MAGNET_FORCE_FLOOR: f32 = 0.004;

    /// Match defaults
    pub const WIN_SCORE: u32 = 10;
    pub const ARCADE_AI_THRESHOLD: u32 = 10;
    pub const ABILITIES_PER_MATCH: usize = 3;

    /// AI tuning
    pub const AI_DEAD_ZONE: f32 = 35.0;
    pub const AI_BLIND_JITTER_CHANCE: f32 = 0.02;
    pub const AI_PROXIMITY: f32 = 180.0;
    pub const AI_MIN_BALL_SPEED: f32 = 5.0;
    pub const AI_MULTI_BALL_SPEED: f32 = 7.0;
    pub const AI_TELEPORT_GAP: f32 = 120.0;
    /// Extra ticks the AI waits after Ghost Ball's own cooldown
    pub const AI_GHOST_EXTRA_LOCKOUT: u32 = 240;
}
