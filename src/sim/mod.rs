//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One discrete step per `tick` call, no wall-clock timers
//! - Injected RNG only
//! - Stable iteration order (paddles by side, balls by insertion)
//! - No rendering or platform dependencies

pub mod abilities;
pub mod ai;
pub mod collision;
pub mod effects;
pub mod state;
pub mod tick;

pub use abilities::{AbilityCategory, AbilityDef, AbilityKind, CATALOG, draw_abilities};
pub use ai::{AiIntent, AiView};
pub use collision::ball_touches_paddle;
pub use effects::{ActiveFlags, activate};
pub use state::{Axis, Ball, EffectSlot, GameEvent, Incoming, Paddle, Score, Side, SmashTier};
pub use tick::{
    BallView, EffectStatus, FrameSnapshot, Match, PaddleView, TickInput, start_match,
    start_match_with_rng,
};
