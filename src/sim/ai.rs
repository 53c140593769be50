//! AI policy
//!
//! A stateless heuristic for the right-hand paddle. Each tick it reads a
//! view of the field and returns a movement direction plus at most one
//! ability to attempt. Attempts go through the same activation path as the
//! human's key presses, so cooldowns apply.

use rand::Rng;

use super::abilities::AbilityKind;
use super::state::{Ball, Paddle};
use crate::consts::*;

/// What the policy sees
#[derive(Debug, Clone, Copy)]
pub struct AiView<'a> {
    /// The AI's own paddle
    pub paddle: &'a Paddle,
    pub balls: &'a [Ball],
    /// Multi-Ball window open on either side
    pub multi_ball_open: bool,
    /// Ticks before the AI may cast Ghost Ball again
    pub ghost_lockout: u32,
}

/// One tick's decision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AiIntent {
    /// -1 up, 1 down, 0 hold
    pub direction: i8,
    pub ability: Option<AbilityKind>,
}

/// A slice of the unit interval mapped to one ability
struct Band {
    kind: AbilityKind,
    width: f32,
    precondition: fn(&AiView<'_>, &Ball) -> bool,
}

/// Probability bands, laid end to end from 0. A roll past the last band
/// attempts nothing.
static BANDS: [Band; 15] = [
    Band {
        kind: AbilityKind::GhostBall,
        width: 0.15,
        precondition: ghost_ready,
    },
    Band {
        kind: AbilityKind::MultiBall,
        width: 0.15,
        precondition: multi_ball_ready,
    },
    Band {
        kind: AbilityKind::DoubleScore,
        width: 0.15,
        precondition: any,
    },
    Band {
        kind: AbilityKind::Teleport,
        width: 0.15,
        precondition: far_from_ball,
    },
    Band {
        kind: AbilityKind::Shield,
        width: 0.15,
        precondition: any,
    },
    Band {
        kind: AbilityKind::Smash,
        width: 0.03,
        precondition: any,
    },
    Band {
        kind: AbilityKind::SuperSmash,
        width: 0.03,
        precondition: any,
    },
    Band {
        kind: AbilityKind::SpeedBoost,
        width: 0.03,
        precondition: any,
    },
    Band {
        kind: AbilityKind::GiantPaddle,
        width: 0.03,
        precondition: any,
    },
    Band {
        kind: AbilityKind::SlowMotion,
        width: 0.02,
        precondition: any,
    },
    Band {
        kind: AbilityKind::Magnet,
        width: 0.02,
        precondition: any,
    },
    Band {
        kind: AbilityKind::ReverseControls,
        width: 0.02,
        precondition: any,
    },
    Band {
        kind: AbilityKind::Freeze,
        width: 0.02,
        precondition: any,
    },
    Band {
        kind: AbilityKind::MiniPaddle,
        width: 0.02,
        precondition: any,
    },
    Band {
        kind: AbilityKind::Gravity,
        width: 0.02,
        precondition: any,
    },
];

fn any(_: &AiView<'_>, _: &Ball) -> bool {
    true
}

/// Ghost Ball has its own lockout on top of the catalog cooldown
fn ghost_ready(view: &AiView<'_>, _: &Ball) -> bool {
    view.ghost_lockout == 0
}

fn multi_ball_ready(view: &AiView<'_>, ball: &Ball) -> bool {
    !view.multi_ball_open && ball.speed() > AI_MULTI_BALL_SPEED
}

fn far_from_ball(view: &AiView<'_>, ball: &Ball) -> bool {
    (view.paddle.center_y() - ball.pos.y).abs() > AI_TELEPORT_GAP
}

/// The ball the AI watches: the first non-clone, else whatever is left
pub fn reference_ball(balls: &[Ball]) -> Option<&Ball> {
    balls.iter().find(|b| !b.is_clone).or_else(|| balls.first())
}

/// Decide this tick's movement and ability attempt.
///
/// A frozen AI does nothing. Randomness comes only from `rng`.
pub fn decide<R: Rng + ?Sized>(view: &AiView<'_>, rng: &mut R) -> AiIntent {
    let mut intent = AiIntent::default();
    if view.paddle.incoming.frozen {
        return intent;
    }
    let Some(ball) = reference_ball(view.balls) else {
        return intent;
    };

    intent.direction = if ball.is_ghost {
        blind_step(rng)
    } else {
        track(view.paddle.center_y(), ball.pos.y)
    };

    let close = (ball.pos.x - view.paddle.x).abs() < AI_PROXIMITY;
    if !ball.is_ghost && close && ball.speed() > AI_MIN_BALL_SPEED {
        intent.ability = pick_ability(view, ball, rng.random::<f32>());
    }
    intent
}

/// Dead-zone tracking toward `target_y`
fn track(center_y: f32, target_y: f32) -> i8 {
    if center_y < target_y - AI_DEAD_ZONE {
        1
    } else if center_y > target_y + AI_DEAD_ZONE {
        -1
    } else {
        0
    }
}

/// Occasional random step while the ball is invisible
fn blind_step<R: Rng + ?Sized>(rng: &mut R) -> i8 {
    if rng.random::<f32>() < AI_BLIND_JITTER_CHANCE {
        if rng.random_bool(0.5) { 1 } else { -1 }
    } else {
        0
    }
}

/// Map a roll in [0, 1) to at most one ability
fn pick_ability(view: &AiView<'_>, ball: &Ball, roll: f32) -> Option<AbilityKind> {
    let mut upper = 0.0;
    for band in &BANDS {
        upper += band.width;
        if roll < upper {
            let usable = view.paddle.has(band.kind) && (band.precondition)(view, ball);
            return usable.then_some(band.kind);
        }
    }
    None
}
