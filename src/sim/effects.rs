//! Effect engine
//!
//! Ability activation and expiry. Every ability is dispatched through a
//! table indexed by [`AbilityKind`]; each entry carries its precondition,
//! activation and expiry handlers. Handlers only touch the state they are
//! handed. Adding or removing balls is requested through [`FieldCommand`]
//! and carried out by the simulation loop, which owns the ball collection.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::abilities::AbilityKind;
use super::state::{Ball, GameEvent, Paddle, Score, Side};
use crate::consts::*;

/// Ball-collection changes requested by a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCommand {
    /// Fan two clones out of the single live ball
    SpawnClones,
    /// Drop every ball and serve a fresh primary
    CollapseToPrimary,
}

/// Everything an ability handler may read or modify
pub struct EffectContext<'a> {
    /// Side whose ability is firing
    pub side: Side,
    pub paddles: &'a mut [Paddle; 2],
    /// Live balls. A slice: handlers can steer balls but never add or remove them.
    pub balls: &'a mut [Ball],
    pub score: &'a mut Score,
    pub field_height: f32,
    pub events: &'a mut Vec<GameEvent>,
    pub commands: &'a mut Vec<FieldCommand>,
}

impl EffectContext<'_> {
    fn own(&self) -> &Paddle {
        &self.paddles[self.side.index()]
    }

    fn own_mut(&mut self) -> &mut Paddle {
        &mut self.paddles[self.side.index()]
    }

    fn opponent(&self) -> &Paddle {
        &self.paddles[self.side.opponent().index()]
    }

    fn opponent_mut(&mut self) -> &mut Paddle {
        &mut self.paddles[self.side.opponent().index()]
    }

    fn scale_balls(&mut self, mx: f32, my: f32) {
        for ball in self.balls.iter_mut() {
            ball.vel.x *= mx;
            ball.vel.y *= my;
        }
    }
}

type Precondition = fn(&EffectContext<'_>) -> bool;
type Action = fn(&mut EffectContext<'_>);

/// Dispatch entry for one ability
struct Handler {
    kind: AbilityKind,
    precondition: Precondition,
    on_activate: Action,
    on_expire: Action,
}

/// Indexed by `AbilityKind as usize`
static HANDLERS: [Handler; 15] = [
    Handler {
        kind: AbilityKind::Smash,
        precondition: always,
        on_activate: smash,
        on_expire: nothing,
    },
    Handler {
        kind: AbilityKind::Shield,
        precondition: always,
        on_activate: nothing,
        on_expire: nothing,
    },
    Handler {
        kind: AbilityKind::SpeedBoost,
        precondition: always,
        on_activate: nothing,
        on_expire: nothing,
    },
    Handler {
        kind: AbilityKind::Teleport,
        precondition: always,
        on_activate: teleport,
        on_expire: nothing,
    },
    Handler {
        kind: AbilityKind::SlowMotion,
        precondition: always,
        on_activate: slow_motion_start,
        on_expire: slow_motion_end,
    },
    Handler {
        kind: AbilityKind::MultiBall,
        precondition: multi_ball_allowed,
        on_activate: multi_ball_start,
        on_expire: multi_ball_end,
    },
    Handler {
        kind: AbilityKind::GiantPaddle,
        precondition: always,
        on_activate: resize_own,
        on_expire: resize_own,
    },
    Handler {
        kind: AbilityKind::GhostBall,
        precondition: always,
        on_activate: nothing,
        on_expire: nothing,
    },
    Handler {
        kind: AbilityKind::ReverseControls,
        precondition: always,
        on_activate: nothing,
        on_expire: nothing,
    },
    Handler {
        kind: AbilityKind::Magnet,
        precondition: always,
        on_activate: nothing,
        on_expire: nothing,
    },
    Handler {
        kind: AbilityKind::DoubleScore,
        precondition: always,
        on_activate: double_score,
        on_expire: nothing,
    },
    Handler {
        kind: AbilityKind::Freeze,
        precondition: always,
        on_activate: nothing,
        on_expire: nothing,
    },
    Handler {
        kind: AbilityKind::SuperSmash,
        precondition: always,
        on_activate: super_smash,
        on_expire: nothing,
    },
    Handler {
        kind: AbilityKind::Gravity,
        precondition: always,
        on_activate: nothing,
        on_expire: nothing,
    },
    Handler {
        kind: AbilityKind::MiniPaddle,
        precondition: always,
        on_activate: mini_paddle_start,
        on_expire: mini_paddle_end,
    },
];

#[inline]
fn handler(kind: AbilityKind) -> &'static Handler {
    let entry = &HANDLERS[kind as usize];
    debug_assert_eq!(entry.kind, kind);
    entry
}

fn always(_: &EffectContext<'_>) -> bool {
    true
}

fn nothing(_: &mut EffectContext<'_>) {}

fn smash(ctx: &mut EffectContext<'_>) {
    let (mx, my) = SMASH_MULT;
    ctx.scale_balls(mx, my);
}

fn super_smash(ctx: &mut EffectContext<'_>) {
    let (mx, my) = SUPER_SMASH_MULT;
    ctx.scale_balls(mx, my);
}

fn teleport(ctx: &mut EffectContext<'_>) {
    let field_height = ctx.field_height;
    let paddle = ctx.own_mut();
    paddle.y = (field_height - paddle.height) / 2.0;
}

fn slow_motion_start(ctx: &mut EffectContext<'_>) {
    // Already slowed by the other side's window
    if ctx.opponent().is_active(AbilityKind::SlowMotion) {
        return;
    }
    ctx.scale_balls(SLOW_MOTION_MULT, SLOW_MOTION_MULT);
}

fn slow_motion_end(ctx: &mut EffectContext<'_>) {
    if ctx.opponent().is_active(AbilityKind::SlowMotion) {
        return;
    }
    let restore = 1.0 / SLOW_MOTION_MULT;
    ctx.scale_balls(restore, restore);
}

fn multi_ball_allowed(ctx: &EffectContext<'_>) -> bool {
    ctx.balls.len() == 1 && !multi_ball_open(ctx.paddles)
}

fn multi_ball_start(ctx: &mut EffectContext<'_>) {
    ctx.commands.push(FieldCommand::SpawnClones);
}

fn multi_ball_end(ctx: &mut EffectContext<'_>) {
    ctx.commands.push(FieldCommand::CollapseToPrimary);
}

fn resize_own(ctx: &mut EffectContext<'_>) {
    let field_height = ctx.field_height;
    let paddle = ctx.own_mut();
    paddle.apply_size();
    paddle.clamp_to(field_height);
}

fn double_score(ctx: &mut EffectContext<'_>) {
    ctx.score.arm_double(ctx.side);
}

fn mini_paddle_start(ctx: &mut EffectContext<'_>) {
    let target = ctx.opponent_mut();
    target.incoming.shrunk = true;
    target.apply_size();
}

fn mini_paddle_end(ctx: &mut EffectContext<'_>) {
    let target = ctx.opponent_mut();
    target.incoming.shrunk = false;
    target.apply_size();
}

/// Try to fire `kind` for `ctx.side`.
///
/// Rejected with no state change when the ability is not assigned to the
/// paddle, is still cooling down, or its precondition does not hold.
pub fn activate(ctx: &mut EffectContext<'_>, kind: AbilityKind) -> bool {
    let Some(slot) = ctx.own().slot(kind) else {
        log::trace!("{:?}: {:?} not assigned", ctx.side, kind);
        return false;
    };
    if !slot.ready() {
        log::trace!(
            "{:?}: {:?} cooling down ({} ticks)",
            ctx.side, kind, slot.cooldown_remaining
        );
        return false;
    }

    let entry = handler(kind);
    if !(entry.precondition)(ctx) {
        log::trace!("{:?}: {:?} precondition failed", ctx.side, kind);
        return false;
    }

    if let Some(slot) = ctx.own_mut().slot_mut(kind) {
        slot.trigger();
    }
    (entry.on_activate)(ctx);

    log::debug!("{:?} activated {}", ctx.side, kind.def().name);
    ctx.events.push(GameEvent::AbilityActivated {
        side: ctx.side,
        kind,
    });
    true
}

/// Run the expiry hook for an effect whose window just closed on `ctx.side`
pub fn expire(ctx: &mut EffectContext<'_>, kind: AbilityKind) {
    log::trace!("{:?}: {:?} expired", ctx.side, kind);
    (handler(kind).on_expire)(ctx);
}

/// Whether any paddle has a Multi-Ball window open
pub fn multi_ball_open(paddles: &[Paddle; 2]) -> bool {
    paddles.iter().any(|p| p.is_active(AbilityKind::MultiBall))
}

/// Re-derive what each paddle suffers from its opponent's effect map and
/// recompute its size from the baseline.
pub fn refresh_incoming(paddles: &mut [Paddle; 2], field_height: f32) {
    for side in Side::BOTH {
        let opponent = &paddles[side.opponent().index()];
        let incoming = super::state::Incoming {
            reversed: opponent.is_active(AbilityKind::ReverseControls),
            frozen: opponent.is_active(AbilityKind::Freeze),
            shrunk: opponent.is_active(AbilityKind::MiniPaddle),
        };
        let paddle = &mut paddles[side.index()];
        paddle.incoming = incoming;
        paddle.apply_size();
        paddle.clamp_to(field_height);
    }
}

/// Global effect flags for rendering, derived from both effect maps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveFlags {
    pub slow_motion: bool,
    pub ghost: bool,
    pub gravity: bool,
    pub multi_ball: bool,
    /// Magnet pulling toward each side's paddle
    pub magnet: [bool; 2],
    /// Controls reversed for each side
    pub reversed: [bool; 2],
    /// Each side frozen
    pub frozen: [bool; 2],
}

impl ActiveFlags {
    pub fn derive(paddles: &[Paddle; 2]) -> Self {
        let any = |kind| paddles.iter().any(|p| p.is_active(kind));
        let per_side = |kind: AbilityKind, own: bool| {
            Side::BOTH.map(|side| {
                let source = if own { side } else { side.opponent() };
                paddles[source.index()].is_active(kind)
            })
        };
        Self {
            slow_motion: any(AbilityKind::SlowMotion),
            ghost: any(AbilityKind::GhostBall),
            gravity: any(AbilityKind::Gravity),
            multi_ball: any(AbilityKind::MultiBall),
            magnet: per_side(AbilityKind::Magnet, true),
            reversed: per_side(AbilityKind::ReverseControls, false),
            frozen: per_side(AbilityKind::Freeze, false),
        }
    }
}

/// Magnet: pull balls on the activator's half, in front of its paddle,
/// vertically toward the paddle centre.
pub fn apply_magnets(paddles: &[Paddle; 2], balls: &mut [Ball], field_width: f32) {
    let half = field_width / 2.0;
    for paddle in paddles.iter().filter(|p| p.is_active(AbilityKind::Magnet)) {
        let center = Vec2::new(paddle.center_x(), paddle.center_y());
        for ball in balls.iter_mut() {
            let in_front = match paddle.side {
                Side::Player => ball.pos.x < half && ball.pos.x > paddle.x + paddle.width,
                Side::Ai => ball.pos.x > half && ball.pos.x < paddle.x,
            };
            if !in_front {
                continue;
            }
            let dy = center.y - ball.pos.y;
            let dist = dy.abs();
            if dist < MAGNET_RANGE {
                let force = (MAGNET_FORCE * (1.0 - dist / MAGNET_RANGE)).max(MAGNET_FORCE_FLOOR);
                ball.vel.y += dy * force;
            }
        }
    }
}
