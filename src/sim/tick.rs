//! Fixed-step simulation tick
//!
//! `Match` owns the balls, the score and both paddles, and advances them one
//! discrete step per `tick` call. Nothing runs between calls, so a paused
//! host simply stops calling `tick` and every cooldown and duration stays put.

use glam::Vec2;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::abilities::{AbilityCategory, AbilityKind, draw_abilities};
use super::ai::{self, AiView};
use super::collision;
use super::effects::{self, ActiveFlags, EffectContext, FieldCommand};
use super::state::{Ball, GameEvent, Paddle, Score, Side};
use crate::consts::*;
use crate::error::ConfigError;
use crate::settings::{GameMode, MatchConfig, WinPolicy};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Human paddle direction: -1 up, 1 down, 0 hold. Anything else is ignored.
    pub move_direction: i8,
    /// Ability trigger key pressed this tick (unknown keys are ignored)
    pub activate_key: Option<char>,
}

/// A running match
pub struct Match<R: Rng = Pcg32> {
    pub config: MatchConfig,
    pub policy: WinPolicy,
    /// The three abilities both paddles hold
    pub abilities: Vec<AbilityKind>,
    /// Indexed by `Side::index`
    pub paddles: [Paddle; 2],
    pub balls: Vec<Ball>,
    pub score: Score,
    pub time_ticks: u64,
    /// Ticks before the AI may pick Ghost Ball again
    pub ai_ghost_lockout: u32,
    pub winner: Option<Side>,
    events: Vec<GameEvent>,
    commands: Vec<FieldCommand>,
    next_ball_id: u32,
    rng: R,
}

/// Start a match with the default seeded generator
pub fn start_match(
    pool: &[AbilityKind],
    config: MatchConfig,
    seed: u64,
) -> Result<Match, ConfigError> {
    start_match_with_rng(pool, config, Pcg32::seed_from_u64(seed))
}

/// Start a match drawing every random value from `rng`.
///
/// Validates the config, draws three abilities for both paddles, centres
/// the paddles and serves the first ball.
pub fn start_match_with_rng<R: Rng>(
    pool: &[AbilityKind],
    config: MatchConfig,
    mut rng: R,
) -> Result<Match<R>, ConfigError> {
    config.validate()?;
    let abilities = draw_abilities(pool, &mut rng)?;

    let y = (config.field_height - config.paddle_height) / 2.0;
    let paddles = Side::BOTH.map(|side| {
        Paddle::new(
            side,
            config.paddle_x(side),
            y,
            config.paddle_width,
            config.paddle_height,
            config.paddle_speed,
            &abilities,
        )
    });

    let policy = config.win_policy();
    log::info!(
        "Match start ({}): abilities {:?}, win at {}",
        policy.mode().as_str(),
        abilities,
        config.win_score
    );

    let mut game = Match {
        config,
        policy,
        abilities,
        paddles,
        balls: Vec::new(),
        score: Score::default(),
        time_ticks: 0,
        ai_ghost_lockout: 0,
        winner: None,
        events: Vec::new(),
        commands: Vec::new(),
        next_ball_id: 0,
        rng,
    };
    game.serve_primary();
    Ok(game)
}

impl<R: Rng> Match<R> {
    #[inline]
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn mode(&self) -> GameMode {
        self.policy.mode()
    }

    /// Effect flags derived from both paddles' effect maps
    pub fn flags(&self) -> ActiveFlags {
        ActiveFlags::derive(&self.paddles)
    }

    /// Advance the match by one step and return what the host should draw
    pub fn tick(&mut self, input: &TickInput) -> FrameSnapshot {
        if self.is_over() {
            return self.snapshot();
        }
        self.time_ticks += 1;
        self.ai_ghost_lockout = self.ai_ghost_lockout.saturating_sub(1);

        // Intents
        let human_ability = input.activate_key.and_then(AbilityKind::from_key);
        let view = AiView {
            paddle: &self.paddles[Side::Ai.index()],
            balls: &self.balls,
            multi_ball_open: effects::multi_ball_open(&self.paddles),
            ghost_lockout: self.ai_ghost_lockout,
        };
        let ai_intent = ai::decide(&view, &mut self.rng);

        // Movement
        let field_height = self.config.field_height;
        self.paddles[Side::Player.index()].move_dir(input.move_direction, field_height);
        self.paddles[Side::Ai.index()].move_dir(ai_intent.direction, field_height);

        // Effect clocks. Each side's expiries run before the other side
        // ticks so paired hooks see a consistent opponent.
        for side in Side::BOTH {
            let expired = self.paddles[side.index()].tick_effects();
            for kind in expired {
                self.with_effects(side, |ctx| effects::expire(ctx, kind));
            }
        }
        self.run_commands();

        // Activations
        if let Some(kind) = human_ability {
            self.activate_ability(Side::Player, kind);
        }
        if let Some(kind) = ai_intent.ability {
            self.activate_ability(Side::Ai, kind);
        }

        self.refresh_derived();
        self.step_balls();

        for paddle in &mut self.paddles {
            paddle.clear_pulses();
        }
        self.snapshot()
    }

    /// Try to fire an ability for `side`. Used by both key presses and the AI.
    pub fn activate_ability(&mut self, side: Side, kind: AbilityKind) -> bool {
        if self.is_over() {
            return false;
        }
        if !self.with_effects(side, |ctx| effects::activate(ctx, kind)) {
            return false;
        }

        if side == Side::Ai && kind == AbilityKind::GhostBall {
            self.ai_ghost_lockout = kind.def().cooldown_max + AI_GHOST_EXTRA_LOCKOUT;
        }
        self.run_commands();
        self.refresh_derived();
        true
    }

    fn with_effects<T>(&mut self, side: Side, f: impl FnOnce(&mut EffectContext<'_>) -> T) -> T {
        let mut ctx = EffectContext {
            side,
            paddles: &mut self.paddles,
            balls: self.balls.as_mut_slice(),
            score: &mut self.score,
            field_height: self.config.field_height,
            events: &mut self.events,
            commands: &mut self.commands,
        };
        f(&mut ctx)
    }

    /// Carry out ball spawns and collapses requested by effect handlers
    fn run_commands(&mut self) {
        for command in std::mem::take(&mut self.commands) {
            match command {
                FieldCommand::SpawnClones => {
                    let Some(primary) = self.balls.first().cloned() else {
                        continue;
                    };
                    // Slots either side of the primary's heading
                    for slot in [0, 2] {
                        let id = self.next_id();
                        self.balls.push(primary.spawn_clone(id, slot));
                    }
                    log::debug!("Multi-ball open: {} balls", self.balls.len());
                    self.events.push(GameEvent::MultiBallStart);
                }
                FieldCommand::CollapseToPrimary => {
                    self.balls.clear();
                    if !self.is_over() {
                        self.serve_primary();
                    }
                    log::debug!("Multi-ball closed");
                    self.events.push(GameEvent::MultiBallEnd);
                }
            }
        }
    }

    /// Re-derive opponent modifiers, paddle sizes and ball flags
    fn refresh_derived(&mut self) {
        effects::refresh_incoming(&mut self.paddles, self.config.field_height);
        let flags = self.flags();
        for ball in &mut self.balls {
            ball.is_ghost = flags.ghost;
            ball.gravity_applied = flags.gravity;
        }
    }

    /// Magnet, motion, collisions, goals, refill
    fn step_balls(&mut self) {
        let MatchConfig {
            field_width,
            field_height,
            ..
        } = self.config;

        effects::apply_magnets(&self.paddles, &mut self.balls, field_width);

        let mut scored = Vec::new();
        for ball in &mut self.balls {
            ball.integrate();
            if let Some(side) = collision::resolve_ball(
                ball,
                &self.paddles,
                field_width,
                field_height,
                &mut self.events,
            ) {
                scored.push((ball.id, side));
            }
        }

        for &(id, side) in &scored {
            self.balls.retain(|b| b.id != id);
            if self.is_over() {
                continue;
            }
            let points = collision::award_goal(&mut self.score, side, &mut self.events);
            log::debug!(
                "Goal {:?} +{} ({}-{})",
                side, points, self.score.player, self.score.ai
            );
            self.check_winner();
        }

        if self.balls.is_empty() && !self.is_over() {
            self.serve_primary();
        }
    }

    fn check_winner(&mut self) {
        let Score { player, ai, .. } = self.score;
        if let Some(winner) = self.policy.winner(player, ai) {
            self.winner = Some(winner);
            log::info!("Match over: {:?} wins {}-{}", winner, player, ai);
            self.events.push(GameEvent::MatchEnd { winner, player, ai });
        }
    }

    /// Fresh primary at centre, inheriting any running ball effects
    fn serve_primary(&mut self) {
        let id = self.next_id();
        let center = Vec2::new(self.config.field_width, self.config.field_height) / 2.0;
        let mut ball = Ball::serve(
            id,
            center,
            self.config.ball_radius,
            self.config.serve_speed,
            &mut self.rng,
        );

        let flags = self.flags();
        if flags.slow_motion {
            ball.vel *= SLOW_MOTION_MULT;
        }
        ball.is_ghost = flags.ghost;
        ball.gravity_applied = flags.gravity;
        self.balls.push(ball);
    }

    fn next_id(&mut self) -> u32 {
        self.next_ball_id += 1;
        self.next_ball_id
    }

    /// Read-only view for the host. Drains pending events.
    pub fn snapshot(&mut self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.time_ticks,
            mode: self.mode(),
            balls: self.balls.iter().map(BallView::from).collect(),
            paddles: [
                PaddleView::from(&self.paddles[0]),
                PaddleView::from(&self.paddles[1]),
            ],
            flags: self.flags(),
            score: self.score,
            winner: self.winner,
            events: std::mem::take(&mut self.events),
        }
    }
}

/// Everything the host needs to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub mode: GameMode,
    pub balls: Vec<BallView>,
    pub paddles: [PaddleView; 2],
    pub flags: ActiveFlags,
    pub score: Score,
    pub winner: Option<Side>,
    /// Events raised since the previous snapshot, in order
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BallView {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// False while Ghost Ball is running
    pub visible: bool,
    pub is_clone: bool,
    pub color_index: u8,
    pub trail: Vec<Vec2>,
}

impl From<&Ball> for BallView {
    fn from(ball: &Ball) -> Self {
        Self {
            id: ball.id,
            pos: ball.pos,
            vel: ball.vel,
            radius: ball.radius,
            visible: !ball.is_ghost,
            is_clone: ball.is_clone,
            color_index: ball.color_index,
            trail: ball.trail.iter().copied().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaddleView {
    pub side: Side,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub effects: Vec<EffectStatus>,
}

impl From<&Paddle> for PaddleView {
    fn from(paddle: &Paddle) -> Self {
        Self {
            side: paddle.side,
            x: paddle.x,
            y: paddle.y,
            width: paddle.width,
            height: paddle.height,
            effects: paddle
                .effects
                .iter()
                .map(|slot| {
                    let def = slot.kind.def();
                    EffectStatus {
                        kind: slot.kind,
                        name: def.name,
                        description: def.description,
                        category: def.category,
                        instant: slot.kind.is_instant(),
                        key_label: def.key_label,
                        color: def.color,
                        cooldown_remaining: slot.cooldown_remaining,
                        cooldown_max: def.cooldown_max,
                        cooldown_fraction: slot.cooldown_remaining as f32 / def.cooldown_max as f32,
                        active: slot.active || slot.pulse,
                        duration_remaining: slot.duration_remaining,
                    }
                })
                .collect(),
        }
    }
}

/// HUD entry for one assigned ability
#[derive(Debug, Clone, Serialize)]
pub struct EffectStatus {
    pub kind: AbilityKind,
    pub name: &'static str,
    /// Tooltip text
    pub description: &'static str,
    pub category: AbilityCategory,
    /// No duration: the effect lands on the activation tick
    pub instant: bool,
    pub key_label: &'static str,
    pub color: &'static str,
    pub cooldown_remaining: u32,
    pub cooldown_max: u32,
    /// 0.0 ready, 1.0 just used
    pub cooldown_fraction: f32,
    pub active: bool,
    pub duration_remaining: u32,
}
