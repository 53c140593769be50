//! Entity model
//!
//! Balls, paddles and their per-ability effect slots. Everything here is plain
//! data plus self-contained per-entity updates; cross-entity rules live in
//! `effects`, `collision` and `tick`.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::abilities::AbilityKind;
use crate::consts::*;

/// Which paddle. The human plays the left side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Ai,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Player, Side::Ai];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Ai => 1,
        }
    }

    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }
}

/// Velocity component selector for reflections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    pub radius: f32,
    /// Collidable but not drawn
    pub is_ghost: bool,
    /// Spawned by Multi-Ball
    pub is_clone: bool,
    /// Render colour slot for clones
    pub color_index: u8,
    pub gravity_applied: bool,
    /// Recent positions, oldest first (render only)
    #[serde(skip)]
    pub trail: VecDeque<Vec2>,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            is_ghost: false,
            is_clone: false,
            color_index: 0,
            gravity_applied: false,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    /// Fresh primary ball at `center` heading left or right at a random angle
    pub fn serve<R: Rng + ?Sized>(
        id: u32,
        center: Vec2,
        radius: f32,
        speed: f32,
        rng: &mut R,
    ) -> Self {
        let vx = if rng.random_bool(0.5) { speed } else { -speed };
        let vy = rng.random_range(-speed..speed);
        Self::new(id, center, Vec2::new(vx, vy), radius)
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Advance one tick: gravity, speed cap, trail, then position
    pub fn integrate(&mut self) {
        if self.gravity_applied {
            self.vel.y += GRAVITY_PER_TICK;
        }
        self.clamp_speed();

        self.trail.push_back(self.pos);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }

        self.pos += self.vel;
    }

    /// Scale velocity down to the speed cap if needed
    pub fn clamp_speed(&mut self) {
        let speed = self.speed();
        if speed > BALL_MAX_SPEED {
            self.vel *= BALL_MAX_SPEED / speed;
        }
    }

    pub fn reflect(&mut self, axis: Axis) {
        match axis {
            Axis::X => self.vel.x = -self.vel.x,
            Axis::Y => self.vel.y = -self.vel.y,
        }
    }

    /// Copy of this ball with velocity rotated by `(slot - 1) * CLONE_SPREAD`
    pub fn spawn_clone(&self, id: u32, slot_index: u8) -> Ball {
        let angle = (slot_index as f32 - 1.0) * CLONE_SPREAD;
        let mut clone = Ball::new(id, self.pos, Vec2::from_angle(angle).rotate(self.vel), self.radius);
        clone.is_clone = true;
        clone.color_index = slot_index % 3;
        clone.is_ghost = self.is_ghost;
        clone.gravity_applied = self.gravity_applied;
        clone
    }
}

/// Cooldown and duration state for one assigned ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectSlot {
    pub kind: AbilityKind,
    pub cooldown_remaining: u32,
    pub active: bool,
    pub duration_remaining: u32,
    /// Set for the single tick an instant ability fires
    pub pulse: bool,
}

impl EffectSlot {
    pub fn new(kind: AbilityKind) -> Self {
        Self {
            kind,
            cooldown_remaining: 0,
            active: false,
            duration_remaining: 0,
            pulse: false,
        }
    }

    #[inline]
    pub fn ready(&self) -> bool {
        self.cooldown_remaining == 0
    }

    /// Start cooldown and, for timed abilities, the active window
    pub fn trigger(&mut self) {
        let def = self.kind.def();
        self.cooldown_remaining = def.cooldown_max;
        match def.duration_max {
            Some(duration) => {
                self.active = true;
                self.duration_remaining = duration;
            }
            None => self.pulse = true,
        }
    }

    /// Advance one tick. Returns true when the active window just closed.
    pub fn tick(&mut self) -> bool {
        self.cooldown_remaining = self.cooldown_remaining.saturating_sub(1);
        if self.active {
            self.duration_remaining = self.duration_remaining.saturating_sub(1);
            if self.duration_remaining == 0 {
                self.active = false;
                return true;
            }
        }
        false
    }
}

/// Effects the opponent currently imposes on a paddle.
///
/// Derived from the opponent's effect map every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incoming {
    pub reversed: bool,
    pub frozen: bool,
    pub shrunk: bool,
}

/// Paddle strength tier for the hit response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmashTier {
    Smash,
    SuperSmash,
}

impl SmashTier {
    /// (x, y) velocity multipliers
    pub fn multipliers(self) -> (f32, f32) {
        match self {
            SmashTier::Smash => SMASH_MULT,
            SmashTier::SuperSmash => SUPER_SMASH_MULT,
        }
    }
}

/// A paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub side: Side,
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Height with no size effects applied
    pub base_height: f32,
    /// Movement per tick with no effects applied
    pub base_speed: f32,
    /// One slot per assigned ability, in assignment order
    pub effects: Vec<EffectSlot>,
    pub incoming: Incoming,
}

impl Paddle {
    pub fn new(
        side: Side,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        speed: f32,
        abilities: &[AbilityKind],
    ) -> Self {
        Self {
            side,
            x,
            y,
            width,
            height,
            base_height: height,
            base_speed: speed,
            effects: abilities.iter().map(|&k| EffectSlot::new(k)).collect(),
            incoming: Incoming::default(),
        }
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Horizontal centre
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn slot(&self, kind: AbilityKind) -> Option<&EffectSlot> {
        self.effects.iter().find(|s| s.kind == kind)
    }

    pub fn slot_mut(&mut self, kind: AbilityKind) -> Option<&mut EffectSlot> {
        self.effects.iter_mut().find(|s| s.kind == kind)
    }

    #[inline]
    pub fn has(&self, kind: AbilityKind) -> bool {
        self.slot(kind).is_some()
    }

    /// Timed effect running, or instant effect fired this tick
    pub fn is_active(&self, kind: AbilityKind) -> bool {
        self.slot(kind).is_some_and(|s| s.active || s.pulse)
    }

    pub fn has_shield(&self) -> bool {
        self.is_active(AbilityKind::Shield)
    }

    /// Strongest smash tier currently applied
    pub fn smash_tier(&self) -> Option<SmashTier> {
        if self.is_active(AbilityKind::SuperSmash) {
            Some(SmashTier::SuperSmash)
        } else if self.is_active(AbilityKind::Smash) {
            Some(SmashTier::Smash)
        } else {
            None
        }
    }

    /// Movement per tick with speed boost and freeze applied
    pub fn effective_speed(&self) -> f32 {
        let mut speed = self.base_speed;
        if self.is_active(AbilityKind::SpeedBoost) {
            speed *= SPEED_BOOST_MULT;
        }
        if self.incoming.frozen {
            speed *= FREEZE_DAMPING;
        }
        speed
    }

    /// Move by one step. `direction` outside -1..=1 is ignored.
    pub fn move_dir(&mut self, direction: i8, bounds_height: f32) {
        if !(-1..=1).contains(&direction) || direction == 0 {
            return;
        }
        let mut dir = direction as f32;
        if self.incoming.reversed {
            dir = -dir;
        }
        self.y += dir * self.effective_speed();
        self.clamp_to(bounds_height);
    }

    /// Keep the paddle inside `[0, bounds_height - height]`
    pub fn clamp_to(&mut self, bounds_height: f32) {
        self.y = self.y.clamp(0.0, (bounds_height - self.height).max(0.0));
    }

    /// Recompute height from the baseline and current size effects
    pub fn apply_size(&mut self) {
        let mut height = self.base_height;
        if self.is_active(AbilityKind::GiantPaddle) {
            height *= GIANT_PADDLE_MULT;
        }
        if self.incoming.shrunk {
            height *= MINI_PADDLE_MULT;
        }
        self.height = height;
    }

    /// Advance every effect slot by one tick.
    ///
    /// Returns the abilities whose active window closed on this tick.
    pub fn tick_effects(&mut self) -> Vec<AbilityKind> {
        let mut expired = Vec::new();
        for slot in &mut self.effects {
            if slot.tick() {
                expired.push(slot.kind);
            }
        }
        if expired.contains(&AbilityKind::GiantPaddle) {
            self.apply_size();
        }
        expired
    }

    /// Instant abilities stay visible for exactly one tick
    pub fn clear_pulses(&mut self) {
        for slot in &mut self.effects {
            slot.pulse = false;
        }
    }
}

/// Score line and pending double-score bonuses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub player: u32,
    pub ai: u32,
    /// Double Score armed, per side
    pub double_armed: [bool; 2],
}

impl Score {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player,
            Side::Ai => self.ai,
        }
    }

    pub fn arm_double(&mut self, side: Side) {
        self.double_armed[side.index()] = true;
    }

    pub fn is_double_armed(&self, side: Side) -> bool {
        self.double_armed[side.index()]
    }

    /// Award a goal to `side`, consuming its double-score bonus.
    /// Returns the points awarded.
    pub fn award(&mut self, side: Side) -> u32 {
        let armed = &mut self.double_armed[side.index()];
        let points = if *armed { 2 } else { 1 };
        *armed = false;
        match side {
            Side::Player => self.player += points,
            Side::Ai => self.ai += points,
        }
        points
    }
}

/// Host-facing events for audio/visual hooks, drained every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    WallHit,
    PaddleHit { side: Side },
    Smash { side: Side, tier: SmashTier },
    ShieldBlock { side: Side },
    Score { side: Side, points: u32 },
    AbilityActivated { side: Side, kind: AbilityKind },
    MultiBallStart,
    MultiBallEnd,
    MatchEnd { winner: Side, player: u32, ai: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn paddle_with(abilities: &[AbilityKind]) -> Paddle {
        Paddle::new(Side::Player, 20.0, 250.0, 10.0, 100.0, 6.0, abilities)
    }

    #[test]
    fn test_integrate_moves_and_records_trail() {
        let mut ball = Ball::new(1, Vec2::new(100.0, 100.0), Vec2::new(4.0, -2.0), 8.0);
        ball.integrate();
        assert_eq!(ball.pos, Vec2::new(104.0, 98.0));
        assert_eq!(ball.trail.len(), 1);
        assert_eq!(ball.trail[0], Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_trail_is_bounded() {
        let mut ball = Ball::new(1, Vec2::ZERO, Vec2::new(1.0, 0.0), 8.0);
        for _ in 0..20 {
            ball.integrate();
        }
        assert_eq!(ball.trail.len(), TRAIL_LENGTH);
        // Oldest kept entry is 8 steps back
        assert_eq!(ball.trail[0], Vec2::new(12.0, 0.0));
    }

    #[test]
    fn test_gravity_adds_before_clamp() {
        let mut ball = Ball::new(1, Vec2::ZERO, Vec2::new(3.0, 0.0), 8.0);
        ball.gravity_applied = true;
        ball.integrate();
        assert!((ball.vel.y - GRAVITY_PER_TICK).abs() < 1e-6);

        let mut fast = Ball::new(2, Vec2::ZERO, Vec2::new(0.0, BALL_MAX_SPEED), 8.0);
        fast.gravity_applied = true;
        fast.integrate();
        assert!(fast.speed() <= BALL_MAX_SPEED + 1e-4);
    }

    #[test]
    fn test_reflect() {
        let mut ball = Ball::new(1, Vec2::ZERO, Vec2::new(3.0, -5.0), 8.0);
        ball.reflect(Axis::Y);
        assert_eq!(ball.vel, Vec2::new(3.0, 5.0));
        ball.reflect(Axis::X);
        assert_eq!(ball.vel, Vec2::new(-3.0, 5.0));
    }

    #[test]
    fn test_clone_fan_is_symmetric() {
        let primary = Ball::new(1, Vec2::new(400.0, 300.0), Vec2::new(4.0, 4.0), 8.0);
        let left = primary.spawn_clone(2, 0);
        let mid = primary.spawn_clone(3, 1);
        let right = primary.spawn_clone(4, 2);

        let base = primary.vel.to_angle();
        assert!((mid.vel - primary.vel).length() < 1e-5);
        assert!(((left.vel.to_angle() - base) + CLONE_SPREAD).abs() < 1e-5);
        assert!(((right.vel.to_angle() - base) - CLONE_SPREAD).abs() < 1e-5);
        assert!((left.speed() - primary.speed()).abs() < 1e-4);
        assert!(left.is_clone && right.is_clone);
        assert_eq!(left.pos, primary.pos);
    }

    #[test]
    fn test_serve_from_center() {
        let mut rng = Pcg32::seed_from_u64(3);
        for i in 0..20 {
            let ball = Ball::serve(i, Vec2::new(400.0, 300.0), 8.0, SERVE_SPEED, &mut rng);
            assert_eq!(ball.pos, Vec2::new(400.0, 300.0));
            assert_eq!(ball.vel.x.abs(), SERVE_SPEED);
            assert!(ball.vel.y.abs() <= SERVE_SPEED);
            assert!(!ball.is_clone);
        }
    }

    #[test]
    fn test_move_clamps_to_bounds() {
        let mut paddle = paddle_with(&[]);
        paddle.y = 2.0;
        paddle.move_dir(-1, 600.0);
        assert_eq!(paddle.y, 0.0);

        paddle.y = 498.0;
        paddle.move_dir(1, 600.0);
        assert_eq!(paddle.y, 500.0);
    }

    #[test]
    fn test_move_ignores_out_of_range_direction() {
        let mut paddle = paddle_with(&[]);
        paddle.move_dir(5, 600.0);
        paddle.move_dir(-3, 600.0);
        assert_eq!(paddle.y, 250.0);
    }

    #[test]
    fn test_speed_boost_and_modifiers() {
        let mut paddle = paddle_with(&[AbilityKind::SpeedBoost]);
        paddle.slot_mut(AbilityKind::SpeedBoost).unwrap().trigger();
        paddle.move_dir(1, 600.0);
        assert!((paddle.y - (250.0 + 6.0 * SPEED_BOOST_MULT)).abs() < 1e-4);

        let mut reversed = paddle_with(&[]);
        reversed.incoming.reversed = true;
        reversed.move_dir(1, 600.0);
        assert_eq!(reversed.y, 244.0);

        let mut frozen = paddle_with(&[]);
        frozen.incoming.frozen = true;
        frozen.move_dir(1, 600.0);
        assert!((frozen.y - (250.0 + 6.0 * FREEZE_DAMPING)).abs() < 1e-4);
    }

    #[test]
    fn test_tick_effects_idle_is_noop() {
        let mut paddle = paddle_with(&[AbilityKind::Shield, AbilityKind::Smash]);
        let before = paddle.clone();
        assert!(paddle.tick_effects().is_empty());
        assert_eq!(paddle.effects, before.effects);
        assert_eq!(paddle.height, before.height);
    }

    #[test]
    fn test_timed_slot_lifecycle() {
        let mut slot = EffectSlot::new(AbilityKind::Shield);
        slot.trigger();
        assert!(slot.active);
        assert_eq!(slot.duration_remaining, 90);
        assert_eq!(slot.cooldown_remaining, 300);

        for _ in 0..89 {
            assert!(!slot.tick());
        }
        assert!(slot.tick(), "closes on the 90th tick");
        assert!(!slot.active);
        assert_eq!(slot.cooldown_remaining, 210);
    }

    #[test]
    fn test_instant_slot_pulses() {
        let mut paddle = paddle_with(&[AbilityKind::Smash]);
        paddle.slot_mut(AbilityKind::Smash).unwrap().trigger();
        let slot = paddle.slot(AbilityKind::Smash).unwrap();
        assert!(slot.pulse && !slot.active);
        assert_eq!(paddle.smash_tier(), Some(SmashTier::Smash));

        paddle.clear_pulses();
        assert_eq!(paddle.smash_tier(), None);
    }

    #[test]
    fn test_super_smash_outranks_smash() {
        let mut paddle = paddle_with(&[AbilityKind::Smash, AbilityKind::SuperSmash]);
        paddle.slot_mut(AbilityKind::Smash).unwrap().trigger();
        paddle.slot_mut(AbilityKind::SuperSmash).unwrap().trigger();
        assert_eq!(paddle.smash_tier(), Some(SmashTier::SuperSmash));
    }

    #[test]
    fn test_giant_paddle_reverts_to_baseline() {
        let mut paddle = paddle_with(&[AbilityKind::GiantPaddle]);
        let baseline = paddle.height;
        for _ in 0..3 {
            paddle.slot_mut(AbilityKind::GiantPaddle).unwrap().trigger();
            paddle.apply_size();
            assert_eq!(paddle.height, baseline * GIANT_PADDLE_MULT);
            for _ in 0..240 {
                paddle.tick_effects();
            }
            assert_eq!(paddle.height.to_bits(), baseline.to_bits());
            // Let the cooldown run out before the next round
            for _ in 0..240 {
                paddle.tick_effects();
            }
        }
    }

    #[test]
    fn test_score_double_is_consumed() {
        let mut score = Score::default();
        score.arm_double(Side::Player);
        assert_eq!(score.award(Side::Ai), 1, "only the armed side doubles");
        assert_eq!(score.award(Side::Player), 2);
        assert!(!score.is_double_armed(Side::Player));
        assert_eq!(score.award(Side::Player), 1);
        assert_eq!((score.player, score.ai), (3, 1));
    }

    proptest! {
        #[test]
        fn prop_speed_never_exceeds_cap(
            vx in -40.0f32..40.0,
            vy in -40.0f32..40.0,
            smashes in proptest::collection::vec(0u8..3, 0..12),
            gravity in any::<bool>(),
        ) {
            let mut ball = Ball::new(1, Vec2::new(400.0, 300.0), Vec2::new(vx, vy), 8.0);
            ball.gravity_applied = gravity;
            for tier in smashes {
                let (mx, my) = match tier {
                    0 => (1.0, 1.0),
                    1 => SMASH_MULT,
                    _ => SUPER_SMASH_MULT,
                };
                ball.vel.x *= mx;
                ball.vel.y *= my;
                ball.integrate();
                prop_assert!(ball.speed() <= BALL_MAX_SPEED + 1e-3);
            }
        }
    }
}
