//! Collision detection and response
//!
//! Circle-vs-rectangle tests for the paddles, wall bounces and goal lines.
//! Awards points but never decides the match; that belongs to the injected
//! win policy.

use glam::Vec2;

use super::state::{Axis, Ball, GameEvent, Paddle, Score, Side};
use crate::consts::*;

/// Check a ball against a paddle rectangle.
///
/// Uses the closest point on the rectangle to the ball centre; contact is a
/// distance strictly below the radius.
pub fn ball_touches_paddle(ball_pos: Vec2, ball_radius: f32, paddle: &Paddle) -> bool {
    let min = Vec2::new(paddle.x, paddle.y);
    let max = min + Vec2::new(paddle.width, paddle.height);
    let closest = ball_pos.clamp(min, max);
    ball_pos.distance_squared(closest) < ball_radius * ball_radius
}

/// True once the ball centre has passed the paddle's back edge
fn behind_paddle(ball: &Ball, paddle: &Paddle) -> bool {
    match paddle.side {
        Side::Player => ball.pos.x < paddle.x,
        Side::Ai => ball.pos.x > paddle.x + paddle.width,
    }
}

/// Bounce off the top and bottom walls.
///
/// Returns true if the ball was reflected.
pub fn resolve_walls(ball: &mut Ball, field_height: f32) -> bool {
    let r = ball.radius;
    if ball.pos.y - r <= 0.0 {
        ball.pos.y = r;
        if ball.vel.y < 0.0 {
            ball.reflect(Axis::Y);
            return true;
        }
    } else if ball.pos.y + r >= field_height {
        ball.pos.y = field_height - r;
        if ball.vel.y > 0.0 {
            ball.reflect(Axis::Y);
            return true;
        }
    }
    false
}

/// Hit response against the paddle the ball is moving toward.
///
/// Returns the event to surface, or `None` if there was no contact.
pub fn resolve_paddle(ball: &mut Ball, paddle: &Paddle) -> Option<GameEvent> {
    let approaching = match paddle.side {
        Side::Player => ball.vel.x < 0.0,
        Side::Ai => ball.vel.x > 0.0,
    };
    // A ball behind the paddle is already lost, even if the paddle slides onto it
    if !approaching
        || behind_paddle(ball, paddle)
        || !ball_touches_paddle(ball.pos, ball.radius, paddle)
    {
        return None;
    }

    let side = paddle.side;
    let event = if paddle.has_shield() {
        ball.reflect(Axis::X);
        GameEvent::ShieldBlock { side }
    } else {
        let hit_fraction = ((ball.pos.y - paddle.y) / paddle.height).clamp(0.0, 1.0);
        ball.vel.y = (hit_fraction - 0.5) * HIT_DEFLECTION;
        ball.reflect(Axis::X);

        match paddle.smash_tier() {
            Some(tier) => {
                let (mx, my) = tier.multipliers();
                ball.vel.x *= mx;
                ball.vel.y *= my;
                GameEvent::Smash { side, tier }
            }
            None => {
                ball.vel.x *= RALLY_GROWTH;
                GameEvent::PaddleHit { side }
            }
        }
    };

    // Flush against the outer face
    ball.pos.x = match side {
        Side::Player => paddle.x + paddle.width + ball.radius,
        Side::Ai => paddle.x - ball.radius,
    };
    Some(event)
}

/// Which side scores if the ball has crossed a goal line
pub fn goal_scored(ball: &Ball, field_width: f32) -> Option<Side> {
    if ball.pos.x - ball.radius <= 0.0 {
        Some(Side::Ai)
    } else if ball.pos.x + ball.radius >= field_width {
        Some(Side::Player)
    } else {
        None
    }
}

/// Award a goal, consuming the scorer's double-score bonus
pub fn award_goal(score: &mut Score, side: Side, events: &mut Vec<GameEvent>) -> u32 {
    let points = score.award(side);
    events.push(GameEvent::Score { side, points });
    points
}

/// Walls, then paddles, then goal line for one already-integrated ball.
///
/// Returns the scoring side if the ball left play.
pub fn resolve_ball(
    ball: &mut Ball,
    paddles: &[Paddle; 2],
    field_width: f32,
    field_height: f32,
    events: &mut Vec<GameEvent>,
) -> Option<Side> {
    if resolve_walls(ball, field_height) {
        events.push(GameEvent::WallHit);
    }

    for paddle in paddles {
        if let Some(event) = resolve_paddle(ball, paddle) {
            events.push(event);
            break;
        }
    }

    goal_scored(ball, field_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::abilities::AbilityKind;
    use crate::sim::state::SmashTier;

    fn ai_paddle(abilities: &[AbilityKind]) -> Paddle {
        Paddle::new(Side::Ai, 770.0, 225.0, 10.0, 100.0, 6.0, abilities)
    }

    fn player_paddle(abilities: &[AbilityKind]) -> Paddle {
        Paddle::new(Side::Player, 20.0, 225.0, 10.0, 100.0, 6.0, abilities)
    }

    #[test]
    fn test_rally_scenario() {
        // Contact three quarters of the way down the paddle
        let paddle = ai_paddle(&[]);
        let mut ball = Ball::new(1, Vec2::new(765.0, 300.0), Vec2::new(4.0, 4.0), 8.0);

        let event = resolve_paddle(&mut ball, &paddle);
        assert_eq!(event, Some(GameEvent::PaddleHit { side: Side::Ai }));
        assert!((ball.vel.y - 2.5).abs() < 1e-6);
        assert!((ball.vel.x - (-4.2)).abs() < 1e-6);
    }

    #[test]
    fn test_shield_is_a_pure_bounce() {
        let mut paddle = ai_paddle(&[AbilityKind::Shield, AbilityKind::Smash]);
        paddle.slot_mut(AbilityKind::Shield).unwrap().trigger();
        paddle.slot_mut(AbilityKind::Smash).unwrap().trigger();
        let mut ball = Ball::new(1, Vec2::new(765.0, 240.0), Vec2::new(5.0, -3.0), 8.0);

        let event = resolve_paddle(&mut ball, &paddle);
        assert_eq!(event, Some(GameEvent::ShieldBlock { side: Side::Ai }));
        assert_eq!(ball.vel, Vec2::new(-5.0, -3.0));
    }

    #[test]
    fn test_strongest_smash_tier_applies() {
        let mut paddle = player_paddle(&[AbilityKind::Smash, AbilityKind::SuperSmash]);
        paddle.slot_mut(AbilityKind::Smash).unwrap().trigger();
        let mut ball = Ball::new(1, Vec2::new(35.0, 275.0), Vec2::new(-4.0, 0.0), 8.0);
        let event = resolve_paddle(&mut ball, &paddle);
        assert_eq!(
            event,
            Some(GameEvent::Smash {
                side: Side::Player,
                tier: SmashTier::Smash
            })
        );
        assert!((ball.vel.x - 6.0).abs() < 1e-6);

        paddle.slot_mut(AbilityKind::SuperSmash).unwrap().trigger();
        let mut ball = Ball::new(2, Vec2::new(35.0, 275.0), Vec2::new(-4.0, 0.0), 8.0);
        resolve_paddle(&mut ball, &paddle);
        assert!((ball.vel.x - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_ball_repositioned_flush() {
        let left = player_paddle(&[]);
        let mut ball = Ball::new(1, Vec2::new(33.0, 260.0), Vec2::new(-4.0, 1.0), 8.0);
        resolve_paddle(&mut ball, &left);
        assert_eq!(ball.pos.x, 38.0);
        // Moving away now: a second pass in the same tick does nothing
        assert_eq!(resolve_paddle(&mut ball, &left), None);

        let right = ai_paddle(&[]);
        let mut ball = Ball::new(2, Vec2::new(768.0, 260.0), Vec2::new(4.0, 1.0), 8.0);
        resolve_paddle(&mut ball, &right);
        assert_eq!(ball.pos.x, 762.0);
    }

    #[test]
    fn test_receding_ball_ignored() {
        let paddle = ai_paddle(&[]);
        let mut ball = Ball::new(1, Vec2::new(765.0, 260.0), Vec2::new(-4.0, 1.0), 8.0);
        assert_eq!(resolve_paddle(&mut ball, &paddle), None);
        assert_eq!(ball.vel, Vec2::new(-4.0, 1.0));
    }

    #[test]
    fn test_paddle_corner_contact() {
        let paddle = ai_paddle(&[]);
        // Diagonal to the top-left corner (770, 225), distance 7.07
        assert!(ball_touches_paddle(Vec2::new(765.0, 220.0), 8.0, &paddle));

        // Distance 8.49: clear
        assert!(!ball_touches_paddle(Vec2::new(764.0, 219.0), 8.0, &paddle));
    }

    #[test]
    fn test_centre_inside_paddle_pushes_out_front() {
        let paddle = player_paddle(&[]);
        assert!(ball_touches_paddle(Vec2::new(25.0, 260.0), 8.0, &paddle));

        let mut ball = Ball::new(1, Vec2::new(25.0, 260.0), Vec2::new(-4.0, 0.0), 8.0);
        assert_eq!(
            resolve_paddle(&mut ball, &paddle),
            Some(GameEvent::PaddleHit { side: Side::Player })
        );
        assert_eq!(ball.pos.x, 38.0);
        assert!(ball.vel.x > 0.0);
    }

    #[test]
    fn test_ball_behind_paddle_stays_lost() {
        // Paddle spans x 770..780; centre at 786 is past the back edge but
        // still within a radius of it
        let paddle = ai_paddle(&[]);
        let mut ball = Ball::new(1, Vec2::new(786.0, 300.0), Vec2::new(8.0, 3.0), 8.0);
        assert!(ball_touches_paddle(ball.pos, ball.radius, &paddle));
        assert_eq!(resolve_paddle(&mut ball, &paddle), None);
        assert_eq!(ball.pos, Vec2::new(786.0, 300.0));
        assert_eq!(ball.vel, Vec2::new(8.0, 3.0));

        let mut events = Vec::new();
        ball.integrate();
        let scored = resolve_ball(&mut ball, &[player_paddle(&[]), paddle], 800.0, 600.0, &mut events);
        assert_eq!(scored, Some(Side::Player));
        assert!(events.is_empty());

        let player = player_paddle(&[]);
        let mut ball = Ball::new(2, Vec2::new(16.0, 300.0), Vec2::new(-4.0, 0.0), 8.0);
        assert_eq!(resolve_paddle(&mut ball, &player), None);
    }

    #[test]
    fn test_wall_reflect_and_clamp() {
        let mut ball = Ball::new(1, Vec2::new(400.0, -5.0), Vec2::new(3.0, -6.0), 8.0);
        assert!(resolve_walls(&mut ball, 600.0));
        assert_eq!(ball.pos.y, 8.0);
        assert_eq!(ball.vel, Vec2::new(3.0, 6.0));

        let mut ball = Ball::new(2, Vec2::new(400.0, 598.0), Vec2::new(3.0, 6.0), 8.0);
        assert!(resolve_walls(&mut ball, 600.0));
        assert_eq!(ball.pos.y, 592.0);
        assert_eq!(ball.vel.y, -6.0);

        let mut ball = Ball::new(3, Vec2::new(400.0, 300.0), Vec2::new(3.0, 6.0), 8.0);
        assert!(!resolve_walls(&mut ball, 600.0));
    }

    #[test]
    fn test_goal_lines_account_for_radius() {
        let ball = Ball::new(1, Vec2::new(8.0, 300.0), Vec2::ZERO, 8.0);
        assert_eq!(goal_scored(&ball, 800.0), Some(Side::Ai));
        let ball = Ball::new(2, Vec2::new(792.0, 300.0), Vec2::ZERO, 8.0);
        assert_eq!(goal_scored(&ball, 800.0), Some(Side::Player));
        let ball = Ball::new(3, Vec2::new(9.0, 300.0), Vec2::ZERO, 8.0);
        assert_eq!(goal_scored(&ball, 800.0), None);
    }

    #[test]
    fn test_award_goal_consumes_double() {
        let mut score = Score::default();
        let mut events = Vec::new();
        score.arm_double(Side::Player);

        assert_eq!(award_goal(&mut score, Side::Player, &mut events), 2);
        assert_eq!(award_goal(&mut score, Side::Player, &mut events), 1);
        assert_eq!(score.player, 3);
        assert_eq!(
            events,
            vec![
                GameEvent::Score {
                    side: Side::Player,
                    points: 2
                },
                GameEvent::Score {
                    side: Side::Player,
                    points: 1
                },
            ]
        );
    }

    #[test]
    fn test_resolve_ball_reports_events_in_order() {
        let mut paddles = [player_paddle(&[]), ai_paddle(&[])];
        paddles[1].y = 500.0;
        let mut events = Vec::new();
        // Touching the AI paddle and the bottom wall at once
        let mut ball = Ball::new(1, Vec2::new(765.0, 595.0), Vec2::new(4.0, 3.0), 8.0);

        let scored = resolve_ball(&mut ball, &paddles, 800.0, 600.0, &mut events);
        assert_eq!(scored, None);
        assert_eq!(
            events,
            vec![GameEvent::WallHit, GameEvent::PaddleHit { side: Side::Ai }]
        );
    }
}
