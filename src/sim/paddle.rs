//! Paddles and the scripted opponent
//!
//! The opponent is deliberately imperfect: it re-aims only every few ticks,
//! aims with a small random error, and moves slower than the paddle could.
//! A dead zone around the aim point stops it twitching once lined up.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::field::{Edge, Field, Side};
use super::geometry::{Axis, Rect};
use crate::consts::*;
use crate::settings::OpponentTuning;

/// Who drives a paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaddleRole {
    Player,
    Opponent,
}

/// Pursuit state for a computer-driven paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentController {
    /// Approaching ticks since the last re-aim
    reaction_counter: u32,
    /// Cached aim point on the movement axis
    target: f32,
    reaction_ticks: u32,
    accuracy: f32,
    error_fraction: f32,
    dead_zone_fraction: f32,
}

impl OpponentController {
    fn new(tuning: &OpponentTuning, initial_target: f32) -> Self {
        Self {
            reaction_counter: 0,
            target: initial_target,
            reaction_ticks: tuning.reaction_ticks.max(1),
            accuracy: tuning.accuracy,
            error_fraction: tuning.error_fraction,
            dead_zone_fraction: tuning.dead_zone_fraction,
        }
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn reaction_counter(&self) -> u32 {
        self.reaction_counter
    }
}

/// A paddle guarding one end of the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    rect: Rect,
    role: PaddleRole,
    side: Side,
    /// Approach-axis edge this paddle guards
    edge: Edge,
    /// Axis the paddle slides along
    axis: Axis,
    /// Field extent on `axis`
    travel: f32,
    /// Opponent max speed per tick
    axis_speed: f32,
    controller: OpponentController,
}

impl Paddle {
    /// Create a paddle centred on its movement axis, inset from its edge
    pub fn new(field: &Field, side: Side, role: PaddleRole, tuning: &OpponentTuning) -> Self {
        let axis = field.movement_axis();
        let approach = field.approach_axis();
        let travel = field.movement_extent();
        let length = travel / PADDLE_LENGTH_DIVISOR;
        let thickness = field.approach_extent() / PADDLE_THICKNESS_DIVISOR;
        let inset = field.approach_extent() * PADDLE_INSET_FRACTION;
        let edge = field.edge_of(side);

        let along = (travel - length) * 0.5;
        let across = match edge {
            Edge::Min => inset,
            Edge::Max => field.approach_extent() - inset - thickness,
        };
        let origin = axis.compose(along, across);
        let size = axis.compose(length, thickness);
        let rect = Rect::from_origin_size(origin, size);

        debug_assert_eq!(approach, axis.other());
        Self {
            rect,
            role,
            side,
            edge,
            axis,
            travel,
            axis_speed: travel / PADDLE_SPEED_DIVISOR,
            controller: OpponentController::new(tuning, travel * 0.5),
        }
    }

    #[inline]
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    #[inline]
    pub fn role(&self) -> PaddleRole {
        self.role
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn edge(&self) -> Edge {
        self.edge
    }

    pub fn controller(&self) -> &OpponentController {
        &self.controller
    }

    /// Length along the movement axis
    pub fn length(&self) -> f32 {
        self.rect.extent(self.axis)
    }

    /// Centre position along the movement axis
    pub fn center(&self) -> f32 {
        self.rect.center_on(self.axis)
    }

    /// Centre the paddle on a pointer coordinate (movement axis), clamped to the field.
    /// Non-finite coordinates are ignored.
    pub fn move_player(&mut self, coordinate: f32) {
        if !coordinate.is_finite() {
            return;
        }
        let length = self.length();
        let min = (coordinate - length * 0.5).clamp(0.0, (self.travel - length).max(0.0));
        self.rect.move_min_to(self.axis, min);
    }

    /// One tick of opponent pursuit.
    ///
    /// `ball_coordinate` is the ball centre on the movement axis and
    /// `ball_velocity` its velocity along the approach axis.
    pub fn update_opponent<R: Rng + ?Sized>(
        &mut self,
        ball_coordinate: f32,
        ball_velocity: f32,
        rng: &mut R,
    ) {
        let approaching = match self.edge {
            Edge::Min => ball_velocity < 0.0,
            Edge::Max => ball_velocity > 0.0,
        };
        if !approaching {
            return;
        }

        let length = self.length();
        let c = &mut self.controller;
        c.reaction_counter += 1;
        if c.reaction_counter >= c.reaction_ticks {
            c.reaction_counter = 0;
            let error = length * c.error_fraction * (rng.random::<f32>() - 0.5);
            c.target = ball_coordinate + error;
        }

        let center = self.rect.center_on(self.axis);
        let dead_zone = length * c.dead_zone_fraction;
        let step = self.axis_speed * c.accuracy;
        if c.target < center - dead_zone {
            self.rect.offset_along(self.axis, -step);
        } else if c.target > center + dead_zone {
            self.rect.offset_along(self.axis, step);
        }

        self.rect.clamp_within(self.axis, 0.0, self.travel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Orientation;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn portrait() -> Field {
        Field::new(600.0, 1000.0, Orientation::Portrait).unwrap()
    }

    fn opponent(field: &Field) -> Paddle {
        Paddle::new(field, Side::Away, PaddleRole::Opponent, &OpponentTuning::default())
    }

    #[test]
    fn test_initial_layout_portrait() {
        let field = portrait();
        let home = Paddle::new(&field, Side::Home, PaddleRole::Player, &OpponentTuning::default());
        let away = opponent(&field);

        assert_eq!(home.length(), 150.0);
        assert_eq!(home.center(), 300.0);
        assert_eq!(home.rect().height(), 25.0);
        // Home guards the bottom, away the top
        assert_eq!(home.rect().bottom(), 950.0);
        assert_eq!(away.rect().top(), 50.0);
    }

    #[test]
    fn test_initial_layout_landscape() {
        let field = Field::new(1000.0, 600.0, Orientation::Landscape).unwrap();
        let home = Paddle::new(&field, Side::Home, PaddleRole::Player, &OpponentTuning::default());
        assert_eq!(home.edge(), Edge::Min);
        assert_eq!(home.rect().left(), 50.0);
        assert_eq!(home.rect().height(), 150.0);
        assert_eq!(home.center(), 300.0);
    }

    #[test]
    fn test_move_player_centers_and_clamps() {
        let field = portrait();
        let tuning = OpponentTuning::default();
        let mut paddle = Paddle::new(&field, Side::Home, PaddleRole::Player, &tuning);

        paddle.move_player(200.0);
        assert_eq!(paddle.center(), 200.0);

        paddle.move_player(-50.0);
        assert_eq!(paddle.rect().left(), 0.0);

        paddle.move_player(10_000.0);
        assert_eq!(paddle.rect().right(), 600.0);

        // Same coordinate twice is a no-op
        let before = paddle.clone();
        paddle.move_player(10_000.0);
        assert_eq!(paddle, before);
    }

    #[test]
    fn test_move_player_ignores_non_finite() {
        let field = portrait();
        let tuning = OpponentTuning::default();
        let mut paddle = Paddle::new(&field, Side::Home, PaddleRole::Player, &tuning);
        paddle.move_player(200.0);
        let before = paddle.clone();
        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            paddle.move_player(bad);
            assert_eq!(paddle, before);
        }
    }

    #[test]
    fn test_opponent_ignores_receding_ball() {
        let field = portrait();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut paddle = opponent(&field);
        let before = paddle.clone();
        // Away paddle sits at the top: positive y velocity is moving away
        for _ in 0..10 {
            paddle.update_opponent(0.0, 5.0, &mut rng);
        }
        assert_eq!(paddle, before);
    }

    #[test]
    fn test_opponent_resamples_every_second_tick() {
        let field = portrait();
        let mut rng = Pcg32::seed_from_u64(8);
        let mut paddle = opponent(&field);

        paddle.update_opponent(100.0, -5.0, &mut rng);
        assert_eq!(paddle.controller().reaction_counter(), 1);
        assert_eq!(paddle.controller().target(), 300.0);

        paddle.update_opponent(100.0, -5.0, &mut rng);
        assert_eq!(paddle.controller().reaction_counter(), 0);
        // Error is within +-2.5% of the 150 unit paddle
        assert!((paddle.controller().target() - 100.0).abs() <= 3.75);
    }

    #[test]
    fn test_opponent_moves_at_fractional_speed() {
        let field = portrait();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut paddle = opponent(&field);
        paddle.update_opponent(50.0, -5.0, &mut rng);
        paddle.update_opponent(50.0, -5.0, &mut rng);
        let start = paddle.center();
        paddle.update_opponent(50.0, -5.0, &mut rng);
        let step = 600.0 / 60.0 * 0.95;
        assert!((start - paddle.center() - step).abs() < 1e-3);
    }

    #[test]
    fn test_opponent_dead_zone_holds_still() {
        let field = portrait();
        let mut rng = Pcg32::seed_from_u64(10);
        let mut paddle = opponent(&field);
        // Ball straight at the paddle centre: target stays inside the dead zone
        for _ in 0..20 {
            paddle.update_opponent(paddle.center(), -5.0, &mut rng);
        }
        assert_eq!(paddle.center(), 300.0);
    }

    #[test]
    fn test_opponent_converges_on_ball() {
        let field = portrait();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut paddle = opponent(&field);
        for _ in 0..200 {
            paddle.update_opponent(500.0, -5.0, &mut rng);
        }
        assert!((paddle.center() - 500.0).abs() <= paddle.length() * 0.15 + 10.0);
    }

    proptest! {
        #[test]
        fn prop_paddles_stay_in_field(
            moves in prop::collection::vec((-2000.0f32..2000.0, -20.0f32..20.0, any::<bool>()), 1..200),
            landscape in any::<bool>(),
            seed in any::<u64>(),
        ) {
            let orientation = if landscape { Orientation::Landscape } else { Orientation::Portrait };
            let field = Field::new(800.0, 500.0, orientation).unwrap();
            let axis = field.movement_axis();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut player = Paddle::new(&field, Side::Home, PaddleRole::Player, &OpponentTuning::default());
            let mut bot = opponent(&field);

            for (coordinate, velocity, pointer) in moves {
                if pointer {
                    player.move_player(coordinate);
                }
                bot.update_opponent(coordinate, velocity, &mut rng);
                for paddle in [&player, &bot] {
                    prop_assert!(paddle.rect().min(axis) >= 0.0);
                    prop_assert!(paddle.rect().max(axis) <= field.movement_extent() + 1e-3);
                }
            }
        }
    }
}
