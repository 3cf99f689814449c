//! The ball: motion, wall bounces, paddle hits and the speed ratchet
//!
//! Paddle hits are the only speed-up event. Each hit multiplies the velocity
//! by a fixed factor while the ball is still under the cap, so a run of quick
//! hits converges on the cap and may overshoot it by at most one step.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::field::{Edge, Field};
use super::paddle::Paddle;
use super::particles::ParticleSystem;
use super::geometry::Rect;
use super::state::GameEvent;
use crate::color::Color;
use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    rect: Rect,
    /// Units per tick
    vel: Vec2,
    base_speed: f32,
    field: Field,
}

impl Ball {
    /// Create a ball for the field and serve it from the centre
    pub fn new<R: Rng + ?Sized>(field: &Field, rng: &mut R) -> Self {
        let size = field.movement_extent() / BALL_SIZE_DIVISOR;
        let mut ball = Self {
            rect: Rect::from_origin_size(Vec2::ZERO, Vec2::splat(size)),
            vel: Vec2::ZERO,
            base_speed: field.movement_extent() / BALL_SPEED_DIVISOR,
            field: *field,
        };
        ball.reset(rng);
        ball
    }

    #[inline]
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    #[inline]
    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Speed above which paddle hits stop adding speed
    pub fn speed_cap(&self) -> f32 {
        self.base_speed * BALL_SPEED_CAP
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    /// Recentre and serve in a random diagonal direction
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.rect.center_at_point(self.field.center());

        let along = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let across = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.vel = self.field.approach_axis().compose(
            self.base_speed * along,
            self.base_speed * BALL_CROSS_SPEED_RATIO * across,
        );
    }

    /// Advance one tick and resolve wall and paddle contacts.
    ///
    /// Paddles are resolved in the order given; a ball overlapping both in the
    /// same tick bounces off each in turn.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        paddles: [&Paddle; 2],
        particles: &mut ParticleSystem,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
        accent: Color,
    ) {
        self.rect.offset(self.vel);

        // Side walls run parallel to the approach axis
        let cross = self.field.movement_axis();
        let limit = self.field.extent(cross);
        if self.rect.min(cross) < 0.0 || self.rect.max(cross) > limit {
            let reflected = -cross.of(self.vel);
            cross.set(&mut self.vel, reflected);
            self.rect.clamp_within(cross, 0.0, limit);
            events.push(GameEvent::WallBounce);
        }

        for paddle in paddles {
            if self.rect.intersects(paddle.rect()) {
                self.resolve_paddle_hit(paddle, particles, rng, accent);
                events.push(GameEvent::PaddleHit(paddle.side()));
            }
        }
    }

    fn resolve_paddle_hit<R: Rng + ?Sized>(
        &mut self,
        paddle: &Paddle,
        particles: &mut ParticleSystem,
        rng: &mut R,
        accent: Color,
    ) {
        let axis = self.field.approach_axis();
        let reflected = -axis.of(self.vel);
        axis.set(&mut self.vel, reflected);

        if self.speed() < self.speed_cap() {
            self.vel *= PADDLE_SPEED_UP;
        }

        // Park just off the paddle's field-facing edge so the next tick can't re-hit it
        match paddle.edge() {
            Edge::Min => self
                .rect
                .move_min_to(axis, paddle.rect().max(axis) + ANTI_STICK_CLEARANCE),
            Edge::Max => self
                .rect
                .move_max_to(axis, paddle.rect().min(axis) - ANTI_STICK_CLEARANCE),
        }

        particles.create_explosion(self.center(), accent, rng);
    }

    /// Approach-axis edge the ball has completely crossed, if any
    pub fn exited(&self) -> Option<Edge> {
        let axis = self.field.approach_axis();
        if self.rect.max(axis) < 0.0 {
            Some(Edge::Min)
        } else if self.rect.min(axis) > self.field.extent(axis) {
            Some(Edge::Max)
        } else {
            None
        }
    }

    /// Place the ball at `center` moving with `velocity`
    #[cfg(test)]
    pub(crate) fn set_motion(&mut self, center: Vec2, velocity: Vec2) {
        self.rect.center_at_point(center);
        self.vel = velocity;
    }
}
