//! Ephemeral particle bursts
//!
//! Purely visual: particles never feed back into gameplay.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::consts::PARTICLE_START_ALPHA;
use crate::settings::ParticleTuning;

/// A single fading spark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    /// 255 at spawn, drops by a fixed step each tick
    pub alpha: u8,
    pub alive: bool,
}

impl Particle {
    fn advance(&mut self, alpha_step: u8) {
        self.pos += self.vel;
        self.alpha = self.alpha.saturating_sub(alpha_step);
        if self.alpha == 0 {
            self.alive = false;
        }
    }
}

/// Pool of live particles
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    burst_size: usize,
    alpha_step: u8,
    spread: f32,
    max_particles: Option<usize>,
}

impl ParticleSystem {
    pub fn new(tuning: &ParticleTuning) -> Self {
        Self {
            particles: Vec::new(),
            burst_size: tuning.burst_size,
            alpha_step: tuning.alpha_step.max(1),
            spread: tuning.spread.max(0.0),
            max_particles: tuning.max_particles,
        }
    }

    /// Spawn a burst at `pos`, each particle with its own random velocity
    pub fn create_explosion<R: Rng + ?Sized>(&mut self, pos: Vec2, color: Color, rng: &mut R) {
        let spread = self.spread;
        self.particles.extend((0..self.burst_size).map(|_| Particle {
            pos,
            vel: Vec2::new(
                rng.random_range(-spread..=spread),
                rng.random_range(-spread..=spread),
            ),
            color,
            alpha: PARTICLE_START_ALPHA,
            alive: true,
        }));

        if let Some(max) = self.max_particles {
            if self.particles.len() > max {
                let excess = self.particles.len() - max;
                self.particles.drain(..excess);
                log::debug!("Particle pool full, evicted {} oldest", excess);
            }
        }
    }

    /// Integrate and fade every particle; drop the ones that died this tick
    pub fn advance(&mut self) {
        let step = self.alpha_step;
        self.particles.retain_mut(|p| {
            p.advance(step);
            p.alive
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
