//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (velocities are in units per tick)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod ball;
pub mod field;
pub mod geometry;
pub mod paddle;
pub mod particles;
pub mod state;
pub mod tick;

pub use ball::Ball;
pub use field::{Edge, Field, Orientation, Side};
pub use geometry::{Axis, Rect};
pub use paddle::{OpponentController, Paddle, PaddleRole};
pub use particles::{Particle, ParticleSystem};
pub use state::{GameEvent, GameMode, GamePhase, GameState, MatchState, ScoreOutcome};
pub use tick::{TickInput, tick};
