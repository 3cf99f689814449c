//! Neon Pong - a two-paddle arcade game core
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (ball, paddles, opponent, particles, match state)
//! - `runner`: Fixed-cadence update -> render -> pace loop
//! - `renderer`: Abstract canvas and the per-frame render pass
//! - `platform`: Input mailbox shared with the event-delivery thread
//! - `audio`: Sound triggers and sinks
//! - `net`: LAN host discovery and connection handoff

pub mod audio;
pub mod color;
pub mod error;
pub mod net;
pub mod platform;
pub mod renderer;
pub mod runner;
pub mod settings;
pub mod sim;

pub use color::Color;
pub use error::{ConfigError, GameError};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// First side to reach this many points wins
    pub const WINNING_SCORE: u32 = 5;
    /// Freeze after a point before the ball is served again
    pub const SCORING_DELAY_SECS: f32 = 2.0;

    /// Ball edge length = movement extent / divisor
    pub const BALL_SIZE_DIVISOR: f32 = 60.0;
    /// Ball base speed (units per tick) = movement extent / divisor
    pub const BALL_SPEED_DIVISOR: f32 = 100.0;
    /// Serve speed on the cross axis relative to the approach axis
    pub const BALL_CROSS_SPEED_RATIO: f32 = 0.7;
    /// Paddle hits stop speeding the ball up past base speed * this
    pub const BALL_SPEED_CAP: f32 = 2.5;
    /// Speed boost when ball hits paddle (multiplicative)
    pub const PADDLE_SPEED_UP: f32 = 1.05;
    /// Gap left between ball and paddle after a hit
    pub const ANTI_STICK_CLEARANCE: f32 = 2.0;

    /// Paddle length = movement extent / divisor
    pub const PADDLE_LENGTH_DIVISOR: f32 = 4.0;
    /// Paddle thickness = approach extent / divisor
    pub const PADDLE_THICKNESS_DIVISOR: f32 = 40.0;
    /// Distance of a paddle from its scoring edge, as a fraction of the approach extent
    pub const PADDLE_INSET_FRACTION: f32 = 0.05;
    /// Opponent max speed per tick = movement extent / divisor
    pub const PADDLE_SPEED_DIVISOR: f32 = 60.0;

    /// Opponent defaults
    pub const OPPONENT_ACCURACY: f32 = 0.95;
    pub const OPPONENT_REACTION_TICKS: u32 = 2;
    pub const OPPONENT_ERROR_FRACTION: f32 = 0.05;
    pub const OPPONENT_DEAD_ZONE_FRACTION: f32 = 0.15;

    /// Particle defaults
    pub const PARTICLE_BURST: usize = 15;
    pub const PARTICLE_START_ALPHA: u8 = 255;
    pub const PARTICLE_ALPHA_STEP: u8 = 10;
    pub const PARTICLE_SPREAD: f32 = 5.0;
}
