//! Game settings and tuning
//!
//! Loaded from a JSON file; every field has a default so partial files work.

use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::net::discovery::{DISCOVERY_PORT, DISCOVERY_WINDOW, GAME_PORT};
use crate::sim::Orientation;

/// Opponent controller tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentTuning {
    /// Fraction of full axis speed used when chasing the target (0-1]
    pub accuracy: f32,
    /// Resample the aim point every N approaching ticks
    pub reaction_ticks: u32,
    /// Aim error amplitude as a fraction of paddle length
    pub error_fraction: f32,
    /// No movement while the paddle centre is within this fraction of its length from the target
    pub dead_zone_fraction: f32,
}

impl Default for OpponentTuning {
    fn default() -> Self {
        Self {
            accuracy: OPPONENT_ACCURACY,
            reaction_ticks: OPPONENT_REACTION_TICKS,
            error_fraction: OPPONENT_ERROR_FRACTION,
            dead_zone_fraction: OPPONENT_DEAD_ZONE_FRACTION,
        }
    }
}

/// Particle burst tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    /// Particles per burst
    pub burst_size: usize,
    /// Alpha lost per tick
    pub alpha_step: u8,
    /// Velocity components are drawn from [-spread, spread]
    pub spread: f32,
    /// Pool cap; `None` lets the pool grow without limit
    pub max_particles: Option<usize>,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            burst_size: PARTICLE_BURST,
            alpha_step: PARTICLE_ALPHA_STEP,
            spread: PARTICLE_SPREAD,
            max_particles: None,
        }
    }
}

/// Sound output levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

/// LAN discovery endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySettings {
    /// Local address the host binds its sockets to
    pub bind_address: IpAddr,
    /// UDP port for discovery broadcasts
    pub discovery_port: u16,
    /// TCP port for the game connection
    pub game_port: u16,
    /// How long a joiner collects responses
    pub timeout_ms: u64,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            discovery_port: DISCOVERY_PORT,
            game_port: GAME_PORT,
            timeout_ms: DISCOVERY_WINDOW.as_millis() as u64,
        }
    }
}

impl DiscoverySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Paddle layout
    pub orientation: Orientation,
    /// Field size used when no display provides one (headless runs)
    pub field_width: f32,
    pub field_height: f32,
    /// Points needed to win
    pub winning_score: u32,
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Freeze after a non-winning point
    pub scoring_delay_secs: f32,
    /// RNG seed; random when absent
    pub seed: Option<u64>,

    pub opponent: OpponentTuning,
    pub particles: ParticleTuning,
    pub audio: AudioSettings,
    pub discovery: DiscoverySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            orientation: Orientation::Portrait,
            field_width: 1080.0,
            field_height: 1920.0,
            winning_score: WINNING_SCORE,
            tick_rate: TICK_RATE,
            scoring_delay_secs: SCORING_DELAY_SECS,
            seed: None,
            opponent: OpponentTuning::default(),
            particles: ParticleTuning::default(),
            audio: AudioSettings::default(),
            discovery: DiscoverySettings::default(),
        }
    }
}

impl Settings {
    /// Load and validate settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.winning_score == 0 {
            return Err(ConfigError::invalid("winning_score", "must be at least 1"));
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::invalid("tick_rate", "must be at least 1"));
        }
        if !self.scoring_delay_secs.is_finite() || self.scoring_delay_secs < 0.0 {
            return Err(ConfigError::invalid(
                "scoring_delay_secs",
                format!("{} is not a non-negative duration", self.scoring_delay_secs),
            ));
        }
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.field_width) || !positive(self.field_height) {
            return Err(ConfigError::invalid(
                "field_width/field_height",
                format!("{}x{} is not a usable field", self.field_width, self.field_height),
            ));
        }
        if !(self.opponent.accuracy > 0.0 && self.opponent.accuracy <= 1.0) {
            return Err(ConfigError::invalid("opponent.accuracy", "must be in (0, 1]"));
        }
        if self.opponent.reaction_ticks == 0 {
            return Err(ConfigError::invalid("opponent.reaction_ticks", "must be at least 1"));
        }
        if !(self.opponent.error_fraction >= 0.0 && self.opponent.dead_zone_fraction >= 0.0) {
            return Err(ConfigError::invalid(
                "opponent",
                "error and dead zone fractions must be non-negative",
            ));
        }
        if self.particles.alpha_step == 0 {
            return Err(ConfigError::invalid("particles.alpha_step", "particles would never fade"));
        }
        if !(self.particles.spread.is_finite() && self.particles.spread >= 0.0) {
            return Err(ConfigError::invalid("particles.spread", "must be non-negative"));
        }
        Ok(())
    }

    /// Ticks spent in the scoring delay (2 s at 60 Hz = 120)
    pub fn scoring_delay_ticks(&self) -> u32 {
        (self.scoring_delay_secs * self.tick_rate as f32).round() as u32
    }

    /// Nominal duration of one loop iteration
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate.max(1) as f64)
    }
}
