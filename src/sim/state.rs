//! Match state machine and the aggregate game state
//!
//! `GameState` is built in one go once the field size is known; nothing in it
//! is ever half-initialised, so the loop can start as soon as it exists.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::field::{Field, Side};
use super::paddle::{Paddle, PaddleRole};
use super::particles::ParticleSystem;
use crate::audio::SoundEffect;
use crate::color::Color;
use crate::settings::Settings;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Short freeze after a point before the ball is served again
    ScoringDelay,
    /// Game is paused
    Paused,
    /// Someone reached the winning score; waits for a restart
    GameOver,
}

/// How the two paddles are driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Player against the scripted opponent
    #[default]
    VsAi,
    /// Two players sharing one screen, one per half
    LocalTwoPlayer,
    /// Paired over the LAN. Plays exactly like `VsAi`: no state is synchronised yet.
    LanMultiplayer,
}

impl GameMode {
    /// Whether the away paddle is computer-driven
    pub fn away_is_ai(self) -> bool {
        !matches!(self, GameMode::LocalTwoPlayer)
    }
}

/// Something the rest of the app may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    WallBounce,
    PaddleHit(Side),
    Scored(Side),
    GameOver { winner: Side },
    /// Ball put back in play after the scoring delay
    Served,
    Paused,
    Resumed,
    Restarted,
}

impl GameEvent {
    /// Sound trigger for this event, if any
    pub fn sound(&self) -> Option<SoundEffect> {
        match self {
            GameEvent::WallBounce => Some(SoundEffect::WallBounce),
            GameEvent::PaddleHit(_) => Some(SoundEffect::PaddleHit),
            GameEvent::Scored(_) => Some(SoundEffect::Score),
            _ => None,
        }
    }
}

/// Result of recording a point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreOutcome {
    /// Not in `Playing`; nothing recorded
    Ignored,
    /// Point recorded, scoring delay started
    Continue,
    /// Point recorded and it won the match
    Won(Side),
}

/// Scores and phase: the authoritative match state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    home_score: u32,
    away_score: u32,
    winning_score: u32,
    phase: GamePhase,
    /// Ticks spent in the current scoring delay
    delay_counter: u32,
    delay_ticks: u32,
}

impl MatchState {
    pub fn new(winning_score: u32, delay_ticks: u32) -> Self {
        Self {
            home_score: 0,
            away_score: 0,
            winning_score: winning_score.max(1),
            phase: GamePhase::Playing,
            delay_counter: 0,
            delay_ticks,
        }
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn home_score(&self) -> u32 {
        self.home_score
    }

    pub fn away_score(&self) -> u32 {
        self.away_score
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home_score,
            Side::Away => self.away_score,
        }
    }

    pub fn winning_score(&self) -> u32 {
        self.winning_score
    }

    pub fn delay_counter(&self) -> u32 {
        self.delay_counter
    }

    /// Winner once the match is over
    pub fn winner(&self) -> Option<Side> {
        if self.home_score >= self.winning_score {
            Some(Side::Home)
        } else if self.away_score >= self.winning_score {
            Some(Side::Away)
        } else {
            None
        }
    }

    /// Credit a point to `scorer`. Only counts while playing.
    pub fn record_point(&mut self, scorer: Side) -> ScoreOutcome {
        if self.phase != GamePhase::Playing {
            return ScoreOutcome::Ignored;
        }
        match scorer {
            Side::Home => self.home_score += 1,
            Side::Away => self.away_score += 1,
        }
        if let Some(winner) = self.winner() {
            self.phase = GamePhase::GameOver;
            ScoreOutcome::Won(winner)
        } else {
            self.phase = GamePhase::ScoringDelay;
            self.delay_counter = 0;
            ScoreOutcome::Continue
        }
    }

    /// Count one scoring-delay tick. Returns true when play resumes.
    pub fn advance_delay(&mut self) -> bool {
        if self.phase != GamePhase::ScoringDelay {
            return false;
        }
        self.delay_counter += 1;
        if self.delay_counter >= self.delay_ticks {
            self.delay_counter = 0;
            self.phase = GamePhase::Playing;
            true
        } else {
            false
        }
    }

    /// Playing <-> Paused. Returns the new phase, or `None` if toggling does
    /// not apply in the current phase.
    pub fn toggle_pause(&mut self) -> Option<GamePhase> {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            GamePhase::ScoringDelay | GamePhase::GameOver => return None,
        };
        Some(self.phase)
    }

    /// Zero the scores and resume play. Only valid from `GameOver`.
    pub fn restart(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        self.home_score = 0;
        self.away_score = 0;
        self.delay_counter = 0;
        self.phase = GamePhase::Playing;
        true
    }
}

/// Complete game state for one match
#[derive(Debug, Clone)]
pub struct GameState {
    pub field: Field,
    pub mode: GameMode,
    pub seed: u64,
    /// Simulation tick counter (ticks that actually ran)
    pub time_ticks: u64,
    pub matches: MatchState,
    pub ball: Ball,
    pub home: Paddle,
    pub away: Paddle,
    /// Visual particles (not gameplay-affecting)
    pub particles: ParticleSystem,
    /// Color of paddle-hit sparks
    pub hit_color: Color,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Build every entity for `field` at once
    pub fn new(field: Field, mode: GameMode, settings: &Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let ball = Ball::new(&field, &mut rng);
        let home = Paddle::new(&field, Side::Home, PaddleRole::Player, &settings.opponent);
        let away_role = if mode.away_is_ai() {
            PaddleRole::Opponent
        } else {
            PaddleRole::Player
        };
        let away = Paddle::new(&field, Side::Away, away_role, &settings.opponent);

        log::info!(
            "New {:?} match on {}x{} {:?} field (seed {}, first to {})",
            mode,
            field.width(),
            field.height(),
            field.orientation(),
            seed,
            settings.winning_score
        );

        Self {
            field,
            mode,
            seed,
            time_ticks: 0,
            matches: MatchState::new(settings.winning_score, settings.scoring_delay_ticks()),
            ball,
            home,
            away,
            particles: ParticleSystem::new(&settings.particles),
            hit_color: Color::YELLOW,
            events: Vec::new(),
            rng,
        }
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.matches.phase()
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    /// Playing <-> Paused; ignored in other phases
    pub fn toggle_pause(&mut self) {
        match self.matches.toggle_pause() {
            Some(GamePhase::Paused) => {
                log::info!("Paused");
                self.events.push(GameEvent::Paused);
            }
            Some(_) => {
                log::info!("Resumed");
                self.events.push(GameEvent::Resumed);
            }
            None => log::debug!("Pause toggle ignored in {:?}", self.phase()),
        }
    }

    /// Start a fresh match after game over; ignored otherwise
    pub fn restart(&mut self) {
        if self.matches.restart() {
            self.ball.reset(&mut self.rng);
            self.events.push(GameEvent::Restarted);
            log::info!("Match restarted");
        }
    }

    /// Credit a point, then either start the scoring delay or end the match
    pub(crate) fn award_point(&mut self, scorer: Side) {
        let outcome = self.matches.record_point(scorer);
        if outcome == ScoreOutcome::Ignored {
            return;
        }
        self.events.push(GameEvent::Scored(scorer));
        let (home, away) = (self.matches.home_score(), self.matches.away_score());

        if let ScoreOutcome::Won(winner) = outcome {
            let center = self.field.center();
            self.particles
                .create_explosion(center, Color::WHITE, &mut self.rng);
            self.events.push(GameEvent::GameOver { winner });
            log::info!("Game over: {:?} wins {}-{}", winner, home, away);
        } else {
            log::info!("{:?} scores ({}-{})", scorer, home, away);
        }
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
