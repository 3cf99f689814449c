//! Fixed-cadence game loop
//!
//! Each iteration runs one simulation tick, forwards events to the sound sink,
//! renders, then sleeps whatever is left of the tick period. The sleep is a
//! condvar wait so a stop request ends it immediately.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::audio::SoundSink;
use crate::error::GameError;
use crate::platform::InputMailbox;
use crate::renderer::{Canvas, render_frame};
use crate::sim::{GameEvent, GamePhase, GameState, tick};

/// Cooperative stop flag shared between the loop and its controllers
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self {
            inner: Arc::new((Mutex::new(true), Condvar::new())),
        }
    }

    /// Ask the loop to finish its current iteration and exit
    pub fn stop(&self) {
        let (running, cvar) = &*self.inner;
        *running.lock().unwrap_or_else(PoisonError::into_inner) = false;
        cvar.notify_all();
    }

    pub fn is_running(&self) -> bool {
        *self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleep up to `timeout`, waking early on `stop`. Returns whether the loop
    /// should keep running.
    pub fn wait(&self, timeout: Duration) -> bool {
        let (running, cvar) = &*self.inner;
        let guard = running.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = cvar
            .wait_timeout_while(guard, timeout, |running| *running)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

/// Drift-correcting frame pacing
#[derive(Debug, Clone)]
pub struct Pacer {
    period: Duration,
    overruns: u64,
}

impl Pacer {
    pub fn new(period: Duration) -> Self {
        Self { period, overruns: 0 }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Iterations that took longer than a full period
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// Time left in the period after `elapsed` of work; zero if overrun
    pub fn sleep_duration(&mut self, elapsed: Duration) -> Duration {
        if elapsed > self.period {
            self.overruns += 1;
            log::debug!("Frame overran by {:?}", elapsed - self.period);
        }
        self.period.saturating_sub(elapsed)
    }
}

/// Owns a match and everything it talks to
pub struct GameLoop<C, S> {
    state: GameState,
    input: Arc<InputMailbox>,
    canvas: C,
    sound: S,
    pacer: Pacer,
    shutdown: ShutdownSignal,
    stop_on_game_over: bool,
}

impl<C: Canvas, S: SoundSink> GameLoop<C, S> {
    pub fn new(
        state: GameState,
        input: Arc<InputMailbox>,
        canvas: C,
        sound: S,
        period: Duration,
    ) -> Self {
        Self {
            state,
            input,
            canvas,
            sound,
            pacer: Pacer::new(period),
            shutdown: ShutdownSignal::new(),
            stop_on_game_over: false,
        }
    }

    /// Exit the loop as soon as the match is decided (headless runs)
    pub fn stop_on_game_over(mut self, stop: bool) -> Self {
        self.stop_on_game_over = stop;
        self
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// One iteration without pacing: input, tick, events, render
    pub fn step(&mut self) {
        let input = self.input.take();
        tick(&mut self.state, &input);

        for event in self.state.drain_events() {
            if let Some(effect) = event.sound() {
                self.sound.play(effect);
            }
            match event {
                GameEvent::WallBounce | GameEvent::PaddleHit(_) => log::trace!("{:?}", event),
                _ => log::debug!("{:?} at tick {}", event, self.state.time_ticks),
            }
        }

        render_frame(&self.state, &mut self.canvas);
    }

    /// Run until stopped; hands the final state back
    pub fn run(mut self) -> GameState {
        log::info!(
            "Game loop started ({:.1} Hz)",
            1.0 / self.pacer.period().as_secs_f64().max(f64::EPSILON)
        );

        while self.shutdown.is_running() {
            let start = Instant::now();
            self.step();

            if self.stop_on_game_over && self.state.phase() == GamePhase::GameOver {
                log::info!("Match decided, stopping loop");
                break;
            }

            let sleep = self.pacer.sleep_duration(start.elapsed());
            if !self.shutdown.wait(sleep) {
                break;
            }
        }

        log::info!(
            "Game loop stopped after {} ticks ({} overruns)",
            self.state.time_ticks,
            self.pacer.overruns()
        );
        self.state
    }
}

impl<C, S> GameLoop<C, S>
where
    C: Canvas + Send + 'static,
    S: SoundSink + Send + 'static,
{
    /// Run the loop on its own thread
    pub fn spawn(self) -> LoopHandle {
        let shutdown = self.shutdown_signal();
        let thread = thread::spawn(move || self.run());
        LoopHandle {
            shutdown,
            thread: Some(thread),
        }
    }
}

/// Controls a loop running on another thread
#[derive(Debug)]
pub struct LoopHandle {
    shutdown: ShutdownSignal,
    thread: Option<JoinHandle<GameState>>,
}

impl LoopHandle {
    pub fn stop(&self) {
        self.shutdown.stop();
    }

    /// True once the loop has exited on its own (game over) or after `stop`
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Block until the loop exits on its own (or someone else stops it)
    pub fn wait(mut self) -> Result<GameState, GameError> {
        let thread = self.thread.take().ok_or(GameError::LoopPanicked)?;
        thread.join().map_err(|_| GameError::LoopPanicked)
    }

    /// Stop the loop and wait for it to exit
    pub fn join(self) -> Result<GameState, GameError> {
        self.stop();
        self.wait()
    }
}

impl Drop for LoopHandle {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            self.shutdown.stop();
            if thread.join().is_err() {
                log::warn!("Game loop thread panicked");
            }
        }
    }
}
