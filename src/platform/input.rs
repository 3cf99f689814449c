//! Thread-safe input mailbox
//!
//! Pointer and tap events land here from whatever thread delivers them. The
//! simulation thread takes the accumulated [`TickInput`] once per tick, so a
//! tick always sees one consistent snapshot.

use std::sync::{Mutex, MutexGuard, PoisonError};

use glam::Vec2;

use crate::renderer::pause_button;
use crate::sim::{Field, GameMode, Side, TickInput};

#[derive(Debug)]
pub struct InputMailbox {
    field: Field,
    mode: GameMode,
    pending: Mutex<TickInput>,
}

impl InputMailbox {
    pub fn new(field: Field, mode: GameMode) -> Self {
        Self {
            field,
            mode,
            pending: Mutex::new(TickInput::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TickInput> {
        // Every field is independently valid, so a poisoned lock is still usable
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pointer moved or pressed at `pos` (field coordinates).
    ///
    /// In local two-player the half of the field decides which paddle follows;
    /// otherwise the home paddle always does. Later events overwrite earlier ones.
    /// Non-finite positions are dropped.
    pub fn pointer(&self, pos: Vec2) {
        if !pos.is_finite() {
            log::debug!("Ignoring non-finite pointer {}", pos);
            return;
        }
        let side = match self.mode {
            GameMode::LocalTwoPlayer => self.field.side_of(pos),
            GameMode::VsAi | GameMode::LanMultiplayer => Side::Home,
        };
        let coordinate = self.field.movement_axis().of(pos);
        let mut input = self.lock();
        match side {
            Side::Home => input.home_target = Some(coordinate),
            Side::Away => input.away_target = Some(coordinate),
        }
    }

    /// A tap (press and release) at `pos`.
    ///
    /// Taps on the pause button toggle pause. Any other tap moves the paddle
    /// and requests a restart, which only takes effect after game over.
    pub fn tap(&self, pos: Vec2) {
        if pause_button(&self.field).contains(pos) {
            self.pause_tapped();
            return;
        }
        self.pointer(pos);
        self.restart_tapped();
    }

    pub fn pause_tapped(&self) {
        let mut input = self.lock();
        // Two taps within one tick cancel out
        input.pause = !input.pause;
    }

    pub fn restart_tapped(&self) {
        self.lock().restart = true;
    }

    /// Autopilot for the home paddle (attract/demo mode)
    pub fn set_idle_mode(&self, idle: bool) {
        self.lock().idle_mode = idle;
    }

    /// Take everything accumulated since the last call.
    ///
    /// One-shot flags and pointer targets are consumed; idle mode persists.
    pub fn take(&self) -> TickInput {
        let mut input = self.lock();
        let idle_mode = input.idle_mode;
        std::mem::replace(
            &mut *input,
            TickInput {
                idle_mode,
                ..Default::default()
            },
        )
    }
}
