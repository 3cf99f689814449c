//! Sound output boundary
//!
//! The simulation only names the effect; an audio backend on another thread
//! decides what it sounds like.

use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};

use crate::settings::AudioSettings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Ball hits a side wall
    WallBounce,
    /// Ball hits a paddle
    PaddleHit,
    /// A point was scored
    Score,
}

impl SoundEffect {
    /// Asset name an audio backend can look the effect up by
    pub fn name(self) -> &'static str {
        match self {
            SoundEffect::WallBounce => "wall_bounce",
            SoundEffect::PaddleHit => "paddle_hit",
            SoundEffect::Score => "score",
        }
    }
}

/// Something that can play sound effects
pub trait SoundSink {
    /// Trigger an effect. Must not block the caller.
    fn play(&mut self, effect: SoundEffect);
}

/// Sink that drops everything
impl SoundSink for () {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// A queued effect with its final volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundCue {
    pub effect: SoundEffect,
    pub volume: f32,
}

/// Hands cues to an audio thread over an unbounded channel
pub struct ChannelSoundSink {
    tx: Sender<SoundCue>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    /// Set once the receiving side is gone so the warning is logged once
    disconnected: bool,
}

impl ChannelSoundSink {
    pub fn new(settings: &AudioSettings) -> (Self, Receiver<SoundCue>) {
        let (tx, rx) = mpsc::channel();
        let mut sink = Self {
            tx,
            master_volume: 1.0,
            sfx_volume: 1.0,
            muted: settings.muted,
            disconnected: false,
        };
        sink.set_master_volume(settings.master_volume);
        sink.set_sfx_volume(settings.sfx_volume);
        (sink, rx)
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

impl SoundSink for ChannelSoundSink {
    fn play(&mut self, effect: SoundEffect) {
        let volume = self.effective_volume();
        if volume <= 0.0 || self.disconnected {
            return;
        }
        if self.tx.send(SoundCue { effect, volume }).is_err() {
            log::warn!("Audio receiver dropped - sound disabled");
            self.disconnected = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_carries_effective_volume() {
        let settings = AudioSettings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            muted: false,
        };
        let (mut sink, rx) = ChannelSoundSink::new(&settings);
        sink.play(SoundEffect::PaddleHit);
        let cue = rx.try_recv().unwrap();
        assert_eq!(cue.effect, SoundEffect::PaddleHit);
        assert!((cue.volume - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_muted_sends_nothing() {
        let (mut sink, rx) = ChannelSoundSink::new(&AudioSettings::default());
        sink.set_muted(true);
        sink.play(SoundEffect::Score);
        assert!(rx.try_recv().is_err());

        sink.set_muted(false);
        sink.play(SoundEffect::Score);
        assert_eq!(rx.try_recv().unwrap().effect, SoundEffect::Score);
    }

    #[test]
    fn test_volume_is_clamped() {
        let (mut sink, _rx) = ChannelSoundSink::new(&AudioSettings::default());
        sink.set_master_volume(3.0);
        sink.set_sfx_volume(-1.0);
        assert_eq!(sink.effective_volume(), 0.0);
        sink.set_sfx_volume(1.0);
        assert_eq!(sink.effective_volume(), 1.0);
    }

    #[test]
    fn test_dropped_receiver_does_not_panic() {
        let (mut sink, rx) = ChannelSoundSink::new(&AudioSettings::default());
        drop(rx);
        sink.play(SoundEffect::WallBounce);
        sink.play(SoundEffect::WallBounce);
        assert!(sink.disconnected);
    }

    #[test]
    fn test_effect_names() {
        assert_eq!(SoundEffect::WallBounce.name(), "wall_bounce");
        assert_eq!(SoundEffect::Score.name(), "score");
    }
}
