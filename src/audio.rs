//! Audio triggers
//!
//! The simulation only raises `GameEvent`s. The manager maps them to sound
//! effects, applies volume and mute, and hands them to whatever backend the
//! host plugs in. Playback is fire-and-forget.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player left the ground
    Jump,
    /// Coin picked up
    Coin,
    /// Anything took damage
    Hit,
    /// Fireball met enemy fire
    Explosion,
    /// Player or enemy fired
    Fire,
    /// Landing dust
    Splash,
    Pause,
    Unpause,
    /// Level exit opened
    DoorOpened,
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jump => Some(SoundEffect::Jump),
            GameEvent::Fire | GameEvent::EnemyFire => Some(SoundEffect::Fire),
            GameEvent::CoinCollected => Some(SoundEffect::Coin),
            GameEvent::EnemyHit | GameEvent::EnemyKilled | GameEvent::PlayerHit => {
                Some(SoundEffect::Hit)
            }
            GameEvent::Explosion => Some(SoundEffect::Explosion),
            GameEvent::Splash => Some(SoundEffect::Splash),
            GameEvent::Paused => Some(SoundEffect::Pause),
            GameEvent::Resumed => Some(SoundEffect::Unpause),
            GameEvent::DoorOpened => Some(SoundEffect::DoorOpened),
            GameEvent::FellOutOfWorld => None,
        }
    }

    /// Per-effect mix level
    fn gain(self) -> f32 {
        match self {
            SoundEffect::Jump => 0.5,
            SoundEffect::Coin => 0.6,
            SoundEffect::Hit => 0.7,
            SoundEffect::Explosion => 0.9,
            SoundEffect::Fire => 0.4,
            SoundEffect::Splash => 0.3,
            SoundEffect::Pause | SoundEffect::Unpause => 0.5,
            SoundEffect::DoorOpened => 0.8,
        }
    }
}

/// Playback backend supplied by the host
pub trait AudioSink {
    fn play_effect(&mut self, effect: SoundEffect, volume: f32);

    /// Start a looping music track, replacing the current one
    fn play_music(&mut self, track: &str, volume: f32);

    fn stop_music(&mut self);
}

/// Backend that plays nothing
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play_effect(&mut self, _effect: SoundEffect, _volume: f32) {}

    fn play_music(&mut self, _track: &str, _volume: f32) {}

    fn stop_music(&mut self) {}
}

/// Backend that only logs (headless runs)
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play_effect(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx {:?} at {:.2}", effect, volume);
    }

    fn play_music(&mut self, track: &str, volume: f32) {
        log::debug!("music {} at {:.2}", track, volume);
    }

    fn stop_music(&mut self) {
        log::debug!("music stopped");
    }
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }

    /// Take volumes and mute from user settings
    pub fn apply_settings(&mut self, settings: &crate::Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_music_volume(settings.music_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.sink.stop_music();
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn effective_volume(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(self.sfx_volume) * effect.gain();
        if vol <= 0.0 {
            return;
        }
        self.sink.play_effect(effect, vol);
    }

    /// Play the sounds for a batch of simulation events
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(|e| SoundEffect::for_event(*e)) {
            self.play(effect);
        }
    }

    /// Start a level's background track
    pub fn play_music(&mut self, track: &str) {
        let vol = self.effective_volume(self.music_volume);
        if vol <= 0.0 {
            return;
        }
        self.sink.play_music(track, vol);
    }

    pub fn stop_music(&mut self) {
        self.sink.stop_music();
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
