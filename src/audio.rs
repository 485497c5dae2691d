//! Audio cues
//!
//! The simulation never plays sound. It emits [`GameEvent`]s; the
//! [`AudioManager`] turns them into cues for whatever backend the host
//! provides (a mixer, a sound pool, or just the log).

use crate::scheduler::{EventSink, SchedulerState};
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Actor flapped
    Flap,
    /// Actor hit a pipe or the floor
    Crash,
    /// Pipe passed
    Point,
}

impl SoundEffect {
    /// Sound for an event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Impulse => Some(SoundEffect::Flap),
            GameEvent::Crash { .. } => Some(SoundEffect::Crash),
            GameEvent::Scored { .. } => Some(SoundEffect::Point),
            GameEvent::Restarted
            | GameEvent::SpawnSuspended { .. }
            | GameEvent::SpawnResumed => None,
        }
    }
}

/// Something that can actually make noise
pub trait AudioBackend: Send {
    fn play(&mut self, effect: SoundEffect, volume: f32);
    /// Start (`Some(volume)`) or stop (`None`) the looping background track
    fn set_music(&mut self, volume: Option<f32>);
}

/// Backend that only logs cues (headless runs)
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx {effect:?} at {volume:.2}");
    }

    fn set_music(&mut self, volume: Option<f32>) {
        match volume {
            Some(v) => log::debug!("music on at {v:.2}"),
            None => log::debug!("music off"),
        }
    }
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    music_on: bool,
}

impl Default for AudioManager<LogBackend> {
    fn default() -> Self {
        Self::new(LogBackend)
    }
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            music_on: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
        self.refresh_music();
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
        self.refresh_music();
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.refresh_music();
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
        let vol = self.effective_volume(self.sfx_volume);
        if vol <= 0.0 {
            return;
        }
        self.backend.play(effect, vol);
    }

    fn refresh_music(&mut self) {
        if !self.music_on {
            return;
        }
        let vol = self.effective_volume(self.music_volume);
        self.backend.set_music((vol > 0.0).then_some(vol));
    }
}

impl<B: AudioBackend> EventSink for AudioManager<B> {
    fn on_event(&mut self, event: &GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }

    /// Background music loops for as long as the game loop runs
    fn on_lifecycle(&mut self, state: SchedulerState) {
        match state {
            SchedulerState::Running => {
                self.music_on = true;
                self.refresh_music();
            }
            SchedulerState::Stopped => {
                self.music_on = false;
                self.backend.set_music(None);
            }
        }
    }
}
