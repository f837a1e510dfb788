//! Sound cues
//!
//! The simulation never synthesizes audio. It queues named cues during a tick
//! and the host drains them into whatever synthesizer it owns.

use serde::{Deserialize, Serialize};

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCue {
    /// Hero fired a projectile
    Shoot,
    /// Warp engaged
    WarpStart,
    /// Warp disengaged (released or out of energy)
    WarpStop,
    /// Power-up or dust mote collected
    PickupCollected,
    /// Gained a level
    LevelUp,
    /// Ship destroyed
    Explosion,
    /// Entered a station
    Dock,
    /// Left a station
    Undock,
    /// Run ended
    GameOver,
}

impl AudioCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioCue::Shoot => "shoot",
            AudioCue::WarpStart => "warp-start",
            AudioCue::WarpStop => "warp-stop",
            AudioCue::PickupCollected => "pickup-collected",
            AudioCue::LevelUp => "level-up",
            AudioCue::Explosion => "explosion",
            AudioCue::Dock => "dock",
            AudioCue::Undock => "undock",
            AudioCue::GameOver => "game-over",
        }
    }
}

/// Anything that can react to a cue. Must not block.
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue, volume: f32);
}

/// Sink that discards every cue
#[derive(Debug, Default)]
pub struct SilentSink;

impl AudioSink for SilentSink {
    fn play(&mut self, _cue: AudioCue, _volume: f32) {}
}

/// Sink that writes cues to the log (handy for headless runs)
#[derive(Debug, Default)]
pub struct LogSink {
    pub played: usize,
}

impl AudioSink for LogSink {
    fn play(&mut self, cue: AudioCue, volume: f32) {
        self.played += 1;
        log::debug!("audio cue {} (vol {:.2})", cue.as_str(), volume);
    }
}

/// Cue queue filled during ticks
#[derive(Debug, Clone, Default)]
pub struct CueQueue {
    pending: Vec<AudioCue>,
}

impl CueQueue {
    pub fn push(&mut self, cue: AudioCue) {
        self.pending.push(cue);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn contains(&self, cue: AudioCue) -> bool {
        self.pending.contains(&cue)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Hand every pending cue to the sink, oldest first
    pub fn drain_into(&mut self, sink: &mut dyn AudioSink, volume: f32) {
        for cue in self.pending.drain(..) {
            sink.play(cue, volume);
        }
    }
}
