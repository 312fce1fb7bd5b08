//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing (rAF timestamps to elapsed ms)
//! - Sound output

use crate::sim::SoundCue;

/// Anything that can voice a sound cue
pub trait SoundSink {
    fn play(&mut self, cue: SoundCue);

    /// Output gain in `0..=1`; 0 silences every cue
    fn set_volume(&mut self, _volume: f32) {}
}

/// Silent sink for native builds and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct Muted;

impl SoundSink for Muted {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Converts absolute frame timestamps into per-frame elapsed time
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the previous call; 0 on the first frame
    pub fn elapsed_ms(&mut self, now_ms: f64) -> f32 {
        let elapsed = match self.last {
            Some(last) => (now_ms - last).max(0.0),
            None => 0.0,
        };
        self.last = Some(now_ms);
        elapsed as f32
    }

    /// Forget the previous timestamp (e.g. after the tab was hidden)
    pub fn reset(&mut self) {
        self.last = None;
    }
}
