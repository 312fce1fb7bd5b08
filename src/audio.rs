//! Audio system using Web Audio API
//!
//! Every cue is a single synthesized sweep - no external files needed.

use crate::sim::SoundCue;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

/// One exponential frequency/gain sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    /// Seconds
    pub duration: f64,
    pub start_gain: f32,
    pub end_gain: f32,
}

impl Tone {
    /// Start and end gain at `volume`, both scaled so quiet output still fades
    pub fn gain_ramp(&self, volume: f32) -> (f32, f32) {
        let start = (self.start_gain * volume).max(MIN_GAIN);
        let end = (self.end_gain * volume).max(MIN_GAIN).min(start);
        (start, end)
    }

    const fn sweep(waveform: Waveform, start_hz: f32, end_hz: f32, duration: f64) -> Self {
        Self {
            waveform,
            start_hz,
            end_hz,
            duration,
            start_gain: 0.1,
            end_gain: 0.01,
        }
    }
}

/// Exponential ramps cannot target zero
const MIN_GAIN: f32 = 1e-4;

/// Semitone-ish step between combo levels
const COMBO_STEP: f32 = 1.059;

/// Synth parameters for a cue
pub fn tone_for(cue: SoundCue) -> Tone {
    match cue {
        SoundCue::Flip => Tone::sweep(Waveform::Sine, 300.0, 400.0, 0.1),
        SoundCue::Match => Tone::sweep(Waveform::Triangle, 600.0, 800.0, 0.05),
        SoundCue::PowerUp => Tone::sweep(Waveform::Sine, 800.0, 1200.0, 0.3),
        SoundCue::Combo(level) => {
            let base = 440.0 * COMBO_STEP.powi(level.min(48) as i32);
            Tone::sweep(Waveform::Square, base, base * 1.5, 0.2)
        }
        SoundCue::Crash => Tone {
            waveform: Waveform::Sawtooth,
            start_hz: 100.0,
            end_hz: 0.01,
            duration: 0.5,
            start_gain: 0.3,
            end_gain: 0.01,
        },
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{Tone, Waveform, tone_for};
    use crate::platform::SoundSink;
    use crate::settings::Settings;
    use crate::sim::SoundCue;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn play_tone(&self, ctx: &AudioContext, tone: Tone) {
            let osc_type = match tone.waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Triangle => OscillatorType::Triangle,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
            };
            let Some((osc, gain)) = self.create_osc(ctx, tone.start_hz, osc_type) else {
                return;
            };
            let t = ctx.current_time();
            let end = t + tone.duration;

            let (start_gain, end_gain) = tone.gain_ramp(self.volume);
            gain.gain().set_value_at_time(start_gain, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(end_gain, end)
                .ok();
            osc.frequency().set_value_at_time(tone.start_hz, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(tone.end_hz, end)
                .ok();

            osc.start().ok();
            osc.stop_with_when(end).ok();
        }
    }

    impl SoundSink for AudioManager {
        fn play(&mut self, cue: SoundCue) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            self.play_tone(ctx, tone_for(cue));
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }
}
