//! Run lifecycle around the simulation
//!
//! Owns the `SimState`, queues player input between frames, and turns the
//! events each tick produces into sounds and high score writes.

use crate::highscores::ScoreStore;
use crate::platform::SoundSink;
use crate::settings::Settings;
use crate::sim::{GameEvent, RunStatus, SimState, TickInput, Viewport, tick};
use crate::tuning::Tuning;

/// One player's game: simulation plus its storage and audio collaborators
pub struct Session<S: ScoreStore, A: SoundSink> {
    state: SimState,
    settings: Settings,
    input: TickInput,
    store: S,
    sound: A,
}

impl<S: ScoreStore, A: SoundSink> Session<S, A> {
    pub fn new(
        seed: u64,
        viewport: Viewport,
        tuning: Tuning,
        settings: Settings,
        store: S,
        sound: A,
    ) -> Self {
        let mut state = SimState::new(seed, viewport, tuning);
        state.high_score = store.read_high_score();
        state.particle_cap = settings.max_particles();

        Self {
            state,
            settings,
            input: TickInput::default(),
            store,
            sound,
        }
    }

    /// Tap/click/space; consumed at the start of the next frame
    pub fn on_primary_input(&mut self) {
        self.input.primary = true;
    }

    /// Leave a finished run for the title screen on the next frame
    pub fn return_to_menu(&mut self) {
        self.input.return_to_menu = true;
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        if self.input.autopilot != enabled {
            log::info!("Autopilot {}", if enabled { "on" } else { "off" });
        }
        self.input.autopilot = enabled;
    }

    pub fn toggle_autopilot(&mut self) {
        self.set_autopilot(!self.input.autopilot);
    }

    pub fn autopilot(&self) -> bool {
        self.input.autopilot
    }

    /// Track a canvas resize
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.viewport = Viewport::new(width, height);
    }

    /// Replace settings, applying the new particle cap and volume immediately
    pub fn apply_settings(&mut self, settings: Settings) {
        self.state.particle_cap = settings.max_particles();
        self.sound.set_volume(settings.effective_volume());
        self.settings = settings;
    }

    /// Flip the mute setting; returns the settings to persist
    pub fn toggle_mute(&mut self) -> &Settings {
        let settings = Settings {
            muted: !self.settings.muted,
            ..self.settings.clone()
        };
        log::info!("Sound {}", if settings.muted { "muted" } else { "on" });
        self.apply_settings(settings);
        &self.settings
    }

    /// Advance one animation frame
    pub fn frame(&mut self, elapsed_ms: f32) {
        tick(&mut self.state, &self.input, elapsed_ms);

        // One-shot flags are consumed even when the frame was skipped
        self.input.primary = false;
        self.input.return_to_menu = false;

        for event in std::mem::take(&mut self.state.events) {
            match event {
                GameEvent::Sound(cue) => self.sound.play(cue),
                GameEvent::RunStarted => {}
                GameEvent::Crashed { score } | GameEvent::Victory { score } => {
                    self.record_score(score);
                }
            }
        }
    }

    fn record_score(&mut self, score: u32) {
        let stored = self.store.read_high_score();
        if score > stored {
            self.store.persist_high_score(score);
        }
        self.state.high_score = self.state.high_score.max(stored.max(score));
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimState {
        &mut self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn status(&self) -> RunStatus {
        self.state.status
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sound(&self) -> &A {
        &self.sound
    }
}
