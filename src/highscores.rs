//! Best score persistence
//!
//! A single number stored as JSON under `highScore` in LocalStorage. Missing or
//! corrupt values read as 0.

/// LocalStorage key for the best score
pub const STORAGE_KEY: &str = "highScore";

/// Parse a stored best score; anything unreadable becomes 0
pub fn parse_high_score(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return 0;
    };
    match serde_json::from_str::<f64>(raw.trim()) {
        Ok(value) if value.is_finite() && value > 0.0 => value.min(u32::MAX as f64) as u32,
        Ok(_) => 0,
        Err(e) => {
            log::warn!("Ignoring corrupt high score {:?}: {}", raw, e);
            0
        }
    }
}

/// Where the best score lives between sessions
pub trait ScoreStore {
    /// Best stored score, 0 if absent or corrupt
    fn read_high_score(&self) -> u32;
    fn persist_high_score(&mut self, score: u32);
}

/// In-memory store holding the raw stored text (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub raw: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an arbitrary stored string, valid or not
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
        }
    }
}

impl ScoreStore for MemoryStore {
    fn read_high_score(&self) -> u32 {
        parse_high_score(self.raw.as_deref())
    }

    fn persist_high_score(&mut self, score: u32) {
        self.raw = serde_json::to_string(&score).ok();
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStore {
    fn read_high_score(&self) -> u32 {
        let raw = Self::storage().and_then(|s| s.get_item(STORAGE_KEY).ok().flatten());
        let score = parse_high_score(raw.as_deref());
        log::info!("Loaded high score {}", score);
        score
    }

    fn persist_high_score(&mut self, score: u32) {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, high score not saved");
            return;
        };
        if let Ok(json) = serde_json::to_string(&score) {
            if storage.set_item(STORAGE_KEY, &json).is_err() {
                log::warn!("Failed to save high score");
            } else {
                log::info!("High score saved ({})", score);
            }
        }
    }
}
