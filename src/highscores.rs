//! Persisted high score
//!
//! A single scalar, stored under a fixed LocalStorage key as a decimal
//! string. Monotonic: only ever replaced by a larger value. This is the only
//! state that survives a reload.

/// The best score seen across rounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "nova_strike_highscore";

    pub fn new() -> Self {
        Self { best: 0 }
    }

    pub fn get(&self) -> u64 {
        self.best
    }

    /// Fold a finished round in: `best = max(best, score)`.
    /// Returns true (and persists) only when the record was beaten.
    pub fn record(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        self.save();
        true
    }

    /// Missing or unparseable stored values default to 0
    #[allow(dead_code)]
    fn from_stored(raw: Option<String>) -> Self {
        let best = raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0);
        Self { best }
    }

    /// Load the high score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(raw) = storage.get_item(Self::STORAGE_KEY) {
                let score = Self::from_stored(raw);
                log::info!("loaded high score: {}", score.best);
                return score;
            }
        }

        log::info!("no stored high score, starting at 0");
        Self::new()
    }

    /// Save the high score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.best.to_string());
            log::info!("high score saved: {}", self.best);
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_the_max() {
        let mut hs = HighScore::new();
        assert!(hs.record(120));
        assert_eq!(hs.get(), 120);
        // Lower and equal scores change nothing
        assert!(!hs.record(80));
        assert!(!hs.record(120));
        assert_eq!(hs.get(), 120);
        assert!(hs.record(121));
        assert_eq!(hs.get(), 121);
    }

    #[test]
    fn test_zero_never_counts_as_a_record() {
        let mut hs = HighScore::new();
        assert!(!hs.record(0));
        assert_eq!(hs.get(), 0);
    }

    #[test]
    fn test_stored_values_parse_or_default() {
        assert_eq!(HighScore::from_stored(None).get(), 0);
        assert_eq!(HighScore::from_stored(Some("".into())).get(), 0);
        assert_eq!(HighScore::from_stored(Some("garbage".into())).get(), 0);
        assert_eq!(HighScore::from_stored(Some("-5".into())).get(), 0);
        assert_eq!(HighScore::from_stored(Some("4210".into())).get(), 4210);
        assert_eq!(HighScore::from_stored(Some(" 99 ".into())).get(), 99);
    }
}
