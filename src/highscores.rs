//! Best-score persistence
//!
//! A single integer stored as plain text under `STORAGE_KEY` (LocalStorage on
//! the web). Read once when the game is created, written only when a round
//! ends on a new record. Anything unreadable counts as zero.

use std::cell::RefCell;
use std::rc::Rc;

/// LocalStorage key for the best score
pub const STORAGE_KEY: &str = "cyberaim_highscore";

/// Where the best score lives between sessions
pub trait HighScoreStore {
    /// Stored best score, 0 if missing or malformed
    fn load(&self) -> u64;
    fn save(&mut self, score: u64);
}

/// Parse a stored value. Missing, negative or garbled input is 0.
pub fn parse_high_score(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok()).unwrap_or(0)
}

/// In-memory store for native builds and tests.
///
/// Clones share the same slot, so a test can keep a handle after moving one
/// into the game.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    raw: Rc<RefCell<Option<String>>>,
}

impl MemoryStore {
    /// Pre-seed the slot with a raw stored string
    pub fn with_raw(raw: &str) -> Self {
        Self {
            raw: Rc::new(RefCell::new(Some(raw.to_string()))),
        }
    }

    /// Raw stored string, exactly as it would sit in LocalStorage
    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> u64 {
        parse_high_score(self.raw.borrow().as_deref())
    }

    fn save(&mut self, score: u64) {
        *self.raw.borrow_mut() = Some(score.to_string());
    }
}

/// Browser LocalStorage backed store
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn load(&self) -> u64 {
        let raw = Self::storage().and_then(|s| s.get_item(STORAGE_KEY).ok().flatten());
        if raw.is_none() {
            log::info!("No high score found, starting fresh");
        }
        parse_high_score(raw.as_deref())
    }

    fn save(&mut self, score: u64) {
        match Self::storage() {
            Some(storage) => {
                let _ = storage.set_item(STORAGE_KEY, &score.to_string());
                log::info!("High score saved ({})", score);
            }
            None => log::warn!("LocalStorage unavailable - high score not saved"),
        }
    }
}
