//! Player preferences
//!
//! Cosmetic only: nothing here touches the simulation. Kept in memory for the
//! session; the only thing the game persists is the high score.

use serde::{Deserialize, Serialize};

/// Crosshair theme colours offered in the settings overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CrosshairColor {
    #[default]
    Cyan,
    Violet,
    Emerald,
    Amber,
    Pink,
}

impl CrosshairColor {
    pub const ALL: [CrosshairColor; 5] = [
        CrosshairColor::Cyan,
        CrosshairColor::Violet,
        CrosshairColor::Emerald,
        CrosshairColor::Amber,
        CrosshairColor::Pink,
    ];

    /// CSS hex colour
    pub fn hex(&self) -> &'static str {
        match self {
            CrosshairColor::Cyan => "#06b6d4",
            CrosshairColor::Violet => "#8b5cf6",
            CrosshairColor::Emerald => "#10b981",
            CrosshairColor::Amber => "#f59e0b",
            CrosshairColor::Pink => "#ec4899",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CrosshairColor::Cyan => "cyan",
            CrosshairColor::Violet => "violet",
            CrosshairColor::Emerald => "emerald",
            CrosshairColor::Amber => "amber",
            CrosshairColor::Pink => "pink",
        }
    }

    /// Accepts a name ("violet") or a hex value ("#8b5cf6")
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s || c.hex() == s)
    }
}

/// Volume slider granularity
pub const VOLUME_STEP: f32 = 0.1;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Master volume (0.0 - 1.0, in `VOLUME_STEP` increments)
    pub master_volume: f32,
    pub crosshair: CrosshairColor,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.5,
            crosshair: CrosshairColor::Cyan,
        }
    }
}

impl Settings {
    /// Set volume, clamped to 0-1 and snapped to the slider step
    pub fn set_volume(&mut self, volume: f32) {
        let snapped = (volume.clamp(0.0, 1.0) / VOLUME_STEP).round() * VOLUME_STEP;
        self.master_volume = snapped.clamp(0.0, 1.0);
    }

    /// Audio is skipped entirely at zero volume
    pub fn is_muted(&self) -> bool {
        self.master_volume <= 0.0
    }
}
