//! Difficulty table
//!
//! Five fixed levels, each tightening the spawn rate and raising the odds of
//! traps and gold. The table is the only gameplay tunable; it can be replaced
//! wholesale from JSON but is never mutated during a run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_LEVEL;

/// Settings for a single level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Display name shown in the HUD
    pub name: String,
    /// Minimum time between spawns
    pub spawn_interval_ms: u64,
    /// Chance (0-1) a spawn is a trap
    pub trap_probability: f64,
    /// Chance (0-1) a spawn is gold
    pub gold_probability: f64,
    /// Score that advances to the next level (`None` on the last level)
    #[serde(default)]
    pub score_threshold: Option<u64>,
}

impl LevelConfig {
    fn new(
        name: &str,
        spawn_interval_ms: u64,
        trap_probability: f64,
        gold_probability: f64,
        score_threshold: Option<u64>,
    ) -> Self {
        Self {
            name: name.to_string(),
            spawn_interval_ms,
            trap_probability,
            gold_probability,
            score_threshold,
        }
    }
}

/// Reasons a level table is rejected
#[derive(Debug, Error)]
pub enum LevelTableError {
    #[error("invalid level table JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected {expected} levels, found {found}")]
    WrongLength { expected: usize, found: usize },
    #[error("level {level}: spawn interval must be positive")]
    ZeroSpawnInterval { level: u8 },
    #[error("level {level}: {field} probability {value} is outside [0, 1]")]
    Probability {
        level: u8,
        field: &'static str,
        value: f64,
    },
    #[error("level {level}: trap and gold probabilities sum to {sum}, more than 1")]
    ProbabilitySum { level: u8, sum: f64 },
    #[error("level {level}: score threshold must be set and higher than the previous level's")]
    Threshold { level: u8 },
}

/// Immutable level lookup, indexed 1..=MAX_LEVEL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelTable {
    levels: Vec<LevelConfig>,
}

impl Default for LevelTable {
    fn default() -> Self {
        Self {
            levels: vec![
                LevelConfig::new("ROOKIE", 1200, 0.0, 0.1, Some(1000)),
                LevelConfig::new("SOLDIER", 1000, 0.1, 0.15, Some(2500)),
                LevelConfig::new("ELITE", 800, 0.2, 0.2, Some(5000)),
                LevelConfig::new("CYBER", 600, 0.25, 0.25, Some(8000)),
                LevelConfig::new("GOD MODE", 450, 0.4, 0.3, None),
            ],
        }
    }
}

impl LevelTable {
    /// Build a table from explicit entries, validating them
    pub fn new(levels: Vec<LevelConfig>) -> Result<Self, LevelTableError> {
        let table = Self { levels };
        table.validate()?;
        Ok(table)
    }

    /// Parse and validate a JSON array of level entries
    pub fn from_json(json: &str) -> Result<Self, LevelTableError> {
        let table: LevelTable = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Serialize back to JSON (pretty-printed)
    pub fn to_json(&self) -> String {
        // A Vec of plain structs cannot fail to serialize
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Look up a level. Out-of-range levels clamp to the nearest valid one.
    pub fn get(&self, level: u8) -> &LevelConfig {
        let idx = level.clamp(1, MAX_LEVEL) as usize - 1;
        &self.levels[idx]
    }

    /// Score needed to leave `level`, if it can be left at all
    pub fn threshold(&self, level: u8) -> Option<u64> {
        if level >= MAX_LEVEL {
            return None;
        }
        self.get(level).score_threshold
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelConfig> {
        self.levels.iter()
    }

    fn validate(&self) -> Result<(), LevelTableError> {
        if self.levels.len() != MAX_LEVEL as usize {
            return Err(LevelTableError::WrongLength {
                expected: MAX_LEVEL as usize,
                found: self.levels.len(),
            });
        }

        let mut previous_threshold = 0;
        for (idx, cfg) in self.levels.iter().enumerate() {
            let level = idx as u8 + 1;

            if cfg.spawn_interval_ms == 0 {
                return Err(LevelTableError::ZeroSpawnInterval { level });
            }
            for (field, value) in [
                ("trap", cfg.trap_probability),
                ("gold", cfg.gold_probability),
            ] {
                if !(0.0..=1.0).contains(&value) {
                    return Err(LevelTableError::Probability {
                        level,
                        field,
                        value,
                    });
                }
            }
            let sum = cfg.trap_probability + cfg.gold_probability;
            if sum > 1.0 {
                return Err(LevelTableError::ProbabilitySum { level, sum });
            }

            // The last level has nowhere to go, so its threshold is ignored
            if level < MAX_LEVEL {
                match cfg.score_threshold {
                    Some(t) if t > previous_threshold => previous_threshold = t,
                    _ => return Err(LevelTableError::Threshold { level }),
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        let table = LevelTable::default();
        assert!(table.validate().is_ok());
        assert_eq!(table.get(1).name, "ROOKIE");
        assert_eq!(table.get(5).name, "GOD MODE");
        assert_eq!(table.threshold(1), Some(1000));
        assert_eq!(table.threshold(5), None);
    }

    #[test]
    fn test_get_clamps_out_of_range() {
        let table = LevelTable::default();
        assert_eq!(table.get(0).name, "ROOKIE");
        assert_eq!(table.get(9).name, "GOD MODE");
    }

    #[test]
    fn test_json_roundtrip_preserves_table() {
        let table = LevelTable::default();
        let parsed = LevelTable::from_json(&table.to_json()).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn test_rejects_wrong_length() {
        let json = r#"[{"name":"ONLY","spawn_interval_ms":500,"trap_probability":0.0,"gold_probability":0.0,"score_threshold":10}]"#;
        assert!(matches!(
            LevelTable::from_json(json),
            Err(LevelTableError::WrongLength { expected: 5, found: 1 })
        ));
    }

    #[test]
    fn test_rejects_bad_probabilities() {
        let mut levels: Vec<LevelConfig> = LevelTable::default().iter().cloned().collect();
        levels[2].trap_probability = 1.5;
        assert!(matches!(
            LevelTable::new(levels.clone()),
            Err(LevelTableError::Probability { level: 3, field: "trap", .. })
        ));

        levels[2].trap_probability = 0.8;
        levels[2].gold_probability = 0.5;
        assert!(matches!(
            LevelTable::new(levels),
            Err(LevelTableError::ProbabilitySum { level: 3, .. })
        ));
    }

    #[test]
    fn test_rejects_non_increasing_thresholds() {
        let mut levels: Vec<LevelConfig> = LevelTable::default().iter().cloned().collect();
        levels[1].score_threshold = Some(900);
        assert!(matches!(
            LevelTable::new(levels),
            Err(LevelTableError::Threshold { level: 2 })
        ));
    }

    #[test]
    fn test_rejects_zero_interval_and_garbage() {
        let mut levels: Vec<LevelConfig> = LevelTable::default().iter().cloned().collect();
        levels[4].spawn_interval_ms = 0;
        assert!(matches!(
            LevelTable::new(levels),
            Err(LevelTableError::ZeroSpawnInterval { level: 5 })
        ));
        assert!(matches!(
            LevelTable::from_json("not json"),
            Err(LevelTableError::Json(_))
        ));
    }
}
