//! Tunable battle constants.

use crate::errors::{BattleEngineError, BattleResult};
use serde::{Deserialize, Serialize};

/// Every numeric knob the engine consults. Missing fields in RON text fall
/// back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub stab_multiplier: f64,
    /// Lower bound of the uniform damage roll; the upper bound is 1.0.
    pub random_floor: f64,
    pub paralysis_chance: u8,
    pub freeze_thaw_chance: u8,
    pub confusion_self_hit_chance: u8,
    pub infatuation_chance: u8,
    pub sleep_turns: (u8, u8),
    pub confusion_turns: (u8, u8),
    pub trap_turns: (u8, u8),
    pub weather_turns: u8,
    /// Width of the uniform jitter added to every AI score.
    pub ai_jitter: f64,
    pub struggle_recoil_divisor: u16,
    /// Turn cap after which the battle ends as a draw.
    pub max_turns: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            crit_chance: 1.0 / 16.0,
            crit_multiplier: 1.5,
            stab_multiplier: 1.5,
            random_floor: 0.85,
            paralysis_chance: 25,
            freeze_thaw_chance: 20,
            confusion_self_hit_chance: 33,
            infatuation_chance: 50,
            sleep_turns: (2, 4),
            confusion_turns: (2, 5),
            trap_turns: (4, 5),
            weather_turns: 5,
            ai_jitter: 3.0,
            struggle_recoil_divisor: 4,
            max_turns: 1000,
        }
    }
}

impl BattleConfig {
    pub fn from_ron_str(text: &str) -> BattleResult<Self> {
        let config: BattleConfig =
            ron::from_str(text).map_err(|err| BattleEngineError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> BattleResult<()> {
        let ranges = [
            ("sleep_turns", self.sleep_turns),
            ("confusion_turns", self.confusion_turns),
            ("trap_turns", self.trap_turns),
        ];
        for (name, (low, high)) in ranges {
            if low == 0 || low > high {
                return Err(BattleEngineError::Config(format!(
                    "{} must be a non-empty range starting at 1 or above, got ({}, {})",
                    name, low, high
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.random_floor) {
            return Err(BattleEngineError::Config(format!(
                "random_floor must lie in [0, 1], got {}",
                self.random_floor
            )));
        }
        if self.struggle_recoil_divisor == 0 {
            return Err(BattleEngineError::Config(
                "struggle_recoil_divisor must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = BattleConfig::from_ron_str("(crit_chance: 0.5, max_turns: 20)").unwrap();
        assert_eq!(config.crit_chance, 0.5);
        assert_eq!(config.max_turns, 20);
        assert_eq!(config.sleep_turns, (2, 4));
        assert_eq!(config.paralysis_chance, 25);
    }

    #[test]
    fn test_invalid_range_is_rejected() {
        let result = BattleConfig::from_ron_str("(sleep_turns: (4, 2))");
        assert!(matches!(result, Err(BattleEngineError::Config(_))));
    }

    #[test]
    fn test_malformed_text_is_rejected() {
        assert!(BattleConfig::from_ron_str("(crit_chance: )").is_err());
    }
}
