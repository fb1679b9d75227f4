use crate::error::ConfigError;
use crate::roll::ThresholdDefaults;

/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Thresholds used for a channel that has no override on the action.
    pub thresholds: ThresholdDefaults,

    /// Upper bound on chained exploding-dice rerolls for one roll.
    pub max_explosions: u32,

    /// Health percentage below which the health-threshold outcome fires.
    pub health_threshold_percent: u32,
}

impl CombatConfig {
    // ===== compile-time constants =====
    /// Every roll in the engine is a d20.
    pub const DIE_SIDES: u32 = 20;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_EXPLOSIONS: u32 = Self::DIE_SIDES;
    pub const DEFAULT_HEALTH_THRESHOLD_PERCENT: u32 = 25;

    pub fn new() -> Self {
        Self {
            thresholds: ThresholdDefaults::default(),
            max_explosions: Self::DEFAULT_MAX_EXPLOSIONS,
            health_threshold_percent: Self::DEFAULT_HEALTH_THRESHOLD_PERCENT,
        }
    }

    /// Checks every tunable against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;

        if self.max_explosions == 0 || self.max_explosions > Self::DIE_SIDES {
            return Err(ConfigError::ExplosionLimitOutOfRange {
                value: self.max_explosions,
                max: Self::DIE_SIDES,
            });
        }

        if self.health_threshold_percent > 100 {
            return Err(ConfigError::HealthPercentOutOfRange(
                self.health_threshold_percent,
            ));
        }

        Ok(())
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(CombatConfig::default().validate(), Ok(()));
    }

    #[test]
    fn explosion_limit_is_bounded_by_die() {
        let config = CombatConfig {
            max_explosions: 21,
            ..CombatConfig::new()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ExplosionLimitOutOfRange { value: 21, max: 20 })
        );
    }

    #[test]
    fn health_percent_above_hundred_is_rejected() {
        let config = CombatConfig {
            health_threshold_percent: 101,
            ..CombatConfig::new()
        };
        assert!(config.validate().is_err());
    }
}
