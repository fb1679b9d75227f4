//! Threshold resolution and roll classification.
//!
//! A final roll is judged against four thresholds:
//!
//! ```text
//! roll <= critical_miss            -> CriticalMiss
//! roll <  hit                      -> Miss
//! roll >= critical_hit             -> Critical
//! roll >= combo                    -> Combo
//! otherwise                        -> Hit
//! ```
//!
//! Each threshold starts from the configured default and is replaced by the
//! action's override when one is set, or shifted by its adjustment otherwise.

use crate::error::ConfigError;

use super::model::{AdjustmentScope, DIE_MAX, DIE_MIN, RollModificationModel, ThresholdKind};

/// Thresholds used when an action does not override a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ThresholdDefaults {
    pub critical_miss: i32,
    pub hit: i32,
    pub combo: i32,
    pub critical_hit: i32,
}

impl ThresholdDefaults {
    pub const CRITICAL_MISS: i32 = 1;
    pub const HIT: i32 = 6;
    pub const COMBO: i32 = 14;
    pub const CRITICAL_HIT: i32 = 20;

    pub fn get(&self, kind: ThresholdKind) -> i32 {
        match kind {
            ThresholdKind::CriticalMiss => self.critical_miss,
            ThresholdKind::CriticalHit => self.critical_hit,
            ThresholdKind::Combo => self.combo,
            ThresholdKind::Hit => self.hit,
        }
    }

    /// Every default must be a die face and the channels must be ordered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("critical_miss_threshold", self.critical_miss),
            ("hit_threshold", self.hit),
            ("combo_threshold", self.combo),
            ("critical_hit_threshold", self.critical_hit),
        ] {
            if !(DIE_MIN..=DIE_MAX).contains(&value) {
                return Err(ConfigError::OutOfDieRange { field, value });
            }
        }

        let ordered = self.critical_miss < self.hit
            && self.hit <= self.combo
            && self.combo <= self.critical_hit;
        if !ordered {
            return Err(ConfigError::UnorderedThresholds {
                critical_miss: self.critical_miss,
                hit: self.hit,
                combo: self.combo,
                critical_hit: self.critical_hit,
            });
        }
        Ok(())
    }
}

impl Default for ThresholdDefaults {
    fn default() -> Self {
        Self {
            critical_miss: Self::CRITICAL_MISS,
            hit: Self::HIT,
            combo: Self::COMBO,
            critical_hit: Self::CRITICAL_HIT,
        }
    }
}

/// Concrete thresholds for one actor in one exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Thresholds {
    pub critical_miss: i32,
    pub hit: i32,
    pub combo: i32,
    pub critical_hit: i32,
}

impl Thresholds {
    /// Thresholds of the acting actor: override if set, else default plus
    /// adjustment. Results are clamped to the die.
    pub fn resolve(defaults: &ThresholdDefaults, model: &RollModificationModel) -> Self {
        Self::build(|kind| model.channel(kind).resolve(defaults.get(kind)))
    }

    /// Thresholds of the opposing actor when adjustments apply to both sides.
    ///
    /// Only adjustments carry over; overrides belong to the acting actor.
    pub fn mirrored(defaults: &ThresholdDefaults, model: &RollModificationModel) -> Self {
        Self::build(|kind| defaults.get(kind) + model.channel(kind).adjustment())
    }

    pub fn from_defaults(defaults: &ThresholdDefaults) -> Self {
        Self::build(|kind| defaults.get(kind))
    }

    pub fn get(&self, kind: ThresholdKind) -> i32 {
        match kind {
            ThresholdKind::CriticalMiss => self.critical_miss,
            ThresholdKind::CriticalHit => self.critical_hit,
            ThresholdKind::Combo => self.combo,
            ThresholdKind::Hit => self.hit,
        }
    }

    pub fn classify(&self, final_roll: i32) -> RollClass {
        if final_roll <= self.critical_miss {
            RollClass::CriticalMiss
        } else if final_roll < self.hit {
            RollClass::Miss
        } else if final_roll >= self.critical_hit {
            RollClass::Critical
        } else if final_roll >= self.combo {
            RollClass::Combo
        } else {
            RollClass::Hit
        }
    }

    fn build(value: impl Fn(ThresholdKind) -> i32) -> Self {
        let clamp = |kind| value(kind).clamp(DIE_MIN, DIE_MAX);
        Self {
            critical_miss: clamp(ThresholdKind::CriticalMiss),
            hit: clamp(ThresholdKind::Hit),
            combo: clamp(ThresholdKind::Combo),
            critical_hit: clamp(ThresholdKind::CriticalHit),
        }
    }
}

/// Thresholds for both sides of one exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExchangeThresholds {
    /// Thresholds the acting actor's roll is judged against.
    pub source: Thresholds,
    /// Thresholds the opposing actor uses for the rest of the exchange.
    pub target: Thresholds,
}

impl ExchangeThresholds {
    pub fn for_exchange(defaults: &ThresholdDefaults, model: &RollModificationModel) -> Self {
        let target = match model.adjustment_scope() {
            AdjustmentScope::SourceOnly => Thresholds::from_defaults(defaults),
            AdjustmentScope::Both => Thresholds::mirrored(defaults, model),
        };
        Self {
            source: Thresholds::resolve(defaults, model),
            target,
        }
    }
}

/// Classification of a final roll.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RollClass {
    CriticalMiss,
    Miss,
    Hit,
    Combo,
    Critical,
}

impl RollClass {
    pub const fn is_miss(self) -> bool {
        matches!(self, Self::CriticalMiss | Self::Miss)
    }

    pub const fn is_hit(self) -> bool {
        !self.is_miss()
    }

    /// Critical hits also start or continue a combo.
    pub const fn is_combo(self) -> bool {
        matches!(self, Self::Combo | Self::Critical)
    }

    pub const fn is_critical(self) -> bool {
        matches!(self, Self::Critical)
    }
}

/// Classify a final roll against concrete thresholds.
pub fn classify_roll(final_roll: i32, thresholds: &Thresholds) -> RollClass {
    thresholds.classify(final_roll)
}
