//! Validated description of how an action transforms its die roll.

use crate::error::ConfigError;

/// Lowest face of the d20 every roll uses.
pub(crate) const DIE_MIN: i32 = 1;
/// Highest face of the d20 every roll uses.
pub(crate) const DIE_MAX: i32 = 20;

/// How several dice rolled for one action combine into one value.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DiceAggregation {
    #[default]
    Sum,
    #[strum(to_string = "highest", serialize = "take_highest")]
    Highest,
    #[strum(to_string = "lowest", serialize = "take_lowest")]
    Lowest,
}

impl DiceAggregation {
    /// Parses a mode name, rejecting unknown modes as configuration errors.
    pub fn parse(mode: &str) -> Result<Self, ConfigError> {
        mode.trim()
            .parse()
            .map_err(|_| ConfigError::UnknownDiceMode(mode.to_string()))
    }
}

/// The four classification channels of a roll.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ThresholdKind {
    CriticalMiss,
    CriticalHit,
    Combo,
    Hit,
}

impl ThresholdKind {
    pub(crate) const fn override_field(self) -> &'static str {
        match self {
            Self::CriticalMiss => "critical_miss_threshold_override",
            Self::CriticalHit => "critical_hit_threshold_override",
            Self::Combo => "combo_threshold_override",
            Self::Hit => "hit_threshold_override",
        }
    }
}

/// One threshold channel: an absolute override or a relative adjustment.
///
/// `override_value == 0` means "use the default plus `adjustment`".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThresholdChannel {
    override_value: i32,
    adjustment: i32,
}

impl ThresholdChannel {
    /// Channel that uses the default threshold unchanged.
    pub const DEFAULT: Self = Self {
        override_value: 0,
        adjustment: 0,
    };

    /// Channel that shifts the default threshold by `adjustment`.
    ///
    /// Negative adjustments lower the threshold, making the outcome easier.
    pub const fn adjusted(adjustment: i32) -> Self {
        Self {
            override_value: 0,
            adjustment,
        }
    }

    pub fn override_value(&self) -> i32 {
        self.override_value
    }

    pub fn adjustment(&self) -> i32 {
        self.adjustment
    }

    pub fn is_overridden(&self) -> bool {
        self.override_value != 0
    }

    /// Concrete threshold given the configured default.
    pub fn resolve(&self, default: i32) -> i32 {
        if self.is_overridden() {
            self.override_value
        } else {
            default + self.adjustment
        }
    }

    fn validate(&self, kind: ThresholdKind) -> Result<(), ConfigError> {
        validate_override(kind, self.override_value)
    }
}

fn validate_override(kind: ThresholdKind, value: i32) -> Result<(), ConfigError> {
    if value != 0 && !(DIE_MIN..=DIE_MAX).contains(&value) {
        return Err(ConfigError::ThresholdOverrideOutOfRange {
            field: kind.override_field(),
            value,
        });
    }
    Ok(())
}

fn validate_die_value(field: &'static str, value: i32) -> Result<(), ConfigError> {
    if !(DIE_MIN..=DIE_MAX).contains(&value) {
        return Err(ConfigError::OutOfDieRange { field, value });
    }
    Ok(())
}

/// Whether threshold adjustments affect only the acting actor or both sides
/// of the exchange.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AdjustmentScope {
    #[default]
    SourceOnly,
    Both,
}

/// How an action transforms a raw die roll and where its thresholds sit.
///
/// Every setter validates immediately; an instance is always valid.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "RollModificationBuilder", into = "RollModificationBuilder")
)]
pub struct RollModificationModel {
    additive: i32,
    multiplier: f64,
    min: i32,
    max: i32,
    allow_reroll: bool,
    reroll_chance: f64,
    exploding_dice: bool,
    exploding_threshold: i32,
    dice_count: u32,
    aggregation: DiceAggregation,
    critical_miss: ThresholdChannel,
    critical_hit: ThresholdChannel,
    combo: ThresholdChannel,
    hit: ThresholdChannel,
    adjustment_scope: AdjustmentScope,
}

impl Default for RollModificationModel {
    fn default() -> Self {
        Self {
            additive: 0,
            multiplier: 1.0,
            min: DIE_MIN,
            max: DIE_MAX,
            allow_reroll: false,
            reroll_chance: 0.0,
            exploding_dice: false,
            exploding_threshold: DIE_MAX,
            dice_count: 1,
            aggregation: DiceAggregation::Sum,
            critical_miss: ThresholdChannel::DEFAULT,
            critical_hit: ThresholdChannel::DEFAULT,
            combo: ThresholdChannel::DEFAULT,
            hit: ThresholdChannel::DEFAULT,
            adjustment_scope: AdjustmentScope::SourceOnly,
        }
    }
}

impl RollModificationModel {
    /// Creates a builder for constructing a roll model.
    pub fn builder() -> RollModificationBuilder {
        RollModificationBuilder::default()
    }

    // ===== accessors =====

    pub fn additive(&self) -> i32 {
        self.additive
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn allow_reroll(&self) -> bool {
        self.allow_reroll
    }

    pub fn reroll_chance(&self) -> f64 {
        self.reroll_chance
    }

    pub fn exploding_dice(&self) -> bool {
        self.exploding_dice
    }

    pub fn exploding_threshold(&self) -> i32 {
        self.exploding_threshold
    }

    pub fn dice_count(&self) -> u32 {
        self.dice_count
    }

    pub fn aggregation(&self) -> DiceAggregation {
        self.aggregation
    }

    pub fn adjustment_scope(&self) -> AdjustmentScope {
        self.adjustment_scope
    }

    pub fn channel(&self, kind: ThresholdKind) -> ThresholdChannel {
        match kind {
            ThresholdKind::CriticalMiss => self.critical_miss,
            ThresholdKind::CriticalHit => self.critical_hit,
            ThresholdKind::Combo => self.combo,
            ThresholdKind::Hit => self.hit,
        }
    }

    // ===== validated mutation =====

    /// Additive offset has no range restriction.
    pub fn set_additive(&mut self, additive: i32) {
        self.additive = additive;
    }

    pub fn set_multiplier(&mut self, multiplier: f64) -> Result<(), ConfigError> {
        if multiplier.is_nan() || multiplier < 0.0 {
            return Err(ConfigError::InvalidMultiplier(multiplier));
        }
        self.multiplier = multiplier;
        Ok(())
    }

    pub fn set_min(&mut self, min: i32) -> Result<(), ConfigError> {
        validate_die_value("min", min)?;
        if min > self.max {
            return Err(ConfigError::MinExceedsMax { min, max: self.max });
        }
        self.min = min;
        Ok(())
    }

    pub fn set_max(&mut self, max: i32) -> Result<(), ConfigError> {
        validate_die_value("max", max)?;
        if max < self.min {
            return Err(ConfigError::MinExceedsMax { min: self.min, max });
        }
        self.max = max;
        Ok(())
    }

    /// Sets both bounds at once, so a range can move past the old one.
    pub fn set_bounds(&mut self, min: i32, max: i32) -> Result<(), ConfigError> {
        validate_die_value("min", min)?;
        validate_die_value("max", max)?;
        if min > max {
            return Err(ConfigError::MinExceedsMax { min, max });
        }
        self.min = min;
        self.max = max;
        Ok(())
    }

    /// Disabling reroll is rejected while a non-zero reroll chance is set.
    pub fn set_allow_reroll(&mut self, allow: bool) -> Result<(), ConfigError> {
        if !allow && self.reroll_chance > 0.0 {
            return Err(ConfigError::RerollChanceWithoutReroll(self.reroll_chance));
        }
        self.allow_reroll = allow;
        Ok(())
    }

    pub fn set_reroll_chance(&mut self, chance: f64) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&chance) {
            return Err(ConfigError::RerollChanceOutOfRange(chance));
        }
        if chance > 0.0 && !self.allow_reroll {
            return Err(ConfigError::RerollChanceWithoutReroll(chance));
        }
        self.reroll_chance = chance;
        Ok(())
    }

    pub fn set_exploding_dice(&mut self, enabled: bool) {
        self.exploding_dice = enabled;
    }

    pub fn set_exploding_threshold(&mut self, threshold: i32) -> Result<(), ConfigError> {
        validate_die_value("exploding_dice_threshold", threshold)?;
        self.exploding_threshold = threshold;
        Ok(())
    }

    pub fn set_dice(&mut self, count: u32, aggregation: DiceAggregation) -> Result<(), ConfigError> {
        if count < 1 {
            return Err(ConfigError::DiceCountTooLow(count));
        }
        self.dice_count = count;
        self.aggregation = aggregation;
        Ok(())
    }

    pub fn set_threshold_override(
        &mut self,
        kind: ThresholdKind,
        value: i32,
    ) -> Result<(), ConfigError> {
        validate_override(kind, value)?;
        self.channel_mut(kind).override_value = value;
        Ok(())
    }

    pub fn set_threshold_adjustment(&mut self, kind: ThresholdKind, adjustment: i32) {
        self.channel_mut(kind).adjustment = adjustment;
    }

    pub fn set_adjustment_scope(&mut self, scope: AdjustmentScope) {
        self.adjustment_scope = scope;
    }

    /// Re-checks every invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.multiplier.is_nan() || self.multiplier < 0.0 {
            return Err(ConfigError::InvalidMultiplier(self.multiplier));
        }
        validate_die_value("min", self.min)?;
        validate_die_value("max", self.max)?;
        if self.min > self.max {
            return Err(ConfigError::MinExceedsMax {
                min: self.min,
                max: self.max,
            });
        }
        if !(0.0..=1.0).contains(&self.reroll_chance) {
            return Err(ConfigError::RerollChanceOutOfRange(self.reroll_chance));
        }
        if self.reroll_chance > 0.0 && !self.allow_reroll {
            return Err(ConfigError::RerollChanceWithoutReroll(self.reroll_chance));
        }
        validate_die_value("exploding_dice_threshold", self.exploding_threshold)?;
        if self.dice_count < 1 {
            return Err(ConfigError::DiceCountTooLow(self.dice_count));
        }
        self.critical_miss.validate(ThresholdKind::CriticalMiss)?;
        self.critical_hit.validate(ThresholdKind::CriticalHit)?;
        self.combo.validate(ThresholdKind::Combo)?;
        self.hit.validate(ThresholdKind::Hit)?;
        Ok(())
    }

    fn channel_mut(&mut self, kind: ThresholdKind) -> &mut ThresholdChannel {
        match kind {
            ThresholdKind::CriticalMiss => &mut self.critical_miss,
            ThresholdKind::CriticalHit => &mut self.critical_hit,
            ThresholdKind::Combo => &mut self.combo,
            ThresholdKind::Hit => &mut self.hit,
        }
    }
}

/// Flat, unvalidated description of a roll model.
///
/// This is the shape action data is authored in; [`build`](Self::build)
/// performs every range check and fails on the first violation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct RollModificationBuilder {
    pub additive: i32,
    pub multiplier: f64,
    pub min: i32,
    pub max: i32,
    pub allow_reroll: bool,
    pub reroll_chance: f64,
    pub exploding_dice: bool,
    pub exploding_dice_threshold: i32,
    pub multiple_dice_count: u32,
    pub multiple_dice_mode: String,
    pub critical_miss_threshold_override: i32,
    pub critical_hit_threshold_override: i32,
    pub combo_threshold_override: i32,
    pub hit_threshold_override: i32,
    pub critical_miss_threshold_adjustment: i32,
    pub critical_hit_threshold_adjustment: i32,
    pub combo_threshold_adjustment: i32,
    pub hit_threshold_adjustment: i32,
    pub apply_threshold_adjustments_to_both: bool,
}

impl Default for RollModificationBuilder {
    fn default() -> Self {
        Self {
            additive: 0,
            multiplier: 1.0,
            min: DIE_MIN,
            max: DIE_MAX,
            allow_reroll: false,
            reroll_chance: 0.0,
            exploding_dice: false,
            exploding_dice_threshold: DIE_MAX,
            multiple_dice_count: 1,
            multiple_dice_mode: DiceAggregation::Sum.to_string(),
            critical_miss_threshold_override: 0,
            critical_hit_threshold_override: 0,
            combo_threshold_override: 0,
            hit_threshold_override: 0,
            critical_miss_threshold_adjustment: 0,
            critical_hit_threshold_adjustment: 0,
            combo_threshold_adjustment: 0,
            hit_threshold_adjustment: 0,
            apply_threshold_adjustments_to_both: false,
        }
    }
}

impl RollModificationBuilder {
    pub fn additive(mut self, additive: i32) -> Self {
        self.additive = additive;
        self
    }

    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn bounds(mut self, min: i32, max: i32) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Enables reroll with the given chance.
    pub fn reroll(mut self, chance: f64) -> Self {
        self.allow_reroll = true;
        self.reroll_chance = chance;
        self
    }

    /// Sets a reroll chance without touching the enable flag.
    pub fn reroll_chance(mut self, chance: f64) -> Self {
        self.reroll_chance = chance;
        self
    }

    /// Enables exploding dice at the given threshold.
    pub fn exploding(mut self, threshold: i32) -> Self {
        self.exploding_dice = true;
        self.exploding_dice_threshold = threshold;
        self
    }

    pub fn dice(mut self, count: u32, mode: DiceAggregation) -> Self {
        self.multiple_dice_count = count;
        self.multiple_dice_mode = mode.to_string();
        self
    }

    pub fn threshold_override(mut self, kind: ThresholdKind, value: i32) -> Self {
        *self.override_mut(kind) = value;
        self
    }

    pub fn threshold_adjustment(mut self, kind: ThresholdKind, adjustment: i32) -> Self {
        *self.adjustment_mut(kind) = adjustment;
        self
    }

    pub fn adjust_both(mut self) -> Self {
        self.apply_threshold_adjustments_to_both = true;
        self
    }

    /// Validates every field and produces the model.
    pub fn build(self) -> Result<RollModificationModel, ConfigError> {
        let aggregation = DiceAggregation::parse(&self.multiple_dice_mode)?;
        let model = RollModificationModel {
            additive: self.additive,
            multiplier: self.multiplier,
            min: self.min,
            max: self.max,
            allow_reroll: self.allow_reroll,
            reroll_chance: self.reroll_chance,
            exploding_dice: self.exploding_dice,
            exploding_threshold: self.exploding_dice_threshold,
            dice_count: self.multiple_dice_count,
            aggregation,
            critical_miss: ThresholdChannel {
                override_value: self.critical_miss_threshold_override,
                adjustment: self.critical_miss_threshold_adjustment,
            },
            critical_hit: ThresholdChannel {
                override_value: self.critical_hit_threshold_override,
                adjustment: self.critical_hit_threshold_adjustment,
            },
            combo: ThresholdChannel {
                override_value: self.combo_threshold_override,
                adjustment: self.combo_threshold_adjustment,
            },
            hit: ThresholdChannel {
                override_value: self.hit_threshold_override,
                adjustment: self.hit_threshold_adjustment,
            },
            adjustment_scope: if self.apply_threshold_adjustments_to_both {
                AdjustmentScope::Both
            } else {
                AdjustmentScope::SourceOnly
            },
        };
        model.validate()?;
        Ok(model)
    }

    fn override_mut(&mut self, kind: ThresholdKind) -> &mut i32 {
        match kind {
            ThresholdKind::CriticalMiss => &mut self.critical_miss_threshold_override,
            ThresholdKind::CriticalHit => &mut self.critical_hit_threshold_override,
            ThresholdKind::Combo => &mut self.combo_threshold_override,
            ThresholdKind::Hit => &mut self.hit_threshold_override,
        }
    }

    fn adjustment_mut(&mut self, kind: ThresholdKind) -> &mut i32 {
        match kind {
            ThresholdKind::CriticalMiss => &mut self.critical_miss_threshold_adjustment,
            ThresholdKind::CriticalHit => &mut self.critical_hit_threshold_adjustment,
            ThresholdKind::Combo => &mut self.combo_threshold_adjustment,
            ThresholdKind::Hit => &mut self.hit_threshold_adjustment,
        }
    }
}

impl TryFrom<RollModificationBuilder> for RollModificationModel {
    type Error = ConfigError;

    fn try_from(builder: RollModificationBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl From<RollModificationModel> for RollModificationBuilder {
    fn from(model: RollModificationModel) -> Self {
        Self {
            additive: model.additive,
            multiplier: model.multiplier,
            min: model.min,
            max: model.max,
            allow_reroll: model.allow_reroll,
            reroll_chance: model.reroll_chance,
            exploding_dice: model.exploding_dice,
            exploding_dice_threshold: model.exploding_threshold,
            multiple_dice_count: model.dice_count,
            multiple_dice_mode: model.aggregation.to_string(),
            critical_miss_threshold_override: model.critical_miss.override_value,
            critical_hit_threshold_override: model.critical_hit.override_value,
            combo_threshold_override: model.combo.override_value,
            hit_threshold_override: model.hit.override_value,
            critical_miss_threshold_adjustment: model.critical_miss.adjustment,
            critical_hit_threshold_adjustment: model.critical_hit.adjustment,
            combo_threshold_adjustment: model.combo.adjustment,
            hit_threshold_adjustment: model.hit.adjustment,
            apply_threshold_adjustments_to_both: model.adjustment_scope == AdjustmentScope::Both,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_rejects_min_above_max() {
        let err = RollModificationModel::builder().bounds(15, 10).build();
        assert_eq!(err, Err(ConfigError::MinExceedsMax { min: 15, max: 10 }));
    }

    #[test]
    fn bounds_outside_the_die_are_rejected() {
        assert!(matches!(
            RollModificationModel::builder().bounds(0, 20).build(),
            Err(ConfigError::OutOfDieRange { field: "min", value: 0 })
        ));
        assert!(matches!(
            RollModificationModel::builder().bounds(1, 21).build(),
            Err(ConfigError::OutOfDieRange { field: "max", value: 21 })
        ));
    }

    #[test]
    fn reroll_chance_requires_reroll_enabled() {
        let err = RollModificationModel::builder().reroll_chance(0.3).build();
        assert_eq!(err, Err(ConfigError::RerollChanceWithoutReroll(0.3)));

        let mut model = RollModificationModel::default();
        assert!(model.set_reroll_chance(0.3).is_err());
        model.set_allow_reroll(true).unwrap();
        model.set_reroll_chance(0.3).unwrap();
        assert_eq!(
            model.set_allow_reroll(false),
            Err(ConfigError::RerollChanceWithoutReroll(0.3))
        );
        assert!(model.allow_reroll());
    }

    #[test]
    fn reroll_chance_must_be_a_probability() {
        let mut model = RollModificationModel::builder().reroll(0.0).build().unwrap();
        assert_eq!(
            model.set_reroll_chance(1.5),
            Err(ConfigError::RerollChanceOutOfRange(1.5))
        );
        assert!(model.set_reroll_chance(-0.1).is_err());
        assert_eq!(model.reroll_chance(), 0.0);
    }

    #[test]
    fn failed_mutation_leaves_model_unchanged() {
        let mut model = RollModificationModel::default();
        model.set_max(12).unwrap();
        assert!(model.set_min(13).is_err());
        assert_eq!(model.min(), 1);
        assert!(model.set_multiplier(-1.0).is_err());
        assert_eq!(model.multiplier(), 1.0);
        model.set_bounds(14, 18).unwrap();
        assert_eq!((model.min(), model.max()), (14, 18));
    }

    #[test]
    fn nan_multiplier_is_rejected_as_invalid() {
        let mut model = RollModificationModel::default();
        let err = model.set_multiplier(f64::NAN).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMultiplier(m) if m.is_nan()));
        assert_eq!(
            err.to_string(),
            "multiplier must be a non-negative number, got NaN"
        );
        assert_eq!(model.multiplier(), 1.0);

        let built = RollModificationModel::builder().multiplier(f64::NAN).build();
        assert!(matches!(built, Err(ConfigError::InvalidMultiplier(_))));
        assert!(
            RollModificationModel::builder()
                .multiplier(0.0)
                .build()
                .is_ok()
        );
    }

    #[test]
    fn threshold_override_accepts_zero_or_die_face() {
        let mut model = RollModificationModel::default();
        model
            .set_threshold_override(ThresholdKind::CriticalHit, 18)
            .unwrap();
        model.set_threshold_override(ThresholdKind::Hit, 0).unwrap();
        assert_eq!(
            model.set_threshold_override(ThresholdKind::Combo, 21),
            Err(ConfigError::ThresholdOverrideOutOfRange {
                field: "combo_threshold_override",
                value: 21
            })
        );
        assert_eq!(model.channel(ThresholdKind::CriticalHit).override_value(), 18);
    }

    #[test]
    fn dice_mode_parses_case_insensitively() {
        assert_eq!(DiceAggregation::parse("Sum"), Ok(DiceAggregation::Sum));
        assert_eq!(DiceAggregation::parse("HIGHEST"), Ok(DiceAggregation::Highest));
        assert_eq!(DiceAggregation::parse("take_lowest"), Ok(DiceAggregation::Lowest));
        assert_eq!(
            DiceAggregation::parse("median"),
            Err(ConfigError::UnknownDiceMode("median".to_string()))
        );
    }

    #[test]
    fn zero_dice_is_rejected() {
        let err = RollModificationModel::builder()
            .dice(0, DiceAggregation::Sum)
            .build();
        assert_eq!(err, Err(ConfigError::DiceCountTooLow(0)));
    }

    #[test]
    fn exploding_threshold_must_be_a_die_face() {
        assert!(RollModificationModel::builder().exploding(0).build().is_err());
        assert!(RollModificationModel::builder().exploding(18).build().is_ok());
    }
}
