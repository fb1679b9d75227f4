//! Raw roll to final roll.
//!
//! Steps run in a fixed order: reroll, explode, aggregate extra dice,
//! multiply then add, clamp to the model's bounds. Nothing here fails;
//! every intermediate value is carried as `i32` with saturating arithmetic
//! and the final clamp brings it back inside `[min, max]`.

use crate::config::CombatConfig;
use crate::dice::DiceRoller;

use super::model::{DIE_MAX, DIE_MIN, DiceAggregation, RollModificationModel};

const SIDES: u32 = CombatConfig::DIE_SIDES;

/// Every intermediate value of one roll resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollBreakdown {
    /// Raw roll clamped to the die.
    pub natural: i32,
    /// Roll after the optional reroll.
    pub after_reroll: i32,
    pub rerolled: bool,
    /// Sum of the extra dice added by explosions.
    pub explosion_bonus: i32,
    pub explosions: u32,
    /// Value after combining every die.
    pub aggregated: i32,
    /// Value after multiplier, additive and clamp.
    pub final_roll: i32,
}

/// Resolve a raw roll using the default explosion limit.
pub fn resolve_roll(
    model: &RollModificationModel,
    raw_roll: i32,
    dice: &mut dyn DiceRoller,
) -> i32 {
    resolve_roll_detailed(model, raw_roll, dice, CombatConfig::DEFAULT_MAX_EXPLOSIONS).final_roll
}

/// Resolve a raw roll and keep every intermediate value.
///
/// `max_explosions` bounds chained explosions so a die that keeps rolling
/// at or above the threshold always terminates.
pub fn resolve_roll_detailed(
    model: &RollModificationModel,
    raw_roll: i32,
    dice: &mut dyn DiceRoller,
    max_explosions: u32,
) -> RollBreakdown {
    let natural = raw_roll.clamp(DIE_MIN, DIE_MAX);

    let mut after_reroll = natural;
    let mut rerolled = false;
    if model.allow_reroll() && model.reroll_chance() > 0.0 && dice.uniform() < model.reroll_chance()
    {
        after_reroll = roll_face(dice);
        rerolled = true;
    }

    let mut explosion_bonus = 0i32;
    let mut explosions = 0u32;
    if model.exploding_dice() {
        let mut last = after_reroll;
        while last >= model.exploding_threshold() && explosions < max_explosions {
            last = roll_face(dice);
            explosion_bonus = explosion_bonus.saturating_add(last);
            explosions += 1;
        }
    }

    let first = after_reroll.saturating_add(explosion_bonus);
    let aggregated = if model.dice_count() > 1 {
        let extra = (1..model.dice_count()).map(|_| roll_face(dice));
        aggregate(model.aggregation(), first, extra)
    } else {
        first
    };

    let scaled = apply_multiplier(aggregated, model.multiplier());
    let final_roll = scaled
        .saturating_add(model.additive())
        .clamp(model.min(), model.max());

    RollBreakdown {
        natural,
        after_reroll,
        rerolled,
        explosion_bonus,
        explosions,
        aggregated,
        final_roll,
    }
}

fn roll_face(dice: &mut dyn DiceRoller) -> i32 {
    // Faces never exceed the die size.
    i32::try_from(dice.roll_die(SIDES).clamp(1, SIDES)).unwrap_or(DIE_MAX)
}

fn aggregate(mode: DiceAggregation, first: i32, rest: impl Iterator<Item = i32>) -> i32 {
    match mode {
        DiceAggregation::Sum => rest.fold(first, i32::saturating_add),
        DiceAggregation::Highest => rest.fold(first, i32::max),
        DiceAggregation::Lowest => rest.fold(first, i32::min),
    }
}

/// Rounds half away from zero; out-of-range products saturate.
fn apply_multiplier(value: i32, multiplier: f64) -> i32 {
    let scaled = (f64::from(value) * multiplier).round();
    if scaled >= f64::from(i32::MAX) {
        i32::MAX
    } else if scaled <= f64::from(i32::MIN) {
        i32::MIN
    } else {
        scaled as i32
    }
}
