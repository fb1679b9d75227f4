//! Roll modification model, roll resolution and classification.
//!
//! - [`RollModificationModel`]: validated per-action roll parameters
//! - [`resolve_roll`] / [`resolve_roll_detailed`]: raw roll to final roll
//! - [`Thresholds`] / [`classify_roll`]: final roll to [`RollClass`]

mod model;
mod resolve;
mod threshold;

pub use model::{
    AdjustmentScope, DiceAggregation, RollModificationBuilder, RollModificationModel,
    ThresholdChannel, ThresholdKind,
};
pub use resolve::{RollBreakdown, resolve_roll, resolve_roll_detailed};
pub use threshold::{ExchangeThresholds, RollClass, ThresholdDefaults, Thresholds, classify_roll};
