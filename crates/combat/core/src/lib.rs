//! Deterministic action-resolution rules for turn-based dungeon combat.
//!
//! `combat-core` decides, for a single action use, how the raw die roll is
//! transformed, whether the result misses, hits, combos or crits, which
//! attached trigger conditions hold, and which combo slot executes next.
//! Everything here is pure data and pure functions apart from the trigger
//! evaluator's per-actor action history; event delivery and outcome
//! handlers live in the runtime crate.
pub mod action;
pub mod actor;
pub mod combo;
pub mod config;
pub mod dice;
pub mod error;
pub mod event;
pub mod roll;
pub mod trigger;

pub use action::{Action, ActionBuilder, ActionCategory};
#[cfg(feature = "serde")]
pub use action::ActionDefinition;
pub use actor::{
    Actor, ActorCapabilities, ActorId, Character, Enemy, Equipment, GearItem, GearSlot,
    HasActionPool, HasGearSlots, HasHealth, Health,
};
pub use combo::{
    ComboAdvance, ComboDirective, ComboRouter, ComboRouting, ComboRoutingFlags, ComboSequence,
    RoutingResult,
};
pub use config::CombatConfig;
pub use dice::{DiceRoller, PcgDice, ScriptedDice};
pub use error::{CombatError, ConfigError, ErrorSeverity};
pub use event::{CombatEvent, CombatEventBuilder, CombatEventKind, ComboStep, EventMetadata};
pub use roll::{
    AdjustmentScope, DiceAggregation, ExchangeThresholds, RollBreakdown, RollClass,
    RollModificationBuilder, RollModificationModel, ThresholdChannel, ThresholdDefaults,
    ThresholdKind, Thresholds, classify_roll, resolve_roll, resolve_roll_detailed,
};
pub use trigger::{TriggerCondition, TriggerEvaluator, TriggerKind};
