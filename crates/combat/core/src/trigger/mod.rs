//! Trigger conditions and their evaluator.
//!
//! A [`TriggerCondition`] is data; the [`TriggerEvaluator`] interprets it
//! against a [`CombatEvent`](crate::CombatEvent) and the actors involved.

mod condition;
mod evaluator;

pub use condition::{TriggerCondition, TriggerKind};
pub use evaluator::TriggerEvaluator;
