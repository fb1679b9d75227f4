//! Session orchestration for the combat rules.
//!
//! This crate wires the pure rules of `combat-core` into a resolution
//! pipeline. Consumers own a [`CombatSession`], subscribe to its
//! [`CombatEventChannel`], and register extra [`OutcomeHandler`]s.
//!
//! Modules are organized by responsibility:
//! - [`session`] runs one action attempt end to end
//! - [`events`] provides the per-kind publish/subscribe channel
//! - [`outcomes`] provides the name-keyed outcome handler registry
//! - [`config`] loads [`CombatConfig`](combat_core::CombatConfig) from TOML
//!   and the environment
//! - [`dice`] provides an OS-seeded dice source
pub mod config;
pub mod dice;
pub mod error;
pub mod events;
pub mod outcomes;
pub mod session;

pub use config::{ConfigLoader, LoadResult};
pub use dice::RandDice;
pub use error::{HandlerError, Result, RuntimeError};
pub use events::{CombatEventChannel, PublishReport, SubscriptionId};
pub use outcomes::{
    ComboEndHandler, HandlerCriticality, HealthThresholdHandler, OnKillHandler, OutcomeContext,
    OutcomeHandler, OutcomeHandlerRegistry, OutcomeReport, StatusEffectHandler,
};
pub use session::{ActionAttempt, CombatSession, Resolution};
