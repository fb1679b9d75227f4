//! Per-kind publish/subscribe channel for combat events.
//!
//! Subscribers register for one [`CombatEventKind`](combat_core::CombatEventKind)
//! and are called synchronously, in registration order, whenever an event
//! of that kind is published.

mod channel;

pub use channel::{CombatEventChannel, EventHandler, PublishReport, SubscriptionId};
