//! Named outcome handlers run after an action resolves.
//!
//! Actions list handler identifiers; the [`OutcomeHandlerRegistry`] maps
//! each identifier to an [`OutcomeHandler`] and runs it with an
//! [`OutcomeContext`]. New handler kinds are added by registering them,
//! never by changing the dispatch loop.
//!
//! # Built-in handlers
//!
//! - `onkill`: publishes `ActorDied` when the hit left the target at 0 HP
//! - `healththreshold`: publishes `HealthThresholdCrossed` when the hit
//!   took the target below the configured percentage
//! - `comboend`: publishes `ComboEnded` when routing finished the combo
//! - `bleed`, `weaken`, `slow`, `poison`, `stun`, `burn`: publish
//!   `StatusApplied` with the status name when a hit lands on a living target

mod combo_end;
mod health_threshold;
mod on_kill;
mod registry;
mod status;

pub use combo_end::ComboEndHandler;
pub use health_threshold::HealthThresholdHandler;
pub use on_kill::OnKillHandler;
pub use registry::{OutcomeHandlerRegistry, OutcomeReport};
pub use status::StatusEffectHandler;

use combat_core::{Action, Actor, CombatEvent, RoutingResult};

use crate::error::HandlerError;
use crate::events::CombatEventChannel;

/// How a handler failure is logged.
///
/// Failures never abort resolution; criticality only picks the log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandlerCriticality {
    /// Logged at `error!`. Default.
    #[default]
    Important,

    /// Logged at `debug!`. For cosmetic or best-effort effects.
    Optional,
}

impl HandlerCriticality {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Important => "important",
            Self::Optional => "optional",
        }
    }
}

/// Everything a handler can see about the resolved action.
#[derive(Clone, Copy)]
pub struct OutcomeContext<'a> {
    pub event: &'a CombatEvent,
    pub source: &'a Actor,
    /// Target after damage was applied.
    pub target: Option<&'a Actor>,
    pub action: Option<&'a Action>,
    /// Routing result when the action ran inside a combo.
    pub routing: Option<&'a RoutingResult>,
    /// Channel for follow-up events.
    pub channel: &'a CombatEventChannel,
}

impl<'a> OutcomeContext<'a> {
    pub fn new(event: &'a CombatEvent, source: &'a Actor, channel: &'a CombatEventChannel) -> Self {
        Self {
            event,
            source,
            target: None,
            action: None,
            routing: None,
            channel,
        }
    }

    pub fn with_target(mut self, target: Option<&'a Actor>) -> Self {
        self.target = target;
        self
    }

    pub fn with_action(mut self, action: &'a Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_routing(mut self, routing: Option<&'a RoutingResult>) -> Self {
        self.routing = routing;
        self
    }
}

/// Pluggable consequence of a resolved action.
pub trait OutcomeHandler: Send + Sync {
    /// Identifier actions use to request this handler. Lowercase.
    fn name(&self) -> &'static str;

    fn criticality(&self) -> HandlerCriticality {
        HandlerCriticality::Important
    }

    fn handle_outcome(&self, ctx: &OutcomeContext<'_>) -> Result<(), HandlerError>;
}
