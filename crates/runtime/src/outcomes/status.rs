//! Status effect outcomes.

use combat_core::{CombatEventKind, EventMetadata};

use super::{HandlerCriticality, OutcomeContext, OutcomeHandler};
use crate::error::HandlerError;

/// Publishes `StatusApplied` carrying the status name when a hit lands on a
/// living target.
///
/// The handler's identifier is the status name itself, so an action lists
/// `"bleed"` to inflict bleeding. Misses and hits on a dead target apply
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusEffectHandler {
    status: &'static str,
}

impl StatusEffectHandler {
    /// Statuses registered by [`OutcomeHandlerRegistry::with_defaults`].
    ///
    /// [`OutcomeHandlerRegistry::with_defaults`]: super::OutcomeHandlerRegistry::with_defaults
    pub const BUILT_IN: [&'static str; 6] = ["bleed", "weaken", "slow", "poison", "stun", "burn"];

    /// `status` should be lowercase; registry keys are.
    pub const fn new(status: &'static str) -> Self {
        Self { status }
    }

    pub const fn status(&self) -> &'static str {
        self.status
    }
}

impl OutcomeHandler for StatusEffectHandler {
    fn name(&self) -> &'static str {
        self.status
    }

    fn criticality(&self) -> HandlerCriticality {
        HandlerCriticality::Optional
    }

    fn handle_outcome(&self, ctx: &OutcomeContext<'_>) -> Result<(), HandlerError> {
        let Some(target) = ctx.target else {
            if ctx.event.target().is_some() {
                return Err(HandlerError::MissingContext("target actor"));
            }
            return Ok(());
        };

        if ctx.event.is_miss() || target.is_dead() {
            return Ok(());
        }

        let applied = ctx
            .event
            .to_builder(CombatEventKind::StatusApplied)
            .metadata(EventMetadata::Status(self.status.to_string()))
            .build();
        ctx.channel.publish(&applied);
        Ok(())
    }
}
