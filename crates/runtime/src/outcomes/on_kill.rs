//! Publishes a death event when a hit kills its target.

use combat_core::CombatEventKind;

use super::{HandlerCriticality, OutcomeContext, OutcomeHandler};
use crate::error::HandlerError;

/// Publishes `ActorDied` when the resolved hit left the target at 0 HP.
///
/// Only the killing blow counts: an event with no damage against an already
/// dead target publishes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnKillHandler;

impl OutcomeHandler for OnKillHandler {
    fn name(&self) -> &'static str {
        "onkill"
    }

    fn criticality(&self) -> HandlerCriticality {
        // Death notifications drive cleanup in listeners.
        HandlerCriticality::Important
    }

    fn handle_outcome(&self, ctx: &OutcomeContext<'_>) -> Result<(), HandlerError> {
        let Some(target) = ctx.target else {
            if ctx.event.target().is_some() {
                return Err(HandlerError::MissingContext("target actor"));
            }
            return Ok(());
        };

        if ctx.event.damage() > 0 && target.is_dead() {
            ctx.channel
                .publish(&ctx.event.derive(CombatEventKind::ActorDied));
        }
        Ok(())
    }
}
