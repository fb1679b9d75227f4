//! Publishes a combo-end event when routing finishes a combo.

use combat_core::CombatEventKind;

use super::{HandlerCriticality, OutcomeContext, OutcomeHandler};
use crate::error::HandlerError;

/// Publishes `ComboEnded` when the routing result stops the combo or
/// points past its last slot. Actions outside a combo publish nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComboEndHandler;

impl OutcomeHandler for ComboEndHandler {
    fn name(&self) -> &'static str {
        "comboend"
    }

    fn criticality(&self) -> HandlerCriticality {
        HandlerCriticality::Optional
    }

    fn handle_outcome(&self, ctx: &OutcomeContext<'_>) -> Result<(), HandlerError> {
        let (Some(routing), Some(step)) = (ctx.routing, ctx.event.combo_step()) else {
            return Ok(());
        };
        if routing.completes(step.length) {
            ctx.channel
                .publish(&ctx.event.derive(CombatEventKind::ComboEnded));
        }
        Ok(())
    }
}
