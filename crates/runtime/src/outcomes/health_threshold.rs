//! Publishes a threshold event when a hit takes the target below a
//! configured health percentage.

use combat_core::{CombatEventKind, EventMetadata};

use super::{HandlerCriticality, OutcomeContext, OutcomeHandler};
use crate::error::HandlerError;

#[derive(Debug, Clone, Copy)]
pub struct HealthThresholdHandler {
    percent: u32,
}

impl HealthThresholdHandler {
    pub fn new(percent: u32) -> Self {
        Self { percent }
    }

    pub fn percent(&self) -> u32 {
        self.percent
    }
}

impl OutcomeHandler for HealthThresholdHandler {
    fn name(&self) -> &'static str {
        "healththreshold"
    }

    fn criticality(&self) -> HandlerCriticality {
        HandlerCriticality::Optional
    }

    /// Fires once, on the hit that crosses from `>= percent` to `< percent`.
    fn handle_outcome(&self, ctx: &OutcomeContext<'_>) -> Result<(), HandlerError> {
        let Some(health) = ctx.target.and_then(|target| target.as_health()) else {
            return Ok(());
        };
        let health = health.health();
        if health.max() == 0 || ctx.event.damage() == 0 {
            return Ok(());
        }

        let limit = f64::from(self.percent) / 100.0;
        let before_hit = health.current().saturating_add(ctx.event.damage()).min(health.max());
        let before = f64::from(before_hit) / f64::from(health.max());
        let after = health.percentage();

        if before >= limit && after < limit {
            let crossed = ctx
                .event
                .to_builder(CombatEventKind::HealthThresholdCrossed)
                .health_percentage(after)
                .metadata(EventMetadata::Stat {
                    name: "health_percent".to_string(),
                    delta: i32::try_from(self.percent).unwrap_or(i32::MAX),
                })
                .build();
            ctx.channel.publish(&crossed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use combat_core::{Actor, ActorId, CombatEvent, Enemy, Health};
    use parking_lot::Mutex;

    use super::*;
    use crate::events::CombatEventChannel;

    fn hit(channel: &CombatEventChannel, current: u32, damage: u32) -> Vec<f64> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = channel.subscribe(CombatEventKind::HealthThresholdCrossed, move |event| {
            sink.lock().push(event.health_percentage());
            Ok(())
        });

        let source: Actor = Enemy::new(ActorId(1), "Wolf", Health::full(20)).into();
        let target: Actor = Enemy::new(ActorId(2), "Boar", Health::new(current, 100)).into();
        let event = CombatEvent::builder(CombatEventKind::ActionHit, ActorId(1))
            .target(ActorId(2))
            .damage(damage)
            .build();
        let ctx = OutcomeContext::new(&event, &source, channel).with_target(Some(&target));
        HealthThresholdHandler::new(25).handle_outcome(&ctx).unwrap();

        channel.unsubscribe(CombatEventKind::HealthThresholdCrossed, id);
        let seen = seen.lock().clone();
        seen
    }

    #[test]
    fn fires_on_the_crossing_hit_only() {
        let channel = CombatEventChannel::new();
        assert_eq!(hit(&channel, 20, 10), vec![0.2]);
        // Already below before the hit.
        assert!(hit(&channel, 10, 5).is_empty());
        // Still at the threshold after the hit.
        assert!(hit(&channel, 25, 5).is_empty());
        // No damage, no crossing.
        assert!(hit(&channel, 20, 0).is_empty());
    }
}
