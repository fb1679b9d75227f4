//! Action resolution pipeline.
//!
//! [`CombatSession::resolve`] runs one action attempt to completion:
//!
//! ```text
//! roll -> classify -> apply damage -> build event -> evaluate triggers
//!      -> record action used -> publish -> route combo -> process outcomes
//! ```
//!
//! Every attempt publishes [`CombatEventKind::ActionExecuted`] first, then
//! the kind matching its roll class. A target killed by the attempt has its
//! trigger history dropped.
//!
//! The session owns every piece of mutable engine state (trigger history,
//! subscriptions, outcome handlers), so separate encounters use separate
//! sessions and [`CombatSession::reset`] returns one to a clean slate.

use std::sync::Arc;

use combat_core::{
    Action, Actor, CombatConfig, CombatEvent, CombatEventKind, ComboAdvance, ComboRouter,
    ComboSequence, ComboStep, DiceRoller, EventMetadata, ExchangeThresholds, RollBreakdown,
    RollClass, RoutingResult, TriggerEvaluator, resolve_roll_detailed,
};
use tracing::{debug, info, warn};

use crate::error::{Result, RuntimeError};
use crate::events::{CombatEventChannel, PublishReport};
use crate::outcomes::{OutcomeContext, OutcomeHandlerRegistry, OutcomeReport};

/// One use of an action.
pub struct ActionAttempt<'a> {
    source: &'a Actor,
    target: Option<&'a mut Actor>,
    action: &'a Action,
    raw_roll: Option<i32>,
    combo: Option<(usize, usize)>,
}

impl<'a> ActionAttempt<'a> {
    pub fn new(source: &'a Actor, action: &'a Action) -> Self {
        Self {
            source,
            target: None,
            action,
            raw_roll: None,
            combo: None,
        }
    }

    pub fn target(mut self, target: &'a mut Actor) -> Self {
        self.target = Some(target);
        self
    }

    /// Uses this raw roll instead of rolling the die.
    pub fn raw_roll(mut self, roll: i32) -> Self {
        self.raw_roll = Some(roll);
        self
    }

    /// Marks the attempt as 0-based `slot` of a combo of `length` slots.
    pub fn combo_slot(mut self, slot: usize, length: usize) -> Self {
        self.combo = Some((slot, length));
        self
    }
}

/// Everything one resolution produced.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub breakdown: RollBreakdown,
    pub class: RollClass,
    pub thresholds: ExchangeThresholds,
    pub event: CombatEvent,
    /// Whether every trigger condition on the action held.
    pub triggers_fired: bool,
    pub routing: Option<RoutingResult>,
    /// Delivery of the `ActionExecuted` event.
    pub executed: PublishReport,
    /// Delivery of the roll-class event.
    pub publish: PublishReport,
    pub outcomes: OutcomeReport,
}

/// Owner of the engine's mutable state for one encounter.
#[derive(Debug)]
pub struct CombatSession {
    config: CombatConfig,
    evaluator: TriggerEvaluator,
    channel: CombatEventChannel,
    outcomes: OutcomeHandlerRegistry,
    router: ComboRouter,
}

impl CombatSession {
    /// Upper bound on steps in one [`run_combo`](Self::run_combo) call, so a
    /// looping combo always returns.
    pub const MAX_COMBO_STEPS: usize = 32;

    pub fn new(config: CombatConfig) -> Result<Self> {
        config.validate()?;
        let outcomes = OutcomeHandlerRegistry::with_defaults(&config);
        Ok(Self {
            config,
            evaluator: TriggerEvaluator::new(),
            channel: CombatEventChannel::new(),
            outcomes,
            router: ComboRouter::new(),
        })
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// The session's event channel. Clone it to subscribe from elsewhere.
    pub fn channel(&self) -> &CombatEventChannel {
        &self.channel
    }

    pub fn evaluator(&self) -> &TriggerEvaluator {
        &self.evaluator
    }

    pub fn outcomes(&self) -> &OutcomeHandlerRegistry {
        &self.outcomes
    }

    pub fn outcomes_mut(&mut self) -> &mut OutcomeHandlerRegistry {
        &mut self.outcomes
    }

    /// Resolves one action attempt.
    ///
    /// Inside a combo a miss stops the combo; otherwise the router picks the
    /// next slot.
    pub fn resolve(&mut self, attempt: ActionAttempt<'_>, dice: &mut dyn DiceRoller) -> Resolution {
        let ActionAttempt {
            source,
            mut target,
            action,
            raw_roll,
            combo,
        } = attempt;

        let raw = raw_roll.unwrap_or_else(|| {
            i32::try_from(dice.roll_die(CombatConfig::DIE_SIDES)).unwrap_or(1)
        });
        let breakdown =
            resolve_roll_detailed(action.roll(), raw, dice, self.config.max_explosions);
        let thresholds = ExchangeThresholds::for_exchange(&self.config.thresholds, action.roll());
        let class = thresholds.source.classify(breakdown.final_roll);

        let (damage, restored) = apply_effect(action, class, target.as_deref_mut());

        let target_ref = target.as_deref();
        let mut builder = CombatEvent::builder(CombatEventKind::for_roll(class), source.id())
            .action(action.name())
            .roll(breakdown.final_roll)
            .damage(damage)
            .classified(class)
            .health_percentage(
                target_ref.map_or_else(|| source.health_percentage(), Actor::health_percentage),
            );
        if let Some(target) = target_ref {
            builder = builder.target(target.id());
        }
        if let Some((slot, length)) = combo {
            builder = builder.combo_step(ComboStep::from_slot(slot, length));
        }
        if restored > 0 {
            builder = builder.metadata(EventMetadata::Stat {
                name: "health".to_string(),
                delta: i32::try_from(restored).unwrap_or(i32::MAX),
            });
        }
        let event = builder.build();

        let triggers_fired = self.evaluator.evaluate_conditions(
            action.triggers(),
            &event,
            source,
            target_ref,
            Some(action),
        );
        self.evaluator.record_action_used(source.id(), action);

        let executed = self
            .channel
            .publish(&event.derive(CombatEventKind::ActionExecuted));
        let publish = self.channel.publish(&event);

        let routing = combo.map(|(slot, length)| {
            if class.is_miss() {
                RoutingResult {
                    continue_combo: false,
                    next_slot: slot,
                    directive: None,
                }
            } else {
                self.router.route_next(action, slot, length, dice)
            }
        });

        let ctx = OutcomeContext::new(&event, source, &self.channel)
            .with_target(target_ref)
            .with_action(action)
            .with_routing(routing.as_ref());
        let outcomes = self.outcomes.process_outcomes(action, &ctx);

        if let Some(fallen) = target_ref.filter(|t| t.is_dead()) {
            if self.evaluator.forget(fallen.id()).is_some() {
                debug!(target: "combat::session", actor = %fallen.id(), "history dropped");
            }
        }

        debug!(
            target: "combat::session",
            actor = %source.id(),
            action = action.name(),
            raw,
            roll = breakdown.final_roll,
            %class,
            damage,
            triggers_fired,
            "action resolved"
        );

        Resolution {
            breakdown,
            class,
            thresholds,
            event,
            triggers_fired,
            routing,
            executed,
            publish,
            outcomes,
        }
    }

    /// Drives `sequence` from its current slot until it completes, the
    /// target dies, or [`MAX_COMBO_STEPS`](Self::MAX_COMBO_STEPS) is reached.
    pub fn run_combo(
        &mut self,
        source: &Actor,
        target: &mut Actor,
        sequence: &mut ComboSequence,
        dice: &mut dyn DiceRoller,
    ) -> Result<Vec<Resolution>> {
        if sequence.is_empty() {
            return Err(RuntimeError::EmptyCombo);
        }

        let mut resolutions = Vec::new();
        while let Some(action) = sequence.current_action().map(Arc::clone) {
            if resolutions.len() >= Self::MAX_COMBO_STEPS {
                warn!(
                    target: "combat::session",
                    actor = %source.id(),
                    steps = resolutions.len(),
                    "combo step limit reached"
                );
                break;
            }

            let attempt = ActionAttempt::new(source, &action)
                .target(&mut *target)
                .combo_slot(sequence.current_slot(), sequence.len());
            let resolution = self.resolve(attempt, dice);

            let advance = match resolution.routing {
                Some(routing) => sequence.advance(&routing),
                None => ComboAdvance::Completed,
            };
            resolutions.push(resolution);

            if advance == ComboAdvance::Completed || target.is_dead() {
                break;
            }
        }

        Ok(resolutions)
    }

    /// Clears trigger history and subscriptions, and restores the built-in
    /// outcome handlers.
    pub fn reset(&mut self) {
        self.evaluator.clear_history();
        self.channel.clear();
        self.outcomes = OutcomeHandlerRegistry::with_defaults(&self.config);
        info!(target: "combat::session", "session reset");
    }
}

/// Applies the action's effect on a hit. Returns `(damage, restored)`.
///
/// Damaging actions deal their base value, doubled on a critical. Healing
/// actions restore their base value to the target.
fn apply_effect(action: &Action, class: RollClass, target: Option<&mut Actor>) -> (u32, u32) {
    if class.is_miss() {
        return (0, 0);
    }
    let Some(health) = target.and_then(Actor::as_health_mut) else {
        return (0, 0);
    };

    let category = action.category();
    if category.deals_damage() {
        let amount = if class.is_critical() {
            action.base_value().saturating_mul(2)
        } else {
            action.base_value()
        };
        (health.health_mut().apply_damage(amount), 0)
    } else if category.restores_health() {
        (0, health.health_mut().restore(action.base_value()))
    } else {
        (0, 0)
    }
}
