//! Trigger condition evaluation.

use std::collections::HashMap;

use crate::action::Action;
use crate::actor::{Actor, ActorId};
use crate::event::CombatEvent;

use super::condition::{TriggerCondition, TriggerKind};

/// Decides whether an action's trigger conditions hold for one event.
///
/// The evaluator owns the per-actor "last action used" history that the
/// repetition conditions read. History lives until [`clear_history`] or
/// [`forget`] is called.
///
/// [`clear_history`]: Self::clear_history
/// [`forget`]: Self::forget
#[derive(Clone, Debug, Default)]
pub struct TriggerEvaluator {
    last_action: HashMap<ActorId, String>,
}

impl TriggerEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff every condition holds. An empty list holds.
    pub fn evaluate_conditions(
        &self,
        conditions: &[TriggerCondition],
        event: &CombatEvent,
        source: &Actor,
        target: Option<&Actor>,
        action: Option<&Action>,
    ) -> bool {
        conditions
            .iter()
            .all(|condition| self.evaluate(condition, event, source, target, action))
    }

    /// Evaluates a single condition. Missing data means "not satisfied".
    pub fn evaluate(
        &self,
        condition: &TriggerCondition,
        event: &CombatEvent,
        source: &Actor,
        target: Option<&Actor>,
        action: Option<&Action>,
    ) -> bool {
        match condition.kind {
            TriggerKind::Unspecified => false,

            TriggerKind::OnMiss => event.is_miss(),
            TriggerKind::OnNormalHit => {
                event.is_hit() && !event.is_combo() && !event.is_critical()
            }
            TriggerKind::OnComboHit => event.is_hit() && event.is_combo(),
            TriggerKind::OnCriticalHit => event.is_hit() && event.is_critical(),
            TriggerKind::OnExactRollValue => condition
                .value
                .is_some_and(|value| event.roll_value() == value),

            TriggerKind::SameActionUsedPreviously => action.is_some_and(|action| {
                self.last_action(source.id()) == Some(action.name())
            }),
            TriggerKind::DifferentActionUsedPreviously => action.is_some_and(|action| {
                self.last_action(source.id())
                    .is_some_and(|last| last != action.name())
            }),

            TriggerKind::ActionHasTag => match (action, condition.tag.as_deref()) {
                (Some(action), Some(tag)) => action.has_tag(tag),
                _ => false,
            },
            TriggerKind::GearHasTag => match (source.as_gear(), condition.tag.as_deref()) {
                (Some(gear), Some(tag)) => gear.gear_has_tag(tag),
                _ => false,
            },

            TriggerKind::TargetHealthBelow => {
                health_check(target, condition.value, |fraction, limit| fraction < limit)
            }
            TriggerKind::TargetHealthAbove => {
                health_check(target, condition.value, |fraction, limit| fraction > limit)
            }
            TriggerKind::SourceHealthBelow => {
                health_check(Some(source), condition.value, |fraction, limit| fraction < limit)
            }
            TriggerKind::SourceHealthAbove => {
                health_check(Some(source), condition.value, |fraction, limit| fraction > limit)
            }

            TriggerKind::ComboPositionEquals => {
                match (event.combo_step(), condition.combo_position) {
                    (Some(step), Some(position)) => step.position == position,
                    _ => false,
                }
            }
            TriggerKind::ComboLengthEquals => match (event.combo_step(), condition.value) {
                (Some(step), Some(length)) => {
                    usize::try_from(length).is_ok_and(|length| step.length == length)
                }
                _ => false,
            },
        }
    }

    /// Records `action` as the most recent action used by `actor`.
    pub fn record_action_used(&mut self, actor: ActorId, action: &Action) {
        self.last_action.insert(actor, action.name().to_string());
    }

    pub fn last_action(&self, actor: ActorId) -> Option<&str> {
        self.last_action.get(&actor).map(String::as_str)
    }

    /// Drops every actor's history.
    pub fn clear_history(&mut self) {
        self.last_action.clear();
    }

    /// Drops one actor's history, e.g. when it leaves combat.
    pub fn forget(&mut self, actor: ActorId) -> Option<String> {
        self.last_action.remove(&actor)
    }
}

/// Compares an actor's health fraction against `percent / 100`.
fn health_check(
    actor: Option<&Actor>,
    percent: Option<i32>,
    compare: impl Fn(f64, f64) -> bool,
) -> bool {
    let (Some(health), Some(percent)) = (actor.and_then(Actor::as_health), percent) else {
        return false;
    };
    compare(health.health_percentage(), f64::from(percent) / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionCategory;
    use crate::actor::{Character, Enemy, Equipment, GearItem, Health};
    use crate::event::{CombatEventKind, ComboStep};
    use crate::roll::RollClass;

    fn hero() -> Actor {
        Character::new(ActorId(1), "Hero", Health::new(40, 100))
            .with_equipment(
                Equipment::builder()
                    .weapon(GearItem::new("Warhammer").tag("Blunt"))
                    .build(),
            )
            .into()
    }

    fn goblin(current: u32, max: u32) -> Actor {
        Enemy::new(ActorId(2), "Goblin", Health::new(current, max)).into()
    }

    fn slam() -> Action {
        Action::builder("Slam", ActionCategory::Attack)
            .tag("melee")
            .build()
    }

    fn event(class: RollClass, roll: i32) -> CombatEvent {
        CombatEvent::builder(CombatEventKind::for_roll(class), ActorId(1))
            .target(ActorId(2))
            .action("Slam")
            .roll(roll)
            .classified(class)
            .build()
    }

    #[test]
    fn empty_conditions_are_vacuously_true() {
        let evaluator = TriggerEvaluator::new();
        let event = event(RollClass::Miss, 3);
        assert!(evaluator.evaluate_conditions(&[], &event, &hero(), None, None));
    }

    #[test]
    fn conditions_are_conjunctive_and_order_independent() {
        let evaluator = TriggerEvaluator::new();
        let event = event(RollClass::Hit, 9);
        let source = hero();
        let a = TriggerCondition::on_normal_hit();
        let b = TriggerCondition::on_miss();

        let forward = [a.clone(), b.clone()];
        let backward = [b, a];
        assert!(!evaluator.evaluate_conditions(&forward, &event, &source, None, None));
        assert!(!evaluator.evaluate_conditions(&backward, &event, &source, None, None));
    }

    #[test]
    fn hit_kinds_are_exclusive_of_each_other() {
        let evaluator = TriggerEvaluator::new();
        let source = hero();
        let check = |condition: TriggerCondition, class| {
            evaluator.evaluate(&condition, &event(class, 10), &source, None, None)
        };

        assert!(check(TriggerCondition::on_normal_hit(), RollClass::Hit));
        assert!(!check(TriggerCondition::on_normal_hit(), RollClass::Combo));
        assert!(check(TriggerCondition::on_combo_hit(), RollClass::Combo));
        assert!(check(TriggerCondition::on_combo_hit(), RollClass::Critical));
        assert!(check(TriggerCondition::on_critical_hit(), RollClass::Critical));
        assert!(!check(TriggerCondition::on_critical_hit(), RollClass::CriticalMiss));
        assert!(check(TriggerCondition::on_miss(), RollClass::CriticalMiss));
    }

    #[test]
    fn exact_roll_requires_value() {
        let evaluator = TriggerEvaluator::new();
        let source = hero();
        let event = event(RollClass::Hit, 7);
        assert!(evaluator.evaluate(&TriggerCondition::on_exact_roll(7), &event, &source, None, None));
        assert!(!evaluator.evaluate(&TriggerCondition::on_exact_roll(8), &event, &source, None, None));
        let unset = TriggerCondition::new(TriggerKind::OnExactRollValue);
        assert!(!evaluator.evaluate(&unset, &event, &source, None, None));
    }

    #[test]
    fn repetition_tracks_actor_and_name() {
        let mut evaluator = TriggerEvaluator::new();
        let source = hero();
        let other: Actor = Character::new(ActorId(5), "Other", Health::full(10)).into();
        let slam = slam();
        let jab = Action::builder("Jab", ActionCategory::Attack).build();
        let event = event(RollClass::Hit, 10);
        let same = TriggerCondition::same_action_used_previously();
        let different = TriggerCondition::different_action_used_previously();

        assert!(!evaluator.evaluate(&same, &event, &source, None, Some(&slam)));
        assert!(!evaluator.evaluate(&different, &event, &source, None, Some(&slam)));

        evaluator.record_action_used(source.id(), &slam);
        assert!(evaluator.evaluate(&same, &event, &source, None, Some(&slam)));
        assert!(!evaluator.evaluate(&same, &event, &source, None, Some(&jab)));
        assert!(evaluator.evaluate(&different, &event, &source, None, Some(&jab)));
        assert!(!evaluator.evaluate(&same, &event, &other, None, Some(&slam)));
        assert!(!evaluator.evaluate(&same, &event, &source, None, None));

        evaluator.clear_history();
        assert!(!evaluator.evaluate(&same, &event, &source, None, Some(&slam)));
    }

    #[test]
    fn tag_conditions() {
        let evaluator = TriggerEvaluator::new();
        let source = hero();
        let event = event(RollClass::Hit, 10);
        let slam = slam();

        let melee = TriggerCondition::action_has_tag("MELEE");
        assert!(evaluator.evaluate(&melee, &event, &source, None, Some(&slam)));
        assert!(!evaluator.evaluate(&melee, &event, &source, None, None));

        let blunt = TriggerCondition::gear_has_tag("blunt");
        assert!(evaluator.evaluate(&blunt, &event, &source, None, None));
        assert!(!evaluator.evaluate(&blunt, &event, &goblin(5, 10), None, None));

        let untagged = TriggerCondition::new(TriggerKind::GearHasTag);
        assert!(!evaluator.evaluate(&untagged, &event, &source, None, None));
    }

    #[test]
    fn health_thresholds_are_strict() {
        let evaluator = TriggerEvaluator::new();
        let source = hero();
        let event = event(RollClass::Hit, 10);
        let target = goblin(25, 100);
        let eval = |condition: TriggerCondition, target: Option<&Actor>| {
            evaluator.evaluate(&condition, &event, &source, target, None)
        };

        assert!(!eval(TriggerCondition::target_health_below(25), Some(&target)));
        assert!(eval(TriggerCondition::target_health_below(26), Some(&target)));
        assert!(!eval(TriggerCondition::target_health_above(25), Some(&target)));
        assert!(eval(TriggerCondition::target_health_above(24), Some(&target)));
        assert!(!eval(TriggerCondition::target_health_below(50), None));

        assert!(eval(TriggerCondition::source_health_below(50), None));
        assert!(eval(TriggerCondition::source_health_above(39), None));
    }

    #[test]
    fn zero_max_health_reads_as_zero_percent() {
        let evaluator = TriggerEvaluator::new();
        let source = hero();
        let event = event(RollClass::Hit, 10);
        let husk = goblin(0, 0);

        let below = TriggerCondition::target_health_below(1);
        let above = TriggerCondition::target_health_above(0);
        let below_zero = TriggerCondition::target_health_below(0);
        assert!(evaluator.evaluate(&below, &event, &source, Some(&husk), None));
        assert!(!evaluator.evaluate(&above, &event, &source, Some(&husk), None));
        assert!(!evaluator.evaluate(&below_zero, &event, &source, Some(&husk), None));
    }

    #[test]
    fn combo_conditions_read_the_event_step() {
        let evaluator = TriggerEvaluator::new();
        let source = hero();
        let in_combo = CombatEvent::builder(CombatEventKind::ActionHit, ActorId(1))
            .combo_step(ComboStep::from_slot(1, 4))
            .build();
        let outside = event(RollClass::Hit, 10);

        let second = TriggerCondition::combo_position_equals(2);
        let four_long = TriggerCondition::combo_length_equals(4);
        assert!(evaluator.evaluate(&second, &in_combo, &source, None, None));
        assert!(evaluator.evaluate(&four_long, &in_combo, &source, None, None));
        assert!(!evaluator.evaluate(&second, &outside, &source, None, None));
        assert!(!evaluator.evaluate(
            &TriggerCondition::combo_length_equals(-4),
            &in_combo,
            &source,
            None,
            None
        ));
    }

    #[test]
    fn unspecified_kind_is_denied() {
        let evaluator = TriggerEvaluator::new();
        let event = event(RollClass::Critical, 20);
        let condition = TriggerCondition::default();
        assert!(!evaluator.evaluate(&condition, &event, &hero(), None, None));
    }
}
