use std::sync::Arc;

use combat_core::{
    Action, ActionCategory, Actor, ActorId, Character, CombatConfig, CombatEventKind,
    DiceAggregation, Enemy, EventMetadata, Health, PcgDice, RollClass, RollModificationModel,
    ScriptedDice, ThresholdKind, TriggerCondition,
};
use combat_runtime::{ActionAttempt, CombatSession, HandlerError};
use parking_lot::Mutex;

fn session() -> CombatSession {
    CombatSession::new(CombatConfig::default()).expect("default config is valid")
}

fn hero() -> Actor {
    Character::new(ActorId(1), "Hero", Health::full(30)).into()
}

fn goblin(health: Health) -> Actor {
    Enemy::new(ActorId(2), "Goblin", health).into()
}

fn record(session: &CombatSession, kinds: &[CombatEventKind]) -> Arc<Mutex<Vec<CombatEventKind>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    for &kind in kinds {
        let sink = Arc::clone(&seen);
        session.channel().subscribe(kind, move |event| {
            sink.lock().push(event.kind());
            Ok(())
        });
    }
    seen
}

#[test]
fn killing_blow_publishes_hit_then_death() {
    let mut session = session();
    let seen = record(
        &session,
        &[CombatEventKind::ActionHit, CombatEventKind::ActorDied],
    );

    let source = hero();
    let mut target = goblin(Health::full(5));
    let stab = Action::builder("Stab", ActionCategory::Attack)
        .base_value(5)
        .outcome_handler("onKill")
        .build();

    let resolution = session.resolve(
        ActionAttempt::new(&source, &stab).target(&mut target).raw_roll(10),
        &mut ScriptedDice::default(),
    );

    assert_eq!(resolution.class, RollClass::Hit);
    assert_eq!(resolution.event.damage(), 5);
    assert!(target.is_dead());
    assert_eq!(resolution.publish.delivered, 1);
    assert_eq!(resolution.outcomes.invoked, vec!["onkill".to_string()]);
    assert_eq!(
        *seen.lock(),
        vec![CombatEventKind::ActionHit, CombatEventKind::ActorDied]
    );
}

#[test]
fn every_attempt_publishes_action_executed_first() {
    let mut session = session();
    let seen = record(
        &session,
        &[
            CombatEventKind::ActionExecuted,
            CombatEventKind::ActionHit,
            CombatEventKind::ActionMiss,
        ],
    );

    let source = hero();
    let mut target = goblin(Health::full(50));
    let jab = Action::builder("Jab", ActionCategory::Attack)
        .base_value(2)
        .build();
    let mut dice = ScriptedDice::default();

    let hit = session.resolve(
        ActionAttempt::new(&source, &jab).target(&mut target).raw_roll(10),
        &mut dice,
    );
    let miss = session.resolve(
        ActionAttempt::new(&source, &jab).target(&mut target).raw_roll(2),
        &mut dice,
    );

    assert_eq!(hit.executed.delivered, 1);
    assert_eq!(miss.executed.delivered, 1);
    assert_eq!(
        *seen.lock(),
        vec![
            CombatEventKind::ActionExecuted,
            CombatEventKind::ActionHit,
            CombatEventKind::ActionExecuted,
            CombatEventKind::ActionMiss,
        ]
    );
}

#[test]
fn fallen_target_loses_its_trigger_history() {
    let mut session = session();
    let source = hero();
    let mut target = goblin(Health::full(4));
    let bite = Action::builder("Bite", ActionCategory::Attack).build();
    let smash = Action::builder("Smash", ActionCategory::Attack)
        .base_value(4)
        .build();
    let mut dice = ScriptedDice::default();

    let snapshot = target.clone();
    session.resolve(
        ActionAttempt::new(&snapshot, &bite).raw_roll(10),
        &mut dice,
    );
    assert_eq!(session.evaluator().last_action(ActorId(2)), Some("Bite"));

    session.resolve(
        ActionAttempt::new(&source, &smash).target(&mut target).raw_roll(10),
        &mut dice,
    );

    assert!(target.is_dead());
    assert_eq!(session.evaluator().last_action(ActorId(2)), None);
    assert_eq!(session.evaluator().last_action(ActorId(1)), Some("Smash"));
}

#[test]
fn triggers_see_history_from_before_the_current_action() {
    let mut session = session();
    let source = hero();
    let mut target = goblin(Health::full(100));
    let cleave = Action::builder("Cleave", ActionCategory::Attack)
        .trigger(TriggerCondition::same_action_used_previously())
        .build();
    let jab = Action::builder("Jab", ActionCategory::Attack)
        .trigger(TriggerCondition::different_action_used_previously())
        .build();
    let mut dice = ScriptedDice::default();

    let first = session.resolve(
        ActionAttempt::new(&source, &cleave).target(&mut target).raw_roll(10),
        &mut dice,
    );
    assert!(!first.triggers_fired);

    let second = session.resolve(
        ActionAttempt::new(&source, &cleave).target(&mut target).raw_roll(10),
        &mut dice,
    );
    assert!(second.triggers_fired);

    let third = session.resolve(
        ActionAttempt::new(&source, &jab).target(&mut target).raw_roll(10),
        &mut dice,
    );
    assert!(third.triggers_fired);
    assert_eq!(session.evaluator().last_action(ActorId(1)), Some("Jab"));
}

#[test]
fn failing_subscriber_does_not_stop_resolution() {
    let mut session = session();
    session
        .channel()
        .subscribe(CombatEventKind::ActionMiss, |_| Err(HandlerError::failed("boom")));
    let seen = record(&session, &[CombatEventKind::ActionMiss]);

    let source = hero();
    let mut target = goblin(Health::full(10));
    let swing = Action::builder("Swing", ActionCategory::Attack)
        .base_value(4)
        .build();

    let resolution = session.resolve(
        ActionAttempt::new(&source, &swing).target(&mut target).raw_roll(3),
        &mut ScriptedDice::default(),
    );

    assert_eq!(resolution.class, RollClass::Miss);
    assert_eq!(resolution.event.damage(), 0);
    assert_eq!(resolution.publish.failures.len(), 1);
    assert_eq!(resolution.publish.delivered, 1);
    assert_eq!(seen.lock().len(), 1);
    assert_eq!(target.health_percentage(), 1.0);
}

#[test]
fn shared_adjustments_reach_the_target() {
    let mut session = session();
    let source = hero();
    let mut target = goblin(Health::full(10));

    let steady = RollModificationModel::builder()
        .threshold_adjustment(ThresholdKind::Hit, -3)
        .build()
        .unwrap();
    let shared = RollModificationModel::builder()
        .threshold_adjustment(ThresholdKind::Hit, -3)
        .adjust_both()
        .build()
        .unwrap();

    let solo = Action::builder("Aim", ActionCategory::Attack)
        .roll(steady)
        .build();
    let both = Action::builder("Feint", ActionCategory::Attack)
        .roll(shared)
        .build();
    let mut dice = ScriptedDice::default();

    let first = session.resolve(
        ActionAttempt::new(&source, &solo).target(&mut target).raw_roll(4),
        &mut dice,
    );
    assert_eq!(first.class, RollClass::Hit);
    assert_eq!(first.thresholds.source.get(ThresholdKind::Hit), 3);
    assert_eq!(first.thresholds.target.get(ThresholdKind::Hit), 6);

    let second = session.resolve(
        ActionAttempt::new(&source, &both).target(&mut target).raw_roll(4),
        &mut dice,
    );
    assert_eq!(second.thresholds.target.get(ThresholdKind::Hit), 3);
}

#[test]
fn crossing_the_health_threshold_publishes_once() {
    let mut session = session();
    let crossed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&crossed);
    session
        .channel()
        .subscribe(CombatEventKind::HealthThresholdCrossed, move |event| {
            sink.lock().push(event.metadata().cloned());
            Ok(())
        });

    let source = hero();
    let mut target = goblin(Health::new(6, 20));
    let poke = Action::builder("Poke", ActionCategory::Attack)
        .base_value(3)
        .outcome_handler("healthThreshold")
        .build();
    let mut dice = ScriptedDice::default();

    // 30% -> 15%
    session.resolve(
        ActionAttempt::new(&source, &poke).target(&mut target).raw_roll(10),
        &mut dice,
    );
    // 15% -> 0%, already below
    session.resolve(
        ActionAttempt::new(&source, &poke).target(&mut target).raw_roll(10),
        &mut dice,
    );

    assert_eq!(
        *crossed.lock(),
        vec![Some(EventMetadata::Stat {
            name: "health_percent".to_string(),
            delta: 25,
        })]
    );
}

#[test]
fn reset_clears_session_state() {
    let mut session = session();
    record(&session, &[CombatEventKind::ActionHit]);
    session.outcomes_mut().unregister("onkill");

    let source = hero();
    let mut target = goblin(Health::full(10));
    let swing = Action::builder("Swing", ActionCategory::Attack).build();
    session.resolve(
        ActionAttempt::new(&source, &swing).target(&mut target).raw_roll(12),
        &mut ScriptedDice::default(),
    );
    assert_eq!(session.evaluator().last_action(ActorId(1)), Some("Swing"));

    session.reset();

    assert_eq!(session.channel().total_subscribers(), 0);
    assert_eq!(session.evaluator().last_action(ActorId(1)), None);
    assert!(session.outcomes().contains("onkill"));
    assert_eq!(session.outcomes().len(), 9);
}

#[test]
fn status_outcome_marks_the_target_on_hit() {
    let mut session = session();
    let statuses = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&statuses);
    session
        .channel()
        .subscribe(CombatEventKind::StatusApplied, move |event| {
            sink.lock().push((event.target(), event.metadata().cloned()));
            Ok(())
        });

    let source = hero();
    let mut target = goblin(Health::full(40));
    let fang = Action::builder("Fang", ActionCategory::Attack)
        .base_value(2)
        .outcome_handler("Poison")
        .outcome_handler("bleed")
        .build();
    let mut dice = ScriptedDice::default();

    let hit = session.resolve(
        ActionAttempt::new(&source, &fang).target(&mut target).raw_roll(10),
        &mut dice,
    );
    session.resolve(
        ActionAttempt::new(&source, &fang).target(&mut target).raw_roll(2),
        &mut dice,
    );

    assert_eq!(hit.outcomes.invoked, vec!["poison".to_string(), "bleed".to_string()]);
    assert_eq!(
        *statuses.lock(),
        vec![
            (Some(ActorId(2)), Some(EventMetadata::Status("poison".to_string()))),
            (Some(ActorId(2)), Some(EventMetadata::Status("bleed".to_string()))),
        ]
    );
}

#[test]
fn seeded_dice_replay_identically() {
    let model = RollModificationModel::builder()
        .additive(2)
        .multiplier(1.5)
        .exploding(18)
        .dice(2, DiceAggregation::Highest)
        .reroll(0.25)
        .build()
        .unwrap();
    let blast = Action::builder("Blast", ActionCategory::Spell)
        .base_value(1)
        .roll(model)
        .build();

    let run = || {
        let mut session = session();
        let mut dice = PcgDice::seeded(7);
        let source = hero();
        let mut target = goblin(Health::full(1_000));
        (0..20)
            .map(|_| {
                session
                    .resolve(
                        ActionAttempt::new(&source, &blast).target(&mut target),
                        &mut dice,
                    )
                    .breakdown
            })
            .collect::<Vec<_>>()
    };

    let first = run();
    assert_eq!(first, run());
    assert!(first.iter().all(|b| (1..=20).contains(&b.final_roll)));
}
