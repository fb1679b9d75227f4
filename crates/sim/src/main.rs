//! Combat simulator binary.
//!
//! Builds a small encounter and drives it through a [`CombatSession`]:
//! the hero runs its combo against an ogre each round until one side falls
//! or the round limit is reached.
//!
//! ```bash
//! # defaults, or COMBAT_* overrides from the environment / .env
//! cargo run -p combat-sim
//!
//! # explicit config file and seed
//! cargo run -p combat-sim -- combat.toml 42
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use combat_core::{
    Action, ActionCategory, Actor, ActorId, Character, CombatEventKind, ComboDirective,
    ComboRouting, ComboSequence, DiceAggregation, Enemy, Equipment, GearItem, Health,
    RollModificationModel, ThresholdKind, TriggerCondition,
};
use combat_runtime::{CombatSession, ConfigLoader, RandDice, Resolution};
use tracing::{info, warn};

const ROUNDS: usize = 5;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => ConfigLoader::load(Path::new(&path))?,
        None => ConfigLoader::from_env()?,
    };
    let mut dice = match args.next() {
        Some(seed) => RandDice::seeded(seed.parse()?),
        None => RandDice::from_os_rng(),
    };

    let mut session = CombatSession::new(config)?;
    watch(&session);

    let hero = hero()?;
    let mut sequence = ComboSequence::from_pool(&hero);
    let hero: Actor = hero.into();
    let mut ogre: Actor = Enemy::new(ActorId(2), "Ogre", Health::full(60)).into();

    for round in 1..=ROUNDS {
        sequence.reset();
        let resolutions = session.run_combo(&hero, &mut ogre, &mut sequence, &mut dice)?;
        println!("-- round {round} --");
        for resolution in &resolutions {
            print_resolution(resolution);
        }
        if ogre.is_dead() {
            println!("{} falls in round {round}", ogre.name());
            return Ok(());
        }
    }

    println!(
        "{} survives with {:.0}% health",
        ogre.name(),
        ogre.health_percentage() * 100.0
    );
    Ok(())
}

/// Four-slot combo. The heavy blow skips the flourish, so a clean run goes
/// opener, heavy blow, finisher.
fn hero() -> Result<Character> {
    let opener = Action::builder("Quick Slash", ActionCategory::Attack)
        .tag("blade")
        .base_value(4)
        .roll(
            RollModificationModel::builder()
                .threshold_adjustment(ThresholdKind::Hit, -2)
                .build()?,
        )
        .outcome_handler("bleed")
        .outcome_handler("comboEnd")
        .build();

    let heavy = Action::builder("Crushing Blow", ActionCategory::Attack)
        .tag("blunt")
        .base_value(9)
        .roll(
            RollModificationModel::builder()
                .additive(-2)
                .exploding(19)
                .build()?,
        )
        .routing(ComboRouting::new(ComboDirective::SkipNext)?.only_in_slot(2))
        .trigger(TriggerCondition::gear_has_tag("heavy"))
        .outcome_handler("onKill")
        .outcome_handler("healthThreshold")
        .outcome_handler("comboEnd")
        .build();

    let flourish = Action::builder("Flourish", ActionCategory::Attack)
        .tag("blade")
        .base_value(3)
        .roll(
            RollModificationModel::builder()
                .dice(2, DiceAggregation::Highest)
                .build()?,
        )
        .outcome_handler("comboEnd")
        .build();

    let finisher = Action::builder("Execute", ActionCategory::Attack)
        .tag("blade")
        .base_value(12)
        .trigger(TriggerCondition::target_health_below(30))
        .trigger(TriggerCondition::different_action_used_previously())
        .outcome_handler("onKill")
        .outcome_handler("comboEnd")
        .build();

    let gear = Equipment::builder()
        .weapon(GearItem::new("Maul").tag("heavy"))
        .build();

    Ok([opener, heavy, flourish, finisher]
        .into_iter()
        .map(Arc::new)
        .fold(
            Character::new(ActorId(1), "Hero", Health::full(40)).with_equipment(gear),
            Character::with_action,
        ))
}

fn watch(session: &CombatSession) {
    let channel = session.channel();
    channel.subscribe(CombatEventKind::ActorDied, |event| {
        info!(target: "combat::sim", actor = ?event.target(), "actor died");
        Ok(())
    });
    channel.subscribe(CombatEventKind::HealthThresholdCrossed, |event| {
        warn!(
            target: "combat::sim",
            actor = ?event.target(),
            health = event.health_percentage(),
            "health threshold crossed"
        );
        Ok(())
    });
    channel.subscribe(CombatEventKind::StatusApplied, |event| {
        info!(
            target: "combat::sim",
            actor = ?event.target(),
            status = ?event.metadata(),
            "status applied"
        );
        Ok(())
    });
    channel.subscribe(CombatEventKind::ComboEnded, |event| {
        info!(target: "combat::sim", action = ?event.action(), "combo ended");
        Ok(())
    });
}

fn print_resolution(resolution: &Resolution) {
    let event = &resolution.event;
    let position = event
        .combo_step()
        .map(|step| format!("{}/{}", step.position, step.length))
        .unwrap_or_default();
    println!(
        "  [{position}] {:<14} roll {:>2} (natural {:>2}) {:<13} damage {:>2}{}",
        event.action().unwrap_or("-"),
        resolution.breakdown.final_roll,
        resolution.breakdown.natural,
        resolution.class.to_string(),
        event.damage(),
        if resolution.triggers_fired {
            "  triggers fired"
        } else {
            ""
        },
    );
}
