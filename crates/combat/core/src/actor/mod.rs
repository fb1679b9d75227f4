//! Combat participants.
//!
//! An [`Actor`] is either a player-controlled [`Character`] or an [`Enemy`].
//! The rules never inspect the variant directly: they ask for a capability
//! ([`HasHealth`], [`HasGearSlots`], [`HasActionPool`]) and treat a missing
//! capability as "no match".

mod gear;
mod health;

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::action::Action;

pub use gear::{Equipment, EquipmentBuilder, GearItem, GearSlot};
pub use health::Health;

/// Stable identity of an actor for the lifetime of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    /// Capabilities an actor exposes to the rules.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ActorCapabilities: u8 {
        const HEALTH      = 1 << 0;
        const GEAR_SLOTS  = 1 << 1;
        const ACTION_POOL = 1 << 2;
    }
}

/// Actors with a health pool.
pub trait HasHealth {
    fn health(&self) -> Health;

    fn health_mut(&mut self) -> &mut Health;

    /// `current / max`, or `0.0` when `max == 0`.
    fn health_percentage(&self) -> f64 {
        self.health().percentage()
    }
}

/// Actors that wear gear.
pub trait HasGearSlots {
    fn equipment(&self) -> &Equipment;

    fn gear_has_tag(&self, tag: &str) -> bool {
        self.equipment().has_tag(tag)
    }
}

/// Actors with a pool of actions (their combo sequence).
pub trait HasActionPool {
    fn action_pool(&self) -> &[Arc<Action>];
}

/// Player-controlled character.
#[derive(Clone, Debug)]
pub struct Character {
    pub id: ActorId,
    pub name: String,
    pub health: Health,
    pub equipment: Equipment,
    pub actions: Vec<Arc<Action>>,
}

impl Character {
    pub fn new(id: ActorId, name: impl Into<String>, health: Health) -> Self {
        Self {
            id,
            name: name.into(),
            health,
            equipment: Equipment::empty(),
            actions: Vec::new(),
        }
    }

    /// Builder: set equipment.
    pub fn with_equipment(mut self, equipment: Equipment) -> Self {
        self.equipment = equipment;
        self
    }

    /// Builder: append an action to the pool.
    pub fn with_action(mut self, action: Arc<Action>) -> Self {
        self.actions.push(action);
        self
    }
}

impl HasHealth for Character {
    fn health(&self) -> Health {
        self.health
    }

    fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }
}

impl HasGearSlots for Character {
    fn equipment(&self) -> &Equipment {
        &self.equipment
    }
}

impl HasActionPool for Character {
    fn action_pool(&self) -> &[Arc<Action>] {
        &self.actions
    }
}

/// Enemy actor. Only some enemies wear gear.
#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: ActorId,
    pub name: String,
    pub health: Health,
    pub equipment: Option<Equipment>,
    pub actions: Vec<Arc<Action>>,
}

impl Enemy {
    pub fn new(id: ActorId, name: impl Into<String>, health: Health) -> Self {
        Self {
            id,
            name: name.into(),
            health,
            equipment: None,
            actions: Vec::new(),
        }
    }

    /// Builder: give the enemy gear slots.
    pub fn with_equipment(mut self, equipment: Equipment) -> Self {
        self.equipment = Some(equipment);
        self
    }

    /// Builder: append an action to the pool.
    pub fn with_action(mut self, action: Arc<Action>) -> Self {
        self.actions.push(action);
        self
    }
}

impl HasHealth for Enemy {
    fn health(&self) -> Health {
        self.health
    }

    fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }
}

impl HasActionPool for Enemy {
    fn action_pool(&self) -> &[Arc<Action>] {
        &self.actions
    }
}

/// A combat participant.
#[derive(Clone, Debug)]
pub enum Actor {
    Character(Character),
    Enemy(Enemy),
}

impl Actor {
    pub fn id(&self) -> ActorId {
        match self {
            Self::Character(c) => c.id,
            Self::Enemy(e) => e.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Character(c) => &c.name,
            Self::Enemy(e) => &e.name,
        }
    }

    pub fn capabilities(&self) -> ActorCapabilities {
        let mut caps = ActorCapabilities::HEALTH | ActorCapabilities::ACTION_POOL;
        if self.as_gear().is_some() {
            caps |= ActorCapabilities::GEAR_SLOTS;
        }
        caps
    }

    pub fn as_health(&self) -> Option<&dyn HasHealth> {
        match self {
            Self::Character(c) => Some(c),
            Self::Enemy(e) => Some(e),
        }
    }

    pub fn as_health_mut(&mut self) -> Option<&mut dyn HasHealth> {
        match self {
            Self::Character(c) => Some(c),
            Self::Enemy(e) => Some(e),
        }
    }

    pub fn as_gear(&self) -> Option<&dyn HasGearSlots> {
        match self {
            Self::Character(c) => Some(c),
            Self::Enemy(e) => e.equipment.as_ref().map(|eq| eq as &dyn HasGearSlots),
        }
    }

    pub fn as_action_pool(&self) -> Option<&dyn HasActionPool> {
        match self {
            Self::Character(c) => Some(c),
            Self::Enemy(e) => Some(e),
        }
    }

    /// Health fraction, `0.0` for actors without a health pool.
    pub fn health_percentage(&self) -> f64 {
        self.as_health().map_or(0.0, |h| h.health_percentage())
    }

    /// True only for actors with a health pool at zero.
    pub fn is_dead(&self) -> bool {
        self.as_health().is_some_and(|h| h.health().is_dead())
    }
}

impl From<Character> for Actor {
    fn from(character: Character) -> Self {
        Self::Character(character)
    }
}

impl From<Enemy> for Actor {
    fn from(enemy: Enemy) -> Self {
        Self::Enemy(enemy)
    }
}

/// Equipped enemies expose their slots through the equipment itself.
impl HasGearSlots for Equipment {
    fn equipment(&self) -> &Equipment {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gearless_enemy_lacks_gear_capability() {
        let goblin: Actor = Enemy::new(ActorId(2), "Goblin", Health::full(20)).into();
        assert!(goblin.as_gear().is_none());
        assert!(!goblin.capabilities().contains(ActorCapabilities::GEAR_SLOTS));

        let knight: Actor = Enemy::new(ActorId(3), "Knight", Health::full(40))
            .with_equipment(Equipment::builder().body(GearItem::new("Plate").tag("armor")).build())
            .into();
        assert!(knight.capabilities().contains(ActorCapabilities::GEAR_SLOTS));
        assert!(knight.as_gear().is_some_and(|g| g.gear_has_tag("ARMOR")));
    }

    #[test]
    fn health_percentage_dispatches_through_capability() {
        let hero: Actor = Character::new(ActorId(1), "Hero", Health::new(15, 60)).into();
        assert_eq!(hero.health_percentage(), 0.25);
        assert!(!hero.is_dead());

        let husk: Actor = Enemy::new(ActorId(9), "Husk", Health::new(0, 0)).into();
        assert_eq!(husk.health_percentage(), 0.0);
        assert!(husk.is_dead());
    }
}
