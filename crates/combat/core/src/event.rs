//! Combat events.
//!
//! One [`CombatEvent`] is built per resolved action attempt. It is immutable
//! once built and is read by the trigger evaluator, the event channel and
//! the outcome handlers in the same resolution step.

use crate::actor::ActorId;
use crate::roll::RollClass;

/// Kinds of combat occurrence subscribers can listen for.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CombatEventKind {
    ActionExecuted,
    ActionHit,
    ActionMiss,
    CriticalMiss,
    CriticalHit,
    ComboTriggered,
    ComboEnded,
    ActorDied,
    HealthThresholdCrossed,
    StatusApplied,
}

impl CombatEventKind {
    /// Primary kind published for a classified roll.
    pub const fn for_roll(class: RollClass) -> Self {
        match class {
            RollClass::CriticalMiss => Self::CriticalMiss,
            RollClass::Miss => Self::ActionMiss,
            RollClass::Hit => Self::ActionHit,
            RollClass::Combo => Self::ComboTriggered,
            RollClass::Critical => Self::CriticalHit,
        }
    }
}

/// Position of the resolved action inside a combo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComboStep {
    /// 1-based slot of the action.
    pub position: usize,
    /// Number of slots in the sequence.
    pub length: usize,
}

impl ComboStep {
    /// Step for a 0-based slot index.
    pub fn from_slot(slot: usize, length: usize) -> Self {
        Self {
            position: slot + 1,
            length,
        }
    }
}

/// Status or stat payload attached to an event.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventMetadata {
    Status(String),
    Stat { name: String, delta: i32 },
}

/// Immutable record of one combat occurrence.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatEvent {
    kind: CombatEventKind,
    source: ActorId,
    target: Option<ActorId>,
    action: Option<String>,
    roll_value: i32,
    damage: u32,
    is_combo: bool,
    is_critical: bool,
    is_miss: bool,
    health_percentage: f64,
    combo_step: Option<ComboStep>,
    metadata: Option<EventMetadata>,
}

impl CombatEvent {
    /// Creates a builder for an event of `kind` caused by `source`.
    pub fn builder(kind: CombatEventKind, source: ActorId) -> CombatEventBuilder {
        CombatEventBuilder {
            event: Self {
                kind,
                source,
                target: None,
                action: None,
                roll_value: 0,
                damage: 0,
                is_combo: false,
                is_critical: false,
                is_miss: false,
                health_percentage: 0.0,
                combo_step: None,
                metadata: None,
            },
        }
    }

    /// Copy of this event under another kind.
    ///
    /// Used for follow-up events (death, threshold crossing, combo end) that
    /// describe the same exchange.
    pub fn derive(&self, kind: CombatEventKind) -> Self {
        Self {
            kind,
            ..self.clone()
        }
    }

    /// Builder seeded with this event's payload under another kind.
    pub fn to_builder(&self, kind: CombatEventKind) -> CombatEventBuilder {
        CombatEventBuilder {
            event: self.derive(kind),
        }
    }

    pub fn kind(&self) -> CombatEventKind {
        self.kind
    }

    pub fn source(&self) -> ActorId {
        self.source
    }

    pub fn target(&self) -> Option<ActorId> {
        self.target
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn roll_value(&self) -> i32 {
        self.roll_value
    }

    pub fn damage(&self) -> u32 {
        self.damage
    }

    pub fn is_combo(&self) -> bool {
        self.is_combo
    }

    pub fn is_critical(&self) -> bool {
        self.is_critical
    }

    pub fn is_miss(&self) -> bool {
        self.is_miss
    }

    pub fn is_hit(&self) -> bool {
        !self.is_miss
    }

    /// Health fraction of the target, or of the source when untargeted.
    pub fn health_percentage(&self) -> f64 {
        self.health_percentage
    }

    pub fn combo_step(&self) -> Option<ComboStep> {
        self.combo_step
    }

    pub fn metadata(&self) -> Option<&EventMetadata> {
        self.metadata.as_ref()
    }
}

/// Builder for [`CombatEvent`].
#[derive(Clone, Debug)]
pub struct CombatEventBuilder {
    event: CombatEvent,
}

impl CombatEventBuilder {
    pub fn target(mut self, target: ActorId) -> Self {
        self.event.target = Some(target);
        self
    }

    pub fn action(mut self, name: impl Into<String>) -> Self {
        self.event.action = Some(name.into());
        self
    }

    pub fn roll(mut self, value: i32) -> Self {
        self.event.roll_value = value;
        self
    }

    pub fn damage(mut self, damage: u32) -> Self {
        self.event.damage = damage;
        self
    }

    /// Sets the miss/combo/critical flags from a classification.
    pub fn classified(mut self, class: RollClass) -> Self {
        self.event.is_miss = class.is_miss();
        self.event.is_combo = class.is_combo();
        self.event.is_critical = class.is_critical();
        self
    }

    pub fn health_percentage(mut self, fraction: f64) -> Self {
        self.event.health_percentage = fraction;
        self
    }

    pub fn combo_step(mut self, step: ComboStep) -> Self {
        self.event.combo_step = Some(step);
        self
    }

    pub fn metadata(mut self, metadata: EventMetadata) -> Self {
        self.event.metadata = Some(metadata);
        self
    }

    pub fn build(self) -> CombatEvent {
        self.event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_sets_flags() {
        let event = CombatEvent::builder(CombatEventKind::CriticalHit, ActorId(1))
            .target(ActorId(2))
            .action("Slam")
            .roll(20)
            .classified(RollClass::Critical)
            .build();

        assert!(event.is_critical());
        assert!(event.is_combo());
        assert!(event.is_hit());
        assert_eq!(event.action(), Some("Slam"));
        assert_eq!(event.target(), Some(ActorId(2)));
    }

    #[test]
    fn primary_kind_follows_classification() {
        assert_eq!(
            CombatEventKind::for_roll(RollClass::Miss),
            CombatEventKind::ActionMiss
        );
        assert_eq!(
            CombatEventKind::for_roll(RollClass::Combo),
            CombatEventKind::ComboTriggered
        );
        assert_eq!(
            "health_threshold_crossed".parse::<CombatEventKind>(),
            Ok(CombatEventKind::HealthThresholdCrossed)
        );
    }

    #[test]
    fn derived_event_keeps_payload() {
        let event = CombatEvent::builder(CombatEventKind::ActionHit, ActorId(1))
            .damage(7)
            .combo_step(ComboStep::from_slot(2, 4))
            .build();
        let died = event.derive(CombatEventKind::ActorDied);
        assert_eq!(died.kind(), CombatEventKind::ActorDied);
        assert_eq!(died.damage(), 7);
        assert_eq!(died.combo_step().map(|s| s.position), Some(3));
    }
}
