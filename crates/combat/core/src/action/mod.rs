//! Action definitions.
//!
//! An [`Action`] is loaded once and shared read-only (`Arc<Action>`) for the
//! rest of the session. Nothing in the engine mutates one.

use crate::combo::{ComboDirective, ComboRouting};
use crate::error::ConfigError;
use crate::roll::RollModificationModel;
use crate::trigger::TriggerCondition;

/// What kind of move an action is.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionCategory {
    #[default]
    Attack,
    Heal,
    Buff,
    Debuff,
    Spell,
    Interact,
    Move,
    UseItem,
}

impl ActionCategory {
    /// Whether a successful use damages the target.
    pub const fn deals_damage(self) -> bool {
        matches!(self, Self::Attack | Self::Spell)
    }

    pub const fn restores_health(self) -> bool {
        matches!(self, Self::Heal)
    }
}

/// Immutable definition of a combat move.
///
/// Deserialized actions go through [`ActionBuilder`], so tags and outcome
/// handler names are normalized no matter how they were loaded.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "ActionDefinition", into = "ActionDefinition")
)]
pub struct Action {
    name: String,
    category: ActionCategory,
    tags: Vec<String>,
    base_value: u32,
    roll: RollModificationModel,
    routing: ComboRouting,
    triggers: Vec<TriggerCondition>,
    outcome_handlers: Vec<String>,
}

/// Serialized form of an [`Action`].
#[cfg(feature = "serde")]
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActionDefinition {
    pub name: String,
    pub category: ActionCategory,
    pub tags: Vec<String>,
    pub base_value: u32,
    pub roll: RollModificationModel,
    pub routing: ComboRouting,
    pub triggers: Vec<TriggerCondition>,
    pub outcome_handlers: Vec<String>,
}

#[cfg(feature = "serde")]
impl From<ActionDefinition> for Action {
    fn from(definition: ActionDefinition) -> Self {
        let builder = Action::builder(definition.name, definition.category)
            .base_value(definition.base_value)
            .roll(definition.roll)
            .routing(definition.routing);
        let builder = definition.tags.iter().fold(builder, ActionBuilder::tag);
        let builder = definition
            .triggers
            .into_iter()
            .fold(builder, ActionBuilder::trigger);
        definition
            .outcome_handlers
            .iter()
            .fold(builder, ActionBuilder::outcome_handler)
            .build()
    }
}

#[cfg(feature = "serde")]
impl From<Action> for ActionDefinition {
    fn from(action: Action) -> Self {
        Self {
            name: action.name,
            category: action.category,
            tags: action.tags,
            base_value: action.base_value,
            roll: action.roll,
            routing: action.routing,
            triggers: action.triggers,
            outcome_handlers: action.outcome_handlers,
        }
    }
}

impl Action {
    pub fn builder(name: impl Into<String>, category: ActionCategory) -> ActionBuilder {
        ActionBuilder {
            action: Self {
                name: name.into(),
                category,
                tags: Vec::new(),
                base_value: 0,
                roll: RollModificationModel::default(),
                routing: ComboRouting::none(),
                triggers: Vec::new(),
                outcome_handlers: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> ActionCategory {
        self.category
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Case-insensitive tag lookup.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Damage dealt (or health restored) on a normal hit.
    pub fn base_value(&self) -> u32 {
        self.base_value
    }

    pub fn roll(&self) -> &RollModificationModel {
        &self.roll
    }

    pub fn routing(&self) -> &ComboRouting {
        &self.routing
    }

    pub fn triggers(&self) -> &[TriggerCondition] {
        &self.triggers
    }

    /// Outcome handler identifiers, lowercase.
    pub fn outcome_handlers(&self) -> &[String] {
        &self.outcome_handlers
    }
}

/// Builder for [`Action`].
#[derive(Clone, Debug)]
pub struct ActionBuilder {
    action: Action,
}

impl ActionBuilder {
    pub fn tag(mut self, tag: impl AsRef<str>) -> Self {
        let tag = tag.as_ref().to_lowercase();
        if !self.action.tags.contains(&tag) {
            self.action.tags.push(tag);
        }
        self
    }

    pub fn base_value(mut self, value: u32) -> Self {
        self.action.base_value = value;
        self
    }

    pub fn roll(mut self, roll: RollModificationModel) -> Self {
        self.action.roll = roll;
        self
    }

    pub fn routing(mut self, routing: ComboRouting) -> Self {
        self.action.routing = routing;
        self
    }

    /// Shorthand for a routing that applies in every slot.
    pub fn directive(mut self, directive: ComboDirective) -> Result<Self, ConfigError> {
        self.action.routing = ComboRouting::new(directive)?;
        Ok(self)
    }

    pub fn trigger(mut self, condition: TriggerCondition) -> Self {
        self.action.triggers.push(condition);
        self
    }

    pub fn outcome_handler(mut self, name: impl AsRef<str>) -> Self {
        self.action
            .outcome_handlers
            .push(name.as_ref().to_lowercase());
        self
    }

    pub fn build(self) -> Action {
        self.action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_normalizes_tags_and_handler_names() {
        let action = Action::builder("Cleave", ActionCategory::Attack)
            .tag("Melee")
            .tag("melee")
            .outcome_handler("OnKill")
            .base_value(6)
            .build();

        assert_eq!(action.tags(), ["melee".to_string()]);
        assert!(action.has_tag("MELEE"));
        assert_eq!(action.outcome_handlers(), ["onkill".to_string()]);
        assert!(action.routing().directive().is_none());
    }

    #[test]
    fn damaging_categories() {
        assert!(ActionCategory::Attack.deals_damage());
        assert!(ActionCategory::Spell.deals_damage());
        assert!(!ActionCategory::Heal.deals_damage());
        assert_eq!(
            "use_item".parse::<ActionCategory>(),
            Ok(ActionCategory::UseItem)
        );
    }
}
