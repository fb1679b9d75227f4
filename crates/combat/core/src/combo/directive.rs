use crate::error::ConfigError;

/// Single combo-flow instruction carried by an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ComboDirective {
    /// Continue at this 1-based slot.
    JumpToSlot(usize),
    SkipNext,
    RepeatPrevious,
    LoopToStart,
    StopEarly,
    /// Exclude the current slot from later selection.
    DisableSlot,
    RandomAction,
}

impl ComboDirective {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::JumpToSlot(0) => Err(ConfigError::ZeroJumpSlot),
            _ => Ok(()),
        }
    }
}

/// Combo routing of one action: at most one directive, optionally limited
/// to a single slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "ComboRoutingFlags", into = "ComboRoutingFlags")
)]
pub struct ComboRouting {
    directive: Option<ComboDirective>,
    trigger_only_in_slot: usize,
}

impl ComboRouting {
    /// No directive: the combo advances one slot.
    pub const fn none() -> Self {
        Self {
            directive: None,
            trigger_only_in_slot: 0,
        }
    }

    pub fn new(directive: ComboDirective) -> Result<Self, ConfigError> {
        directive.validate()?;
        Ok(Self {
            directive: Some(directive),
            trigger_only_in_slot: 0,
        })
    }

    /// Restricts the directive to a 1-based slot. `0` means every slot.
    pub fn only_in_slot(mut self, slot: usize) -> Self {
        self.trigger_only_in_slot = slot;
        self
    }

    pub fn directive(&self) -> Option<ComboDirective> {
        self.directive
    }

    pub fn trigger_only_in_slot(&self) -> usize {
        self.trigger_only_in_slot
    }

    /// Directive in effect when the action runs at 0-based `slot`.
    pub fn active_at(&self, slot: usize) -> Option<ComboDirective> {
        match self.trigger_only_in_slot {
            0 => self.directive,
            only if only == slot + 1 => self.directive,
            _ => None,
        }
    }
}

/// Flat flag form of a routing, as authored in action data.
///
/// Conversion into [`ComboRouting`] enforces the one-directive invariant;
/// [`ComboRoutingFlags::to_routing_lenient`] instead picks the first active
/// flag in fixed priority order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ComboRoutingFlags {
    /// 1-based target slot; `0` disables the jump.
    pub jump_to_slot: usize,
    pub skip_next: bool,
    pub repeat_previous: bool,
    pub loop_to_start: bool,
    pub stop_early: bool,
    pub random_action: bool,
    pub disable_slot: bool,
    pub trigger_only_in_slot: usize,
}

impl ComboRoutingFlags {
    /// Active directives in priority order.
    fn active(&self) -> impl Iterator<Item = ComboDirective> {
        [
            (self.jump_to_slot > 0).then_some(ComboDirective::JumpToSlot(self.jump_to_slot)),
            self.skip_next.then_some(ComboDirective::SkipNext),
            self.repeat_previous.then_some(ComboDirective::RepeatPrevious),
            self.loop_to_start.then_some(ComboDirective::LoopToStart),
            self.stop_early.then_some(ComboDirective::StopEarly),
            self.random_action.then_some(ComboDirective::RandomAction),
            self.disable_slot.then_some(ComboDirective::DisableSlot),
        ]
        .into_iter()
        .flatten()
    }

    /// First active directive wins. For data that skipped validation.
    pub fn to_routing_lenient(&self) -> ComboRouting {
        ComboRouting {
            directive: self.active().next(),
            trigger_only_in_slot: self.trigger_only_in_slot,
        }
    }
}

impl TryFrom<ComboRoutingFlags> for ComboRouting {
    type Error = ConfigError;

    fn try_from(flags: ComboRoutingFlags) -> Result<Self, Self::Error> {
        let count = flags.active().count();
        if count > 1 {
            return Err(ConfigError::ConflictingComboDirectives(count));
        }
        Ok(flags.to_routing_lenient())
    }
}

impl From<ComboRouting> for ComboRoutingFlags {
    fn from(routing: ComboRouting) -> Self {
        let mut flags = Self {
            trigger_only_in_slot: routing.trigger_only_in_slot,
            ..Self::default()
        };
        match routing.directive {
            None => {}
            Some(ComboDirective::JumpToSlot(slot)) => flags.jump_to_slot = slot,
            Some(ComboDirective::SkipNext) => flags.skip_next = true,
            Some(ComboDirective::RepeatPrevious) => flags.repeat_previous = true,
            Some(ComboDirective::LoopToStart) => flags.loop_to_start = true,
            Some(ComboDirective::StopEarly) => flags.stop_early = true,
            Some(ComboDirective::DisableSlot) => flags.disable_slot = true,
            Some(ComboDirective::RandomAction) => flags.random_action = true,
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_flags_are_rejected() {
        let flags = ComboRoutingFlags {
            skip_next: true,
            loop_to_start: true,
            ..ComboRoutingFlags::default()
        };
        assert_eq!(
            ComboRouting::try_from(flags),
            Err(ConfigError::ConflictingComboDirectives(2))
        );
    }

    #[test]
    fn disable_slot_counts_toward_the_limit() {
        let flags = ComboRoutingFlags {
            jump_to_slot: 2,
            disable_slot: true,
            ..ComboRoutingFlags::default()
        };
        assert!(ComboRouting::try_from(flags).is_err());
    }

    #[test]
    fn lenient_conversion_uses_priority_order() {
        let flags = ComboRoutingFlags {
            stop_early: true,
            skip_next: true,
            disable_slot: true,
            ..ComboRoutingFlags::default()
        };
        assert_eq!(
            flags.to_routing_lenient().directive(),
            Some(ComboDirective::SkipNext)
        );

        let flags = ComboRoutingFlags {
            random_action: true,
            disable_slot: true,
            ..ComboRoutingFlags::default()
        };
        assert_eq!(
            flags.to_routing_lenient().directive(),
            Some(ComboDirective::RandomAction)
        );
    }

    #[test]
    fn zero_jump_is_invalid() {
        assert_eq!(
            ComboRouting::new(ComboDirective::JumpToSlot(0)),
            Err(ConfigError::ZeroJumpSlot)
        );
    }

    #[test]
    fn slot_restriction() {
        let routing = ComboRouting::new(ComboDirective::StopEarly)
            .unwrap()
            .only_in_slot(3);
        assert_eq!(routing.active_at(2), Some(ComboDirective::StopEarly));
        assert_eq!(routing.active_at(0), None);
        assert_eq!(
            ComboRouting::new(ComboDirective::LoopToStart).unwrap().active_at(7),
            Some(ComboDirective::LoopToStart)
        );
    }

    #[test]
    fn flags_round_trip_through_routing() {
        let routing = ComboRouting::new(ComboDirective::JumpToSlot(4))
            .unwrap()
            .only_in_slot(2);
        let flags = ComboRoutingFlags::from(routing);
        assert_eq!(flags.jump_to_slot, 4);
        assert_eq!(ComboRouting::try_from(flags), Ok(routing));
    }
}
