use crate::action::Action;
use crate::dice::DiceRoller;

use super::directive::ComboDirective;

/// Where a combo goes after one action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutingResult {
    /// `false` ends the combo; `next_slot` is then meaningless.
    pub continue_combo: bool,
    /// 0-based slot to run next. May be `>= length`, meaning completion.
    pub next_slot: usize,
    /// Directive that produced this result, if any.
    pub directive: Option<ComboDirective>,
}

impl RoutingResult {
    fn advance_to(next_slot: usize, directive: Option<ComboDirective>) -> Self {
        Self {
            continue_combo: true,
            next_slot,
            directive,
        }
    }

    /// Whether the combo is over for a sequence of `length` slots.
    pub fn completes(&self, length: usize) -> bool {
        !self.continue_combo || self.next_slot >= length
    }
}

/// Stateless combo router.
///
/// The slot state belongs to the caller (see
/// [`ComboSequence`](super::ComboSequence)).
#[derive(Clone, Copy, Debug, Default)]
pub struct ComboRouter;

impl ComboRouter {
    pub fn new() -> Self {
        Self
    }

    /// Next slot after `action` ran at 0-based `current_slot`.
    ///
    /// `dice` is only consulted for [`ComboDirective::RandomAction`].
    pub fn route_next(
        &self,
        action: &Action,
        current_slot: usize,
        sequence_length: usize,
        dice: &mut dyn DiceRoller,
    ) -> RoutingResult {
        let directive = action.routing().active_at(current_slot);
        let step = current_slot.saturating_add(1);

        match directive {
            Some(ComboDirective::JumpToSlot(slot)) => RoutingResult::advance_to(
                slot.saturating_sub(1)
                    .min(sequence_length.saturating_sub(1)),
                directive,
            ),
            Some(ComboDirective::SkipNext) => {
                RoutingResult::advance_to(current_slot.saturating_add(2), directive)
            }
            Some(ComboDirective::RepeatPrevious) if current_slot > 0 => {
                RoutingResult::advance_to(current_slot - 1, directive)
            }
            // Nothing to repeat at the first slot.
            Some(ComboDirective::RepeatPrevious) => RoutingResult::advance_to(step, None),
            Some(ComboDirective::LoopToStart) => RoutingResult::advance_to(0, directive),
            Some(ComboDirective::StopEarly) => RoutingResult {
                continue_combo: false,
                next_slot: current_slot,
                directive,
            },
            Some(ComboDirective::DisableSlot) => RoutingResult::advance_to(step, directive),
            Some(ComboDirective::RandomAction) => {
                RoutingResult::advance_to(dice.index_below(sequence_length), directive)
            }
            None => RoutingResult::advance_to(step, None),
        }
    }
}
