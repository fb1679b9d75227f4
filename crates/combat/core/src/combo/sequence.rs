use std::collections::BTreeSet;
use std::sync::Arc;

use crate::action::Action;
use crate::actor::HasActionPool;
use crate::event::ComboStep;

use super::directive::ComboDirective;
use super::router::RoutingResult;

/// Outcome of advancing a combo sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComboAdvance {
    /// The combo continues at this 0-based slot.
    Next(usize),
    Completed,
}

/// One actor's ordered combo and its progress.
///
/// Honors the slot-level parts of routing the router leaves to the caller:
/// disabled slots are skipped, and running off the end completes the combo.
///
/// A sequential step (no directive, skip-next, disable-slot) that lands on a
/// disabled slot moves forward to the next enabled one. A directive that
/// targets a slot (jump, repeat, loop, random) wraps around instead, so it
/// only ends the combo when every slot is disabled.
#[derive(Clone, Debug)]
pub struct ComboSequence {
    actions: Vec<Arc<Action>>,
    current: usize,
    disabled: BTreeSet<usize>,
    completed: bool,
}

impl ComboSequence {
    pub fn new(actions: Vec<Arc<Action>>) -> Self {
        let completed = actions.is_empty();
        Self {
            actions,
            current: 0,
            disabled: BTreeSet::new(),
            completed,
        }
    }

    /// Sequence over an actor's action pool, in pool order.
    pub fn from_pool(pool: &dyn HasActionPool) -> Self {
        Self::new(pool.action_pool().to_vec())
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn current_slot(&self) -> usize {
        self.current
    }

    /// Action at the current slot; `None` once the combo is complete.
    pub fn current_action(&self) -> Option<&Arc<Action>> {
        if self.completed {
            return None;
        }
        self.actions.get(self.current)
    }

    /// 1-based position of the current slot, for events.
    pub fn step(&self) -> ComboStep {
        ComboStep::from_slot(self.current, self.len())
    }

    pub fn is_disabled(&self, slot: usize) -> bool {
        self.disabled.contains(&slot)
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Applies a routing result computed for the current slot.
    pub fn advance(&mut self, routing: &RoutingResult) -> ComboAdvance {
        if self.completed {
            return ComboAdvance::Completed;
        }
        if routing.directive == Some(ComboDirective::DisableSlot) {
            self.disabled.insert(self.current);
        }
        if !routing.continue_combo {
            return self.complete();
        }

        if routing.next_slot >= self.len() {
            return self.complete();
        }

        let targeted = matches!(
            routing.directive,
            Some(
                ComboDirective::JumpToSlot(_)
                    | ComboDirective::RepeatPrevious
                    | ComboDirective::LoopToStart
                    | ComboDirective::RandomAction
            )
        );
        match self.next_enabled(routing.next_slot, targeted) {
            Some(slot) => {
                self.current = slot;
                ComboAdvance::Next(slot)
            }
            None => self.complete(),
        }
    }

    /// Back to the first slot with every slot enabled.
    pub fn reset(&mut self) {
        self.current = 0;
        self.disabled.clear();
        self.completed = self.actions.is_empty();
    }

    /// First enabled slot at or after `from`, wrapping to slot 0 if `wrap`.
    fn next_enabled(&self, from: usize, wrap: bool) -> Option<usize> {
        let len = self.len();
        let span = if wrap { len } else { len - from };
        (0..span)
            .map(|offset| (from + offset) % len)
            .find(|slot| !self.disabled.contains(slot))
    }

    fn complete(&mut self) -> ComboAdvance {
        self.completed = true;
        ComboAdvance::Completed
    }
}
