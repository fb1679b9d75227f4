//! Registry mapping outcome identifiers to handlers.

use std::collections::HashMap;
use std::sync::Arc;

use combat_core::{Action, CombatConfig};
use tracing::{debug, error, trace};

use super::{
    ComboEndHandler, HandlerCriticality, HealthThresholdHandler, OnKillHandler, OutcomeContext,
    OutcomeHandler, StatusEffectHandler,
};
use crate::error::HandlerError;

/// Result of one [`OutcomeHandlerRegistry::process_outcomes`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeReport {
    /// Handlers that ran and returned `Ok`.
    pub invoked: Vec<String>,
    /// Identifiers listed on the action with no registered handler.
    pub missing: Vec<String>,
    /// Handlers that ran and failed.
    pub failures: Vec<(String, HandlerError)>,
}

impl OutcomeReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Name-keyed table of outcome handlers.
///
/// Keys are lowercase; lookups are case-insensitive.
#[derive(Default)]
pub struct OutcomeHandlerRegistry {
    handlers: HashMap<String, Arc<dyn OutcomeHandler>>,
}

impl OutcomeHandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in handlers: `onkill`,
    /// `healththreshold`, `comboend` and one [`StatusEffectHandler`] per
    /// [`StatusEffectHandler::BUILT_IN`] status.
    pub fn with_defaults(config: &CombatConfig) -> Self {
        let mut registry = Self::new();
        registry.register(OnKillHandler);
        registry.register(HealthThresholdHandler::new(config.health_threshold_percent));
        registry.register(ComboEndHandler);
        for status in StatusEffectHandler::BUILT_IN {
            registry.register(StatusEffectHandler::new(status));
        }
        registry
    }

    /// Registers `handler` under its own name, returning any handler it
    /// replaced.
    pub fn register<H>(&mut self, handler: H) -> Option<Arc<dyn OutcomeHandler>>
    where
        H: OutcomeHandler + 'static,
    {
        let name = handler.name();
        self.register_as(name, Arc::new(handler))
    }

    /// Registers a shared handler under an explicit identifier.
    pub fn register_as(
        &mut self,
        name: &str,
        handler: Arc<dyn OutcomeHandler>,
    ) -> Option<Arc<dyn OutcomeHandler>> {
        self.handlers.insert(name.to_lowercase(), handler)
    }

    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn OutcomeHandler>> {
        self.handlers.remove(&name.to_lowercase())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn OutcomeHandler>> {
        self.handlers.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered identifiers, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Runs every handler `action` lists, in list order.
    ///
    /// Unknown identifiers are skipped. A failing handler is logged per its
    /// criticality and recorded; the rest still run.
    pub fn process_outcomes(&self, action: &Action, ctx: &OutcomeContext<'_>) -> OutcomeReport {
        let mut report = OutcomeReport::default();

        for name in action.outcome_handlers() {
            let Some(handler) = self.get(name) else {
                trace!(
                    target: "combat::outcomes",
                    handler = %name,
                    action = action.name(),
                    "no handler registered"
                );
                report.missing.push(name.clone());
                continue;
            };

            match handler.handle_outcome(ctx) {
                Ok(()) => report.invoked.push(name.clone()),
                Err(err) => {
                    Self::log_failure(handler.as_ref(), &err);
                    report.failures.push((name.clone(), err));
                }
            }
        }

        report
    }

    fn log_failure(handler: &dyn OutcomeHandler, err: &HandlerError) {
        let criticality = handler.criticality();
        match criticality {
            HandlerCriticality::Important => error!(
                target: "combat::outcomes",
                handler = handler.name(),
                criticality = criticality.as_str(),
                error = %err,
                "outcome handler failed, continuing"
            ),
            HandlerCriticality::Optional => debug!(
                target: "combat::outcomes",
                handler = handler.name(),
                criticality = criticality.as_str(),
                error = %err,
                "optional outcome handler failed"
            ),
        }
    }
}

impl std::fmt::Debug for OutcomeHandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutcomeHandlerRegistry")
            .field("handlers", &self.names())
            .finish()
    }
}
