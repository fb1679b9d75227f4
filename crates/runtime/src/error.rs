//! Error types surfaced by the runtime.
//!
//! Handler failures never escape a dispatch: the event channel and the
//! outcome registry log them and collect them into their reports.
use combat_core::{CombatError, ConfigError, ErrorSeverity};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Failure returned by an event subscriber or an outcome handler.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Failed(String),

    #[error("handler needs {0} but the context has none")]
    MissingContext(&'static str),
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

impl CombatError for HandlerError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Failed(_) => ErrorSeverity::Recoverable,
            Self::MissingContext(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Failed(_) => "HANDLER_FAILED",
            Self::MissingContext(_) => "HANDLER_MISSING_CONTEXT",
        }
    }
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    #[error("combo sequence has no actions")]
    EmptyCombo,
}

impl CombatError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidConfig(err) => err.severity(),
            Self::EmptyCombo => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(err) => err.error_code(),
            Self::EmptyCombo => "RUNTIME_EMPTY_COMBO",
        }
    }
}
