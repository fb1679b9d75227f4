//! Common error infrastructure for combat-core.
//!
//! Only one class of error is ever raised by the rules themselves: invalid
//! configuration, rejected when a roll model, combo routing or combat
//! configuration is constructed or mutated. Missing optional data during
//! evaluation is never an error (the condition is simply unsatisfied), and
//! handler failures are absorbed by the runtime dispatchers.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the current operation failed but play continues
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistency
/// - **Fatal**: invalid setup; the engine must not start with it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the failing unit is skipped and play continues.
    ///
    /// Examples: an event subscriber or outcome handler failed
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - configuration is invalid and cannot be used.
    ///
    /// Examples: `min > max`, reroll chance set while reroll is disabled
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all combat errors.
///
/// Provides a uniform interface for error classification across crates.
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Invalid configuration detected at construction or mutation time.
///
/// Every variant names the violated invariant and carries the offending value.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("multiplier must be a non-negative number, got {0}")]
    InvalidMultiplier(f64),

    #[error("{field} must be between 1 and 20, got {value}")]
    OutOfDieRange { field: &'static str, value: i32 },

    #[error("min ({min}) cannot be greater than max ({max})")]
    MinExceedsMax { min: i32, max: i32 },

    #[error("reroll chance must be between 0.0 and 1.0, got {0}")]
    RerollChanceOutOfRange(f64),

    #[error("reroll chance {0} is set but reroll is disabled")]
    RerollChanceWithoutReroll(f64),

    #[error("{field} must be 0 (use default) or between 1 and 20, got {value}")]
    ThresholdOverrideOutOfRange { field: &'static str, value: i32 },

    #[error("multiple dice count must be at least 1, got {0}")]
    DiceCountTooLow(u32),

    #[error("unknown multiple dice mode '{0}'")]
    UnknownDiceMode(String),

    #[error("jump-to-slot must be a positive slot number")]
    ZeroJumpSlot,

    #[error("only one combo routing directive can be active at a time, found {0}")]
    ConflictingComboDirectives(usize),

    #[error(
        "default thresholds must satisfy critical miss < hit <= combo <= critical hit, got {critical_miss}/{hit}/{combo}/{critical_hit}"
    )]
    UnorderedThresholds {
        critical_miss: i32,
        hit: i32,
        combo: i32,
        critical_hit: i32,
    },

    #[error("max explosions must be between 1 and {max}, got {value}")]
    ExplosionLimitOutOfRange { value: u32, max: u32 },

    #[error("health threshold percent must be between 0 and 100, got {0}")]
    HealthPercentOutOfRange(u32),
}

impl CombatError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidMultiplier(_) => "CONFIG_INVALID_MULTIPLIER",
            Self::OutOfDieRange { .. } => "CONFIG_OUT_OF_DIE_RANGE",
            Self::MinExceedsMax { .. } => "CONFIG_MIN_EXCEEDS_MAX",
            Self::RerollChanceOutOfRange(_) => "CONFIG_REROLL_CHANCE_RANGE",
            Self::RerollChanceWithoutReroll(_) => "CONFIG_REROLL_DISABLED",
            Self::ThresholdOverrideOutOfRange { .. } => "CONFIG_THRESHOLD_OVERRIDE",
            Self::DiceCountTooLow(_) => "CONFIG_DICE_COUNT",
            Self::UnknownDiceMode(_) => "CONFIG_DICE_MODE",
            Self::ZeroJumpSlot => "CONFIG_ZERO_JUMP_SLOT",
            Self::ConflictingComboDirectives(_) => "CONFIG_CONFLICTING_DIRECTIVES",
            Self::UnorderedThresholds { .. } => "CONFIG_UNORDERED_THRESHOLDS",
            Self::ExplosionLimitOutOfRange { .. } => "CONFIG_EXPLOSION_LIMIT",
            Self::HealthPercentOutOfRange(_) => "CONFIG_HEALTH_PERCENT",
        }
    }
}
