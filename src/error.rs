//! Error types for the decision simulation engine.
//!
//! All errors are strongly typed using thiserror. Construction-time problems
//! surface as [`ValidationError`] and are fatal to engine creation; runtime
//! command rejections surface as [`ExecutionError`] and are recoverable.

use thiserror::Error;

/// Validation errors raised while building a scenario or engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Option '{option_label}' of decision '{decision_id}' references unknown dimension '{dimension}'")]
    UnknownDimension {
        decision_id: String,
        option_label: String,
        dimension: String,
    },

    #[error("Decision id '{id}' is declared more than once")]
    DuplicateDecisionId {
        id: String,
    },

    #[error("Scenario must contain at least one decision")]
    EmptyScenario,

    #[error("Scenario must declare at least one dimension")]
    NoDimensions,

    #[error("Dimension '{name}' is declared more than once")]
    DuplicateDimension {
        name: String,
    },

    #[error("Field '{field}' has invalid identifier '{value}'")]
    InvalidIdentifier {
        field: String,
        value: String,
    },

    #[error("Decision '{decision_id}' declares option '{label}' more than once")]
    DuplicateOptionLabel {
        decision_id: String,
        label: String,
    },

    #[error("Decision '{decision_id}' has no options")]
    DecisionWithoutOptions {
        decision_id: String,
    },

    #[error("Shock event id '{id}' collides with another step id")]
    DuplicateShockId {
        id: String,
    },

    #[error("Required field '{field}' is missing")]
    MissingField {
        field: String,
    },

    #[error("Field '{field}' exceeds maximum length of {max_length}")]
    FieldTooLong {
        field: String,
        max_length: usize,
    },

    #[error("Invalid engine configuration: {reason}")]
    InvalidConfig {
        reason: String,
    },
}

/// Execution errors returned by session commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("Invalid choice '{label}' for decision '{decision_id}': {reason}")]
    InvalidChoice {
        decision_id: String,
        label: String,
        reason: String,
    },

    #[error("Command '{command}' is not accepted in state {state}")]
    InvalidStateTransition {
        state: String,
        command: String,
    },

    #[error("Choosing '{label}' at decision '{decision_id}' would overflow the '{dimension}' score")]
    ScoreOverflow {
        decision_id: String,
        label: String,
        dimension: String,
    },

    #[error("Session was created for scenario {actual}, engine runs scenario {expected}")]
    ScenarioMismatch {
        expected: String,
        actual: String,
    },
}

/// Top-level error type for the crate.
#[derive(Debug, Error)]
pub enum TradeoffError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl TradeoffError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an execution error.
    #[must_use]
    pub const fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }

    /// Returns true if the caller can recover by re-prompting or re-syncing.
    ///
    /// Only command rejections are recoverable; a scenario that failed
    /// validation has to be fixed before an engine can exist.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Execution(e) => !matches!(e, ExecutionError::ScenarioMismatch { .. }),
            Self::Validation(_) | Self::Serialization { .. } | Self::Internal { .. } => false,
        }
    }
}

/// Result type alias for engine operations.
pub type TradeoffResult<T> = Result<T, TradeoffError>;
