//! Error types for Klaxon
//!
//! Each layer of the alert core fails in its own way: field writes are
//! rejected with [`ValidationError`], variants missing a required field fail
//! construction with [`ConfigurationError`], and sub-action failures surface as
//! [`OperationError`] until fault containment absorbs them. [`KlaxonError`]
//! unifies them for callers that do not care which layer failed.

use serde::{Deserialize, Serialize};

/// Rejected write to a validated field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ValidationError {
    /// Value is not shaped like `local@domain.tld`
    #[error("Invalid email: {value}")]
    Email {
        /// Rejected input
        value: String,
    },

    /// Value is not `+` followed by 10-15 digits
    #[error("Invalid phone number: {value}")]
    Phone {
        /// Rejected input
        value: String,
    },

    /// Value is not one of LOW, MEDIUM, HIGH, URGENT
    #[error("Invalid priority: {value}")]
    Priority {
        /// Rejected input
        value: String,
    },

    /// Pair is malformed or not strictly ordered
    #[error("Invalid time window: {reason}")]
    TimeWindow {
        /// What was wrong with the pair
        reason: String,
    },

    /// Required text field was empty
    #[error("Field '{field}' must not be empty")]
    Empty {
        /// Name of the empty field
        field: String,
    },
}

impl ValidationError {
    /// Create a time window error
    pub fn time_window(reason: impl Into<String>) -> Self {
        Self::TimeWindow {
            reason: reason.into(),
        }
    }

    /// Create an empty field error
    pub fn empty(field: impl Into<String>) -> Self {
        Self::Empty {
            field: field.into(),
        }
    }
}

/// Post-construction validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ConfigurationError {
    /// A declared required field is absent on the constructed instance
    #[error("{type_name} instance is missing required field: {field}")]
    MissingField {
        /// Variant type that failed validation
        type_name: String,
        /// First required field found missing
        field: String,
    },
}

impl ConfigurationError {
    /// Create a missing field error
    pub fn missing_field(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            type_name: type_name.into(),
            field: field.into(),
        }
    }
}

/// Failure raised inside an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum OperationError {
    /// A sub-action (alarm, speaker, notify) failed
    #[error("{action} failed: {reason}")]
    ActionFailed {
        /// Sub-action name
        action: String,
        /// Failure description
        reason: String,
    },

    /// The operation stopped before finishing for another reason
    #[error("Operation interrupted: {reason}")]
    Interrupted {
        /// Failure description
        reason: String,
    },
}

impl OperationError {
    /// Create a sub-action failure
    pub fn action_failed(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ActionFailed {
            action: action.into(),
            reason: reason.into(),
        }
    }

    /// Create an interruption failure
    pub fn interrupted(reason: impl Into<String>) -> Self {
        Self::Interrupted {
            reason: reason.into(),
        }
    }
}

/// Unified error type for Klaxon operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum KlaxonError {
    /// Field validation failed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Variant configuration failed
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Operation failed and was not contained
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        /// Error message describing what was not found
        message: String,
    },

    /// Configuration file or environment could not be loaded
    #[error("Config error: {message}")]
    Config {
        /// Error message describing the config issue
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl KlaxonError {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Standard Result type for Klaxon operations
pub type Result<T> = std::result::Result<T, KlaxonError>;

impl From<std::io::Error> for KlaxonError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(err.to_string()),
            _ => Self::internal(err.to_string()),
        }
    }
}
