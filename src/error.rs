//! Error types used by the closer and by cleanup actions.
//!
//! This module defines three enums:
//!
//! - [`CloseError`]: why one task did not close cleanly (its outcome error).
//! - [`RegisterError`]: a registration the registry refused.
//! - [`ConfigError`]: budgets that could not be loaded.
//!
//! Each provides `as_label` (stable snake_case) for logs/metrics.

use std::fmt::Display;
use std::time::Duration;
use thiserror::Error;

/// # Outcome errors of a single cleanup task.
///
/// Exactly one of these (or success) is produced per task per shutdown run.
/// A failure of one task never affects any other task.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CloseError {
    /// The cleanup action itself returned an error.
    #[error("close failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// The per-task deadline elapsed before the action returned.
    #[error("timeout exceeded, max closing task duration: {timeout:?}")]
    LocalTimeout {
        /// The per-task budget that was exceeded.
        timeout: Duration,
    },

    /// The global deadline elapsed before the action returned.
    #[error("timeout exceeded, max total closing duration: {timeout:?}")]
    GlobalTimeout {
        /// The total budget that was exceeded.
        timeout: Duration,
    },

    /// The cleanup action panicked.
    #[error("close panicked: {info}")]
    Panicked {
        /// Panic payload, if it was a string.
        info: String,
    },
}

impl CloseError {
    /// Wraps any displayable error as [`CloseError::Failed`].
    ///
    /// # Example
    /// ```
    /// use closer::CloseError;
    ///
    /// let err = CloseError::failed("connection reset");
    /// assert_eq!(err.to_string(), "close failed: connection reset");
    /// ```
    pub fn failed(error: impl Display) -> Self {
        CloseError::Failed {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use closer::CloseError;
    /// use std::time::Duration;
    ///
    /// let err = CloseError::LocalTimeout { timeout: Duration::from_millis(100) };
    /// assert_eq!(err.as_label(), "task_timeout_local");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CloseError::Failed { .. } => "task_failed",
            CloseError::LocalTimeout { .. } => "task_timeout_local",
            CloseError::GlobalTimeout { .. } => "task_timeout_global",
            CloseError::Panicked { .. } => "task_panicked",
        }
    }

    /// True for either deadline variant.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            CloseError::LocalTimeout { .. } | CloseError::GlobalTimeout { .. }
        )
    }
}

/// # Registration refused by the registry.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    /// Shutdown already began; the task list is closed for writes.
    #[error("closer is shutting down; task {name:?} was not registered")]
    Closing {
        /// Name of the rejected task.
        name: String,
    },
}

impl RegisterError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RegisterError::Closing { .. } => "register_closing",
        }
    }
}

/// # Budget configuration errors.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An env variable held something that is not a duration.
    #[error("env variable {var:?} bad format: {value:?} ({reason})")]
    InvalidDuration {
        /// Variable name.
        var: &'static str,
        /// Raw value as found.
        value: String,
        /// Parser message.
        reason: String,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::InvalidDuration { .. } => "config_invalid_duration",
        }
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
