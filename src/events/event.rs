//! # Events emitted during a shutdown run.
//!
//! The [`EventKind`] enum classifies what happened; [`Event`] carries the metadata
//! (task name, failure reason, budgets, elapsed time).
//!
//! A run emits, in order:
//! 1. `ShutdownRequested`
//! 2. `NothingToClose` **or** one `TaskClosed`/`TaskFailed` per task (completion order)
//! 3. `AllClosed` or `ClosedWithErrors` (absent after `NothingToClose`)
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use closer::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_task("close db pool")
//!     .with_reason("connection reset")
//!     .with_timeout(Duration::from_secs(5));
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.task.as_deref(), Some("close db pool"));
//! assert_eq!(ev.timeout_ms, Some(5000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::error::CloseError;
use crate::report::Trigger;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of shutdown events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A shutdown run started.
    ///
    /// Sets:
    /// - `trigger`: what started it
    /// - `reason`: number of tasks to close
    ShutdownRequested,

    /// The run started with no registered tasks.
    NothingToClose,

    /// A task closed cleanly.
    ///
    /// Sets:
    /// - `task`: task name
    TaskClosed,

    /// A task did not close cleanly (error, timeout or panic).
    ///
    /// Sets:
    /// - `task`: task name
    /// - `label`: stable error label (e.g. `task_timeout_local`)
    /// - `reason`: error message
    /// - `timeout_ms`: exceeded budget, for timeouts
    TaskFailed,

    /// Every task closed cleanly.
    ///
    /// Sets:
    /// - `elapsed_ms`: run duration
    AllClosed,

    /// The run finished and at least one task failed.
    ///
    /// Sets:
    /// - `elapsed_ms`: run duration
    /// - `failed`: failed task names, comma separated
    ClosedWithErrors,
}

/// Shutdown event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the task, if applicable.
    pub task: Option<Arc<str>>,
    /// Human-readable reason.
    pub reason: Option<Arc<str>>,
    /// Stable snake_case error label.
    pub label: Option<&'static str>,
    /// Exceeded budget in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Run duration in milliseconds.
    pub elapsed_ms: Option<u64>,
    /// Failed task names, comma separated.
    pub failed: Option<Arc<str>>,
    /// What started the run.
    pub trigger: Option<Trigger>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            reason: None,
            label: None,
            timeout_ms: None,
            elapsed_ms: None,
            failed: None,
            trigger: None,
        }
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a budget (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        self.timeout_ms = Some(millis(d));
        self
    }

    /// Attaches the run duration (stored as milliseconds).
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        self.elapsed_ms = Some(millis(d));
        self
    }

    /// Attaches the trigger.
    #[inline]
    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Attaches the failed task names.
    #[inline]
    pub fn with_failed(mut self, names: &[&str]) -> Self {
        self.failed = Some(names.join(", ").into());
        self
    }

    /// Fills `label`, `reason` and `timeout_ms` from a close error.
    pub fn with_error(mut self, err: &CloseError) -> Self {
        self.label = Some(err.as_label());
        self.reason = Some(err.to_string().into());
        match err {
            CloseError::LocalTimeout { timeout } | CloseError::GlobalTimeout { timeout } => {
                self.with_timeout(*timeout)
            }
            _ => self,
        }
    }
}

fn millis(d: Duration) -> u64 {
    d.as_millis().min(u128::from(u64::MAX)) as u64
}
