//! # LogWriter: tracing-backed log sink
//!
//! Maps shutdown events onto `tracing` levels:
//!
//! | Event               | Level |
//! |---------------------|-------|
//! | `ShutdownRequested` | info  |
//! | `NothingToClose`    | info  |
//! | `TaskClosed`        | info  |
//! | `TaskFailed`        | error |
//! | `AllClosed`         | info  |
//! | `ClosedWithErrors`  | warn  |
//!
//! ## Example output
//! ```text
//! INFO closer: [*] closer is starting to close tasks trigger="signal" tasks=3
//! INFO closer: [+] task complete task="stop http server"
//! ERROR closer: [-] task close error task="close db pool" label="task_timeout_local" err=...
//! WARN closer: [-] closer finished, with errors elapsed_ms=102
//! WARN closer: tasks failed to close failed="close db pool"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Debug, Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let task = e.task.as_deref().unwrap_or("unknown");
        match e.kind {
            EventKind::ShutdownRequested => {
                tracing::info!(
                    target: "closer",
                    trigger = e.trigger.map(|t| t.as_label()).unwrap_or("unknown"),
                    tasks = e.reason.as_deref().unwrap_or("0"),
                    "[*] closer is starting to close tasks"
                );
            }
            EventKind::NothingToClose => {
                tracing::info!(target: "closer", "[*] no tasks to close");
            }
            EventKind::TaskClosed => {
                tracing::info!(target: "closer", task, "[+] task complete");
            }
            EventKind::TaskFailed => {
                tracing::error!(
                    target: "closer",
                    task,
                    label = e.label.unwrap_or("unknown"),
                    timeout_ms = ?e.timeout_ms,
                    err = e.reason.as_deref().unwrap_or("unknown"),
                    "[-] task close error"
                );
            }
            EventKind::AllClosed => {
                tracing::info!(
                    target: "closer",
                    elapsed_ms = e.elapsed_ms.unwrap_or(0),
                    "[+] closer finished, all tasks closed"
                );
            }
            EventKind::ClosedWithErrors => {
                tracing::warn!(
                    target: "closer",
                    elapsed_ms = e.elapsed_ms.unwrap_or(0),
                    "[-] closer finished, with errors"
                );
                tracing::warn!(
                    target: "closer",
                    failed = e.failed.as_deref().unwrap_or(""),
                    "tasks failed to close"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
