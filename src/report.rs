//! # Shutdown outcomes and the aggregate report.
//!
//! - [`Outcome`] is produced exactly once per task per shutdown run.
//! - [`ShutdownReport`] aggregates all outcomes of the single run.
//!
//! Tasks complete in arbitrary order. The report is built in **registration**
//! order, so for a fixed set of per-task results its content does not depend on
//! timing.

use std::time::Duration;

use crate::error::CloseError;

/// What started the shutdown run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// An OS termination signal (SIGINT/SIGTERM/SIGQUIT or Ctrl-C).
    Signal,
    /// An explicit [`Closer::close`](crate::Closer::close) call.
    Explicit,
}

impl Trigger {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Trigger::Signal => "signal",
            Trigger::Explicit => "explicit",
        }
    }
}

/// Bounded result of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Registration index (position in the task list).
    pub index: usize,
    /// Task label.
    pub name: String,
    /// `Ok` on a clean close, otherwise why it did not close.
    pub result: Result<(), CloseError>,
}

impl Outcome {
    /// True if the task closed cleanly.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// End-of-shutdown summary.
#[derive(Debug, Clone)]
pub struct ShutdownReport {
    trigger: Trigger,
    outcomes: Vec<Outcome>,
    elapsed: Duration,
}

impl ShutdownReport {
    /// Builds the report, ordering outcomes by registration index.
    pub(crate) fn new(trigger: Trigger, mut outcomes: Vec<Outcome>, elapsed: Duration) -> Self {
        outcomes.sort_by_key(|o| o.index);
        Self {
            trigger,
            outcomes,
            elapsed,
        }
    }

    /// Which trigger started the run.
    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    /// Wall-clock duration of the run.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Per-task outcomes in registration order.
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Names of tasks that did not close cleanly, in registration order.
    ///
    /// Duplicate names appear once per failed task.
    pub fn failed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_ok())
            .map(|o| o.name.as_str())
            .collect()
    }

    /// True if no task failed (including the nothing-to-close case).
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(Outcome::is_ok)
    }

    /// True if the run started with zero registered tasks.
    pub fn nothing_to_close(&self) -> bool {
        self.outcomes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(index: usize, name: &str, ok: bool) -> Outcome {
        Outcome {
            index,
            name: name.to_string(),
            result: if ok {
                Ok(())
            } else {
                Err(CloseError::failed("boom"))
            },
        }
    }

    #[test]
    fn test_failed_names_follow_registration_order() {
        let report = ShutdownReport::new(
            Trigger::Explicit,
            vec![
                outcome(2, "cache", false),
                outcome(0, "db", false),
                outcome(1, "http", true),
            ],
            Duration::from_millis(5),
        );

        assert_eq!(report.failed(), vec!["db", "cache"]);
        assert!(!report.is_success());
        assert_eq!(report.outcomes()[1].name, "http");
    }

    #[test]
    fn test_duplicate_names_reported_independently() {
        let report = ShutdownReport::new(
            Trigger::Signal,
            vec![outcome(0, "worker", false), outcome(1, "worker", false)],
            Duration::ZERO,
        );
        assert_eq!(report.failed(), vec!["worker", "worker"]);
    }

    #[test]
    fn test_empty_report_is_success() {
        let report = ShutdownReport::new(Trigger::Explicit, Vec::new(), Duration::ZERO);
        assert!(report.nothing_to_close());
        assert!(report.is_success());
        assert!(report.failed().is_empty());
    }
}
