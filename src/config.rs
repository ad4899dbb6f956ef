//! # Shutdown budgets.
//!
//! [`Config`] holds the two timing budgets of a shutdown run:
//! - `total`: wall-clock budget for the whole run (every task together);
//! - `per_task`: budget for one task's cleanup action.
//!
//! ## Sentinel values
//! - `total = 0s` → no global deadline
//! - `per_task = 0s` → no per-task deadline
//!
//! `per_task` is **not** required to be `<= total`. A task may be cut off by the
//! global deadline before its own budget elapses.
//!
//! ## Environment
//! [`Config::from_env`] reads:
//! - `CLOSER_TOTAL_DURATION` (e.g. `30s`, `1m 30s`)
//! - `CLOSER_FUNC_DURATION` (e.g. `5s`, `250ms`)
//!
//! A missing variable means unbounded. A negative value (leading `-`) is normalized
//! to unbounded.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use closer::Config;
//!
//! let cfg = Config::new(Duration::from_secs(30), Duration::from_secs(5));
//! assert_eq!(cfg.total_budget(), Some(Duration::from_secs(30)));
//!
//! let unbounded = Config::from_signed_millis(-1, 0);
//! assert_eq!(unbounded.total_budget(), None);
//! assert_eq!(unbounded.per_task_budget(), None);
//! ```

use std::time::Duration;

use crate::error::ConfigError;

/// Env variable holding the total (global) budget.
pub const TOTAL_DURATION_ENV: &str = "CLOSER_TOTAL_DURATION";
/// Env variable holding the per-task budget.
pub const FUNC_DURATION_ENV: &str = "CLOSER_FUNC_DURATION";

/// Timing budgets for a shutdown run.
///
/// ## Field semantics
/// - `total`: global budget (`0s` = unbounded)
/// - `per_task`: budget of a single cleanup action (`0s` = unbounded)
///
/// Prefer the helper accessors over checking the `0` sentinel by hand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Overall time allotted to every shutdown task together.
    pub total: Duration,
    /// Time allotted to a single task, nested inside the global budget.
    pub per_task: Duration,
}

impl Config {
    /// Creates a config from explicit budgets.
    pub fn new(total: Duration, per_task: Duration) -> Self {
        Self { total, per_task }
    }

    /// Creates a config from signed millisecond values.
    ///
    /// Negative values normalize to `0` (unbounded).
    pub fn from_signed_millis(total_ms: i64, per_task_ms: i64) -> Self {
        Self {
            total: Duration::from_millis(total_ms.max(0) as u64),
            per_task: Duration::from_millis(per_task_ms.max(0) as u64),
        }
    }

    /// Loads budgets from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads budgets through an arbitrary key lookup.
    ///
    /// [`Config::from_env`] is this function over `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let total = parse_budget(TOTAL_DURATION_ENV, lookup(TOTAL_DURATION_ENV))?;
        let per_task = parse_budget(FUNC_DURATION_ENV, lookup(FUNC_DURATION_ENV))?;
        Ok(Self { total, per_task })
    }

    /// Returns the global budget as an `Option`.
    ///
    /// - `None` → no global deadline
    /// - `Some(d)` → every task is cut off `d` after the run starts
    #[inline]
    pub fn total_budget(&self) -> Option<Duration> {
        if self.total == Duration::ZERO {
            None
        } else {
            Some(self.total)
        }
    }

    /// Returns the per-task budget as an `Option`.
    #[inline]
    pub fn per_task_budget(&self) -> Option<Duration> {
        if self.per_task == Duration::ZERO {
            None
        } else {
            Some(self.per_task)
        }
    }
}

fn parse_budget(var: &'static str, raw: Option<String>) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Duration::ZERO);
    };
    let value = raw.trim();
    if value.is_empty() || value == "0" {
        return Ok(Duration::ZERO);
    }
    if let Some(rest) = value.strip_prefix('-') {
        // Still validated: "-abc" is a typo, not a negative budget.
        humantime::parse_duration(rest.trim()).map_err(|e| ConfigError::InvalidDuration {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        })?;
        tracing::debug!(var, value, "negative budget normalized to unbounded");
        return Ok(Duration::ZERO);
    }

    humantime::parse_duration(value).map_err(|e| ConfigError::InvalidDuration {
        var,
        value: raw.clone(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_is_unbounded() {
        let cfg = Config::default();
        assert_eq!(cfg.total_budget(), None);
        assert_eq!(cfg.per_task_budget(), None);
    }

    #[test]
    fn test_negative_millis_normalize_to_unbounded() {
        let cfg = Config::from_signed_millis(-500, -1);
        assert_eq!(cfg, Config::default());

        let cfg = Config::from_signed_millis(1500, -1);
        assert_eq!(cfg.total_budget(), Some(Duration::from_millis(1500)));
        assert_eq!(cfg.per_task_budget(), None);
    }

    #[test]
    fn test_missing_env_means_unbounded() {
        let cfg = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_env_durations_parsed() {
        let cfg = Config::from_lookup(lookup(&[
            (TOTAL_DURATION_ENV, "1m 30s"),
            (FUNC_DURATION_ENV, "250ms"),
        ]))
        .unwrap();
        assert_eq!(cfg.total, Duration::from_secs(90));
        assert_eq!(cfg.per_task, Duration::from_millis(250));
    }

    #[test]
    fn test_negative_env_duration_is_unbounded() {
        let cfg = Config::from_lookup(lookup(&[(TOTAL_DURATION_ENV, "-5s")])).unwrap();
        assert_eq!(cfg.total_budget(), None);
    }

    #[test]
    fn test_bad_env_duration_is_reported() {
        let err = Config::from_lookup(lookup(&[(FUNC_DURATION_ENV, "soon")])).unwrap_err();
        match err {
            ConfigError::InvalidDuration { var, value, .. } => {
                assert_eq!(var, FUNC_DURATION_ENV);
                assert_eq!(value, "soon");
            }
        }
        assert_eq!(
            Config::from_lookup(lookup(&[(TOTAL_DURATION_ENV, "-later")]))
                .unwrap_err()
                .as_label(),
            "config_invalid_duration"
        );
    }
}
