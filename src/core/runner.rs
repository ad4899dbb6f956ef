//! # Per-task supervisor: one bounded outcome for one task.
//!
//! Runs a task's cleanup action on its own tokio task and races it against the
//! per-task deadline and the shared global token.
//!
//! ## Race
//! ```text
//! select (biased) {
//!   action returned     ──► Outcome { result: action's own result }
//!   global token fired  ──► Outcome { result: GlobalTimeout }
//!   per-task deadline   ──► Outcome { result: LocalTimeout }
//! }
//! ```
//!
//! ## Rules
//! - Always produces **exactly one** [`Outcome`].
//! - A hung action never delays the outcome: the action runs on its own task.
//! - On timeout the action's child token is cancelled and its join handle is
//!   dropped (detached, not aborted); a late result is never observed.
//! - A panicking action yields [`CloseError::Panicked`].

use std::future;
use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::{
    error::{CloseError, panic_message},
    report::Outcome,
    tasks::{CloseCtx, TaskRef},
};

/// Budgets shared by every supervisor of one run.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Budgets {
    /// Per-task budget (`None` = unbounded).
    pub per_task: Option<Duration>,
    /// Total budget, reported in `GlobalTimeout`.
    pub total: Option<Duration>,
    /// Instant at which `global` is cancelled, if bounded.
    pub global_deadline: Option<Instant>,
}

/// Supervises one task until it produces its [`Outcome`].
pub(crate) async fn supervise(
    index: usize,
    task: TaskRef,
    global: CancellationToken,
    budgets: Budgets,
) -> Outcome {
    let name = task.name().to_string();
    let local_deadline = budgets.per_task.map(|d| Instant::now() + d);

    let child = global.child_token();
    let ctx = CloseCtx::new(child.clone(), earliest(local_deadline, budgets.global_deadline));
    let mut action = tokio::spawn(async move { task.close(ctx).await });

    let local_expiry = async {
        match local_deadline {
            Some(at) => time::sleep_until(at).await,
            None => future::pending().await,
        }
    };

    let result = tokio::select! {
        biased;
        joined = &mut action => match joined {
            Ok(res) => res,
            Err(je) if je.is_panic() => Err(CloseError::Panicked {
                info: panic_message(je.into_panic().as_ref()),
            }),
            Err(je) => Err(CloseError::failed(je)),
        },
        _ = global.cancelled() => Err(CloseError::GlobalTimeout {
            timeout: budgets.total.unwrap_or_default(),
        }),
        _ = local_expiry => Err(CloseError::LocalTimeout {
            timeout: budgets.per_task.unwrap_or_default(),
        }),
    };

    if matches!(&result, Err(e) if e.is_timeout()) {
        child.cancel();
        tracing::debug!(task = %name, "close action abandoned");
    }

    Outcome {
        index,
        name,
        result,
    }
}

fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskFn;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn budgets(per_task_ms: u64) -> Budgets {
        Budgets {
            per_task: (per_task_ms > 0).then(|| Duration::from_millis(per_task_ms)),
            total: None,
            global_deadline: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_action_result_passes_through() {
        let ok: TaskRef = TaskFn::arc("ok", |_ctx: CloseCtx| async { Ok::<_, CloseError>(()) });
        let out = supervise(0, ok, CancellationToken::new(), budgets(0)).await;
        assert_eq!(out.result, Ok(()));

        let bad: TaskRef = TaskFn::arc("bad", |_ctx: CloseCtx| async {
            Err::<(), _>(CloseError::failed("refused"))
        });
        let out = supervise(3, bad, CancellationToken::new(), budgets(100)).await;
        assert_eq!(out.index, 3);
        assert_eq!(out.name, "bad");
        assert_eq!(out.result, Err(CloseError::failed("refused")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_action_hits_local_deadline() {
        let hung: TaskRef = TaskFn::arc("hung", |_ctx: CloseCtx| async {
            future::pending::<()>().await;
            Ok::<_, CloseError>(())
        });

        let start = Instant::now();
        let out = supervise(0, hung, CancellationToken::new(), budgets(100)).await;
        assert_eq!(
            out.result,
            Err(CloseError::LocalTimeout {
                timeout: Duration::from_millis(100)
            })
        );
        assert_eq!(start.elapsed(), Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_global_token_wins_over_longer_local_budget() {
        let slow: TaskRef = TaskFn::arc("slow", |_ctx: CloseCtx| async {
            time::sleep(Duration::from_secs(5)).await;
            Ok::<_, CloseError>(())
        });
        let global = CancellationToken::new();
        let b = Budgets {
            per_task: Some(Duration::from_secs(1)),
            total: Some(Duration::from_millis(50)),
            global_deadline: Some(Instant::now() + Duration::from_millis(50)),
        };

        let canceller = {
            let global = global.clone();
            tokio::spawn(async move {
                time::sleep(Duration::from_millis(50)).await;
                global.cancel();
            })
        };

        let out = supervise(0, slow, global, b).await;
        assert_eq!(
            out.result,
            Err(CloseError::GlobalTimeout {
                timeout: Duration::from_millis(50)
            })
        );
        canceller.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_action_sees_cancellation() {
        let saw_cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&saw_cancel);
        let task: TaskRef = TaskFn::arc("cooperative", move |ctx: CloseCtx| {
            let flag = Arc::clone(&flag);
            async move {
                assert!(ctx.deadline().is_some());
                ctx.cancelled().await;
                flag.store(true, Ordering::SeqCst);
                Ok::<_, CloseError>(())
            }
        });

        let out = supervise(0, task, CancellationToken::new(), budgets(20)).await;
        assert!(matches!(out.result, Err(CloseError::LocalTimeout { .. })));

        time::sleep(Duration::from_millis(1)).await;
        assert!(saw_cancel.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_action_is_reported() {
        let task: TaskRef = TaskFn::arc("explodes", |_ctx: CloseCtx| async {
            if true {
                panic!("pool poisoned");
            }
            Ok::<_, CloseError>(())
        });
        let out = supervise(0, task, CancellationToken::new(), budgets(0)).await;
        assert_eq!(
            out.result,
            Err(CloseError::Panicked {
                info: "pool poisoned".to_string()
            })
        );
    }

    #[test]
    fn test_earliest_deadline() {
        let now = Instant::now();
        let later = now + Duration::from_secs(1);
        assert_eq!(earliest(Some(now), Some(later)), Some(now));
        assert_eq!(earliest(None, Some(later)), Some(later));
        assert_eq!(earliest(Some(now), None), Some(now));
        assert_eq!(earliest(None, None), None);
    }
}
