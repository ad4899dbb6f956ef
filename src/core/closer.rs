//! # Closer: drains every registered cleanup task exactly once.
//!
//! The [`Closer`] owns the task registry and the budgets. It is constructed once
//! by the process entry point and shared (`Arc<Closer>`) with every collaborator
//! that owns a releasable resource.
//!
//! ## Shutdown run
//! ```text
//! close() / signal ──► launch(trigger)  (first caller only)
//!                         closing_token.cancel()
//!                         registry.seal() ──► Vec<TaskRef>  (no more registrations)
//!                         tokio::spawn(run) ──► Shared<report future>
//!                  ──► every caller awaits a clone of the shared future
//!
//! run (detached, unaffected by callers dropping their futures):
//!   emit ShutdownRequested
//!   ├─ no tasks ──► emit NothingToClose ──► report (nothing_to_close = true)
//!   └─ tasks:
//!        global token (cancelled at now + total, if bounded)
//!        JoinSet ◄── runner::supervise(task_i, global.clone()) for each task
//!        loop select {
//!          join_next()       ──► Outcome ──► emit TaskClosed / TaskFailed
//!          global deadline   ──► global.cancel()   (remaining report GlobalTimeout)
//!        }
//!        emit AllClosed | ClosedWithErrors
//!   subscribers.shutdown().await                         (logs flushed)
//! ```
//!
//! ## Rules
//! - A failure of one task never affects another.
//! - Nothing is returned as an error: failures are visible through subscribers and
//!   the [`ShutdownReport`].
//! - Concurrent triggers share the single run; every caller receives the same report.
//! - The closer never exits the process; the caller decides what to do with the report.

use std::borrow::Cow;
use std::collections::HashMap;
use std::future::{self, Future};
use std::sync::{Arc, OnceLock};

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::OnceCell;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    error::{CloseError, RegisterError},
    events::{Event, EventKind},
    report::{Outcome, ShutdownReport, Trigger},
    subscribers::{Subscribe, SubscriberSet},
    tasks::{CloseCtx, TaskFn, TaskRef},
};

use super::{
    builder::CloserBuilder,
    registry::Registry,
    runner::{self, Budgets},
    shutdown::ShutdownSignal,
};

/// Handle on the detached shutdown run, awaited by every caller.
type RunHandle = Shared<BoxFuture<'static, ShutdownReport>>;

/// Coordinates cleanup tasks, budgets and the single shutdown run.
pub struct Closer {
    cfg: Config,
    registry: Registry,
    subscribers: Vec<Arc<dyn Subscribe>>,
    closing: CancellationToken,
    run: OnceLock<RunHandle>,
    report: OnceCell<ShutdownReport>,
}

impl Closer {
    /// Returns a builder for configuring subscribers.
    pub fn builder(cfg: Config) -> CloserBuilder {
        CloserBuilder::new(cfg)
    }

    /// Creates a closer with no subscribers.
    pub fn new(cfg: Config) -> Arc<Self> {
        CloserBuilder::new(cfg).build()
    }

    pub(super) fn new_internal(cfg: Config, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        Self {
            cfg,
            registry: Registry::new(),
            subscribers,
            closing: CancellationToken::new(),
            run: OnceLock::new(),
            report: OnceCell::new(),
        }
    }

    /// The budgets this closer was built with.
    pub fn config(&self) -> Config {
        self.cfg
    }

    /// Registers a closure as a cleanup task.
    ///
    /// Duplicate names are allowed. Fails with [`RegisterError::Closing`] once a
    /// shutdown run has begun.
    ///
    /// ## Example
    /// ```rust
    /// use std::time::Duration;
    /// use closer::{CloseCtx, CloseError, Closer, Config};
    ///
    /// let closer = Closer::new(Config::new(Duration::from_secs(10), Duration::from_secs(2)));
    /// closer
    ///     .register("close db pool", |_ctx: CloseCtx| async move { Ok::<_, CloseError>(()) })
    ///     .unwrap();
    /// assert_eq!(closer.task_names(), vec!["close db pool"]);
    /// ```
    pub fn register<F, Fut>(
        &self,
        name: impl Into<Cow<'static, str>>,
        f: F,
    ) -> Result<(), RegisterError>
    where
        F: Fn(CloseCtx) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CloseError>> + Send + 'static,
    {
        self.register_task(TaskFn::arc(name, f))
    }

    /// Registers a task object.
    pub fn register_task(&self, task: TaskRef) -> Result<(), RegisterError> {
        self.registry.register(task).inspect_err(|e| {
            tracing::warn!(label = e.as_label(), "{e}");
        })
    }

    /// Names of registered tasks, in registration order.
    ///
    /// Empty once a run has taken the task list.
    pub fn task_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Number of registered tasks not yet taken by a run.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// True if no task is waiting to be closed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True once a shutdown run has begun.
    pub fn is_closing(&self) -> bool {
        self.closing.is_cancelled()
    }

    /// Token cancelled the moment a shutdown run begins.
    ///
    /// Request handlers use it to refuse new work while resources are released.
    pub fn closing_token(&self) -> CancellationToken {
        self.closing.clone()
    }

    /// Report of the finished run, once a caller has received it.
    pub fn report(&self) -> Option<&ShutdownReport> {
        self.report.get()
    }

    /// Runs shutdown (explicit trigger) and returns its report.
    ///
    /// Idempotent: only the first call (or signal) runs the tasks; concurrent and
    /// later callers wait for that run and get the same report.
    ///
    /// The run itself is a detached tokio task: dropping a `close()` future only
    /// stops that caller from waiting. A later call still gets the report of the
    /// original run.
    pub async fn close(&self) -> &ShutdownReport {
        self.close_with(Trigger::Explicit).await
    }

    async fn close_with(&self, trigger: Trigger) -> &ShutdownReport {
        let run = self.run.get_or_init(|| self.launch(trigger)).clone();
        self.report.get_or_init(|| run).await
    }

    /// Starts the single run. Called at most once.
    fn launch(&self, trigger: Trigger) -> RunHandle {
        let started = Instant::now();
        self.closing.cancel();
        let tasks = self.registry.seal();
        let names: Vec<String> = tasks.iter().map(|t| t.name().to_string()).collect();

        let handle = tokio::spawn(run(
            trigger,
            tasks,
            self.cfg,
            self.subscribers.clone(),
            started,
        ));

        async move {
            match handle.await {
                Ok(report) => report,
                Err(je) => {
                    tracing::error!(error = %je, "shutdown run aborted");
                    let outcomes = names
                        .into_iter()
                        .enumerate()
                        .map(|(index, name)| Outcome {
                            index,
                            name,
                            result: Err(CloseError::failed(&je)),
                        })
                        .collect();
                    ShutdownReport::new(trigger, outcomes, started.elapsed())
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Installs OS termination signal handlers and spawns a listener that runs
    /// shutdown on the first signal.
    ///
    /// The listener stops after that signal, or as soon as shutdown begins through
    /// another trigger. Must be called inside a tokio runtime.
    pub fn spawn_signal_listener(self: &Arc<Self>) -> std::io::Result<JoinHandle<()>> {
        let signal = ShutdownSignal::install()?;
        let me = Arc::clone(self);

        Ok(tokio::spawn(async move {
            tokio::select! {
                name = signal.recv() => {
                    tracing::info!(signal = name, "termination signal received");
                    me.close_with(Trigger::Signal).await;
                }
                _ = me.closing.cancelled() => {}
            }
        }))
    }
}

/// Drains `tasks` under the budgets and publishes lifecycle events.
async fn run(
    trigger: Trigger,
    tasks: Vec<TaskRef>,
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    started: Instant,
) -> ShutdownReport {
    // One event per task plus the run-level ones; queues never overflow.
    let subs = SubscriberSet::with_capacity(&subscribers, tasks.len() + 3);
    subs.emit(
        Event::new(EventKind::ShutdownRequested)
            .with_trigger(trigger)
            .with_reason(tasks.len().to_string()),
    );

    if tasks.is_empty() {
        subs.emit(Event::new(EventKind::NothingToClose));
        subs.shutdown().await;
        return ShutdownReport::new(trigger, Vec::new(), started.elapsed());
    }

    let global = CancellationToken::new();
    let budgets = Budgets {
        per_task: cfg.per_task_budget(),
        total: cfg.total_budget(),
        global_deadline: cfg.total_budget().map(|d| started + d),
    };

    let mut set = JoinSet::new();
    let mut pending = HashMap::with_capacity(tasks.len());
    for (index, task) in tasks.into_iter().enumerate() {
        let name = task.name().to_string();
        let handle = set.spawn(runner::supervise(index, task, global.clone(), budgets));
        pending.insert(handle.id(), (index, name));
    }

    let outcomes = collect(&mut set, pending, &subs, &global, budgets.global_deadline).await;
    let report = ShutdownReport::new(trigger, outcomes, started.elapsed());

    if report.is_success() {
        subs.emit(Event::new(EventKind::AllClosed).with_elapsed(report.elapsed()));
    } else {
        subs.emit(
            Event::new(EventKind::ClosedWithErrors)
                .with_elapsed(report.elapsed())
                .with_failed(&report.failed()),
        );
    }
    subs.shutdown().await;
    report
}

/// Receives one outcome per supervisor, cancelling `global` at the deadline.
async fn collect(
    set: &mut JoinSet<Outcome>,
    mut pending: HashMap<tokio::task::Id, (usize, String)>,
    subs: &SubscriberSet,
    global: &CancellationToken,
    deadline: Option<Instant>,
) -> Vec<Outcome> {
    let mut outcomes = Vec::with_capacity(set.len());

    let expiry = async {
        match deadline {
            Some(at) => time::sleep_until(at).await,
            None => future::pending().await,
        }
    };
    tokio::pin!(expiry);

    loop {
        tokio::select! {
            joined = set.join_next_with_id() => {
                let outcome = match joined {
                    None => break,
                    Some(Ok((id, outcome))) => {
                        pending.remove(&id);
                        outcome
                    }
                    // The supervisor itself died; attribute it to its task.
                    Some(Err(je)) => {
                        let Some((index, name)) = pending.remove(&je.id()) else {
                            continue;
                        };
                        Outcome {
                            index,
                            name,
                            result: Err(CloseError::failed(je)),
                        }
                    }
                };
                subs.emit(outcome_event(&outcome));
                outcomes.push(outcome);
            }
            _ = &mut expiry, if !global.is_cancelled() => {
                tracing::debug!(remaining = set.len(), "global close deadline reached");
                global.cancel();
            }
        }
    }

    outcomes
}

fn outcome_event(outcome: &Outcome) -> Event {
    let ev = Event::new(match outcome.result {
        Ok(()) => EventKind::TaskClosed,
        Err(_) => EventKind::TaskFailed,
    })
    .with_task(outcome.name.as_str());

    match &outcome.result {
        Ok(()) => ev,
        Err(e) => ev.with_error(e),
    }
}
