//! # closer
//!
//! **closer** is a bounded concurrent shutdown orchestrator for tokio services.
//!
//! Collaborators that own a releasable resource (listeners, connection pools,
//! outbound clients, process-wide state) register a named cleanup action during
//! startup. On shutdown, triggered by an OS signal or an explicit call, every
//! action runs concurrently, exactly once, under two budgets: one per task and one
//! for the whole run. A misbehaving action can never block process termination.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   collaborator      collaborator      collaborator
//!   register("db")    register("http")  register("grpc")
//!        │                  │                  │
//!        ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Closer (constructed once, shared as Arc<Closer>)                 │
//! │  - Registry (append-only task list, sealed on shutdown)           │
//! │  - Config (total budget, per-task budget)                         │
//! │  - Subscribers (log sink)                                         │
//! └──────┬─────────────────────────────────────────────┬──────────────┘
//!        │ close()                    SIGINT/SIGTERM   │
//!        └────────────────► single run ◄───────────────┘
//!                               │
//!        ┌──────────────────────┼──────────────────────┐
//!        ▼                      ▼                      ▼
//!  ┌────────────┐         ┌────────────┐         ┌────────────┐
//!  │ supervisor │         │ supervisor │         │ supervisor │
//!  │ action ║   │         │ action ║   │         │ action ║   │
//!  │ per-task ⏱ │         │ per-task ⏱ │         │ per-task ⏱ │
//!  │ global  ⏱  │         │ global  ⏱  │         │ global  ⏱  │
//!  └─────┬──────┘         └─────┬──────┘         └─────┬──────┘
//!        └────────── Outcome ───┴──── Outcome ─────────┘
//!                               ▼
//!                     ShutdownReport + events
//! ```
//!
//! ### Outcomes
//! ```text
//! action returned first     ──► Ok / Failed { error }
//! per-task deadline first   ──► LocalTimeout
//! global deadline first     ──► GlobalTimeout
//! action panicked           ──► Panicked
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                      |
//! |-------------------|----------------------------------------------------------|-----------------------------------------|
//! | **Orchestration** | Register cleanup work, run it once under budgets.        | [`Closer`], [`CloserBuilder`]           |
//! | **Tasks**         | Define cleanup actions as closures or types.             | [`Task`], [`TaskFn`], [`CloseCtx`]      |
//! | **Reporting**     | Per-task outcomes and the aggregate report.              | [`Outcome`], [`ShutdownReport`]         |
//! | **Observability** | Lifecycle events fanned out to subscribers.              | [`Subscribe`], [`LogWriter`], [`Event`] |
//! | **Errors**        | Typed outcome and registration errors.                   | [`CloseError`], [`RegisterError`]       |
//! | **Configuration** | Budgets, from code or environment.                       | [`Config`]                              |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use closer::{CloseCtx, CloseError, Closer, Config, LogWriter};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let closer = Closer::builder(Config::new(Duration::from_secs(5), Duration::from_secs(1)))
//!         .with_subscriber(Arc::new(LogWriter::new()))
//!         .build();
//!
//!     closer
//!         .register("stop http server", |ctx: CloseCtx| async move {
//!             let _ = ctx.remaining();
//!             Ok::<_, CloseError>(())
//!         })
//!         .unwrap();
//!
//!     let report = closer.close().await;
//!     assert!(report.is_success());
//!     assert!(closer.is_closing());
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod report;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use config::{Config, FUNC_DURATION_ENV, TOTAL_DURATION_ENV};
pub use crate::core::{Closer, CloserBuilder};
pub use error::{CloseError, ConfigError, RegisterError};
pub use events::{Event, EventKind};
pub use report::{Outcome, ShutdownReport, Trigger};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
pub use tasks::{CloseCtx, Task, TaskFn, TaskRef};
