//! # Task abstraction.
//!
//! A [`Task`] is a named cleanup unit: an identifying label plus an action that
//! accepts a deadline-aware [`CloseCtx`] and returns success or a [`CloseError`].
//! The common handle type is [`TaskRef`], an `Arc<dyn Task>` suitable for sharing
//! across the runtime.
//!
//! Names are labels, not keys: two tasks may share a name and are still closed and
//! reported independently.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CloseError;
use crate::tasks::CloseCtx;

/// Shared handle to a cleanup task.
pub type TaskRef = Arc<dyn Task>;

/// # Asynchronous cleanup unit.
///
/// The action runs on its own tokio task. If it outlives its deadline the closer
/// stops waiting for it and never observes its result, so an action must be safe
/// to abandon. Checking [`CloseCtx::is_cancelled`] (or awaiting
/// [`CloseCtx::cancelled`]) lets it stop early instead.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use closer::{CloseCtx, CloseError, Task};
///
/// struct Pool;
///
/// #[async_trait]
/// impl Task for Pool {
///     fn name(&self) -> &str { "close db pool" }
///
///     async fn close(&self, ctx: CloseCtx) -> Result<(), CloseError> {
///         if ctx.is_cancelled() {
///             return Err(CloseError::failed("no time left"));
///         }
///         // drain connections...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// Returns the human-readable task label used in logs and reports.
    fn name(&self) -> &str;

    /// Releases the resource. Called at most once per process.
    async fn close(&self, ctx: CloseCtx) -> Result<(), CloseError>;
}
