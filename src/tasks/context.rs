//! # Deadline-aware execution context.
//!
//! Every cleanup action receives a [`CloseCtx`]: a [`CancellationToken`] plus the
//! instant by which the action is expected to return.
//!
//! ```text
//! global token (cancelled at the global deadline)
//!   └─► child token per task (also cancelled at the per-task deadline)
//!         └─► CloseCtx { token, deadline = min(per-task, global) }
//! ```
//!
//! The token is cancelled once the closer has stopped waiting for the action.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Context handed to a cleanup action.
#[derive(Clone, Debug)]
pub struct CloseCtx {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CloseCtx {
    pub(crate) fn new(token: CancellationToken, deadline: Option<Instant>) -> Self {
        Self { token, deadline }
    }

    /// A context that is never cancelled and has no deadline.
    ///
    /// Useful when invoking an action outside of a shutdown run (tests, startup
    /// rollback).
    pub fn background() -> Self {
        Self::new(CancellationToken::new(), None)
    }

    /// The instant by which the action should return, if bounded.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline (`Some(ZERO)` once it has passed).
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// True once the closer stopped waiting for this action.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes when the closer stops waiting for this action.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Underlying token, for handing to libraries that accept one.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Runs `fut` until it completes or the context is cancelled.
    ///
    /// Returns `None` on cancellation; `fut` is dropped at that point.
    pub async fn run_until_cancelled<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            out = fut => Some(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_remaining_saturates_at_zero() {
        let ctx = CloseCtx::new(
            CancellationToken::new(),
            Some(Instant::now() + Duration::from_millis(50)),
        );
        assert_eq!(ctx.remaining(), Some(Duration::from_millis(50)));

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_cancelled_stops_on_cancel() {
        let token = CancellationToken::new();
        let ctx = CloseCtx::new(token.clone(), None);

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        let out = ctx
            .run_until_cancelled(tokio::time::sleep(Duration::from_secs(60)))
            .await;
        assert!(out.is_none());
        assert!(ctx.is_cancelled());
        canceller.await.unwrap();
    }

    #[tokio::test]
    async fn test_background_is_unbounded() {
        let ctx = CloseCtx::background();
        assert!(ctx.deadline().is_none());
        assert!(ctx.remaining().is_none());
        assert_eq!(ctx.run_until_cancelled(async { 7 }).await, Some(7));
    }
}
