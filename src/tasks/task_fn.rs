//! # Function-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: Fn(CloseCtx) -> Fut`, so collaborators can register
//! cleanup work without declaring a type.
//!
//! ## Example
//! ```rust
//! use closer::{CloseCtx, CloseError, TaskFn, TaskRef};
//!
//! let t: TaskRef = TaskFn::arc("stop http server", |_ctx: CloseCtx| async move {
//!     Ok::<_, CloseError>(())
//! });
//!
//! assert_eq!(t.name(), "stop http server");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CloseError;
use crate::tasks::{CloseCtx, Task};

/// Function-backed task implementation.
#[derive(Debug)]
pub struct TaskFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new function-backed task.
    ///
    /// Prefer [`TaskFn::arc`] when you immediately need a [`TaskRef`](crate::TaskRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the task and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Task for TaskFn<F>
where
    F: Fn(CloseCtx) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), CloseError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn close(&self, ctx: CloseCtx) -> Result<(), CloseError> {
        (self.f)(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_closure_receives_context_and_error() {
        let task = TaskFn::new("flaky", |ctx: CloseCtx| async move {
            assert!(ctx.deadline().is_none());
            Err::<(), _>(CloseError::failed("boom"))
        });

        assert_eq!(task.name(), "flaky");
        let err = task.close(CloseCtx::background()).await.unwrap_err();
        assert_eq!(err, CloseError::failed("boom"));
    }
}
