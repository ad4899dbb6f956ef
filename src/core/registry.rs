//! # Task registry: append-only, insertion-ordered task list.
//!
//! Collaborators register cleanup tasks during startup; the first shutdown run
//! seals the registry and takes the whole list.
//!
//! ## Rules
//! - `register` is safe to call concurrently; every mutation holds the lock.
//! - Names are not deduplicated.
//! - Once sealed, `register` is rejected with [`RegisterError::Closing`].
//! - `seal` hands the list out exactly once; later calls get an empty list.

use std::mem;

use parking_lot::Mutex;

use crate::error::RegisterError;
use crate::tasks::TaskRef;

#[derive(Default)]
struct Inner {
    tasks: Vec<TaskRef>,
    sealed: bool,
}

/// Mutex-guarded task list.
#[derive(Default)]
pub(crate) struct Registry {
    inner: Mutex<Inner>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends a task unless the registry is sealed.
    pub(crate) fn register(&self, task: TaskRef) -> Result<(), RegisterError> {
        let mut inner = self.inner.lock();
        if inner.sealed {
            return Err(RegisterError::Closing {
                name: task.name().to_string(),
            });
        }
        inner.tasks.push(task);
        Ok(())
    }

    /// Returns registered names in registration order.
    pub(crate) fn names(&self) -> Vec<String> {
        self.inner
            .lock()
            .tasks
            .iter()
            .map(|t| t.name().to_string())
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.lock().tasks.len()
    }

    /// Closes the registry for writes and takes the task list.
    pub(crate) fn seal(&self) -> Vec<TaskRef> {
        let mut inner = self.inner.lock();
        inner.sealed = true;
        mem::take(&mut inner.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CloseError;
    use crate::tasks::{CloseCtx, TaskFn};
    use std::sync::Arc;

    fn noop(name: &'static str) -> TaskRef {
        TaskFn::arc(name, |_ctx: CloseCtx| async { Ok::<_, CloseError>(()) })
    }

    #[test]
    fn test_keeps_order_and_duplicates() {
        let reg = Registry::new();
        reg.register(noop("db")).unwrap();
        reg.register(noop("http")).unwrap();
        reg.register(noop("db")).unwrap();

        assert_eq!(reg.names(), vec!["db", "http", "db"]);
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn test_seal_takes_once_and_rejects_writes() {
        let reg = Registry::new();
        reg.register(noop("db")).unwrap();

        let taken = reg.seal();
        assert_eq!(taken.len(), 1);
        assert!(reg.seal().is_empty());

        let err = reg.register(noop("late")).unwrap_err();
        assert_eq!(
            err,
            RegisterError::Closing {
                name: "late".to_string()
            }
        );
        assert_eq!(reg.len(), 0);
    }

    #[test]
    fn test_concurrent_registration() {
        let reg = Arc::new(Registry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = Arc::clone(&reg);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        reg.register(noop("conn")).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(reg.len(), 800);
    }
}
