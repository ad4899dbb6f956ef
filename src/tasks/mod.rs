//! # Cleanup task abstractions.
//!
//! This module provides the task-related types:
//! - [`Task`] - trait for implementing an async cleanup action
//! - [`TaskFn`] - function-backed task implementation
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn Task>`)
//! - [`CloseCtx`] - deadline-aware context handed to every action

mod context;
mod task;
mod task_fn;

pub use context::CloseCtx;
pub use task::{Task, TaskRef};
pub use task_fn::TaskFn;
