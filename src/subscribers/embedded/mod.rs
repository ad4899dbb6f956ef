//! # Built-in subscribers
//!
//! - [`LogWriter`]: writes events through `tracing` at info/warn/error level.

mod log;

pub use log::LogWriter;
