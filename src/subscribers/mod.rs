//! # Event subscribers: the closer's log sink.
//!
//! Every shutdown run reports through [`Subscribe`] implementations. The closer
//! never returns task failures to its caller as errors; subscribers are where
//! operators see them.
//!
//! ## Architecture
//! ```text
//! Closer run ── emit(Event) ──► SubscriberSet
//!                                  ├──► [queue] ─► worker ─► LogWriter::on_event()
//!                                  └──► [queue] ─► worker ─► Custom::on_event()
//! ```
//!
//! The set lives for one run and is flushed before the run returns.

mod embedded;
mod set;
mod subscriber;

pub use embedded::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
