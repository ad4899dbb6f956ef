//! Shutdown lifecycle events.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//!
//! ## Quick reference
//! - **Publisher**: the [`Closer`](crate::Closer) shutdown run, from a single task.
//! - **Consumers**: [`Subscribe`](crate::Subscribe) implementations via
//!   [`SubscriberSet`](crate::SubscriberSet).

mod event;

pub use event::{Event, EventKind};
