//! Runtime core: registry, per-task supervision and the shutdown run.
//!
//! The only public API from this module is [`Closer`] (and its builder).
//!
//! Internal modules:
//! - [`registry`]: append-only task list, sealed when shutdown begins;
//! - [`runner`]: per-task supervisor racing one action against its deadlines;
//! - [`closer`]: the orchestrator owning the single shutdown run;
//! - [`shutdown`]: cross-platform termination signal handling.

mod builder;
mod closer;
mod registry;
mod runner;
mod shutdown;

pub use builder::CloserBuilder;
pub use closer::Closer;
