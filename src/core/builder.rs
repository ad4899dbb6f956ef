use std::sync::Arc;

use crate::{config::Config, subscribers::Subscribe};

use super::closer::Closer;

/// Builder for constructing a [`Closer`] with subscribers.
pub struct CloserBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl CloserBuilder {
    /// Creates a new builder with the given budgets.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers (the log sink).
    ///
    /// Subscribers receive shutdown events through dedicated workers with bounded
    /// queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds one subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds the closer.
    ///
    /// Does not need a runtime: subscriber workers are started per shutdown run.
    pub fn build(self) -> Arc<Closer> {
        Arc::new(Closer::new_internal(self.cfg, self.subscribers))
    }
}
