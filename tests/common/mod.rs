#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use closer::{CloseCtx, CloseError, Closer, Config, Event, EventKind, Subscribe};
use parking_lot::Mutex;

/// Subscriber that keeps every event it sees.
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.lock().iter().map(|e| e.kind).collect()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.lock().iter().filter(|e| e.kind == kind).count()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl Subscribe for Recorder {
    async fn on_event(&self, ev: &Event) {
        self.events.lock().push(ev.clone());
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

pub fn closer_with_recorder(cfg: Config) -> (Arc<Closer>, Arc<Recorder>) {
    let rec = Arc::new(Recorder::default());
    let closer = Closer::builder(cfg).with_subscriber(rec.clone()).build();
    (closer, rec)
}

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Registers a task that sleeps `delay`, counts its runs, then returns `result`.
pub fn register_counted(
    closer: &Closer,
    name: &'static str,
    delay: Duration,
    fail: bool,
) -> Arc<AtomicUsize> {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    closer
        .register(name, move |_ctx: CloseCtx| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(delay).await;
                if fail {
                    Err(CloseError::failed("refused"))
                } else {
                    Ok(())
                }
            }
        })
        .unwrap();
    runs
}
