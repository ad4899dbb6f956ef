//! # Demo: app
//!
//! A small service wiring its resources into one [`Closer`].
//!
//! Demonstrates how to:
//! - Load budgets from `CLOSER_TOTAL_DURATION` / `CLOSER_FUNC_DURATION`.
//! - Register cleanup work from several collaborators.
//! - Shut down on SIGINT/SIGTERM **or** on a planned stop, through the same single run.
//! - Refuse new work while closing, via the closing token.
//! - Release what was already acquired when a collaborator fails during startup.
//! - Decide the exit status from the [`ShutdownReport`](closer::ShutdownReport).
//!
//! ## Run
//! ```bash
//! CLOSER_TOTAL_DURATION=3s CLOSER_FUNC_DURATION=1s cargo run --example app
//! # planned stop after 2 seconds instead of waiting for Ctrl-C:
//! DEMO_RUN_FOR=2s cargo run --example app
//! # cache connection fails at startup; db and http are still closed:
//! DEMO_CACHE_DOWN=1 cargo run --example app
//! ```

use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use closer::{CloseCtx, CloseError, Closer, Config, LogWriter, RegisterError, ShutdownReport};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Stand-in for a connection pool.
struct Pool {
    open: AtomicU64,
}

impl Pool {
    async fn drain(&self, ctx: &CloseCtx) -> Result<(), CloseError> {
        while self.open.load(Ordering::SeqCst) > 0 {
            if ctx.is_cancelled() {
                return Err(CloseError::failed(format!(
                    "{} connections still open",
                    self.open.load(Ordering::SeqCst)
                )));
            }
            self.open.fetch_sub(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        Ok(())
    }
}

/// Accepts "requests" until the closer starts closing.
async fn serve(closing: CancellationToken, served: Arc<AtomicU64>) {
    loop {
        tokio::select! {
            _ = closing.cancelled() => {
                tracing::info!("server is shutting down, refusing new requests");
                return;
            }
            _ = tokio::time::sleep(Duration::from_millis(200)) => {
                served.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

/// Stand-in for an outbound cache client.
struct Cache;

impl Cache {
    /// Ignores any context; only the budgets bound it.
    async fn disconnect(&self) -> Result<(), CloseError> {
        tokio::time::sleep(Duration::from_secs(2)).await;
        Ok(())
    }
}

/// Fails when `DEMO_CACHE_DOWN` is set.
async fn connect_cache() -> Result<Cache, String> {
    tokio::time::sleep(Duration::from_millis(100)).await;
    if std::env::var_os("DEMO_CACHE_DOWN").is_some() {
        return Err("cache: connection refused".to_string());
    }
    Ok(Cache)
}

fn exit_code(report: &ShutdownReport) -> ExitCode {
    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(label = e.as_label(), "{e}");
            return ExitCode::FAILURE;
        }
    };

    let closer = Closer::builder(cfg)
        .with_subscriber(Arc::new(LogWriter::new()))
        .build();
    tracing::info!(total = ?cfg.total_budget(), per_task = ?cfg.per_task_budget(), "[+] closer loaded");

    let served = Arc::new(AtomicU64::new(0));
    let server = tokio::spawn(serve(closer.closing_token(), Arc::clone(&served)));

    if let Err(e) = register_base(&closer, &served) {
        tracing::error!(label = e.as_label(), "{e}");
        return ExitCode::FAILURE;
    }

    let cache = match connect_cache().await {
        Ok(cache) => cache,
        Err(e) => {
            tracing::error!(error = %e, "startup failed, releasing acquired resources");
            closer.close().await;
            join_logged("http server", server).await;
            return ExitCode::FAILURE;
        }
    };
    let cache = Arc::new(cache);
    let registered = closer.register("close cache client", move |_ctx: CloseCtx| {
        let cache = Arc::clone(&cache);
        async move { cache.disconnect().await }
    });
    if let Err(e) = registered {
        tracing::error!(label = e.as_label(), "{e}");
        return ExitCode::FAILURE;
    }

    let signals = match closer.spawn_signal_listener() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "signal handlers unavailable, planned stop only");
            None
        }
    };

    let run_for = std::env::var("DEMO_RUN_FOR")
        .ok()
        .and_then(|v| humantime::parse_duration(&v).ok());

    match run_for {
        Some(d) => {
            let closing = closer.closing_token();
            tokio::select! {
                _ = tokio::time::sleep(d) => tracing::info!("planned stop"),
                _ = closing.cancelled() => {}
            }
        }
        None => closer.closing_token().cancelled().await,
    }

    let report = closer.close().await;
    join_logged("http server", server).await;
    if let Some(handle) = signals {
        join_logged("signal listener", handle).await;
    }

    exit_code(report)
}

/// Registers the collaborators acquired before the cache.
fn register_base(closer: &Closer, served: &Arc<AtomicU64>) -> Result<(), RegisterError> {
    let pool = Arc::new(Pool {
        open: AtomicU64::new(8),
    });
    closer.register("close db connection", move |ctx: CloseCtx| {
        let db = Arc::clone(&pool);
        async move { db.drain(&ctx).await }
    })?;

    let served = Arc::clone(served);
    closer.register("stop http server", move |_ctx: CloseCtx| {
        let served = Arc::clone(&served);
        async move {
            tracing::info!(served = served.load(Ordering::Relaxed), "http server stopped");
            Ok::<_, CloseError>(())
        }
    })?;
    Ok(())
}

async fn join_logged(what: &'static str, handle: tokio::task::JoinHandle<()>) {
    if let Err(e) = handle.await {
        tracing::warn!(task = what, error = %e, "background task ended abnormally");
    }
}
