//! Run supervision.
//!
//! [`start`] drives a run future to completion while listening for an
//! interrupt signal. On interrupt it flips the cancellation channel and
//! gives the run up to the stop timeout to settle; a run that ignores
//! cancellation is abandoned rather than blocking shutdown.
//!
//! [`run_all`] joins several runs into one, failing fast on the first
//! error.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::warn;

/// A boxed run future, as accepted by [`run_all`].
pub type RunFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

/// Run `run` until it finishes or the process is interrupted.
///
/// The run future receives a cancellation receiver; it becomes `true`
/// when the run should stop. Returns the run's error, if any. A run that
/// does not stop within `stop_timeout` after cancellation is aborted and
/// its result discarded.
pub async fn start<F, Fut>(stop_timeout: Duration, run: F) -> Result<()>
where
    F: FnOnce(watch::Receiver<bool>) -> Fut,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let mut handle = tokio::spawn(run(cancel_rx));

    tokio::select! {
        result = &mut handle => return result?,
        _ = tokio::signal::ctrl_c() => {}
    }

    let _ = cancel_tx.send(true);
    match tokio::time::timeout(stop_timeout, &mut handle).await {
        Ok(result) => result?,
        Err(_) => {
            warn!(timeout_secs = stop_timeout.as_secs(), "run did not stop in time, abandoning");
            handle.abort();
            Ok(())
        }
    }
}

/// Drive all runs concurrently, returning the first error.
///
/// When a run fails, the remaining runs are aborted.
pub async fn run_all(runs: Vec<RunFuture>) -> Result<()> {
    let mut set = JoinSet::new();
    for run in runs {
        set.spawn(run);
    }
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                set.abort_all();
                return Err(e);
            }
            Err(e) if e.is_cancelled() => {}
            Err(e) => {
                set.abort_all();
                return Err(e.into());
            }
        }
    }
    Ok(())
}
