//! Blocking work off the driving thread.
//!
//! The caller awaits exactly one completion. A timeout only stops the wait:
//! the worker thread keeps running until its OS command returns. Workers are
//! detached, so a hung command never holds the runtime open on shutdown.

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::oneshot;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task did not finish within {0:?}")]
    TimedOut(Duration),
    #[error("task failed: {0}")]
    Panicked(String),
    #[error("could not start worker thread: {0}")]
    Spawn(#[source] io::Error),
}

pub async fn run_blocking<T, F>(limit: Option<Duration>, work: F) -> Result<T, TaskError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = oneshot::channel::<Result<T, String>>();

    thread::Builder::new()
        .name("medlink-worker".into())
        .spawn(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(work)).map_err(panic_message);
            if tx.send(outcome).is_err() {
                debug!("worker finished after its caller stopped waiting");
            }
        })
        .map_err(TaskError::Spawn)?;

    let received = match limit {
        Some(limit) => tokio::time::timeout(limit, rx)
            .await
            .map_err(|_elapsed| TaskError::TimedOut(limit))?,
        None => rx.await,
    };

    match received {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(message)) => Err(TaskError::Panicked(message)),
        Err(_closed) => Err(TaskError::Panicked("worker exited without a result".into())),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "worker panicked".to_string())
}
