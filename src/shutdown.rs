//! Interrupt handling for long-running commands

use std::future::Future;

use tokio::signal;
use tracing::{info, warn};

use crate::error::AppError;

/// Drive `work` to completion unless `interrupt` resolves first
///
/// An interrupted run is an error, so callers exit non-zero and a partial
/// run is never mistaken for a finished one.
pub async fn until_interrupted<T, W, S>(work: W, interrupt: S) -> Result<T, AppError>
where
    W: Future<Output = Result<T, AppError>>,
    S: Future<Output = ()>,
{
    tokio::select! {
        result = work => result,
        _ = interrupt => {
            info!("Interrupt received, abandoning in-flight requests");
            Err(AppError::Interrupted)
        }
    }
}

/// Resolves on Ctrl+C
///
/// If the handler cannot be installed this never resolves, leaving the
/// command to run to completion.
pub async fn ctrl_c() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
