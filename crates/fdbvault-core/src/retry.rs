//! Single-retry helper for transient external failures.
use std::{future::Future, time::Duration};

use tracing::warn;

use crate::error::ToolResult;

/// Run `op`; if it fails, wait `delay` and run it exactly once more.
///
/// The second attempt's result is returned as is.
pub(crate) async fn retry_once<T, F, Fut>(what: &str, delay: Duration, mut op: F) -> ToolResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ToolResult<T>>,
{
    match op().await {
        Ok(value) => Ok(value),
        Err(first) => {
            warn!(
                target_op = what,
                error = %first,
                delay_ms = delay.as_millis() as u64,
                "attempt failed; retrying once",
            );
            tokio::time::sleep(delay).await;
            op().await
        }
    }
}
