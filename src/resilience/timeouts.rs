//! Timeout enforcement.

use std::future::Future;
use std::time::Duration;

use crate::ledger::types::{LedgerError, LedgerResult};

/// Run `fut` with a deadline; elapsed deadlines become [`LedgerError::Timeout`].
pub async fn with_timeout<F, T>(duration: Duration, fut: F) -> LedgerResult<T>
where
    F: Future<Output = LedgerResult<T>>,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(result) => result,
        Err(_) => Err(LedgerError::Timeout(duration)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timeout_elapses() {
        let result: LedgerResult<()> = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(LedgerError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_inner_result_passes_through() {
        let ok = with_timeout(Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err: LedgerResult<()> = with_timeout(Duration::from_secs(1), async {
            Err(LedgerError::ClientClosed)
        })
        .await;
        assert!(matches!(err, Err(LedgerError::ClientClosed)));
    }
}
