//! OS signal handling.
//!
//! # Responsibilities
//! - Hold a scenario open for a fixed duration
//! - End the hold early on Ctrl-C so the client still closes cleanly

use std::time::Duration;

/// How a hold ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    Elapsed,
    Interrupted,
}

/// Sleep for `duration`, or until Ctrl-C arrives.
pub async fn hold(duration: Duration) -> HoldOutcome {
    tokio::select! {
        _ = tokio::time::sleep(duration) => HoldOutcome::Elapsed,
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                // Without a handler we cannot be interrupted; finish the hold.
                tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
                tokio::time::sleep(duration).await;
                return HoldOutcome::Elapsed;
            }
            tracing::info!("Interrupted, ending hold early");
            HoldOutcome::Interrupted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_short_hold_elapses() {
        assert_eq!(hold(Duration::from_millis(5)).await, HoldOutcome::Elapsed);
    }
}
