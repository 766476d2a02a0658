//! Jittered exponential delays between node attempts.

use rand::Rng;
use std::time::Duration;

/// Delay after the `attempt`th failed attempt (1-based); attempt 0 waits
/// nothing.
///
/// The ceiling doubles from `base_ms` with each attempt and stops at
/// `max_ms`. Jitter shaves up to a tenth off the ceiling, so the configured
/// maximum is never exceeded.
pub fn backoff_delay(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    let Some(exponent) = attempt.checked_sub(1) else {
        return Duration::ZERO;
    };

    let ceiling = 1u64
        .checked_shl(exponent)
        .and_then(|factor| base_ms.checked_mul(factor))
        .map_or(max_ms, |delay| delay.min(max_ms));

    let spread = ceiling / 10;
    let shave = if spread > 0 {
        rand::thread_rng().gen_range(0..=spread)
    } else {
        0
    };

    Duration::from_millis(ceiling - shave)
}
