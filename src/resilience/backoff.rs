//! Exponential backoff with jitter.
//!
//! `delay(k) = clamp(trunc(initial · multiplier^(k-1)) ± 10%, 0, max)` for
//! retry `k ≥ 1`. The first attempt (`k = 0`) never waits.

use rand::Rng;
use std::time::Duration;

use crate::config::RetryPolicy;

/// Fraction of the base delay used as jitter bound.
pub const JITTER_RATIO: f64 = 0.1;

/// Calculate the jittered delay before retry `retry`.
pub fn calculate_backoff(retry: u32, policy: &RetryPolicy) -> Duration {
    calculate_backoff_with(retry, policy, &mut rand::thread_rng())
}

/// [`calculate_backoff`] with a caller-supplied RNG.
pub fn calculate_backoff_with<R: Rng + ?Sized>(
    retry: u32,
    policy: &RetryPolicy,
    rng: &mut R,
) -> Duration {
    if retry == 0 {
        return Duration::ZERO;
    }

    let base_ms = base_delay_ms(retry, policy);
    let spread = rng.gen_range(-1.0..=1.0);
    Duration::from_millis(apply_jitter(base_ms, spread, policy.max_delay_ms))
}

/// Unjittered delay in whole milliseconds before retry `retry` (k ≥ 1).
///
/// Saturates at `u64::MAX` instead of overflowing.
pub fn base_delay_ms(retry: u32, policy: &RetryPolicy) -> u64 {
    let exponent = retry.saturating_sub(1).min(i32::MAX as u32) as i32;
    let raw = policy.initial_delay_ms as f64 * policy.multiplier.powi(exponent);
    // float → int casts saturate; NaN becomes 0
    raw as u64
}

/// Offset `base_ms` by `spread` ∈ [-1, 1] times the jitter bound, then clamp.
pub fn apply_jitter(base_ms: u64, spread: f64, max_ms: u64) -> u64 {
    let bound = base_ms as f64 * JITTER_RATIO;
    let jittered = base_ms as f64 + bound * spread.clamp(-1.0, 1.0);
    (jittered.max(0.0) as u64).min(max_ms)
}
