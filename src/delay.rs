//! Bounded, cancellable blocking delay.
//!
//! The playback context sleeps in short chunks and polls a cancellation
//! flag between them, so a long frame delay can be abandoned within one
//! chunk. There is no condition variable in `no_std`; the chunk length is
//! the wake-up latency bound.
//!
//! How a chunk is slept is up to the caller through [`Sleep`]. On a host
//! [`BlockingSleep`] busy-waits on the `embassy-time` clock; on a target
//! with a scheduler pass a closure that yields to it, for example
//!
//! ```ignore
//! let sleep = |duration: Duration| FreeRtos::delay_ms(duration.as_millis() as u32);
//! Playback::with_sleep(&RENDERER, sleep).run();
//! ```

use embassy_time::{Duration, block_for};

/// Default interval between cancellation checks.
pub const DEFAULT_CHECK_INTERVAL_MS: u64 = 10;

/// Default interval between cancellation checks.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_millis(DEFAULT_CHECK_INTERVAL_MS);

/// Longest delay accepted in milliseconds, longer requests are saturated
pub const MAX_DELAY_MS: u64 = u64::MAX / 1_000_000;

/// Blocking sleep of one delay chunk
pub trait Sleep {
    fn sleep(&mut self, duration: Duration);
}

impl<F: FnMut(Duration)> Sleep for F {
    fn sleep(&mut self, duration: Duration) {
        self(duration);
    }
}

/// Spins on the `embassy-time` clock, never yields
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockingSleep;

impl Sleep for BlockingSleep {
    fn sleep(&mut self, duration: Duration) {
        block_for(duration);
    }
}

/// `Duration::from_millis` clamped to [`MAX_DELAY_MS`]
pub const fn saturating_millis(millis: u64) -> Duration {
    let millis = if millis > MAX_DELAY_MS {
        MAX_DELAY_MS
    } else {
        millis
    };
    Duration::from_millis(millis)
}

/// Block for `total`, checking `cancelled` before and after every chunk.
///
/// Returns `true` as soon as `cancelled` reports `true`, otherwise blocks
/// for the whole `total` and returns the result of the final check.
/// A zero `chunk` sleeps `total` in one step.
pub fn interruptible_delay(
    total: Duration,
    chunk: Duration,
    cancelled: impl FnMut() -> bool,
) -> bool {
    interruptible_delay_with(&mut BlockingSleep, total, chunk, cancelled)
}

/// [`interruptible_delay`] sleeping through `sleep`
pub fn interruptible_delay_with(
    sleep: &mut impl Sleep,
    total: Duration,
    chunk: Duration,
    mut cancelled: impl FnMut() -> bool,
) -> bool {
    let zero = Duration::from_ticks(0);
    let chunk = if chunk == zero { total } else { chunk };
    let mut remaining = total;

    loop {
        if cancelled() {
            return true;
        }
        if remaining == zero {
            return false;
        }
        let step = chunk.min(remaining);
        sleep.sleep(step);
        remaining -= step;
    }
}
