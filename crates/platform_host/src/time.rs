//! Wall-clock reads and the stacking stamp issued to windows.

use std::cell::Cell;
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

thread_local! {
    static HIGHEST_STAMP_MS: Cell<u64> = const { Cell::new(0) };
}

/// Current unix time in milliseconds. Clocks before the epoch read as 0.
pub fn unix_time_ms_now() -> u64 {
    #[cfg(target_arch = "wasm32")]
    let now = js_sys::Date::now().max(0.0) as u64;

    #[cfg(not(target_arch = "wasm32"))]
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as u64);

    now
}

/// Issues a millisecond stamp greater than `floor` and greater than every stamp issued before
/// on this thread.
///
/// The stamp tracks wall-clock time while the clock is ahead. Callers pass the highest stamp
/// they already hold (for example one restored from storage) as `floor`, and later stamps stay
/// above it even when it came from a faster clock.
pub fn next_stamp_ms_after(floor: u64) -> u64 {
    let now = unix_time_ms_now();
    HIGHEST_STAMP_MS.with(|highest| {
        let stamp = now
            .max(highest.get().saturating_add(1))
            .max(floor.saturating_add(1));
        highest.set(stamp);
        stamp
    })
}
