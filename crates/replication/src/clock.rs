//! Coordinator-side wall clock for write timestamps.

use std::time::{SystemTime, UNIX_EPOCH};

/// Monotonic-enough millisecond wall clock, stamped at the coordinator
/// at write initiation. Used only as an LWW tiebreak, never for
/// causal ordering.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the unix epoch")
        .as_millis() as u64
}
