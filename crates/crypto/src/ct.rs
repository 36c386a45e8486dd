//! Constant-time comparison
//!
//! `subtle`'s slice comparison returns early when lengths differ. Protection
//! values arrive from the peer, so a length mismatch must not be observable
//! either: the loop below always runs over the full locally computed value.

use subtle::{Choice, ConstantTimeEq};

/// Compare a locally computed value with a received one in constant time
///
/// Running time depends only on `expected.len()`, never on the contents of
/// `received` or on where the two differ.
pub fn constant_time_eq(expected: &[u8], received: &[u8]) -> bool {
    let mut equal: Choice = (expected.len() as u64).ct_eq(&(received.len() as u64));

    for (i, byte) in expected.iter().enumerate() {
        let other = if received.is_empty() {
            0
        } else {
            received[i % received.len()]
        };
        equal &= byte.ct_eq(&other);
    }

    equal.into()
}
