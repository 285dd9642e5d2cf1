// Copyright 2024-2025 Irreducible Inc.

use nix::sys::time::TimeValLike;
use nix::time::{clock_gettime, ClockId};

use crate::errors::err_msg;

/// Seconds on the monotonic clock. Only differences between two readings are
/// meaningful; the origin is unspecified.
pub fn now_seconds() -> f64 {
    match clock_gettime(ClockId::CLOCK_MONOTONIC) {
        Ok(now) => now.num_nanoseconds() as f64 / 1e9,
        Err(err) => {
            err_msg!("failed to read the monotonic clock: {err}");
            0.0
        }
    }
}
