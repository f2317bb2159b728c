//! Hybrid Logical Clock timestamps for causal ordering.
//!
//! Combines physical time with a logical counter to ensure:
//! - Monotonicity (always increasing, even under wall-clock regression)
//! - Causality (if A happens-before B, then ts(A) < ts(B))
//! - Bounded drift from physical time
//!
//! Based on the HLC algorithm from "Logical Physical Clocks" (Kulkarni et al.).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Hybrid Logical Clock timestamp.
///
/// Consists of:
/// - `wall_time`: Milliseconds since Unix epoch (physical component)
/// - `logical`: Logical counter for events at the same wall time
///
/// This pair is the sole total order over all journalled entities: every
/// event's timestamp compares strictly greater than its causing command's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HybridTimestamp {
    /// Physical time component (milliseconds since Unix epoch).
    wall_time: u64,
    /// Logical counter for ordering events at the same wall time.
    logical: u32,
}

/// Current wall time in milliseconds, clamped at zero if the system clock
/// reports a time before the Unix epoch.
fn wall_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}

impl HybridTimestamp {
    /// The smallest possible timestamp.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a timestamp at the current wall time with a zero counter.
    #[must_use]
    pub fn now() -> Self {
        Self {
            wall_time: wall_now(),
            logical: 0,
        }
    }

    /// Creates a timestamp from components.
    #[must_use]
    pub const fn new(wall_time: u64, logical: u32) -> Self {
        Self { wall_time, logical }
    }

    /// Returns the wall time component.
    #[must_use]
    pub const fn wall_time(&self) -> u64 {
        self.wall_time
    }

    /// Returns the logical counter.
    #[must_use]
    pub const fn logical(&self) -> u32 {
        self.logical
    }

    /// Generates the next timestamp from the local physical clock alone.
    ///
    /// If wall time has advanced, the counter resets; otherwise (same tick
    /// or clock regression) the counter increments. The result is always
    /// strictly greater than `self`.
    #[must_use]
    pub fn tick(&self) -> Self {
        let now = wall_now();
        if now > self.wall_time {
            Self {
                wall_time: now,
                logical: 0,
            }
        } else {
            Self {
                wall_time: self.wall_time,
                logical: self.logical.saturating_add(1),
            }
        }
    }

    /// Advances past a received timestamp.
    ///
    /// The result is strictly greater than both `self` and `other`, which is
    /// what guarantees an event's timestamp lands after its causing command
    /// and after all siblings produced in the same physical instant.
    #[must_use]
    pub fn receive(&self, other: &Self) -> Self {
        let now = wall_now();
        let max_wall = now.max(self.wall_time).max(other.wall_time);

        let logical = if max_wall == self.wall_time && max_wall == other.wall_time {
            self.logical.max(other.logical).saturating_add(1)
        } else if max_wall == self.wall_time {
            self.logical.saturating_add(1)
        } else if max_wall == other.wall_time {
            other.logical.saturating_add(1)
        } else {
            0
        };

        Self {
            wall_time: max_wall,
            logical,
        }
    }

    /// Returns true if this timestamp is causally before the other.
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self < other
    }

    /// Returns true if this timestamp is causally after the other.
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self > other
    }
}

impl Default for HybridTimestamp {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for HybridTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.wall_time, self.logical)
    }
}

impl PartialOrd for HybridTimestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HybridTimestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.wall_time.cmp(&other.wall_time) {
            Ordering::Equal => self.logical.cmp(&other.logical),
            other => other,
        }
    }
}
