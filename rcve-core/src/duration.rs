//! Stable duration type for config and wire format.
//!
//! [`DurationSecs`] serializes as a plain integer (seconds), not as serde's
//! internal `{"secs": N, "nanos": N}` format.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Duration in seconds with a stable JSON serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationSecs(u64);

impl DurationSecs {
    /// Create from seconds.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the value in seconds.
    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Convert to `std::time::Duration`.
    pub fn to_std(&self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl From<Duration> for DurationSecs {
    fn from(d: Duration) -> Self {
        Self(d.as_secs())
    }
}

impl From<DurationSecs> for Duration {
    fn from(d: DurationSecs) -> Self {
        Duration::from_secs(d.0)
    }
}

impl fmt::Display for DurationSecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
