use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Coarse time bucket used as a derivation input.
///
/// Bucketing bounds the determinism window: two derivations with the same
/// (source, destination, nonce) agree on fingerprint and path exactly when
/// they fall into the same bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeBucket(u64);

impl TimeBucket {
    /// Bucket containing the given instant for the given width.
    /// A zero width is treated as one second.
    pub fn at(instant: DateTime<Utc>, width: Duration) -> Self {
        let width_secs = width.as_secs().max(1);
        let secs = instant.timestamp().max(0) as u64;
        Self(secs / width_secs)
    }

    /// Bucket containing the current instant.
    pub fn current(width: Duration) -> Self {
        Self::at(Utc::now(), width)
    }

    /// Construct a bucket directly from its index. Useful for pinning the
    /// derivation window.
    pub fn from_index(index: u64) -> Self {
        Self(index)
    }

    /// The bucket index.
    pub fn index(&self) -> u64 {
        self.0
    }

    /// Big-endian encoding used in derivation preimages.
    pub fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

/// Serde helper to serialize/deserialize `std::time::Duration` as seconds (u64).
pub mod duration_secs {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
