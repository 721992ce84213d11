use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::time::Duration;

use meridian_core::time::duration_secs;
use meridian_core::types::NodeId;
use meridian_crypto::hashing::Digest;

/// Fixed-width digest identifying a derived route for caching purposes.
///
/// A fingerprint is a pure function of (source, destination, nonce, time
/// bucket): re-deriving with identical inputs within the same bucket
/// yields the same value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(Digest);

impl Fingerprint {
    pub fn from_digest(digest: Digest) -> Self {
        Self(digest)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode from a 64-character hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(hex_str)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// Short form in logs, full hex on the wire.
impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.to_hex()[..8])
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A routing decision: the ordered node path plus the metadata bound to
/// it. Routes are value types and are never mutated once cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    /// Ordered nodes from source to destination (inclusive).
    pub path: Vec<NodeId>,
    /// Content-derived identity of this route.
    pub fingerprint: Fingerprint,
    /// Reliability estimate in [0, 1]; higher is better.
    pub stability: f64,
    /// Instant after which the route is logically dead.
    pub expires_at: DateTime<Utc>,
    /// Estimated transit latency, set by the latency model.
    #[serde(with = "duration_secs")]
    pub latency: Duration,
}

impl Route {
    /// First node of the path.
    pub fn source(&self) -> Option<&NodeId> {
        self.path.first()
    }

    /// Last node of the path.
    pub fn destination(&self) -> Option<&NodeId> {
        self.path.last()
    }

    /// Number of hops (edges) in the path.
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Whether the route is logically dead at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Copy of this route carrying the given latency estimate.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}
