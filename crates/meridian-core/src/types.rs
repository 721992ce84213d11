use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node in the overlay topology.
///
/// Node identifiers are opaque strings. Ordering is lexical, which the
/// routing layer relies on for deterministic neighbor iteration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The raw identifier bytes, used in derivation preimages.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Returns true if the identifier is empty or whitespace-only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Priority class carried by a packet.
///
/// The set is closed: wire values that match none of the named classes
/// collapse into [`Priority::BestEffort`], so the engine never handles a
/// free-form string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    /// Preempts everything else on the link.
    Emergency,
    /// Latency-sensitive session traffic.
    Consciousness,
    /// Ordinary data transfer.
    Data,
    /// Catch-all for unknown or unspecified classes.
    BestEffort,
}

impl Priority {
    /// Parse a wire-level priority string. Unknown values fall back to
    /// [`Priority::BestEffort`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "emergency" => Self::Emergency,
            "consciousness" => Self::Consciousness,
            "data" => Self::Data,
            _ => Self::BestEffort,
        }
    }

    /// Canonical wire name of this class.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Emergency => "emergency",
            Self::Consciousness => "consciousness",
            Self::Data => "data",
            Self::BestEffort => "best-effort",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::BestEffort
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        p.as_str().to_string()
    }
}

/// Serde helper to carry opaque byte blobs as hex strings on the wire.
pub mod hex_bytes {
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map_err(serde::de::Error::custom)
    }
}

/// A routing work request. Immutable once received; discarded after the
/// engine produces a route or an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Packet {
    /// Originating node.
    pub source: NodeId,
    /// Target node.
    pub destination: NodeId,
    /// Opaque attestation proof; validity is judged by the verifier, not
    /// by the engine.
    #[serde(with = "hex_bytes")]
    pub proof: Vec<u8>,
    /// Caller-supplied freshness token.
    pub nonce: String,
    /// Priority class for latency annotation.
    #[serde(default)]
    pub priority: Priority,
}

impl Packet {
    /// Create a new packet.
    pub fn new(
        source: impl Into<NodeId>,
        destination: impl Into<NodeId>,
        proof: Vec<u8>,
        nonce: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            proof,
            nonce: nonce.into(),
            priority,
        }
    }
}
