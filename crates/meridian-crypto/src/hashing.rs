//! BLAKE3 digests and the keyed mixing pass used by route derivation.
//!
//! The mixing pass is a second, domain-separated BLAKE3 application: given
//! only a primary digest an observer cannot predict its mixed form without
//! the derived key, yet the transformation is fully deterministic.

/// BLAKE3 digest (32 bytes).
pub type Digest = [u8; 32];

/// Key-derivation material for the mixing pass. Changing this value
/// changes every fingerprint the engine produces.
const MIX_KEY_MATERIAL: &[u8] = b"meridian route mix";

/// Digest arbitrary data using BLAKE3.
pub fn digest(data: &[u8]) -> Digest {
    *blake3::hash(data).as_bytes()
}

/// Apply the keyed mixing pass under a domain-separation context.
///
/// Deterministic: the same (context, input) pair always yields the same
/// output. Distinct contexts yield independent mixings of the same input.
pub fn keyed_mix(context: &str, input: &Digest) -> Digest {
    let key = blake3::derive_key(context, MIX_KEY_MATERIAL);
    *blake3::keyed_hash(&key, input).as_bytes()
}

/// Deterministic byte stream seeded from a digest, backed by the BLAKE3
/// extendable output. Never runs dry; the routing walk draws one byte per
/// hop decision.
pub struct DigestStream {
    reader: blake3::OutputReader,
}

impl DigestStream {
    /// Seed a stream from a digest.
    pub fn new(seed: &Digest) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(seed);
        Self {
            reader: hasher.finalize_xof(),
        }
    }

    /// Next byte of the stream.
    pub fn next_byte(&mut self) -> u8 {
        let mut buf = [0u8; 1];
        self.reader.fill(&mut buf);
        buf[0]
    }
}
