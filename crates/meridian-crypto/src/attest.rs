//! Attestation proofs: Ed25519 signatures over a domain-separated
//! source→destination grant.

use async_trait::async_trait;
use ed25519_dalek::{Signature, Signer, Verifier};

use meridian_core::error::BoundaryError;
use meridian_core::traits::AttestationVerifier;
use meridian_core::types::NodeId;

use crate::error::CryptoError;
use crate::keys::{AuthorityKeypair, AuthorityPublicKey};

/// Domain-separation prefix for attestation signatures. Prevents a proof
/// from being replayed as any other Meridian signature type.
pub const ATTEST_DOMAIN: &[u8] = b"meridian-attest-v1";

/// Canonical signing payload binding a transfer grant to its endpoints.
/// Fields are length-framed so `("ab","c")` and `("a","bc")` cannot
/// collide.
pub fn attestation_payload(source: &NodeId, destination: &NodeId) -> Vec<u8> {
    let mut payload =
        Vec::with_capacity(ATTEST_DOMAIN.len() + 8 + source.as_bytes().len() + destination.as_bytes().len());
    payload.extend_from_slice(ATTEST_DOMAIN);
    payload.extend_from_slice(&(source.as_bytes().len() as u32).to_be_bytes());
    payload.extend_from_slice(source.as_bytes());
    payload.extend_from_slice(&(destination.as_bytes().len() as u32).to_be_bytes());
    payload.extend_from_slice(destination.as_bytes());
    payload
}

/// Issue a proof authorizing a source→destination transfer (64 bytes).
pub fn issue_proof(keypair: &AuthorityKeypair, source: &NodeId, destination: &NodeId) -> Vec<u8> {
    let payload = attestation_payload(source, destination);
    keypair.signing_key().sign(&payload).to_bytes().to_vec()
}

/// Verify a proof against the authority's public key.
pub fn verify_proof(
    authority: &AuthorityPublicKey,
    source: &NodeId,
    destination: &NodeId,
    proof: &[u8],
) -> Result<(), CryptoError> {
    let bytes: [u8; 64] = proof.try_into().map_err(|_| {
        CryptoError::InvalidInput(format!("proof must be 64 bytes, got {}", proof.len()))
    })?;
    let signature = Signature::from_bytes(&bytes);
    let payload = attestation_payload(source, destination);
    authority
        .verifying_key()
        .verify(&payload, &signature)
        .map_err(|_| CryptoError::SignatureVerificationFailed)
}

/// [`AttestationVerifier`] backed by a local Ed25519 authority key.
///
/// Malformed or unverifiable proofs report `authorized = false` rather
/// than an error: the verifier itself worked, the proof did not.
pub struct Ed25519AttestationVerifier {
    authority: AuthorityPublicKey,
}

impl Ed25519AttestationVerifier {
    pub fn new(authority: AuthorityPublicKey) -> Self {
        Self { authority }
    }
}

#[async_trait]
impl AttestationVerifier for Ed25519AttestationVerifier {
    async fn verify(
        &self,
        source: &NodeId,
        destination: &NodeId,
        proof: &[u8],
    ) -> Result<bool, BoundaryError> {
        match verify_proof(&self.authority, source, destination, proof) {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::debug!(%source, %destination, error = %e, "attestation proof rejected");
                Ok(false)
            }
        }
    }
}
