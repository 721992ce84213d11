pub mod attest;
pub mod error;
pub mod hashing;
pub mod keys;

pub use attest::{issue_proof, verify_proof, Ed25519AttestationVerifier};
pub use error::CryptoError;
pub use hashing::{digest, keyed_mix, Digest, DigestStream};
pub use keys::{AuthorityKeypair, AuthorityPublicKey};
