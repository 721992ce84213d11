/// Failure reported by a boundary collaborator (attestation verifier or
/// stability monitor). The engine maps it onto the matching gate error.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct BoundaryError {
    message: String,
}

impl BoundaryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for BoundaryError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for BoundaryError {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
