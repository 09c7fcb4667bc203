use thiserror::Error;

/// Error type for token operations.
///
/// Signature, format, and expiry failures are collapsed into the single
/// `Invalid` kind; the caller decides how to surface it.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Invalid token: {0}")]
    Invalid(String),
}
