use sha2::Digest;
use sha2::Sha256;

/// Password hashing implementation.
///
/// Computes a SHA-256 digest over the UTF-8 bytes of the plaintext and
/// hex-encodes it. The transform is deterministic and unsalted: identical
/// plaintexts always yield identical digests. That keeps hash/verify total
/// functions, at the cost of rainbow-table resistance; a production
/// deployment should swap in a salted KDF behind the same contract.
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password.
    ///
    /// # Arguments
    /// * `plaintext` - Plaintext password to hash
    ///
    /// # Returns
    /// Hex-encoded SHA-256 digest
    pub fn hash(&self, plaintext: &str) -> String {
        let digest = Sha256::digest(plaintext.as_bytes());
        hex::encode(digest)
    }

    /// Verify a password against a stored digest.
    ///
    /// Recomputes the digest and compares for exact equality.
    ///
    /// # Arguments
    /// * `plaintext` - Plaintext password to verify
    /// * `digest` - Stored hex-encoded digest
    ///
    /// # Returns
    /// True if the password matches, false otherwise
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        self.hash(plaintext) == digest
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
