//! Authentication primitives library
//!
//! Provides the building blocks for the account service:
//! - Password hashing (SHA-256 digest, hex-encoded)
//! - Signed, expiring session tokens (JWT)
//! - Unique, time-ordered id generation (snowflake layout)
//!
//! These types carry no I/O and no service-specific rules. The account
//! service composes them into its own authentication flows.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let digest = hasher.hash("my_password");
//! assert!(hasher.verify("my_password", &digest));
//! assert!(!hasher.verify("wrong_password", &digest));
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::TokenCodec;
//! use chrono::Duration;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!", Duration::days(365));
//! let token = codec.issue("1849181289181233152").unwrap();
//! let claims = codec.verify(&token).unwrap();
//! assert_eq!(claims.sub, "1849181289181233152");
//! ```
//!
//! ## Id Generation
//! ```
//! use auth::SnowflakeGenerator;
//!
//! let generator = SnowflakeGenerator::new(0, 1);
//! let first = generator.next_id();
//! let second = generator.next_id();
//! assert_ne!(first, second);
//! ```

pub mod password;
pub mod snowflake;
pub mod token;

// Re-export commonly used items
pub use password::PasswordHasher;
pub use snowflake::SnowflakeGenerator;
pub use token::TokenClaims;
pub use token::TokenCodec;
pub use token::TokenError;
