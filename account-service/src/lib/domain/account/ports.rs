use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::account::models::PublicUser;
use crate::account::models::RegisterCommand;
use crate::account::models::User;
use crate::account::models::UserId;
use crate::account::models::UserToken;

/// Port for the authentication service operations.
///
/// Each operation is stateless between calls; the only persistent state is
/// the user store behind `UserRepository`.
#[async_trait]
pub trait AuthenticationPort: Send + Sync + 'static {
    /// Register a new user and issue a session token.
    ///
    /// # Errors
    /// * `EmailAlreadyInUse` - A user with this email already exists
    /// * `DatabaseError` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<UserToken, AccountError>;

    /// Authenticate credentials and issue a session token.
    ///
    /// Unknown email and wrong password are indistinguishable to the
    /// caller, to avoid leaking account existence.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No such email, or the password does not match
    /// * `DatabaseError` - Store operation failed
    async fn login(&self, email: &str, password: &str) -> Result<UserToken, AccountError>;

    /// Verify a session token and re-fetch the user it names.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature mismatch, malformed, or expired
    /// * `SubjectNotFound` - The token is valid but the user was deleted
    /// * `DatabaseError` - Store operation failed
    async fn validate(&self, token: &str) -> Result<UserToken, AccountError>;

    /// Retrieve the public view of a user by id.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Store operation failed
    async fn get_by_id(&self, id: &UserId) -> Result<PublicUser, AccountError>;

    /// Delete a user by id. Deleting an absent user is a logged no-op.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn delete_by_id(&self, id: &UserId) -> Result<(), AccountError>;

    /// Delete a user by email. Deleting an absent user is a logged no-op.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn delete_by_email(&self, email: &str) -> Result<(), AccountError>;
}

/// Persistence operations for the user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// The store's unique-email constraint is the enforcement point for the
    /// lookup-then-insert race: of two concurrent inserts with the same
    /// email, exactly one succeeds.
    ///
    /// # Errors
    /// * `EmailAlreadyInUse` - Unique constraint violation on email
    /// * `DatabaseError` - Store operation failed
    async fn create(&self, user: User) -> Result<User, AccountError>;

    /// Retrieve a user by id (None if not found).
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountError>;

    /// Retrieve a user by email (None if not found).
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountError>;

    /// Remove a user by id.
    ///
    /// # Returns
    /// True if a user was removed, false if none existed
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn delete_by_id(&self, id: &UserId) -> Result<bool, AccountError>;

    /// Remove a user by email.
    ///
    /// # Returns
    /// True if a user was removed, false if none existed
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn delete_by_email(&self, email: &str) -> Result<bool, AccountError>;
}
