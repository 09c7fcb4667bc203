use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::SnowflakeGenerator;
use auth::TokenCodec;
use chrono::DateTime;
use chrono::Utc;

use crate::account::errors::AccountError;
use crate::account::models::PublicUser;
use crate::account::models::RegisterCommand;
use crate::account::models::User;
use crate::account::models::UserId;
use crate::account::models::UserToken;
use crate::account::ports::AuthenticationPort;
use crate::account::ports::UserRepository;

/// Domain service implementing the credential and token lifecycle.
///
/// Orchestrates the password hasher, id generator, token codec, and user
/// store; the only component with actual business rules.
pub struct AuthenticationService<R>
where
    R: UserRepository,
{
    repository: Arc<R>,
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
    id_generator: SnowflakeGenerator,
}

impl<R> AuthenticationService<R>
where
    R: UserRepository,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `token_codec` - Configured token codec (secret and lifetime)
    pub fn new(repository: Arc<R>, token_codec: TokenCodec) -> Self {
        Self {
            repository,
            password_hasher: PasswordHasher::new(),
            token_codec,
            id_generator: SnowflakeGenerator::new(0, 1),
        }
    }

    /// Issue a token for the user and bundle it with the public view.
    ///
    /// Reads the expiry back out of the freshly minted token; the unverified
    /// decode is safe here because the token never left this process.
    fn issue_user_token(&self, user: &User) -> Result<UserToken, AccountError> {
        let token = self
            .token_codec
            .issue(user.id.as_str())
            .map_err(|e| AccountError::Unknown(format!("Token signing failed: {}", e)))?;

        let claims = self
            .token_codec
            .decode(&token)
            .map_err(|e| AccountError::Unknown(format!("Token read-back failed: {}", e)))?;

        Ok(UserToken {
            user: PublicUser::from(user),
            token,
            expires_at: expiry_timestamp(claims.exp)?,
        })
    }
}

fn expiry_timestamp(exp: i64) -> Result<DateTime<Utc>, AccountError> {
    DateTime::from_timestamp(exp, 0)
        .ok_or_else(|| AccountError::Unknown(format!("Token expiry out of range: {}", exp)))
}

#[async_trait]
impl<R> AuthenticationPort for AuthenticationService<R>
where
    R: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<UserToken, AccountError> {
        // Pre-check for a friendly conflict; the store's unique constraint
        // still catches the lookup-then-insert race.
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            tracing::info!(email = %command.email, "Email already in use");
            return Err(AccountError::EmailAlreadyInUse(
                command.email.as_str().to_string(),
            ));
        }

        let user = User {
            id: UserId::new(self.id_generator.next_id()),
            name: command.name,
            email: command.email,
            password_hash: self.password_hasher.hash(&command.password),
            role: command.role,
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        self.issue_user_token(&created_user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<UserToken, AccountError> {
        let user = match self.repository.find_by_email(email).await? {
            Some(user) => user,
            None => {
                tracing::info!(email = %email, "Login with unknown email");
                return Err(AccountError::InvalidCredentials);
            }
        };

        if !self.password_hasher.verify(password, &user.password_hash) {
            tracing::info!(email = %email, "Login with wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        self.issue_user_token(&user)
    }

    async fn validate(&self, token: &str) -> Result<UserToken, AccountError> {
        let claims = self.token_codec.verify(token).map_err(|e| {
            tracing::info!(error = %e, "Token rejected");
            AccountError::InvalidToken(e)
        })?;

        let user_id = UserId::new(claims.sub.clone());
        let user = self
            .repository
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| {
                tracing::info!(subject = %claims.sub, "Valid token for missing user");
                AccountError::SubjectNotFound(claims.sub.clone())
            })?;

        Ok(UserToken {
            user: PublicUser::from(&user),
            token: token.to_string(),
            expires_at: expiry_timestamp(claims.exp)?,
        })
    }

    async fn get_by_id(&self, id: &UserId) -> Result<PublicUser, AccountError> {
        self.repository
            .find_by_id(id)
            .await?
            .map(|ref user| PublicUser::from(user))
            .ok_or_else(|| AccountError::NotFound(id.to_string()))
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<(), AccountError> {
        if self.repository.delete_by_id(id).await? {
            tracing::warn!(user_id = %id, "User deleted");
        } else {
            tracing::info!(user_id = %id, "No user to delete");
        }
        Ok(())
    }

    async fn delete_by_email(&self, email: &str) -> Result<(), AccountError> {
        if self.repository.delete_by_email(email).await? {
            tracing::warn!(email = %email, "User deleted");
        } else {
            tracing::info!(email = %email, "No user to delete");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use auth::TokenError;
    use chrono::Duration;
    use mockall::mock;

    use super::*;
    use crate::account::models::DisplayName;
    use crate::account::models::EmailAddress;
    use crate::account::models::Role;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, AccountError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountError>;
            async fn delete_by_id(&self, id: &UserId) -> Result<bool, AccountError>;
            async fn delete_by_email(&self, email: &str) -> Result<bool, AccountError>;
        }
    }

    fn service(repository: MockTestUserRepository) -> AuthenticationService<MockTestUserRepository> {
        AuthenticationService::new(
            Arc::new(repository),
            TokenCodec::new(SECRET, Duration::days(365)),
        )
    }

    fn stored_user(id: &str, email: &str, password: &str) -> User {
        User {
            id: UserId::new(id),
            name: DisplayName::new("John Doe".to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: PasswordHasher::new().hash(password),
            role: Role::Traveler,
        }
    }

    fn register_command(email: &str) -> RegisterCommand {
        RegisterCommand::new(
            DisplayName::new("John Doe".to_string()).unwrap(),
            EmailAddress::new(email.to_string()).unwrap(),
            "Password@123".to_string(),
            Role::Traveler,
        )
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .withf(|email| email == "john@test.dev")
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|user| {
                !user.id.as_str().is_empty()
                    && user.email.as_str() == "john@test.dev"
                    && user.password_hash != "Password@123"
            })
            .times(1)
            .returning(|user| Ok(user));

        let bundle = service(repository)
            .register(register_command("john@test.dev"))
            .await
            .expect("registration failed");

        assert_eq!(bundle.user.email, "john@test.dev");
        assert_eq!(bundle.user.role, Role::Traveler);
        assert!(!bundle.token.is_empty());
        assert!(bundle.expires_at > Utc::now());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(stored_user("1", "john@test.dev", "Password@123"))));
        repository.expect_create().times(0);

        let result = service(repository)
            .register(register_command("john@test.dev"))
            .await;

        assert!(matches!(result, Err(AccountError::EmailAlreadyInUse(_))));
    }

    #[tokio::test]
    async fn test_register_race_hits_unique_constraint() {
        let mut repository = MockTestUserRepository::new();

        // A concurrent registration slipped in between lookup and insert
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_create().times(1).returning(|user| {
            Err(AccountError::EmailAlreadyInUse(
                user.email.as_str().to_string(),
            ))
        });

        let result = service(repository)
            .register(register_command("john@test.dev"))
            .await;

        assert!(matches!(result, Err(AccountError::EmailAlreadyInUse(_))));
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .withf(|email| email == "john@test.dev")
            .times(1)
            .returning(|_| Ok(Some(stored_user("1", "john@test.dev", "Password@123"))));

        let bundle = service(repository)
            .login("john@test.dev", "Password@123")
            .await
            .expect("login failed");

        assert_eq!(bundle.user.id, "1");
        assert_eq!(bundle.user.email, "john@test.dev");
        assert!(!bundle.token.is_empty());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(stored_user("1", "john@test.dev", "Password@123"))));

        let result = service(repository).login("john@test.dev", "hunter2").await;

        assert!(matches!(result, Err(AccountError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(repository).login("ghost@test.dev", "Password@123").await;

        // Same error as a wrong password, to avoid leaking account existence
        assert!(matches!(result, Err(AccountError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_validate_issued_token() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .withf(|id| id.as_str() == "1")
            .times(1)
            .returning(|_| Ok(Some(stored_user("1", "john@test.dev", "Password@123"))));

        let codec = TokenCodec::new(SECRET, Duration::days(365));
        let token = codec.issue("1").unwrap();

        let bundle = service(repository)
            .validate(&token)
            .await
            .expect("validation failed");

        assert_eq!(bundle.user.id, "1");
        assert_eq!(bundle.token, token);
        assert!(bundle.expires_at > Utc::now());
    }

    #[tokio::test]
    async fn test_validate_garbage_token() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_id().times(0);

        let result = service(repository).validate("invalid_token").await;

        assert!(matches!(
            result,
            Err(AccountError::InvalidToken(TokenError::Invalid(_)))
        ));
    }

    #[tokio::test]
    async fn test_validate_expired_token() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_id().times(0);

        let expired_codec = TokenCodec::new(SECRET, Duration::minutes(-5));
        let token = expired_codec.issue("1").unwrap();

        let result = service(repository).validate(&token).await;

        assert!(matches!(result, Err(AccountError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_validate_token_for_deleted_user() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let codec = TokenCodec::new(SECRET, Duration::days(365));
        let token = codec.issue("1").unwrap();

        let result = service(repository).validate(&token).await;

        // The signature is still valid; the account is gone
        assert!(matches!(result, Err(AccountError::SubjectNotFound(_))));
    }

    #[tokio::test]
    async fn test_get_by_id_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(stored_user("1", "john@test.dev", "Password@123"))));

        let user = service(repository)
            .get_by_id(&UserId::new("1"))
            .await
            .expect("lookup failed");

        assert_eq!(user.id, "1");
        assert_eq!(user.email, "john@test.dev");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(repository).get_by_id(&UserId::new("missing")).await;

        assert!(matches!(result, Err(AccountError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_by_email_absent_is_noop() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_delete_by_email()
            .withf(|email| email == "ghost@test.dev")
            .times(2)
            .returning(|_| Ok(false));

        let service = service(repository);
        service.delete_by_email("ghost@test.dev").await.unwrap();
        service.delete_by_email("ghost@test.dev").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_delete_by_id()
            .withf(|id| id.as_str() == "1")
            .times(1)
            .returning(|_| Ok(true));

        service(repository)
            .delete_by_id(&UserId::new("1"))
            .await
            .unwrap();
    }
}
