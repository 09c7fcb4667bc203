use std::collections::HashMap;
use std::sync::Arc;

use account_service::account::errors::AccountError;
use account_service::account::models::User;
use account_service::account::models::UserId;
use account_service::account::ports::UserRepository;
use account_service::account::service::AuthenticationService;
use account_service::inbound::http::router::create_router;
use async_trait::async_trait;
use auth::TokenCodec;
use chrono::Duration;
use tokio::sync::RwLock;

pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server on a random port, backed by
/// an in-memory user store.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::new());
        let token_codec = TokenCodec::new(TEST_JWT_SECRET, Duration::days(365));
        let auth_service = Arc::new(AuthenticationService::new(repository, token_codec));
        let application = create_router(auth_service);

        tokio::spawn(async move {
            axum::serve(listener, application)
                .await
                .expect("Server crashed");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
        }
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }
}

/// In-memory user store with the same unique-email behavior as the
/// Postgres repository.
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, AccountError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AccountError::EmailAlreadyInUse(
                user.email.as_str().to_string(),
            ));
        }
        users.insert(user.id.to_string(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountError> {
        let users = self.users.read().await;
        Ok(users.get(id.as_str()).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email.as_str() == email).cloned())
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<bool, AccountError> {
        let mut users = self.users.write().await;
        Ok(users.remove(id.as_str()).is_some())
    }

    async fn delete_by_email(&self, email: &str) -> Result<bool, AccountError> {
        let mut users = self.users.write().await;
        let id = users
            .values()
            .find(|u| u.email.as_str() == email)
            .map(|u| u.id.to_string());
        match id {
            Some(id) => Ok(users.remove(&id).is_some()),
            None => Ok(false),
        }
    }
}
