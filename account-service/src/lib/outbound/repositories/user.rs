use std::str::FromStr;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::account::errors::AccountError;
use crate::account::models::DisplayName;
use crate::account::models::EmailAddress;
use crate::account::models::Role;
use crate::account::models::User;
use crate::account::models::UserId;
use crate::account::ports::UserRepository;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &PgRow) -> Result<User, AccountError> {
        let id: String = Self::column(row, "id")?;
        let name: String = Self::column(row, "name")?;
        let email: String = Self::column(row, "email")?;
        let password_hash: String = Self::column(row, "password_hash")?;
        let role: String = Self::column(row, "role")?;

        Ok(User {
            id: UserId::new(id),
            name: DisplayName::new(name)?,
            email: EmailAddress::new(email)?,
            password_hash,
            role: Role::from_str(&role)?,
        })
    }

    fn column(row: &PgRow, name: &str) -> Result<String, AccountError> {
        row.try_get(name)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, AccountError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id.as_str())
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                // The unique index is the enforcement point for the
                // lookup-then-insert race on register
                if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
                    return AccountError::EmailAlreadyInUse(user.email.as_str().to_string());
                }
            }
            AccountError::DatabaseError(e.to_string())
        })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, role
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<bool, AccountError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_email(&self, email: &str) -> Result<bool, AccountError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .execute(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
