use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use crate::account::ports::AuthenticationPort;
use crate::account::ports::UserRepository;
use crate::inbound::http::router::AppState;

/// Delete a user by email. Idempotent: absence is success, so this always
/// answers 200.
pub async fn delete_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    Path(email): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    tracing::info!(email = %email, "Deleting user");

    state
        .auth_service
        .delete_by_email(&email)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}
