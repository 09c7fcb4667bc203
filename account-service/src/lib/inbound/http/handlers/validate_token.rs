use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::UserToken;
use crate::account::ports::AuthenticationPort;
use crate::account::ports::UserRepository;
use crate::inbound::http::router::AppState;

pub async fn validate_token<R: UserRepository>(
    State(state): State<AppState<R>>,
    Path(token): Path<String>,
) -> Result<ApiSuccess<UserToken>, ApiError> {
    tracing::info!("Validating token");

    state
        .auth_service
        .validate(&token)
        .await
        .map_err(ApiError::from)
        .map(|bundle| ApiSuccess::new(StatusCode::OK, bundle))
}
