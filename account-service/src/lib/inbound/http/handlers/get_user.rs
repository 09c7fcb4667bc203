use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::PublicUser;
use crate::account::models::UserId;
use crate::account::ports::AuthenticationPort;
use crate::account::ports::UserRepository;
use crate::inbound::http::router::AppState;

pub async fn get_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<PublicUser>, ApiError> {
    tracing::info!(user_id = %id, "Getting user");

    state
        .auth_service
        .get_by_id(&UserId::new(id))
        .await
        .map_err(ApiError::from)
        .map(|user| ApiSuccess::new(StatusCode::OK, user))
}
