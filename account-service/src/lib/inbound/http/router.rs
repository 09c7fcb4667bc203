use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::delete_user::delete_user;
use super::handlers::get_user::get_user;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::validate_token::validate_token;
use crate::account::ports::UserRepository;
use crate::account::service::AuthenticationService;

pub struct AppState<R: UserRepository> {
    pub auth_service: Arc<AuthenticationService<R>>,
}

impl<R: UserRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
        }
    }
}

pub fn create_router<R: UserRepository>(auth_service: Arc<AuthenticationService<R>>) -> Router {
    let state = AppState { auth_service };

    // The admin GET takes a user id and the admin DELETE takes an email;
    // both share the same path segment.
    let routes = Router::new()
        .route("/authentication/register", post(register::<R>))
        .route("/authentication/login", post(login::<R>))
        .route("/authentication/validate/:token", get(validate_token::<R>))
        .route(
            "/authentication/admin/:key",
            get(get_user::<R>).delete(delete_user::<R>),
        );

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    routes
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
