//! Session identity.
//!
//! The fronting application authenticates users and forwards the identity in
//! a trusted header. Requests without it are rejected before reaching the
//! handlers.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::response::ApiError;
use crate::http::server::AppState;

/// Authenticated session user, attached as a request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser(pub String);

pub async fn session_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let user_header = state.inner.load().config.session.user_header.clone();

    let user = request
        .headers()
        .get(user_header.as_str())
        .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string);

    match user {
        Some(user) => {
            request.extensions_mut().insert(SessionUser(user));
            next.run(request).await
        }
        None => {
            tracing::debug!(header = %user_header, "Rejected request without session user");
            ApiError::unauthorized("no authenticated session").into_response()
        }
    }
}
