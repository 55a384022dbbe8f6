use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::auth::{self, Decision, Principal};
use crate::error::ApiError;

/// Attaches a `Principal` to the request when a valid bearer token is presented.
///
/// A missing or invalid token is not an error here; the request simply proceeds
/// anonymously and `authorize` decides whether that is acceptable.
pub async fn authenticate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        match auth::verify_jwt(token, &state.jwt_secret) {
            Ok(claims) => {
                request.extensions_mut().insert(Principal::from(claims));
            }
            Err(e) => tracing::debug!("ignoring credential: {}", e),
        }
    }

    next.run(request).await
}

/// Applies the route authorization rules to protected routes.
pub async fn authorize(request: Request, next: Next) -> Response {
    let decision = auth::decide(
        request.extensions().get::<Principal>(),
        request.method(),
        request.uri().path(),
    );

    match decision {
        Decision::Allow => next.run(request).await,
        Decision::Unauthenticated => {
            tracing::debug!(method = %request.method(), path = request.uri().path(), "unauthenticated");
            ApiError::unauthorized("Unauthorized").into_response()
        }
        Decision::Forbidden => {
            tracing::debug!(
                method = %request.method(),
                path = request.uri().path(),
                username = request.extensions().get::<Principal>().map(|p| p.username.as_str()),
                "forbidden"
            );
            ApiError::forbidden("Forbidden").into_response()
        }
    }
}

/// Extract the token from an `Authorization: Bearer …` header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}
