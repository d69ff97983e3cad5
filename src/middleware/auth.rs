use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::app::AppState;
use crate::error::ApiError;

/// API key middleware for the `/cars` routes.
///
/// Runs before any path or body extraction, so a rejected request never
/// reaches validation or the store.
pub async fn api_key_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.authorizer.is_authorized(request.headers()).await {
        warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "Unauthorized request"
        );
        return ApiError::Unauthorized.into_response();
    }

    next.run(request).await
}
