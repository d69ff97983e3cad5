use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{get, patch, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::Authorizer;
use crate::config::AppConfig;
use crate::database::CarStore;
use crate::error::ApiError;
use crate::handlers::cars;
use crate::middleware::api_key_middleware;

/// Dependencies shared by every request. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub authorizer: Authorizer,
    pub store: Arc<dyn CarStore>,
    /// Same prefix the routes are mounted under; used to build `Location`.
    pub route_prefix: Arc<str>,
}

impl AppState {
    pub fn new(authorizer: Authorizer, store: Arc<dyn CarStore>, route_prefix: &str) -> Self {
        Self {
            authorizer,
            store,
            route_prefix: Arc::from(route_prefix),
        }
    }
}

/// Assemble the full router: public endpoints plus the key-protected
/// `/cars` routes mounted under the state's route prefix.
pub fn build_router(state: AppState, config: &AppConfig) -> Router {
    let cars = cars_routes(state.clone());

    let mut app = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health));

    app = if state.route_prefix.is_empty() {
        app.merge(cars)
    } else {
        app.nest(&state.route_prefix, cars)
    };

    // Global middleware
    app = app.layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }
    if config.security.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }
    app
}

fn cars_routes(state: AppState) -> Router {
    Router::new()
        // Unsupported methods on a known path answer like a route miss
        .route(
            "/cars",
            get(cars::car_list).post(cars::car_create).fallback(not_found),
        )
        .route("/cars/validate", patch(cars::cars_validate).fallback(not_found))
        .route(
            "/cars/:id",
            put(cars::car_update).delete(cars::car_delete).fallback(not_found),
        )
        // route_layer: unknown paths fall through to 404 without a key check
        .route_layer(from_fn_with_state(state.clone(), api_key_middleware))
        .with_state(state)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Cars API",
        "version": version,
        "endpoints": {
            "health": "/health (public)",
            "cars": "/cars, /cars/:id, /cars/validate (x-api-key required)",
        }
    }))
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();
    Json(json!({ "status": "ok", "timestamp": now }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryCarStore;
    use crate::secrets::{StaticSecretProvider, API_KEY_SECRET};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn test_app(prefix: &str) -> Router {
        let secrets = StaticSecretProvider::new().with_secret(API_KEY_SECRET, "key");
        let state = AppState::new(
            Authorizer::new(Arc::new(secrets)),
            Arc::new(InMemoryCarStore::new()),
            prefix,
        );
        build_router(state, &AppConfig::development())
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = test_app("")
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn cars_require_key_before_anything_else() {
        let response = test_app("")
            .oneshot(
                Request::post("/cars")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unsupported_methods_are_route_misses() {
        let app = test_app("");
        for (method, uri) in [
            ("DELETE", "/cars/validate".to_string()),
            ("PUT", "/cars/validate".to_string()),
            ("GET", format!("/cars/{}", uuid::Uuid::new_v4())),
        ] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(&uri)
                        .header("x-api-key", "key")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{} {}", method, uri);
        }
    }

    #[tokio::test]
    async fn routes_honour_prefix() {
        let app = test_app("/api");
        let prefixed = app
            .clone()
            .oneshot(
                Request::get("/api/cars")
                    .header("x-api-key", "key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(prefixed.status(), StatusCode::OK);

        let bare = app
            .oneshot(
                Request::get("/cars")
                    .header("x-api-key", "key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(bare.status(), StatusCode::NOT_FOUND);
    }
}
