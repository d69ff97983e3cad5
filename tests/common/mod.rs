#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use cars_api::auth::Authorizer;
use cars_api::config::AppConfig;
use cars_api::database::{CarStore, InMemoryCarStore};
use cars_api::secrets::{SecretProvider, StaticSecretProvider, API_KEY_SECRET};
use cars_api::{build_router, AppState};

pub const API_KEY: &str = "test-api-key";

pub struct TestServer {
    pub base_url: String,
    pub store: Arc<InMemoryCarStore>,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request builder with the valid API key already attached.
    pub fn authed(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("x-api-key", API_KEY)
    }
}

/// Serve the real router on an ephemeral port, backed by an in-memory store
/// and a fixed API key.
pub async fn spawn_server() -> TestServer {
    let store = Arc::new(InMemoryCarStore::new());
    let secrets = StaticSecretProvider::new().with_secret(API_KEY_SECRET, API_KEY);
    let base_url = spawn_with(Arc::new(secrets), store.clone(), "").await;

    TestServer {
        base_url,
        store,
        client: reqwest::Client::new(),
    }
}

/// Serve the router with arbitrary collaborators; returns the base URL.
pub async fn spawn_with(
    secrets: Arc<dyn SecretProvider>,
    store: Arc<dyn CarStore>,
    prefix: &str,
) -> String {
    let state = AppState::new(Authorizer::new(secrets), store, prefix);
    let app = build_router(state, &AppConfig::development());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr: SocketAddr = listener.local_addr().expect("local_addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    format!("http://{}", addr)
}
