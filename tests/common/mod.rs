#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;

use jobly_api::app::{app, AppState};
use jobly_api::auth::{generate_jwt, Claims};
use jobly_api::database::Executor;

pub use jobly_api::testing::ScriptedExecutor;

pub const SECRET: &str = "integration-secret";

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Serve the router over `db` on a free local port for the rest of the test.
pub async fn spawn_server(db: Arc<dyn Executor>) -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;

    let router = app(AppState::new(db, SECRET));
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
    })
}

pub fn token(username: &str, admin: bool) -> String {
    generate_jwt(&Claims::new(username, admin), SECRET).expect("token")
}

pub fn organization_row(handle: &str, name: &str) -> Value {
    serde_json::json!({
        "handle": handle,
        "name": name,
        "description": "Test organization",
        "numEmployees": 10,
        "logoUrl": null
    })
}

pub fn posting_row(id: i32, title: &str) -> Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "salary": 100000,
        "equity": 0.1,
        "organizationHandle": "acme"
    })
}
