use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{self, Environment};
use crate::database::{Executor, OrganizationRepository, PostingRepository, UserRepository};
use crate::handlers::{applications, organizations, postings, users};
use crate::middleware::{authenticate, authorize};

/// Shared by every handler: the executor and the token secret.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Executor>,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(db: Arc<dyn Executor>, jwt_secret: impl Into<Arc<str>>) -> Self {
        Self {
            db,
            jwt_secret: jwt_secret.into(),
        }
    }

    pub fn organizations(&self) -> OrganizationRepository {
        OrganizationRepository::new(self.db.clone())
    }

    pub fn postings(&self) -> PostingRepository {
        PostingRepository::new(self.db.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.db.clone())
    }
}

pub fn app(state: AppState) -> Router {
    let config = config::config();

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        .merge(protected_routes())
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/organizations", get(organizations::list))
        .route("/organizations/:handle", get(organizations::get))
        .route("/postings", get(postings::list))
        .route("/postings/:id", get(postings::get))
}

/// Every route here goes through the authorization rules.
fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/organizations", post(organizations::create))
        .route(
            "/organizations/:handle",
            axum::routing::patch(organizations::update).delete(organizations::remove),
        )
        .route("/postings", post(postings::create))
        .route(
            "/postings/:id",
            axum::routing::patch(postings::update).delete(postings::remove),
        )
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/:username",
            get(users::get).patch(users::update).delete(users::remove),
        )
        .route(
            "/applications/:username",
            get(applications::list).post(applications::apply),
        )
        .route_layer(middleware::from_fn(authorize))
}

fn cors_layer() -> CorsLayer {
    let security = &config::config().security;

    if !security.enable_cors {
        return CorsLayer::new();
    }
    if matches!(config::config().environment, Environment::Development) {
        return CorsLayer::permissive();
    }

    let origins = security
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();
    CorsLayer::new().allow_origin(origins)
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Jobly API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "organizations": "/organizations[/:handle] (read public, write admin)",
                "postings": "/postings[/:id] (read public)",
                "users": "/users[/:username] (admin)",
                "applications": "/applications/:username (self or admin)",
                "health": "/health (public)"
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.db.query("SELECT 1", &[]).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
