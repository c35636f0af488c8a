//! HTTP server implementation.
//!
//! This module provides the axum-based server that exposes the REST API:
//! auth, task CRUD, the rendered task list, and the analytics dashboard
//! endpoint.

pub mod analytics;
pub mod auth;
pub mod tasks;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post, put};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::AuthKeys;
use crate::db::Database;

/// Server state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Reference to the task database.
    pub db: Arc<Database>,
    /// Token signing/verification keys.
    pub auth: AuthKeys,
}

impl AppState {
    pub fn new(db: Arc<Database>, auth: AuthKeys) -> Self {
        Self { db, auth }
    }
}

/// Health check response.
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "message": "Not found" })),
    )
}

/// Build the router with all routes.
pub fn build_router(state: AppState) -> Router {
    // Permissive CORS, matching the original server's open policy
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Auth routes
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        // Task routes
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route(
            "/api/tasks/{task_id}",
            put(tasks::update).delete(tasks::delete),
        )
        .route("/api/tasks/{task_id}/toggle", post(tasks::toggle))
        .route(
            "/api/tasks/{task_id}/subtasks/{subtask_id}/toggle",
            post(tasks::toggle_subtask),
        )
        // Analytics
        .route("/api/analytics", get(analytics::dashboard))
        .route("/api/health", get(health))
        .fallback(not_found)
        // Add middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server on the specified port and serve until ctrl-c.
pub async fn serve(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    info!("Server listening on http://{}", bound_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
