//! Health check routes.

use axum::{routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{AppState, APP_VERSION};

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthCheck {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthCheck {
    fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
            version: APP_VERSION.to_string(),
        }
    }
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up")),
    tag = "Analyses"
)]
pub(crate) async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck::healthy())
}
