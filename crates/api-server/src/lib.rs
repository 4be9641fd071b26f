//! HTTP API for the investment analysis service.
//!
//! Thin wiring over [`InvestmentService`]: routes, response envelope, error
//! mapping, OpenAPI docs. All pipeline behavior lives in the orchestrator
//! crate; nothing here touches the store or the agents directly.

pub mod analysis_routes;
pub mod health_routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use agent_client::{roles, AgentClient, AgentClientConfig, RoleAgent};
use advisor_core::AnalysisError;
use analysis_orchestrator::{AgentSet, InvestmentService, ServiceConfig};
use report_store::ReportStore;

pub const APP_NAME: &str = "AI Investment Report Generator";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<InvestmentService>,
}

/// Uniform response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error type returned by route handlers.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::InvalidRequest(msg) => AppError::BadRequest(msg),
            AnalysisError::Config(msg) => AppError::BadRequest(msg),
            other => AppError::Internal(anyhow::anyhow!(other)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ApiResponse::error(message))).into_response()
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .context("API_PORT must be a port number")?,
        })
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        analysis_routes::create_analysis,
        analysis_routes::list_analyses,
        analysis_routes::get_analysis,
        analysis_routes::delete_analysis,
        analysis_routes::cleanup_analyses,
        analysis_routes::get_stats,
        health_routes::health_check,
    ),
    components(schemas(
        advisor_core::AnalysisRequest,
        advisor_core::AnalysisRecord,
        advisor_core::AnalysisSummary,
        advisor_core::AnalysisStatus,
        advisor_core::StockAnalysis,
        advisor_core::InvestmentRanking,
        advisor_core::PortfolioAllocation,
        advisor_core::ServiceStats,
    )),
    tags((name = "Analyses", description = "Three-phase investment analysis pipeline"))
)]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(health_routes::health_routes())
        .merge(analysis_routes::analysis_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Build the service from the environment and serve until shutdown.
pub async fn run_server() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let server_config = ServerConfig::from_env()?;
    let agent_config = AgentClientConfig::from_env()?;
    let client = AgentClient::new(agent_config);
    let model = client.default_model().to_string();

    let agents = AgentSet {
        stock_analyst: Arc::new(RoleAgent::new(client.clone(), roles::stock_analyst())),
        research_analyst: Arc::new(RoleAgent::new(client.clone(), roles::research_analyst())),
        investment_lead: Arc::new(RoleAgent::new(client, roles::investment_lead())),
    };

    let store = Arc::new(ReportStore::new());
    let service = Arc::new(InvestmentService::new(
        agents,
        store,
        ServiceConfig::new(model).with_env_overrides(),
    ));

    let app = build_router(AppState { service });

    let addr = format!("{}:{}", server_config.host, server_config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("{} v{} listening on {}", APP_NAME, APP_VERSION, addr);

    axum::serve(listener, app).await.context("Server error")
}
