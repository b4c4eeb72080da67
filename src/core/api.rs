//! HTTP API for GrantCraft
//!
//! Endpoints:
//! - GET /health - Health check
//! - GET /schemes - Registered funding schemes
//! - POST /review - Score a draft and return the reviewer report

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{ReviewConfig, SchemeRegistry};
use crate::core::{catalogue, count_words, ReportAssembler};
use crate::error::ApiError;
use crate::types::{ReviewerReport, SchemeDescriptor};

/// App state
#[derive(Debug)]
pub struct AppState {
    pub registry: SchemeRegistry,
    /// Trimmed drafts shorter than this are refused before scoring
    pub min_draft_chars: usize,
    pub assembler: ReportAssembler,
}

impl AppState {
    pub fn new(registry: SchemeRegistry, review: &ReviewConfig) -> Self {
        Self {
            registry,
            min_draft_chars: review.min_draft_chars,
            assembler: ReportAssembler::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SchemeRegistry::builtin(), &ReviewConfig::default())
    }
}

/// Review request
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    #[serde(alias = "draftContent")]
    pub draft_content: String,
    #[serde(default, alias = "schemeId")]
    pub scheme_id: Option<String>,
    /// Opaque id echoed back for correlation with stored drafts
    #[serde(default, alias = "draftId")]
    pub draft_id: Option<String>,
}

/// Review response
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub report: ReviewerReport,
    pub meta: ReviewMeta,
}

#[derive(Debug, Serialize)]
pub struct ReviewMeta {
    pub draft_id: Option<String>,
    pub scheme_id: String,
    pub generated_at: DateTime<Utc>,
    pub draft_word_count: usize,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub signals: usize,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/schemes", get(list_schemes))
        .route("/review", post(review))
        .with_state(Arc::new(state))
}

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        signals: catalogue().len(),
    })
}

async fn list_schemes(State(state): State<Arc<AppState>>) -> Json<Vec<SchemeDescriptor>> {
    Json(state.registry.all().cloned().collect())
}

/// Score a draft
async fn review(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejected review body");
        ApiError::InvalidBody(rejection.body_text())
    })?;

    let trimmed = req.draft_content.trim();
    let chars = trimmed.chars().count();
    if chars < state.min_draft_chars {
        warn!(chars, min = state.min_draft_chars, "draft too short to score");
        return Err(ApiError::DraftTooShort {
            chars,
            words: count_words(trimmed),
            min_chars: state.min_draft_chars,
        });
    }

    let scheme = state
        .registry
        .resolve(req.scheme_id.as_deref())
        .ok_or_else(|| ApiError::UnknownScheme {
            id: req
                .scheme_id
                .clone()
                .unwrap_or_else(|| state.registry.default_id().to_string()),
            available: state
                .registry
                .all()
                .map(|s| s.id.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })?;

    let report = state.assembler.generate(&req.draft_content, scheme)?;
    info!(
        scheme = %scheme.id,
        draft_id = req.draft_id.as_deref().unwrap_or("-"),
        words = report.draft_word_count,
        overall = report.overall_score,
        passed = report.overall_passed,
        "review generated"
    );

    let meta = ReviewMeta {
        draft_id: req.draft_id,
        scheme_id: scheme.id.clone(),
        generated_at: report.generated_at,
        draft_word_count: report.draft_word_count,
    };
    Ok(Json(ReviewResponse { report, meta }))
}

/// Run the API server
pub async fn run_server(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let schemes = state.registry.all().count();
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, schemes, "GrantCraft API listening");
    info!("  GET  /health   - Health check");
    info!("  GET  /schemes  - Registered schemes");
    info!("  POST /review   - Score a draft");
    axum::serve(listener, router).await
}
