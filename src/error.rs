//! Error types
//!
//! The scoring engine has exactly one failure mode: a caller asking for a
//! criterion the scheme does not define. Everything else here belongs to the
//! surfaces around it (CLI, HTTP, configuration).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::types::CriterionId;

/// Misuse of the scoring engine. Never raised for thin or empty drafts.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("criterion '{criterion}' is not defined by scheme '{scheme}'")]
    UnknownCriterion {
        criterion: CriterionId,
        scheme: String,
    },
    #[error("unknown criterion key '{0}' (expected excellence, impact or implementation)")]
    UnknownCriterionKey(String),
}

/// Errors surfaced by the HTTP boundary
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("unknown scheme '{id}' (available: {available})")]
    UnknownScheme { id: String, available: String },
    #[error("draft too short ({chars} characters, {words} words); at least {min_chars} characters required")]
    DraftTooShort {
        chars: usize,
        words: usize,
        min_chars: usize,
    },
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) | ApiError::UnknownScheme { .. } => StatusCode::BAD_REQUEST,
            ApiError::DraftTooShort { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Scoring(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::DraftTooShort { words, .. } => {
                json!({ "error": self.to_string(), "word_count": words })
            }
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

/// Top-level error for the binary
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("scoring error: {0}")]
    Scoring(#[from] ScoringError),
    #[error("unknown scheme '{0}'; run `grantcraft schemes` to list them")]
    UnknownScheme(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(ApiError::InvalidBody("x".into()).status(), StatusCode::BAD_REQUEST);
        let unknown = ApiError::UnknownScheme {
            id: "x".into(),
            available: "horizon_europe_ria_ia".into(),
        };
        assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
        assert!(unknown.to_string().contains("available: horizon_europe_ria_ia"));
        let short = ApiError::DraftTooShort { chars: 3, words: 1, min_chars: 50 };
        assert_eq!(short.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_unknown_criterion_message_names_scheme() {
        let err = ScoringError::UnknownCriterion {
            criterion: CriterionId::Impact,
            scheme: "eic_pathfinder".into(),
        };
        assert_eq!(
            err.to_string(),
            "criterion 'impact' is not defined by scheme 'eic_pathfinder'"
        );
    }
}
