use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::QueryError;
use crate::services::weather::WeatherError;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
pub const NOT_FOUND_MESSAGE: &str = "Not Found";

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Failure of a report handler. Detail stays in the server log; clients only
/// ever see the generic 500 body.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report {report} failed: {source}")]
    Database {
        report: &'static str,
        #[source]
        source: QueryError,
    },
    #[error("weather upstream failed: {0}")]
    Upstream(#[from] WeatherError),
    #[error("invalid order date range: {0}")]
    InvalidDateRange(String),
}

impl ReportError {
    pub fn database(report: &'static str) -> impl FnOnce(QueryError) -> Self {
        move |source| Self::Database { report, source }
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        match &self {
            ReportError::Database { report, source } => {
                tracing::error!(report = %report, error = %source, "database error");
            }
            ReportError::Upstream(err) => {
                tracing::error!(error = %err, "weather upstream error");
            }
            ReportError::InvalidDateRange(detail) => {
                tracing::error!(detail = %detail, "cannot derive weather date range");
            }
        }
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new(INTERNAL_ERROR_MESSAGE)),
        )
            .into_response()
    }
}

pub type ReportResult<T> = Result<T, ReportError>;

pub async fn not_found(uri: axum::http::Uri) -> (StatusCode, Json<ErrorBody>) {
    tracing::debug!(path = %uri.path(), "route not found");
    (StatusCode::NOT_FOUND, Json(ErrorBody::new(NOT_FOUND_MESSAGE)))
}
