use crate::core::{MatchingSummary, MatrixRows, SinkhornReport};
use crate::models::domain::Match;
use serde::{Deserialize, Serialize};

/// Response for the run matching endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMatchingResponse {
    pub run_id: String,
    pub matches: Vec<Match>,
    pub report: SinkhornReport,
    pub summary: MatchingSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix: Option<MatrixRows>,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn bad_request(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code: 400,
        }
    }
}

impl From<&crate::error::MatchingError> for ErrorResponse {
    fn from(err: &crate::error::MatchingError) -> Self {
        Self::bad_request(err.kind(), err.to_string())
    }
}
