//! Error types for the search service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors returned by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The `query` parameter is absent or blank.
    #[error("missing query parameter")]
    MissingQuery,
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingQuery => StatusCode::BAD_REQUEST,
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
