//! REST API types for the upload page.
//!
//! `POST /upload` answers `{"message": ...}` on success and
//! `{"error": ...}` with a 4xx/5xx status otherwise.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::ServerError;
use crate::import::ImportSummary;

/// Body of `POST /upload` responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadReply {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            message: None,
            error: Some(error.into()),
        }
    }
}

impl From<ImportSummary> for UploadReply {
    fn from(summary: ImportSummary) -> Self {
        UploadReply::message(format!("Imported {} transactions into Notion", summary.rows))
    }
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Import(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status(), Json(UploadReply::error(self.to_string()))).into_response()
    }
}
