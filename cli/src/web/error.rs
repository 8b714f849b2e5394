use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use medcrew_core::IntakeError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error(transparent)]
    InvalidInput(#[from] IntakeError),
    #[error("An error occurred: {0:#}")]
    Diagnosis(anyhow::Error),
    #[error("An error occurred: {0:#}")]
    Report(anyhow::Error),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WebError::Diagnosis(_) | WebError::Report(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            WebError::InvalidInput(_) => "INVALID_INPUT",
            WebError::Diagnosis(_) => "DIAGNOSIS_FAILED",
            WebError::Report(_) => "REPORT_FAILED",
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if !matches!(self, WebError::InvalidInput(_)) {
            tracing::error!(code = self.code(), "{}", self);
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code(),
                message: self.to_string(),
            },
        };
        (self.status(), Json(body)).into_response()
    }
}
