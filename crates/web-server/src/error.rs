use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_types::HorizonKey;
use focus_core::FocusError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("only BTC is supported, got {0}")]
    BtcOnly(String),

    #[error("invalid horizon: {0}")]
    InvalidHorizon(String),

    #[error("build error: {0}")]
    Build(String),
}

impl From<FocusError> for AppError {
    fn from(err: FocusError) -> Self {
        match err {
            FocusError::BtcOnly(symbol) => AppError::BtcOnly(symbol),
            // Everything else (missing history, candle source failures) is a
            // pipeline abort surfaced as BUILD_ERROR. InvalidHorizon never
            // comes from the pipeline: the handler parses `focus` before the
            // builder sees it.
            other => AppError::Build(other.to_string()),
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
///
/// Validation errors come back as 400 with the offending input echoed;
/// pipeline aborts come back as 500 `BUILD_ERROR` with the message intact.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BtcOnly(symbol) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "BTC_ONLY", "symbol": symbol }),
            ),
            AppError::InvalidHorizon(focus) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "INVALID_HORIZON",
                    "focus": focus,
                    "valid": HorizonKey::valid_keys(),
                }),
            ),
            AppError::Build(message) => {
                tracing::error!(error = %message, "Focus pack build failed.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "BUILD_ERROR", "message": message }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
