use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use signals_core::error::CoreError;
use signals_events::{DeliveryError, NotifyError};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`DeliveryError`] for messaging
/// provider failures, and adds HTTP-specific variants. Implements
/// [`IntoResponse`] to produce consistent `{error, code}` JSON responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The messaging provider failed to deliver a notification.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// A job id that is not a UUID, so no job can match it.
    #[error("Unknown job: {0}")]
    UnknownJobId(String),

    /// The request body could not be decoded.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<NotifyError> for AppError {
    fn from(err: NotifyError) -> Self {
        match err {
            NotifyError::Core(e) => Self::Core(e),
            NotifyError::Delivery(e) => Self::Delivery(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::UnknownJob(_) => {
                    (StatusCode::NOT_FOUND, "UNKNOWN_JOB", core.to_string())
                }
                CoreError::InvalidStage(_) => {
                    (StatusCode::BAD_REQUEST, "INVALID_STAGE", core.to_string())
                }
                CoreError::MissingFields(_) => {
                    (StatusCode::BAD_REQUEST, "MISSING_FIELDS", core.to_string())
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            },

            // --- Messaging provider errors ---
            AppError::Delivery(err) => {
                tracing::error!(error = %err, "Notification delivery error");
                (
                    StatusCode::BAD_GATEWAY,
                    "DELIVERY_ERROR",
                    "Notification delivery failed".to_string(),
                )
            }

            // --- HTTP-specific errors ---
            AppError::UnknownJobId(_) => (StatusCode::NOT_FOUND, "UNKNOWN_JOB", self.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
