//! Request extractors whose rejections go through [`AppError`].
//!
//! Axum's own `Json` and `Path` extractors reject with plain-text bodies
//! (and 422 for type mismatches). These wrappers keep every error response
//! in the `{error, code}` shape.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use signals_core::types::JobId;

use crate::error::AppError;

/// JSON body extractor. Malformed or wrongly typed bodies become
/// [`AppError::BadRequest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(AppError::from)?;
        Ok(Self(value))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// The `{id}` segment of a job route.
///
/// A segment that is not a UUID cannot name a registered job, so it is
/// reported as an unknown job.
#[derive(Debug, Clone, Copy)]
pub struct JobPath(pub JobId);

impl<S> FromRequestParts<S> for JobPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        crate::handlers::parse_job_id(&raw).map(Self)
    }
}
