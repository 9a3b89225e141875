pub mod notify;
pub mod signup;
pub mod webhook;

use signals_core::types::JobId;

use crate::error::AppError;

/// Parse a job id from a path segment or request body. Anything that is
/// not a UUID is an unknown job.
pub(crate) fn parse_job_id(raw: &str) -> Result<JobId, AppError> {
    JobId::parse_str(raw.trim()).map_err(|_| AppError::UnknownJobId(raw.trim().to_string()))
}
