use signals_core::error::CoreError;

use crate::delivery::DeliveryError;

/// Failure of a notification operation: either the job-level request was
/// rejected, or the messaging provider failed to deliver.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl NotifyError {
    /// Whether the operation was rejected before anything was sent.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Core(_))
    }
}
