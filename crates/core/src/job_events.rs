//! Event type names for job lifecycle events.
//!
//! Published on the event bus by the progress reporter and recorded in the
//! per-job event history.

/// A job was registered by an inbound trigger.
pub const EVENT_JOB_CREATED: &str = "job.created";

/// A job advanced to a new stage or progress value.
pub const EVENT_JOB_PROGRESS: &str = "job.progress";

/// A job reached the `complete` stage.
pub const EVENT_JOB_READY: &str = "job.ready";

/// A job terminated early without reaching `complete`.
pub const EVENT_JOB_FAILED: &str = "job.failed";

/// A notification email was handed to the messaging provider.
pub const EVENT_NOTIFICATION_SENT: &str = "notification.sent";

/// A progress notification was suppressed because the job is muted.
pub const EVENT_NOTIFICATION_SKIPPED: &str = "notification.skipped";

/// The messaging provider rejected or failed a notification.
pub const EVENT_NOTIFICATION_FAILED: &str = "notification.failed";
