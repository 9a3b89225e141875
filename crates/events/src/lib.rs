//! Signals notification infrastructure.
//!
//! - [`templates`]: pure renderers for signup, progress and completion
//!   emails.
//! - [`delivery`]: the [`MessagingProvider`] seam and its Resend, SMTP and
//!   in-memory outbox implementations.
//! - [`NotificationDispatcher`]: renders a template for a job and sends it.
//! - [`ProgressReporter`]: validates stage transitions, updates the job
//!   registry and triggers notifications.
//! - [`EventBus`] / [`EventHistory`]: in-process lifecycle event fan-out and
//!   the per-job history built from it.

pub mod bus;
pub mod delivery;
pub mod dispatcher;
pub mod error;
pub mod history;
pub mod reporter;
pub mod templates;

pub use bus::{EventBus, JobEvent};
pub use delivery::email::{EmailConfig, SmtpProvider};
pub use delivery::outbox::OutboxProvider;
pub use delivery::resend::{ResendConfig, ResendProvider};
pub use delivery::{DeliveryError, InboundMessage, MessageId, MessagingProvider, OutboundMessage};
pub use dispatcher::NotificationDispatcher;
pub use error::NotifyError;
pub use history::EventHistory;
pub use reporter::{ProgressOutcome, ProgressReporter};
