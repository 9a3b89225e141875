//! Domain types shared by every Signals crate.
//!
//! - [`stage::Stage`] and [`verdict::Verdict`]: closed enumerations for the
//!   research lifecycle and its outcome.
//! - [`job::Job`]: the tracked research job ("dashboard") record, and
//!   [`digest::ReportDigest`], the findings stored on it once complete.
//! - [`registry::JobRegistry`]: the in-process job table.
//! - [`error::CoreError`]: the domain error taxonomy.

pub mod digest;
pub mod error;
pub mod job;
pub mod job_events;
pub mod registry;
pub mod stage;
pub mod types;
pub mod verdict;
