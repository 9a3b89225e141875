//! Signals research pipeline.
//!
//! [`Orchestrator`] runs the fixed research sequence for one job (idea
//! extraction, discussion search, market analysis, report generation,
//! delivery) against the external collaborators described in
//! [`collaborators`], reporting progress through the
//! [`ProgressReporter`](signals_events::ProgressReporter) after each step.

pub mod clients;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod prompts;
pub mod report;

pub use collaborators::{
    Collaborators, Discussion, DiscussionSearch, DocumentParser, LanguageModel, WebCrawler,
};
pub use config::{CollaboratorConfig, PipelineConfig};
pub use error::CollaboratorError;
pub use orchestrator::{Orchestrator, PipelineOutcome, ResearchRequest};
pub use report::{IdeaProfile, MarketAnalysis, ResearchReport};
