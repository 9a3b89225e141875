//! Research pipeline orchestrator.
//!
//! Runs the research steps for one job in a fixed order and reports
//! progress after each:
//!
//! | Step               | Stage                   | Progress |
//! |--------------------|-------------------------|----------|
//! | Idea extraction    | `parsing_input`         | 15       |
//! | Discussion search  | `searching_discussions` | 40       |
//! | Market analysis    | `analyzing_market`      | 70       |
//! | Report generation  | `generating_report`     | 90       |
//! | Delivery           | `complete` (ready)      | 100      |
//!
//! Delivery sends the completion email with the report digest and stores
//! the digest on the job.
//!
//! Every collaborator failure degrades to a fixed default, so a run always
//! reaches report generation. Only delivery can fail, and that failure is
//! returned in the [`PipelineOutcome`] without undoing earlier progress.

use std::sync::{Arc, LazyLock};

use futures::future::join_all;
use regex::Regex;
use signals_core::stage::Stage;
use signals_core::types::JobId;
use signals_events::{MessageId, NotifyError, ProgressReporter};

use crate::collaborators::{Collaborators, Discussion};
use crate::config::PipelineConfig;
use crate::prompts::{self, ANALYSIS_SYSTEM, EXTRACTION_SYSTEM};
use crate::report::{build_report, IdeaProfile, MarketAnalysis, ResearchReport};

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"'()\[\]]+"#).expect("valid regex"));

const IDEA_PROGRESS: u8 = 15;
const DISCUSSIONS_PROGRESS: u8 = 40;
const ANALYSIS_PROGRESS: u8 = 70;
const REPORT_PROGRESS: u8 = 90;

// ---------------------------------------------------------------------------
// Request / outcome
// ---------------------------------------------------------------------------

/// Input of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchRequest {
    pub job_id: JobId,
    pub request_text: String,
    /// Page crawled for extra context.
    pub crawl_url: Option<String>,
    /// Documents (PDFs) parsed for extra context.
    pub document_urls: Vec<String>,
}

impl ResearchRequest {
    /// Build a request from free text. The first non-PDF link becomes the
    /// crawl target and every PDF link is parsed as a document.
    pub fn from_text(job_id: JobId, request_text: impl Into<String>) -> Self {
        let request_text = request_text.into();
        let mut crawl_url = None;
        let mut document_urls = Vec::new();

        for m in URL_RE.find_iter(&request_text) {
            let url = m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']);
            if url.to_ascii_lowercase().ends_with(".pdf") {
                if !document_urls.iter().any(|u| u == url) {
                    document_urls.push(url.to_string());
                }
            } else if crawl_url.is_none() {
                crawl_url = Some(url.to_string());
            }
        }

        Self {
            job_id,
            request_text,
            crawl_url,
            document_urls,
        }
    }
}

/// Result of a pipeline run.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub report: ResearchReport,
    /// Outcome of the completion notification.
    pub delivery: Result<MessageId, NotifyError>,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct Orchestrator {
    reporter: Arc<ProgressReporter>,
    collaborators: Collaborators,
    config: PipelineConfig,
}

impl Orchestrator {
    pub fn new(
        reporter: Arc<ProgressReporter>,
        collaborators: Collaborators,
        config: PipelineConfig,
    ) -> Self {
        Self {
            reporter,
            collaborators,
            config,
        }
    }

    pub async fn run(&self, request: ResearchRequest) -> PipelineOutcome {
        let job_id = request.job_id;
        tracing::info!(
            job_id = %job_id,
            crawl_url = ?request.crawl_url,
            documents = request.document_urls.len(),
            "Research pipeline started"
        );

        let idea = self.extract_idea(&request).await;
        self.progress(
            job_id,
            Stage::ParsingInput,
            IDEA_PROGRESS,
            Some(serde_json::json!({ "keywords": idea.keywords })),
        )
        .await;

        let discussions = self.search_discussions(job_id, &idea).await;
        let preview: Vec<serde_json::Value> = discussions
            .iter()
            .map(|d| serde_json::json!({ "title": d.title, "url": d.url }))
            .collect();
        self.progress(
            job_id,
            Stage::SearchingDiscussions,
            DISCUSSIONS_PROGRESS,
            Some(serde_json::json!({ "discussions": preview })),
        )
        .await;

        let analysis = self.analyze_market(job_id, &idea, &discussions).await;
        self.progress(
            job_id,
            Stage::AnalyzingMarket,
            ANALYSIS_PROGRESS,
            Some(serde_json::json!({ "verdict": analysis.verdict })),
        )
        .await;

        let report = build_report(job_id, idea, discussions, analysis);
        self.progress(job_id, Stage::GeneratingReport, REPORT_PROGRESS, None)
            .await;

        let result_url = self.config.result_url(job_id);
        let delivery = self
            .reporter
            .report_ready(
                job_id,
                Some(&result_url),
                Some(report.analysis.verdict.as_str()),
                Some(report.digest()),
            )
            .await;
        match &delivery {
            Ok(message_id) => tracing::info!(
                job_id = %job_id,
                verdict = %report.analysis.verdict,
                message_id = %message_id,
                "Research pipeline finished"
            ),
            Err(e) => tracing::error!(
                job_id = %job_id,
                error = %e,
                "Research report delivery failed"
            ),
        }

        PipelineOutcome { report, delivery }
    }

    // -- Steps --------------------------------------------------------------

    async fn extract_idea(&self, request: &ResearchRequest) -> IdeaProfile {
        let (web_context, document_context) =
            tokio::join!(self.crawl(request), self.parse_documents(request));

        let prompt =
            prompts::extraction_prompt(&request.request_text, &web_context, &document_context);
        let extracted = match self
            .collaborators
            .llm
            .complete_json(EXTRACTION_SYSTEM, &prompt)
            .await
        {
            Ok(raw) => prompts::parse_idea(&raw),
            Err(e) => Err(e),
        };

        match extracted {
            Ok(mut idea) => {
                if idea.keywords.is_empty() {
                    idea.keywords = self.config.fallback_keywords.clone();
                }
                if idea.industry.is_empty() {
                    idea.industry = self.config.fallback_industry.clone();
                }
                idea
            }
            Err(e) => {
                tracing::warn!(job_id = %request.job_id, error = %e, "Idea extraction failed, using raw input");
                IdeaProfile {
                    idea: request.request_text.trim().to_string(),
                    keywords: self.config.fallback_keywords.clone(),
                    industry: self.config.fallback_industry.clone(),
                }
            }
        }
    }

    async fn crawl(&self, request: &ResearchRequest) -> String {
        let Some(url) = &request.crawl_url else {
            return String::new();
        };
        match self.collaborators.crawler.scrape(url).await {
            Ok(markdown) => markdown,
            Err(e) => {
                tracing::warn!(job_id = %request.job_id, url = %url, error = %e, "Crawl failed");
                String::new()
            }
        }
    }

    async fn parse_documents(&self, request: &ResearchRequest) -> String {
        let parsed = join_all(
            request
                .document_urls
                .iter()
                .map(|url| self.collaborators.parser.parse(url)),
        )
        .await;

        let mut texts = Vec::new();
        for (url, result) in request.document_urls.iter().zip(parsed) {
            match result {
                Ok(text) if !text.trim().is_empty() => texts.push(text),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(job_id = %request.job_id, url = %url, error = %e, "Document parse failed");
                }
            }
        }
        texts.join("\n\n")
    }

    async fn search_discussions(&self, job_id: JobId, idea: &IdeaProfile) -> Vec<Discussion> {
        let query = idea.search_query();
        match self
            .collaborators
            .search
            .search(&query, self.config.discussion_limit)
            .await
        {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(job_id = %job_id, query = %query, error = %e, "Discussion search failed");
                Vec::new()
            }
        }
    }

    async fn analyze_market(
        &self,
        job_id: JobId,
        idea: &IdeaProfile,
        discussions: &[Discussion],
    ) -> MarketAnalysis {
        let prompt = prompts::analysis_prompt(idea, discussions);
        let analyzed = match self
            .collaborators
            .llm
            .complete_json(ANALYSIS_SYSTEM, &prompt)
            .await
        {
            Ok(raw) => prompts::parse_analysis(&raw),
            Err(e) => Err(e),
        };

        analyzed.unwrap_or_else(|e| {
            tracing::warn!(job_id = %job_id, error = %e, "Market analysis failed, verdict inconclusive");
            MarketAnalysis::inconclusive()
        })
    }

    /// Report progress; failures are logged and never stop the run.
    async fn progress(
        &self,
        job_id: JobId,
        stage: Stage,
        progress: u8,
        payload: Option<serde_json::Value>,
    ) {
        if let Err(e) = self
            .reporter
            .report_progress(job_id, stage.as_str(), progress, payload)
            .await
        {
            tracing::warn!(job_id = %job_id, stage = %stage, error = %e, "Progress report failed");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
