//! Intermediate step outputs and the final research report.

use serde::{Deserialize, Serialize};
use signals_core::digest::{DiscussionLink, ReportDigest};
use signals_core::types::{JobId, Timestamp};
use signals_core::verdict::Verdict;

use crate::collaborators::Discussion;

/// Output of the idea extraction step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaProfile {
    /// One or two sentence statement of the idea.
    pub idea: String,
    pub keywords: Vec<String>,
    pub industry: String,
}

impl IdeaProfile {
    /// Query string for discussion search.
    pub fn search_query(&self) -> String {
        if self.keywords.is_empty() {
            self.idea.clone()
        } else {
            self.keywords.join(" ")
        }
    }
}

/// Output of the market analysis step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysis {
    pub verdict: Verdict,
    pub summary: String,
    pub sentiment: String,
    pub opportunities: Vec<String>,
    pub risks: Vec<String>,
    pub recommendations: Vec<String>,
    pub competitors: Vec<String>,
}

impl MarketAnalysis {
    /// Substitute used when the analysis call fails or its answer is
    /// unusable.
    pub fn inconclusive() -> Self {
        Self {
            verdict: Verdict::NeedsResearch,
            summary: "The market analysis was inconclusive.".into(),
            sentiment: "neutral".into(),
            opportunities: Vec::new(),
            risks: Vec::new(),
            recommendations: vec![
                "Gather more evidence by interviewing potential customers before investing further."
                    .into(),
            ],
            competitors: Vec::new(),
        }
    }
}

/// Final aggregate of one research run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchReport {
    pub job_id: JobId,
    pub idea: IdeaProfile,
    pub discussions: Vec<Discussion>,
    pub analysis: MarketAnalysis,
    pub generated_at: Timestamp,
}

impl ResearchReport {
    /// The parts of the report shown to the recipient.
    pub fn digest(&self) -> ReportDigest {
        ReportDigest {
            idea: self.idea.idea.clone(),
            summary: self.analysis.summary.clone(),
            sentiment: self.analysis.sentiment.clone(),
            opportunities: self.analysis.opportunities.clone(),
            risks: self.analysis.risks.clone(),
            recommendations: self.analysis.recommendations.clone(),
            competitors: self.analysis.competitors.clone(),
            discussions: self
                .discussions
                .iter()
                .map(|d| DiscussionLink {
                    title: d.title.clone(),
                    url: d.url.clone(),
                    points: d.points,
                    num_comments: d.num_comments,
                })
                .collect(),
        }
    }
}

pub fn build_report(
    job_id: JobId,
    idea: IdeaProfile,
    discussions: Vec<Discussion>,
    analysis: MarketAnalysis,
) -> ResearchReport {
    ResearchReport {
        job_id,
        idea,
        discussions,
        analysis,
        generated_at: chrono::Utc::now(),
    }
}
