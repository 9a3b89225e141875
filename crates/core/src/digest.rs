//! Reader-facing summary of a finished research run.
//!
//! Stored on the completed [`Job`](crate::job::Job) and rendered into the
//! completion email, so the findings reach the recipient and stay
//! retrievable at the job's result URL.

use serde::{Deserialize, Serialize};

/// One discussion thread cited in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionLink {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub points: u64,
    #[serde(default)]
    pub num_comments: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportDigest {
    /// The idea as understood by the pipeline.
    pub idea: String,
    pub summary: String,
    pub sentiment: String,
    pub opportunities: Vec<String>,
    pub risks: Vec<String>,
    pub recommendations: Vec<String>,
    pub competitors: Vec<String>,
    pub discussions: Vec<DiscussionLink>,
}

impl ReportDigest {
    /// True when there is nothing worth rendering.
    pub fn is_empty(&self) -> bool {
        self.summary.trim().is_empty()
            && self.opportunities.is_empty()
            && self.risks.is_empty()
            && self.recommendations.is_empty()
            && self.competitors.is_empty()
            && self.discussions.is_empty()
    }
}
