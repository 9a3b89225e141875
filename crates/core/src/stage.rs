//! Research job lifecycle stages.
//!
//! [`Stage`] is a closed, totally ordered enumeration. The derived `Ord`
//! follows declaration order, so `a < b` means `a` comes earlier in the
//! pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ParsingInput,
    SearchingPapers,
    SearchingDiscussions,
    FindingCompetitors,
    AnalyzingMarket,
    GeneratingReport,
    Complete,
}

impl Stage {
    /// Every stage, in pipeline order.
    pub const ALL: [Stage; 7] = [
        Stage::ParsingInput,
        Stage::SearchingPapers,
        Stage::SearchingDiscussions,
        Stage::FindingCompetitors,
        Stage::AnalyzingMarket,
        Stage::GeneratingReport,
        Stage::Complete,
    ];

    /// The stage every new job starts in.
    pub const fn first() -> Self {
        Stage::ParsingInput
    }

    /// Parse a wire/stage string. Values outside the enumeration are
    /// rejected outright; no case folding or fuzzy matching.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| CoreError::InvalidStage(s.to_string()))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ParsingInput => "parsing_input",
            Self::SearchingPapers => "searching_papers",
            Self::SearchingDiscussions => "searching_discussions",
            Self::FindingCompetitors => "finding_competitors",
            Self::AnalyzingMarket => "analyzing_market",
            Self::GeneratingReport => "generating_report",
            Self::Complete => "complete",
        }
    }

    /// Short human-readable label, used in notification step lists.
    pub fn label(self) -> &'static str {
        match self {
            Self::ParsingInput => "Understanding your idea",
            Self::SearchingPapers => "Searching research papers",
            Self::SearchingDiscussions => "Searching community discussions",
            Self::FindingCompetitors => "Finding competitors",
            Self::AnalyzingMarket => "Analyzing the market",
            Self::GeneratingReport => "Generating your report",
            Self::Complete => "Complete",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::ParsingInput => "Extracting the core idea, keywords and industry from the request",
            Self::SearchingPapers => "Looking for academic and technical literature on the topic",
            Self::SearchingDiscussions => "Collecting relevant Hacker News discussions",
            Self::FindingCompetitors => "Identifying existing products and competitors",
            Self::AnalyzingMarket => "Assessing opportunities, risks and market saturation",
            Self::GeneratingReport => "Aggregating findings into the final report",
            Self::Complete => "The report is ready on the dashboard",
        }
    }

    /// Zero-based position in [`Stage::ALL`].
    pub fn position(self) -> usize {
        self as usize
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Complete
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
