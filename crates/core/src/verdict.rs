//! Three-way classification attached to a completed research job.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Real demand and traction signals.
    Validated,
    /// Insufficient or mixed evidence.
    #[default]
    NeedsResearch,
    /// Saturated market with many competitors.
    Crowded,
}

impl Verdict {
    /// Interpret a verdict string from a caller or an LLM response.
    ///
    /// Case, spaces and hyphens are ignored (`"NEEDS_RESEARCH"`,
    /// `"needs research"` and `"needs-research"` are all accepted). Any
    /// unrecognized value maps to [`Verdict::NeedsResearch`].
    pub fn from_lenient(s: &str) -> Self {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "validated" => Self::Validated,
            "crowded" | "crowded_market" => Self::Crowded,
            _ => Self::NeedsResearch,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validated => "validated",
            Self::NeedsResearch => "needs_research",
            Self::Crowded => "crowded",
        }
    }

    /// Badge text shown in the completion email.
    pub fn label(self) -> &'static str {
        match self {
            Self::Validated => "VALIDATED",
            Self::NeedsResearch => "NEEDS RESEARCH",
            Self::Crowded => "CROWDED MARKET",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
