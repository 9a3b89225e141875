//! LLM prompts for the idea extraction and market analysis steps, and the
//! parsing of their JSON answers.

use serde::Deserialize;
use signals_core::verdict::Verdict;

use crate::collaborators::Discussion;
use crate::error::CollaboratorError;
use crate::report::{IdeaProfile, MarketAnalysis};

const SERVICE: &str = "llm";

/// Maximum characters of crawled page content included in a prompt.
const MAX_WEB_CONTEXT_CHARS: usize = 12_000;

/// Maximum characters of parsed document text included in a prompt.
const MAX_DOCUMENT_CONTEXT_CHARS: usize = 4_000;

pub const EXTRACTION_SYSTEM: &str = "You are a startup analyst. You read rough idea descriptions \
and supporting material and restate the idea precisely. Always answer with a single JSON object.";

pub const ANALYSIS_SYSTEM: &str = "You are a market research analyst. You judge whether a product \
idea is validated, needs more research, or targets a crowded market, based on community \
discussions. Always answer with a single JSON object.";

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

pub fn extraction_prompt(request_text: &str, web_context: &str, document_context: &str) -> String {
    let mut context = String::new();
    if !web_context.trim().is_empty() {
        context.push_str("=== WEB PAGE ===\n");
        context.push_str(truncate_chars(web_context, MAX_WEB_CONTEXT_CHARS));
        context.push_str("\n\n");
    }
    if !document_context.trim().is_empty() {
        context.push_str("=== DOCUMENTS ===\n");
        context.push_str(truncate_chars(document_context, MAX_DOCUMENT_CONTEXT_CHARS));
        context.push_str("\n\n");
    }
    if context.is_empty() {
        context.push_str("No supporting material.\n\n");
    }

    format!(
        "REQUEST:\n{request_text}\n\nSUPPORTING MATERIAL:\n{context}\
TASK:\nReturn a JSON object with this structure:\n\
{{\n  \"idea\": \"one or two sentence statement of the idea\",\n  \
\"keywords\": [\"3 to 6 search keywords\"],\n  \
\"industry\": \"industry or market category\"\n}}\n\
Output valid JSON only, no markdown formatting."
    )
}

pub fn analysis_prompt(idea: &IdeaProfile, discussions: &[Discussion]) -> String {
    let context = if discussions.is_empty() {
        "No community discussions were found.".to_string()
    } else {
        discussions
            .iter()
            .map(|d| {
                format!(
                    "Title: {}\nPoints: {} | Comments: {}\nLink: {}",
                    d.title, d.points, d.num_comments, d.url
                )
            })
            .collect::<Vec<_>>()
            .join("\n---\n")
    };

    format!(
        "IDEA:\n{}\nINDUSTRY: {}\nKEYWORDS: {}\n\nDISCUSSIONS:\n{context}\n\n\
VERDICT CRITERIA:\n\
- validated: strong positive sentiment, real users, real problems, traction signals\n\
- needs_research: insufficient data, mixed signals or unclear positioning\n\
- crowded: many competitors, saturation, \"yet another X\" sentiment\n\n\
Return JSON:\n\
{{\n  \"verdict\": \"validated\" | \"needs_research\" | \"crowded\",\n  \
\"summary\": \"2-3 sentence executive summary\",\n  \
\"sentiment\": \"positive\" | \"negative\" | \"mixed\",\n  \
\"opportunities\": [\"...\"],\n  \"risks\": [\"...\"],\n  \
\"recommendations\": [\"...\"],\n  \"competitors\": [\"...\"]\n}}\n\
Output valid JSON only.",
        idea.idea,
        idea.industry,
        idea.keywords.join(", ")
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawIdea {
    #[serde(default)]
    idea: String,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    industry: String,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    verdict: Option<String>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    sentiment: String,
    #[serde(default)]
    opportunities: Vec<String>,
    #[serde(default, alias = "concerns")]
    risks: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(default, alias = "competitor_mentions")]
    competitors: Vec<String>,
}

/// Parse the idea extraction answer.
///
/// An answer without an idea statement is rejected. Missing keywords or
/// industry are left empty for the caller to fill in.
pub fn parse_idea(raw: &str) -> Result<IdeaProfile, CollaboratorError> {
    let parsed: RawIdea = parse_json(raw)?;
    let idea = parsed.idea.trim().to_string();
    if idea.is_empty() {
        return Err(CollaboratorError::Parse {
            service: SERVICE,
            message: "answer has no idea statement".into(),
        });
    }
    Ok(IdeaProfile {
        idea,
        keywords: clean_list(parsed.keywords),
        industry: parsed.industry.trim().to_string(),
    })
}

/// Parse the market analysis answer. Unknown verdicts become
/// `needs_research`.
pub fn parse_analysis(raw: &str) -> Result<MarketAnalysis, CollaboratorError> {
    let parsed: RawAnalysis = parse_json(raw)?;
    Ok(MarketAnalysis {
        verdict: parsed
            .verdict
            .as_deref()
            .map(Verdict::from_lenient)
            .unwrap_or_default(),
        summary: parsed.summary.trim().to_string(),
        sentiment: parsed.sentiment.trim().to_ascii_lowercase(),
        opportunities: clean_list(parsed.opportunities),
        risks: clean_list(parsed.risks),
        recommendations: clean_list(parsed.recommendations),
        competitors: clean_list(parsed.competitors),
    })
}

fn parse_json<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, CollaboratorError> {
    serde_json::from_str(strip_code_fence(raw)).map_err(|e| CollaboratorError::Parse {
        service: SERVICE,
        message: e.to_string(),
    })
}

/// Remove a surrounding markdown code fence (```json ... ```), if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_idea_accepts_fenced_json() {
        let raw = "```json\n{\"idea\": \" Lab gear exchange \", \"keywords\": [\"lab\", \"\", \"resale\"], \"industry\": \"biotech\"}\n```";
        let idea = parse_idea(raw).unwrap();
        assert_eq!(idea.idea, "Lab gear exchange");
        assert_eq!(idea.keywords, vec!["lab", "resale"]);
        assert_eq!(idea.industry, "biotech");
    }

    #[test]
    fn parse_idea_rejects_missing_idea() {
        assert_matches!(
            parse_idea("{\"keywords\": [\"x\"]}"),
            Err(CollaboratorError::Parse { .. })
        );
        assert_matches!(parse_idea("not json"), Err(CollaboratorError::Parse { .. }));
    }

    #[test]
    fn parse_analysis_maps_legacy_field_names() {
        let raw = r#"{
            "verdict": "CROWDED",
            "summary": "Many players.",
            "sentiment": "Mixed",
            "concerns": ["price war"],
            "competitor_mentions": ["Acme"],
            "opportunities": ["niche labs"]
        }"#;
        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.verdict, Verdict::Crowded);
        assert_eq!(analysis.sentiment, "mixed");
        assert_eq!(analysis.risks, vec!["price war"]);
        assert_eq!(analysis.competitors, vec!["Acme"]);
        assert!(analysis.recommendations.is_empty());
    }

    #[test]
    fn parse_analysis_defaults_unknown_verdict() {
        let analysis = parse_analysis("{\"verdict\": \"amazing\"}").unwrap();
        assert_eq!(analysis.verdict, Verdict::NeedsResearch);
    }

    #[test]
    fn strip_code_fence_variants() {
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  ```json\n{\"a\":1}```  "), "{\"a\":1}");
    }

    #[test]
    fn extraction_prompt_truncates_context() {
        let page = "é".repeat(MAX_WEB_CONTEXT_CHARS + 100);
        let prompt = extraction_prompt("idea", &page, "");
        assert!(prompt.contains("=== WEB PAGE ==="));
        assert!(!prompt.contains("=== DOCUMENTS ==="));
        assert_eq!(prompt.matches('é').count(), MAX_WEB_CONTEXT_CHARS);
    }

    #[test]
    fn analysis_prompt_mentions_missing_discussions() {
        let idea = IdeaProfile {
            idea: "x".into(),
            keywords: vec!["a".into()],
            industry: "y".into(),
        };
        assert!(analysis_prompt(&idea, &[]).contains("No community discussions were found."));
    }
}
