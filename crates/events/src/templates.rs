//! Notification email templates.
//!
//! Pure functions: each takes a small structured input and returns a
//! self-contained [`RenderedMessage`]. Output depends only on the arguments,
//! so renders can be compared against fixed expectations in tests. All
//! caller-provided text is HTML-escaped.

use signals_core::digest::ReportDigest;
use signals_core::stage::Stage;
use signals_core::types::JobId;
use signals_core::verdict::Verdict;

/// Maximum number of preview items shown in a progress email.
pub const MAX_PREVIEW_ITEMS: usize = 5;

/// Subject and HTML body of one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub subject: String,
    pub html: String,
}

/// Visual state of one step in the progress step list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Done,
    Current,
    Pending,
}

impl StepState {
    /// State of `step` relative to the stage a job is currently in.
    pub fn of(step: Stage, current: Stage) -> Self {
        match step.cmp(&current) {
            std::cmp::Ordering::Less => Self::Done,
            std::cmp::Ordering::Equal => Self::Current,
            std::cmp::Ordering::Greater => Self::Pending,
        }
    }

    fn marker(self) -> &'static str {
        match self {
            Self::Done => "&#10003;",
            Self::Current => "&#9679;",
            Self::Pending => "&#9675;",
        }
    }

    fn class(self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::Current => "current",
            Self::Pending => "pending",
        }
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

pub fn signup_confirmation(job_id: JobId, request_text: Option<&str>) -> RenderedMessage {
    let mut body = String::new();
    body.push_str("<h2>You're signed up</h2>");
    body.push_str(&format!(
        "<p>We started a research job for you. Your job id is <code>{job_id}</code>.</p>"
    ));
    if let Some(text) = request_text.map(str::trim).filter(|t| !t.is_empty()) {
        body.push_str(&format!("<blockquote>{}</blockquote>", escape_html(text)));
    }
    body.push_str("<p>We'll email you as each research step completes.</p>");

    RenderedMessage {
        subject: "Signals: your research job has started".to_string(),
        html: layout(&body),
    }
}

/// Progress email: step list, percentage and an optional preview of items
/// found in this stage (see [`preview_items`]).
pub fn progress_update(
    job_id: JobId,
    stage: Stage,
    progress: u8,
    payload: Option<&serde_json::Value>,
) -> RenderedMessage {
    let mut body = String::new();
    body.push_str(&format!("<h2>{} ({progress}%)</h2>", stage.label()));
    body.push_str(&format!("<p>{}</p>", stage.description()));

    body.push_str("<ol class=\"steps\">");
    for step in Stage::ALL {
        let state = StepState::of(step, stage);
        body.push_str(&format!(
            "<li class=\"{}\">{} {}</li>",
            state.class(),
            state.marker(),
            step.label()
        ));
    }
    body.push_str("</ol>");

    let preview = payload.map(preview_items).unwrap_or_default();
    if !preview.is_empty() {
        body.push_str("<h3>Found so far</h3><ul class=\"preview\">");
        for item in &preview {
            body.push_str(&format!("<li>{}</li>", escape_html(item)));
        }
        body.push_str("</ul>");
    }
    body.push_str(&format!("<p class=\"muted\">Job <code>{job_id}</code></p>"));

    RenderedMessage {
        subject: format!("Signals update: {} ({progress}%)", stage.label()),
        html: layout(&body),
    }
}

/// Completion email: verdict badge, the findings when a report is given,
/// and the dashboard link.
pub fn dashboard_ready(
    job_id: JobId,
    result_url: &str,
    verdict: Verdict,
    report: Option<&ReportDigest>,
) -> RenderedMessage {
    let mut body = String::new();
    body.push_str("<h2>Your research report is ready</h2>");
    body.push_str(&format!(
        "<div class=\"badge badge-{}\">{}</div>",
        verdict.as_str(),
        verdict.label()
    ));
    if let Some(report) = report.filter(|r| !r.is_empty()) {
        body.push_str(&report_sections(report));
    }
    let url = escape_html(result_url);
    body.push_str(&format!("<p><a href=\"{url}\">Open your dashboard</a></p>"));
    body.push_str(&format!("<p class=\"muted\">Job <code>{job_id}</code></p>"));

    RenderedMessage {
        subject: format!("Signals report ready: {}", verdict.label()),
        html: layout(&body),
    }
}

fn report_sections(report: &ReportDigest) -> String {
    let mut html = String::new();
    if !report.idea.trim().is_empty() {
        html.push_str(&format!(
            "<p class=\"idea\"><strong>Idea:</strong> {}</p>",
            escape_html(&report.idea)
        ));
    }
    if !report.summary.trim().is_empty() {
        html.push_str(&format!("<h3>Summary</h3><p>{}</p>", escape_html(&report.summary)));
    }
    if !report.sentiment.trim().is_empty() {
        html.push_str(&format!(
            "<p><strong>Community sentiment:</strong> {}</p>",
            escape_html(&report.sentiment)
        ));
    }

    for (title, items) in [
        ("Opportunities", &report.opportunities),
        ("Risks", &report.risks),
        ("Recommendations", &report.recommendations),
        ("Competitors", &report.competitors),
    ] {
        if items.is_empty() {
            continue;
        }
        html.push_str(&format!("<h3>{title}</h3><ul>"));
        for item in items {
            html.push_str(&format!("<li>{}</li>", escape_html(item)));
        }
        html.push_str("</ul>");
    }

    if !report.discussions.is_empty() {
        html.push_str("<h3>Discussions</h3><ul class=\"discussions\">");
        for d in &report.discussions {
            html.push_str(&format!(
                "<li><a href=\"{}\">{}</a> ({} points, {} comments)</li>",
                escape_html(&d.url),
                escape_html(&d.title),
                d.points,
                d.num_comments
            ));
        }
        html.push_str("</ul>");
    }
    html
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Extract up to [`MAX_PREVIEW_ITEMS`] display strings from a preview payload.
///
/// Accepts either an array or an object whose array values hold the items
/// (e.g. `{"papers": [{"title": "X"}]}`). Items may be strings or objects
/// with a `title` or `name` field; anything else is skipped.
pub fn preview_items(payload: &serde_json::Value) -> Vec<String> {
    let arrays: Vec<&Vec<serde_json::Value>> = match payload {
        serde_json::Value::Array(items) => vec![items],
        serde_json::Value::Object(map) => map.values().filter_map(|v| v.as_array()).collect(),
        _ => Vec::new(),
    };

    arrays
        .into_iter()
        .flatten()
        .filter_map(|item| match item {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(obj) => obj
                .get("title")
                .or_else(|| obj.get("name"))
                .and_then(|v| v.as_str())
                .map(str::to_string),
            _ => None,
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(MAX_PREVIEW_ITEMS)
        .collect()
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"></head>\
         <body style=\"font-family: system-ui, sans-serif; max-width: 600px; margin: 0 auto;\">\
         <h1>Signals</h1>{body}\
         <hr><p class=\"muted\">Sent by Signals, idea and market research.</p>\
         </body></html>"
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
