//! Prompt assembly for a single Validator call (spec.md §4.4).

use rcve_core::{DynamicContext, IterationRecord, Request, StaticContext};

/// Everything the Validator needs to judge completeness for one pass.
pub struct ValidatorInput<'a> {
    /// The immutable client request.
    pub request: &'a Request,
    /// Pre-enrichment static context.
    pub static_context: &'a StaticContext,
    /// Observations accumulated so far.
    pub dynamic_context: &'a DynamicContext,
    /// Completed iteration records, oldest first — so the Validator does
    /// not re-request information already sought.
    pub history: &'a [IterationRecord],
    /// The iteration being entered (0 for the initial pass), used only to
    /// select the acceptance threshold; not sent verbatim to the model.
    pub iteration: u32,
    /// The confidence threshold this pass must meet to be `complete`.
    pub required_confidence: f64,
}

const SYSTEM_PROMPT: &str = r#"You are the validation component of a website change-request enrichment engine.
Given a client's request and everything gathered about it so far, decide whether a
competent developer could act on it now, or what is still missing.

You must classify the request into exactly one of these categories:
blog_post, seo_optimization, bug_fix, content_update, business_info_update, new_page,
form_changes, design_changes, feature_request, unclear.

Use "unclear" only when the request itself is not a website change request at all.

Respond with a single JSON object of this exact shape and nothing else:
{"complete": <bool>, "missing": ["<question>", ...], "confidence": <0..1>,
 "category": "<category>", "subcategories": ["<tag>", ...]}

A request is "complete" only if your confidence meets or exceeds the required threshold
given below. List every question a developer would still need answered in "missing" —
do not paraphrase questions already listed as answered in the accumulated context."#;

/// Build the system prompt for the Validator.
pub fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

/// Build the user message for one Validator call.
pub fn user_message(input: &ValidatorInput<'_>) -> String {
    let mut body = String::new();
    body.push_str("Client request:\n");
    body.push_str(&input.request.raw_request);
    body.push('\n');

    if let Some(url) = &input.request.website_url {
        body.push_str(&format!("Website: {url}\n"));
    }
    if let Some(content) = &input.static_context.website_content {
        body.push_str(&format!("Rendered website summary: {content}\n"));
    }
    for summary in &input.static_context.file_summaries {
        if let Some(text) = &summary.text {
            body.push_str(&format!("File {}: {text}\n", summary.filename));
        }
    }

    body.push_str("\nAccumulated context:\n");
    if input.dynamic_context.is_empty() {
        body.push_str("(nothing gathered yet)\n");
    } else {
        for line in input.dynamic_context.render_for_architect() {
            body.push_str(&format!("- {line}\n"));
        }
    }

    if !input.history.is_empty() {
        body.push_str("\nQuestions already asked in prior rounds:\n");
        for record in input.history {
            for question in &record.missing_before {
                body.push_str(&format!("- {question}\n"));
            }
        }
    }

    body.push_str(&format!(
        "\nRequired confidence to pass this round: {:.2}\n",
        input.required_confidence
    ));

    body
}
