//! Prompt assembly for a single Planner call (spec.md §4.2).

use rcve_core::{Category, DynamicContext, Request, StaticContext, ToolKind};

/// Everything the Planner needs to propose a round of actions.
pub struct PlannerInput<'a> {
    /// The immutable client request.
    pub request: &'a Request,
    /// Pre-enrichment static context.
    pub static_context: &'a StaticContext,
    /// Questions the most recent Validator pass still considers open.
    pub last_missing: &'a [String],
    /// Tools that still have budget remaining, in `ToolKind::ALL` order.
    pub available_tools: &'a [ToolKind],
    /// Observations gathered so far, for deduplication.
    pub dynamic_context: &'a DynamicContext,
    /// The Validator's classification so far, if one has run.
    pub category: Option<Category>,
}

const SYSTEM_PROMPT: &str = r#"You are the planning component of a website change-request enrichment engine.
Given a client's request, what is already known, and what is still missing, propose a
list of tool calls that would gather the missing information. You do not execute tools
yourself — you only name them.

Rules:
- Never name a tool that is not in the list of available tools.
- Never invent a field that is not one of the stated missing questions.
- Never schedule an action that would require the client's own subjective input
  (preferences like target keywords or a preferred colour) — leave those as missing.
- If nothing in the available tools can plausibly help, return an empty action list.

Respond with a single JSON object of this exact shape and nothing else:
{"actions": [{"tool": "<tool_name>", ...tool_params, "question_it_answers": "<verbatim question>", "rationale": "<why>"}], "estimated_tokens": <integer>}"#;

/// Build the system prompt for the Planner.
pub fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

/// Build the user message for one Planner call.
pub fn user_message(input: &PlannerInput<'_>) -> String {
    let mut body = String::new();
    body.push_str("Client request:\n");
    body.push_str(&input.request.raw_request);
    body.push('\n');

    if let Some(url) = &input.request.website_url {
        body.push_str(&format!("Website: {url}\n"));
    }
    if !input.request.attachments.is_empty() {
        body.push_str("Attachments:\n");
        for attachment in &input.request.attachments {
            body.push_str(&format!("- {} ({})\n", attachment.filename, attachment.file_type));
        }
    }
    if let Some(category) = input.category {
        body.push_str(&format!("Classified as: {category:?}\n"));
    }
    if let Some(content) = &input.static_context.website_content {
        body.push_str(&format!("Rendered website summary: {content}\n"));
    }
    for summary in &input.static_context.file_summaries {
        if let Some(text) = &summary.text {
            body.push_str(&format!("File {}: {text}\n", summary.filename));
        }
    }

    body.push_str("\nOutstanding questions:\n");
    if input.last_missing.is_empty() {
        body.push_str("(none)\n");
    } else {
        for question in input.last_missing {
            body.push_str(&format!("- {question}\n"));
        }
    }

    body.push_str("\nTools with remaining budget:\n");
    if input.available_tools.is_empty() {
        body.push_str("(none)\n");
    } else {
        for tool in input.available_tools {
            body.push_str(&format!("- {tool}\n"));
        }
    }

    body.push_str("\nAlready known (do not re-fetch these keys):\n");
    if input.dynamic_context.is_empty() {
        body.push_str("(nothing yet)\n");
    } else {
        for (key, obs) in input.dynamic_context.iter() {
            body.push_str(&format!("- {key} = {} (confidence {:.2})\n", obs.value, obs.confidence.value()));
        }
    }

    body
}
