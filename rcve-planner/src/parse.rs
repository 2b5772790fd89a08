//! Parsing the Planner's structured JSON output into an [`EnrichmentPlan`].

use rcve_core::{Action, EnrichmentPlan, ToolKind, ToolParams};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RawAction {
    #[serde(flatten)]
    params: ToolParams,
    question_it_answers: String,
    rationale: String,
}

#[derive(Debug, Deserialize)]
struct RawPlan {
    #[serde(default)]
    actions: Vec<serde_json::Value>,
    #[serde(default)]
    estimated_tokens: u64,
}

/// Parse a model's raw text response into an [`EnrichmentPlan`].
///
/// Tolerates responses wrapped in a markdown code fence, which some
/// models emit despite instructions not to. An action naming an
/// unrecognized tool (or one that otherwise fails to deserialize into
/// the tagged `ToolParams` shape) is dropped rather than failing the
/// whole plan (spec.md §4.2) — each element of `actions` is parsed
/// independently, so one bad action never discards its siblings.
pub fn parse_plan(raw_text: &str) -> Result<EnrichmentPlan, String> {
    let trimmed = strip_code_fence(raw_text);
    let raw: RawPlan = serde_json::from_str(trimmed).map_err(|e| e.to_string())?;

    let actions = raw
        .actions
        .into_iter()
        .filter(|action| {
            action
                .get("tool")
                .and_then(|t| t.as_str())
                .is_some_and(|name| ToolKind::from_name(name).is_some())
        })
        .filter_map(|action| serde_json::from_value::<RawAction>(action).ok())
        .map(|a| Action {
            params: a.params,
            question_it_answers: a.question_it_answers,
            rationale: a.rationale,
        })
        .collect();

    Ok(EnrichmentPlan {
        actions,
        estimated_tokens: raw.estimated_tokens,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        rest.trim().trim_end_matches("```").trim()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_plan() {
        let text = r#"{"actions": [{"tool": "fetch_page", "url": "https://x.com", "question_it_answers": "what is the homepage?", "rationale": "need it"}], "estimated_tokens": 800}"#;
        let plan = parse_plan(text).unwrap();
        assert_eq!(plan.actions.len(), 1);
        assert_eq!(plan.estimated_tokens, 800);
    }

    #[test]
    fn strips_markdown_code_fence() {
        let text = "```json\n{\"actions\": [], \"estimated_tokens\": 0}\n```";
        let plan = parse_plan(text).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_plan("not json").is_err());
    }

    #[test]
    fn unrecognized_tool_is_dropped_but_plan_keeps_other_actions() {
        let text = r#"{"actions": [
            {"tool": "fetch_page", "url": "https://x.com", "question_it_answers": "what is the homepage?", "rationale": "need it"},
            {"tool": "not_a_real_tool", "url": "https://y.com", "question_it_answers": "irrelevant", "rationale": "irrelevant"}
        ], "estimated_tokens": 800}"#;
        let plan = parse_plan(text).unwrap();
        assert_eq!(plan.actions.len(), 1);
        assert_eq!(plan.actions[0].params.kind(), ToolKind::FetchPage);
    }
}
