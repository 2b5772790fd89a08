//! Terminal outcomes handed to the architect or to human review (spec.md §6).

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::context::DynamicContext;
use crate::id::RequestId;
use crate::missing::MissingQuestions;
use crate::state::{IterationRecord, StopReason};

/// One rendered entry of the accumulated dynamic context (spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedContextEntry {
    /// Semantic key.
    pub key: String,
    /// Observed value.
    pub value: serde_json::Value,
    /// Which tool produced this observation.
    pub source_tool: String,
    /// Confidence of the observation.
    pub confidence: f64,
}

impl EnrichedContextEntry {
    /// Flatten a [`DynamicContext`] into the wire representation used by
    /// both terminal outcomes.
    pub fn from_context(ctx: &DynamicContext) -> Vec<Self> {
        ctx.iter()
            .map(|(key, obs)| EnrichedContextEntry {
                key: key.clone(),
                value: obs.value.clone(),
                source_tool: obs.source_tool.to_string(),
                confidence: obs.confidence.value(),
            })
            .collect()
    }
}

/// The request reached `complete` and is handed to the architect
/// (spec.md §4.7, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedOutcome {
    /// The run this outcome belongs to.
    pub request_id: RequestId,
    /// The Validator's final classification.
    pub category: Category,
    /// The Validator's final subcategories.
    pub subcategories: Vec<String>,
    /// The accumulated dynamic context, flattened for handoff.
    pub enriched_context: Vec<EnrichedContextEntry>,
    /// Full iteration history.
    pub history: Vec<IterationRecord>,
    /// Total tokens consumed across the run.
    pub tokens_used: u64,
    /// Number of enrichment iterations run (0 if the initial pass passed).
    pub iterations: u32,
}

/// The request could not reach `complete` within budget and is escalated
/// to human review (spec.md §4.8, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationOutcome {
    /// The run this outcome belongs to.
    pub request_id: RequestId,
    /// The Validator's final classification.
    pub category: Category,
    /// The Validator's final subcategories.
    pub subcategories: Vec<String>,
    /// Why the loop stopped. Never `complete` — that terminal case builds
    /// a [`CompletedOutcome`] instead. spec.md §6 only lists `max_iterations`,
    /// `token_limit`, `no_progress`, and `unclear` on the wire, but §7's
    /// error table and the glossary both name `deadline` and
    /// `validator_parse_error` as terminal stop reasons too; this field
    /// carries the full [`StopReason`] so a human reviewer sees which one
    /// actually happened rather than having it collapsed away.
    pub stop_reason: StopReason,
    /// The final outstanding questions.
    pub missing_questions: MissingQuestions,
    /// The accumulated dynamic context, flattened for handoff.
    pub enriched_context: Vec<EnrichedContextEntry>,
    /// Full iteration history.
    pub history: Vec<IterationRecord>,
    /// Total tokens consumed across the run.
    pub tokens_used: u64,
    /// Number of enrichment iterations run.
    pub iterations: u32,
}

/// Exactly one of these is produced per request (spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The request reached `complete`.
    Completed(CompletedOutcome),
    /// The request was escalated to human review.
    Escalated(EscalationOutcome),
}
