//! The Planner's structured output (spec.md §4.2).

use serde::{Deserialize, Serialize};

use crate::tool::ToolParams;

/// One scheduled tool invocation within a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    /// The tool to invoke and its typed parameters.
    pub params: ToolParams,
    /// The missing question (verbatim, from `last_missing`) this action
    /// is intended to answer.
    pub question_it_answers: String,
    /// The Planner's stated reason for scheduling this action.
    pub rationale: String,
}

/// The Planner's output: an ordered list of actions and a total-token
/// estimate (spec.md §4.2). Advisory only — the Executor is the sole
/// authority on what actually runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichmentPlan {
    /// Actions in the order they should be attempted.
    pub actions: Vec<Action>,
    /// The Planner's estimate of total tokens this plan will consume.
    pub estimated_tokens: u64,
}

impl EnrichmentPlan {
    /// An empty plan — used when the Planner's output could not be
    /// parsed (spec.md §7's `PlannerOutputInvalid`) or when filtering
    /// removed every action.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether this plan has no actions left to execute.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
