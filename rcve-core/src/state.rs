//! The per-request enrichment record (spec.md §3) and its invariants.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::context::DynamicContext;
use crate::missing::MissingQuestions;
use crate::plan::EnrichmentPlan;
use crate::tool::{ToolParams, ToolResult, ToolResultError, ToolUsage};

/// Categorical terminal state (GLOSSARY, spec.md §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The Validator judged the request complete.
    Complete,
    /// Iteration 0 classified the request as `unclear`.
    Unclear,
    /// `max_iterations` was reached without completing.
    MaxIterations,
    /// The token budget was reached or exceeded.
    TokenLimit,
    /// A full round produced no change to the missing-question set.
    NoProgress,
    /// The host-level request deadline was exceeded.
    Deadline,
    /// The Validator's output was unparseable twice in a row.
    ValidatorParseError,
}

/// How one scheduled action resolved (spec.md §7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ActionOutcome {
    /// The tool ran and returned a result (which may itself be `ok: false`).
    Ran(ToolResult),
    /// The tool's budget was already exhausted; the action was dropped
    /// before being invoked.
    BudgetExhausted,
    /// The tool did not respond within its deadline.
    Timeout,
    /// The tool name or parameters were rejected before invocation.
    Rejected(ToolResultError),
}

/// A single scheduled-and-attempted action, recorded for history and
/// metrics regardless of how it resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// The parameters the Planner scheduled this action with.
    pub params: ToolParams,
    /// The missing question this action was claimed to answer.
    pub question_it_answers: String,
    /// How the action resolved.
    pub outcome: ActionOutcome,
    /// Tokens attributed to `tokens_used` for this action (0 if none).
    pub tokens_attributed: u64,
}

/// One enrichment pass (spec.md §3). `iteration` is 1-based within the
/// enrichment loop — the initial iteration-0 Validator pass has no
/// `IterationRecord`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationRecord {
    /// 1-based iteration index; `history[i].iteration == i + 1`.
    pub iteration: u32,
    /// The plan issued for this iteration (post-filtering by the Executor
    /// is NOT reflected here — this is the Planner's raw output).
    pub plan: EnrichmentPlan,
    /// Every action attempted, in Planner-issued order.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Tokens consumed during this iteration.
    pub tokens_consumed: u64,
    /// Missing questions before this iteration's Validator pass.
    pub missing_before: MissingQuestions,
    /// Missing questions after this iteration's Validator pass.
    pub missing_after: MissingQuestions,
}

/// The full per-request enrichment record (spec.md §3).
///
/// Modelled as an immutable snapshot per spec.md §9 "mutable evolving
/// state across iterations": each iteration takes one `EnrichmentState`
/// and produces the next via [`EnrichmentState::with_iteration_applied`],
/// rather than mutating a shared record in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentState {
    /// Current iteration, 0..=`max_iterations`.
    pub iteration: u32,
    /// Completed iteration records, oldest first.
    pub history: Vec<IterationRecord>,
    /// Accumulated tool observations.
    pub dynamic_context: DynamicContext,
    /// Per-tool call budgets and usage so far.
    pub tool_usage: ToolUsage,
    /// Tokens consumed so far.
    pub tokens_used: u64,
    /// The global per-request token ceiling.
    pub token_budget: u64,
    /// Set exactly once, only on a terminal transition.
    pub stop_reason: Option<StopReason>,
    /// Missing questions from the most recent Validator pass.
    pub last_missing: MissingQuestions,
    /// Confidence from the most recent Validator pass.
    pub last_confidence: f64,
    /// Classification from the most recent Validator pass.
    pub last_category: Option<Category>,
    /// Subcategories from the most recent Validator pass.
    pub last_subcategories: Vec<String>,
}

impl EnrichmentState {
    /// The initial state entering iteration 0, before any Validator pass.
    pub fn initial(token_budget: u64, tool_usage: ToolUsage) -> Self {
        Self {
            iteration: 0,
            history: Vec::new(),
            dynamic_context: DynamicContext::new(),
            tool_usage,
            tokens_used: 0,
            token_budget,
            stop_reason: None,
            last_missing: Vec::new(),
            last_confidence: 0.0,
            last_category: None,
            last_subcategories: Vec::new(),
        }
    }

    /// Whether the global token budget has been reached or exceeded.
    pub fn over_token_budget(&self) -> bool {
        self.tokens_used >= self.token_budget
    }

    /// Whether at least one key is present for every question the
    /// architect handoff can cite (spec.md §4.7) — used only for
    /// rendering, not an invariant.
    pub fn answer_rate(&self, initial_missing_count: usize) -> f64 {
        if initial_missing_count == 0 {
            return 1.0;
        }
        let final_missing_count = self.last_missing.len();
        let resolved = initial_missing_count.saturating_sub(final_missing_count);
        resolved as f64 / initial_missing_count as f64
    }
}
