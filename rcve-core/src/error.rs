//! Error taxonomy for the enrichment engine (spec.md §7).
//!
//! Each component has its own error enum; `EngineError` is what the Loop
//! Driver ultimately observes and what decides terminal disposition.

use thiserror::Error;

/// Errors raised by a single tool invocation through the Registry.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool's per-request call budget was already exhausted.
    #[error("budget exhausted for tool {0}")]
    BudgetExhausted(String),

    /// The tool did not return within its deadline.
    #[error("tool {0} timed out")]
    Timeout(String),

    /// The tool ran and failed. `kind` matches spec.md §6's `ToolResult.error.kind`.
    #[error("tool {tool} failed ({kind}): {message}")]
    Failed {
        /// Name of the tool that failed.
        tool: String,
        /// One of `timeout | http | parse | budget | invalid_input`.
        kind: String,
        /// Human-readable detail.
        message: String,
    },

    /// The tool name does not correspond to a registered `ToolKind`.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Catch-all for a tool body's own error type.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors raised producing or parsing a Planner output.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PlannerError {
    /// The LLM call itself failed (network, auth, rate limit, ...).
    #[error("planner model error: {0}")]
    Model(String),

    /// The model's response could not be parsed into an `EnrichmentPlan`.
    /// Per spec.md §7 this is iteration-local, not fatal: the Executor
    /// treats it as an empty plan.
    #[error("planner output invalid: {0}")]
    OutputInvalid(String),
}

/// Errors raised producing or parsing a Validator output.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The LLM call itself failed (network, auth, rate limit, ...).
    #[error("validator model error: {0}")]
    Model(String),

    /// The model's response could not be parsed into the validator's
    /// structured output. Per spec.md §7 the Loop Driver retries once;
    /// a second failure is fatal (`stop_reason=validator_parse_error`).
    #[error("validator output invalid: {0}")]
    OutputInvalid(String),
}

/// Top-level engine errors — the only ones that can abort a run outright
/// rather than route through the normal escalation path.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EngineError {
    /// The Validator produced an unparseable response twice in a row.
    #[error("validator output invalid after retry: {0}")]
    ValidatorParseError(String),

    /// The host-level deadline for the whole request was exceeded.
    #[error("request deadline exceeded")]
    DeadlineExceeded,

    /// A planner error propagated through the engine.
    #[error("planner error: {0}")]
    Planner(#[from] PlannerError),

    /// A validator error propagated through the engine.
    #[error("validator error: {0}")]
    Validator(#[from] ValidatorError),

    /// State store failure.
    #[error("state store error: {0}")]
    State(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
