#![deny(missing_docs)]
//! # rcve-core — domain types, configuration, and error taxonomy
//!
//! This crate defines the data the Recursive Context-Gathering Validation
//! Engine passes between its components: the immutable [`Request`] and
//! [`StaticContext`], the monotonically-growing [`DynamicContext`], the
//! per-request [`EnrichmentState`], the Planner's [`EnrichmentPlan`], and
//! the two terminal outcomes. It has no knowledge of tools, LLM providers,
//! or the loop that drives them — those live in `rcve-tool`, `rcve-llm`,
//! `rcve-planner`, `rcve-validator`, `rcve-executor`, and `rcve-engine`.

pub mod category;
pub mod confidence;
pub mod config;
pub mod context;
pub mod duration;
pub mod error;
pub mod id;
pub mod metrics;
pub mod missing;
pub mod outcome;
pub mod plan;
pub mod request;
pub mod state;
pub mod tool;

pub use category::Category;
pub use confidence::Confidence;
pub use config::EngineConfig;
pub use context::{DynamicContext, Observation};
pub use duration::DurationSecs;
pub use error::{EngineError, PlannerError, ToolError, ValidatorError};
pub use id::{ClientId, RequestId};
pub use metrics::Metrics;
pub use missing::MissingQuestions;
pub use outcome::{CompletedOutcome, EnrichedContextEntry, EscalationOutcome, Outcome};
pub use plan::{Action, EnrichmentPlan};
pub use request::{FileAttachment, FileSummary, Request, RunInput, RunInputConfig, StaticContext};
pub use state::{ActionOutcome, EnrichmentState, IterationRecord, StopReason, ToolCallRecord};
pub use tool::{
    new_tool_usage, ToolBudget, ToolErrorKind, ToolKind, ToolParams, ToolResult, ToolResultError,
    ToolUsage,
};
