//! Inbound request types (spec.md §3, §6).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::id::{ClientId, RequestId};

/// One file attached to a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAttachment {
    /// Original filename.
    pub filename: String,
    /// MIME or extension-derived type, e.g. `"application/pdf"`.
    pub file_type: String,
    /// Opaque handle a file-extraction collaborator can resolve; the RCVE
    /// itself never reads file bytes.
    pub storage_ref: String,
}

/// A single file's pre-extracted summary (spec.md §6's `file_summaries`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSummary {
    /// Original filename.
    pub filename: String,
    /// MIME or extension-derived type.
    pub file_type: String,
    /// Extracted text summary, if extraction succeeded.
    pub text: Option<String>,
    /// Extraction failure detail, if it failed.
    pub error: Option<String>,
}

/// The immutable request for one run (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Raw free-text change request from the client.
    pub raw_request: String,
    /// Target website URL, if given.
    pub website_url: Option<String>,
    /// Ordered file attachments.
    pub attachments: Vec<FileAttachment>,
    /// Client identifier — a bare domain, lower-case, no scheme.
    pub client_id: ClientId,
}

/// Pre-enrichment data supplied by upstream collaborators (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticContext {
    /// Client profile key-value pairs.
    pub client_profile: HashMap<String, serde_json::Value>,
    /// Rendered website content summary, if a website was supplied.
    pub website_content: Option<String>,
    /// Per-file extract summaries.
    pub file_summaries: Vec<FileSummary>,
}

/// The fully populated input the engine is entered with (spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInput {
    /// Unique identifier for this run.
    pub request_id: RequestId,
    /// The immutable request.
    pub request: Request,
    /// Pre-enrichment static context.
    pub static_context: StaticContext,
    /// Optional per-request configuration overrides.
    #[serde(default)]
    pub config: Option<RunInputConfig>,
}

/// Per-request configuration overrides (spec.md §6's `RunInput.config`).
/// Any field left `None` falls back to [`EngineConfig::default`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunInputConfig {
    /// Override for `max_iterations`.
    pub max_iterations: Option<u32>,
    /// Override for `token_budget`.
    pub token_budget: Option<u64>,
    /// Override for per-tool call budgets.
    pub tool_budgets: Option<HashMap<crate::tool::ToolKind, u32>>,
}

impl RunInputConfig {
    /// Merge these overrides onto the documented defaults.
    pub fn resolve(&self) -> EngineConfig {
        let mut cfg = EngineConfig::default();
        if let Some(v) = self.max_iterations {
            cfg.max_iterations = v;
        }
        if let Some(v) = self.token_budget {
            cfg.token_budget = v;
        }
        if let Some(ref v) = self.tool_budgets {
            cfg.tool_budgets = v.clone();
        }
        cfg
    }
}

impl RunInput {
    /// Resolve this run's effective configuration, applying any overrides
    /// on top of the documented defaults.
    pub fn resolved_config(&self) -> EngineConfig {
        self.config
            .as_ref()
            .map(RunInputConfig::resolve)
            .unwrap_or_default()
    }
}
