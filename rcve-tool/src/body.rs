//! Object-safe trait for one tool's implementation.

use std::future::Future;
use std::pin::Pin;

use rcve_core::{ToolKind, ToolParams, ToolResult};

/// Any tool source (a live HTTP call, a PDF parser, a places API client)
/// implements this trait. Tool bodies are collaborators, not part of the
/// engine's core (spec.md §4.1): they always return a [`ToolResult`]
/// envelope, never propagate their own error type past `call` — one
/// tool's failure must never surface as anything other than
/// `ToolResult { ok: false, .. }`.
pub trait ToolBody: Send + Sync {
    /// Which tool kind this body implements.
    fn kind(&self) -> ToolKind;

    /// Human-readable description of what the tool does.
    fn description(&self) -> &str;

    /// Execute the tool with the given parameters.
    ///
    /// `params.kind()` is guaranteed by the [`crate::registry::ToolRegistry`]
    /// to match `self.kind()` before this is called.
    fn call(&self, params: ToolParams) -> Pin<Box<dyn Future<Output = ToolResult> + Send + '_>>;
}
