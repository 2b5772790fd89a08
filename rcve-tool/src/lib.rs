#![deny(missing_docs)]
//! # rcve-tool — the Tool Registry (spec.md §4.1)
//!
//! A uniform, object-safe interface over the nine information-gathering
//! tools, plus the per-request budget and timeout bookkeeping the
//! Executor needs around each call.

mod body;
mod builtin;
mod registry;

pub use body::ToolBody;
pub use builtin::all_builtin_tools;
pub use registry::ToolRegistry;
