#![deny(missing_docs)]
//! # rcve-engine — the Loop Driver, Router, and State Store (spec.md §4.5, §4.6, §5)
//!
//! Ties `rcve-planner`, `rcve-validator`, and `rcve-executor` into the
//! bounded iteration loop: an initial Validator pass, then Router-driven
//! cycles of Planner → Executor → Validator until the Router chooses
//! `Architect` or `Escalate`. One [`Engine`] handles one request at a
//! time — concurrency across requests is the caller's concern (spec.md
//! §5's "strictly single-request-per-instance").

mod engine;
mod router;
mod state_store;

pub use engine::Engine;
pub use router::{route, RouterDecision};
pub use state_store::{EnrichmentStateStore, MemoryStateStore, StateStoreError};
