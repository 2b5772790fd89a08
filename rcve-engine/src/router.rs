//! The Router (spec.md §4.5): a pure function with no I/O, exercised
//! directly by unit tests with no mocking required.

use rcve_core::{EnrichmentState, StopReason};

/// Where the engine goes next after a Validator pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterDecision {
    /// Hand the request to the architect.
    Architect,
    /// Run another enrichment iteration.
    Enrich,
    /// Stop and escalate to human review, with the terminal reason.
    Escalate(StopReason),
}

/// Decide the next edge after a Validator pass.
///
/// `validator_complete` is the engine's own deterministic verdict — the
/// raw model output's `complete` flag combined with its confidence
/// meeting the iteration's required threshold (see
/// `rcve-engine::loop_driver`) — not the model's unchecked claim.
///
/// Precedence is exactly as listed in spec.md §4.5: completeness first,
/// then the iteration-0 unclear fast path, then the two budget ceilings,
/// then no-progress. Each condition is checked in order and the first
/// match wins.
pub fn route(state: &EnrichmentState, validator_complete: bool, max_iterations: u32) -> RouterDecision {
    if validator_complete {
        return RouterDecision::Architect;
    }

    if state.iteration == 0 && state.last_category.is_some_and(|c| c.is_unclear()) {
        return RouterDecision::Escalate(StopReason::Unclear);
    }

    if state.iteration >= max_iterations {
        return RouterDecision::Escalate(StopReason::MaxIterations);
    }

    if state.over_token_budget() {
        return RouterDecision::Escalate(StopReason::TokenLimit);
    }

    if no_progress(state) {
        return RouterDecision::Escalate(StopReason::NoProgress);
    }

    RouterDecision::Enrich
}

/// Whether the most recently completed iteration made no progress:
/// `set(missing_after) == set(missing_before)` (spec.md §4.6). Vacuously
/// false before any iteration has run.
fn no_progress(state: &EnrichmentState) -> bool {
    match state.history.last() {
        Some(last) => rcve_core::missing::no_progress(&last.missing_before, &last.missing_after),
        None => false,
    }
}
