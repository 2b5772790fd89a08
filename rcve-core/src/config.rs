//! Engine configuration (spec.md §6's `RunInput.config` and configuration table).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::duration::DurationSecs;
use crate::tool::ToolKind;

/// Default cap on enrichment passes after the initial validation.
pub const DEFAULT_MAX_ITERATIONS: u32 = 3;

/// Default global per-request token ceiling.
pub const DEFAULT_TOKEN_BUDGET: u64 = 500_000;

/// Default per-tool invocation deadline.
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 30;

/// Default Validator acceptance curve, indexed by iteration entered
/// (0, 1, 2, 3 — spec.md §4.4).
pub const DEFAULT_CONFIDENCE_THRESHOLDS: [f64; 4] = [0.85, 0.75, 0.65, 0.60];

/// Default per-tool call budgets (spec.md §4.1).
pub fn default_tool_budgets() -> HashMap<ToolKind, u32> {
    use ToolKind::*;
    HashMap::from([
        (FetchPage, 5),
        (WebSearch, 3),
        (ImageProbe, 3),
        (PdfExtract, 2),
        (FormDetect, 3),
        (SocialFind, 2),
        (SeoAudit, 1),
        (MapsLookup, 1),
        (ReviewsLookup, 1),
    ])
}

/// Engine-wide configuration, overridable per-request via
/// `RunInput.config` (spec.md §6). `Default` matches the documented
/// defaults exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Cap on enrichment passes after the initial validation.
    pub max_iterations: u32,
    /// Global per-request token ceiling.
    pub token_budget: u64,
    /// Per-tool call caps for this request.
    pub tool_budgets: HashMap<ToolKind, u32>,
    /// Per-tool invocation deadline.
    pub tool_timeout: DurationSecs,
    /// Validator acceptance curve indexed by iteration entered (0..=3).
    pub confidence_thresholds: [f64; 4],
}

impl EngineConfig {
    /// The confidence threshold required to pass the Validator when
    /// entering `iteration`. Clamped to the last entry for iterations
    /// beyond the table (spec.md only defines 0..=3).
    pub fn threshold_for_iteration(&self, iteration: u32) -> f64 {
        let idx = (iteration as usize).min(self.confidence_thresholds.len() - 1);
        self.confidence_thresholds[idx]
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            token_budget: DEFAULT_TOKEN_BUDGET,
            tool_budgets: default_tool_budgets(),
            tool_timeout: DurationSecs::from_secs(DEFAULT_TOOL_TIMEOUT_SECS),
            confidence_thresholds: DEFAULT_CONFIDENCE_THRESHOLDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_values() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.max_iterations, 3);
        assert_eq!(cfg.token_budget, 500_000);
        assert_eq!(cfg.tool_timeout.as_secs(), 30);
        assert_eq!(cfg.tool_budgets.get(&ToolKind::FetchPage), Some(&5));
        assert_eq!(cfg.tool_budgets.get(&ToolKind::SeoAudit), Some(&1));
    }

    #[test]
    fn threshold_lookup_clamps_past_table() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.threshold_for_iteration(0), 0.85);
        assert_eq!(cfg.threshold_for_iteration(3), 0.60);
        assert_eq!(cfg.threshold_for_iteration(99), 0.60);
    }
}
