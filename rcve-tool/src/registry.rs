//! The Tool Registry (spec.md §4.1): a uniform interface over the nine
//! tools, tracking per-tool budget and wrapping each call with a timeout.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rcve_core::{ToolError, ToolErrorKind, ToolKind, ToolParams, ToolResult, ToolUsage};

use crate::body::ToolBody;

/// Registry of tool bodies, keyed by [`ToolKind`], plus the per-request
/// budget bookkeeping for each.
///
/// Owned by one request's `EnrichmentState` (spec.md §5) — never a
/// process-global singleton. Construction guarantees every `ToolKind` has
/// a registered body (see [`ToolRegistry::with_builtin_tools`]), which
/// resolves spec.md §9's open question about distinguishing "tool
/// returned nothing" from "tool not yet wired": in this engine, a tool
/// that returns no observations is always a legitimate empty result,
/// never a missing registration.
pub struct ToolRegistry {
    bodies: HashMap<ToolKind, Arc<dyn ToolBody>>,
    timeout: Duration,
}

impl ToolRegistry {
    /// Build a registry from an explicit set of tool bodies. Panics if
    /// any `ToolKind` is missing a body — see the struct-level docs.
    pub fn new(bodies: Vec<Arc<dyn ToolBody>>, timeout: Duration) -> Self {
        let mut map = HashMap::new();
        for body in bodies {
            map.insert(body.kind(), body);
        }
        for kind in ToolKind::ALL {
            assert!(
                map.contains_key(&kind),
                "tool registry missing a body for {kind}"
            );
        }
        Self {
            bodies: map,
            timeout,
        }
    }

    /// The tool kinds that still have budget remaining, in `ToolKind::ALL`
    /// order (spec.md §4.1's `available_tools()`).
    pub fn available_tools(&self, usage: &ToolUsage) -> Vec<ToolKind> {
        ToolKind::ALL
            .into_iter()
            .filter(|kind| usage.get(kind).is_some_and(|b| b.has_remaining()))
            .collect()
    }

    /// Invoke a tool, enforcing budget and the per-call timeout.
    ///
    /// Budget is decremented before the call. It is restored if the call
    /// times out, or if `params` don't match `tool`'s expected kind
    /// (a pre-execution validation failure). It is **not** restored when
    /// the tool body itself returns `ToolResult { ok: false, .. }` — a
    /// failed attempt still counts against budget (spec.md §4.1).
    pub async fn invoke(
        &self,
        tool: ToolKind,
        params: ToolParams,
        usage: &mut ToolUsage,
    ) -> Result<ToolResult, ToolError> {
        let budget = usage
            .get_mut(&tool)
            .ok_or_else(|| ToolError::UnknownTool(tool.name().to_string()))?;

        if !budget.has_remaining() {
            return Err(ToolError::BudgetExhausted(tool.name().to_string()));
        }

        if params.kind() != tool {
            return Err(ToolError::Failed {
                tool: tool.name().to_string(),
                kind: "invalid_input".to_string(),
                message: format!(
                    "parameters are for {} but {} was requested",
                    params.kind(),
                    tool
                ),
            });
        }

        let body = self
            .bodies
            .get(&tool)
            .ok_or_else(|| ToolError::UnknownTool(tool.name().to_string()))?
            .clone();

        // Decrement before the call commits the usage (spec.md §4.1).
        budget.calls_made += 1;

        match tokio::time::timeout(self.timeout, body.call(params)).await {
            Ok(result) => {
                tracing::debug!(tool = tool.name(), ok = result.ok, "tool invocation complete");
                Ok(result)
            }
            Err(_elapsed) => {
                // Timeout restores the budget slot (spec.md §4.1, §7).
                let budget = usage.get_mut(&tool).expect("budget present after lookup above");
                budget.calls_made -= 1;
                tracing::warn!(tool = tool.name(), "tool invocation timed out");
                Err(ToolError::Timeout(tool.name().to_string()))
            }
        }
    }

    /// Map a [`ToolError`] to the envelope kind used in `ToolResult.error`
    /// (spec.md §6), for callers that need to record a failed invocation
    /// uniformly alongside successful ones.
    pub fn error_kind(err: &ToolError) -> ToolErrorKind {
        match err {
            ToolError::BudgetExhausted(_) => ToolErrorKind::Budget,
            ToolError::Timeout(_) => ToolErrorKind::Timeout,
            ToolError::Failed { kind, .. } if kind == "invalid_input" => {
                ToolErrorKind::InvalidInput
            }
            ToolError::Failed { .. } => ToolErrorKind::Http,
            ToolError::UnknownTool(_) => ToolErrorKind::InvalidInput,
            ToolError::Other(_) => ToolErrorKind::Http,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::all_builtin_tools;
    use rcve_core::{new_tool_usage, ToolParams};
    use std::collections::HashMap;

    fn full_usage() -> ToolUsage {
        let budgets: HashMap<ToolKind, u32> =
            ToolKind::ALL.into_iter().map(|k| (k, 5)).collect();
        new_tool_usage(&budgets)
    }

    #[tokio::test]
    async fn builtin_registry_has_all_nine_tools() {
        let registry = ToolRegistry::new(all_builtin_tools(), Duration::from_secs(30));
        let usage = full_usage();
        assert_eq!(registry.available_tools(&usage).len(), 9);
    }

    #[tokio::test]
    async fn budget_exhausted_before_call() {
        let registry = ToolRegistry::new(all_builtin_tools(), Duration::from_secs(30));
        let mut usage = new_tool_usage(&HashMap::from([(ToolKind::WebSearch, 0)]));
        let err = registry
            .invoke(
                ToolKind::WebSearch,
                ToolParams::WebSearch {
                    query: "x".into(),
                },
                &mut usage,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::BudgetExhausted(_)));
    }

    #[tokio::test]
    async fn successful_call_decrements_budget() {
        let registry = ToolRegistry::new(all_builtin_tools(), Duration::from_secs(30));
        let mut usage = full_usage();
        registry
            .invoke(
                ToolKind::WebSearch,
                ToolParams::WebSearch {
                    query: "x".into(),
                },
                &mut usage,
            )
            .await
            .unwrap();
        assert_eq!(usage[&ToolKind::WebSearch].calls_made, 1);
    }

    #[tokio::test]
    async fn mismatched_params_restore_budget() {
        let registry = ToolRegistry::new(all_builtin_tools(), Duration::from_secs(30));
        let mut usage = full_usage();
        let err = registry
            .invoke(
                ToolKind::WebSearch,
                ToolParams::FetchPage {
                    url: "https://x".into(),
                },
                &mut usage,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Failed { .. }));
        assert_eq!(usage[&ToolKind::WebSearch].calls_made, 0);
    }
}
