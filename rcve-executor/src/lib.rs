#![deny(missing_docs)]
//! # rcve-executor — the Executor (spec.md §4.3)
//!
//! A deterministic dispatch loop, grounded on the tool-dispatch portion of
//! the teacher's ReAct operator with every model-inference step removed:
//! per spec.md §9's planner–executor split, the Executor never calls an
//! LLM and the Planner never calls a tool. It is the sole authority on
//! what actually runs — the Planner's rules (§4.2) are enforced here,
//! post-hoc, by simply letting the Registry's own budget check reject
//! zero-budget actions rather than trusting the Planner's restraint.

use rcve_core::{
    ActionOutcome, Confidence, DynamicContext, EnrichmentPlan, ToolCallRecord, ToolError,
    ToolResultError, ToolUsage,
};
use rcve_tool::ToolRegistry;
use std::sync::Arc;

/// Dispatches one iteration's plan through a shared [`ToolRegistry`].
pub struct Executor {
    registry: Arc<ToolRegistry>,
}

impl Executor {
    /// Build an Executor over a shared registry. The registry is stateless
    /// (bodies + timeout only); call budgets live in the `ToolUsage` passed
    /// to [`Executor::dispatch`], owned by the request's enrichment state.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Tools that still have budget remaining under `tool_usage`, passed
    /// straight through to the Planner so it never names an exhausted one.
    pub fn available_tools(&self, tool_usage: &ToolUsage) -> Vec<rcve_core::ToolKind> {
        self.registry.available_tools(tool_usage)
    }

    /// Run every action in `plan`, in order, against `tool_usage`, merging
    /// successful observations into `dynamic_context` and accumulating
    /// `tokens_used`.
    ///
    /// Stops dispatching remaining actions as soon as `tokens_used` reaches
    /// `token_budget` — the global budget is the only thing that aborts the
    /// rest of an iteration (spec.md §4.3); a single tool's
    /// `BudgetExhausted`/`Timeout`/failure is recorded and the loop moves
    /// on to the next action.
    pub async fn dispatch(
        &self,
        plan: &EnrichmentPlan,
        iteration: u32,
        tool_usage: &mut ToolUsage,
        dynamic_context: &mut DynamicContext,
        tokens_used: &mut u64,
        token_budget: u64,
    ) -> Vec<ToolCallRecord> {
        let mut records = Vec::with_capacity(plan.actions.len());

        for action in &plan.actions {
            if *tokens_used >= token_budget {
                tracing::debug!(iteration, "global token budget reached, stopping dispatch early");
                break;
            }

            let tool = action.params.kind();
            let span = tracing::info_span!("tool_invocation", tool = tool.name(), iteration);
            let _enter = span.enter();

            let (outcome, tokens_attributed) = match self
                .registry
                .invoke(tool, action.params.clone(), tool_usage)
                .await
            {
                Ok(result) => {
                    let tokens = result.est_tokens;
                    if result.ok {
                        for (key, value) in result.observations.clone() {
                            let confidence = result
                                .confidence_by_key
                                .get(&key)
                                .copied()
                                .unwrap_or(Confidence::DEFAULT);
                            dynamic_context.merge(key, value, tool, confidence, iteration);
                        }
                    }
                    (ActionOutcome::Ran(result), tokens)
                }
                Err(ToolError::BudgetExhausted(_)) => (ActionOutcome::BudgetExhausted, 0),
                Err(ToolError::Timeout(_)) => (ActionOutcome::Timeout, 0),
                Err(ref err @ ToolError::Failed { ref message, .. }) => (
                    ActionOutcome::Rejected(ToolResultError {
                        kind: ToolRegistry::error_kind(err),
                        message: message.clone(),
                    }),
                    0,
                ),
                Err(ref err) => (
                    ActionOutcome::Rejected(ToolResultError {
                        kind: ToolRegistry::error_kind(err),
                        message: err.to_string(),
                    }),
                    0,
                ),
            };

            *tokens_used += tokens_attributed;

            records.push(ToolCallRecord {
                params: action.params.clone(),
                question_it_answers: action.question_it_answers.clone(),
                outcome,
                tokens_attributed,
            });

            if *tokens_used >= token_budget {
                tracing::debug!(iteration, "global token budget crossed, stopping dispatch early");
                break;
            }
        }

        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcve_core::{new_tool_usage, Action, ToolKind, ToolParams};
    use rcve_tool::ToolBody;
    use std::collections::HashMap;
    use std::future::Future;
    use std::pin::Pin;

    struct FixedTool {
        kind: ToolKind,
        est_tokens: u64,
        observations: HashMap<String, serde_json::Value>,
    }

    impl ToolBody for FixedTool {
        fn kind(&self) -> ToolKind {
            self.kind
        }

        fn description(&self) -> &str {
            "fixed test tool"
        }

        fn call(
            &self,
            _params: ToolParams,
        ) -> Pin<Box<dyn Future<Output = rcve_core::ToolResult> + Send + '_>> {
            let observations = self.observations.clone();
            let tokens = self.est_tokens;
            Box::pin(async move { rcve_core::ToolResult::success(observations, tokens) })
        }
    }

    fn registry_with(bodies: Vec<Arc<dyn ToolBody>>) -> Arc<ToolRegistry> {
        Arc::new(ToolRegistry::new(
            rcve_tool::all_builtin_tools()
                .into_iter()
                .filter(|b| !bodies.iter().any(|override_body| override_body.kind() == b.kind()))
                .chain(bodies)
                .collect(),
            std::time::Duration::from_secs(30),
        ))
    }

    fn budgets(n: u32) -> ToolUsage {
        new_tool_usage(&ToolKind::ALL.into_iter().map(|k| (k, n)).collect())
    }

    #[tokio::test]
    async fn merges_successful_observation_into_context() {
        let mut obs = HashMap::new();
        obs.insert("business_hours".to_string(), serde_json::json!("9-5"));
        let registry = registry_with(vec![Arc::new(FixedTool {
            kind: ToolKind::MapsLookup,
            est_tokens: 100,
            observations: obs,
        })]);
        let executor = Executor::new(registry);

        let plan = EnrichmentPlan {
            actions: vec![Action {
                params: ToolParams::MapsLookup {
                    business_name: "Acme".into(),
                    location: None,
                },
                question_it_answers: "what are the hours?".into(),
                rationale: "need hours".into(),
            }],
            estimated_tokens: 100,
        };

        let mut usage = budgets(5);
        let mut ctx = DynamicContext::new();
        let mut tokens_used = 0u64;

        let records = executor
            .dispatch(&plan, 1, &mut usage, &mut ctx, &mut tokens_used, 500_000)
            .await;

        assert_eq!(records.len(), 1);
        assert_eq!(tokens_used, 100);
        assert_eq!(ctx.get("business_hours").unwrap().value, serde_json::json!("9-5"));
    }

    #[tokio::test]
    async fn stops_dispatch_once_global_budget_crossed() {
        let registry = registry_with(vec![Arc::new(FixedTool {
            kind: ToolKind::SeoAudit,
            est_tokens: 12_000,
            observations: HashMap::new(),
        })]);
        let executor = Executor::new(registry);

        let action = Action {
            params: ToolParams::SeoAudit {
                url: "https://example.com".into(),
            },
            question_it_answers: "is seo healthy?".into(),
            rationale: "audit".into(),
        };
        let plan = EnrichmentPlan {
            actions: vec![action.clone(), action],
            estimated_tokens: 24_000,
        };

        let mut usage = budgets(5);
        let mut ctx = DynamicContext::new();
        let mut tokens_used = 0u64;

        let records = executor
            .dispatch(&plan, 1, &mut usage, &mut ctx, &mut tokens_used, 10_000)
            .await;

        // First action overshoots the budget; the second is never attempted.
        assert_eq!(records.len(), 1);
        assert_eq!(tokens_used, 12_000);
    }

    #[tokio::test]
    async fn budget_exhausted_tool_is_recorded_and_iteration_continues() {
        let mut obs = HashMap::new();
        obs.insert("page_url".to_string(), serde_json::json!("https://x"));
        let registry = registry_with(vec![Arc::new(FixedTool {
            kind: ToolKind::FetchPage,
            est_tokens: 50,
            observations: obs,
        })]);
        let executor = Executor::new(registry);

        let plan = EnrichmentPlan {
            actions: vec![
                Action {
                    params: ToolParams::WebSearch {
                        query: "x".into(),
                    },
                    question_it_answers: "q1".into(),
                    rationale: "r1".into(),
                },
                Action {
                    params: ToolParams::FetchPage {
                        url: "https://x".into(),
                    },
                    question_it_answers: "q2".into(),
                    rationale: "r2".into(),
                },
            ],
            estimated_tokens: 50,
        };

        // web_search budget already exhausted.
        let mut usage = new_tool_usage(&HashMap::from([(ToolKind::WebSearch, 0), (ToolKind::FetchPage, 5)]));
        let mut ctx = DynamicContext::new();
        let mut tokens_used = 0u64;

        let records = executor
            .dispatch(&plan, 1, &mut usage, &mut ctx, &mut tokens_used, 500_000)
            .await;

        assert_eq!(records.len(), 2);
        assert!(matches!(records[0].outcome, ActionOutcome::BudgetExhausted));
        assert!(ctx.get("page_url").is_some());
    }
}
