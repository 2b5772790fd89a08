#![deny(missing_docs)]
//! # rcve-planner — the Planner (spec.md §4.2)
//!
//! A single-call, no-tool-execution LLM operator, grounded on the
//! teacher's single-shot operator: one model call, one parse, return
//! immediately. The Planner proposes tool actions; it never calls one.
//! Its rules (never name a zero-budget tool, never invent fields, never
//! schedule client-subjective actions) are advisory — the Executor is the
//! sole authority that enforces them (spec.md §4.2).

mod parse;
mod prompt;

pub use prompt::PlannerInput;

use rcve_core::{EnrichmentPlan, PlannerError};
use rcve_llm::{CompletionRequest, Provider};

/// Static configuration for a [`Planner`] instance.
pub struct PlannerConfig {
    /// Model identifier to request (`None` = provider default).
    pub model: Option<String>,
    /// Maximum tokens requested from the model per call.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: Option<f64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 2048,
            temperature: Some(0.0),
        }
    }
}

/// The Planner: given the current enrichment state, proposes an
/// [`EnrichmentPlan`]. Generic over `P: Provider`, matching
/// `rcve_llm::Provider`'s non-object-safe RPITIT design.
pub struct Planner<P: Provider> {
    provider: P,
    config: PlannerConfig,
}

impl<P: Provider> Planner<P> {
    /// Build a new Planner over the given provider.
    pub fn new(provider: P, config: PlannerConfig) -> Self {
        Self { provider, config }
    }

    /// Propose a plan for the current iteration.
    ///
    /// A network/auth/rate-limit failure from the provider propagates as
    /// [`PlannerError::Model`]. A response that cannot be parsed into an
    /// [`EnrichmentPlan`] is **not** propagated as an error (spec.md §7):
    /// it is logged and treated as an empty plan, which the Loop Driver
    /// will observe as no progress if it repeats.
    pub async fn plan(&self, input: &PlannerInput<'_>) -> Result<EnrichmentPlan, PlannerError> {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            system: prompt::system_prompt().to_string(),
            user: prompt::user_message(input),
            max_tokens: Some(self.config.max_tokens),
            temperature: self.config.temperature,
        };

        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| PlannerError::Model(e.to_string()))?;

        match parse::parse_plan(&response.text) {
            Ok(plan) => Ok(plan),
            Err(reason) => {
                tracing::warn!(error = %reason, "planner output unparseable, treating as empty plan");
                Ok(EnrichmentPlan::empty())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcve_core::{Category, ClientId, FileAttachment, Request, StaticContext, ToolKind};
    use rcve_llm::{CompletionResponse, ProviderError, StopReason, TokenUsage};
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct MockProvider {
        responses: Mutex<VecDeque<Result<CompletionResponse, ProviderError>>>,
        call_count: AtomicUsize,
    }

    impl MockProvider {
        fn new(texts: Vec<&str>) -> Self {
            let responses = texts
                .into_iter()
                .map(|text| {
                    Ok(CompletionResponse {
                        text: text.to_string(),
                        stop_reason: StopReason::EndTurn,
                        usage: TokenUsage {
                            input_tokens: 50,
                            output_tokens: 20,
                        },
                        model: "mock".to_string(),
                        cost: None,
                    })
                })
                .collect();
            Self {
                responses: Mutex::new(responses),
                call_count: AtomicUsize::new(0),
            }
        }

        fn with_error(error: ProviderError) -> Self {
            Self {
                responses: Mutex::new(VecDeque::from([Err(error)])),
                call_count: AtomicUsize::new(0),
            }
        }
    }

    impl Provider for MockProvider {
        fn complete(
            &self,
            _request: CompletionRequest,
        ) -> impl std::future::Future<Output = Result<CompletionResponse, ProviderError>> + Send
        {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            let result = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("MockProvider: no more responses queued");
            async move { result }
        }
    }

    fn sample_request() -> Request {
        Request {
            raw_request: "Update website to new brand design.".to_string(),
            website_url: Some("example.co.uk".to_string()),
            attachments: vec![FileAttachment {
                filename: "brand.pdf".to_string(),
                file_type: "application/pdf".to_string(),
                storage_ref: "ref-1".to_string(),
            }],
            client_id: ClientId::from("example.co.uk"),
        }
    }

    fn sample_static_context() -> StaticContext {
        StaticContext {
            client_profile: HashMap::new(),
            website_content: None,
            file_summaries: vec![],
        }
    }

    #[tokio::test]
    async fn parses_well_formed_plan_from_provider() {
        let provider = MockProvider::new(vec![
            r#"{"actions": [{"tool": "pdf_extract", "attachment": "brand.pdf", "question_it_answers": "what are the brand colours?", "rationale": "pdf is attached"}], "estimated_tokens": 1500}"#,
        ]);
        let planner = Planner::new(provider, PlannerConfig::default());
        let request = sample_request();
        let static_context = sample_static_context();
        let dynamic_context = Default::default();
        let input = PlannerInput {
            request: &request,
            static_context: &static_context,
            last_missing: &["what are the brand colours?".to_string()],
            available_tools: &[ToolKind::PdfExtract],
            dynamic_context: &dynamic_context,
            category: Some(Category::DesignChanges),
        };

        let plan = planner.plan(&input).await.unwrap();
        assert_eq!(plan.actions.len(), 1);
        assert_eq!(plan.actions[0].params.kind(), ToolKind::PdfExtract);
    }

    #[tokio::test]
    async fn unparseable_response_yields_empty_plan_not_error() {
        let provider = MockProvider::new(vec!["not json at all"]);
        let planner = Planner::new(provider, PlannerConfig::default());
        let request = sample_request();
        let static_context = sample_static_context();
        let dynamic_context = Default::default();
        let input = PlannerInput {
            request: &request,
            static_context: &static_context,
            last_missing: &[],
            available_tools: &[],
            dynamic_context: &dynamic_context,
            category: None,
        };

        let plan = planner.plan(&input).await.unwrap();
        assert!(plan.is_empty());
    }

    #[tokio::test]
    async fn provider_failure_surfaces_as_model_error() {
        let provider = MockProvider::with_error(ProviderError::RateLimited);
        let planner = Planner::new(provider, PlannerConfig::default());
        let request = sample_request();
        let static_context = sample_static_context();
        let dynamic_context = Default::default();
        let input = PlannerInput {
            request: &request,
            static_context: &static_context,
            last_missing: &[],
            available_tools: &[],
            dynamic_context: &dynamic_context,
            category: None,
        };

        let err = planner.plan(&input).await.unwrap_err();
        assert!(matches!(err, PlannerError::Model(_)));
    }
}
