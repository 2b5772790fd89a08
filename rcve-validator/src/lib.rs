#![deny(missing_docs)]
//! # rcve-validator — the Validator (spec.md §4.4)
//!
//! A single-call LLM operator, grounded on the same single-shot operator
//! pattern as `rcve-planner`: one model call, one parse. Unlike the
//! Planner, a parse failure here is **not** swallowed — spec.md §7 makes
//! the Validator's output the engine's only arbiter of completeness, so
//! an unparseable response propagates as [`ValidatorError::OutputInvalid`]
//! and it is the Loop Driver (in `rcve-engine`) that retries once before
//! treating it as fatal.

mod parse;
mod prompt;

pub use parse::ValidatorOutput;
pub use prompt::ValidatorInput;

use rcve_core::ValidatorError;
use rcve_llm::{CompletionRequest, Provider};

/// Static configuration for a [`Validator`] instance.
pub struct ValidatorConfig {
    /// Model identifier to request (`None` = provider default).
    pub model: Option<String>,
    /// Maximum tokens requested from the model per call.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: Option<f64>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 1024,
            temperature: Some(0.0),
        }
    }
}

/// The Validator: classifies completeness for the current pass. Generic
/// over `P: Provider`, matching `rcve_llm::Provider`'s non-object-safe
/// RPITIT design (the Planner and Validator are the only two LLM-calling
/// components, and both need this genericity rather than dynamic dispatch).
pub struct Validator<P: Provider> {
    provider: P,
    config: ValidatorConfig,
}

impl<P: Provider> Validator<P> {
    /// Build a new Validator over the given provider.
    pub fn new(provider: P, config: ValidatorConfig) -> Self {
        Self { provider, config }
    }

    /// Judge completeness for one pass.
    ///
    /// Returns [`ValidatorError::Model`] on a provider-level failure, and
    /// [`ValidatorError::OutputInvalid`] if the response cannot be parsed
    /// — callers (the Loop Driver) decide whether to retry.
    pub async fn validate(
        &self,
        input: &ValidatorInput<'_>,
    ) -> Result<ValidatorOutput, ValidatorError> {
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
            .map_err(|e| ValidatorError::Model(e.to_string()))?;

        parse::parse_output(&response.text).map_err(ValidatorError::OutputInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcve_core::{ClientId, DynamicContext, Request, StaticContext};
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
                            input_tokens: 30,
                            output_tokens: 10,
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
            raw_request: "Add a social media field to the contact form".to_string(),
            website_url: Some("example.co.uk".to_string()),
            attachments: vec![],
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
    async fn parses_complete_verdict() {
        let provider = MockProvider::new(vec![
            r#"{"complete": true, "missing": [], "confidence": 0.8, "category": "form_changes", "subcategories": []}"#,
        ]);
        let validator = Validator::new(provider, ValidatorConfig::default());
        let request = sample_request();
        let static_context = sample_static_context();
        let dynamic_context = DynamicContext::new();
        let input = ValidatorInput {
            request: &request,
            static_context: &static_context,
            dynamic_context: &dynamic_context,
            history: &[],
            iteration: 1,
            required_confidence: 0.75,
        };

        let output = validator.validate(&input).await.unwrap();
        assert!(output.complete);
        assert_eq!(output.confidence, 0.8);
    }

    #[tokio::test]
    async fn unparseable_response_is_output_invalid() {
        let provider = MockProvider::new(vec!["not json"]);
        let validator = Validator::new(provider, ValidatorConfig::default());
        let request = sample_request();
        let static_context = sample_static_context();
        let dynamic_context = DynamicContext::new();
        let input = ValidatorInput {
            request: &request,
            static_context: &static_context,
            dynamic_context: &dynamic_context,
            history: &[],
            iteration: 0,
            required_confidence: 0.85,
        };

        let err = validator.validate(&input).await.unwrap_err();
        assert!(matches!(err, ValidatorError::OutputInvalid(_)));
    }
}
