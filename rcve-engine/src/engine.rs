//! The Loop Driver (spec.md §4.6): orchestrates iterations, maintains
//! history, enforces global budgets, and hands each Validator pass to
//! the Router.

use std::sync::Arc;

use rcve_core::{
    new_tool_usage, Category, EngineError, EnrichedContextEntry, EnrichmentState,
    EscalationOutcome, IterationRecord, Metrics, Outcome, RequestId, RunInput, StopReason,
    ValidatorError,
};
use rcve_core::CompletedOutcome;
use rcve_executor::Executor;
use rcve_llm::Provider;
use rcve_planner::{Planner, PlannerInput};
use rcve_validator::{Validator, ValidatorInput, ValidatorOutput};

use crate::router::{self, RouterDecision};
use crate::state_store::EnrichmentStateStore;

/// Second Validator call inside [`Engine::validate_with_retry`] failed
/// to parse too, same as the first — this is not itself an engine error,
/// it is the trigger for the `validator_parse_error` escalation path.
enum ValidatorAttempt {
    Output(ValidatorOutput),
    ParseFailedTwice(String),
}

/// Ties the Planner, Validator, and Executor together into the
/// iteration loop described in spec.md §4.6, against a pluggable
/// [`EnrichmentStateStore`] for crash-recoverable per-request state.
pub struct Engine<P: Provider> {
    planner: Planner<P>,
    validator: Validator<P>,
    executor: Executor,
    state_store: Arc<dyn EnrichmentStateStore>,
}

impl<P: Provider> Engine<P> {
    /// Build an engine from its three components and a state store.
    pub fn new(
        planner: Planner<P>,
        validator: Validator<P>,
        executor: Executor,
        state_store: Arc<dyn EnrichmentStateStore>,
    ) -> Self {
        Self {
            planner,
            validator,
            executor,
            state_store,
        }
    }

    /// Run one request to a terminal outcome.
    ///
    /// Model-level failures from the Planner or Validator (network, auth,
    /// rate limiting) are not given a `stop_reason` by spec.md §7 — they
    /// are genuine infrastructure failures, not a state the engine can
    /// reason about, so they propagate as `Err` rather than becoming an
    /// `EscalationOutcome`. Everything spec.md §7 names a disposition for
    /// (budget/timeout/parse/progress/iteration/token failures) resolves
    /// to one of the two `Outcome` variants.
    pub async fn run(&self, input: RunInput) -> Result<Outcome, EngineError> {
        let config = input.resolved_config();
        let tool_usage = new_tool_usage(&config.tool_budgets);
        let mut state = EnrichmentState::initial(config.token_budget, tool_usage);
        self.persist(&input.request_id, &state).await?;

        let iteration0_input = ValidatorInput {
            request: &input.request,
            static_context: &input.static_context,
            dynamic_context: &state.dynamic_context,
            history: &state.history,
            iteration: 0,
            required_confidence: config.threshold_for_iteration(0),
        };
        let attempt = self.validate_with_retry(&iteration0_input).await?;
        let mut validator_output = match attempt {
            ValidatorAttempt::Output(output) => output,
            ValidatorAttempt::ParseFailedTwice(reason) => {
                tracing::error!(error = %reason, "validator output invalid twice on iteration 0");
                return Ok(self.escalate(
                    &input.request_id,
                    &state,
                    StopReason::ValidatorParseError,
                    Vec::new(),
                    0,
                ));
            }
        };
        let initial_missing_count = validator_output.missing.len();
        apply_validator_output(&mut state, &validator_output);
        self.persist(&input.request_id, &state).await?;

        loop {
            let threshold = config.threshold_for_iteration(state.iteration);
            let validator_complete = validator_output.complete && validator_output.confidence >= threshold;

            match router::route(&state, validator_complete, config.max_iterations) {
                RouterDecision::Architect => {
                    let outcome = self.complete(&input.request_id, &state, initial_missing_count);
                    self.state_store.remove(&input.request_id).await.ok();
                    return Ok(outcome);
                }
                RouterDecision::Escalate(reason) => {
                    let outcome = self.escalate(
                        &input.request_id,
                        &state,
                        reason,
                        state.last_missing.clone(),
                        initial_missing_count,
                    );
                    self.state_store.remove(&input.request_id).await.ok();
                    return Ok(outcome);
                }
                RouterDecision::Enrich => {
                    state.iteration += 1;
                    let missing_before = state.last_missing.clone();
                    let tokens_before = state.tokens_used;

                    let available_tools = self.executor.available_tools(&state.tool_usage);
                    let planner_input = PlannerInput {
                        request: &input.request,
                        static_context: &input.static_context,
                        last_missing: &state.last_missing,
                        available_tools: &available_tools,
                        dynamic_context: &state.dynamic_context,
                        category: state.last_category,
                    };
                    let plan = self.planner.plan(&planner_input).await?;

                    let tool_calls = self
                        .executor
                        .dispatch(
                            &plan,
                            state.iteration,
                            &mut state.tool_usage,
                            &mut state.dynamic_context,
                            &mut state.tokens_used,
                            state.token_budget,
                        )
                        .await;
                    let tokens_consumed = state.tokens_used - tokens_before;

                    let validator_input = ValidatorInput {
                        request: &input.request,
                        static_context: &input.static_context,
                        dynamic_context: &state.dynamic_context,
                        history: &state.history,
                        iteration: state.iteration,
                        required_confidence: config.threshold_for_iteration(state.iteration),
                    };
                    let attempt = self.validate_with_retry(&validator_input).await?;
                    validator_output = match attempt {
                        ValidatorAttempt::Output(output) => output,
                        ValidatorAttempt::ParseFailedTwice(reason) => {
                            tracing::error!(
                                error = %reason,
                                iteration = state.iteration,
                                "validator output invalid twice"
                            );
                            state.history.push(IterationRecord {
                                iteration: state.iteration,
                                plan,
                                tool_calls,
                                tokens_consumed,
                                missing_before: missing_before.clone(),
                                missing_after: missing_before,
                            });
                            let outcome = self.escalate(
                                &input.request_id,
                                &state,
                                StopReason::ValidatorParseError,
                                Vec::new(),
                                initial_missing_count,
                            );
                            self.state_store.remove(&input.request_id).await.ok();
                            return Ok(outcome);
                        }
                    };
                    let missing_after = validator_output.missing.clone();

                    state.history.push(IterationRecord {
                        iteration: state.iteration,
                        plan,
                        tool_calls,
                        tokens_consumed,
                        missing_before,
                        missing_after,
                    });
                    apply_validator_output(&mut state, &validator_output);
                    self.persist(&input.request_id, &state).await?;
                }
            }
        }
    }

    async fn persist(&self, request_id: &RequestId, state: &EnrichmentState) -> Result<(), EngineError> {
        self.state_store
            .write(request_id, state.clone())
            .await
            .map_err(|e| EngineError::State(e.to_string()))
    }

    async fn validate_with_retry(
        &self,
        input: &ValidatorInput<'_>,
    ) -> Result<ValidatorAttempt, EngineError> {
        match self.validator.validate(input).await {
            Ok(output) => Ok(ValidatorAttempt::Output(output)),
            Err(ValidatorError::OutputInvalid(first_reason)) => {
                tracing::warn!(error = %first_reason, "validator output invalid, retrying once");
                match self.validator.validate(input).await {
                    Ok(output) => Ok(ValidatorAttempt::Output(output)),
                    Err(ValidatorError::OutputInvalid(second_reason)) => {
                        Ok(ValidatorAttempt::ParseFailedTwice(second_reason))
                    }
                    Err(other) => Err(EngineError::Validator(other)),
                }
            }
            Err(other) => Err(EngineError::Validator(other)),
        }
    }

    fn complete(
        &self,
        request_id: &RequestId,
        state: &EnrichmentState,
        initial_missing_count: usize,
    ) -> Outcome {
        let metrics = self.metrics(state, true, StopReason::Complete, initial_missing_count);
        metrics.emit();
        Outcome::Completed(CompletedOutcome {
            request_id: request_id.clone(),
            category: state.last_category.unwrap_or(Category::Unclear),
            subcategories: state.last_subcategories.clone(),
            enriched_context: EnrichedContextEntry::from_context(&state.dynamic_context),
            history: state.history.clone(),
            tokens_used: state.tokens_used,
            iterations: state.iteration,
        })
    }

    fn escalate(
        &self,
        request_id: &RequestId,
        state: &EnrichmentState,
        stop_reason: StopReason,
        missing_questions: Vec<String>,
        initial_missing_count: usize,
    ) -> Outcome {
        let missing_questions = if missing_questions.is_empty() {
            state.last_missing.clone()
        } else {
            missing_questions
        };
        let metrics = self.metrics(state, false, stop_reason, initial_missing_count);
        metrics.emit();
        Outcome::Escalated(EscalationOutcome {
            request_id: request_id.clone(),
            category: state.last_category.unwrap_or(Category::Unclear),
            subcategories: state.last_subcategories.clone(),
            stop_reason,
            missing_questions,
            enriched_context: EnrichedContextEntry::from_context(&state.dynamic_context),
            history: state.history.clone(),
            tokens_used: state.tokens_used,
            iterations: state.iteration,
        })
    }

    fn metrics(
        &self,
        state: &EnrichmentState,
        success: bool,
        stop_reason: StopReason,
        initial_missing_count: usize,
    ) -> Metrics {
        let tool_calls = state
            .tool_usage
            .iter()
            .map(|(kind, budget)| (*kind, budget.calls_made))
            .collect();
        Metrics {
            enrichment_iterations: state.iteration,
            enrichment_success: success,
            enrichment_stop_reason: stop_reason,
            enrichment_total_tokens: state.tokens_used,
            enrichment_answer_rate: state.answer_rate(initial_missing_count),
            tool_calls,
            final_enrichment_confidence: state.dynamic_context.mean_confidence(),
        }
    }
}

fn apply_validator_output(state: &mut EnrichmentState, output: &ValidatorOutput) {
    state.last_missing = output.missing.clone();
    state.last_confidence = output.confidence;
    state.last_category = Some(output.category);
    state.last_subcategories = output.subcategories.clone();
}
