//! Per-request metrics, exactly the names spec.md §6 lists.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::state::StopReason;
use crate::tool::ToolKind;

/// The named metrics emitted once per request (spec.md §6). Exporting
/// these to a specific backend (Prometheus, OTLP, ...) is a collaborator
/// concern; this struct is what `rcve-engine` hands to a `tracing`
/// subscriber.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    /// Enrichment iterations run.
    pub enrichment_iterations: u32,
    /// Whether the run reached `complete`.
    pub enrichment_success: bool,
    /// The terminal stop reason.
    pub enrichment_stop_reason: StopReason,
    /// Total tokens consumed.
    pub enrichment_total_tokens: u64,
    /// Fraction of initially-missing questions resolved by enrichment.
    pub enrichment_answer_rate: f64,
    /// Calls made per tool, keyed by the tool's wire name
    /// (`tool_<name>_calls`).
    pub tool_calls: HashMap<ToolKind, u32>,
    /// Mean confidence across the final dynamic context.
    pub final_enrichment_confidence: f64,
}

impl Metrics {
    fn calls_for(&self, kind: ToolKind) -> u32 {
        self.tool_calls.get(&kind).copied().unwrap_or(0)
    }

    /// Emit this as a single structured `tracing` event, one field per
    /// named metric (spec.md §6) — including one literal `tool_<name>_calls`
    /// field per tool, so a metrics-exporting subscriber layer can pick
    /// each one up by its exact name without parsing a nested map.
    /// `tracing`'s field names must be compile-time identifiers, so this
    /// is a fixed match over the nine tool kinds rather than a loop.
    pub fn emit(&self) {
        let stop_reason = serde_json::to_value(self.enrichment_stop_reason)
            .ok()
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_else(|| "unknown".to_string());
        tracing::info!(
            enrichment_iterations = self.enrichment_iterations,
            enrichment_success = self.enrichment_success,
            enrichment_stop_reason = %stop_reason,
            enrichment_total_tokens = self.enrichment_total_tokens,
            enrichment_answer_rate = self.enrichment_answer_rate,
            final_enrichment_confidence = self.final_enrichment_confidence,
            tool_fetch_page_calls = self.calls_for(ToolKind::FetchPage),
            tool_web_search_calls = self.calls_for(ToolKind::WebSearch),
            tool_image_probe_calls = self.calls_for(ToolKind::ImageProbe),
            tool_pdf_extract_calls = self.calls_for(ToolKind::PdfExtract),
            tool_form_detect_calls = self.calls_for(ToolKind::FormDetect),
            tool_social_find_calls = self.calls_for(ToolKind::SocialFind),
            tool_seo_audit_calls = self.calls_for(ToolKind::SeoAudit),
            tool_maps_lookup_calls = self.calls_for(ToolKind::MapsLookup),
            tool_reviews_lookup_calls = self.calls_for(ToolKind::ReviewsLookup),
            "enrichment run complete"
        );
    }
}
