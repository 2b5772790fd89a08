//! The dynamic context accumulated by tools during enrichment (spec.md §3,
//! §9 "confidence arithmetic").

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::confidence::Confidence;
use crate::tool::ToolKind;

/// One observation merged into the dynamic context for a given key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// The observed value.
    pub value: serde_json::Value,
    /// Which tool produced this observation.
    pub source_tool: ToolKind,
    /// Confidence of this specific observation.
    pub confidence: Confidence,
    /// Iteration at which this observation was merged (0 = initial pass).
    pub iteration: u32,
}

/// A mapping from semantic key to the current best observation for that
/// key (spec.md §3). Grows monotonically: once a key is present it is
/// never removed, though its value may be replaced by a later,
/// higher-confidence observation (ties broken by iteration recency).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DynamicContext(BTreeMap<String, Observation>);

impl DynamicContext {
    /// An empty dynamic context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently present.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the context holds no keys yet.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up the current observation for a key.
    pub fn get(&self, key: &str) -> Option<&Observation> {
        self.0.get(key)
    }

    /// Iterate all key/observation pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Observation)> {
        self.0.iter()
    }

    /// Merge a new observation for `key`. Returns `true` if this call
    /// changed the stored value (new key, or replaced an existing one).
    ///
    /// Replacement rule (spec.md §3): a later observation overwrites an
    /// earlier one only if its confidence is strictly higher, or equal
    /// with a later iteration (iteration recency breaks ties).
    pub fn merge(
        &mut self,
        key: impl Into<String>,
        value: serde_json::Value,
        source_tool: ToolKind,
        confidence: Confidence,
        iteration: u32,
    ) -> bool {
        let key = key.into();
        match self.0.get(&key) {
            None => {
                self.0.insert(
                    key,
                    Observation {
                        value,
                        source_tool,
                        confidence,
                        iteration,
                    },
                );
                true
            }
            Some(existing) => {
                let should_replace = confidence.value() > existing.confidence.value()
                    || (confidence.value() == existing.confidence.value()
                        && iteration >= existing.iteration);
                if should_replace {
                    self.0.insert(
                        key,
                        Observation {
                            value,
                            source_tool,
                            confidence,
                            iteration,
                        },
                    );
                }
                should_replace
            }
        }
    }

    /// Mean confidence across all observations. `0.0` if empty, matching
    /// the natural reading of `final_enrichment_confidence` for a request
    /// that never accumulated any observations.
    pub fn mean_confidence(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.0.values().map(|o| o.confidence.value()).sum();
        sum / self.0.len() as f64
    }

    /// Render as labelled bullets for the architect handoff (spec.md §4.7):
    /// one line per key, citing source tool and confidence to two
    /// decimal places, flagging low-confidence entries as uncertain.
    pub fn render_for_architect(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|(key, obs)| {
                let flag = if obs.confidence.is_uncertain() {
                    " (uncertain)"
                } else {
                    ""
                };
                format!(
                    "{key}: {} [source: {}, confidence: {:.2}]{flag}",
                    obs.value,
                    obs.source_tool,
                    obs.confidence.value()
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_inserts_new_key() {
        let mut ctx = DynamicContext::new();
        let changed = ctx.merge(
            "about_page_url",
            json!("https://example.com/about"),
            ToolKind::FetchPage,
            Confidence::new(0.9),
            1,
        );
        assert!(changed);
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn higher_confidence_overwrites() {
        let mut ctx = DynamicContext::new();
        ctx.merge(
            "brand_primary",
            json!("#000000"),
            ToolKind::FetchPage,
            Confidence::new(0.6),
            1,
        );
        let changed = ctx.merge(
            "brand_primary",
            json!("#FF6B6B"),
            ToolKind::PdfExtract,
            Confidence::new(0.95),
            2,
        );
        assert!(changed);
        assert_eq!(ctx.get("brand_primary").unwrap().value, json!("#FF6B6B"));
    }

    #[test]
    fn lower_confidence_does_not_overwrite() {
        let mut ctx = DynamicContext::new();
        ctx.merge(
            "brand_primary",
            json!("#FF6B6B"),
            ToolKind::PdfExtract,
            Confidence::new(0.95),
            1,
        );
        let changed = ctx.merge(
            "brand_primary",
            json!("#000000"),
            ToolKind::FetchPage,
            Confidence::new(0.5),
            2,
        );
        assert!(!changed);
        assert_eq!(ctx.get("brand_primary").unwrap().value, json!("#FF6B6B"));
    }

    #[test]
    fn tie_breaks_on_iteration_recency() {
        let mut ctx = DynamicContext::new();
        ctx.merge(
            "logo_present",
            json!(false),
            ToolKind::FetchPage,
            Confidence::new(0.7),
            1,
        );
        let changed = ctx.merge(
            "logo_present",
            json!(true),
            ToolKind::PdfExtract,
            Confidence::new(0.7),
            2,
        );
        assert!(changed);
        assert_eq!(ctx.get("logo_present").unwrap().value, json!(true));
    }

    #[test]
    fn keys_never_removed() {
        let mut ctx = DynamicContext::new();
        ctx.merge("a", json!(1), ToolKind::WebSearch, Confidence::new(0.7), 1);
        ctx.merge("b", json!(2), ToolKind::WebSearch, Confidence::new(0.7), 2);
        assert_eq!(ctx.len(), 2);
        assert!(ctx.get("a").is_some());
    }
}
