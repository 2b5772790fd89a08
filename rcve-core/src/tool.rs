//! Tool domain types shared between the Registry, Planner, and Executor
//! (spec.md §4.1, §6, §9 "tool polymorphism").

use crate::confidence::Confidence;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The nine information-gathering tools (spec.md §4.1), as a closed tagged
/// enum rather than a stringly-typed map — per spec.md §9, tools vary
/// wildly in input/output shape and should be modelled as a tagged variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Retrieve and summarize a single web page.
    FetchPage,
    /// General-web factual search.
    WebSearch,
    /// Dimensions, size, format, optimization verdict for an image attachment.
    ImageProbe,
    /// Text + heuristic color/font extraction from a PDF attachment.
    PdfExtract,
    /// Enumerate forms on a page: action, method, fields, labels.
    FormDetect,
    /// Extract outbound social-platform links from page HTML.
    SocialFind,
    /// Title/meta/H1/alt-coverage/broken-link audit for a site.
    SeoAudit,
    /// Business hours/address/phone via a places API.
    MapsLookup,
    /// Aggregate reviews (rating, count, recent excerpts).
    ReviewsLookup,
}

impl ToolKind {
    /// All nine tool kinds, in the order listed in spec.md §4.1.
    pub const ALL: [ToolKind; 9] = [
        ToolKind::FetchPage,
        ToolKind::WebSearch,
        ToolKind::ImageProbe,
        ToolKind::PdfExtract,
        ToolKind::FormDetect,
        ToolKind::SocialFind,
        ToolKind::SeoAudit,
        ToolKind::MapsLookup,
        ToolKind::ReviewsLookup,
    ];

    /// The wire/config name for this tool, matching spec.md §4.1's table.
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::FetchPage => "fetch_page",
            ToolKind::WebSearch => "web_search",
            ToolKind::ImageProbe => "image_probe",
            ToolKind::PdfExtract => "pdf_extract",
            ToolKind::FormDetect => "form_detect",
            ToolKind::SocialFind => "social_find",
            ToolKind::SeoAudit => "seo_audit",
            ToolKind::MapsLookup => "maps_lookup",
            ToolKind::ReviewsLookup => "reviews_lookup",
        }
    }

    /// Parse a tool name back into its kind. Returns `None` for anything
    /// not in spec.md §4.1's table — the Executor treats that as an
    /// unrecognized tool name and drops the action (spec.md §4.2).
    pub fn from_name(name: &str) -> Option<Self> {
        ToolKind::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Typed parameters for one tool invocation, tagged by `ToolKind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolParams {
    /// Parameters for `fetch_page`.
    FetchPage {
        /// The page URL to retrieve.
        url: String,
    },
    /// Parameters for `web_search`.
    WebSearch {
        /// The search query.
        query: String,
    },
    /// Parameters for `image_probe`.
    ImageProbe {
        /// Identifier (filename or URL) of the attachment to probe.
        attachment: String,
    },
    /// Parameters for `pdf_extract`.
    PdfExtract {
        /// Identifier (filename or URL) of the PDF attachment.
        attachment: String,
    },
    /// Parameters for `form_detect`.
    FormDetect {
        /// The page URL to scan for forms.
        url: String,
    },
    /// Parameters for `social_find`.
    SocialFind {
        /// The page URL to scan for outbound social links.
        url: String,
    },
    /// Parameters for `seo_audit`.
    SeoAudit {
        /// The site URL to audit.
        url: String,
    },
    /// Parameters for `maps_lookup`.
    MapsLookup {
        /// The business name to search for.
        business_name: String,
        /// Optional location hint (city, postcode).
        location: Option<String>,
    },
    /// Parameters for `reviews_lookup`.
    ReviewsLookup {
        /// The business name to search for.
        business_name: String,
        /// Optional location hint (city, postcode).
        location: Option<String>,
    },
}

impl ToolParams {
    /// Which tool kind these parameters belong to.
    pub fn kind(&self) -> ToolKind {
        match self {
            ToolParams::FetchPage { .. } => ToolKind::FetchPage,
            ToolParams::WebSearch { .. } => ToolKind::WebSearch,
            ToolParams::ImageProbe { .. } => ToolKind::ImageProbe,
            ToolParams::PdfExtract { .. } => ToolKind::PdfExtract,
            ToolParams::FormDetect { .. } => ToolKind::FormDetect,
            ToolParams::SocialFind { .. } => ToolKind::SocialFind,
            ToolParams::SeoAudit { .. } => ToolKind::SeoAudit,
            ToolParams::MapsLookup { .. } => ToolKind::MapsLookup,
            ToolParams::ReviewsLookup { .. } => ToolKind::ReviewsLookup,
        }
    }
}

/// The kind of a tool-level failure (spec.md §6's `ToolResult.error.kind`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    /// The tool did not respond within its deadline.
    Timeout,
    /// An HTTP-level failure talking to a collaborator.
    Http,
    /// The tool's response could not be parsed.
    Parse,
    /// The tool's own call budget was exhausted.
    Budget,
    /// The parameters given to the tool were invalid.
    InvalidInput,
}

/// Structured tool-level error (spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResultError {
    /// What kind of failure this was.
    pub kind: ToolErrorKind,
    /// Human-readable detail.
    pub message: String,
}

/// Uniform result envelope returned by every tool (spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the invocation succeeded.
    pub ok: bool,
    /// Semantic keys to observed values.
    pub observations: HashMap<String, serde_json::Value>,
    /// Optional per-key confidence, overriding the Executor's default.
    pub confidence_by_key: HashMap<String, Confidence>,
    /// Tokens this invocation is estimated to have consumed.
    pub est_tokens: u64,
    /// Present only when `ok` is false.
    pub error: Option<ToolResultError>,
}

impl ToolResult {
    /// Build a successful result with no per-key confidence overrides.
    pub fn success(observations: HashMap<String, serde_json::Value>, est_tokens: u64) -> Self {
        Self {
            ok: true,
            observations,
            confidence_by_key: HashMap::new(),
            est_tokens,
            error: None,
        }
    }

    /// Build a failed result.
    pub fn failure(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            observations: HashMap::new(),
            confidence_by_key: HashMap::new(),
            est_tokens: 0,
            error: Some(ToolResultError {
                kind,
                message: message.into(),
            }),
        }
    }
}

/// Per-request tool budget bookkeeping (spec.md §3's `ToolUsage`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolBudget {
    /// Calls made so far this request.
    pub calls_made: u32,
    /// Maximum calls allowed this request.
    pub max_calls: u32,
}

impl ToolBudget {
    /// Whether another call is still available.
    pub fn has_remaining(&self) -> bool {
        self.calls_made < self.max_calls
    }
}

/// `tool_name -> {calls_made, max_calls}` (spec.md §3).
pub type ToolUsage = HashMap<ToolKind, ToolBudget>;

/// Build a fresh `ToolUsage` table from per-tool budgets, `calls_made = 0`
/// for every tool.
pub fn new_tool_usage(budgets: &HashMap<ToolKind, u32>) -> ToolUsage {
    ToolKind::ALL
        .into_iter()
        .map(|kind| {
            let max_calls = budgets.get(&kind).copied().unwrap_or(0);
            (
                kind,
                ToolBudget {
                    calls_made: 0,
                    max_calls,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_kind_name_roundtrip() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("not_a_tool"), None);
    }

    #[test]
    fn tool_params_tag_matches_kind() {
        let p = ToolParams::WebSearch {
            query: "brand colours".into(),
        };
        assert_eq!(p.kind(), ToolKind::WebSearch);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["tool"], "web_search");
    }

    #[test]
    fn new_tool_usage_seeds_zero_calls() {
        let budgets = HashMap::from([(ToolKind::FetchPage, 5)]);
        let usage = new_tool_usage(&budgets);
        assert_eq!(usage[&ToolKind::FetchPage].calls_made, 0);
        assert_eq!(usage[&ToolKind::FetchPage].max_calls, 5);
        assert_eq!(usage[&ToolKind::SeoAudit].max_calls, 0);
    }
}
