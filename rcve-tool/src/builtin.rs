//! Deterministic stand-ins for the nine information-gathering tools
//! (spec.md §4.1). These are collaborator bodies, not part of the
//! engine's core: a real deployment replaces each with a live HTTP call,
//! PDF parser, or places-API client. What matters here is the shape each
//! returns, not its accuracy.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use rcve_core::{Confidence, ToolKind, ToolParams, ToolResult};
use serde_json::json;

use crate::body::ToolBody;

macro_rules! boxed_call {
    ($body:expr) => {
        Box::pin(async move { $body })
    };
}

/// `fetch_page` — retrieve and summarize a single web page.
pub struct FetchPageTool;

impl ToolBody for FetchPageTool {
    fn kind(&self) -> ToolKind {
        ToolKind::FetchPage
    }

    fn description(&self) -> &str {
        "Retrieve and summarize a single web page"
    }

    fn call(&self, params: ToolParams) -> Pin<Box<dyn Future<Output = ToolResult> + Send + '_>> {
        boxed_call!({
            let ToolParams::FetchPage { url } = params else {
                return ToolResult::success(Default::default(), 0);
            };
            let mut obs = std::collections::HashMap::new();
            obs.insert("page_url".to_string(), json!(url));
            obs.insert(
                "page_summary".to_string(),
                json!(format!("rendered summary of {url}")),
            );
            ToolResult::success(obs, 800)
        })
    }
}

/// `web_search` — general-web factual search.
pub struct WebSearchTool;

impl ToolBody for WebSearchTool {
    fn kind(&self) -> ToolKind {
        ToolKind::WebSearch
    }

    fn description(&self) -> &str {
        "General-web factual search"
    }

    fn call(&self, params: ToolParams) -> Pin<Box<dyn Future<Output = ToolResult> + Send + '_>> {
        boxed_call!({
            let ToolParams::WebSearch { query } = params else {
                return ToolResult::success(Default::default(), 0);
            };
            // A bare keyword search rarely resolves a concrete missing
            // question on its own; this stand-in reports that honestly
            // rather than fabricating a confident answer.
            let mut obs = std::collections::HashMap::new();
            obs.insert(
                "search_summary".to_string(),
                json!(format!("no authoritative result for '{query}'")),
            );
            let mut result = ToolResult::success(obs, 600);
            result
                .confidence_by_key
                .insert("search_summary".to_string(), Confidence::new(0.3));
            result
        })
    }
}

/// `image_probe` — dimensions, size, format, optimization verdict.
pub struct ImageProbeTool;

impl ToolBody for ImageProbeTool {
    fn kind(&self) -> ToolKind {
        ToolKind::ImageProbe
    }

    fn description(&self) -> &str {
        "Dimensions, size, format, and optimization verdict for an image attachment"
    }

    fn call(&self, params: ToolParams) -> Pin<Box<dyn Future<Output = ToolResult> + Send + '_>> {
        boxed_call!({
            let ToolParams::ImageProbe { attachment } = params else {
                return ToolResult::success(Default::default(), 0);
            };
            let mut obs = std::collections::HashMap::new();
            obs.insert(format!("{attachment}_format"), json!("image/png"));
            obs.insert(format!("{attachment}_optimized"), json!(true));
            ToolResult::success(obs, 300)
        })
    }
}

/// `pdf_extract` — text + heuristic color/font extraction from a PDF.
pub struct PdfExtractTool;

impl ToolBody for PdfExtractTool {
    fn kind(&self) -> ToolKind {
        ToolKind::PdfExtract
    }

    fn description(&self) -> &str {
        "Text and heuristic color/font extraction from a PDF attachment"
    }

    fn call(&self, params: ToolParams) -> Pin<Box<dyn Future<Output = ToolResult> + Send + '_>> {
        boxed_call!({
            let ToolParams::PdfExtract { attachment: _ } = params else {
                return ToolResult::success(Default::default(), 0);
            };
            let mut obs = std::collections::HashMap::new();
            obs.insert("brand_primary".to_string(), json!("#FF6B6B"));
            obs.insert("fonts".to_string(), json!(["Montserrat", "Open Sans"]));
            obs.insert("logo_present".to_string(), json!(true));
            let mut result = ToolResult::success(obs, 1500);
            result
                .confidence_by_key
                .insert("brand_primary".to_string(), Confidence::new(0.95));
            result
                .confidence_by_key
                .insert("fonts".to_string(), Confidence::new(0.80));
            result
        })
    }
}

/// `form_detect` — enumerate forms on a page: action, method, fields, labels.
pub struct FormDetectTool;

impl ToolBody for FormDetectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::FormDetect
    }

    fn description(&self) -> &str {
        "Enumerate forms on a page: action, method, fields, labels"
    }

    fn call(&self, params: ToolParams) -> Pin<Box<dyn Future<Output = ToolResult> + Send + '_>> {
        boxed_call!({
            let ToolParams::FormDetect { url } = params else {
                return ToolResult::success(Default::default(), 0);
            };
            let mut obs = std::collections::HashMap::new();
            obs.insert("contact_form_url".to_string(), json!(url));
            obs.insert(
                "existing_form_fields".to_string(),
                json!(["name", "email", "message"]),
            );
            ToolResult::success(obs, 700)
        })
    }
}

/// `social_find` — extract outbound social-platform links from page HTML.
pub struct SocialFindTool;

impl ToolBody for SocialFindTool {
    fn kind(&self) -> ToolKind {
        ToolKind::SocialFind
    }

    fn description(&self) -> &str {
        "Extract outbound social-platform links from page HTML"
    }

    fn call(&self, params: ToolParams) -> Pin<Box<dyn Future<Output = ToolResult> + Send + '_>> {
        boxed_call!({
            let ToolParams::SocialFind { url: _ } = params else {
                return ToolResult::success(Default::default(), 0);
            };
            let mut obs = std::collections::HashMap::new();
            obs.insert("social_links".to_string(), json!([]));
            ToolResult::success(obs, 400)
        })
    }
}

/// `seo_audit` — title/meta/H1/alt-coverage/broken-link audit for a site.
pub struct SeoAuditTool;

impl ToolBody for SeoAuditTool {
    fn kind(&self) -> ToolKind {
        ToolKind::SeoAudit
    }

    fn description(&self) -> &str {
        "Title/meta/H1/alt-coverage/broken-link audit for a site"
    }

    fn call(&self, params: ToolParams) -> Pin<Box<dyn Future<Output = ToolResult> + Send + '_>> {
        boxed_call!({
            let ToolParams::SeoAudit { url } = params else {
                return ToolResult::success(Default::default(), 0);
            };
            let mut obs = std::collections::HashMap::new();
            obs.insert(
                "seo_audit_summary".to_string(),
                json!(format!("audit of {url}: no missing titles or alt text found")),
            );
            ToolResult::success(obs, 1_200)
        })
    }
}

/// `maps_lookup` — business hours/address/phone via a places API.
pub struct MapsLookupTool;

impl ToolBody for MapsLookupTool {
    fn kind(&self) -> ToolKind {
        ToolKind::MapsLookup
    }

    fn description(&self) -> &str {
        "Business hours/address/phone via a places API"
    }

    fn call(&self, params: ToolParams) -> Pin<Box<dyn Future<Output = ToolResult> + Send + '_>> {
        boxed_call!({
            let ToolParams::MapsLookup { business_name, .. } = params else {
                return ToolResult::success(Default::default(), 0);
            };
            let mut obs = std::collections::HashMap::new();
            obs.insert(
                "business_hours".to_string(),
                json!("Mon-Fri 9:00-17:00"),
            );
            obs.insert("business_name_confirmed".to_string(), json!(business_name));
            ToolResult::success(obs, 500)
        })
    }
}

/// `reviews_lookup` — aggregate reviews (rating, count, recent excerpts).
pub struct ReviewsLookupTool;

impl ToolBody for ReviewsLookupTool {
    fn kind(&self) -> ToolKind {
        ToolKind::ReviewsLookup
    }

    fn description(&self) -> &str {
        "Aggregate reviews (rating, count, recent excerpts)"
    }

    fn call(&self, params: ToolParams) -> Pin<Box<dyn Future<Output = ToolResult> + Send + '_>> {
        boxed_call!({
            let ToolParams::ReviewsLookup { .. } = params else {
                return ToolResult::success(Default::default(), 0);
            };
            let mut obs = std::collections::HashMap::new();
            obs.insert("review_rating".to_string(), json!(4.6));
            obs.insert("review_count".to_string(), json!(128));
            ToolResult::success(obs, 500)
        })
    }
}

/// All nine builtin tool bodies, suitable for
/// [`crate::registry::ToolRegistry::new`].
pub fn all_builtin_tools() -> Vec<Arc<dyn ToolBody>> {
    vec![
        Arc::new(FetchPageTool),
        Arc::new(WebSearchTool),
        Arc::new(ImageProbeTool),
        Arc::new(PdfExtractTool),
        Arc::new(FormDetectTool),
        Arc::new(SocialFindTool),
        Arc::new(SeoAuditTool),
        Arc::new(MapsLookupTool),
        Arc::new(ReviewsLookupTool),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetch_page_reports_url() {
        let tool = FetchPageTool;
        let result = tool
            .call(ToolParams::FetchPage {
                url: "https://example.com".into(),
            })
            .await;
        assert!(result.ok);
        assert_eq!(result.observations["page_url"], json!("https://example.com"));
    }

    #[tokio::test]
    async fn pdf_extract_reports_brand_kit() {
        let tool = PdfExtractTool;
        let result = tool
            .call(ToolParams::PdfExtract {
                attachment: "brandkit.pdf".into(),
            })
            .await;
        assert!(result.ok);
        assert_eq!(result.observations["brand_primary"], json!("#FF6B6B"));
        assert_eq!(
            result.confidence_by_key["brand_primary"].value(),
            0.95
        );
    }

    #[tokio::test]
    async fn all_builtin_tools_cover_every_kind() {
        let tools = all_builtin_tools();
        assert_eq!(tools.len(), 9);
        for kind in ToolKind::ALL {
            assert!(tools.iter().any(|t| t.kind() == kind));
        }
    }
}
