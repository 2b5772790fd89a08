//! Parsing the Validator's structured JSON output.

use rcve_core::Category;
use serde::Deserialize;

/// The Validator's structured verdict for one pass (spec.md §4.4).
#[derive(Debug, Clone, Deserialize)]
pub struct ValidatorOutput {
    /// Whether the request is ready to hand to the architect.
    pub complete: bool,
    /// Free-text questions still outstanding.
    #[serde(default)]
    pub missing: Vec<String>,
    /// Confidence in this verdict, `[0, 1]`.
    pub confidence: f64,
    /// Fixed classification (spec.md §4.4's ten categories).
    pub category: Category,
    /// Free-text subcategory tags.
    #[serde(default)]
    pub subcategories: Vec<String>,
}

/// Parse a model's raw text response into a [`ValidatorOutput`].
pub fn parse_output(raw_text: &str) -> Result<ValidatorOutput, String> {
    let trimmed = strip_code_fence(raw_text);
    serde_json::from_str(trimmed).map_err(|e| e.to_string())
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        rest.trim().trim_end_matches("```").trim()
    } else {
        trimmed
    }
}
