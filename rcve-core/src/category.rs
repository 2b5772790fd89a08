//! Request classification (spec.md §4.4's fixed ten categories).

use serde::{Deserialize, Serialize};

/// The fixed set of categories the Validator must classify a request into.
/// `Unclear` on iteration 0 is a terminal signal to the Router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// A new blog post.
    BlogPost,
    /// A search-engine-optimization request.
    SeoOptimization,
    /// A defect to fix on the live site.
    BugFix,
    /// An update to existing page content.
    ContentUpdate,
    /// An update to business facts (hours, address, phone, etc).
    BusinessInfoUpdate,
    /// A new page to add to the site.
    NewPage,
    /// A change to an existing form.
    FormChanges,
    /// A visual/layout change.
    DesignChanges,
    /// A request for a new capability.
    FeatureRequest,
    /// The request could not be classified with confidence.
    Unclear,
}

impl Category {
    /// Whether, on iteration 0, this category should short-circuit
    /// straight to escalation (spec.md §4.5) — no amount of enrichment
    /// will make an unclear request clear.
    pub fn is_unclear(&self) -> bool {
        matches!(self, Category::Unclear)
    }
}
