//! Web search for supplementary learning resources.
//!
//! Search results decorate a recommendation; they are never required for one.
//! Callers treat any `SearchError` as "no results".

pub mod duckduckgo;

pub use duckduckgo::DuckDuckGoSearch;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceResult {
    pub title: String,
    pub body: String,
    #[serde(alias = "href")]
    pub url: String,
}

impl ResourceResult {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            url: url.into(),
        }
    }
}

/// Finds learning resources for a subject.
#[async_trait]
pub trait ResourceSearchProvider: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Return at most `limit` results for `subject`, best first.
    async fn search(&self, subject: &str, limit: usize)
    -> Result<Vec<ResourceResult>, SearchError>;
}
