//! Turns a finalized `PreferenceRecord` into
//! recommendation text plus supplementary search results.
//!
//! The completion call is the substance: its failure fails the whole
//! generation. The search call only decorates, so its failure degrades to an
//! empty resource list.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::OrchestratorError;
use crate::questionnaire::PreferenceRecord;
use crate::search::{ResourceResult, ResourceSearchProvider};

use super::provider::RecommendationProvider;

/// Marker that flags a failure in providers that report errors in-band.
pub const ERROR_MARKER: &str = "Error";

/// How many search results are shown alongside the recommendation.
pub const HIGHLIGHTED_RESOURCES: usize = 3;

/// Orchestrator limits.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum search results requested.
    pub search_limit: usize,
    pub completion_timeout: Duration,
    pub search_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            search_limit: 5,
            completion_timeout: Duration::from_secs(60),
            search_timeout: Duration::from_secs(15),
        }
    }
}

/// A successful generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub text: String,
    pub resources: Vec<ResourceResult>,
    pub generated_at: DateTime<Utc>,
}

impl Recommendation {
    /// The resources surfaced to the user.
    pub fn highlighted_resources(&self) -> &[ResourceResult] {
        highlighted(&self.resources)
    }
}

/// First `HIGHLIGHTED_RESOURCES` entries of `resources`.
pub fn highlighted(resources: &[ResourceResult]) -> &[ResourceResult] {
    &resources[..resources.len().min(HIGHLIGHTED_RESOURCES)]
}

/// Calls the recommendation and search providers in sequence.
pub struct RecommendationOrchestrator {
    recommender: Arc<dyn RecommendationProvider>,
    search: Arc<dyn ResourceSearchProvider>,
    config: OrchestratorConfig,
}

impl RecommendationOrchestrator {
    pub fn new(
        recommender: Arc<dyn RecommendationProvider>,
        search: Arc<dyn ResourceSearchProvider>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            recommender,
            search,
            config,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Generate recommendations for `record`.
    ///
    /// The search provider is only called after a successful completion.
    pub async fn generate(
        &self,
        record: &PreferenceRecord,
    ) -> Result<Recommendation, OrchestratorError> {
        let text = self.complete(record).await?;
        let resources = self.find_resources(&record.subject).await;

        info!(
            subject = %record.subject,
            resources = resources.len(),
            "Recommendations generated"
        );
        Ok(Recommendation {
            text,
            resources,
            generated_at: Utc::now(),
        })
    }

    async fn complete(&self, record: &PreferenceRecord) -> Result<String, OrchestratorError> {
        let timeout = self.config.completion_timeout;
        let text = match tokio::time::timeout(timeout, self.recommender.complete(record)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!(error = %e, "Recommendation provider failed");
                return Err(OrchestratorError::GenerationFailed {
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                warn!(?timeout, "Recommendation provider timed out");
                return Err(OrchestratorError::Timeout { timeout });
            }
        };

        if self.recommender.reports_errors_in_text() && text.contains(ERROR_MARKER) {
            warn!("Recommendation text carries an error marker");
            return Err(OrchestratorError::GenerationFailed { reason: text });
        }
        Ok(text)
    }

    /// Search failures and timeouts yield an empty list.
    async fn find_resources(&self, subject: &str) -> Vec<ResourceResult> {
        let limit = self.config.search_limit;
        let timeout = self.config.search_timeout;
        match tokio::time::timeout(timeout, self.search.search(subject, limit)).await {
            Ok(Ok(mut results)) => {
                results.truncate(limit);
                results
            }
            Ok(Err(e)) => {
                warn!(provider = self.search.name(), error = %e, "Error fetching additional resources");
                Vec::new()
            }
            Err(_) => {
                warn!(provider = self.search.name(), ?timeout, "Resource search timed out");
                Vec::new()
            }
        }
    }
}
