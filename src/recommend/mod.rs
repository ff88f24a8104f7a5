//! Course recommendation: prompt, LLM-backed provider and the orchestrator
//! that merges recommendations with web search results.

pub mod orchestrator;
pub mod prompts;
pub mod provider;

pub use orchestrator::{
    HIGHLIGHTED_RESOURCES, OrchestratorConfig, Recommendation, RecommendationOrchestrator,
    highlighted,
};
pub use provider::{CourseRecommender, RecommendationProvider, RecommenderConfig};
