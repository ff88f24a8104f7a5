//! The recommendation provider seam and its LLM-backed implementation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::error::LlmError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};
use crate::questionnaire::PreferenceRecord;

use super::prompts::{SYSTEM_PROMPT, recommendation_prompt};

/// Produces free-text (markdown) course recommendations.
#[async_trait]
pub trait RecommendationProvider: Send + Sync {
    async fn complete(&self, preferences: &PreferenceRecord) -> Result<String, LlmError>;

    /// True for providers that cannot fail through `Err` and instead embed
    /// the error in the returned text.
    fn reports_errors_in_text(&self) -> bool {
        false
    }
}

/// Sampling settings for recommendation completions.
#[derive(Debug, Clone)]
pub struct RecommenderConfig {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2048,
        }
    }
}

/// Asks an LLM for courses matching the user's preferences.
pub struct CourseRecommender {
    llm: Arc<dyn LlmProvider>,
    config: RecommenderConfig,
}

impl CourseRecommender {
    pub fn new(llm: Arc<dyn LlmProvider>, config: RecommenderConfig) -> Self {
        Self { llm, config }
    }
}

#[async_trait]
impl RecommendationProvider for CourseRecommender {
    async fn complete(&self, preferences: &PreferenceRecord) -> Result<String, LlmError> {
        info!(
            model = self.llm.model_name(),
            subject = %preferences.subject,
            "Requesting course recommendations"
        );
        let request = CompletionRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(recommendation_prompt(preferences)),
        ])
        .with_temperature(self.config.temperature)
        .with_max_tokens(self.config.max_tokens);

        let response = self.llm.complete(request).await?;
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionResponse, Role};
    use crate::questionnaire::{
        Availability, BudgetTier, CareerGoal, ExperienceLevel, LearningFormat,
    };
    use std::sync::Mutex;

    /// Mock LLM that records requests and returns a fixed response.
    struct RecordingLlm {
        response: String,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    #[async_trait]
    impl LlmProvider for RecordingLlm {
        fn model_name(&self) -> &str {
            "mock-recommender"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.requests.lock().unwrap().push(request);
            Ok(CompletionResponse {
                content: self.response.clone(),
                input_tokens: 10,
                output_tokens: 20,
            })
        }
    }

    fn prefs() -> PreferenceRecord {
        PreferenceRecord {
            name: "Ada".into(),
            subject: "Rust".into(),
            availability: Availability::OneToTwoHours,
            budget: BudgetTier::Under50,
            format: LearningFormat::Video,
            experience: ExperienceLevel::Beginner,
            goal: CareerGoal::Knowledge,
        }
    }

    #[tokio::test]
    async fn sends_system_and_user_messages() {
        let llm = Arc::new(RecordingLlm {
            response: "1. **Rustlings**".into(),
            requests: Mutex::new(Vec::new()),
        });
        let recommender = CourseRecommender::new(llm.clone(), RecommenderConfig::default());

        let text = recommender.complete(&prefs()).await.unwrap();
        assert_eq!(text, "1. **Rustlings**");
        assert!(!recommender.reports_errors_in_text());

        let requests = llm.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, SYSTEM_PROMPT);
        assert_eq!(request.messages[1].role, Role::User);
        assert!(request.messages[1].content.contains("- Subject: Rust"));
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.max_tokens, Some(2048));
    }
}
