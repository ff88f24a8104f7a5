//! Error types for Course Compass.

use std::time::Duration;

use crate::questionnaire::QuestionKey;
use crate::session::Phase;

/// Top-level error type for the application.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Questionnaire error: {0}")]
    Questionnaire(#[from] QuestionnaireError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised while collecting and finalizing questionnaire answers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionnaireError {
    /// A single answer was rejected. The state is left untouched.
    #[error("Invalid answer for {key}: {reason}")]
    Validation { key: QuestionKey, reason: String },

    #[error("No question at step {step}, the questionnaire is complete")]
    OutOfRange { step: usize },

    /// Finalize found keys without answers. The session must restart.
    #[error("Please complete all questions before proceeding (missing: {})", format_keys(.missing))]
    IncompleteAnswers { missing: Vec<QuestionKey> },
}

fn format_keys(keys: &[QuestionKey]) -> String {
    keys.iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Credential format errors. No network call is ever made to validate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("Invalid API key format. It should start with '{prefix}'")]
    InvalidFormat { prefix: &'static str },
}

/// Session controller errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("A valid API key is required before answering questions")]
    CredentialRequired,

    #[error("Answers are not accepted while the session is {phase}")]
    InputDisabled { phase: Phase },

    #[error("Session cannot transition from {from} to {to}")]
    InvalidTransition { from: Phase, to: Phase },

    #[error(transparent)]
    Questionnaire(#[from] QuestionnaireError),
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },
}

/// Web search errors. These never reach the user.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    Request(String),

    #[error("Search API returned status {status}")]
    Status { status: u16 },

    #[error("Failed to parse search results: {0}")]
    Parse(String),
}

/// Recommendation generation errors.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("Error generating recommendations: {reason}")]
    GenerationFailed { reason: String },

    #[error("Error generating recommendations: provider timed out after {timeout:?}")]
    Timeout { timeout: Duration },
}

/// Session persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for the application.
pub type Result<T> = std::result::Result<T, Error>;
