//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::LlmConfig;
use crate::recommend::{OrchestratorConfig, RecommenderConfig};

/// Default Groq model.
pub const DEFAULT_MODEL: &str = "mixtral-8x7b-32768";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API key from the environment, if any. The terminal front end prompts
    /// for one otherwise.
    pub api_key: Option<SecretString>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Bound on the completion call.
    pub completion_timeout: Duration,
    /// Bound on the resource search call.
    pub search_timeout: Duration,
    /// Maximum search results requested per generation.
    pub search_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 2048,
            completion_timeout: Duration::from_secs(60),
            search_timeout: Duration::from_secs(15),
            search_limit: 5,
        }
    }
}

impl AppConfig {
    /// Read configuration from the environment, falling back to defaults for
    /// anything unset. Set-but-unparseable values are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_key = lookup("GROQ_API_KEY")
            .filter(|s| !s.trim().is_empty())
            .map(SecretString::from);

        let model = lookup("COURSE_COMPASS_MODEL").unwrap_or(defaults.model);

        let temperature = parse_var(&lookup, "COURSE_COMPASS_TEMPERATURE")?
            .unwrap_or(defaults.temperature);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidValue {
                key: "COURSE_COMPASS_TEMPERATURE".to_string(),
                message: format!("{temperature} is outside 0.0..=2.0"),
            });
        }

        let max_tokens =
            parse_var(&lookup, "COURSE_COMPASS_MAX_TOKENS")?.unwrap_or(defaults.max_tokens);

        let completion_timeout = parse_var(&lookup, "COURSE_COMPASS_COMPLETION_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.completion_timeout);

        let search_timeout = parse_var(&lookup, "COURSE_COMPASS_SEARCH_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.search_timeout);

        let search_limit =
            parse_var(&lookup, "COURSE_COMPASS_SEARCH_LIMIT")?.unwrap_or(defaults.search_limit);

        Ok(Self {
            api_key,
            model,
            temperature,
            max_tokens,
            completion_timeout,
            search_timeout,
            search_limit,
        })
    }

    pub fn llm_config(&self, api_key: SecretString) -> LlmConfig {
        LlmConfig {
            api_key,
            model: self.model.clone(),
        }
    }

    pub fn recommender_config(&self) -> RecommenderConfig {
        RecommenderConfig {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            search_limit: self.search_limit,
            completion_timeout: self.completion_timeout,
            search_timeout: self.search_timeout,
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.search_limit, 5);
        assert_eq!(config.completion_timeout, Duration::from_secs(60));
    }

    #[test]
    fn overrides_from_env() {
        let config = AppConfig::from_lookup(lookup(&[
            ("GROQ_API_KEY", "gsk_abcdefghijklmnopqrstuvwxyz"),
            ("COURSE_COMPASS_MODEL", "llama-3.3-70b-versatile"),
            ("COURSE_COMPASS_TEMPERATURE", "0.2"),
            ("COURSE_COMPASS_SEARCH_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(
            config.api_key.as_ref().unwrap().expose_secret(),
            "gsk_abcdefghijklmnopqrstuvwxyz"
        );
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert!((config.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.orchestrator_config().search_timeout, Duration::from_secs(3));
    }

    #[test]
    fn blank_api_key_is_ignored() {
        let config = AppConfig::from_lookup(lookup(&[("GROQ_API_KEY", "  ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn unparseable_values_are_errors() {
        let err = AppConfig::from_lookup(lookup(&[("COURSE_COMPASS_MAX_TOKENS", "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "COURSE_COMPASS_MAX_TOKENS"));

        let err = AppConfig::from_lookup(lookup(&[("COURSE_COMPASS_TEMPERATURE", "9")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
