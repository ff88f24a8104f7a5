//! Adapter from rig's `CompletionModel` to our `LlmProvider` trait.

use async_trait::async_trait;
use rig::completion::{CompletionError, CompletionModel};
use rig::message::{AssistantContent, Message};

use crate::error::LlmError;

use super::provider::{ChatMessage, CompletionRequest, CompletionResponse, LlmProvider, Role};

/// Wraps any rig completion model.
pub struct RigAdapter<M> {
    model: M,
    model_name: String,
    provider: &'static str,
}

impl<M: CompletionModel> RigAdapter<M> {
    pub fn new(model: M, model_name: &str, provider: &'static str) -> Self {
        Self {
            model,
            model_name: model_name.to_string(),
            provider,
        }
    }
}

/// A chat transcript split the way rig's request builder wants it.
#[derive(Debug, PartialEq)]
struct SplitMessages {
    preamble: Option<String>,
    history: Vec<ChatMessage>,
    prompt: String,
}

/// System messages become the preamble, the trailing user message becomes
/// the prompt and everything in between is history.
fn split_messages(provider: &str, messages: Vec<ChatMessage>) -> Result<SplitMessages, LlmError> {
    let (system, mut rest): (Vec<_>, Vec<_>) = messages
        .into_iter()
        .partition(|m| m.role == Role::System);

    let prompt = match rest.pop() {
        Some(last) if last.role == Role::User => last.content,
        _ => {
            return Err(LlmError::RequestFailed {
                provider: provider.to_string(),
                reason: "request must end with a user message".to_string(),
            });
        }
    };

    let preamble = (!system.is_empty()).then(|| {
        system
            .into_iter()
            .map(|m| m.content)
            .collect::<Vec<_>>()
            .join("\n\n")
    });

    Ok(SplitMessages {
        preamble,
        history: rest,
        prompt,
    })
}

fn to_rig_message(message: ChatMessage) -> Message {
    match message.role {
        Role::Assistant => Message::assistant(message.content),
        Role::User | Role::System => Message::user(message.content),
    }
}

/// Classify a provider error body. Groq reports auth and quota problems in
/// the JSON error payload.
fn classify_provider_error(provider: &str, body: &str) -> LlmError {
    let lower = body.to_lowercase();
    if lower.contains("invalid_api_key")
        || lower.contains("invalid api key")
        || lower.contains("unauthorized")
    {
        LlmError::AuthFailed {
            provider: provider.to_string(),
        }
    } else if lower.contains("rate_limit") || lower.contains("rate limit") {
        LlmError::RateLimited {
            provider: provider.to_string(),
            retry_after: None,
        }
    } else {
        LlmError::RequestFailed {
            provider: provider.to_string(),
            reason: body.to_string(),
        }
    }
}

fn map_completion_error(provider: &str, error: CompletionError) -> LlmError {
    match error {
        CompletionError::ProviderError(body) => classify_provider_error(provider, &body),
        other => LlmError::RequestFailed {
            provider: provider.to_string(),
            reason: other.to_string(),
        },
    }
}

#[async_trait]
impl<M> LlmProvider for RigAdapter<M>
where
    M: CompletionModel + Send + Sync + 'static,
{
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let split = split_messages(self.provider, request.messages)?;
        let history: Vec<Message> = split.history.into_iter().map(to_rig_message).collect();

        let mut builder = self
            .model
            .completion_request(Message::user(split.prompt))
            .messages(history);
        if let Some(preamble) = split.preamble {
            builder = builder.preamble(preamble);
        }
        if let Some(temperature) = request.temperature {
            builder = builder.temperature(f64::from(temperature));
        }
        if let Some(max_tokens) = request.max_tokens {
            builder = builder.max_tokens(u64::from(max_tokens));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| map_completion_error(self.provider, e))?;

        let content = response
            .choice
            .iter()
            .filter_map(|c| match c {
                AssistantContent::Text(text) => Some(text.text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("");
        if content.trim().is_empty() {
            return Err(LlmError::InvalidResponse {
                provider: self.provider.to_string(),
                reason: "response contained no text".to_string(),
            });
        }

        let completion = CompletionResponse {
            content,
            input_tokens: u32::try_from(response.usage.input_tokens).unwrap_or(u32::MAX),
            output_tokens: u32::try_from(response.usage.output_tokens).unwrap_or(u32::MAX),
        };
        tracing::debug!(
            model = %self.model_name,
            input_tokens = completion.input_tokens,
            output_tokens = completion.output_tokens,
            "Completion finished"
        );
        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_messages_become_preamble() {
        let split = split_messages(
            "groq",
            vec![
                ChatMessage::system("Be brief."),
                ChatMessage::user("Suggest a course"),
            ],
        )
        .unwrap();
        assert_eq!(
            split,
            SplitMessages {
                preamble: Some("Be brief.".into()),
                history: vec![],
                prompt: "Suggest a course".into(),
            }
        );
    }

    #[test]
    fn earlier_turns_become_history() {
        let split = split_messages(
            "groq",
            vec![
                ChatMessage::user("Hi"),
                ChatMessage {
                    role: Role::Assistant,
                    content: "Hello".into(),
                },
                ChatMessage::user("Suggest a course"),
            ],
        )
        .unwrap();
        assert!(split.preamble.is_none());
        assert_eq!(split.history.len(), 2);
        assert_eq!(split.history[1].role, Role::Assistant);
        assert_eq!(split.prompt, "Suggest a course");
    }

    #[test]
    fn request_without_trailing_user_message_is_rejected() {
        let err = split_messages("groq", vec![ChatMessage::system("Be brief.")]).unwrap_err();
        assert!(matches!(err, LlmError::RequestFailed { .. }));
    }

    #[test]
    fn provider_errors_are_classified() {
        let auth = classify_provider_error(
            "groq",
            "{\"error\":{\"message\":\"Invalid API Key\",\"code\":\"invalid_api_key\"}}",
        );
        assert!(matches!(auth, LlmError::AuthFailed { .. }));

        let limited = classify_provider_error(
            "groq",
            "{\"error\":{\"message\":\"Rate limit reached\",\"code\":\"rate_limit_exceeded\"}}",
        );
        assert!(matches!(
            limited,
            LlmError::RateLimited {
                retry_after: None,
                ..
            }
        ));

        let other = classify_provider_error("groq", "model overloaded");
        match other {
            LlmError::RequestFailed { reason, .. } => assert_eq!(reason, "model overloaded"),
            e => panic!("Expected RequestFailed, got {e:?}"),
        }
    }
}
