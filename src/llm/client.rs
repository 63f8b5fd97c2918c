use serde::{Deserialize, Serialize};

use crate::config;

use super::types::LlmError;

/// Chat completion backend for the LLM analysis strategy.
pub trait ChatClient {
    /// Send a system + user prompt pair and return the raw model reply.
    fn complete(
        &self,
        system: &str,
        user: &str,
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;

    /// Whether the backend has credentials and can serve requests.
    fn is_configured(&self) -> bool;

    /// Model identifier, for response metadata.
    fn model(&self) -> &str;
}

/// OpenAI-compatible chat-completions client with a bounded request timeout.
pub struct ChatCompletionsClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: reqwest::Client,
}

impl ChatCompletionsClient {
    pub fn new(base_url: &str, api_key: Option<String>, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
            client,
        }
    }

    /// Build a client from environment configuration.
    pub fn from_env() -> Self {
        Self::new(
            &config::llm_base_url(),
            config::llm_api_key(),
            &config::llm_model(),
            config::llm_timeout_secs(),
        )
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl ChatClient for ChatCompletionsClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_ref().ok_or(LlmError::NotConfigured)?;

        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens: 1500,
            temperature: 0.1,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::ResponseParsing("empty choices".to_string()))
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Mock chat client for tests — returns a configurable reply or error.
#[cfg(test)]
pub struct MockChatClient {
    reply: Result<String, String>,
    configured: bool,
}

#[cfg(test)]
impl MockChatClient {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            configured: true,
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            reply: Err(error.to_string()),
            configured: true,
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            reply: Err("not configured".to_string()),
            configured: false,
        }
    }
}

#[cfg(test)]
impl ChatClient for MockChatClient {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
        match &self.reply {
            Ok(reply) => Ok(reply.clone()),
            Err(e) => Err(LlmError::Request(e.clone())),
        }
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_trims_trailing_slash() {
        let client = ChatCompletionsClient::new("https://api.example.com/v1/", None, "gpt-4o-mini", 30);
        assert_eq!(client.base_url, "https://api.example.com/v1");
    }

    #[test]
    fn unconfigured_without_api_key() {
        let client = ChatCompletionsClient::new("https://api.example.com/v1", None, "gpt-4o-mini", 30);
        assert!(!client.is_configured());
    }

    #[test]
    fn configured_with_api_key() {
        let client = ChatCompletionsClient::new(
            "https://api.example.com/v1",
            Some("test-key".to_string()),
            "gpt-4o-mini",
            30,
        );
        assert!(client.is_configured());
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[tokio::test]
    async fn mock_client_returns_configured_reply() {
        let client = MockChatClient::replying("hello");
        assert_eq!(client.complete("s", "u").await.unwrap(), "hello");
    }
}
