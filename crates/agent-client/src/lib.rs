//! HTTP client for the analysis agents.
//!
//! Talks to any OpenAI-compatible chat-completions endpoint. Each of the
//! three pipeline roles is a [`RoleAgent`] wrapping the shared client with a
//! role-specific system prompt; all of them expose the identical
//! [`AnalysisAgent`] contract to the orchestrator.

pub mod roles;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use advisor_core::{AnalysisAgent, AnalysisError};
pub use roles::AgentRole;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for the agent endpoint.
#[derive(Debug, Clone)]
pub struct AgentClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub default_model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout: Duration,
}

impl AgentClientConfig {
    /// Build from environment variables. Only `OPENAI_API_KEY` is required;
    /// everything else has a default.
    pub fn from_env() -> Result<Self, AnalysisError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            AnalysisError::Config(
                "No API key configured. Set the OPENAI_API_KEY environment variable".to_string(),
            )
        })?;

        Ok(Self {
            api_key,
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            default_model: std::env::var("DEFAULT_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            max_tokens: std::env::var("MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4000),
            temperature: std::env::var("TEMPERATURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.1),
            timeout: Duration::from_secs(
                std::env::var("AGENT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(120),
            ),
        })
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Clone)]
pub struct AgentClient {
    config: AgentClientConfig,
    client: Client,
}

impl AgentClient {
    pub fn new(config: AgentClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    pub fn default_model(&self) -> &str {
        &self.config.default_model
    }

    /// Run one chat completion and return the assistant text.
    pub async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        model: &str,
    ) -> Result<String, AnalysisError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self.send_request(&url, &body).await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Agent(format!("HTTP {status}: {detail}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Agent(format!("Malformed completion response: {e}")))?;

        extract_completion(parsed)
    }

    /// Send the request with a bounded retry on 429.
    async fn send_request(
        &self,
        url: &str,
        body: &ChatRequest<'_>,
    ) -> Result<reqwest::Response, AnalysisError> {
        for attempt in 0..3u32 {
            let response = self
                .client
                .post(url)
                .bearer_auth(&self.config.api_key)
                .json(body)
                .send()
                .await
                .map_err(|e| AnalysisError::Agent(e.to_string()))?;

            if response.status().as_u16() != 429 {
                return Ok(response);
            }

            let wait_secs = 15u64;
            tracing::warn!(
                "Agent endpoint rate limited, waiting {}s before retry {}/3",
                wait_secs,
                attempt + 1
            );
            tokio::time::sleep(Duration::from_secs(wait_secs)).await;
        }

        Err(AnalysisError::Agent(
            "Rate limited by agent endpoint after 3 retries".to_string(),
        ))
    }
}

fn extract_completion(response: ChatResponse) -> Result<String, AnalysisError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default();

    let content = content.trim();
    if content.is_empty() {
        return Err(AnalysisError::Agent(
            "Agent returned an empty completion".to_string(),
        ));
    }
    Ok(content.to_string())
}

/// One pipeline role backed by the shared HTTP client.
#[derive(Clone)]
pub struct RoleAgent {
    client: AgentClient,
    role: AgentRole,
}

impl RoleAgent {
    pub fn new(client: AgentClient, role: AgentRole) -> Self {
        Self { client, role }
    }
}

#[async_trait]
impl AnalysisAgent for RoleAgent {
    fn name(&self) -> &str {
        self.role.name
    }

    async fn invoke(&self, prompt: &str, model: &str) -> Result<String, AnalysisError> {
        tracing::debug!("Invoking {} with model {}", self.role.name, model);
        self.client
            .complete(&self.role.system_prompt(), prompt, model)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_completion_trims_text() {
        let response = ChatResponse {
            choices: vec![ChatChoice {
                message: ChatChoiceMessage {
                    content: Some("  analysis text \n".to_string()),
                },
            }],
        };
        assert_eq!(extract_completion(response).unwrap(), "analysis text");
    }

    #[test]
    fn test_extract_completion_rejects_empty() {
        let response = ChatResponse { choices: vec![] };
        assert!(extract_completion(response).is_err());

        let response = ChatResponse {
            choices: vec![ChatChoice {
                message: ChatChoiceMessage { content: None },
            }],
        };
        assert!(extract_completion(response).is_err());
    }

    #[test]
    fn test_response_deserialization() {
        let raw = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "ranked: AAPL, MSFT"}}
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(extract_completion(parsed).unwrap(), "ranked: AAPL, MSFT");
    }

    #[test]
    fn test_request_serialization_shape() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "user",
                content: "rank these",
            }],
            max_tokens: 4000,
            temperature: 0.1,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["max_tokens"], 4000);
    }
}
