use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::GatewayConfig;
use crate::errors::GatewayError;
use crate::models::PromptSpec;

/// One chat-completion exchange, fully resolved
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub credential: String,
    pub model: String,
    pub system: String,
    pub prompt: String,
}

/// Trait for chat-completion gateways
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send the prompt and return the raw text of the first choice
    async fn generate_completion(&self, request: CompletionRequest) -> Result<String, GatewayError>;
}

/// OpenAI-compatible chat-completion request/response structures
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// HTTP provider for an OpenAI-compatible `/v1/chat/completions` endpoint
pub struct ChatCompletionProvider {
    url: String,
    client: Client,
}

impl ChatCompletionProvider {
    pub fn new(url: String, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { url, client })
    }

    async fn call_gateway(&self, credential: &str, request: &ChatRequest) -> Result<ChatResponse, GatewayError> {
        let response = self.client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", credential))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::Network(e.to_string())
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("AI gateway error: {} {}", status, error_text);

            return Err(match status.as_u16() {
                429 => GatewayError::RateLimited,
                402 => GatewayError::PaymentRequired,
                code => GatewayError::Api { status: code, body: error_text },
            });
        }

        response.json::<ChatResponse>()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl LlmProvider for ChatCompletionProvider {
    async fn generate_completion(&self, request: CompletionRequest) -> Result<String, GatewayError> {
        info!("Generating gateway completion (model: {})", request.model);

        let body = ChatRequest {
            model: request.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.prompt,
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
        };

        let response = self.call_gateway(&request.credential, &body).await?;

        if let Some(usage) = &response.usage {
            info!("Gateway completion generated. Tokens: {} prompt + {} completion = {} total",
                  usage.prompt_tokens, usage.completion_tokens, usage.total_tokens);
        }

        let content = response.choices
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::InvalidResponse("No choices in response".to_string()))?
            .message
            .content
            .unwrap_or_default();

        Ok(content)
    }
}

/// Gateway access with the credential check in front of the provider
pub struct LlmService {
    config: GatewayConfig,
    provider: Arc<dyn LlmProvider>,
}

impl LlmService {
    pub fn new(config: GatewayConfig, provider: Arc<dyn LlmProvider>) -> Self {
        if config.api_key.is_none() {
            info!("AI_GATEWAY_API_KEY not configured. Analysis endpoints will fail until it is set.");
        }
        Self { config, provider }
    }

    /// Build the service around the HTTP provider described by `config`
    pub fn from_config(config: GatewayConfig) -> Result<Self, GatewayError> {
        let provider = ChatCompletionProvider::new(config.url.clone(), config.timeout)?;
        Ok(Self::new(config, Arc::new(provider)))
    }

    pub fn is_enabled(&self) -> bool {
        self.credential().is_some()
    }

    /// Fails with `Configuration` when no credential is set, before touching the network
    pub fn ensure_configured(&self) -> Result<(), GatewayError> {
        if self.is_enabled() {
            Ok(())
        } else {
            Err(GatewayError::Configuration)
        }
    }

    pub async fn generate_completion(&self, spec: &PromptSpec) -> Result<String, GatewayError> {
        let credential = self.credential().ok_or(GatewayError::Configuration)?;

        let request = CompletionRequest {
            credential: credential.to_string(),
            model: self.config.model.clone(),
            system: spec.system().to_string(),
            prompt: spec.prompt.clone(),
        };

        self.provider.generate_completion(request).await
    }

    fn credential(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{configured, FakeProvider};
    use super::*;
    use crate::models::AnalysisKind;

    fn spec() -> PromptSpec {
        PromptSpec::new(AnalysisKind::MarketAnalysis, "analyze".to_string())
    }

    #[test]
    fn test_service_disabled_without_key() {
        let provider = Arc::new(FakeProvider::replying("{}"));
        let service = LlmService::new(GatewayConfig::default(), provider);
        assert!(!service.is_enabled());
        assert!(matches!(service.ensure_configured(), Err(GatewayError::Configuration)));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let provider = Arc::new(FakeProvider::replying("{}"));
        let config = GatewayConfig {
            api_key: Some("   ".to_string()),
            ..GatewayConfig::default()
        };
        assert!(!LlmService::new(config, provider).is_enabled());
    }

    #[tokio::test]
    async fn test_missing_key_never_reaches_provider() {
        let provider = Arc::new(FakeProvider::replying("{}"));
        let service = LlmService::new(GatewayConfig::default(), provider.clone());

        let result = service.generate_completion(&spec()).await;
        assert!(matches!(result, Err(GatewayError::Configuration)));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_request_carries_persona_model_and_credential() {
        let provider = Arc::new(FakeProvider::replying("{\"ok\":true}"));
        let service = LlmService::new(configured(), provider.clone());

        let reply = service.generate_completion(&spec()).await.unwrap();
        assert_eq!(reply, "{\"ok\":true}");

        let request = provider.last_request().unwrap();
        assert_eq!(request.credential, "test-key");
        assert_eq!(request.model, "google/gemini-2.5-flash");
        assert!(request.system.contains("professional treasury manager"));
        assert_eq!(request.prompt, "analyze");
    }

    #[tokio::test]
    async fn test_provider_errors_pass_through() {
        let provider = Arc::new(FakeProvider::failing(|| GatewayError::PaymentRequired));
        let service = LlmService::new(configured(), provider.clone());

        let result = service.generate_completion(&spec()).await;
        assert!(matches!(result, Err(GatewayError::PaymentRequired)));
        assert_eq!(provider.calls(), 1);
    }

    #[test]
    fn test_chat_request_wire_format() {
        let body = ChatRequest {
            model: "m".to_string(),
            messages: vec![ChatMessage { role: "user".to_string(), content: "hi".to_string() }],
            response_format: ResponseFormat { format_type: "json_object".to_string() },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_chat_response_tolerates_null_content() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(parsed.choices[0].message.content, None);
    }
}
