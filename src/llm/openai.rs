use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::llm::prompts::estimate_tokens;
use crate::llm::provider::{CompletionRequest, LLMProvider};

/// Any endpoint that speaks the OpenAI chat-completions protocol
/// (DeepSeek, OpenAI, local gateways).
pub struct OpenAICompatProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAICompatProvider {
    pub fn new(api_key: String, base_url: String, model: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }
}

#[async_trait]
impl LLMProvider for OpenAICompatProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        tracing::debug!(
            "Sending ~{} tokens to {} ({})",
            estimate_tokens(&request.prompt),
            self.base_url,
            self.model
        );

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: request.prompt,
        });

        let body = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::LLMApi(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::LLMApi(format!("LLM API error ({}): {}", status, body)));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::LLMApi(format!("Failed to parse LLM response: {}", e)))?;

        result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| Error::LLMApi("Empty response from LLM".to_string()))
    }

    fn max_context_tokens(&self) -> usize {
        64_000
    }

    fn name(&self) -> &str {
        "OpenAI-compatible"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_reads_first_choice() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer sk-test")
                .body_contains("\"role\":\"system\"");
            then.status(200).json_body(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "Healthcare - Elder Care"}}]
            }));
        });

        let provider = OpenAICompatProvider::new(
            "sk-test".to_string(),
            format!("{}/v1/", server.base_url()),
            "deepseek-chat".to_string(),
        )
        .unwrap();
        let text = provider
            .complete(CompletionRequest::new("classify").with_system("You are an analyst"))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(text, "Healthcare - Elder Care");
    }

    #[tokio::test]
    async fn test_empty_choices_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(serde_json::json!({"choices": []}));
        });

        let provider =
            OpenAICompatProvider::new("k".to_string(), server.base_url(), "m".to_string()).unwrap();
        let err = provider.complete(CompletionRequest::new("x")).await.unwrap_err();
        assert!(matches!(err, Error::LLMApi(_)));
    }
}
