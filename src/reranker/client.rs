use crate::LLM_DEFAULT_TIMEOUT_SECONDS;
use crate::LLM_MAX_TIMEOUT_SECONDS;
use crate::LLM_MAX_TOKENS;
use crate::LLM_TEMPERATURE;
use serde::Deserialize;
use serde::Serialize;
use std::time::Duration;

const API_URL: &str = "https://api.tokenfactory.us-central1.nebius.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "deepseek-ai/DeepSeek-V3-0324-fast";

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatContent,
}

#[derive(Deserialize)]
struct ChatContent {
    content: String,
}

/// thin chat-completions client. the api key arrives per session, never
/// from the environment, so individual sessions choose whether the
/// reranker runs at all.
pub struct LlmClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: &str, timeout_seconds: Option<f64>) -> Self {
        let timeout = timeout_seconds
            .unwrap_or(LLM_DEFAULT_TIMEOUT_SECONDS)
            .clamp(1.0, LLM_MAX_TIMEOUT_SECONDS);
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs_f64(timeout))
                .build()
                .expect("construct http client"),
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// one chat turn; returns the raw assistant text
    pub async fn chat(&self, system: &str, prompt: &str) -> anyhow::Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: LLM_TEMPERATURE,
            max_tokens: LLM_MAX_TOKENS,
        };
        let response = self
            .http
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| match e.is_timeout() {
                true => anyhow::anyhow!("llm timed out"),
                false => anyhow::anyhow!("llm request failed: {}", e),
            })?
            .error_for_status()
            .map_err(|e| anyhow::anyhow!("llm returned error status: {}", e))?
            .json::<ChatResponse>()
            .await
            .map_err(|e| anyhow::anyhow!("llm response unreadable: {}", e))?;
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow::anyhow!("llm returned no choices"))
    }
}
