//! LLM-backed answer-set generation.
//!
//! The model receives the annotated request body as a schema description
//! and returns a JSON array of answer sets. Batches are requested one after
//! another until the target count is reached.

use crate::answers::{answer_sets_from_value, AnswerSet};
use crate::types::{FormError, FormResult, ANY_TEXT_FIELD};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
const SYSTEM_PROMPT: &str = "You are a helpful assistant.";
const LLM_TIMEOUT_SECS: u64 = 120;

/// Connection and sampling settings for the completion endpoint.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl LlmConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1500,
            temperature: 0.7,
        }
    }
}

/// A chat-completion backend.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> FormResult<String>;
}

/// OpenAI-compatible `/chat/completions` client.
pub struct OpenAiClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, system: &str, user: &str) -> FormResult<String> {
        let body = json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user}
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        });

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .timeout(Duration::from_secs(LLM_TIMEOUT_SECS))
            .json(&body)
            .send()
            .await
            .map_err(|e| FormError::Llm(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(FormError::Llm(format!("API error ({status}): {text}")));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| FormError::Llm(format!("Failed to parse JSON: {e}")))?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| FormError::Llm("Invalid response format".to_string()))
    }
}

/// Build the user prompt asking for `batch_size` answer sets.
pub fn build_prompt(schema_description: &str, batch_size: usize) -> String {
    format!(
        "Please generate {batch_size} realistic answers for the following Google Form in the JSON format:\n\
         {schema_description}\n\
         For fields with predefined options, choose an appropriate option. If the option '{ANY_TEXT_FIELD}' is present, \
         either choose an available option or generate a custom text response. Never leave '{ANY_TEXT_FIELD}' as the answer.\n\
         Ensure that email is realistic and follows the correct format. You can generate random names, emails, \
         Names not always have to be with second names, and emails can be random but should look realistic.\n\
         Return the answers as a JSON array with {batch_size} elements, without any comments."
    )
}

/// Remove a surrounding Markdown code fence, if any.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`, `JSON`, ...) on the opening line.
    match inner.split_once('\n') {
        Some((info, body)) if !info.trim().contains(char::is_whitespace) => body.trim(),
        _ => inner.trim(),
    }
}

/// Parse a model reply into answer sets.
pub fn parse_answer_sets(content: &str) -> FormResult<Vec<AnswerSet>> {
    let body = strip_code_fence(content);
    let value: Value = serde_json::from_str(body)
        .map_err(|e| FormError::LlmResponse(format!("not valid JSON: {e}")))?;
    if !value.is_array() {
        return Err(FormError::LlmResponse(
            "the generated output is not a JSON array".to_string(),
        ));
    }
    answer_sets_from_value(value)
}

/// Request batches until `total` answer sets are collected.
///
/// Failed or malformed batches are logged and count as empty. Gives up after
/// `max_empty_batches` consecutive empty batches and returns what it has.
pub async fn collect_answer_sets(
    client: &dyn CompletionClient,
    prompt: &str,
    total: usize,
    max_empty_batches: usize,
) -> Vec<AnswerSet> {
    let mut all = Vec::with_capacity(total);
    let mut empty_streak = 0usize;

    while all.len() < total {
        let batch = match client.complete(SYSTEM_PROMPT, prompt).await {
            Ok(content) => parse_answer_sets(&content).unwrap_or_else(|e| {
                tracing::warn!("discarding LLM batch: {e}");
                Vec::new()
            }),
            Err(e) => {
                tracing::warn!("LLM request failed: {e}");
                Vec::new()
            }
        };

        if batch.is_empty() {
            empty_streak += 1;
            if empty_streak >= max_empty_batches {
                tracing::warn!(
                    "stopping after {empty_streak} empty batch(es) with {}/{total} answer set(s)",
                    all.len()
                );
                break;
            }
            continue;
        }

        empty_streak = 0;
        all.extend(batch);
        tracing::info!("collected {}/{total} answer set(s)", all.len().min(total));
    }

    all.truncate(total);
    all
}
