//! Configuration loading and resolution.
//!
//! Every setting resolves in the same order: explicit CLI flag, then
//! environment variable, then built-in default.

use formfill::llm::{LlmConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "FORMFILL_LLM_MODEL";
pub const BASE_URL_ENV: &str = "FORMFILL_LLM_BASE_URL";

fn resolve(explicit: Option<&str>, env_key: &str) -> Option<String> {
    if let Some(value) = explicit {
        return Some(value.to_string());
    }
    std::env::var(env_key).ok().filter(|v| !v.trim().is_empty())
}

/// Build the LLM configuration. Fails when no API key is available.
pub fn resolve_llm_config(
    api_key: Option<&str>,
    model: Option<&str>,
    base_url: Option<&str>,
) -> anyhow::Result<LlmConfig> {
    let key = resolve(api_key, API_KEY_ENV).ok_or_else(|| {
        anyhow::anyhow!("no API key: pass --api-key or set {API_KEY_ENV}")
    })?;

    let mut config = LlmConfig::new(key);
    config.model = resolve(model, MODEL_ENV).unwrap_or_else(|| DEFAULT_MODEL.to_string());
    config.base_url = resolve(base_url, BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    Ok(config)
}
