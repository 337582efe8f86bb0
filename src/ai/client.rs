//! LLM API client for OpenAI-compatible chat backends
//!
//! Provides a unified interface for the upstream model endpoints the
//! analyzer can talk to. Uses ureq (sync HTTP) — no async runtime needed.

use crate::ai::{AiError, AiResult};
use crate::config::ModelSettings;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Returned in place of an empty completion body so downstream always has
/// text to normalize.
pub const EMPTY_COMPLETION_PLACEHOLDER: &str = "Analysis completed";

/// Supported LLM backends. All speak the OpenAI chat-completions shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    #[default]
    Groq,
    OpenAi,
    OpenRouter,
    Ollama,
}

impl LlmBackend {
    pub fn env_key(&self) -> &'static str {
        match self {
            LlmBackend::Groq => "GROQ_API_KEY",
            LlmBackend::OpenAi => "OPENAI_API_KEY",
            LlmBackend::OpenRouter => "OPENROUTER_API_KEY",
            LlmBackend::Ollama => "OLLAMA_MODEL",
        }
    }

    pub fn signup_url(&self) -> &'static str {
        match self {
            LlmBackend::Groq => "https://console.groq.com/keys",
            LlmBackend::OpenAi => "https://platform.openai.com/api-keys",
            LlmBackend::OpenRouter => "https://openrouter.ai/keys",
            LlmBackend::Ollama => "https://ollama.ai (no key needed, just run locally)",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmBackend::Groq => "llama-3.1-70b-versatile",
            LlmBackend::OpenAi => "gpt-4o",
            LlmBackend::OpenRouter => "meta-llama/llama-3.1-70b-instruct",
            LlmBackend::Ollama => "deepseek-coder:6.7b",
        }
    }

    pub fn api_url(&self) -> &'static str {
        match self {
            LlmBackend::Groq => "https://api.groq.com/openai/v1/chat/completions",
            LlmBackend::OpenAi => "https://api.openai.com/v1/chat/completions",
            LlmBackend::OpenRouter => "https://openrouter.ai/api/v1/chat/completions",
            LlmBackend::Ollama => "http://localhost:11434/v1/chat/completions",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, LlmBackend::Ollama)
    }

    /// Parse a backend name as written in config files or env vars.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "groq" => Some(LlmBackend::Groq),
            "openai" => Some(LlmBackend::OpenAi),
            "openrouter" => Some(LlmBackend::OpenRouter),
            "ollama" => Some(LlmBackend::Ollama),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Seam between the orchestrator and the upstream model endpoint.
///
/// Exists so the pipeline can be exercised without network access; the
/// production implementation is [`ModelClient`].
pub trait ChatCompletion: Send + Sync {
    /// Send one system+user exchange and return the raw completion text.
    fn complete(&self, system: &str, prompt: &str) -> AiResult<String>;
}

/// Upstream model client — sync HTTP via ureq (no tokio needed).
///
/// Every knob (model, temperature, max_tokens, top_p, timeout) comes from
/// the [`ModelSettings`] it was constructed with; nothing is defaulted here.
pub struct ModelClient {
    settings: ModelSettings,
    api_key: String,
    agent: ureq::Agent,
}

fn make_agent(timeout_secs: u64) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // We handle status codes ourselves
        .timeout_global(Some(Duration::from_secs(timeout_secs)))
        .build()
        .new_agent()
}

impl ModelClient {
    pub fn new(settings: ModelSettings, api_key: impl Into<String>) -> Self {
        let agent = make_agent(settings.timeout_secs);
        Self {
            settings,
            api_key: api_key.into(),
            agent,
        }
    }

    /// Build a client from the backend's environment variable.
    pub fn from_env(mut settings: ModelSettings) -> AiResult<Self> {
        if !settings.backend.requires_api_key() {
            if let Ok(model) = env::var("OLLAMA_MODEL") {
                settings.model = Some(model);
            }
            return Ok(Self::new(settings, "ollama"));
        }

        let env_key = settings.backend.env_key();
        let api_key = env::var(env_key).map_err(|_| AiError::MissingApiKey {
            env_var: env_key.to_string(),
            signup_url: settings.backend.signup_url().to_string(),
        })?;

        Ok(Self::new(settings, api_key))
    }

    pub fn backend(&self) -> LlmBackend {
        self.settings.backend
    }

    pub fn model(&self) -> &str {
        self.settings.model()
    }
}

impl ChatCompletion for ModelClient {
    fn complete(&self, system: &str, prompt: &str) -> AiResult<String> {
        let body = ChatRequest {
            model: self.settings.model().to_string(),
            messages: vec![Message::system(system), Message::user(prompt)],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            top_p: self.settings.top_p,
            stream: false,
        };

        let mut req = self
            .agent
            .post(self.settings.backend.api_url())
            .header("Content-Type", "application/json");

        if self.settings.backend.requires_api_key() {
            req = req.header("Authorization", &format!("Bearer {}", self.api_key));
        }

        // Transport errors (including the configured timeout) surface as
        // status 0; the orchestrator turns both into placeholder reports.
        let response = req.send_json(&body).map_err(|e| AiError::Upstream {
            status: 0,
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let error_text = response.into_body().read_to_string().unwrap_or_default();
            return Err(AiError::Upstream {
                status,
                message: error_text,
            });
        }

        let resp: ChatResponse = response
            .into_body()
            .read_json()
            .map_err(|e| AiError::Parse(e.to_string()))?;

        let content = resp
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Ok(EMPTY_COMPLETION_PLACEHOLDER.to_string());
        }
        Ok(content)
    }
}

// OpenAI-compatible wire types
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_defaults() {
        assert_eq!(LlmBackend::Groq.default_model(), "llama-3.1-70b-versatile");
        assert_eq!(LlmBackend::OpenAi.default_model(), "gpt-4o");
        assert_eq!(LlmBackend::Groq.env_key(), "GROQ_API_KEY");
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!(LlmBackend::parse("groq"), Some(LlmBackend::Groq));
        assert_eq!(LlmBackend::parse("OpenAI"), Some(LlmBackend::OpenAi));
        assert_eq!(LlmBackend::parse("nope"), None);
    }

    #[test]
    fn test_settings_model_override() {
        let settings = ModelSettings::default();
        assert_eq!(settings.model(), "llama-3.1-70b-versatile");

        let settings = ModelSettings {
            model: Some("custom-model".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.model(), "custom-model");
    }

    #[test]
    fn test_empty_choices_decode() {
        let resp: ChatResponse = serde_json::from_str("{}").expect("decode");
        assert!(resp.choices.is_empty());
    }
}
