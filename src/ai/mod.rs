//! AI-powered code analysis pipeline
//!
//! This module is the core of the crate: prompt construction, the LLM API
//! call, and normalization of the (possibly malformed) model response into
//! a complete [`AnalysisReport`](crate::models::AnalysisReport). Uses BYOK
//! (bring your own key) - API keys are read from environment variables.
//!
//! # Environment Variables
//!
//! - `GROQ_API_KEY`: Required for the Groq backend (default)
//! - `OPENAI_API_KEY`: Required for the OpenAI backend
//! - `OPENROUTER_API_KEY`: Required for the OpenRouter backend
//!
//! # Example
//!
//! ```rust,ignore
//! use retrocode::ai::{CodeAnalyzer, ModelClient};
//! use retrocode::config::Settings;
//! use retrocode::models::AnalysisRequest;
//!
//! let settings = Settings::load(None)?;
//! let client = ModelClient::from_env(settings.model)?;
//! let analyzer = CodeAnalyzer::new(Box::new(client), settings.limits);
//! let report = analyzer.analyze(&AnalysisRequest::new("def main():\n    pass"));
//! ```

mod client;
mod normalize;
mod prompts;
mod service;

pub use client::{ChatCompletion, LlmBackend, Message, ModelClient, Role, EMPTY_COMPLETION_PLACEHOLDER};
pub use normalize::{normalize, DEFAULT_QUALITY_SCORE};
pub use prompts::{analysis_prompt, ANALYSIS_SYSTEM_PROMPT};
pub use service::CodeAnalyzer;

use thiserror::Error;

/// Errors that can occur in the AI module
#[derive(Error, Debug)]
pub enum AiError {
    /// Input validation failure; the only error the serving layer may
    /// surface as a rejected request.
    #[error("Code too long. Maximum {limit} characters allowed.")]
    CodeTooLong { limit: usize, actual: usize },

    #[error("Missing API key: {env_var} not set. Get your key at {signup_url}")]
    MissingApiKey { env_var: String, signup_url: String },

    /// Transport failure, non-2xx response, or timeout. Transient; retrying
    /// is the caller's call, never done inside the pipeline.
    #[error("AI service temporarily unavailable: {status} - {message}")]
    Upstream { status: u16, message: String },

    #[error("Failed to parse API response: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AiResult<T> = Result<T, AiError>;
