//! Configuration for Retrocode
//!
//! All configuration is loaded once into an immutable [`Settings`] value
//! and passed into components at construction time; there is no ambient
//! global state. Sources, in priority order:
//!
//! 1. Environment variables (highest)
//! 2. A config file: `--config PATH`, `./retrocode.toml`, or
//!    `~/.config/retrocode/config.toml`
//! 3. Built-in defaults
//!
//! # Environment Variables
//!
//! - `RETROCODE_BACKEND`: groq | openai | openrouter | ollama
//! - `RETROCODE_MODEL`: model name override
//! - `RETROCODE_MAX_TOKENS`, `RETROCODE_TEMPERATURE`, `RETROCODE_TOP_P`
//! - `ANALYSIS_TIMEOUT`: model call timeout in seconds
//! - `MAX_CODE_LENGTH`: hard cap on submitted code size

use crate::ai::LlmBackend;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Upstream model knobs. Externally supplied; the client never defaults
/// them at call time.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Which OpenAI-compatible backend to talk to.
    pub backend: LlmBackend,
    /// Model name; `None` means the backend's default.
    pub model: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    /// Upper bound on one model call. Doubles as the cancellation
    /// mechanism for the sync transport.
    pub timeout_secs: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            backend: LlmBackend::default(),
            model: None,
            temperature: 0.1,
            max_tokens: 4000,
            top_p: 0.9,
            timeout_secs: 30,
        }
    }
}

impl ModelSettings {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.backend.default_model())
    }
}

/// Input bounds for the analysis pipeline.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct AnalysisLimits {
    /// Hard cap on submitted code size, in bytes. Oversized submissions
    /// never reach the model.
    pub max_code_length: usize,
    /// Minimum meaningful submission, enforced by the serving layer.
    pub min_code_length: usize,
}

impl Default for AnalysisLimits {
    fn default() -> Self {
        Self {
            max_code_length: 500_000,
            min_code_length: 10,
        }
    }
}

/// Immutable application settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub model: ModelSettings,
    pub limits: AnalysisLimits,
}

impl Settings {
    /// Load settings from a config file (if any) with env overrides.
    ///
    /// An explicitly passed path must exist; discovered paths are optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::discover_config_path() {
                Some(p) => Self::from_file(&p)?,
                None => Self::default(),
            },
        };
        settings.apply_env();
        Ok(settings)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let settings = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        debug!(path = %path.display(), "loaded config file");
        Ok(settings)
    }

    /// Find a config file: ./retrocode.toml, then the user config dir.
    fn discover_config_path() -> Option<PathBuf> {
        let local = PathBuf::from("retrocode.toml");
        if local.exists() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|p| p.join("retrocode").join("config.toml"))
            .filter(|p| p.exists())
    }

    /// Environment variables override everything.
    fn apply_env(&mut self) {
        if let Ok(backend) = env::var("RETROCODE_BACKEND") {
            match LlmBackend::parse(&backend) {
                Some(b) => self.model.backend = b,
                None => warn!(value = %backend, "unknown RETROCODE_BACKEND, keeping configured backend"),
            }
        }
        if let Ok(model) = env::var("RETROCODE_MODEL") {
            self.model.model = Some(model);
        }
        apply_parsed(&mut self.model.max_tokens, "RETROCODE_MAX_TOKENS");
        apply_parsed(&mut self.model.temperature, "RETROCODE_TEMPERATURE");
        apply_parsed(&mut self.model.top_p, "RETROCODE_TOP_P");
        apply_parsed(&mut self.model.timeout_secs, "ANALYSIS_TIMEOUT");
        apply_parsed(&mut self.limits.max_code_length, "MAX_CODE_LENGTH");
    }
}

fn apply_parsed<T: std::str::FromStr>(slot: &mut T, key: &str) {
    if let Ok(raw) = env::var(key) {
        match raw.parse() {
            Ok(value) => *slot = value,
            Err(_) => warn!(key, value = %raw, "ignoring unparsable env override"),
        }
    }
}
