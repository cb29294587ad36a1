//! Server Configuration
//!
//! Settings come from environment variables, optionally seeded from a
//! `.env` file in the working directory.

use crate::guidance::ArtifactPaths;
use crate::llm::{LlmConfig, DEFAULT_SYSTEM_PROMPT};
use log::warn;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MODEL_PATH: &str = "svm_model.json";
pub const DEFAULT_LABEL_PATH: &str = "label_encoder.json";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub label_path: PathBuf,
    pub template_dir: PathBuf,
    pub static_dir: PathBuf,
    pub llm: LlmConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ServerConfig {
    /// Read configuration from the process environment (after `.env`)
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Invalid PORT '{}', falling back to {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let defaults = LlmConfig::default();
        let system_prompt = match lookup("LLM_SYSTEM_PROMPT") {
            Some(prompt) if prompt.trim().is_empty() => None,
            Some(prompt) => Some(prompt),
            None => Some(DEFAULT_SYSTEM_PROMPT.to_string()),
        };

        Self {
            host: get("HOST", DEFAULT_HOST),
            port,
            model_path: PathBuf::from(get("MODEL_PATH", DEFAULT_MODEL_PATH)),
            label_path: PathBuf::from(get("LABEL_ENCODER_PATH", DEFAULT_LABEL_PATH)),
            template_dir: PathBuf::from(get("TEMPLATE_DIR", "templates")),
            static_dir: PathBuf::from(get("STATIC_DIR", "static")),
            llm: LlmConfig {
                base_url: get("LLM_BASE_URL", &defaults.base_url),
                model: get("LLM_MODEL", &defaults.model),
                system_prompt,
            },
        }
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            classifier: self.model_path.clone(),
            label_encoder: self.label_path.clone(),
        }
    }
}
