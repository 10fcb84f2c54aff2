//! Runtime configuration for ai-relay.
//!
//! Configuration is loaded from an optional JSON file and then overlaid with
//! environment variables. The result is an immutable snapshot shared by every
//! handler for the lifetime of the process.

use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Azure OpenAI API version sent on every chat-completion call.
pub const AZURE_API_VERSION: &str = "2024-02-15-preview";

/// Ollama address used when none is configured.
pub const DEFAULT_OLLAMA_BASE: &str = "http://127.0.0.1:11434";

/// Ollama model used when none is configured.
pub const DEFAULT_OLLAMA_MODEL: &str = "phi3.5:latest";

pub const ENV_AZURE_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
pub const ENV_AZURE_DEPLOYMENT: &str = "AZURE_OPENAI_DEPLOYMENT";
pub const ENV_OLLAMA_BASE: &str = "OLLAMA_BASE";
pub const ENV_OLLAMA_MODEL: &str = "OLLAMA_MODEL";

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "ai-relay", about = "Relay JSON requests to Azure OpenAI and Ollama")]
pub struct Cli {
    /// Path to configuration file (JSON).
    #[arg(short, long, env = "AI_RELAY_CONFIG", default_value = "config.json")]
    pub config: PathBuf,

    /// HTTP listen address. Overrides `server.listen` from the config file.
    #[arg(long, env = "AI_RELAY_LISTEN")]
    pub listen: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,

    /// Azure OpenAI backend.
    pub azure: AzureConfig,

    /// Local Ollama backend.
    pub ollama: OllamaConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (e.g. "0.0.0.0:8080").
    pub listen: String,

    /// Path prefix the relay routes are mounted under.
    pub mount_path: String,

    /// Total timeout for one outbound call, in seconds.
    pub request_timeout_secs: u64,

    /// Connect timeout for outbound calls, in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
            mount_path: "/api/ai".to_string(),
            request_timeout_secs: 300,
            connect_timeout_secs: 10,
        }
    }
}

/// Azure OpenAI settings. Both fields are required before a call is made.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureConfig {
    /// Resource endpoint, expected to end in `/`
    /// (e.g. "https://my-resource.openai.azure.com/").
    pub endpoint: Option<String>,

    /// Deployment name.
    pub deployment: Option<String>,
}

/// A fully resolved Azure OpenAI target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureTarget<'a> {
    pub endpoint: &'a str,
    pub deployment: &'a str,
}

impl AzureConfig {
    /// Resolve the endpoint and deployment, failing if either is missing or empty.
    pub fn resolve(&self) -> Result<AzureTarget<'_>, RelayError> {
        match (non_empty(&self.endpoint), non_empty(&self.deployment)) {
            (Some(endpoint), Some(deployment)) => Ok(AzureTarget {
                endpoint,
                deployment,
            }),
            _ => Err(RelayError::NotConfigured),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.resolve().is_ok()
    }
}

/// Ollama settings. Missing values fall back to local defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server.
    pub base_url: Option<String>,

    /// Model name sent with every generate call.
    pub model: Option<String>,
}

impl OllamaConfig {
    pub fn base_url(&self) -> &str {
        non_empty(&self.base_url).unwrap_or(DEFAULT_OLLAMA_BASE)
    }

    pub fn model(&self) -> &str {
        non_empty(&self.model).unwrap_or(DEFAULT_OLLAMA_MODEL)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults for missing fields.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if path.exists() {
            let data = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&data)?;
            Ok(config)
        } else {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            Ok(Config::default())
        }
    }

    /// Overlay backend settings from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay backend settings from `lookup`. Empty values are ignored so an
    /// exported-but-blank variable never clobbers the config file.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get(ENV_AZURE_ENDPOINT) {
            self.azure.endpoint = Some(v);
        }
        if let Some(v) = get(ENV_AZURE_DEPLOYMENT) {
            self.azure.deployment = Some(v);
        }
        if let Some(v) = get(ENV_OLLAMA_BASE) {
            self.ollama.base_url = Some(v);
        }
        if let Some(v) = get(ENV_OLLAMA_MODEL) {
            self.ollama.model = Some(v);
        }
    }
}
