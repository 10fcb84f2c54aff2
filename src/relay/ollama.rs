//! Ollama generate relay.

use serde_json::{json, Value};
use tracing::info;

use crate::config::OllamaConfig;
use crate::error::RelayError;
use crate::relay::{post_json, present_field, Relayed};

/// Prompt sent when the caller supplies none.
pub const DEFAULT_PROMPT: &str = "Say hello from Ollama";

pub fn generate_url(base_url: &str) -> String {
    format!("{base_url}/api/generate")
}

/// Build a non-streaming generate body for `model`.
pub fn request_body(inbound: &Value, model: &str) -> Value {
    let prompt = present_field(inbound, "prompt")
        .cloned()
        .unwrap_or_else(|| Value::String(DEFAULT_PROMPT.to_string()));

    json!({
        "model": model,
        "prompt": prompt,
        "stream": false,
    })
}

/// Forward a generate request to the configured (or default) Ollama server.
pub async fn forward(
    client: &reqwest::Client,
    config: &OllamaConfig,
    inbound: Value,
) -> Result<Relayed, RelayError> {
    let url = generate_url(config.base_url());
    let body = request_body(&inbound, config.model());

    info!(model = config.model(), base_url = config.base_url(), "Forwarding generate to Ollama");
    post_json(client, &url, &body).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_url() {
        assert_eq!(
            generate_url("http://127.0.0.1:11434"),
            "http://127.0.0.1:11434/api/generate"
        );
    }

    #[test]
    fn test_default_prompt() {
        let body = request_body(&json!({}), "phi3.5:latest");
        assert_eq!(
            body,
            json!({ "model": "phi3.5:latest", "prompt": "Say hello from Ollama", "stream": false })
        );
    }

    #[test]
    fn test_blank_prompt_uses_default() {
        let body = request_body(&json!({ "prompt": "" }), "m");
        assert_eq!(body["prompt"], DEFAULT_PROMPT);
    }

    #[test]
    fn test_prompt_passed_through() {
        let inbound = json!({ "prompt": "Why is the sky blue?", "stream": true });
        let body = request_body(&inbound, "llama3");
        assert_eq!(body["prompt"], "Why is the sky blue?");
        assert_eq!(body["model"], "llama3");
        assert_eq!(body["stream"], false);
    }

    #[tokio::test]
    async fn test_forward_connection_refused() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = OllamaConfig {
            base_url: Some(format!("http://127.0.0.1:{port}")),
            model: None,
        };
        let err = forward(&reqwest::Client::new(), &config, json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Transport(_)));
    }
}
