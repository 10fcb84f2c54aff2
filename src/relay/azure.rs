//! Azure OpenAI chat-completion relay.

use serde_json::{json, Value};
use tracing::info;

use crate::config::{AzureConfig, AzureTarget, AZURE_API_VERSION};
use crate::error::RelayError;
use crate::relay::{post_json, present_field, Relayed};

/// Prompt sent when the caller supplies no messages.
pub const DEFAULT_MESSAGE: &str = "Say hello";

/// Build the deployment-specific chat completions URL.
///
/// The endpoint is concatenated as-is, so it must carry its trailing `/`.
pub fn chat_completions_url(target: &AzureTarget<'_>) -> String {
    format!(
        "{}openai/deployments/{}/chat/completions?api-version={}",
        target.endpoint, target.deployment, AZURE_API_VERSION
    )
}

/// The outbound body: the inbound body untouched when it carries `messages`,
/// otherwise a single default user message.
pub fn request_body(inbound: Value) -> Value {
    if present_field(&inbound, "messages").is_some() {
        inbound
    } else {
        json!({ "messages": [{ "role": "user", "content": DEFAULT_MESSAGE }] })
    }
}

/// Forward a chat completion request. Fails with [`RelayError::NotConfigured`]
/// before any network activity when the endpoint or deployment is missing.
pub async fn forward(
    client: &reqwest::Client,
    config: &AzureConfig,
    inbound: Value,
) -> Result<Relayed, RelayError> {
    let target = config.resolve()?;
    let url = chat_completions_url(&target);
    let body = request_body(inbound);

    info!(deployment = target.deployment, "Forwarding chat completion to Azure OpenAI");
    post_json(client, &url, &body).await
}
