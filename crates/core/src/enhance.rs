use async_trait::async_trait;
use serde_json::{Value, json};

use crate::{
    error::{Result, TitlesmithError},
    provider::ProviderConfig,
    types::Enhancement,
};

pub(crate) const MISSING_TOKEN_MESSAGE: &str =
    "Please enter your Puter auth token to enhance titles";

const SYSTEM_PROMPT: &str = r#"You are a YouTube title optimization expert. Your task is to enhance video titles to improve click-through rates while maintaining accuracy and avoiding clickbait. Always respond in JSON format with two fields: "enhancedTitle" (the improved title) and "reason" (a brief explanation of why this title is better)."#;

fn user_prompt(original_title: &str) -> String {
    format!(
        r#"Enhance this YouTube video title for better engagement and click-through rate. Keep it under 60 characters if possible.

Original title: "{original_title}"

Respond in this exact JSON format:
{{
  "enhancedTitle": "Your enhanced title here",
  "reason": "Brief explanation of improvements"
}}"#
    )
}

fn request_body(config: &ProviderConfig, original_title: &str) -> Value {
    json!({
        "interface": config.interface,
        "driver": config.driver,
        "test_mode": false,
        "method": config.method,
        "args": {
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_prompt(original_title) },
            ],
            "model": config.model,
            "stream": false,
        },
    })
}

/// The provider nests the generated text at one of two paths depending on
/// which driver answered; check both, first match wins.
fn dig_content(response: &Value) -> Option<&str> {
    response["result"]["message"]["content"]
        .as_str()
        .or_else(|| response["message"]["content"].as_str())
}

/// Greedy-extract the first brace-delimited substring. The model likes to
/// wrap its JSON in prose.
fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&content[start..=end])
}

/// Parse a model reply into an [`Enhancement`].
pub fn parse_enhancement(content: &str) -> Result<Enhancement> {
    let object = extract_json_object(content).ok_or_else(|| TitlesmithError::MalformedResponse {
        reason: "no JSON object in model output".to_string(),
    })?;
    serde_json::from_str(object).map_err(|e| TitlesmithError::MalformedResponse {
        reason: e.to_string(),
    })
}

/// Rewrites one title. This is the seam between session orchestration and
/// the HTTP provider, so batch behavior can be exercised without a network.
#[async_trait]
pub trait Enhance: Send + Sync {
    async fn enhance(&self, original_title: &str, token: &str) -> Result<Enhancement>;
}

/// HTTP-backed [`Enhance`] implementation against the hosted completion
/// provider.
pub struct CompletionClient {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl CompletionClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

impl Default for CompletionClient {
    fn default() -> Self {
        Self::new(ProviderConfig::default())
    }
}

#[async_trait]
impl Enhance for CompletionClient {
    async fn enhance(&self, original_title: &str, token: &str) -> Result<Enhancement> {
        if token.trim().is_empty() {
            return Err(TitlesmithError::missing_input(MISSING_TOKEN_MESSAGE));
        }

        tracing::debug!(provider = self.config.name(), title = original_title, "requesting rewrite");
        let response = self
            .client
            .post(self.config.api_url)
            .bearer_auth(token)
            .json(&request_body(&self.config, original_title))
            .send()
            .await?;

        if !response.status().is_success() {
            let payload: Value = response.json().await.unwrap_or(Value::Null);
            let message = payload["message"]
                .as_str()
                .unwrap_or("Failed to enhance title")
                .to_string();
            return Err(TitlesmithError::Upstream { message });
        }

        let payload: Value = response.json().await?;
        let content = dig_content(&payload).ok_or(TitlesmithError::EmptyResponse)?;
        parse_enhancement(content)
    }
}
