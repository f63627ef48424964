use crate::config::ProviderConfig;
use crate::error::ScanError;
use crate::providers::{ContentPart, GenerativeModel};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GoogleProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_tokens: u32,
}

impl GoogleProvider {
    /// Create a new Google Gemini provider from configuration
    pub fn new(config: &ProviderConfig, timeout_secs: u64) -> Result<Self, ScanError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or(ScanError::MissingApiKey)?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(GoogleProvider {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()?,
            api_key,
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_tokens: config.max_tokens,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        GoogleProvider {
            client: Client::new(),
            api_key,
            base_url,
            model,
            temperature: 0.3,
            top_p: 0.9,
            top_k: 40,
            max_tokens: 2000,
        }
    }

    fn parts_to_json(parts: &[ContentPart]) -> Vec<Value> {
        parts
            .iter()
            .map(|part| match part {
                ContentPart::Text(text) => json!({ "text": text }),
                ContentPart::InlineImage { data, mime_type } => json!({
                    "inline_data": {
                        "mime_type": mime_type,
                        "data": data,
                    }
                }),
            })
            .collect()
    }
}

#[async_trait]
impl GenerativeModel for GoogleProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, parts: &[ContentPart]) -> Result<String, ScanError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "contents": [{
                    "parts": Self::parts_to_json(parts)
                }],
                "generationConfig": {
                    "temperature": self.temperature,
                    "topP": self.top_p,
                    "topK": self.top_k,
                    "maxOutputTokens": self.max_tokens
                }
            }))
            .send()
            .await?;

        // Check status before parsing so 429s surface with the status code
        // in the message (the retry layer classifies on that).
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ScanError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let response_body: Value = response.json().await?;
        debug!("Gemini response: {:?}", response_body);

        let text = response_body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or(ScanError::Api {
                status: status.as_u16(),
                message: "No text candidate in Gemini response".to_string(),
            })?
            .to_string();

        Ok(text)
    }
}
