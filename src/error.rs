use thiserror::Error;

/// Errors that can occur during a label scan
#[derive(Error, Debug)]
pub enum ScanError {
    /// No API key was found in configuration or environment
    #[error("GOOGLE_API_KEY not found in config or environment")]
    MissingApiKey,

    /// HTTP transport failure while calling the model endpoint
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The model endpoint returned a non-success status.
    ///
    /// The status code is part of the message so 429 responses carry
    /// the rate-limit signature matched by `is_rate_limit`.
    #[error("Model API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The model's reply contained no JSON object at all
    #[error("No JSON object found in model response")]
    NoJsonFound,

    /// The extracted region was not valid JSON
    #[error("Failed to parse model response: {0}")]
    Json(#[from] serde_json::Error),

    /// Rate limit persisted through all retries; surfaced to the user
    #[error("The analysis service is busy right now. Please wait a moment and try again.")]
    RateLimited,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ScanError {
    /// Whether this error matches the transient rate-limit signature.
    ///
    /// Classification is by message content ("429" or "Resource exhausted"),
    /// which is how the model endpoint reports quota exhaustion both as an
    /// HTTP status and inside error bodies.
    pub fn is_rate_limit(&self) -> bool {
        let message = self.to_string();
        message.contains("429") || message.contains("Resource exhausted")
    }
}
