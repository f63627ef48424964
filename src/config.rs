use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Main scanner configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct ScanConfig {
    /// Generative model provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Retry behavior for rate-limited model calls
    #[serde(default)]
    pub retry: RetryConfig,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            retry: RetryConfig::default(),
            timeout: default_timeout(),
        }
    }
}

/// Configuration for the generative model provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Preferred model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Documented fallback candidates, in preference order.
    ///
    /// Switching to a candidate is an operator action (edit config);
    /// the pipeline only ever invokes `model`.
    #[serde(default = "default_fallback_models")]
    pub fallback_models: Vec<String>,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Nucleus sampling cutoff
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    /// Top-k sampling cutoff
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            fallback_models: default_fallback_models(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Configuration for rate-limit retry behavior
#[derive(Debug, Deserialize, Clone)]
pub struct RetryConfig {
    /// Number of attempts before giving up on a rate-limited call
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
        }
    }
}

// Default value functions
fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_fallback_models() -> Vec<String> {
    vec![
        "gemini-1.5-flash".to_string(),
        "gemini-1.5-pro".to_string(),
    ]
}

fn default_temperature() -> f32 {
    0.3
}

fn default_top_p() -> f32 {
    0.9
}

fn default_top_k() -> u32 {
    40
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_max_retries() -> u32 {
    3
}

fn default_timeout() -> u64 {
    30
}

impl ScanConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with LABELSCAN__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: LABELSCAN__PROVIDER__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("config").required(false))
            // Environment variables with LABELSCAN prefix
            // Use double underscore for nested: LABELSCAN__PROVIDER__API_KEY
            .add_source(
                Environment::with_prefix("LABELSCAN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
