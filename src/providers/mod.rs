mod google;
mod retry;

pub use google::GoogleProvider;
pub use retry::{generate_with_retry, Delay, TokioDelay};

use crate::error::ScanError;
use async_trait::async_trait;

/// One part of a multimodal request: plain text or an inline image
#[derive(Debug, Clone)]
pub enum ContentPart {
    Text(String),
    /// base64-encoded image bytes with their MIME type
    InlineImage { data: String, mime_type: String },
}

impl ContentPart {
    /// Convenience constructor for a JPEG image part
    pub fn jpeg(base64_data: impl Into<String>) -> ContentPart {
        ContentPart::InlineImage {
            data: base64_data.into(),
            mime_type: "image/jpeg".to_string(),
        }
    }
}

/// Unified trait for generative text/vision models.
///
/// The pipeline only ever needs "parts in, text out"; everything else
/// (endpoints, auth, response envelopes) stays behind this seam so tests
/// can substitute a scripted model.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// The model identifier (e.g. "gemini-2.0-flash")
    fn model_name(&self) -> &str;

    /// Run one generation request and return the reply text
    async fn generate(&self, parts: &[ContentPart]) -> Result<String, ScanError>;
}
