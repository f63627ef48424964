//! Two-pass scan orchestration.
//!
//! The caller does not know whether the photographed object is a medicine
//! package or a food label. The scanner tries a medicine-oriented prompt
//! first and accepts that result only if it looks structurally like a
//! real medicine (named, non-default, with at least one use or side
//! effect); otherwise it runs the food-oriented prompt and returns that
//! result unconditionally. The medicine-first bias means a food label
//! that happens to parse as a plausible medicine is misclassified; that
//! is accepted best-effort behavior, not something this module defends
//! against.

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::model::{ScanResult, UserProfile};
use crate::parser::{normalize_food, normalize_medicine, parse_json_region};
use crate::prompts::{food_prompt, MEDICINE_PROMPT};
use crate::providers::{
    generate_with_retry, ContentPart, Delay, GenerativeModel, GoogleProvider, TokioDelay,
};
use crate::translate;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, info, warn};
use serde_json::Value;

pub struct LabelScanner {
    model: Box<dyn GenerativeModel>,
    max_retries: u32,
    delay: Box<dyn Delay>,
}

impl LabelScanner {
    /// Create a scanner around an explicit model handle.
    ///
    /// The model is injected rather than built from ambient environment
    /// state so tests can pass a scripted implementation.
    pub fn new(model: Box<dyn GenerativeModel>, max_retries: u32) -> Self {
        LabelScanner {
            model,
            max_retries,
            delay: Box::new(TokioDelay),
        }
    }

    /// Create a scanner from configuration, backed by the Gemini provider
    pub fn from_config(config: &ScanConfig) -> Result<Self, ScanError> {
        let provider = GoogleProvider::new(&config.provider, config.timeout)?;
        Ok(Self::new(Box::new(provider), config.retry.max_retries))
    }

    #[doc(hidden)]
    pub fn with_delay(
        model: Box<dyn GenerativeModel>,
        max_retries: u32,
        delay: Box<dyn Delay>,
    ) -> Self {
        LabelScanner {
            model,
            max_retries,
            delay,
        }
    }

    /// Scan a photographed label.
    ///
    /// `image` is the raw image bytes; `mime_type` is typically
    /// "image/jpeg". Parse failures degrade to a grade-C result with a
    /// warning rather than erroring; a rate limit that survives all
    /// retries surfaces as `ScanError::RateLimited`.
    pub async fn scan_label(
        &self,
        image: &[u8],
        mime_type: &str,
        profile: &UserProfile,
    ) -> Result<ScanResult, ScanError> {
        let image_part = ContentPart::InlineImage {
            data: STANDARD.encode(image),
            mime_type: mime_type.to_string(),
        };

        // Pass 1: medicine-oriented extraction
        match self.medicine_pass(&image_part).await {
            Ok(Some(result)) => {
                info!("Scan classified as medicine");
                return Ok(result);
            }
            Ok(None) => debug!("Medicine pass looked empty, trying food analysis"),
            Err(err) => warn!("Medicine pass failed, trying food analysis: {}", err),
        }

        // Pass 2: food-oriented extraction, returned unconditionally
        match self.food_pass(&image_part, profile).await {
            Ok(result) => {
                info!("Scan classified as food");
                Ok(result)
            }
            Err(err @ (ScanError::NoJsonFound | ScanError::Json(_))) => {
                warn!("Could not parse model reply, returning degraded result: {}", err);
                Ok(ScanResult::degraded("could not read the label clearly"))
            }
            Err(err) if err.is_rate_limit() => Err(ScanError::RateLimited),
            Err(err) => Err(err),
        }
    }

    /// Translate a finished result to Hindi, best-effort. On any failure
    /// the original is returned unchanged.
    pub async fn translate_to_hindi(&self, result: &ScanResult) -> ScanResult {
        translate::translate_to_hindi(self.model.as_ref(), result).await
    }

    async fn medicine_pass(
        &self,
        image_part: &ContentPart,
    ) -> Result<Option<ScanResult>, ScanError> {
        let parts = [
            ContentPart::Text(MEDICINE_PROMPT.to_string()),
            image_part.clone(),
        ];
        let reply =
            generate_with_retry(self.model.as_ref(), &parts, self.max_retries, self.delay.as_ref())
                .await?;
        let raw = parse_json_region(&reply)?;

        // Acceptance inspects the raw JSON before normalization: the
        // never-empty fallbacks would otherwise mask the emptiness this
        // check exists to detect.
        if looks_like_medicine(&raw) {
            Ok(Some(normalize_medicine(&raw)))
        } else {
            Ok(None)
        }
    }

    async fn food_pass(
        &self,
        image_part: &ContentPart,
        profile: &UserProfile,
    ) -> Result<ScanResult, ScanError> {
        let parts = [
            ContentPart::Text(food_prompt(profile)),
            image_part.clone(),
        ];
        let reply =
            generate_with_retry(self.model.as_ref(), &parts, self.max_retries, self.delay.as_ref())
                .await?;
        let raw = parse_json_region(&reply)?;
        Ok(normalize_food(&raw))
    }
}

/// Whether a raw medicine-pass reply is structurally a real medicine:
/// named, not the "Unknown Medicine" default, and carrying at least one
/// use or side effect.
fn looks_like_medicine(raw: &Value) -> bool {
    let name = raw["name"].as_str().map(str::trim).unwrap_or("");
    if name.is_empty() || name.eq_ignore_ascii_case("unknown medicine") {
        return false;
    }

    let has_entries = |key: &str| {
        raw[key]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .any(|item| item.as_str().is_some_and(|s| !s.trim().is_empty()))
            })
            .unwrap_or(false)
    };

    has_entries("uses") || has_entries("sideEffects")
}
