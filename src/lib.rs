//! AI-assisted scanning of medicine packages and food labels.
//!
//! A photo goes in; a normalized [`ScanResult`] comes out. The pipeline
//! builds a prompt for a generative vision model, invokes it over HTTP
//! with rate-limit retry, extracts a JSON object from the free-form
//! reply, and validates/defaults every field so callers never render a
//! blank screen. An optional best-effort pass translates a result to
//! Hindi.
//!
//! ```no_run
//! use labelscan::{LabelScanner, ScanConfig, UserProfile};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScanConfig::load()?;
//! let scanner = LabelScanner::from_config(&config)?;
//!
//! let image = std::fs::read("label.jpg")?;
//! let result = scanner
//!     .scan_label(&image, "image/jpeg", &UserProfile::default())
//!     .await?;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod fallbacks;
pub mod model;
pub mod parser;
pub mod prompts;
pub mod providers;
pub mod scanner;
pub mod translate;

pub use config::{ProviderConfig, RetryConfig, ScanConfig};
pub use error::ScanError;
pub use model::{
    AllergenAlert, DietaryRestriction, FoodAnalysis, Grade, MedicineInfo, NutritionScore,
    ScanPayload, ScanResult, ScanType, Severity, UserProfile,
};
pub use providers::{ContentPart, Delay, GenerativeModel, GoogleProvider, TokioDelay};
pub use scanner::LabelScanner;
