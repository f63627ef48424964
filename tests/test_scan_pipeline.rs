//! End-to-end scan orchestration tests against a scripted model.
//!
//! The model seam is mocked so these tests exercise the real two-pass
//! classification, parsing, normalization, and degraded-fallback paths
//! without any network.

use async_trait::async_trait;
use labelscan::{
    ContentPart, Delay, GenerativeModel, Grade, LabelScanner, ScanError, ScanType, UserProfile,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted reply per model call, in order
enum Script {
    Reply(&'static str),
    RateLimit,
}

struct ScriptedModel {
    script: Mutex<Vec<Script>>,
    calls: AtomicU32,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn new(script: Vec<Script>) -> Self {
        ScriptedModel {
            script: Mutex::new(script),
            calls: AtomicU32::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted-test-model"
    }

    async fn generate(&self, parts: &[ContentPart]) -> Result<String, ScanError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(ContentPart::Text(prompt)) = parts.first() {
            self.prompts.lock().unwrap().push(prompt.clone());
        }

        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            return Err(ScanError::Api {
                status: 500,
                message: "script exhausted".to_string(),
            });
        }
        match script.remove(0) {
            Script::Reply(text) => Ok(text.to_string()),
            Script::RateLimit => Err(ScanError::Api {
                status: 429,
                message: "Resource exhausted".to_string(),
            }),
        }
    }
}

/// Skips the backoff sleep so rate-limit tests run instantly
struct NoopDelay;

#[async_trait]
impl Delay for NoopDelay {
    async fn sleep(&self, _duration: Duration) {}
}

fn scanner_for(script: Vec<Script>) -> (LabelScanner, Arc<ScriptedModel>) {
    // The scanner owns one handle, the test keeps another for inspecting
    // call counts and captured prompts afterwards.
    let model = Arc::new(ScriptedModel::new(script));
    let scanner = LabelScanner::with_delay(
        Box::new(ModelHandle(model.clone())),
        3,
        Box::new(NoopDelay),
    );
    (scanner, model)
}

struct ModelHandle(Arc<ScriptedModel>);

#[async_trait]
impl GenerativeModel for ModelHandle {
    fn model_name(&self) -> &str {
        self.0.model_name()
    }

    async fn generate(&self, parts: &[ContentPart]) -> Result<String, ScanError> {
        self.0.generate(parts).await
    }
}

const IMAGE: &[u8] = b"fake jpeg bytes";

#[tokio::test]
async fn test_medicine_accepted_without_food_pass() {
    let (scanner, model) = scanner_for(vec![Script::Reply(
        r#"```json
{"name": "Paracetamol 500mg", "genericName": "paracetamol",
 "uses": ["Pain relief"], "sideEffects": ["Rash"], "isSafe": true}
```"#,
    )]);

    let result = scanner
        .scan_label(IMAGE, "image/jpeg", &UserProfile::default())
        .await
        .unwrap();

    assert_eq!(result.scan_type, ScanType::Medicine);
    assert_eq!(result.medicine_info().unwrap().name, "Paracetamol 500mg");
    // A structurally sound medicine reply means no second pass
    assert_eq!(model.call_count(), 1);
}

#[tokio::test]
async fn test_unknown_medicine_falls_through_to_food() {
    let (scanner, model) = scanner_for(vec![
        Script::Reply(r#"{"name": "Unknown Medicine", "uses": [], "sideEffects": []}"#),
        Script::Reply(r#"{"ingredients": ["sugar"], "isSafe": true}"#),
    ]);

    let result = scanner
        .scan_label(IMAGE, "image/jpeg", &UserProfile::default())
        .await
        .unwrap();

    assert_eq!(result.scan_type, ScanType::Food);
    assert_eq!(
        result.food_analysis().unwrap().ingredients,
        vec!["sugar".to_string()]
    );
    assert_eq!(model.call_count(), 2);

    // Medicine prompt first, then the food prompt
    let prompts = model.prompts();
    assert!(prompts[0].contains("medicine package"));
    assert!(prompts[1].contains("food label"));
}

#[tokio::test]
async fn test_sparse_food_result_is_returned_unconditionally() {
    let (scanner, _) = scanner_for(vec![
        Script::Reply(r#"{"name": "Unknown Medicine"}"#),
        Script::Reply("{}"),
    ]);

    let result = scanner
        .scan_label(IMAGE, "image/jpeg", &UserProfile::default())
        .await
        .unwrap();

    let analysis = result.food_analysis().unwrap();
    assert!(analysis.ingredients.is_empty());
    assert_eq!(analysis.nutrition_score.grade, Grade::C);
    assert_eq!(analysis.nutrition_score.score, 70);
}

#[tokio::test]
async fn test_unparseable_replies_degrade_instead_of_erroring() {
    let (scanner, _) = scanner_for(vec![
        Script::Reply("I cannot tell what this is."),
        Script::Reply("Sorry, no readable label in this photo."),
    ]);

    let result = scanner
        .scan_label(IMAGE, "image/jpeg", &UserProfile::default())
        .await
        .unwrap();

    assert_eq!(result.scan_type, ScanType::Food);
    assert!(!result.warnings.is_empty());
    let analysis = result.food_analysis().unwrap();
    assert_eq!(analysis.nutrition_score.grade, Grade::C);
    assert_eq!(analysis.nutrition_score.score, 70);
}

#[tokio::test]
async fn test_persistent_rate_limit_surfaces_user_facing_error() {
    // Both passes exhaust their 3 retries on 429s
    let (scanner, model) = scanner_for(vec![
        Script::RateLimit,
        Script::RateLimit,
        Script::RateLimit,
        Script::RateLimit,
        Script::RateLimit,
        Script::RateLimit,
    ]);

    let err = scanner
        .scan_label(IMAGE, "image/jpeg", &UserProfile::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ScanError::RateLimited));
    assert_eq!(model.call_count(), 6);
}

#[tokio::test]
async fn test_medicine_pass_retries_through_transient_rate_limit() {
    let (scanner, model) = scanner_for(vec![
        Script::RateLimit,
        Script::Reply(r#"{"name": "Ibuprofen", "uses": ["Pain relief"], "sideEffects": []}"#),
    ]);

    let result = scanner
        .scan_label(IMAGE, "image/jpeg", &UserProfile::default())
        .await
        .unwrap();

    assert_eq!(result.scan_type, ScanType::Medicine);
    assert_eq!(model.call_count(), 2);
}

#[tokio::test]
async fn test_food_prompt_carries_user_profile() {
    let (scanner, model) = scanner_for(vec![
        Script::Reply(r#"{"name": "Unknown Medicine"}"#),
        Script::Reply(r#"{"ingredients": ["milk solids"], "isSafe": false}"#),
    ]);

    let profile = UserProfile {
        allergies: vec!["milk".to_string()],
        dietary_restriction: labelscan::DietaryRestriction::Vegan,
        health_conditions: vec!["lactose intolerance".to_string()],
    };

    let result = scanner
        .scan_label(IMAGE, "image/jpeg", &profile)
        .await
        .unwrap();
    assert!(!result.is_safe);

    let food_prompt = &model.prompts()[1];
    assert!(food_prompt.contains("milk"));
    assert!(food_prompt.contains("vegan"));
    assert!(food_prompt.contains("lactose intolerance"));
}
