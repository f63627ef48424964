//! Prompt construction for the three model calls.
//!
//! All builders are pure string construction: the same inputs always
//! produce byte-identical output, which is what the tests pin down (the
//! model call itself is non-deterministic, the prompts must not be).

use crate::model::{ScanResult, UserProfile};

/// Instruction for reading a medicine package.
///
/// The model is told to answer with exactly one JSON object; the parser
/// still tolerates fencing and surrounding prose.
pub const MEDICINE_PROMPT: &str = r#"You are a pharmacist's assistant reading a photo of a medicine package.
Identify the medicine and respond with ONLY one JSON object, no other text:

{
  "name": "<brand name printed on the package>",
  "genericName": "<generic/salt name>",
  "extractedText": "<all text you can read on the package>",
  "uses": ["<what this medicine is used for>"],
  "indications": ["<conditions it is indicated for>"],
  "sideEffects": ["<common side effects>"],
  "contraindications": ["<who should not take it>"],
  "dosage": "<dosage instructions if printed>",
  "precautions": ["<storage and usage precautions>"],
  "interactions": ["<known drug or food interactions>"],
  "results": "<what outcome a patient can expect>",
  "warnings": ["<any safety warnings printed on the package>"],
  "isSafe": true
}

If the image is not a medicine package, use "Unknown Medicine" as the name
and leave the arrays empty."#;

/// Build the food-label prompt, personalized with the user's allergies,
/// dietary restriction, and health conditions.
pub fn food_prompt(profile: &UserProfile) -> String {
    let allergies = if profile.allergies.is_empty() {
        "none reported".to_string()
    } else {
        profile.allergies.join(", ")
    };
    let conditions = if profile.health_conditions.is_empty() {
        "none reported".to_string()
    } else {
        profile.health_conditions.join(", ")
    };

    format!(
        r#"You are a nutritionist reading a photo of a packaged food label.
The user has these allergies: {allergies}.
The user's dietary restriction is: {restriction}.
The user's health conditions are: {conditions}.

Analyze the label against this profile and respond with ONLY one JSON object, no other text:

{{
  "extractedText": "<all text you can read on the label>",
  "ingredients": ["<each ingredient listed>"],
  "allergens": [{{"allergen": "<name>", "severity": "high|medium|low", "found": true}}],
  "nutritionScore": {{"grade": "A|B|C|D|F", "score": 0, "reasons": ["<why this grade>"]}},
  "warnings": ["<cautions for this specific user>"],
  "safeAlternatives": ["<healthier or safer products>"],
  "isSafe": true
}}

Set "isSafe" to false if any of the user's allergens or restricted
ingredients appear on the label."#,
        allergies = allergies,
        restriction = profile.dietary_restriction,
        conditions = conditions,
    )
}

/// Build the Hindi translation prompt by embedding a previously-parsed
/// result, serialized back to JSON.
pub fn translation_prompt(result: &ScanResult) -> String {
    // Serialize of our own types cannot fail
    let serialized =
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string());

    format!(
        r#"Translate the human-readable values in this JSON object to Hindi.
Keep the exact same keys and structure. Do not translate the keys, the
"scanType" value, grades, severity levels, or boolean values.
Respond with ONLY the translated JSON object, no other text:

{serialized}"#
    )
}
