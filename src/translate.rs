//! Best-effort Hindi translation of a finished scan result.
//!
//! The original result is re-serialized into a translation prompt, the
//! model's reply is parsed with the same brace-extraction technique as the
//! main parser, and translated fields are merged onto a clone of the
//! original. Anything missing from the reply keeps its original value, and
//! any failure at all returns the original untouched. Translation never
//! blocks or corrupts the primary scan result.

use crate::error::ScanError;
use crate::model::{ScanPayload, ScanResult};
use crate::parser::parse_json_region;
use crate::prompts::translation_prompt;
use crate::providers::{ContentPart, GenerativeModel};
use log::warn;
use serde_json::Value;

/// Translate a result to Hindi. Returns a new result; on any failure the
/// returned value is a clone of the original.
pub async fn translate_to_hindi(
    model: &dyn GenerativeModel,
    result: &ScanResult,
) -> ScanResult {
    match try_translate(model, result).await {
        Ok(translated) => translated,
        Err(err) => {
            warn!("Translation failed, keeping original result: {}", err);
            result.clone()
        }
    }
}

async fn try_translate(
    model: &dyn GenerativeModel,
    result: &ScanResult,
) -> Result<ScanResult, ScanError> {
    let prompt = translation_prompt(result);
    let reply = model
        .generate(&[ContentPart::Text(prompt)])
        .await?;
    let raw = parse_json_region(&reply)?;
    Ok(merge_translation(result, &raw))
}

/// Merge translated fields onto a clone of the original, field by field.
/// An absent or misshapen translated field keeps the original value.
/// Grades, severities, scores, and booleans are never taken from the
/// translation.
pub fn merge_translation(original: &ScanResult, translated: &Value) -> ScanResult {
    let mut merged = original.clone();

    if let Some(text) = non_empty_string(&translated["extractedText"]) {
        merged.extracted_text = text;
    }
    if let Some(warnings) = non_empty_list(&translated["warnings"]) {
        merged.warnings = warnings;
    }

    match &mut merged.payload {
        ScanPayload::Food(analysis) => {
            if let Some(ingredients) = non_empty_list(&translated["ingredients"]) {
                analysis.ingredients = ingredients;
            }
            if let Some(alternatives) = non_empty_list(&translated["safeAlternatives"]) {
                analysis.safe_alternatives = alternatives;
            }
            if let Some(reasons) = non_empty_list(&translated["nutritionScore"]["reasons"]) {
                analysis.nutrition_score.reasons = reasons;
            }
            // Allergen names translate positionally; severity/found stay
            if let Some(names) = translated["allergens"].as_array() {
                for (alert, item) in analysis.allergens.iter_mut().zip(names) {
                    if let Some(name) = non_empty_string(&item["allergen"]) {
                        alert.allergen = name;
                    }
                }
            }
        }
        ScanPayload::Medicine { medicine_info } => {
            let info = &translated["medicineInfo"];
            // Some replies flatten the medicine fields to the top level
            let info = if info.is_object() { info } else { translated };

            if let Some(name) = non_empty_string(&info["name"]) {
                medicine_info.name = name;
            }
            if let Some(generic) = non_empty_string(&info["genericName"]) {
                medicine_info.generic_name = generic;
            }
            if let Some(uses) = non_empty_list(&info["uses"]) {
                medicine_info.uses = uses;
            }
            if let Some(indications) = non_empty_list(&info["indications"]) {
                medicine_info.indications = indications;
            }
            if let Some(side_effects) = non_empty_list(&info["sideEffects"]) {
                medicine_info.side_effects = side_effects;
            }
            if let Some(contraindications) = non_empty_list(&info["contraindications"]) {
                medicine_info.contraindications = contraindications;
            }
            if let Some(dosage) = non_empty_string(&info["dosage"]) {
                medicine_info.dosage = dosage;
            }
            if let Some(precautions) = non_empty_list(&info["precautions"]) {
                medicine_info.precautions = precautions;
            }
            if let Some(interactions) = non_empty_list(&info["interactions"]) {
                medicine_info.interactions = Some(interactions);
            }
            if let Some(results) = non_empty_string(&info["results"]) {
                medicine_info.results = results;
            }
        }
    }

    merged
}

fn non_empty_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn non_empty_list(value: &Value) -> Option<Vec<String>> {
    let list: Vec<String> = value
        .as_array()?
        .iter()
        .filter_map(|item| item.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}
