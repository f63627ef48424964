//! Coercion of free-form model text into a validated `ScanResult`.
//!
//! The model is asked for a single JSON object but replies with whatever
//! it likes: fenced code blocks, surrounding prose, sparse or misshapen
//! fields. This module strips the wrapping, pulls out the JSON region,
//! and runs an explicit validating conversion that defaults every field
//! rather than erroring on shape. The only hard failures are "no JSON
//! region at all" and "region is not valid JSON".

use crate::error::ScanError;
use crate::fallbacks::{
    defaults_for, DEFAULT_CONTRAINDICATIONS, DEFAULT_DOSAGE, DEFAULT_PRECAUTIONS,
};
use crate::model::{
    AllergenAlert, FoodAnalysis, Grade, MedicineInfo, NutritionScore, ScanPayload, ScanResult,
    ScanType, Severity,
};
use serde_json::Value;

/// Strip a leading/trailing triple-backtick fence (with or without a
/// `json` language tag) and surrounding whitespace.
pub fn strip_code_fences(text: &str) -> &str {
    let mut trimmed = text.trim();

    if let Some(rest) = trimmed.strip_prefix("```") {
        // Drop the rest of the fence line ("json", "JSON", or nothing)
        trimmed = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest,
        };
    }
    if let Some(rest) = trimmed.trim_end().strip_suffix("```") {
        trimmed = rest;
    }

    trimmed.trim()
}

/// Locate the JSON object region: greedy first-`{` to last-`}` slice.
pub fn extract_json_object(text: &str) -> Result<&str, ScanError> {
    let start = text.find('{').ok_or(ScanError::NoJsonFound)?;
    let end = text.rfind('}').ok_or(ScanError::NoJsonFound)?;
    if end < start {
        return Err(ScanError::NoJsonFound);
    }
    Ok(&text[start..=end])
}

/// Strip fencing, extract the JSON region, and parse it into a
/// loosely-typed `Value`. This is the only stage that can fail; the
/// normalizers below default their way past every shape problem.
pub fn parse_json_region(text: &str) -> Result<Value, ScanError> {
    let stripped = strip_code_fences(text);
    let region = extract_json_object(stripped)?;
    Ok(serde_json::from_str(region)?)
}

/// Non-empty trimmed string field, or None
fn string_field(value: &Value, key: &str) -> Option<String> {
    value[key]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// String array field; non-string entries and blanks are dropped,
/// a missing or misshapen field becomes an empty list
fn string_list(value: &Value, key: &str) -> Vec<String> {
    value[key]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// `isSafe` defaults to true unless the model explicitly returned false
fn is_safe_field(value: &Value) -> bool {
    value["isSafe"].as_bool().unwrap_or(true)
}

fn nutrition_score(value: &Value) -> NutritionScore {
    let raw = &value["nutritionScore"];
    if !raw.is_object() {
        return NutritionScore::default();
    }
    NutritionScore {
        grade: raw["grade"].as_str().map(Grade::parse).unwrap_or(Grade::C),
        score: raw["score"]
            .as_u64()
            .map(|s| s.min(100) as u8)
            .unwrap_or(70),
        reasons: string_list(raw, "reasons"),
    }
}

fn allergen_alerts(value: &Value) -> Vec<AllergenAlert> {
    value["allergens"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let allergen = string_field(item, "allergen")?;
                    Some(AllergenAlert {
                        allergen,
                        severity: item["severity"]
                            .as_str()
                            .map(Severity::parse)
                            .unwrap_or(Severity::Medium),
                        found: item["found"].as_bool().unwrap_or(false),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Convert a raw food-shaped reply into a `ScanResult`, defaulting every
/// absent or misshapen field.
pub fn normalize_food(raw: &Value) -> ScanResult {
    ScanResult {
        scan_type: ScanType::Food,
        extracted_text: string_field(raw, "extractedText").unwrap_or_default(),
        warnings: string_list(raw, "warnings"),
        is_safe: is_safe_field(raw),
        payload: ScanPayload::Food(FoodAnalysis {
            ingredients: string_list(raw, "ingredients"),
            allergens: allergen_alerts(raw),
            nutrition_score: nutrition_score(raw),
            safe_alternatives: string_list(raw, "safeAlternatives"),
        }),
    }
}

/// Convert a raw medicine-shaped reply into a `ScanResult`.
///
/// Applies the "never show blank" policy: `uses` and `sideEffects` come
/// from the keyword-matched fallback table when the model left them
/// empty, and `contraindications`/`dosage`/`precautions` get their fixed
/// defaults.
pub fn normalize_medicine(raw: &Value) -> ScanResult {
    let name = string_field(raw, "name").unwrap_or_else(|| "Unknown Medicine".to_string());
    let defaults = defaults_for(&name);

    let mut uses = string_list(raw, "uses");
    if uses.is_empty() {
        uses = defaults.uses.iter().map(|s| s.to_string()).collect();
    }
    let mut side_effects = string_list(raw, "sideEffects");
    if side_effects.is_empty() {
        side_effects = defaults.side_effects.iter().map(|s| s.to_string()).collect();
    }
    let mut contraindications = string_list(raw, "contraindications");
    if contraindications.is_empty() {
        contraindications = DEFAULT_CONTRAINDICATIONS
            .iter()
            .map(|s| s.to_string())
            .collect();
    }
    let mut precautions = string_list(raw, "precautions");
    if precautions.is_empty() {
        precautions = DEFAULT_PRECAUTIONS.iter().map(|s| s.to_string()).collect();
    }

    let interactions = {
        let list = string_list(raw, "interactions");
        if list.is_empty() {
            None
        } else {
            Some(list)
        }
    };

    ScanResult {
        scan_type: ScanType::Medicine,
        extracted_text: string_field(raw, "extractedText").unwrap_or_default(),
        warnings: string_list(raw, "warnings"),
        is_safe: is_safe_field(raw),
        payload: ScanPayload::Medicine {
            medicine_info: MedicineInfo {
                generic_name: string_field(raw, "genericName").unwrap_or_default(),
                name,
                uses,
                indications: string_list(raw, "indications"),
                side_effects,
                contraindications,
                dosage: string_field(raw, "dosage")
                    .unwrap_or_else(|| DEFAULT_DOSAGE.to_string()),
                precautions,
                interactions,
                results: string_field(raw, "results").unwrap_or_default(),
            },
        },
    }
}

/// Parse and normalize a food-oriented model reply
pub fn parse_food_response(text: &str) -> Result<ScanResult, ScanError> {
    let raw = parse_json_region(text)?;
    Ok(normalize_food(&raw))
}

/// Parse and normalize a medicine-oriented model reply
pub fn parse_medicine_response(text: &str) -> Result<ScanResult, ScanError> {
    let raw = parse_json_region(text)?;
    Ok(normalize_medicine(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_fences_with_language_tag() {
        let fenced = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_fences_without_language_tag() {
        let fenced = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"a\": 1}");
    }

    #[test]
    fn test_unfenced_text_passes_through() {
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_fenced_and_unfenced_parse_identically() {
        let plain = r#"{"ingredients": ["water", "sugar"], "isSafe": false}"#;
        let fenced = format!("```json\n{plain}\n```");

        let from_plain = parse_food_response(plain).unwrap();
        let from_fenced = parse_food_response(&fenced).unwrap();
        assert_eq!(from_plain, from_fenced);
        assert!(!from_plain.is_safe);
    }

    #[test]
    fn test_json_extracted_from_surrounding_prose() {
        let reply = "Here is the analysis you asked for:\n{\"ingredients\": [\"salt\"]}\nLet me know if you need more.";
        let result = parse_food_response(reply).unwrap();
        assert_eq!(
            result.food_analysis().unwrap().ingredients,
            vec!["salt".to_string()]
        );
    }

    #[test]
    fn test_no_json_region_is_an_error() {
        let err = parse_food_response("I could not read the image, sorry.").unwrap_err();
        assert!(matches!(err, ScanError::NoJsonFound));
    }

    #[test]
    fn test_invalid_json_region_is_an_error() {
        let err = parse_food_response("{not json at all]}").unwrap_err();
        assert!(matches!(err, ScanError::Json(_)));
    }

    #[test]
    fn test_food_defaults_applied_to_empty_object() {
        let result = parse_food_response("{}").unwrap();
        let analysis = result.food_analysis().unwrap();
        assert!(analysis.ingredients.is_empty());
        assert!(analysis.allergens.is_empty());
        assert!(analysis.safe_alternatives.is_empty());
        assert_eq!(analysis.nutrition_score.grade, Grade::C);
        assert_eq!(analysis.nutrition_score.score, 70);
        assert!(result.warnings.is_empty());
        assert!(result.is_safe);
    }

    #[test]
    fn test_well_formed_food_input_is_unchanged() {
        let raw = json!({
            "extractedText": "INGREDIENTS: wheat flour, sugar, palm oil",
            "ingredients": ["wheat flour", "sugar", "palm oil"],
            "allergens": [
                {"allergen": "gluten", "severity": "high", "found": true}
            ],
            "nutritionScore": {
                "grade": "D",
                "score": 35,
                "reasons": ["high sugar", "palm oil"]
            },
            "warnings": ["Contains gluten"],
            "safeAlternatives": ["oat crackers"],
            "isSafe": false
        });

        let result = normalize_food(&raw);
        assert_eq!(result.extracted_text, "INGREDIENTS: wheat flour, sugar, palm oil");
        assert_eq!(result.warnings, vec!["Contains gluten".to_string()]);
        assert!(!result.is_safe);

        let analysis = result.food_analysis().unwrap();
        assert_eq!(analysis.ingredients.len(), 3);
        assert_eq!(analysis.allergens[0].allergen, "gluten");
        assert_eq!(analysis.allergens[0].severity, Severity::High);
        assert!(analysis.allergens[0].found);
        assert_eq!(analysis.nutrition_score.grade, Grade::D);
        assert_eq!(analysis.nutrition_score.score, 35);
        assert_eq!(analysis.nutrition_score.reasons.len(), 2);
        assert_eq!(analysis.safe_alternatives, vec!["oat crackers".to_string()]);
    }

    #[test]
    fn test_medicine_never_empty_uses_and_side_effects() {
        let raw = json!({
            "name": "Paracetamol 500mg",
            "uses": [],
            "sideEffects": []
        });

        let result = normalize_medicine(&raw);
        let info = result.medicine_info().unwrap();
        assert!(!info.uses.is_empty());
        assert!(!info.side_effects.is_empty());
        // Keyword match against "paracetamol", not the catch-all
        assert!(info.uses[0].contains("pain"));
    }

    #[test]
    fn test_unknown_medicine_gets_catch_all_defaults() {
        let raw = json!({"name": "Zyntriol XR"});
        let result = normalize_medicine(&raw);
        let info = result.medicine_info().unwrap();
        assert_eq!(info.uses, vec!["Use as directed by your doctor or pharmacist"]);
        assert_eq!(info.dosage, "As prescribed by doctor");
        assert!(!info.contraindications.is_empty());
        assert!(!info.precautions.is_empty());
    }

    #[test]
    fn test_well_formed_medicine_input_is_unchanged() {
        let raw = json!({
            "name": "Ibuprofen 200mg",
            "genericName": "ibuprofen",
            "extractedText": "IBUPROFEN TABLETS BP 200mg",
            "uses": ["Pain relief"],
            "indications": ["Headache", "Muscle pain"],
            "sideEffects": ["Stomach upset"],
            "contraindications": ["Stomach ulcers"],
            "dosage": "1-2 tablets every 4-6 hours",
            "precautions": ["Take with food"],
            "interactions": ["Aspirin"],
            "results": "Pain relief within 30 minutes",
            "warnings": ["Not for children under 12"],
            "isSafe": true
        });

        let result = normalize_medicine(&raw);
        let info = result.medicine_info().unwrap();
        assert_eq!(info.name, "Ibuprofen 200mg");
        assert_eq!(info.generic_name, "ibuprofen");
        assert_eq!(info.uses, vec!["Pain relief"]);
        assert_eq!(info.indications.len(), 2);
        assert_eq!(info.side_effects, vec!["Stomach upset"]);
        assert_eq!(info.contraindications, vec!["Stomach ulcers"]);
        assert_eq!(info.dosage, "1-2 tablets every 4-6 hours");
        assert_eq!(info.precautions, vec!["Take with food"]);
        assert_eq!(info.interactions, Some(vec!["Aspirin".to_string()]));
        assert_eq!(info.results, "Pain relief within 30 minutes");
        assert_eq!(result.warnings, vec!["Not for children under 12"]);
    }

    #[test]
    fn test_wrong_shape_fields_are_defaulted_not_errors() {
        // ingredients is a string, nutritionScore is a number, isSafe is a string
        let raw = json!({
            "ingredients": "not a list",
            "nutritionScore": 42,
            "isSafe": "yes"
        });
        let result = normalize_food(&raw);
        let analysis = result.food_analysis().unwrap();
        assert!(analysis.ingredients.is_empty());
        assert_eq!(analysis.nutrition_score, NutritionScore::default());
        assert!(result.is_safe);
    }

    #[test]
    fn test_score_is_clamped_to_100() {
        let raw = json!({"nutritionScore": {"grade": "A", "score": 250}});
        let result = normalize_food(&raw);
        assert_eq!(result.food_analysis().unwrap().nutrition_score.score, 100);
    }
}
