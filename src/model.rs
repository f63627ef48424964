use serde::Serialize;
use std::fmt;

/// Which kind of label a scan was classified as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanType {
    Food,
    Medicine,
}

/// Severity of a matched allergen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Parse a severity string as returned by the model; anything
    /// unrecognized is treated as medium.
    pub fn parse(value: &str) -> Severity {
        match value.to_lowercase().as_str() {
            "high" => Severity::High,
            "low" => Severity::Low,
            _ => Severity::Medium,
        }
    }
}

/// Letter grade for nutrition quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Parse a grade letter as returned by the model; anything
    /// unrecognized falls back to C.
    pub fn parse(value: &str) -> Grade {
        match value.trim().to_uppercase().as_str() {
            "A" => Grade::A,
            "B" => Grade::B,
            "D" => Grade::D,
            "F" => Grade::F,
            _ => Grade::C,
        }
    }
}

/// One allergen the model checked the label against
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllergenAlert {
    pub allergen: String,
    pub severity: Severity,
    pub found: bool,
}

/// Overall nutrition assessment of a food label
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionScore {
    pub grade: Grade,
    pub score: u8,
    pub reasons: Vec<String>,
}

impl Default for NutritionScore {
    fn default() -> Self {
        NutritionScore {
            grade: Grade::C,
            score: 70,
            reasons: Vec::new(),
        }
    }
}

/// Structured analysis of a food label
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodAnalysis {
    pub ingredients: Vec<String>,
    pub allergens: Vec<AllergenAlert>,
    pub nutrition_score: NutritionScore,
    pub safe_alternatives: Vec<String>,
}

/// Structured information read from a medicine package.
///
/// After normalization `uses` and `side_effects` always contain at least
/// one entry (see `fallbacks`), and `dosage` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineInfo {
    pub name: String,
    pub generic_name: String,
    pub uses: Vec<String>,
    pub indications: Vec<String>,
    pub side_effects: Vec<String>,
    pub contraindications: Vec<String>,
    pub dosage: String,
    pub precautions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interactions: Option<Vec<String>>,
    pub results: String,
}

/// Payload half of a scan result, keyed by the scan type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScanPayload {
    Food(FoodAnalysis),
    Medicine {
        #[serde(rename = "medicineInfo")]
        medicine_info: MedicineInfo,
    },
}

/// The normalized output of one scan invocation.
///
/// Constructed fresh per scan and owned by the caller; nothing in this
/// crate persists it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub scan_type: ScanType,
    pub extracted_text: String,
    pub warnings: Vec<String>,
    pub is_safe: bool,
    #[serde(flatten)]
    pub payload: ScanPayload,
}

impl ScanResult {
    /// Degraded food-shaped result returned when the model's reply could
    /// not be parsed at all. Grade C, score 70, one warning so the caller
    /// never renders a blank screen.
    pub fn degraded(reason: &str) -> ScanResult {
        ScanResult {
            scan_type: ScanType::Food,
            extracted_text: String::new(),
            warnings: vec![format!("Analysis incomplete: {reason}")],
            is_safe: true,
            payload: ScanPayload::Food(FoodAnalysis::default()),
        }
    }

    /// Borrow the medicine payload, if this is a medicine result
    pub fn medicine_info(&self) -> Option<&MedicineInfo> {
        match &self.payload {
            ScanPayload::Medicine { medicine_info } => Some(medicine_info),
            ScanPayload::Food(_) => None,
        }
    }

    /// Borrow the food payload, if this is a food result
    pub fn food_analysis(&self) -> Option<&FoodAnalysis> {
        match &self.payload {
            ScanPayload::Food(analysis) => Some(analysis),
            ScanPayload::Medicine { .. } => None,
        }
    }
}

/// Dietary restriction the food prompt is parameterized with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DietaryRestriction {
    #[default]
    None,
    Vegetarian,
    Vegan,
    Halal,
    Kosher,
    JainVegetarian,
    Diabetic,
}

impl fmt::Display for DietaryRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DietaryRestriction::None => "none",
            DietaryRestriction::Vegetarian => "vegetarian",
            DietaryRestriction::Vegan => "vegan",
            DietaryRestriction::Halal => "halal",
            DietaryRestriction::Kosher => "kosher",
            DietaryRestriction::JainVegetarian => "jain vegetarian",
            DietaryRestriction::Diabetic => "diabetic",
        };
        f.write_str(label)
    }
}

/// Health context the food analysis is personalized with
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub allergies: Vec<String>,
    pub dietary_restriction: DietaryRestriction,
    pub health_conditions: Vec<String>,
}
