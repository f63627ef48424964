//! Keyword-matched defaults for sparse medicine responses.
//!
//! The scanner never shows an empty "uses" or "side effects" section: when
//! the model returns nothing for those fields, a generic default matched on
//! the medicine name fills them in. The text here is deliberately generic
//! guidance, not verified medical information; every entry points the user
//! back to a doctor or pharmacist.

/// Default dosage text when the label gave none
pub const DEFAULT_DOSAGE: &str = "As prescribed by doctor";

/// Generic fields supplied for a medicine the model said little about
pub struct MedicineDefaults {
    pub uses: &'static [&'static str],
    pub side_effects: &'static [&'static str],
}

/// Shared default contraindications, used whenever the model omits them
pub const DEFAULT_CONTRAINDICATIONS: &[&str] = &[
    "Do not use if allergic to any ingredient",
    "Consult doctor if pregnant or breastfeeding",
];

/// Shared default precautions, used whenever the model omits them
pub const DEFAULT_PRECAUTIONS: &[&str] = &[
    "Keep out of reach of children",
    "Store in a cool, dry place",
    "Do not exceed the stated dose",
];

/// Ordered (name substring, defaults) pairs. Checked in sequence against
/// the lowercased medicine name; the catch-all entry must stay last.
const DEFAULTS_BY_KEYWORD: &[(&str, MedicineDefaults)] = &[
    (
        "paracetamol",
        MedicineDefaults {
            uses: &["Relief of mild to moderate pain", "Reduction of fever"],
            side_effects: &["Rarely, skin rash", "Liver damage if taken above the stated dose"],
        },
    ),
    (
        "acetaminophen",
        MedicineDefaults {
            uses: &["Relief of mild to moderate pain", "Reduction of fever"],
            side_effects: &["Rarely, skin rash", "Liver damage if taken above the stated dose"],
        },
    ),
    (
        "ibuprofen",
        MedicineDefaults {
            uses: &["Relief of pain and inflammation", "Reduction of fever"],
            side_effects: &["Stomach upset or heartburn", "Dizziness", "May irritate the stomach lining"],
        },
    ),
    (
        "amoxicillin",
        MedicineDefaults {
            uses: &["Treatment of bacterial infections as directed by a doctor"],
            side_effects: &["Nausea or diarrhoea", "Allergic reactions in sensitive people"],
        },
    ),
    (
        "azithromycin",
        MedicineDefaults {
            uses: &["Treatment of bacterial infections as directed by a doctor"],
            side_effects: &["Nausea or diarrhoea", "Stomach pain"],
        },
    ),
    (
        "antibiotic",
        MedicineDefaults {
            uses: &["Treatment of bacterial infections as directed by a doctor"],
            side_effects: &["Nausea or diarrhoea", "Allergic reactions in sensitive people"],
        },
    ),
    (
        "omeprazole",
        MedicineDefaults {
            uses: &["Relief of acidity and heartburn", "Treatment of acid reflux"],
            side_effects: &["Headache", "Stomach pain or nausea"],
        },
    ),
    (
        "pantoprazole",
        MedicineDefaults {
            uses: &["Relief of acidity and heartburn", "Treatment of acid reflux"],
            side_effects: &["Headache", "Stomach pain or nausea"],
        },
    ),
    (
        "antacid",
        MedicineDefaults {
            uses: &["Relief of acidity, heartburn and indigestion"],
            side_effects: &["Constipation or diarrhoea depending on formulation"],
        },
    ),
    (
        "cetirizine",
        MedicineDefaults {
            uses: &["Relief of allergy symptoms such as sneezing and itching"],
            side_effects: &["Drowsiness", "Dry mouth"],
        },
    ),
    (
        "loratadine",
        MedicineDefaults {
            uses: &["Relief of allergy symptoms such as sneezing and itching"],
            side_effects: &["Headache", "Dry mouth"],
        },
    ),
    (
        "antihistamine",
        MedicineDefaults {
            uses: &["Relief of allergy symptoms such as sneezing and itching"],
            side_effects: &["Drowsiness", "Dry mouth"],
        },
    ),
    // Catch-all. Must remain the last entry.
    (
        "",
        MedicineDefaults {
            uses: &["Use as directed by your doctor or pharmacist"],
            side_effects: &["Consult your doctor or pharmacist about possible side effects"],
        },
    ),
];

/// Look up defaults for a medicine name. Always returns an entry: the
/// empty-substring catch-all matches every name.
pub fn defaults_for(medicine_name: &str) -> &'static MedicineDefaults {
    let name = medicine_name.to_lowercase();
    DEFAULTS_BY_KEYWORD
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map(|(_, defaults)| defaults)
        .expect("catch-all entry matches every name")
}
