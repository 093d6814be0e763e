use crate::models::Disease;

pub const PREVENTION_KEYWORDS: &[&str] = &[
    "prevent",
    "prevention",
    "protect",
    "safety",
    "tips",
    "precaution",
    "avoid",
];

pub const SMOKING_KEYWORDS: &[&str] = &["smoke", "smoking"];

pub const DISEASE_MENU_PHRASES: &[&str] = &["types of eye disease", "list diseases"];

/// Phrases asking the assistant to expand on the last scan result.
pub const ELABORATION_PHRASES: &[&str] = &["tell me more", "what is it"];

pub const GREETING_KEYWORDS: &[&str] = &["hello", "hi"];

/// Ordered keyword → disease table. Scanned top to bottom; first hit wins,
/// so longer phrases sit above the shorter keywords they contain.
pub const DISEASE_KEYWORDS: &[(&str, Disease)] = &[
    ("diabetic retinopathy", Disease::DiabeticRetinopathy),
    ("retinopathy", Disease::DiabeticRetinopathy),
    ("glaucoma", Disease::Glaucoma),
    ("cataracts", Disease::Cataracts),
    ("cataract", Disease::Cataracts),
    ("macular degeneration", Disease::MacularDegeneration),
    ("amd", Disease::MacularDegeneration),
];

/// Substring test against a keyword set. `text` must already be lowercase.
pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// First disease whose keyword appears in `text` (lowercase).
pub fn detect_disease(text: &str) -> Option<Disease> {
    DISEASE_KEYWORDS
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, disease)| *disease)
}
