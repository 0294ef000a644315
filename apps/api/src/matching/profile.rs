//! Candidate and job inputs: the loosely-shaped records callers send or storage returns,
//! and the strict types the criterion scorers read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::matching::availability::StartDate;
use crate::matching::normalize::{normalize_field, normalize_strings, RawField};

// ────────────────────────────────────────────────────────────────────────────
// Raw records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCandidateProfile {
    pub id: Option<Uuid>,
    pub specialization: Option<String>,
    pub profession: Option<String>,
    pub title: Option<String>,
    pub previous_job_titles: RawField,
    pub experience: RawField,
    pub education: RawField,
    pub skills: RawField,
    pub character_traits: RawField,
    pub availability: Option<String>,
    pub preferred_locations: RawField,
    pub preferred_job_types: RawField,
    /// Either a token or the legacy boolean `open_to_career_change` flag.
    pub career_preference: RawField,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawJobPosting {
    pub id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub requirements: RawField,
    pub education: RawField,
    pub certifications: RawField,
    pub perks: RawField,
    pub employment_type: Option<String>,
    pub start_date: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Normalized inputs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub description: String,
    pub years: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EducationEntry {
    pub degree: String,
    pub field: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareerPreference {
    OpenToChange,
    ContinueInField,
    #[default]
    Unspecified,
}

const OPEN_TO_CHANGE_TOKENS: &[&str] = &[
    "open",
    "change",
    "new_direction",
    "new direction",
    "פתוח",
    "שינוי",
    "כיוון חדש",
];

const CONTINUE_TOKENS: &[&str] = &[
    "continue",
    "same_field",
    "current_field",
    "same field",
    "current field",
    "להמשיך",
    "המשך",
    "אותו תחום",
];

impl CareerPreference {
    fn from_raw(raw: &RawField) -> Self {
        match raw {
            RawField::Flag(true) => CareerPreference::OpenToChange,
            RawField::Flag(false) => CareerPreference::ContinueInField,
            RawField::Text(text) => Self::from_text(text),
            _ => CareerPreference::Unspecified,
        }
    }

    fn from_text(text: &str) -> Self {
        let lower = text.trim().to_lowercase();
        match lower.as_str() {
            "true" => return CareerPreference::OpenToChange,
            "false" => return CareerPreference::ContinueInField,
            _ => {}
        }
        if OPEN_TO_CHANGE_TOKENS.iter().any(|t| lower.contains(t)) {
            CareerPreference::OpenToChange
        } else if CONTINUE_TOKENS.iter().any(|t| lower.contains(t)) {
            CareerPreference::ContinueInField
        } else {
            CareerPreference::Unspecified
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateProfile {
    pub id: Option<Uuid>,
    /// First non-empty of specialization, profession, title.
    pub specialization: String,
    pub previous_job_titles: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    pub character_traits: Vec<String>,
    pub availability: String,
    pub preferred_locations: Vec<String>,
    pub preferred_job_types: Vec<String>,
    pub career_preference: CareerPreference,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobPosting {
    pub id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub requirements: Vec<String>,
    pub education: Vec<String>,
    pub certifications: Vec<String>,
    pub perks: Vec<String>,
    pub employment_type: String,
    pub start_date: StartDate,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&RawCandidateProfile> for CandidateProfile {
    fn from(raw: &RawCandidateProfile) -> Self {
        let specialization = [&raw.specialization, &raw.profession, &raw.title]
            .into_iter()
            .filter_map(|s| s.as_deref().map(str::trim))
            .find(|s| !s.is_empty())
            .unwrap_or_default()
            .to_string();

        CandidateProfile {
            id: raw.id,
            specialization,
            previous_job_titles: normalize_strings(&raw.previous_job_titles),
            experience: normalize_field(&raw.experience)
                .iter()
                .filter_map(experience_entry)
                .collect(),
            education: normalize_field(&raw.education)
                .iter()
                .filter_map(education_entry)
                .collect(),
            skills: normalize_strings(&raw.skills),
            character_traits: normalize_strings(&raw.character_traits),
            availability: text(&raw.availability),
            preferred_locations: normalize_strings(&raw.preferred_locations),
            preferred_job_types: normalize_strings(&raw.preferred_job_types),
            career_preference: CareerPreference::from_raw(&raw.career_preference),
            updated_at: raw.updated_at,
        }
    }
}

impl From<&RawJobPosting> for JobPosting {
    fn from(raw: &RawJobPosting) -> Self {
        JobPosting {
            id: raw.id,
            title: text(&raw.title),
            description: text(&raw.description),
            category: text(&raw.category),
            location: text(&raw.location),
            requirements: normalize_strings(&raw.requirements),
            education: normalize_strings(&raw.education),
            certifications: normalize_strings(&raw.certifications),
            perks: normalize_strings(&raw.perks),
            employment_type: text(&raw.employment_type),
            start_date: StartDate::parse(raw.start_date.as_deref()),
            updated_at: raw.updated_at,
        }
    }
}

fn text(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

fn str_member(map: &serde_json::Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| map.get(*k).and_then(Value::as_str))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn years_member(map: &serde_json::Map<String, Value>) -> f64 {
    ["years", "duration_years"]
        .iter()
        .find_map(|k| match map.get(*k)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|y| y.is_finite() && *y >= 0.0)
        .unwrap_or(0.0)
}

fn experience_entry(item: &Value) -> Option<ExperienceEntry> {
    match item {
        Value::Object(map) => Some(ExperienceEntry {
            title: str_member(map, &["title", "role", "position"]),
            description: str_member(map, &["description"]),
            years: years_member(map),
        }),
        Value::String(s) if !s.trim().is_empty() => Some(ExperienceEntry {
            title: s.trim().to_string(),
            description: String::new(),
            years: 0.0,
        }),
        _ => None,
    }
}

fn education_entry(item: &Value) -> Option<EducationEntry> {
    match item {
        Value::Object(map) => Some(EducationEntry {
            degree: str_member(map, &["degree", "level"]),
            field: str_member(map, &["field", "field_of_study"]),
        }),
        Value::String(s) if !s.trim().is_empty() => Some(EducationEntry {
            degree: s.trim().to_string(),
            field: String::new(),
        }),
        _ => None,
    }
}
