use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::matching::profile::RawCandidateProfile;

/// Row from `candidates`. List-shaped columns come back through `to_jsonb(..)`, so a jsonb
/// array, JSON text, and hex-rendered bytea all arrive as a `Value`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub specialization: Option<String>,
    pub profession: Option<String>,
    pub title: Option<String>,
    pub previous_job_titles: Option<Value>,
    pub experience: Option<Value>,
    pub education: Option<Value>,
    pub skills: Option<Value>,
    pub character_traits: Option<Value>,
    pub availability: Option<String>,
    pub preferred_locations: Option<Value>,
    pub preferred_job_types: Option<Value>,
    pub career_preference: Option<Value>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<CandidateRow> for RawCandidateProfile {
    fn from(row: CandidateRow) -> Self {
        RawCandidateProfile {
            id: Some(row.id),
            specialization: row.specialization,
            profession: row.profession,
            title: row.title,
            previous_job_titles: row.previous_job_titles.into(),
            experience: row.experience.into(),
            education: row.education.into(),
            skills: row.skills.into(),
            character_traits: row.character_traits.into(),
            availability: row.availability,
            preferred_locations: row.preferred_locations.into(),
            preferred_job_types: row.preferred_job_types.into(),
            career_preference: row.career_preference.into(),
            updated_at: row.updated_at,
        }
    }
}
