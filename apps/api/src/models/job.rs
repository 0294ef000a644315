use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::matching::profile::RawJobPosting;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub requirements: Option<Value>,
    pub education: Option<Value>,
    pub certifications: Option<Value>,
    pub perks: Option<Value>,
    pub employment_type: Option<String>,
    pub start_date: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<JobRow> for RawJobPosting {
    fn from(row: JobRow) -> Self {
        RawJobPosting {
            id: Some(row.id),
            title: row.title,
            description: row.description,
            category: row.category,
            location: row.location,
            requirements: row.requirements.into(),
            education: row.education.into(),
            certifications: row.certifications.into(),
            perks: row.perks.into(),
            employment_type: row.employment_type,
            start_date: row.start_date,
            updated_at: row.updated_at,
        }
    }
}
