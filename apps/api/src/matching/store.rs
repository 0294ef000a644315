//! Profile store — where candidate and job records come from. The engine never touches
//! it; handlers load records here and pass them in.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::profile::{RawCandidateProfile, RawJobPosting};
use crate::models::candidate::CandidateRow;
use crate::models::job::JobRow;

/// Carried in `AppState` as `Arc<dyn ProfileStore>`.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn candidate(&self, id: Uuid) -> Result<Option<RawCandidateProfile>, AppError>;

    async fn job(&self, id: Uuid) -> Result<Option<RawJobPosting>, AppError>;

    /// Jobs currently open for applications, in a stable order.
    async fn active_jobs(&self) -> Result<Vec<RawJobPosting>, AppError>;

    async fn candidates(&self) -> Result<Vec<RawCandidateProfile>, AppError>;
}

const CANDIDATE_SELECT: &str = r#"
    SELECT id, specialization, profession, title,
           to_jsonb(previous_job_titles) AS previous_job_titles,
           to_jsonb(experience) AS experience,
           to_jsonb(education) AS education,
           to_jsonb(skills) AS skills,
           to_jsonb(character_traits) AS character_traits,
           availability,
           to_jsonb(preferred_locations) AS preferred_locations,
           to_jsonb(preferred_job_types) AS preferred_job_types,
           to_jsonb(career_preference) AS career_preference,
           updated_at
    FROM candidates
"#;

const JOB_SELECT: &str = r#"
    SELECT id, title, description, category, location,
           to_jsonb(requirements) AS requirements,
           to_jsonb(education) AS education,
           to_jsonb(certifications) AS certifications,
           to_jsonb(perks) AS perks,
           employment_type,
           start_date::text AS start_date,
           updated_at
    FROM jobs
"#;

/// Postgres-backed store.
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn candidate(&self, id: Uuid) -> Result<Option<RawCandidateProfile>, AppError> {
        let sql = format!("{CANDIDATE_SELECT} WHERE id = $1");
        let row = sqlx::query_as::<_, CandidateRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn job(&self, id: Uuid) -> Result<Option<RawJobPosting>, AppError> {
        let sql = format!("{JOB_SELECT} WHERE id = $1");
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn active_jobs(&self) -> Result<Vec<RawJobPosting>, AppError> {
        let sql = format!("{JOB_SELECT} WHERE status = 'active' ORDER BY created_at DESC, id");
        let rows = sqlx::query_as::<_, JobRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        info!("Loaded {} active jobs", rows.len());
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn candidates(&self) -> Result<Vec<RawCandidateProfile>, AppError> {
        let sql = format!("{CANDIDATE_SELECT} ORDER BY created_at, id");
        let rows = sqlx::query_as::<_, CandidateRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        info!("Loaded {} candidates", rows.len());
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
