//! Axum route handlers for the Match API.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::breakdown::{build_breakdown, Breakdown};
use crate::matching::engine::{
    compute_match, compute_match_checked, rank_candidates, rank_jobs, MatchBreakdown,
    MatchCacheKey, MatchError,
};
use crate::matching::profile::{CandidateProfile, JobPosting, RawCandidateProfile, RawJobPosting};
use crate::matching::visibility::is_visible_on_dashboard;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub candidate: Option<RawCandidateProfile>,
    pub job: Option<RawJobPosting>,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub total_score: u8,
    pub visible: bool,
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub candidate: Option<RawCandidateProfile>,
    #[serde(default)]
    pub jobs: Vec<RawJobPosting>,
}

#[derive(Debug, Serialize)]
pub struct RankedJobSummary {
    pub job_id: Option<Uuid>,
    pub title: String,
    pub total_score: u8,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub jobs: Vec<RankedJobSummary>,
    pub evaluated: usize,
    pub hidden: usize,
}

#[derive(Debug, Serialize)]
pub struct RankedCandidateSummary {
    pub candidate_id: Option<Uuid>,
    pub specialization: String,
    pub total_score: u8,
}

#[derive(Debug, Serialize)]
pub struct CandidateRankResponse {
    pub candidates: Vec<RankedCandidateSummary>,
    pub evaluated: usize,
    pub hidden: usize,
}

#[derive(Debug, Serialize)]
pub struct StoredMatchResponse {
    pub cache_key: Option<String>,
    #[serde(flatten)]
    pub result: MatchBreakdown,
}

/// The only place the wall clock is read; everything below takes `today` explicitly.
fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Batch scoring is CPU-bound; keep it off the async executor.
async fn run_blocking<T, F>(what: &'static str, work: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in {what}: {e}")))
}

fn rank_job_response(candidate: &CandidateProfile, jobs: &[JobPosting]) -> RankResponse {
    let ranked: Vec<RankedJobSummary> = rank_jobs(candidate, jobs, today())
        .into_iter()
        .map(|r| RankedJobSummary {
            job_id: r.job.id,
            title: r.job.title.clone(),
            total_score: r.total_score,
        })
        .collect();

    RankResponse {
        evaluated: jobs.len(),
        hidden: jobs.len() - ranked.len(),
        jobs: ranked,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match
pub async fn handle_match(
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchBreakdown>, AppError> {
    let result = compute_match_checked(req.candidate.as_ref(), req.job.as_ref(), today())?;
    Ok(Json(result))
}

/// POST /api/v1/match/breakdown
///
/// Explanation panel only; does not run the aggregation.
pub async fn handle_match_breakdown(
    Json(req): Json<MatchRequest>,
) -> Result<Json<Breakdown>, AppError> {
    let candidate: CandidateProfile = req
        .candidate
        .as_ref()
        .ok_or(MatchError::MissingCandidate)?
        .into();
    let job: JobPosting = req.job.as_ref().ok_or(MatchError::MissingJob)?.into();
    Ok(Json(build_breakdown(&candidate, &job, today())))
}

/// POST /api/v1/match/score
pub async fn handle_match_score(
    Json(req): Json<MatchRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let total_score =
        compute_match_checked(req.candidate.as_ref(), req.job.as_ref(), today())?.total_score;
    Ok(Json(ScoreResponse {
        total_score,
        visible: is_visible_on_dashboard(total_score),
    }))
}

/// POST /api/v1/match/rank
pub async fn handle_rank(Json(req): Json<RankRequest>) -> Result<Json<RankResponse>, AppError> {
    let candidate: CandidateProfile = req
        .candidate
        .as_ref()
        .ok_or(MatchError::MissingCandidate)?
        .into();
    let jobs: Vec<JobPosting> = req.jobs.iter().map(Into::into).collect();
    let response =
        run_blocking("job ranking", move || rank_job_response(&candidate, &jobs)).await?;
    Ok(Json(response))
}

/// GET /api/v1/candidates/:id/recommended-jobs
pub async fn handle_recommended_jobs(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<RankResponse>, AppError> {
    let candidate = load_candidate(&state, candidate_id).await?;
    let jobs: Vec<JobPosting> = state
        .store
        .active_jobs()
        .await?
        .iter()
        .map(Into::into)
        .collect();

    let response =
        run_blocking("job ranking", move || rank_job_response(&candidate, &jobs)).await?;
    info!(
        "Dashboard for candidate {candidate_id}: {} of {} jobs visible",
        response.jobs.len(),
        response.evaluated
    );
    Ok(Json(response))
}

/// GET /api/v1/candidates/:id/jobs/:job_id/match
pub async fn handle_stored_match(
    State(state): State<AppState>,
    Path((candidate_id, job_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<StoredMatchResponse>, AppError> {
    let candidate = load_candidate(&state, candidate_id).await?;
    let job = load_job(&state, job_id).await?;

    Ok(Json(StoredMatchResponse {
        cache_key: MatchCacheKey::for_pair(&candidate, &job).map(|k| k.to_string()),
        result: compute_match(&candidate, &job, today()),
    }))
}

/// GET /api/v1/jobs/:id/recommended-candidates
pub async fn handle_recommended_candidates(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<CandidateRankResponse>, AppError> {
    let job = load_job(&state, job_id).await?;
    let candidates: Vec<CandidateProfile> = state
        .store
        .candidates()
        .await?
        .iter()
        .map(Into::into)
        .collect();

    let response = run_blocking("candidate ranking", move || {
        let ranked: Vec<RankedCandidateSummary> = rank_candidates(&job, &candidates, today())
            .into_iter()
            .map(|r| RankedCandidateSummary {
                candidate_id: r.candidate.id,
                specialization: r.candidate.specialization.clone(),
                total_score: r.total_score,
            })
            .collect();
        CandidateRankResponse {
            evaluated: candidates.len(),
            hidden: candidates.len() - ranked.len(),
            candidates: ranked,
        }
    })
    .await?;

    info!(
        "Candidate list for job {job_id}: {} of {} visible",
        response.candidates.len(),
        response.evaluated
    );
    Ok(Json(response))
}

async fn load_candidate(state: &AppState, id: Uuid) -> Result<CandidateProfile, AppError> {
    state
        .store
        .candidate(id)
        .await?
        .as_ref()
        .map(Into::into)
        .ok_or_else(|| AppError::NotFound(format!("candidate {id}")))
}

async fn load_job(state: &AppState, id: Uuid) -> Result<JobPosting, AppError> {
    state
        .store
        .job(id)
        .await?
        .as_ref()
        .map(Into::into)
        .ok_or_else(|| AppError::NotFound(format!("job {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_blocking_returns_result() {
        let value = run_blocking("sum", || (1..=4).sum::<u32>()).await.unwrap();
        assert_eq!(value, 10);
    }

    #[tokio::test]
    async fn test_run_blocking_maps_panic_to_internal_error() {
        let result: Result<(), AppError> =
            run_blocking("job ranking", || panic!("scorer blew up")).await;
        match result {
            Err(AppError::Internal(e)) => assert!(e.to_string().contains("job ranking")),
            other => panic!("expected internal error, got {other:?}"),
        }
    }
}
