//! Match engine — runs the criterion scorers, aggregates them into the final score and
//! assembles the breakdown. Pure and deterministic given `today`.

use std::fmt;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::matching::breakdown::{breakdown_from, Breakdown};
use crate::matching::criteria::evaluate_criteria;
use crate::matching::profile::{
    CandidateProfile, JobPosting, RawCandidateProfile, RawJobPosting,
};
use crate::matching::visibility::is_visible_on_dashboard;
use crate::matching::weights::{bottom_part_score, final_score_percent, top_part_score};

/// Caller-contract violations. Data-quality problems never end up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("candidate profile is required")]
    MissingCandidate,

    #[error("job posting is required")]
    MissingJob,
}

/// Raw criterion scores, each on its own scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScores {
    pub specialization: u32,
    pub experience: u32,
    pub education: u32,
    pub availability: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    pub total_score: u8,
    pub top_part_score: f64,
    pub bottom_part_score: f64,
    pub scores: SubScores,
    pub breakdown: Breakdown,
}

pub fn compute_match(
    candidate: &CandidateProfile,
    job: &JobPosting,
    today: NaiveDate,
) -> MatchBreakdown {
    let eval = evaluate_criteria(candidate, job, today);

    let scores = SubScores {
        specialization: eval.specialization.score,
        experience: eval.experience.score,
        education: eval.education.score,
        availability: eval.availability.score,
    };
    let top_part = top_part_score(scores.specialization, scores.experience, scores.education);
    let bottom_part = bottom_part_score(scores.availability);

    MatchBreakdown {
        total_score: final_score_percent(top_part, bottom_part),
        top_part_score: top_part,
        bottom_part_score: bottom_part,
        scores,
        breakdown: breakdown_from(candidate, &eval),
    }
}

pub fn compute_match_score(
    candidate: &CandidateProfile,
    job: &JobPosting,
    today: NaiveDate,
) -> u8 {
    compute_match(candidate, job, today).total_score
}

/// Entry point for callers holding loosely-shaped records. A missing side is an upstream
/// bug and is rejected rather than scored as zero.
pub fn compute_match_checked(
    candidate: Option<&RawCandidateProfile>,
    job: Option<&RawJobPosting>,
    today: NaiveDate,
) -> Result<MatchBreakdown, MatchError> {
    let candidate = candidate.ok_or(MatchError::MissingCandidate)?;
    let job = job.ok_or(MatchError::MissingJob)?;
    Ok(compute_match(&candidate.into(), &job.into(), today))
}

// ────────────────────────────────────────────────────────────────────────────
// Batch ranking
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RankedJob<'a> {
    pub job: &'a JobPosting,
    pub total_score: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate<'a> {
    pub candidate: &'a CandidateProfile,
    pub total_score: u8,
}

/// Jobs that pass the visibility gate, best first; equal scores keep input order.
pub fn rank_jobs<'a>(
    candidate: &CandidateProfile,
    jobs: &'a [JobPosting],
    today: NaiveDate,
) -> Vec<RankedJob<'a>> {
    let ranked = rank_visible(jobs, |job| compute_match_score(candidate, job, today));
    debug!(
        candidate_id = ?candidate.id,
        evaluated = jobs.len(),
        visible = ranked.len(),
        "Ranked jobs for candidate"
    );
    ranked
        .into_iter()
        .map(|(idx, total_score)| RankedJob {
            job: &jobs[idx],
            total_score,
        })
        .collect()
}

/// Candidates that would see this job on their dashboard, best first.
pub fn rank_candidates<'a>(
    job: &JobPosting,
    candidates: &'a [CandidateProfile],
    today: NaiveDate,
) -> Vec<RankedCandidate<'a>> {
    let ranked = rank_visible(candidates, |candidate| {
        compute_match_score(candidate, job, today)
    });
    debug!(
        job_id = ?job.id,
        evaluated = candidates.len(),
        visible = ranked.len(),
        "Ranked candidates for job"
    );
    ranked
        .into_iter()
        .map(|(idx, total_score)| RankedCandidate {
            candidate: &candidates[idx],
            total_score,
        })
        .collect()
}

/// Scores every item in parallel and returns `(index, score)` for the visible ones,
/// sorted by score descending then index ascending.
fn rank_visible<T, F>(items: &[T], score: F) -> Vec<(usize, u8)>
where
    T: Sync,
    F: Fn(&T) -> u8 + Sync,
{
    let mut scored: Vec<(usize, u8)> = items
        .par_iter()
        .enumerate()
        .map(|(idx, item)| (idx, score(item)))
        .filter(|(_, s)| is_visible_on_dashboard(*s))
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    scored
}

// ────────────────────────────────────────────────────────────────────────────
// Cache key
// ────────────────────────────────────────────────────────────────────────────

/// Identity of a computed breakdown for callers that cache it. Any change to either
/// record's modification marker yields a different key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchCacheKey {
    pub candidate_id: Uuid,
    pub candidate_version: i64,
    pub job_id: Uuid,
    pub job_version: i64,
}

impl MatchCacheKey {
    /// `None` when either record has no id.
    pub fn for_pair(candidate: &CandidateProfile, job: &JobPosting) -> Option<Self> {
        Some(Self {
            candidate_id: candidate.id?,
            candidate_version: candidate.updated_at.map_or(0, |t| t.timestamp_millis()),
            job_id: job.id?,
            job_version: job.updated_at.map_or(0, |t| t.timestamp_millis()),
        })
    }
}

impl fmt::Display for MatchCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "match:{}@{}:{}@{}",
            self.candidate_id, self.candidate_version, self.job_id, self.job_version
        )
    }
}
