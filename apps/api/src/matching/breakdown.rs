//! Breakdown builder — per-criterion status and feedback for the "why this match" panel.
//! Built straight from the criterion results, never from the aggregated score.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::matching::criteria::{
    apply_career_stage, evaluate_criteria, CriteriaEvaluation, CriterionScore, CriterionVerdict,
    MatchStatus,
};
use crate::matching::profile::{CandidateProfile, JobPosting};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKey {
    Specialization,
    ProfessionalExperience,
    Education,
    Availability,
    Location,
    JobType,
    CareerFit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionFeedback {
    pub status: MatchStatus,
    pub feedback: String,
}

impl From<&CriterionScore> for CriterionFeedback {
    fn from(score: &CriterionScore) -> Self {
        Self {
            status: score.status,
            feedback: score.feedback.clone(),
        }
    }
}

impl From<CriterionVerdict> for CriterionFeedback {
    fn from(verdict: CriterionVerdict) -> Self {
        Self {
            status: verdict.status,
            feedback: verdict.feedback,
        }
    }
}

pub type Breakdown = BTreeMap<CriterionKey, CriterionFeedback>;

pub fn build_breakdown(
    candidate: &CandidateProfile,
    job: &JobPosting,
    today: NaiveDate,
) -> Breakdown {
    breakdown_from(candidate, &evaluate_criteria(candidate, job, today))
}

pub(crate) fn breakdown_from(candidate: &CandidateProfile, eval: &CriteriaEvaluation) -> Breakdown {
    let mut breakdown = Breakdown::new();
    breakdown.insert(
        CriterionKey::Specialization,
        apply_career_stage(&eval.specialization, candidate).into(),
    );
    breakdown.insert(CriterionKey::ProfessionalExperience, (&eval.experience).into());
    breakdown.insert(CriterionKey::Education, (&eval.education).into());
    breakdown.insert(CriterionKey::Availability, (&eval.availability).into());
    breakdown.insert(CriterionKey::Location, eval.location.clone().into());
    breakdown.insert(CriterionKey::JobType, eval.job_type.clone().into());
    breakdown.insert(CriterionKey::CareerFit, eval.career_fit.clone().into());
    breakdown
}
