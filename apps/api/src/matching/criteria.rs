//! Criterion scorers. Each one reads the normalized candidate and job and nothing else;
//! none of them looks at another criterion's result.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::matching::availability::{
    classify_availability, score_availability, AvailabilityClass, AVAILABILITY_MAX,
};
use crate::matching::profile::{CandidateProfile, CareerPreference, JobPosting};

pub const SPECIALIZATION_MAX: u32 = 90;
pub const EXPERIENCE_MAX: u32 = 100;
pub const EDUCATION_MAX: u32 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Match,
    Gap,
    Mismatch,
}

impl MatchStatus {
    /// 70% of the criterion ceiling or more is a match, anything above zero a gap.
    pub fn from_score(score: u32, max_score: u32) -> Self {
        if max_score > 0 && score * 10 >= max_score * 7 {
            MatchStatus::Match
        } else if score > 0 {
            MatchStatus::Gap
        } else {
            MatchStatus::Mismatch
        }
    }
}

/// A numeric criterion result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionScore {
    pub score: u32,
    pub max_score: u32,
    pub status: MatchStatus,
    pub feedback: String,
}

impl CriterionScore {
    fn new(score: u32, max_score: u32, feedback: String) -> Self {
        Self {
            score,
            max_score,
            status: MatchStatus::from_score(score, max_score),
            feedback,
        }
    }
}

/// A criterion that only contributes to the explanation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionVerdict {
    pub status: MatchStatus,
    pub feedback: String,
}

/// Every criterion evaluated for one (candidate, job) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaEvaluation {
    pub specialization: CriterionScore,
    pub experience: CriterionScore,
    pub education: CriterionScore,
    pub availability: CriterionScore,
    pub location: CriterionVerdict,
    pub job_type: CriterionVerdict,
    pub career_fit: CriterionVerdict,
}

pub fn evaluate_criteria(
    candidate: &CandidateProfile,
    job: &JobPosting,
    today: NaiveDate,
) -> CriteriaEvaluation {
    CriteriaEvaluation {
        specialization: score_specialization(candidate, job),
        experience: score_experience(candidate, job),
        education: score_education(candidate, job),
        availability: score_candidate_availability(candidate, job, today),
        location: evaluate_location(candidate, job),
        job_type: evaluate_job_type(candidate, job),
        career_fit: evaluate_career_fit(candidate, job),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Hard qualifications
// ────────────────────────────────────────────────────────────────────────────

/// Candidate specialization contained in the job title or category, case-insensitive.
pub fn specialization_matches(candidate: &CandidateProfile, job: &JobPosting) -> bool {
    let needle = candidate.specialization.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }
    job.title.to_lowercase().contains(&needle) || job.category.to_lowercase().contains(&needle)
}

pub fn score_specialization(candidate: &CandidateProfile, job: &JobPosting) -> CriterionScore {
    if candidate.specialization.is_empty() {
        return CriterionScore::new(
            0,
            SPECIALIZATION_MAX,
            "No specialization on the candidate profile.".to_string(),
        );
    }

    if specialization_matches(candidate, job) {
        CriterionScore::new(
            SPECIALIZATION_MAX,
            SPECIALIZATION_MAX,
            format!(
                "Specialization '{}' matches the position '{}'.",
                candidate.specialization, job.title
            ),
        )
    } else {
        CriterionScore::new(
            0,
            SPECIALIZATION_MAX,
            format!(
                "Specialization '{}' does not appear in the job title or category.",
                candidate.specialization
            ),
        )
    }
}

/// Presence-based: any recorded experience scores the full 100.
pub fn score_experience(candidate: &CandidateProfile, job: &JobPosting) -> CriterionScore {
    let entries = &candidate.experience;
    if entries.is_empty() {
        return CriterionScore::new(
            0,
            EXPERIENCE_MAX,
            "No professional experience recorded.".to_string(),
        );
    }

    let total_years: f64 = entries.iter().map(|e| e.years).sum();
    let mut feedback = format!(
        "{} recorded position{}, {:.1} years in total.",
        entries.len(),
        if entries.len() == 1 { "" } else { "s" },
        total_years
    );
    if has_related_title(candidate, job) {
        feedback.push_str(" Includes a role closely related to this position.");
    }

    CriterionScore::new(EXPERIENCE_MAX, EXPERIENCE_MAX, feedback)
}

fn has_related_title(candidate: &CandidateProfile, job: &JobPosting) -> bool {
    let job_title = job.title.to_lowercase();
    if job_title.is_empty() {
        return false;
    }
    candidate
        .previous_job_titles
        .iter()
        .map(String::as_str)
        .chain(candidate.experience.iter().map(|e| e.title.as_str()))
        .map(|t| t.trim().to_lowercase())
        .any(|t| !t.is_empty() && job_title.contains(&t))
}

pub fn score_education(candidate: &CandidateProfile, job: &JobPosting) -> CriterionScore {
    let count = candidate.education.len();
    if count == 0 {
        let mut feedback = "No education recorded.".to_string();
        if !job.education.is_empty() {
            feedback.push_str(&format!(" The posting asks for: {}.", job.education.join(", ")));
        }
        return CriterionScore::new(0, EDUCATION_MAX, feedback);
    }

    CriterionScore::new(
        EDUCATION_MAX,
        EDUCATION_MAX,
        format!(
            "{} education entr{} recorded.",
            count,
            if count == 1 { "y" } else { "ies" }
        ),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Logistics
// ────────────────────────────────────────────────────────────────────────────

pub fn score_candidate_availability(
    candidate: &CandidateProfile,
    job: &JobPosting,
    today: NaiveDate,
) -> CriterionScore {
    let score = score_availability(&candidate.availability, &job.start_date, today);
    let when = job.start_date.describe();

    let feedback = match classify_availability(&candidate.availability) {
        AvailabilityClass::Unclassified if candidate.availability.is_empty() => {
            "Availability not provided.".to_string()
        }
        AvailabilityClass::Unclassified => format!(
            "Availability '{}' could not be compared with {when}.",
            candidate.availability
        ),
        AvailabilityClass::Immediate if score == AVAILABILITY_MAX => {
            format!("Available immediately, fits {when}.")
        }
        AvailabilityClass::Immediate => {
            format!("Available immediately, earlier than {when}.")
        }
        AvailabilityClass::OneMonth if score > 0 => {
            format!("Available within a month, {when} may need some coordination.")
        }
        AvailabilityClass::OneMonth => {
            format!("Available within a month, which does not line up with {when}.")
        }
    };

    CriterionScore::new(score, AVAILABILITY_MAX, feedback)
}

const ANYWHERE_TOKENS: &[&str] = &["anywhere", "any", "כל הארץ"];
const REMOTE_TOKENS: &[&str] = &["remote", "מרחוק"];

fn place_tokens(value: &str) -> Vec<&str> {
    value
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Every place-name token of `inner` appears as a whole token of `outer`.
fn contains_place(outer: &str, inner: &str) -> bool {
    let outer_tokens = place_tokens(outer);
    let inner_tokens = place_tokens(inner);
    !inner_tokens.is_empty() && inner_tokens.iter().all(|t| outer_tokens.contains(t))
}

fn location_matches(preferred: &str, job_location: &str) -> bool {
    if ANYWHERE_TOKENS.contains(&preferred) {
        return true;
    }
    if REMOTE_TOKENS.contains(&preferred) {
        return REMOTE_TOKENS.iter().any(|t| job_location.contains(t));
    }
    job_location.contains(preferred) || contains_place(preferred, job_location)
}

pub fn evaluate_location(candidate: &CandidateProfile, job: &JobPosting) -> CriterionVerdict {
    let preferred: Vec<String> = candidate
        .preferred_locations
        .iter()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect();

    if preferred.is_empty() {
        return CriterionVerdict {
            status: MatchStatus::Match,
            feedback: "No location preference.".to_string(),
        };
    }

    let job_location = job.location.trim().to_lowercase();
    if job_location.is_empty() {
        return CriterionVerdict {
            status: MatchStatus::Gap,
            feedback: "The posting does not state a location.".to_string(),
        };
    }

    let matched = preferred.iter().any(|l| location_matches(l, &job_location));

    if matched {
        CriterionVerdict {
            status: MatchStatus::Match,
            feedback: format!("{} is one of the preferred locations.", job.location),
        }
    } else {
        CriterionVerdict {
            status: MatchStatus::Mismatch,
            feedback: format!(
                "{} is outside the preferred locations ({}).",
                job.location,
                candidate.preferred_locations.join(", ")
            ),
        }
    }
}

fn job_type_token(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c.is_whitespace() { '_' } else { c })
        .collect()
}

pub fn evaluate_job_type(candidate: &CandidateProfile, job: &JobPosting) -> CriterionVerdict {
    if candidate.preferred_job_types.is_empty() {
        return CriterionVerdict {
            status: MatchStatus::Gap,
            feedback: "No preferred employment type recorded.".to_string(),
        };
    }

    let wanted = job_type_token(&job.employment_type);
    if wanted.is_empty() {
        return CriterionVerdict {
            status: MatchStatus::Gap,
            feedback: "The posting does not state an employment type.".to_string(),
        };
    }

    if candidate
        .preferred_job_types
        .iter()
        .any(|t| job_type_token(t) == wanted)
    {
        CriterionVerdict {
            status: MatchStatus::Match,
            feedback: format!("{} is a preferred employment type.", job.employment_type),
        }
    } else {
        CriterionVerdict {
            status: MatchStatus::Gap,
            feedback: format!(
                "{} is not among the preferred employment types ({}).",
                job.employment_type,
                candidate.preferred_job_types.join(", ")
            ),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Career stage
// ────────────────────────────────────────────────────────────────────────────

pub fn evaluate_career_fit(candidate: &CandidateProfile, job: &JobPosting) -> CriterionVerdict {
    let matched = specialization_matches(candidate, job);
    let (status, feedback) = match (candidate.career_preference, matched) {
        (CareerPreference::ContinueInField, true) => (
            MatchStatus::Match,
            "Continues in the current field, and this role is in that field.",
        ),
        (CareerPreference::ContinueInField, false) => (
            MatchStatus::Mismatch,
            "Prefers to stay in the current field, and this role is outside it.",
        ),
        (CareerPreference::OpenToChange, true) => (
            MatchStatus::Match,
            "Open to new directions; this role is also in the current field.",
        ),
        (CareerPreference::OpenToChange, false) => (
            MatchStatus::Gap,
            "Open to new directions; this role would be a change of field.",
        ),
        (CareerPreference::Unspecified, true) => (
            MatchStatus::Match,
            "Role is in the candidate's field.",
        ),
        (CareerPreference::Unspecified, false) => (
            MatchStatus::Mismatch,
            "Role is outside the candidate's field and no openness to change was stated.",
        ),
    };

    CriterionVerdict {
        status,
        feedback: feedback.to_string(),
    }
}

/// Softens a specialization mismatch to a gap for candidates open to a new direction.
/// Only status and feedback change; the numeric score is left alone.
pub fn apply_career_stage(
    specialization: &CriterionScore,
    candidate: &CandidateProfile,
) -> CriterionVerdict {
    let softened = specialization.status == MatchStatus::Mismatch
        && !candidate.specialization.is_empty()
        && candidate.career_preference == CareerPreference::OpenToChange;

    if softened {
        CriterionVerdict {
            status: MatchStatus::Gap,
            feedback: format!(
                "{} Open to new directions, so this is treated as a gap.",
                specialization.feedback
            ),
        }
    } else {
        let reinforced = specialization.status == MatchStatus::Match
            && candidate.career_preference == CareerPreference::ContinueInField;
        let mut feedback = specialization.feedback.clone();
        if reinforced {
            feedback.push_str(" Matches the wish to continue in this field.");
        }
        CriterionVerdict {
            status: specialization.status,
            feedback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::availability::StartDate;
    use crate::matching::profile::{EducationEntry, ExperienceEntry};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn candidate() -> CandidateProfile {
        CandidateProfile {
            id: None,
            specialization: "אבטחת מידע".to_string(),
            previous_job_titles: vec![],
            experience: vec![ExperienceEntry {
                title: "אנליסט SOC".to_string(),
                description: String::new(),
                years: 3.0,
            }],
            education: vec![EducationEntry {
                degree: "B.Sc".to_string(),
                field: "מדעי המחשב".to_string(),
            }],
            skills: vec!["SIEM".to_string()],
            character_traits: vec![],
            availability: "מיידית".to_string(),
            preferred_locations: vec![],
            preferred_job_types: vec![],
            career_preference: CareerPreference::Unspecified,
            updated_at: None,
        }
    }

    fn job() -> JobPosting {
        JobPosting {
            id: None,
            title: "מומחה/ית אבטחת מידע - צוות הגנה".to_string(),
            description: String::new(),
            category: "סייבר".to_string(),
            location: "תל אביב".to_string(),
            requirements: vec![],
            education: vec![],
            certifications: vec![],
            perks: vec![],
            employment_type: "full_time".to_string(),
            start_date: StartDate::Flexible,
            updated_at: None,
        }
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(MatchStatus::from_score(100, 100), MatchStatus::Match);
        assert_eq!(MatchStatus::from_score(70, 100), MatchStatus::Match);
        assert_eq!(MatchStatus::from_score(69, 100), MatchStatus::Gap);
        assert_eq!(MatchStatus::from_score(1, 100), MatchStatus::Gap);
        assert_eq!(MatchStatus::from_score(0, 100), MatchStatus::Mismatch);
        assert_eq!(MatchStatus::from_score(70, 70), MatchStatus::Match);
    }

    #[test]
    fn test_specialization_containment() {
        let s = score_specialization(&candidate(), &job());
        assert_eq!(s.score, 90);
        assert_eq!(s.status, MatchStatus::Match);
    }

    #[test]
    fn test_specialization_matches_category_case_insensitive() {
        let mut c = candidate();
        c.specialization = "DevOps".to_string();
        let mut j = job();
        j.title = "Platform Engineer".to_string();
        j.category = "Cloud & devops".to_string();
        assert_eq!(score_specialization(&c, &j).score, 90);
    }

    #[test]
    fn test_specialization_only_candidate_in_job() {
        let mut c = candidate();
        c.specialization = "Senior Backend Engineer".to_string();
        let mut j = job();
        j.title = "Backend".to_string();
        j.category = String::new();
        assert_eq!(score_specialization(&c, &j).score, 0);
    }

    #[test]
    fn test_empty_specialization_is_mismatch_even_when_open_to_change() {
        let mut c = candidate();
        c.specialization = String::new();
        c.career_preference = CareerPreference::OpenToChange;
        let s = score_specialization(&c, &job());
        assert_eq!(s.score, 0);
        assert_eq!(s.status, MatchStatus::Mismatch);
        assert_eq!(apply_career_stage(&s, &c).status, MatchStatus::Mismatch);
    }

    #[test]
    fn test_open_to_change_softens_mismatch() {
        let mut c = candidate();
        c.specialization = "שיווק".to_string();
        c.career_preference = CareerPreference::OpenToChange;
        let s = score_specialization(&c, &job());
        assert_eq!(s.score, 0);
        assert_eq!(apply_career_stage(&s, &c).status, MatchStatus::Gap);
        assert_eq!(evaluate_career_fit(&c, &job()).status, MatchStatus::Gap);
    }

    #[test]
    fn test_continue_in_field_reinforces_match() {
        let mut c = candidate();
        c.career_preference = CareerPreference::ContinueInField;
        let s = score_specialization(&c, &job());
        let adjusted = apply_career_stage(&s, &c);
        assert_eq!(adjusted.status, MatchStatus::Match);
        assert!(adjusted.feedback.contains("continue"));
        assert_eq!(evaluate_career_fit(&c, &job()).status, MatchStatus::Match);
    }

    #[test]
    fn test_experience_and_education_presence() {
        let c = candidate();
        assert_eq!(score_experience(&c, &job()).score, 100);
        assert_eq!(score_education(&c, &job()).score, 70);
        assert_eq!(score_education(&c, &job()).status, MatchStatus::Match);

        let mut empty = candidate();
        empty.experience.clear();
        empty.education.clear();
        let exp = score_experience(&empty, &job());
        assert_eq!((exp.score, exp.status), (0, MatchStatus::Mismatch));
        assert_eq!(score_education(&empty, &job()).score, 0);
    }

    #[test]
    fn test_experience_mentions_related_title() {
        let mut c = candidate();
        c.previous_job_titles = vec!["מומחה/ית אבטחת מידע".to_string()];
        assert!(score_experience(&c, &job()).feedback.contains("closely related"));
    }

    #[test]
    fn test_availability_status_from_score() {
        let mut c = candidate();
        let mut j = job();
        j.start_date = StartDate::OneToTwoMonths;
        let a = score_candidate_availability(&c, &j, today());
        assert_eq!((a.score, a.status), (70, MatchStatus::Match));

        c.availability = "one_month".to_string();
        let a = score_candidate_availability(&c, &j, today());
        assert_eq!((a.score, a.status), (0, MatchStatus::Mismatch));
    }

    #[test]
    fn test_location() {
        let mut c = candidate();
        assert_eq!(evaluate_location(&c, &job()).status, MatchStatus::Match);

        c.preferred_locations = vec!["תל אביב".to_string(), "חיפה".to_string()];
        assert_eq!(evaluate_location(&c, &job()).status, MatchStatus::Match);

        c.preferred_locations = vec!["באר שבע".to_string()];
        assert_eq!(evaluate_location(&c, &job()).status, MatchStatus::Mismatch);

        c.preferred_locations = vec!["כל הארץ".to_string()];
        assert_eq!(evaluate_location(&c, &job()).status, MatchStatus::Match);
    }

    #[test]
    fn test_remote_preference_needs_remote_job() {
        let mut c = candidate();
        c.preferred_locations = vec!["Remote".to_string()];
        let mut j = job();
        j.location = "Haifa".to_string();
        assert_eq!(evaluate_location(&c, &j).status, MatchStatus::Mismatch);

        j.location = "Remote (Israel)".to_string();
        assert_eq!(evaluate_location(&c, &j).status, MatchStatus::Match);

        c.preferred_locations = vec!["מרחוק".to_string()];
        j.location = "תל אביב".to_string();
        assert_eq!(evaluate_location(&c, &j).status, MatchStatus::Mismatch);
    }

    #[test]
    fn test_short_job_location_needs_whole_place_name() {
        let mut c = candidate();
        c.preferred_locations = vec!["Tel Aviv".to_string()];
        let mut j = job();
        j.location = "a".to_string();
        assert_eq!(evaluate_location(&c, &j).status, MatchStatus::Mismatch);

        j.location = "Aviv".to_string();
        assert_eq!(evaluate_location(&c, &j).status, MatchStatus::Match);

        c.preferred_locations = vec!["Tel Aviv-Yafo".to_string()];
        j.location = "Tel Aviv".to_string();
        assert_eq!(evaluate_location(&c, &j).status, MatchStatus::Match);
    }

    #[test]
    fn test_career_fit_all_arms() {
        let cases = [
            (CareerPreference::ContinueInField, "אבטחת מידע", MatchStatus::Match),
            (CareerPreference::ContinueInField, "שיווק", MatchStatus::Mismatch),
            (CareerPreference::OpenToChange, "אבטחת מידע", MatchStatus::Match),
            (CareerPreference::OpenToChange, "שיווק", MatchStatus::Gap),
            (CareerPreference::Unspecified, "אבטחת מידע", MatchStatus::Match),
            (CareerPreference::Unspecified, "שיווק", MatchStatus::Mismatch),
        ];
        for (preference, specialization, expected) in cases {
            let mut c = candidate();
            c.career_preference = preference;
            c.specialization = specialization.to_string();
            assert_eq!(
                evaluate_career_fit(&c, &job()).status,
                expected,
                "{preference:?} / {specialization}"
            );
        }
    }

    #[test]
    fn test_job_type() {
        let mut c = candidate();
        let empty = evaluate_job_type(&c, &job());
        assert_eq!(empty.status, MatchStatus::Gap);
        assert_eq!(empty.feedback, "No preferred employment type recorded.");

        c.preferred_job_types = vec!["Full-Time".to_string()];
        assert_eq!(evaluate_job_type(&c, &job()).status, MatchStatus::Match);

        c.preferred_job_types = vec!["part_time".to_string()];
        assert_eq!(evaluate_job_type(&c, &job()).status, MatchStatus::Gap);
    }
}
