//! Aggregation weights. Hard qualifications form the top part, logistics the bottom part.

use crate::matching::availability::AVAILABILITY_MAX;
use crate::matching::criteria::{EDUCATION_MAX, EXPERIENCE_MAX, SPECIALIZATION_MAX};

#[derive(Debug, Clone, Copy)]
pub struct TopPartWeights {
    pub specialization: f64,
    pub experience: f64,
    pub education: f64,
}

pub const TOP_PART_WEIGHTS: TopPartWeights = TopPartWeights {
    specialization: 0.34,
    experience: 0.22,
    education: 0.11,
};

/// Availability weight inside the bottom part.
pub const AVAILABILITY_WEIGHT: f64 = 0.125;
/// Second factor applied to the bottom part on top of `AVAILABILITY_WEIGHT`.
/// Pending product confirmation; total scores in production depend on it.
pub const BOTTOM_PART_FACTOR: f64 = 0.25;

pub const TOP_PART_SHARE: f64 = 0.75;
pub const BOTTOM_PART_SHARE: f64 = 0.25;

/// Fraction (0–1) of hard-qualification fit, each sub-score taken against its own ceiling.
pub fn top_part_score(specialization: u32, experience: u32, education: u32) -> f64 {
    let w = TOP_PART_WEIGHTS;
    ratio(specialization, SPECIALIZATION_MAX) * w.specialization
        + ratio(experience, EXPERIENCE_MAX) * w.experience
        + ratio(education, EDUCATION_MAX) * w.education
}

pub fn bottom_part_score(availability: u32) -> f64 {
    ratio(availability, AVAILABILITY_MAX) * AVAILABILITY_WEIGHT * BOTTOM_PART_FACTOR
}

/// `0.75 * top + 0.25 * bottom` as a rounded percentage in 0–100.
pub fn final_score_percent(top_part: f64, bottom_part: f64) -> u8 {
    let combined = TOP_PART_SHARE * top_part + BOTTOM_PART_SHARE * bottom_part;
    (combined * 100.0).round().clamp(0.0, 100.0) as u8
}

fn ratio(score: u32, max_score: u32) -> f64 {
    if max_score == 0 {
        return 0.0;
    }
    (score.min(max_score) as f64) / (max_score as f64)
}
