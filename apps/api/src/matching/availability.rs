//! Availability — job start-date descriptors, candidate availability classes, and the
//! three-tier availability score.

use chrono::{DateTime, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const AVAILABILITY_MAX: u32 = 100;

/// Start date of a job posting, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StartDate {
    Absent,
    Flexible,
    Immediate,
    OneToTwoWeeks,
    OneToTwoMonths,
    On(NaiveDate),
    Unparseable(String),
}

impl StartDate {
    /// Reads an enumerated token (`flexible`, `immediate`, `1_2_weeks`, `1_2_months`)
    /// or an ISO calendar date / timestamp.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return StartDate::Absent;
        };

        match raw.to_lowercase().as_str() {
            "flexible" => return StartDate::Flexible,
            "immediate" => return StartDate::Immediate,
            "1_2_weeks" => return StartDate::OneToTwoWeeks,
            "1_2_months" => return StartDate::OneToTwoMonths,
            _ => {}
        }

        parse_calendar_date(raw)
            .map(StartDate::On)
            .unwrap_or_else(|| StartDate::Unparseable(raw.to_string()))
    }

    /// Whether the job starts no later than one calendar month after `today`.
    ///
    /// Absent and unparseable values count as within the month.
    pub fn is_within_one_month(&self, today: NaiveDate) -> bool {
        match self {
            StartDate::OneToTwoMonths => false,
            StartDate::On(date) => today
                .checked_add_months(Months::new(1))
                .map_or(true, |limit| *date <= limit),
            StartDate::Absent
            | StartDate::Flexible
            | StartDate::Immediate
            | StartDate::OneToTwoWeeks
            | StartDate::Unparseable(_) => true,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            StartDate::Absent => "no start date".to_string(),
            StartDate::Flexible => "a flexible start date".to_string(),
            StartDate::Immediate => "an immediate start".to_string(),
            StartDate::OneToTwoWeeks => "a start within 1-2 weeks".to_string(),
            StartDate::OneToTwoMonths => "a start within 1-2 months".to_string(),
            StartDate::On(date) => format!("a start on {date}"),
            StartDate::Unparseable(raw) => format!("start date '{raw}'"),
        }
    }
}

fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    // timestamptz::text, e.g. "2027-06-01 00:00:00+00"
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(ts.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|ts| ts.date())
}

pub fn is_date_within_one_month(start_date: &StartDate, today: NaiveDate) -> bool {
    start_date.is_within_one_month(today)
}

/// Bucket a candidate's free-text availability falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityClass {
    Immediate,
    OneMonth,
    Unclassified,
}

const IMMEDIATE_TOKENS: &[&str] = &[
    "immediate",
    "negotiable",
    "flexible",
    "asap",
    "מיידי",
    "מידי",
    "בהקדם",
    "גמיש",
    "בתיאום",
    "לתיאום",
];

const MONTH_TOKENS: &[&str] = &["month", "חודש"];

pub fn classify_availability(text: &str) -> AvailabilityClass {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return AvailabilityClass::Unclassified;
    }
    if IMMEDIATE_TOKENS.iter().any(|t| lower.contains(t)) {
        AvailabilityClass::Immediate
    } else if MONTH_TOKENS.iter().any(|t| lower.contains(t)) {
        AvailabilityClass::OneMonth
    } else {
        AvailabilityClass::Unclassified
    }
}

/// Scores candidate availability against the job start date on a 0–100 scale.
///
/// | candidate  | job within a month | score |
/// |------------|--------------------|-------|
/// | immediate  | yes                | 100   |
/// | immediate  | no                 | 70    |
/// | one month  | yes                | 70    |
/// | one month  | no                 | 0     |
/// | other      | -                  | 0     |
pub fn score_availability(
    candidate_availability: &str,
    start_date: &StartDate,
    today: NaiveDate,
) -> u32 {
    let within_month = is_date_within_one_month(start_date, today);
    match (classify_availability(candidate_availability), within_month) {
        (AvailabilityClass::Immediate, true) => 100,
        (AvailabilityClass::Immediate, false) => 70,
        (AvailabilityClass::OneMonth, true) => 70,
        (AvailabilityClass::OneMonth, false) => 0,
        (AvailabilityClass::Unclassified, _) => 0,
    }
}
