//! Visibility gate — decides whether a scored job reaches a candidate's dashboard.

/// Jobs scoring below this percentage are left off a candidate's dashboard.
pub const VISIBILITY_THRESHOLD: u8 = 60;

pub fn is_visible_on_dashboard(final_score_percent: u8) -> bool {
    final_score_percent >= VISIBILITY_THRESHOLD
}
