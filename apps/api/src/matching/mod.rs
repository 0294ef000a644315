// Candidate–job match scoring.
// Normalization happens once at the boundary (profile); scorers, weights, breakdown and
// the visibility gate are pure functions over the normalized records.

pub mod availability;
pub mod breakdown;
pub mod criteria;
pub mod engine;
pub mod handlers;
pub mod normalize;
pub mod profile;
pub mod store;
pub mod visibility;
pub mod weights;
