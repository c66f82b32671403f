//! Result types produced by the aggregator and the predictor.

use serde::Serialize;

/// Weighted total of a roster and the point grade derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightedTotal {
    /// Sum of `score * weight / 100` over graded components, 0–100 scale.
    pub total_score: f64,
    /// Grade on the 0–10 scale.
    pub point_grade: f64,
    /// Combined weight of the graded components.
    pub graded_weight: f64,
}

/// How a prediction came out. Lets callers tell "nothing left to grade"
/// apart from "nothing more needed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionStatus {
    /// The required average lies within 0–100.
    OnTrack,
    /// The target is already met by graded work alone.
    AlreadySecured,
    /// The required average is above 100.
    OutOfReach,
    /// No ungraded weight remains; the outcome is fixed.
    Complete,
}

impl PredictionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionStatus::OnTrack => "on_track",
            PredictionStatus::AlreadySecured => "already_secured",
            PredictionStatus::OutOfReach => "out_of_reach",
            PredictionStatus::Complete => "complete",
        }
    }
}

/// What a student needs on the ungraded components to reach a target grade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub target_grade: f64,
    /// Weighted points already earned, 0–100 scale.
    pub current_total: f64,
    /// Combined weight of the ungraded components.
    pub remaining_percentage: f64,
    /// Average score needed across the ungraded components. Zero when the
    /// target is already secured or nothing remains; may exceed 100.
    pub required_marks: f64,
    pub is_achievable: bool,
    pub status: PredictionStatus,
}

/// One row of a roster's score breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentContribution {
    pub name: String,
    pub weight_percent: f64,
    pub score: Option<f64>,
    pub weighted_score: Option<f64>,
}
