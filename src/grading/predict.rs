use tracing::debug;

use crate::error::GradingError;
use crate::grading::scheme::GradingScheme;
use crate::grading::types::{PredictionResult, PredictionStatus};
use crate::grading::utility::{WEIGHT_TOLERANCE, at_least};
use crate::roster::AssessmentComponent;

/// Highest score a single component can be awarded.
const MAX_SCORE: f64 = 100.0;

/// Works out the average score needed on the ungraded components of
/// `components` to finish with `target_grade` (0–10 scale).
pub fn predict(components: &[AssessmentComponent], target_grade: f64) -> PredictionResult {
    let (graded, ungraded): (Vec<&AssessmentComponent>, Vec<&AssessmentComponent>) =
        components.iter().partition(|c| c.is_graded());

    let current_total: f64 = graded.iter().filter_map(|c| c.contribution()).sum();
    let remaining_percentage: f64 = ungraded.iter().map(|c| c.weight_percent).sum();

    debug!(
        graded = graded.len(),
        ungraded = ungraded.len(),
        current_total,
        remaining_percentage,
        target_grade,
        "Predicting required marks"
    );

    solve_required(current_total, remaining_percentage, target_grade)
}

/// Same as [`predict`], refusing schemes that have no implementation.
///
/// The target is mapped onto the 0–100 scale linearly, so a prediction is
/// only meaningful under a scheme that resolves.
///
/// # Errors
///
/// [`GradingError::UnsupportedScheme`] for [`GradingScheme::Gaussian`].
pub fn predict_with(
    components: &[AssessmentComponent],
    target_grade: f64,
    scheme: GradingScheme,
) -> Result<PredictionResult, GradingError> {
    scheme.resolve()?;
    Ok(predict(components, target_grade))
}

/// The inverse-solve step of [`predict`], for callers that already hold the
/// graded total and the remaining weight.
pub fn solve_required(
    current_total: f64,
    remaining_percentage: f64,
    target_grade: f64,
) -> PredictionResult {
    let target_total = target_grade * 10.0;
    let needed = target_total - current_total;

    let (required_marks, is_achievable, status) = if remaining_percentage <= 0.0 {
        let met = at_least(current_total, target_total, WEIGHT_TOLERANCE);
        (0.0, met, PredictionStatus::Complete)
    } else {
        let required = needed * 100.0 / remaining_percentage;
        if required < 0.0 {
            (0.0, true, PredictionStatus::AlreadySecured)
        } else if required <= MAX_SCORE {
            (required, true, PredictionStatus::OnTrack)
        } else {
            (required, false, PredictionStatus::OutOfReach)
        }
    };

    PredictionResult {
        target_grade,
        current_total,
        remaining_percentage,
        required_marks,
        is_achievable,
        status,
    }
}
