//! Optional input checks to run in front of the grading core.
//!
//! The aggregator and predictor accept anything; this layer is where a
//! caller decides whether a roster is trustworthy before showing a result
//! as final.

use std::collections::HashSet;

use crate::error::GradingError;
use crate::grading::utility::{WEIGHT_TOLERANCE, within};
use crate::roster::AssessmentComponent;

const MIN_PERCENT: f64 = 0.0;
const MAX_PERCENT: f64 = 100.0;
const MIN_GRADE: f64 = 0.0;
const MAX_GRADE: f64 = 10.0;

/// Every problem found in one roster.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationReport {
    issues: Vec<GradingError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[GradingError] {
        &self.issues
    }

    /// Returns the first issue as an error, if any.
    pub fn into_result(self) -> Result<(), GradingError> {
        match self.issues.into_iter().next() {
            Some(issue) => Err(issue),
            None => Ok(()),
        }
    }
}

/// Checks a roster for an empty list, duplicate names, out-of-range weights
/// or scores, and a weight sum other than 100 (± 0.01).
pub fn validate_roster(components: &[AssessmentComponent]) -> ValidationReport {
    let mut issues = Vec::new();

    if components.is_empty() {
        issues.push(GradingError::EmptyRoster);
        return ValidationReport { issues };
    }

    let mut seen = HashSet::new();
    for component in components {
        if !seen.insert(component.name.as_str()) {
            issues.push(GradingError::DuplicateComponent(component.name.clone()));
        }

        if !(MIN_PERCENT..=MAX_PERCENT).contains(&component.weight_percent) {
            issues.push(GradingError::out_of_range(
                format!("weight of {:?}", component.name),
                component.weight_percent,
                MIN_PERCENT,
                MAX_PERCENT,
            ));
        }

        if let Some(score) = component.score {
            if !(MIN_PERCENT..=MAX_PERCENT).contains(&score) {
                issues.push(GradingError::out_of_range(
                    format!("score of {:?}", component.name),
                    score,
                    MIN_PERCENT,
                    MAX_PERCENT,
                ));
            }
        }
    }

    let sum: f64 = components.iter().map(|c| c.weight_percent).sum();
    if !within(sum, MAX_PERCENT, WEIGHT_TOLERANCE) {
        issues.push(GradingError::InvalidWeightSum { sum });
    }

    ValidationReport { issues }
}

/// Accepts a target grade in [0, 10].
pub fn validate_target(target_grade: f64) -> Result<f64, GradingError> {
    check_grade("target grade", target_grade)
}

/// Accepts an instructor-assigned final grade in [0, 10].
pub fn validate_final_grade(grade: f64) -> Result<f64, GradingError> {
    check_grade("final grade", grade)
}

fn check_grade(field: &str, grade: f64) -> Result<f64, GradingError> {
    if (MIN_GRADE..=MAX_GRADE).contains(&grade) {
        Ok(grade)
    } else {
        Err(GradingError::out_of_range(field, grade, MIN_GRADE, MAX_GRADE))
    }
}
