//! Grading schemes: how a 0–100 weighted total becomes a 0–10 point grade.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GradingError;

/// Maps a weighted total on the 0–100 scale to a point grade on 0–10.
pub trait GradeScheme: Send + Sync {
    fn name(&self) -> &'static str;

    fn point_grade(&self, total_score: f64) -> f64;
}

/// `total / 10`, clamped to [0, 10].
#[derive(Debug, Default, Clone, Copy)]
pub struct LinearScheme;

impl GradeScheme for LinearScheme {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn point_grade(&self, total_score: f64) -> f64 {
        (total_score / 10.0).clamp(0.0, 10.0)
    }
}

/// Scheme names a course can be configured with.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradingScheme {
    #[default]
    Linear,
    /// Selectable, but there is no curve defined for it yet, so
    /// [`GradingScheme::resolve`] rejects it.
    Gaussian,
}

impl GradingScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            GradingScheme::Linear => "linear",
            GradingScheme::Gaussian => "gaussian",
        }
    }

    /// Returns the implementation behind this scheme name.
    ///
    /// # Errors
    ///
    /// [`GradingError::UnsupportedScheme`] for [`GradingScheme::Gaussian`].
    pub fn resolve(self) -> Result<Box<dyn GradeScheme>, GradingError> {
        match self {
            GradingScheme::Linear => Ok(Box::new(LinearScheme)),
            GradingScheme::Gaussian => Err(GradingError::UnsupportedScheme(self.as_str().into())),
        }
    }
}

impl fmt::Display for GradingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GradingScheme {
    type Err = GradingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(GradingScheme::Linear),
            "gaussian" => Ok(GradingScheme::Gaussian),
            other => Err(GradingError::UnsupportedScheme(other.to_string())),
        }
    }
}
