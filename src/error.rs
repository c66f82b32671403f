//! Domain errors raised by validation, scheme resolution and roster updates.
//!
//! The aggregation and prediction functions themselves never fail; these
//! errors come from the layers wrapped around them.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradingError {
    #[error("component weights sum to {sum:.2}%, expected 100%")]
    InvalidWeightSum { sum: f64 },

    #[error("{field} {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("component {0:?} appears more than once")]
    DuplicateComponent(String),

    #[error("roster has no components")]
    EmptyRoster,

    #[error("grading scheme {0:?} is not supported")]
    UnsupportedScheme(String),

    #[error("no component named {0:?}")]
    ComponentNotFound(String),

    #[error("no component scores provided")]
    NoUpdates,
}

impl GradingError {
    pub(crate) fn out_of_range(field: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        GradingError::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        }
    }
}
