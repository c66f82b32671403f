//! Grade aggregation and target-grade prediction.
//!
//! [`aggregate`] reduces a roster of weighted components to a total score
//! and point grade. [`predict`] solves the other direction: what average the
//! ungraded components must reach for a chosen target grade. Both are pure
//! functions of their input.

pub mod aggregate;
pub mod predict;
pub mod scheme;
pub mod types;
pub mod utility;

pub use aggregate::{breakdown, compute_total, compute_total_with};
pub use predict::{predict, predict_with, solve_required};
pub use scheme::{GradeScheme, GradingScheme, LinearScheme};
pub use types::{ComponentContribution, PredictionResult, PredictionStatus, WeightedTotal};
