//! Output formatting and persistence for grading results.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fmt::Debug;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::{debug, info};

use crate::grading::scheme::GradingScheme;
use crate::grading::types::{PredictionResult, WeightedTotal};
use crate::roster::Enrollment;

/// A flat, CSV-friendly row describing one computation for one enrollment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeRecord {
    pub timestamp: DateTime<Utc>,
    pub roll_number: Option<String>,
    pub course_code: Option<String>,
    pub scheme: GradingScheme,

    // aggregate
    pub total_score: Option<f64>,
    pub point_grade: Option<f64>,
    pub graded_weight: Option<f64>,

    // prediction
    pub target_grade: Option<f64>,
    pub current_total: Option<f64>,
    pub remaining_percentage: Option<f64>,
    pub required_marks: Option<f64>,
    pub is_achievable: Option<bool>,
    pub status: Option<String>,
}

impl GradeRecord {
    fn empty(scheme: GradingScheme) -> Self {
        GradeRecord {
            timestamp: Utc::now(),
            roll_number: None,
            course_code: None,
            scheme,
            total_score: None,
            point_grade: None,
            graded_weight: None,
            target_grade: None,
            current_total: None,
            remaining_percentage: None,
            required_marks: None,
            is_achievable: None,
            status: None,
        }
    }

    pub fn from_total(total: &WeightedTotal, scheme: GradingScheme) -> Self {
        let mut r = Self::empty(scheme);
        r.total_score = Some(total.total_score);
        r.point_grade = Some(total.point_grade);
        r.graded_weight = Some(total.graded_weight);
        r
    }

    pub fn from_prediction(prediction: &PredictionResult, scheme: GradingScheme) -> Self {
        let mut r = Self::empty(scheme);
        r.target_grade = Some(prediction.target_grade);
        r.current_total = Some(prediction.current_total);
        r.remaining_percentage = Some(prediction.remaining_percentage);
        r.required_marks = Some(prediction.required_marks);
        r.is_achievable = Some(prediction.is_achievable);
        r.status = Some(prediction.status.as_str().to_string());
        r
    }

    pub fn with_enrollment(mut self, enrollment: &Enrollment) -> Self {
        self.roll_number = enrollment.roll_number.clone();
        self.course_code = enrollment.course_code.clone();
        self
    }
}

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends a record as a row to a CSV file.
///
/// Writes headers first when the file is new or empty.
pub fn append_record<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let needs_header = file.metadata()?.len() == 0;
    debug!(path = %path.display(), needs_header, "Appending CSV record");

    let mut writer = WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::types::PredictionStatus;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    fn total() -> WeightedTotal {
        WeightedTotal {
            total_score: 86.5,
            point_grade: 8.65,
            graded_weight: 100.0,
        }
    }

    fn prediction() -> PredictionResult {
        PredictionResult {
            target_grade: 8.5,
            current_total: 65.3,
            remaining_percentage: 35.0,
            required_marks: 56.29,
            is_achievable: true,
            status: PredictionStatus::OnTrack,
        }
    }

    #[test]
    fn test_records_carry_enrollment() {
        let enrollment = Enrollment::new(Some("S001".into()), Some("CS101".into()));
        let record = GradeRecord::from_total(&total(), GradingScheme::Linear)
            .with_enrollment(&enrollment);

        assert_eq!(record.roll_number.as_deref(), Some("S001"));
        assert_eq!(record.course_code.as_deref(), Some("CS101"));
        assert_eq!(record.total_score, Some(86.5));
        assert_eq!(record.required_marks, None);
    }

    #[test]
    fn test_prediction_record() {
        let record = GradeRecord::from_prediction(&prediction(), GradingScheme::Linear);
        assert_eq!(record.status.as_deref(), Some("on_track"));
        assert_eq!(record.is_achievable, Some(true));
        assert_eq!(record.total_score, None);
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&total());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&prediction()).unwrap();
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let path = temp_path("grade_predictor_test_header.csv");
        let _ = fs::remove_file(&path);

        let record = GradeRecord::from_total(&total(), GradingScheme::Linear);
        append_record(&path, &record).unwrap();
        append_record(&path, &record).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.starts_with("timestamp")).count();
        assert_eq!(header_count, 1);
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_writes_header_into_empty_file() {
        let path = temp_path("grade_predictor_test_empty.csv");
        fs::write(&path, "").unwrap();

        let record = GradeRecord::from_total(&total(), GradingScheme::Linear);
        append_record(&path, &record).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("timestamp,"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_serializes_prediction_fields() {
        let path = temp_path("grade_predictor_test_prediction.csv");
        let _ = fs::remove_file(&path);

        let record = GradeRecord::from_prediction(&prediction(), GradingScheme::Linear);
        append_record(&path, &record).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let row = content.lines().nth(1).unwrap();
        assert!(row.contains("linear"));
        assert!(row.contains("56.29"));
        assert!(row.contains("on_track"));

        fs::remove_file(&path).unwrap();
    }
}
