use grade_predictor::course::{assign_grades, load_course_sheet, load_final_grades};
use grade_predictor::grading::{GradingScheme, PredictionStatus, compute_total, predict};
use grade_predictor::roster::{ScoreUpdate, apply_updates, load_roster, write_roster_csv};
use grade_predictor::validate::validate_roster;
use std::path::Path;

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_full_roster_from_csv() {
    let components = load_roster(&fixture("cs101.csv")).expect("Failed to load roster");
    assert!(validate_roster(&components).is_valid());

    let total = compute_total(&components);
    assert_close(total.total_score, 86.5);
    assert_close(total.point_grade, 8.65);

    let prediction = predict(&components, 8.0);
    assert_eq!(prediction.status, PredictionStatus::Complete);
    assert!(prediction.is_achievable);
    assert_eq!(prediction.required_marks, 0.0);

    let prediction = predict(&components, 9.0);
    assert!(!prediction.is_achievable);
}

#[test]
fn test_partial_roster_from_json() {
    let components = load_roster(&fixture("phy150_partial.json")).expect("Failed to load roster");

    let prediction = predict(&components, 8.0);
    assert_close(prediction.current_total, 54.25);
    assert_close(prediction.remaining_percentage, 35.0);
    assert_close(prediction.required_marks, 73.57);
    assert!(prediction.is_achievable);

    let prediction = predict(&components, 10.0);
    assert_close(prediction.required_marks, 130.71);
    assert!(!prediction.is_achievable);
    assert_eq!(prediction.status, PredictionStatus::OutOfReach);
}

#[test]
fn test_update_then_recompute() {
    let components = load_roster(&fixture("phy150_partial.json")).unwrap();
    let updates = vec![ScoreUpdate::parse("Final Exam=80").unwrap()];

    let updated = apply_updates(&components, &updates).unwrap();
    let total = compute_total(&updated);
    assert_close(total.total_score, 82.25);
    assert_close(total.graded_weight, 100.0);

    let path = std::env::temp_dir().join("grade_predictor_test_updated_roster.csv");
    write_roster_csv(&path, &updated).unwrap();
    let reloaded = load_roster(&path).unwrap();
    assert_eq!(reloaded, updated);
    std::fs::remove_file(&path).unwrap();

    // the loaded roster is untouched
    assert_eq!(compute_total(&components).graded_weight, 65.0);
}

#[test]
fn test_course_grade_assignment() {
    let sheet = load_course_sheet(&fixture("cs101_course.csv")).unwrap();
    let finals = load_final_grades(&fixture("cs101_finals.csv")).unwrap();

    let grades = assign_grades(&sheet, GradingScheme::Linear, &finals).unwrap();
    assert_eq!(grades.students.len(), 3);

    let jules = grades
        .students
        .iter()
        .find(|s| s.roll_number == "CS21B002")
        .unwrap();
    assert_close(jules.total_score, 37.0);
    assert_close(jules.point_grade, 3.7);
    assert_eq!(jules.current_grade, 5.5);

    assert_eq!(grades.summary.students, 3);
    assert_eq!(grades.summary.overrides, 1);
    assert_close(grades.summary.mean_total, 72.27);
    assert_close(grades.summary.mean_grade, 7.83);

    assert!(assign_grades(&sheet, GradingScheme::Gaussian, &finals).is_err());
}
