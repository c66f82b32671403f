//! Course-wide grade assignment.
//!
//! A course sheet holds every enrolled student's component scores in long
//! format (one row per student and component). Grades are assigned by
//! running the aggregator over each student's roster, with instructor
//! overrides taking precedence.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::GradingError;
use crate::grading::aggregate::compute_total_with;
use crate::grading::scheme::GradingScheme;
use crate::grading::utility::{mean, stddev};
use crate::roster::AssessmentComponent;
use crate::validate::validate_final_grade;

/// A single row of a course sheet CSV.
#[derive(Debug, Deserialize)]
pub struct CourseRow {
    #[serde(alias = "RollNumber")]
    pub roll_number: String,
    #[serde(alias = "Name", alias = "name", default)]
    pub student_name: String,
    #[serde(alias = "ComponentName")]
    pub component_name: String,
    #[serde(alias = "Percentage", alias = "weight_percent")]
    pub percentage: f64,
    #[serde(alias = "Score", default)]
    pub score: Option<f64>,
}

/// One student's roster within a course.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRoster {
    pub roll_number: String,
    pub student_name: String,
    pub components: Vec<AssessmentComponent>,
}

/// All students of one course, ordered by roll number.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CourseSheet {
    students: BTreeMap<String, StudentRoster>,
}

impl CourseSheet {
    pub fn from_rows(rows: impl IntoIterator<Item = CourseRow>) -> Self {
        let mut students: BTreeMap<String, StudentRoster> = BTreeMap::new();

        for row in rows {
            let entry = students
                .entry(row.roll_number.clone())
                .or_insert_with(|| StudentRoster {
                    roll_number: row.roll_number.clone(),
                    student_name: row.student_name.clone(),
                    components: Vec::new(),
                });

            if entry.student_name.is_empty() {
                entry.student_name = row.student_name;
            }

            entry.components.push(AssessmentComponent {
                name: row.component_name,
                weight_percent: row.percentage,
                score: row.score,
            });
        }

        Self { students }
    }

    pub fn students(&self) -> impl Iterator<Item = &StudentRoster> {
        self.students.values()
    }

    pub fn student(&self, roll_number: &str) -> Option<&StudentRoster> {
        self.students.get(roll_number)
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

/// Reads a course sheet from CSV with a header row.
pub fn parse_course_sheet<R: Read>(reader: R) -> Result<CourseSheet> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (line, row) in reader.deserialize::<CourseRow>().enumerate() {
        rows.push(row.with_context(|| format!("invalid course sheet row {}", line + 1))?);
    }

    Ok(CourseSheet::from_rows(rows))
}

pub fn load_course_sheet(path: &Path) -> Result<CourseSheet> {
    let file =
        std::fs::File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let sheet = parse_course_sheet(file)?;
    debug!(path = %path.display(), students = sheet.len(), "Course sheet loaded");
    Ok(sheet)
}

/// Final grades set by an instructor, keyed by roll number.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FinalGrades {
    grades: HashMap<String, f64>,
}

impl FinalGrades {
    /// Records an override. Grades outside [0, 10] are rejected.
    pub fn insert(&mut self, roll_number: impl Into<String>, grade: f64) -> Result<(), GradingError> {
        let grade = validate_final_grade(grade)?;
        self.grades.insert(roll_number.into(), grade);
        Ok(())
    }

    pub fn get(&self, roll_number: &str) -> Option<f64> {
        self.grades.get(roll_number).copied()
    }

    pub fn len(&self) -> usize {
        self.grades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }
}

/// Reads `roll_number,grade` rows of instructor overrides.
pub fn parse_final_grades<R: Read>(reader: R) -> Result<FinalGrades> {
    #[derive(Deserialize)]
    struct FinalGradeRow {
        #[serde(alias = "RollNumber")]
        roll_number: String,
        #[serde(alias = "Grade")]
        grade: f64,
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut finals = FinalGrades::default();
    for result in reader.deserialize::<FinalGradeRow>() {
        let row = result.context("invalid final grade row")?;
        finals
            .insert(&row.roll_number, row.grade)
            .with_context(|| format!("final grade for {}", row.roll_number))?;
    }

    Ok(finals)
}

pub fn load_final_grades(path: &Path) -> Result<FinalGrades> {
    let file =
        std::fs::File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    parse_final_grades(file)
}

/// A student's computed standing in a course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentGrade {
    pub roll_number: String,
    pub student_name: String,
    pub total_score: f64,
    pub point_grade: f64,
    pub final_grade: Option<f64>,
    /// The instructor's final grade if one was assigned, else `point_grade`.
    pub current_grade: f64,
}

/// Aggregate figures across a course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseSummary {
    pub students: usize,
    pub overrides: usize,
    pub mean_total: f64,
    pub stddev_total: f64,
    pub mean_grade: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseGrades {
    pub scheme: GradingScheme,
    pub students: Vec<StudentGrade>,
    pub summary: CourseSummary,
}

/// Assigns a grade to every student on `sheet` under `scheme`.
///
/// # Errors
///
/// [`GradingError::UnsupportedScheme`] if `scheme` has no implementation.
pub fn assign_grades(
    sheet: &CourseSheet,
    scheme: GradingScheme,
    finals: &FinalGrades,
) -> Result<CourseGrades, GradingError> {
    let resolved = scheme.resolve()?;

    let students: Vec<StudentGrade> = sheet
        .students()
        .map(|student| {
            let total = compute_total_with(&student.components, resolved.as_ref());
            let final_grade = finals.get(&student.roll_number);

            StudentGrade {
                roll_number: student.roll_number.clone(),
                student_name: student.student_name.clone(),
                total_score: total.total_score,
                point_grade: total.point_grade,
                final_grade,
                current_grade: final_grade.unwrap_or(total.point_grade),
            }
        })
        .collect();

    let totals: Vec<f64> = students.iter().map(|s| s.total_score).collect();
    let grades: Vec<f64> = students.iter().map(|s| s.current_grade).collect();
    let mean_total = mean(&totals);

    let summary = CourseSummary {
        students: students.len(),
        overrides: students.iter().filter(|s| s.final_grade.is_some()).count(),
        mean_total,
        stddev_total: stddev(&totals, mean_total),
        mean_grade: mean(&grades),
    };

    info!(
        scheme = %scheme,
        students = summary.students,
        overrides = summary.overrides,
        mean_total = summary.mean_total,
        "Course grades assigned"
    );

    Ok(CourseGrades {
        scheme,
        students,
        summary,
    })
}
