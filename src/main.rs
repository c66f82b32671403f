//! CLI entry point for the grade predictor.
//!
//! Provides subcommands for totalling a student's roster, predicting the
//! marks needed for a target grade, validating and updating rosters, and
//! assigning grades across a whole course.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use grade_predictor::config::PredictorConfig;
use grade_predictor::course::{FinalGrades, assign_grades, load_course_sheet, load_final_grades};
use grade_predictor::grading::{
    GradingScheme, PredictionStatus, breakdown, compute_total_with, predict_with,
};
use grade_predictor::grading::utility::{WEIGHT_TOLERANCE, within};
use grade_predictor::output::{GradeRecord, append_record, print_json, print_pretty};
use grade_predictor::roster::{
    AssessmentComponent, Enrollment, ScoreUpdate, apply_updates, load_roster, write_roster_csv,
};
use grade_predictor::validate::{validate_roster, validate_target};
use serde::Serialize;
use std::ffi::OsStr;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "grade_predictor")]
#[command(about = "Weighted grade totals and target-grade predictions", long_about = None)]
struct Cli {
    /// JSON settings file (see GRADE_* environment variables for overrides)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Identifies whose roster is being processed. Only used to label output.
#[derive(Args, Debug)]
struct EnrollmentArgs {
    /// Student roll number
    #[arg(long)]
    roll_number: Option<String>,

    /// Course code
    #[arg(long)]
    course: Option<String>,
}

impl EnrollmentArgs {
    fn to_enrollment(&self) -> Enrollment {
        Enrollment::new(self.roll_number.clone(), self.course.clone())
    }
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// CSV file to append results to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also log the result as pretty JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the weighted total and point grade of a roster
    Total {
        /// Roster file (.csv or .json)
        #[arg(value_name = "ROSTER")]
        roster: PathBuf,

        /// Grading scheme (linear, gaussian)
        #[arg(long)]
        scheme: Option<GradingScheme>,

        #[command(flatten)]
        enrollment: EnrollmentArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Compute the marks needed on ungraded components for a target grade
    Predict {
        /// Roster file (.csv or .json)
        #[arg(value_name = "ROSTER")]
        roster: PathBuf,

        /// Target grade on the 0-10 scale
        #[arg(short, long)]
        target: Option<f64>,

        /// Grading scheme (linear, gaussian)
        #[arg(long)]
        scheme: Option<GradingScheme>,

        #[command(flatten)]
        enrollment: EnrollmentArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show each component's weighted contribution
    Breakdown {
        /// Roster file (.csv or .json)
        #[arg(value_name = "ROSTER")]
        roster: PathBuf,
    },
    /// Check a roster's weights and scores
    Validate {
        /// Roster file (.csv or .json)
        #[arg(value_name = "ROSTER")]
        roster: PathBuf,
    },
    /// Replace component scores and recompute the total
    Update {
        /// Roster file (.csv or .json)
        #[arg(value_name = "ROSTER")]
        roster: PathBuf,

        /// Score to set, as NAME=SCORE (empty or "-" clears it)
        #[arg(long = "set", value_name = "NAME=SCORE", required = true)]
        updates: Vec<String>,

        /// Write the updated roster to this CSV file
        #[arg(long, value_name = "FILE")]
        write: Option<PathBuf>,

        /// Grading scheme (linear, gaussian)
        #[arg(long)]
        scheme: Option<GradingScheme>,

        #[command(flatten)]
        enrollment: EnrollmentArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Assign grades to every student on a course sheet
    AssignGrades {
        /// Course sheet CSV (roll_number, student_name, component_name, percentage, score)
        #[arg(value_name = "SHEET")]
        sheet: PathBuf,

        /// CSV of instructor-assigned final grades (roll_number, grade)
        #[arg(long, value_name = "FILE")]
        finals: Option<PathBuf>,

        /// Grading scheme (linear, gaussian)
        #[arg(long)]
        scheme: Option<GradingScheme>,

        /// CSV file to append per-student grades to. Its columns differ from
        /// the --output files of the other commands, so keep it separate.
        #[arg(long, value_name = "FILE")]
        grades_output: Option<PathBuf>,

        /// Also log the course grades as pretty JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();
    let config = PredictorConfig::load(cli.config.as_deref())?;
    let _file_guard = init_logging(&config.log_file_path)?;

    match cli.command {
        Commands::Total {
            roster,
            scheme,
            enrollment,
            output,
        } => run_total(
            &config,
            &roster,
            scheme.unwrap_or(config.scheme),
            &enrollment,
            &output,
        ),
        Commands::Predict {
            roster,
            target,
            scheme,
            enrollment,
            output,
        } => run_predict(
            &config,
            &roster,
            target.unwrap_or(config.default_target),
            scheme.unwrap_or(config.scheme),
            &enrollment,
            &output,
        ),
        Commands::Breakdown { roster } => run_breakdown(&roster),
        Commands::Validate { roster } => run_validate(&roster),
        Commands::Update {
            roster,
            updates,
            write,
            scheme,
            enrollment,
            output,
        } => run_update(
            &config,
            &roster,
            &updates,
            write.as_deref(),
            scheme.unwrap_or(config.scheme),
            &enrollment,
            &output,
        ),
        Commands::AssignGrades {
            sheet,
            finals,
            scheme,
            grades_output,
            json,
        } => run_assign_grades(
            &sheet,
            finals.as_deref(),
            scheme.unwrap_or(config.scheme),
            grades_output.as_deref(),
            json,
        ),
    }
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_logging(log_file_path: &str) -> Result<WorkerGuard> {
    let log_dir = Path::new(log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("grade_predictor.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}

/// Loads a roster and runs the validation layer over it. Issues are logged
/// as warnings, or turned into an error in strict mode.
fn load_checked(path: &Path, strict: bool) -> Result<Vec<AssessmentComponent>> {
    let components = load_roster(path)?;
    let report = validate_roster(&components);

    for issue in report.issues() {
        warn!(roster = %path.display(), issue = %issue, "Roster data-quality issue");
    }

    if strict && !report.is_valid() {
        bail!(
            "{} failed validation with {} issue(s)",
            path.display(),
            report.issues().len()
        );
    }

    Ok(components)
}

/// Logs a result and, if requested, appends its record to the output CSV.
fn emit<T: Serialize + Debug>(value: &T, record: GradeRecord, output: &OutputArgs) -> Result<()> {
    print_pretty(value);

    if output.json {
        print_json(value)?;
    }

    if let Some(path) = &output.output {
        append_record(path, &record)
            .with_context(|| format!("failed to append to {}", path.display()))?;
        info!(path = %path.display(), "Result appended");
    }

    Ok(())
}

#[tracing::instrument(skip(config, output), fields(roster = %roster.display(), scheme = %scheme))]
fn run_total(
    config: &PredictorConfig,
    roster: &Path,
    scheme: GradingScheme,
    enrollment: &EnrollmentArgs,
    output: &OutputArgs,
) -> Result<()> {
    let components = load_checked(roster, config.strict)?;
    let total = compute_total_with(&components, scheme.resolve()?.as_ref());

    info!(
        total_score = total.total_score,
        point_grade = total.point_grade,
        graded_weight = total.graded_weight,
        "Weighted total"
    );
    if !within(total.graded_weight, 100.0, WEIGHT_TOLERANCE) {
        info!(
            graded_weight = total.graded_weight,
            "Some components are still ungraded; total is partial"
        );
    }

    let record = GradeRecord::from_total(&total, scheme).with_enrollment(&enrollment.to_enrollment());
    emit(&total, record, output)
}

#[tracing::instrument(skip(config, output), fields(roster = %roster.display(), scheme = %scheme))]
fn run_predict(
    config: &PredictorConfig,
    roster: &Path,
    target: f64,
    scheme: GradingScheme,
    enrollment: &EnrollmentArgs,
    output: &OutputArgs,
) -> Result<()> {
    let target = validate_target(target)?;
    let components = load_checked(roster, config.strict)?;
    let prediction = predict_with(&components, target, scheme)?;

    info!(
        current_total = prediction.current_total,
        remaining_percentage = prediction.remaining_percentage,
        required_marks = prediction.required_marks,
        achievable = prediction.is_achievable,
        status = prediction.status.as_str(),
        "Prediction"
    );
    match prediction.status {
        PredictionStatus::Complete if !prediction.is_achievable => {
            warn!("All components are graded and the target was not reached")
        }
        PredictionStatus::OutOfReach => {
            warn!("Target needs more than full marks on the remaining components")
        }
        _ => {}
    }

    let record = GradeRecord::from_prediction(&prediction, scheme)
        .with_enrollment(&enrollment.to_enrollment());
    emit(&prediction, record, output)
}

#[tracing::instrument(fields(roster = %roster.display()))]
fn run_breakdown(roster: &Path) -> Result<()> {
    let components = load_roster(roster)?;

    for row in breakdown(&components) {
        match (row.score, row.weighted_score) {
            (Some(score), Some(weighted)) => info!(
                component = %row.name,
                weight = row.weight_percent,
                score,
                weighted,
                "Component"
            ),
            _ => info!(
                component = %row.name,
                weight = row.weight_percent,
                "Component (ungraded)"
            ),
        }
    }

    Ok(())
}

#[tracing::instrument(fields(roster = %roster.display()))]
fn run_validate(roster: &Path) -> Result<()> {
    let components = load_roster(roster)?;
    let report = validate_roster(&components);

    if report.is_valid() {
        info!(components = components.len(), "Roster is valid");
        return Ok(());
    }

    for issue in report.issues() {
        warn!(issue = %issue, "Roster data-quality issue");
    }
    bail!(
        "{} failed validation with {} issue(s)",
        roster.display(),
        report.issues().len()
    )
}

#[tracing::instrument(
    skip(config, updates, output),
    fields(roster = %roster.display(), scheme = %scheme, updates = updates.len())
)]
fn run_update(
    config: &PredictorConfig,
    roster: &Path,
    updates: &[String],
    write: Option<&Path>,
    scheme: GradingScheme,
    enrollment: &EnrollmentArgs,
    output: &OutputArgs,
) -> Result<()> {
    let components = load_checked(roster, config.strict)?;
    let updates = updates
        .iter()
        .map(|spec| ScoreUpdate::parse(spec))
        .collect::<Result<Vec<_>>>()?;

    let updated = apply_updates(&components, &updates)?;
    info!(applied = updates.len(), "Component scores updated");

    if let Some(path) = write {
        write_roster_csv(path, &updated)?;
        info!(path = %path.display(), "Updated roster written");
    }

    let total = compute_total_with(&updated, scheme.resolve()?.as_ref());
    info!(
        total_score = total.total_score,
        point_grade = total.point_grade,
        "Recomputed total"
    );

    let record = GradeRecord::from_total(&total, scheme).with_enrollment(&enrollment.to_enrollment());
    emit(&total, record, output)
}

#[tracing::instrument(fields(sheet = %sheet.display(), scheme = %scheme))]
fn run_assign_grades(
    sheet: &Path,
    finals: Option<&Path>,
    scheme: GradingScheme,
    grades_output: Option<&Path>,
    json: bool,
) -> Result<()> {
    let course = load_course_sheet(sheet)?;
    let finals = match finals {
        Some(path) => load_final_grades(path)?,
        None => FinalGrades::default(),
    };

    for student in course.students() {
        let report = validate_roster(&student.components);
        for issue in report.issues() {
            warn!(roll_number = %student.roll_number, issue = %issue, "Roster data-quality issue");
        }
    }

    let grades = assign_grades(&course, scheme, &finals)?;

    for student in &grades.students {
        info!(
            roll_number = %student.roll_number,
            name = %student.student_name,
            total_score = student.total_score,
            current_grade = student.current_grade,
            overridden = student.final_grade.is_some(),
            "Student grade"
        );
    }

    if json {
        print_json(&grades)?;
    }

    if let Some(path) = grades_output {
        for student in &grades.students {
            append_record(path, student)
                .with_context(|| format!("failed to append to {}", path.display()))?;
        }
        info!(path = %path.display(), rows = grades.students.len(), "Grades appended");
    }

    Ok(())
}
