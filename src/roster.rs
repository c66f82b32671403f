//! Assessment rosters: the weighted components of one student's enrollment
//! in one course, plus the loaders and the score-update operation.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::error::GradingError;

/// One weighted piece of assessment, e.g. "Midterm Exam" worth 30%.
///
/// `score` is `None` until the component has been graded. An ungraded
/// component is not the same as a graded zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentComponent {
    #[serde(alias = "ComponentName", alias = "component_name")]
    pub name: String,
    #[serde(alias = "Percentage", alias = "percentage")]
    pub weight_percent: f64,
    #[serde(alias = "Score", default)]
    pub score: Option<f64>,
}

impl AssessmentComponent {
    pub fn graded(name: impl Into<String>, weight_percent: f64, score: f64) -> Self {
        Self {
            name: name.into(),
            weight_percent,
            score: Some(score),
        }
    }

    pub fn ungraded(name: impl Into<String>, weight_percent: f64) -> Self {
        Self {
            name: name.into(),
            weight_percent,
            score: None,
        }
    }

    pub fn is_graded(&self) -> bool {
        self.score.is_some()
    }

    /// Points this component adds to the 0–100 total, if graded.
    pub fn contribution(&self) -> Option<f64> {
        self.score.map(|score| score * self.weight_percent / 100.0)
    }
}

/// Who a roster belongs to. Passed explicitly by whoever drives the core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub roll_number: Option<String>,
    pub course_code: Option<String>,
}

impl Enrollment {
    pub fn new(roll_number: Option<String>, course_code: Option<String>) -> Self {
        Self {
            roll_number,
            course_code,
        }
    }
}

/// A replacement score for the component called `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    #[serde(alias = "ComponentName", alias = "component_name")]
    pub name: String,
    #[serde(alias = "Score", default)]
    pub score: Option<f64>,
}

impl ScoreUpdate {
    /// Parses `NAME=SCORE`. An empty or `-` score clears the grade.
    pub fn parse(spec: &str) -> Result<Self> {
        let (name, score) = spec
            .rsplit_once('=')
            .with_context(|| format!("expected NAME=SCORE, got {spec:?}"))?;
        let name = name.trim();
        if name.is_empty() {
            anyhow::bail!("missing component name in {spec:?}");
        }

        let score = match score.trim() {
            "" | "-" => None,
            s => Some(
                s.parse::<f64>()
                    .with_context(|| format!("invalid score {s:?} for {name:?}"))?,
            ),
        };

        Ok(Self {
            name: name.to_string(),
            score,
        })
    }
}

/// Returns a copy of `components` with each update applied by name.
///
/// # Errors
///
/// [`GradingError::NoUpdates`] if `updates` is empty, and
/// [`GradingError::ComponentNotFound`] if an update names no component.
/// Nothing is applied when an error is returned.
pub fn apply_updates(
    components: &[AssessmentComponent],
    updates: &[ScoreUpdate],
) -> Result<Vec<AssessmentComponent>, GradingError> {
    if updates.is_empty() {
        return Err(GradingError::NoUpdates);
    }

    let mut updated = components.to_vec();

    for update in updates {
        let component = updated
            .iter_mut()
            .find(|c| c.name == update.name)
            .ok_or_else(|| GradingError::ComponentNotFound(update.name.clone()))?;

        debug!(
            component = %update.name,
            old = ?component.score,
            new = ?update.score,
            "Applying score update"
        );
        component.score = update.score;
    }

    Ok(updated)
}

/// Reads a roster from CSV with a header row.
pub fn parse_roster_csv<R: Read>(reader: R) -> Result<Vec<AssessmentComponent>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut components = Vec::new();
    for (line, row) in reader.deserialize::<AssessmentComponent>().enumerate() {
        components.push(row.with_context(|| format!("invalid roster row {}", line + 1))?);
    }

    Ok(components)
}

/// Reads a roster from a JSON array of components.
pub fn parse_roster_json(json: &str) -> Result<Vec<AssessmentComponent>> {
    serde_json::from_str(json).context("invalid roster JSON")
}

/// Loads a roster file, choosing JSON or CSV by extension.
pub fn load_roster(path: &Path) -> Result<Vec<AssessmentComponent>> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let components = if is_json {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        parse_roster_json(&content)?
    } else {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        parse_roster_csv(file)?
    };

    debug!(path = %path.display(), components = components.len(), "Roster loaded");
    Ok(components)
}

/// Writes a roster back out as CSV.
pub fn write_roster_csv(path: &Path, components: &[AssessmentComponent]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for component in components {
        writer.serialize(component)?;
    }
    writer.flush()?;
    Ok(())
}
