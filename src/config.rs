//! Runtime settings for the command-line front-end.
//!
//! Built-in defaults are overlaid by an optional JSON file, then by
//! environment variables:
//!
//! | Variable               | Field            |
//! |------------------------|------------------|
//! | `GRADE_DEFAULT_TARGET` | `default_target` |
//! | `GRADE_SCHEME`         | `scheme`         |
//! | `GRADE_STRICT`         | `strict`         |
//! | `LOG_FILE_PATH`        | `log_file_path`  |
//!
//! A JSON file looks like:
//! ```json
//! { "default_target": 8.5, "scheme": "linear", "strict": true }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::grading::scheme::GradingScheme;
use crate::validate::validate_target;

pub const DEFAULT_LOG_FILE: &str = "logs/grade_predictor.log";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Target grade used when `predict` is run without `--target`.
    pub default_target: f64,
    pub scheme: GradingScheme,
    /// Refuse to compute on rosters that fail validation.
    pub strict: bool,
    pub log_file_path: String,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            default_target: 8.0,
            scheme: GradingScheme::Linear,
            strict: false,
            log_file_path: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

impl PredictorConfig {
    /// Loads settings from an optional JSON file, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        validate_target(config.default_target).context("default_target")?;
        Ok(config)
    }

    /// Applies overrides looked up by variable name.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("GRADE_DEFAULT_TARGET") {
            let target: f64 = value
                .trim()
                .parse()
                .with_context(|| format!("GRADE_DEFAULT_TARGET={value:?} is not a number"))?;
            self.default_target = validate_target(target).context("GRADE_DEFAULT_TARGET")?;
        }

        if let Some(value) = lookup("GRADE_SCHEME") {
            self.scheme = value.parse().context("GRADE_SCHEME")?;
        }

        if let Some(value) = lookup("GRADE_STRICT") {
            self.strict = parse_flag(&value)
                .with_context(|| format!("GRADE_STRICT={value:?} is not a boolean"))?;
        }

        if let Some(value) = lookup("LOG_FILE_PATH") {
            self.log_file_path = value;
        }

        Ok(self)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env;
    use std::fs;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PredictorConfig::default();
        assert_eq!(config.default_target, 8.0);
        assert_eq!(config.scheme, GradingScheme::Linear);
        assert!(!config.strict);
        assert_eq!(config.log_file_path, DEFAULT_LOG_FILE);
    }

    #[test]
    fn test_env_overrides() {
        let config = PredictorConfig::default()
            .with_overrides(lookup(&[
                ("GRADE_DEFAULT_TARGET", "9.5"),
                ("GRADE_SCHEME", "gaussian"),
                ("GRADE_STRICT", "yes"),
                ("LOG_FILE_PATH", "/tmp/grades.log"),
            ]))
            .unwrap();

        assert_eq!(config.default_target, 9.5);
        assert_eq!(config.scheme, GradingScheme::Gaussian);
        assert!(config.strict);
        assert_eq!(config.log_file_path, "/tmp/grades.log");
    }

    #[test]
    fn test_env_overrides_reject_bad_values() {
        let bad = [
            ("GRADE_DEFAULT_TARGET", "eleven"),
            ("GRADE_DEFAULT_TARGET", "11"),
            ("GRADE_SCHEME", "random"),
            ("GRADE_STRICT", "maybe"),
        ];
        for pair in bad {
            assert!(
                PredictorConfig::default().with_overrides(lookup(&[pair])).is_err(),
                "{pair:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_file_keeps_unset_defaults() {
        let path = env::temp_dir().join("grade_predictor_test_config.json");
        fs::write(&path, r#"{ "default_target": 7.0, "strict": true }"#).unwrap();

        let config = PredictorConfig::from_file(&path).unwrap();
        assert_eq!(config.default_target, 7.0);
        assert!(config.strict);
        assert_eq!(config.scheme, GradingScheme::Linear);
        assert_eq!(config.log_file_path, DEFAULT_LOG_FILE);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_from_file_missing() {
        let path = env::temp_dir().join("grade_predictor_missing_config.json");
        let _ = fs::remove_file(&path);
        assert!(PredictorConfig::from_file(&path).is_err());
    }
}
