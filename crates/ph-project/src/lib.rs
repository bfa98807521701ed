//! ph-project: scenario file format, migration and validation.

pub mod migrate;
pub mod schema;
pub mod validate;

use std::path::Path;

pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use validate::{ValidationError, validate_scenario};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("Unsupported scenario file: {path}")]
    UnsupportedFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioFormat {
    Yaml,
    Json,
}

impl ScenarioFormat {
    pub fn from_path(path: &Path) -> ProjectResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Ok(ScenarioFormat::Yaml),
            Some("json") => Ok(ScenarioFormat::Json),
            _ => Err(ProjectError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

fn finish(scenario: Scenario) -> ProjectResult<Scenario> {
    let scenario = migrate_to_latest(scenario)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn load_yaml(path: &Path) -> ProjectResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    finish(serde_yaml::from_str(&content)?)
}

pub fn save_yaml(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    validate_scenario(scenario)?;
    let content = serde_yaml::to_string(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    finish(serde_json::from_str(&content)?)
}

pub fn save_json(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    validate_scenario(scenario)?;
    let content = serde_json::to_string_pretty(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by file extension (`.yaml`, `.yml` or `.json`).
pub fn load_scenario(path: &Path) -> ProjectResult<Scenario> {
    match ScenarioFormat::from_path(path)? {
        ScenarioFormat::Yaml => load_yaml(path),
        ScenarioFormat::Json => load_json(path),
    }
}

pub fn save_scenario(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    match ScenarioFormat::from_path(path)? {
        ScenarioFormat::Yaml => save_yaml(path, scenario),
        ScenarioFormat::Json => save_json(path, scenario),
    }
}
