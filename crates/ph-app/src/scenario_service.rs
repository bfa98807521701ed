//! Scenario loading, saving, validation and introspection.

use ph_project::{ProjectError, Scenario};
use std::path::Path;

use crate::error::{AppError, AppResult};

/// One-line description of a scenario for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSummary {
    pub name: String,
    pub version: u32,
    pub has_station: bool,
    /// Installed units across both families.
    pub installed_units: u32,
    pub combination_count: usize,
    pub sensitivity_variables: usize,
}

/// Load a YAML or JSON scenario, migrating and validating it.
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    ph_project::load_scenario(path).map_err(|e| match e {
        ProjectError::Io(source) => AppError::ScenarioFileRead {
            path: path.to_path_buf(),
            source,
        },
        other => other.into(),
    })
}

pub fn save_scenario(path: &Path, scenario: &Scenario) -> AppResult<()> {
    ph_project::save_scenario(path, scenario)?;
    Ok(())
}

pub fn validate_scenario(scenario: &Scenario) -> AppResult<()> {
    ph_project::validate_scenario(scenario).map_err(|e| AppError::Scenario(e.to_string()))
}

pub fn summarize(scenario: &Scenario) -> ScenarioSummary {
    let (installed_units, combination_count) = match &scenario.station {
        Some(def) => (
            def.family_a.max_units.saturating_add(def.family_b.max_units),
            def.pumps().combinations().len(),
        ),
        None => (0, 0),
    };
    ScenarioSummary {
        name: scenario.name.clone(),
        version: scenario.version,
        has_station: scenario.station.is_some(),
        installed_units,
        combination_count,
        sensitivity_variables: scenario.sensitivity.as_ref().map_or(0, |s| s.sweeps.len()),
    }
}
