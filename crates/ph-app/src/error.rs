//! Error types for the ph-app service layer.

use ph_hydraulics::HydraulicError;
use ph_station::StationError;
use std::path::PathBuf;

/// Unified error for the CLI and any other frontend.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Failed to read scenario file: {path}")]
    ScenarioFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scenario '{scenario}' has no {section} section")]
    MissingSection {
        scenario: String,
        section: &'static str,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Outside the model: {0}")]
    ModelBoundary(String),

    #[error("Numeric error: {0}")]
    Numeric(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<HydraulicError> for AppError {
    fn from(err: HydraulicError) -> Self {
        match err {
            HydraulicError::InvalidInput { what } => AppError::InvalidInput(what),
            e @ HydraulicError::ModelBoundary { .. } => AppError::ModelBoundary(e.to_string()),
            e @ HydraulicError::Numeric { .. } => AppError::Numeric(e.to_string()),
        }
    }
}

impl From<StationError> for AppError {
    fn from(err: StationError) -> Self {
        match err {
            StationError::InvalidInput { what } => AppError::InvalidInput(what),
            StationError::Hydraulic(e) => e.into(),
        }
    }
}

impl From<ph_project::ProjectError> for AppError {
    fn from(err: ph_project::ProjectError) -> Self {
        AppError::Scenario(err.to_string())
    }
}

impl From<ph_results::ResultsError> for AppError {
    fn from(err: ph_results::ResultsError) -> Self {
        match err {
            ph_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn engine_errors_keep_their_kind() {
        let e: AppError = HydraulicError::invalid("flow rate must be positive").into();
        assert!(matches!(e, AppError::InvalidInput(_)));

        let e: AppError = StationError::Hydraulic(HydraulicError::ModelBoundary {
            reynolds: dec!(2500),
        })
        .into();
        assert!(matches!(e, AppError::ModelBoundary(ref m) if m.contains("2500")));
    }
}
