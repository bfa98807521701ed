//! Error types for hydraulic calculations.

use ph_core::{PhError, Real};
use thiserror::Error;

/// Errors that can occur during a hydraulic analysis.
///
/// An infeasible operating point is not an error; it is reported on the result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HydraulicError {
    #[error("Invalid input: {what}")]
    InvalidInput { what: String },

    #[error("Reynolds number {reynolds} lies in the transition band and the engine is configured to reject it")]
    ModelBoundary { reynolds: Real },

    #[error("Numeric error: {what}")]
    Numeric { what: &'static str },
}

pub type EngineResult<T> = Result<T, HydraulicError>;

impl HydraulicError {
    pub fn invalid(what: impl Into<String>) -> Self {
        HydraulicError::InvalidInput { what: what.into() }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, HydraulicError::InvalidInput { .. })
    }
}

impl From<PhError> for HydraulicError {
    fn from(e: PhError) -> Self {
        match e {
            PhError::OutOfRange { what } => HydraulicError::Numeric { what },
            other => HydraulicError::InvalidInput {
                what: other.to_string(),
            },
        }
    }
}
