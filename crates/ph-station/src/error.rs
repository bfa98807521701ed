use ph_core::PhError;
use ph_hydraulics::HydraulicError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StationError {
    #[error("Invalid input: {what}")]
    InvalidInput { what: String },

    #[error("Hydraulic error: {0}")]
    Hydraulic(#[from] HydraulicError),
}

pub type StationResult<T> = Result<T, StationError>;

impl StationError {
    pub fn invalid(what: impl Into<String>) -> Self {
        StationError::InvalidInput { what: what.into() }
    }

    /// True for input errors raised here or by the hydraulic engine.
    pub fn is_invalid_input(&self) -> bool {
        match self {
            StationError::InvalidInput { .. } => true,
            StationError::Hydraulic(e) => e.is_invalid_input(),
        }
    }
}

impl From<PhError> for StationError {
    fn from(e: PhError) -> Self {
        StationError::Hydraulic(e.into())
    }
}
