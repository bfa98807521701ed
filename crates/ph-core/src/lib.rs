//! ph-core: stable foundation for pipehydra.
//!
//! Contains:
//! - numeric (fixed-scale decimal `Real` + checked transcendental helpers)
//! - units (engineering-unit conversions to SI)
//! - constants (injectable constant table and regime coefficients)
//! - config (engine configuration built on the constant table)
//! - error (shared error types)

pub mod config;
pub mod constants;
pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use config::{EngineConfig, TransitionPolicy};
pub use constants::{ConstantTable, MixedCoefficients, PowerLaw, RoughCoefficients};
pub use error::{PhError, PhResult};
pub use numeric::*;
pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;
