//! Physical constants and the flow-regime coefficient table.
//!
//! The table is a plain value: the engine receives it through `EngineConfig`, so alternate
//! coefficient sets can be substituted per call without touching shared state. `Default`
//! reproduces the standard oil-pipeline (Leibenzon) coefficients.

use crate::numeric::Real;
use rust_decimal_macros::dec;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Leibenzon power-law pair: head loss ∝ β·Q^(2−m)·ν^m / d^(5−m).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PowerLaw {
    pub beta: Real,
    pub m: Real,
}

impl PowerLaw {
    pub const fn new(beta: Real, m: Real) -> Self {
        Self { beta, m }
    }
}

/// Mixed-friction zone: β = base · 10^(slope·log10(e/d) − intercept).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MixedCoefficients {
    pub beta_base: Real,
    pub m: Real,
    pub roughness_slope: Real,
    pub roughness_intercept: Real,
}

/// Rough zone: λ = multiplier · (e/d)^exponent, β = base · λ, m = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoughCoefficients {
    pub beta_base: Real,
    pub multiplier: Real,
    pub exponent: Real,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConstantTable {
    pub pi: Real,
    /// Gravitational acceleration (m/s²).
    pub gravity: Real,
    /// In-station loss as a fraction of the line friction head loss.
    pub station_loss_factor: Real,
    /// ε = roughness_factor · e / d
    pub roughness_factor: Real,

    pub laminar_upper_re: Real,
    pub transition_upper_re: Real,
    /// Smooth/mixed boundary: numerator / ε^exponent
    pub smooth_limit_numerator: Real,
    pub smooth_limit_exponent: Real,
    /// Mixed/rough boundary: intercept − slope · log10(ε)
    pub mixed_limit_intercept: Real,
    pub mixed_limit_slope: Real,

    pub laminar: PowerLaw,
    pub smooth: PowerLaw,
    pub mixed: MixedCoefficients,
    pub rough: RoughCoefficients,
}

impl Default for ConstantTable {
    fn default() -> Self {
        Self {
            pi: dec!(3.1415926535897932384626433833),
            gravity: dec!(9.8),
            station_loss_factor: dec!(0.01),
            roughness_factor: dec!(2),

            laminar_upper_re: dec!(2000),
            transition_upper_re: dec!(3000),
            smooth_limit_numerator: dec!(59.5),
            smooth_limit_exponent: dec!(8) / dec!(7),
            mixed_limit_intercept: dec!(665),
            mixed_limit_slope: dec!(765),

            laminar: PowerLaw::new(dec!(4.15), dec!(1)),
            smooth: PowerLaw::new(dec!(0.0246), dec!(0.25)),
            mixed: MixedCoefficients {
                beta_base: dec!(0.0802),
                m: dec!(0.123),
                roughness_slope: dec!(0.127),
                roughness_intercept: dec!(0.627),
            },
            rough: RoughCoefficients {
                beta_base: dec!(0.0826),
                multiplier: dec!(0.11),
                exponent: dec!(0.25),
            },
        }
    }
}
