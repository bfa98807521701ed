//! Engine configuration.

use crate::constants::ConstantTable;
use crate::numeric::Real;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the 2000 ≤ Re ≤ 3000 band is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TransitionPolicy {
    /// Linear interpolation of the Darcy friction factor between the laminar value at the
    /// lower boundary and the hydraulically-smooth value at the upper boundary.
    #[default]
    Interpolate,
    /// Refuse to compute; the operating point is outside the model.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub constants: ConstantTable,
    pub transition: TransitionPolicy,
    /// Outlet pressure must be strictly greater than this (MPa) for a feasible result.
    pub min_outlet_pressure_mpa: Real,
    /// Evaluate pump combinations on the rayon pool.
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            constants: ConstantTable::default(),
            transition: TransitionPolicy::Interpolate,
            min_outlet_pressure_mpa: Real::ZERO,
            parallel: true,
        }
    }
}

impl EngineConfig {
    pub fn with_constants(mut self, constants: ConstantTable) -> Self {
        self.constants = constants;
        self
    }

    pub fn with_transition(mut self, transition: TransitionPolicy) -> Self {
        self.transition = transition;
        self
    }

    pub fn with_min_outlet_pressure(mut self, p_mpa: Real) -> Self {
        self.min_outlet_pressure_mpa = p_mpa;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}
