//! Friction loss along the line and inside the stations.

use crate::error::EngineResult;
use crate::model::PipeGeometry;
use crate::regime::{Regime, darcy_factor};
use ph_core::ConstantTable;
use ph_core::numeric::{Real, checked_div, ensure_positive, fixed};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrictionTerms {
    /// Darcy friction factor λ
    pub friction_factor: Real,
    /// Friction head loss per metre of pipe (m/m)
    pub hydraulic_gradient: Real,
    /// Gradient × length (m)
    pub friction_head_loss_m: Real,
    /// Valve and fitting loss inside the stations (m)
    pub station_loss_m: Real,
}

impl FrictionTerms {
    pub fn total_head_loss_m(&self) -> Real {
        self.friction_head_loss_m + self.station_loss_m
    }
}

/// Darcy-Weisbach friction for a classified regime.
///
/// `i = λ·v² / (2·g·d)`, `h = i·L`, station loss `= factor·h`.
pub fn compute_friction(
    regime: &Regime,
    velocity_mps: Real,
    reynolds: Real,
    geometry: &PipeGeometry,
    constants: &ConstantTable,
) -> EngineResult<FrictionTerms> {
    let velocity = ensure_positive(velocity_mps, "velocity")?;
    let d = ensure_positive(geometry.inner_diameter_m(), "inner diameter")?;

    let lambda = match regime.fixed_friction_factor() {
        Some(lambda) => lambda,
        None => darcy_factor(regime.coefficients(), reynolds, constants)?,
    };

    let velocity_head = checked_div(
        velocity * velocity,
        Real::TWO * constants.gravity,
        "velocity head",
    )?;
    // only the reported slope is rounded; the loss uses the exact one
    let gradient = checked_div(lambda * velocity_head, d, "hydraulic gradient")?;
    let head_loss = fixed(gradient * geometry.length_m());
    let station_loss = fixed(constants.station_loss_factor * head_loss);

    Ok(FrictionTerms {
        friction_factor: lambda,
        hydraulic_gradient: fixed(gradient),
        friction_head_loss_m: head_loss,
        station_loss_m: station_loss,
    })
}
