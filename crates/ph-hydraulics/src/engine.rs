//! Single-scenario hydraulic analysis.

use crate::error::{EngineResult, HydraulicError};
use crate::friction::{FrictionTerms, compute_friction};
use crate::model::{FluidProperties, HydraulicInputs, OperatingPoint, PipeGeometry};
use crate::regime::{FlowRegime, classify};
use ph_core::EngineConfig;
use ph_core::numeric::{Real, checked_div, fixed};
use ph_core::units::{head_to_mpa, mpa_to_head};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Complete outcome of one (geometry, fluid, operating point) analysis.
///
/// Every quantity is rounded to the engine's fixed scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydraulicResult {
    /// Mean velocity (m/s)
    pub velocity_mps: Real,
    /// Mass flow rate (kg/s)
    pub mass_flow_kgps: Real,
    pub reynolds: Real,
    pub relative_roughness: Real,
    pub regime: FlowRegime,
    pub beta: Real,
    pub m: Real,
    pub friction_factor: Real,
    pub hydraulic_gradient: Real,
    pub friction_head_loss_m: Real,
    pub station_loss_m: Real,
    pub elevation_head_m: Real,
    /// Friction + station + elevation (m)
    pub total_head_loss_m: Real,
    pub inlet_pressure_mpa: Real,
    pub outlet_pressure_mpa: Real,
    pub inlet_head_m: Real,
    pub outlet_head_m: Real,
    pub feasible: bool,
    /// Reason for infeasibility; `None` when feasible.
    pub diagnostic: Option<String>,
}

impl HydraulicResult {
    pub fn pressure_drop_mpa(&self) -> Real {
        self.inlet_pressure_mpa - self.outlet_pressure_mpa
    }
}

/// Stateless engine bound to one configuration.
#[derive(Debug, Clone, Default)]
pub struct HydraulicEngine {
    config: EngineConfig,
}

impl HydraulicEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn analyze(
        &self,
        geometry: &PipeGeometry,
        fluid: &FluidProperties,
        operating: &OperatingPoint,
    ) -> EngineResult<HydraulicResult> {
        geometry.validate()?;
        fluid.validate()?;
        operating.validate()?;

        let t = &self.config.constants;

        let area = geometry.cross_section_area(t);
        if area <= Real::ZERO {
            return Err(HydraulicError::invalid(format!(
                "inner diameter {} mm gives no flow area",
                geometry.inner_diameter_mm()
            )));
        }
        let flow = operating.flow_rate_m3ps();
        let velocity = fixed(checked_div(flow, area, "velocity")?);
        let reynolds = fixed(checked_div(
            velocity * geometry.inner_diameter_m(),
            fluid.viscosity_m2ps(),
            "Reynolds number",
        )?);
        let eps = geometry.relative_roughness(t)?;

        let regime = classify(reynolds, eps, &self.config)?;
        let FrictionTerms {
            friction_factor,
            hydraulic_gradient,
            friction_head_loss_m,
            station_loss_m,
        } = compute_friction(&regime, velocity, reynolds, geometry, t)?;

        let rho = fluid.density_kg_m3;
        let g = t.gravity;
        let elevation = geometry.elevation_difference_m;
        let total_head_loss = friction_head_loss_m + station_loss_m + elevation;

        let p_in = operating.inlet_pressure_mpa;
        let p_out = fixed(p_in - head_to_mpa(total_head_loss, rho, g));

        let threshold = self.config.min_outlet_pressure_mpa;
        let feasible = p_out > threshold;
        let diagnostic = if feasible {
            None
        } else {
            warn!(%p_out, %threshold, "outlet pressure below minimum");
            Some(format!(
                "outlet pressure {p_out} MPa does not exceed the minimum of {threshold} MPa \
                 (friction {friction_head_loss_m} m, station {station_loss_m} m, elevation {elevation} m)"
            ))
        };

        debug!(
            %reynolds,
            regime = regime.kind().label(),
            %friction_factor,
            %p_out,
            feasible,
            "hydraulic analysis"
        );

        Ok(HydraulicResult {
            velocity_mps: velocity,
            mass_flow_kgps: fixed(rho * flow),
            reynolds,
            relative_roughness: eps,
            regime: regime.kind(),
            beta: regime.beta(),
            m: regime.m(),
            friction_factor,
            hydraulic_gradient,
            friction_head_loss_m,
            station_loss_m,
            elevation_head_m: elevation,
            total_head_loss_m: fixed(total_head_loss),
            inlet_pressure_mpa: p_in,
            outlet_pressure_mpa: p_out,
            inlet_head_m: fixed(mpa_to_head(p_in, rho, g)),
            outlet_head_m: fixed(mpa_to_head(p_out, rho, g)),
            feasible,
            diagnostic,
        })
    }

    pub fn analyze_inputs(&self, inputs: &HydraulicInputs) -> EngineResult<HydraulicResult> {
        self.analyze(&inputs.geometry, &inputs.fluid, &inputs.operating)
    }
}

/// One-shot analysis with an explicit configuration.
pub fn analyze_hydraulics(
    geometry: &PipeGeometry,
    fluid: &FluidProperties,
    operating: &OperatingPoint,
    config: &EngineConfig,
) -> EngineResult<HydraulicResult> {
    HydraulicEngine::new(config.clone()).analyze(geometry, fluid, operating)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pipe(elevation: Real) -> PipeGeometry {
        PipeGeometry::new(dec!(150), dec!(508), dec!(9), dec!(0.03), elevation)
    }

    fn oil() -> FluidProperties {
        FluidProperties::new(dec!(860), dec!(20), dec!(20))
    }

    #[test]
    fn elevation_gain_lowers_outlet() {
        let engine = HydraulicEngine::default();
        let op = OperatingPoint::new(dec!(850), dec!(6));
        let flat = engine.analyze(&pipe(dec!(0)), &oil(), &op).unwrap();
        let uphill = engine.analyze(&pipe(dec!(100)), &oil(), &op).unwrap();
        let downhill = engine.analyze(&pipe(dec!(-100)), &oil(), &op).unwrap();
        assert!(uphill.outlet_pressure_mpa < flat.outlet_pressure_mpa);
        assert!(downhill.outlet_pressure_mpa > flat.outlet_pressure_mpa);
        // ρ g Δz = 860 * 9.8 * 100 Pa
        let delta = flat.outlet_pressure_mpa - uphill.outlet_pressure_mpa;
        assert!((delta - dec!(0.84280)).abs() < dec!(0.00000002));
    }

    #[test]
    fn infeasible_is_data_not_error() {
        let engine = HydraulicEngine::default();
        let op = OperatingPoint::new(dec!(850), dec!(0.1));
        let r = engine.analyze(&pipe(dec!(20)), &oil(), &op).unwrap();
        assert!(!r.feasible);
        assert!(r.outlet_pressure_mpa < Real::ZERO);
        assert!(r.diagnostic.as_deref().unwrap().contains("minimum"));
    }

    #[test]
    fn threshold_is_strict() {
        let engine = HydraulicEngine::default();
        let op = OperatingPoint::new(dec!(850), dec!(6));
        let r = engine.analyze(&pipe(dec!(0)), &oil(), &op).unwrap();
        assert!(r.feasible);

        let at_outlet = HydraulicEngine::new(
            EngineConfig::default().with_min_outlet_pressure(r.outlet_pressure_mpa),
        );
        let r2 = at_outlet.analyze(&pipe(dec!(0)), &oil(), &op).unwrap();
        assert!(!r2.feasible);
        assert!(r2.diagnostic.is_some());
    }

    #[test]
    fn invalid_inputs_are_errors() {
        let engine = HydraulicEngine::default();
        let op = OperatingPoint::new(dec!(850), dec!(6));
        let bad_pipe = PipeGeometry::new(dec!(150), dec!(100), dec!(60), dec!(0.03), dec!(0));
        assert!(engine.analyze(&bad_pipe, &oil(), &op).unwrap_err().is_invalid_input());

        let bad_fluid = FluidProperties::new(dec!(-1), dec!(20), dec!(20));
        assert!(engine.analyze(&pipe(dec!(0)), &bad_fluid, &op).unwrap_err().is_invalid_input());

        let bad_op = OperatingPoint::new(dec!(0), dec!(6));
        assert!(engine.analyze(&pipe(dec!(0)), &oil(), &bad_op).unwrap_err().is_invalid_input());
    }

    #[test]
    fn heads_are_consistent_with_pressures() {
        let engine = HydraulicEngine::default();
        let op = OperatingPoint::new(dec!(850), dec!(6));
        let r = engine.analyze(&pipe(dec!(20)), &oil(), &op).unwrap();
        let head_drop = r.inlet_head_m - r.outlet_head_m;
        assert!((head_drop - r.total_head_loss_m).abs() < dec!(0.0001));
        assert!(r.pressure_drop_mpa() > Real::ZERO);
    }
}
