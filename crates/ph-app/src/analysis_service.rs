//! Engine entry points for frontends.
//!
//! The free functions take plain domain values; the `*_scenario` variants pull the same values
//! out of a loaded [`Scenario`].

use ph_core::EngineConfig;
use ph_core::numeric::Real;
use ph_hydraulics::{
    FluidProperties, HydraulicEngine, HydraulicInputs, HydraulicResult, OperatingPoint,
    PipeGeometry, SensitivityReport, SensitivityRequest,
};
use ph_project::{Scenario, StationDef};
use ph_station::{EnergyTariff, OptimizationResult, PumpFamilySpec, PumpStation};

use crate::error::{AppError, AppResult};

pub fn analyze_hydraulics(
    geometry: &PipeGeometry,
    fluid: &FluidProperties,
    operating: &OperatingPoint,
    config: &EngineConfig,
) -> AppResult<HydraulicResult> {
    Ok(ph_hydraulics::analyze_hydraulics(
        geometry, fluid, operating, config,
    )?)
}

/// Cheapest feasible pump configuration for the base operating point.
///
/// Annual figures use the default working-day count; go through a [`Scenario`] tariff to
/// change it.
#[allow(clippy::too_many_arguments)]
pub fn optimize_pump_station(
    geometry: &PipeGeometry,
    fluid: &FluidProperties,
    base_operating: &OperatingPoint,
    family_a: &PumpFamilySpec,
    family_b: &PumpFamilySpec,
    operating_hours_per_day: Real,
    electricity_price: Real,
    config: &EngineConfig,
) -> AppResult<OptimizationResult> {
    let engine = HydraulicEngine::new(config.clone());
    let inputs = HydraulicInputs::new(geometry.clone(), fluid.clone(), base_operating.clone());
    let station = PumpStation::new(family_a.clone(), family_b.clone());
    let tariff = EnergyTariff::new(operating_hours_per_day, electricity_price);
    Ok(ph_station::optimize(&engine, &inputs, &station, &tariff)?)
}

pub fn run_sensitivity(
    inputs: &HydraulicInputs,
    request: &SensitivityRequest,
    config: &EngineConfig,
) -> AppResult<SensitivityReport> {
    let engine = HydraulicEngine::new(config.clone());
    Ok(ph_hydraulics::run_sensitivity(&engine, inputs, request)?)
}

pub fn analyze_scenario(scenario: &Scenario) -> AppResult<HydraulicResult> {
    analyze_hydraulics(
        &scenario.pipeline,
        &scenario.fluid,
        &scenario.operating,
        &scenario.engine,
    )
}

pub fn optimize_scenario(scenario: &Scenario) -> AppResult<OptimizationResult> {
    let def = station_of(scenario)?;
    let engine = HydraulicEngine::new(scenario.engine.clone());
    Ok(ph_station::optimize(
        &engine,
        &scenario.inputs(),
        &def.pumps(),
        &def.tariff,
    )?)
}

/// Sensitivity study for a scenario; `request` overrides the scenario's own section.
pub fn sensitivity_scenario(
    scenario: &Scenario,
    request: Option<&SensitivityRequest>,
) -> AppResult<SensitivityReport> {
    let request = sensitivity_request_of(scenario, request)?;
    run_sensitivity(&scenario.inputs(), request, &scenario.engine)
}

pub(crate) fn station_of(scenario: &Scenario) -> AppResult<&StationDef> {
    scenario.station.as_ref().ok_or_else(|| AppError::MissingSection {
        scenario: scenario.name.clone(),
        section: "station",
    })
}

pub(crate) fn sensitivity_request_of<'a>(
    scenario: &'a Scenario,
    request: Option<&'a SensitivityRequest>,
) -> AppResult<&'a SensitivityRequest> {
    request
        .or(scenario.sensitivity.as_ref())
        .ok_or_else(|| AppError::MissingSection {
            scenario: scenario.name.clone(),
            section: "sensitivity",
        })
}
