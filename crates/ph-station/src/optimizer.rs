//! Lowest-energy feasible pump configuration.
//!
//! Every combination is evaluated independently (in parallel on the rayon pool when the engine
//! configuration allows it) and the outcome is reduced with a total order, so the optimum does
//! not depend on evaluation order:
//!
//! 1. daily energy ascending
//! 2. total running units ascending
//! 3. enumeration index ascending

use crate::combination::PumpCombination;
use crate::error::StationResult;
use crate::pump::PumpStation;
use crate::tariff::EnergyTariff;
use ph_core::numeric::{Real, fixed};
use ph_core::units::head_to_mpa;
use ph_hydraulics::{HydraulicEngine, HydraulicInputs, HydraulicResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info, warn};

/// One combination run through the hydraulic engine and costed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEvaluation {
    /// Position in enumeration order.
    pub index: usize,
    pub combination: PumpCombination,
    pub head_added_m: Real,
    pub power_kw: Real,
    pub adjusted_inlet_pressure_mpa: Real,
    pub daily_energy_kwh: Real,
    pub daily_cost: Real,
    pub annual_energy_kwh: Real,
    pub annual_cost: Real,
    pub hydraulics: HydraulicResult,
}

impl CandidateEvaluation {
    pub fn feasible(&self) -> bool {
        self.hydraulics.feasible
    }
}

/// Total order used for selection and ranking.
pub fn selection_order(a: &CandidateEvaluation, b: &CandidateEvaluation) -> Ordering {
    a.daily_energy_kwh
        .cmp(&b.daily_energy_kwh)
        .then_with(|| a.combination.total_units().cmp(&b.combination.total_units()))
        .then_with(|| a.index.cmp(&b.index))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Every combination, in enumeration order.
    pub evaluated: Vec<CandidateEvaluation>,
    pub optimal: Option<CandidateEvaluation>,
    /// Feasible combinations, best first.
    pub ranking: Vec<CandidateEvaluation>,
    /// Why no optimum exists; `None` when one does.
    pub diagnostic: Option<String>,
}

impl OptimizationResult {
    pub fn feasible_count(&self) -> usize {
        self.ranking.len()
    }
}

/// Feasible candidates sorted by [`selection_order`], regardless of input order.
pub fn rank_candidates(candidates: &[CandidateEvaluation]) -> Vec<CandidateEvaluation> {
    let mut feasible: Vec<CandidateEvaluation> =
        candidates.iter().filter(|c| c.feasible()).cloned().collect();
    feasible.sort_by(selection_order);
    feasible
}

/// Evaluate one combination against the base operating point.
pub fn evaluate_candidate(
    engine: &HydraulicEngine,
    inputs: &HydraulicInputs,
    station: &PumpStation,
    tariff: &EnergyTariff,
    index: usize,
    combination: PumpCombination,
) -> StationResult<CandidateEvaluation> {
    let head = station.head_added_m(combination);
    let power = station.power_kw(combination);
    let boost = head_to_mpa(
        head,
        inputs.fluid.density_kg_m3,
        engine.config().constants.gravity,
    );
    let adjusted = fixed(inputs.operating.inlet_pressure_mpa + boost);

    let operating = inputs.operating.with_inlet_pressure(adjusted);
    let hydraulics = engine.analyze(&inputs.geometry, &inputs.fluid, &operating)?;

    let daily_energy = tariff.daily_energy_kwh(power);
    let daily_cost = tariff.cost(daily_energy);

    debug!(
        %combination,
        %head,
        %power,
        outlet = %hydraulics.outlet_pressure_mpa,
        feasible = hydraulics.feasible,
        "evaluated pump combination"
    );

    Ok(CandidateEvaluation {
        index,
        combination,
        head_added_m: head,
        power_kw: power,
        adjusted_inlet_pressure_mpa: adjusted,
        daily_energy_kwh: daily_energy,
        daily_cost,
        annual_energy_kwh: tariff.annualize(daily_energy),
        annual_cost: tariff.annualize(daily_cost),
        hydraulics,
    })
}

pub fn optimize(
    engine: &HydraulicEngine,
    inputs: &HydraulicInputs,
    station: &PumpStation,
    tariff: &EnergyTariff,
) -> StationResult<OptimizationResult> {
    inputs.validate()?;
    station.validate()?;
    tariff.validate()?;

    let combos: Vec<(usize, PumpCombination)> = station.combinations().enumerate().collect();
    let evaluate =
        |&(i, c): &(usize, PumpCombination)| evaluate_candidate(engine, inputs, station, tariff, i, c);

    let evaluated: Vec<CandidateEvaluation> = if engine.config().parallel {
        combos.par_iter().map(evaluate).collect::<StationResult<_>>()?
    } else {
        combos.iter().map(evaluate).collect::<StationResult<_>>()?
    };

    let ranking = rank_candidates(&evaluated);
    let optimal = ranking.first().cloned();

    let diagnostic = match &optimal {
        Some(best) => {
            info!(
                combination = %best.combination,
                daily_energy_kwh = %best.daily_energy_kwh,
                feasible = ranking.len(),
                evaluated = evaluated.len(),
                "optimal pump configuration selected"
            );
            None
        }
        None => {
            let msg = no_feasible_message(&evaluated, engine.config().min_outlet_pressure_mpa);
            warn!(evaluated = evaluated.len(), "{msg}");
            Some(msg)
        }
    };

    Ok(OptimizationResult {
        evaluated,
        optimal,
        ranking,
        diagnostic,
    })
}

fn no_feasible_message(evaluated: &[CandidateEvaluation], threshold: Real) -> String {
    let best = evaluated
        .iter()
        .max_by(|a, b| {
            a.hydraulics
                .outlet_pressure_mpa
                .cmp(&b.hydraulics.outlet_pressure_mpa)
                .then_with(|| b.index.cmp(&a.index))
        });
    match best {
        Some(c) => format!(
            "no pump configuration satisfies the minimum outlet pressure of {threshold} MPa \
             ({} combinations evaluated; highest outlet pressure {} MPa with {})",
            evaluated.len(),
            c.hydraulics.outlet_pressure_mpa,
            c.combination
        ),
        None => format!(
            "no pump configuration satisfies the minimum outlet pressure of {threshold} MPa"
        ),
    }
}
