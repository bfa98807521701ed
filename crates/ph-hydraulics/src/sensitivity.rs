//! Single-factor and cross sensitivity of the friction loss to the analysis inputs.
//!
//! Each sweep point scales one input by `(1 + p/100)` and re-runs the engine. Points whose
//! modified inputs the engine rejects are skipped, not reported as failures.

use crate::engine::{HydraulicEngine, HydraulicResult};
use crate::error::{EngineResult, HydraulicError};
use crate::model::HydraulicInputs;
use crate::regime::FlowRegime;
use ph_core::numeric::{Real, fixed};
use ph_core::units::PERCENT;
use rust_decimal::RoundingStrategy;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

pub const MAX_VARIABLES: usize = 5;
const PERCENT_LIMIT: Real = dec!(50);
const STEP_MIN: Real = dec!(1);
const STEP_MAX: Real = dec!(20);
const CROSS_CHANGES: [Real; 3] = [dec!(-10), dec!(0), dec!(10)];
const HIGH_THRESHOLD: Real = dec!(1.5);
const MEDIUM_THRESHOLD: Real = dec!(0.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityVariable {
    FlowRate,
    Density,
    Viscosity,
    Length,
    OuterDiameter,
    Roughness,
    InletPressure,
    ElevationDifference,
}

impl SensitivityVariable {
    pub const ALL: [SensitivityVariable; 8] = [
        SensitivityVariable::FlowRate,
        SensitivityVariable::Density,
        SensitivityVariable::Viscosity,
        SensitivityVariable::Length,
        SensitivityVariable::OuterDiameter,
        SensitivityVariable::Roughness,
        SensitivityVariable::InletPressure,
        SensitivityVariable::ElevationDifference,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SensitivityVariable::FlowRate => "flow rate",
            SensitivityVariable::Density => "density",
            SensitivityVariable::Viscosity => "viscosity",
            SensitivityVariable::Length => "length",
            SensitivityVariable::OuterDiameter => "outer diameter",
            SensitivityVariable::Roughness => "roughness",
            SensitivityVariable::InletPressure => "inlet pressure",
            SensitivityVariable::ElevationDifference => "elevation difference",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            SensitivityVariable::FlowRate => "m³/h",
            SensitivityVariable::Density => "kg/m³",
            SensitivityVariable::Viscosity => "mm²/s",
            SensitivityVariable::Length => "km",
            SensitivityVariable::OuterDiameter | SensitivityVariable::Roughness => "mm",
            SensitivityVariable::InletPressure => "MPa",
            SensitivityVariable::ElevationDifference => "m",
        }
    }

    pub fn value(&self, inputs: &HydraulicInputs) -> Real {
        match self {
            SensitivityVariable::FlowRate => inputs.operating.flow_rate_m3h,
            SensitivityVariable::Density => inputs.fluid.density_kg_m3,
            SensitivityVariable::Viscosity => inputs.fluid.viscosity_cst,
            SensitivityVariable::Length => inputs.geometry.length_km,
            SensitivityVariable::OuterDiameter => inputs.geometry.outer_diameter_mm,
            SensitivityVariable::Roughness => inputs.geometry.roughness_mm,
            SensitivityVariable::InletPressure => inputs.operating.inlet_pressure_mpa,
            SensitivityVariable::ElevationDifference => inputs.geometry.elevation_difference_m,
        }
    }

    fn slot<'a>(&self, inputs: &'a mut HydraulicInputs) -> &'a mut Real {
        match self {
            SensitivityVariable::FlowRate => &mut inputs.operating.flow_rate_m3h,
            SensitivityVariable::Density => &mut inputs.fluid.density_kg_m3,
            SensitivityVariable::Viscosity => &mut inputs.fluid.viscosity_cst,
            SensitivityVariable::Length => &mut inputs.geometry.length_km,
            SensitivityVariable::OuterDiameter => &mut inputs.geometry.outer_diameter_mm,
            SensitivityVariable::Roughness => &mut inputs.geometry.roughness_mm,
            SensitivityVariable::InletPressure => &mut inputs.operating.inlet_pressure_mpa,
            SensitivityVariable::ElevationDifference => &mut inputs.geometry.elevation_difference_m,
        }
    }

    /// Copy of `inputs` with this variable scaled by `(1 + percent/100)`.
    pub fn scaled(&self, inputs: &HydraulicInputs, percent: Real) -> HydraulicInputs {
        let mut out = inputs.clone();
        let slot = self.slot(&mut out);
        *slot = fixed(*slot * (Real::ONE + percent / PERCENT));
        out
    }
}

impl fmt::Display for SensitivityVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Percent sweep for one variable, inclusive at both ends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableSweep {
    pub variable: SensitivityVariable,
    #[serde(default = "default_start")]
    pub start_percent: Real,
    #[serde(default = "default_end")]
    pub end_percent: Real,
    #[serde(default = "default_step")]
    pub step_percent: Real,
}

fn default_start() -> Real {
    dec!(-20)
}

fn default_end() -> Real {
    dec!(20)
}

fn default_step() -> Real {
    dec!(5)
}

impl VariableSweep {
    /// −20 % to +20 % in 5 % steps.
    pub fn new(variable: SensitivityVariable) -> Self {
        Self {
            variable,
            start_percent: default_start(),
            end_percent: default_end(),
            step_percent: default_step(),
        }
    }

    pub fn with_range(mut self, start_percent: Real, end_percent: Real, step_percent: Real) -> Self {
        self.start_percent = start_percent;
        self.end_percent = end_percent;
        self.step_percent = step_percent;
        self
    }

    pub fn validate(&self) -> EngineResult<()> {
        for (name, p) in [("start", self.start_percent), ("end", self.end_percent)] {
            if p.abs() > PERCENT_LIMIT {
                return Err(HydraulicError::invalid(format!(
                    "{} sweep {name} {p}% is outside ±{PERCENT_LIMIT}%",
                    self.variable
                )));
            }
        }
        if self.start_percent > self.end_percent {
            return Err(HydraulicError::invalid(format!(
                "{} sweep starts at {}% after its end {}%",
                self.variable, self.start_percent, self.end_percent
            )));
        }
        if self.step_percent < STEP_MIN || self.step_percent > STEP_MAX {
            return Err(HydraulicError::invalid(format!(
                "{} sweep step {}% is outside {STEP_MIN}..={STEP_MAX}%",
                self.variable, self.step_percent
            )));
        }
        Ok(())
    }

    pub fn percents(&self) -> impl Iterator<Item = Real> + '_ {
        let first = Some(self.start_percent).filter(|_| self.step_percent > Real::ZERO);
        std::iter::successors(first, move |p| Some(*p + self.step_percent))
            .take_while(move |p| *p <= self.end_percent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    #[default]
    Single,
    /// Single sweeps plus a 3×3 grid over the first two variables.
    Cross,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitivityRequest {
    pub sweeps: Vec<VariableSweep>,
    #[serde(default)]
    pub kind: AnalysisKind,
}

impl SensitivityRequest {
    pub fn single(sweeps: Vec<VariableSweep>) -> Self {
        Self {
            sweeps,
            kind: AnalysisKind::Single,
        }
    }

    pub fn cross(sweeps: Vec<VariableSweep>) -> Self {
        Self {
            sweeps,
            kind: AnalysisKind::Cross,
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.sweeps.is_empty() {
            return Err(HydraulicError::invalid("at least one sensitivity variable is required"));
        }
        if self.sweeps.len() > MAX_VARIABLES {
            return Err(HydraulicError::invalid(format!(
                "at most {MAX_VARIABLES} sensitivity variables, got {}",
                self.sweeps.len()
            )));
        }
        if self.kind == AnalysisKind::Cross && self.sweeps.len() < 2 {
            return Err(HydraulicError::invalid("cross analysis needs two variables"));
        }
        self.sweeps.iter().try_for_each(VariableSweep::validate)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPoint {
    pub change_percent: Real,
    pub variable_value: Real,
    pub friction_head_loss_m: Real,
    pub friction_change_percent: Real,
    pub outlet_pressure_mpa: Real,
    pub pressure_change_percent: Real,
    pub hydraulic_gradient: Real,
    pub reynolds: Real,
    pub regime: FlowRegime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Friction loss moves with the variable.
    Increasing,
    /// Friction loss moves against the variable.
    Decreasing,
    /// Friction loss does not respond.
    Flat,
    Mixed,
    /// Fewer than two points.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityLevel {
    Low,
    Medium,
    High,
}

impl SensitivityLevel {
    pub fn from_coefficient(coefficient: Real) -> Self {
        if coefficient > HIGH_THRESHOLD {
            SensitivityLevel::High
        } else if coefficient > MEDIUM_THRESHOLD {
            SensitivityLevel::Medium
        } else {
            SensitivityLevel::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableSensitivity {
    pub variable: SensitivityVariable,
    pub base_value: Real,
    pub points: Vec<DataPoint>,
    /// Mean of |Δfriction% / Δinput%| over the non-zero sweep points.
    pub coefficient: Real,
    pub trend: Trend,
    pub max_impact_percent: Real,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitivityRank {
    pub rank: usize,
    pub variable: SensitivityVariable,
    pub coefficient: Real,
    pub level: SensitivityLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossPoint {
    pub first_change_percent: Real,
    pub second_change_percent: Real,
    pub friction_head_loss_m: Real,
    pub outlet_pressure_mpa: Real,
    pub overall_change_percent: Real,
    pub feasible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitivityReport {
    pub base: HydraulicResult,
    pub variables: Vec<VariableSensitivity>,
    pub cross: Option<CrossGrid>,
    pub ranking: Vec<SensitivityRank>,
    pub total_calculations: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossGrid {
    pub first: SensitivityVariable,
    pub second: SensitivityVariable,
    pub points: Vec<CrossPoint>,
}

/// `(current − base) / base × 100`, two decimals; zero when the base is zero.
pub fn change_percent(base: Real, current: Real) -> Real {
    if base.is_zero() {
        return Real::ZERO;
    }
    ((current - base) / base * PERCENT)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn run_sensitivity(
    engine: &HydraulicEngine,
    inputs: &HydraulicInputs,
    request: &SensitivityRequest,
) -> EngineResult<SensitivityReport> {
    request.validate()?;
    let base = engine.analyze_inputs(inputs)?;
    let mut total = 1;

    let mut variables = Vec::with_capacity(request.sweeps.len());
    for sweep in &request.sweeps {
        let v = sweep_variable(engine, inputs, &base, sweep);
        total += v.points.len();
        variables.push(v);
    }

    let cross = match request.kind {
        AnalysisKind::Single => None,
        AnalysisKind::Cross => {
            let grid = cross_grid(
                engine,
                inputs,
                &base,
                request.sweeps[0].variable,
                request.sweeps[1].variable,
            );
            total += grid.points.len();
            Some(grid)
        }
    };

    let ranking = rank(&variables);
    debug!(variables = variables.len(), total, "sensitivity analysis complete");

    Ok(SensitivityReport {
        base,
        variables,
        cross,
        ranking,
        total_calculations: total,
    })
}

fn sweep_variable(
    engine: &HydraulicEngine,
    inputs: &HydraulicInputs,
    base: &HydraulicResult,
    sweep: &VariableSweep,
) -> VariableSensitivity {
    let variable = sweep.variable;
    let mut points = Vec::new();
    let mut max_impact = Real::ZERO;
    let mut ratio_sum = Real::ZERO;
    let mut ratio_count = 0u32;

    for percent in sweep.percents() {
        let modified = variable.scaled(inputs, percent);
        let result = match engine.analyze_inputs(&modified) {
            Ok(r) => r,
            Err(e) => {
                debug!(%variable, %percent, error = %e, "sensitivity point skipped");
                continue;
            }
        };

        let friction_change = change_percent(base.friction_head_loss_m, result.friction_head_loss_m);
        max_impact = max_impact.max(friction_change.abs());
        if !percent.is_zero() {
            ratio_sum += (friction_change / percent).abs();
            ratio_count += 1;
        }

        points.push(DataPoint {
            change_percent: percent,
            variable_value: variable.value(&modified),
            friction_head_loss_m: result.friction_head_loss_m,
            friction_change_percent: friction_change,
            outlet_pressure_mpa: result.outlet_pressure_mpa,
            pressure_change_percent: change_percent(
                base.outlet_pressure_mpa,
                result.outlet_pressure_mpa,
            ),
            hydraulic_gradient: result.hydraulic_gradient,
            reynolds: result.reynolds,
            regime: result.regime,
        });
    }

    let coefficient = if ratio_count == 0 {
        Real::ZERO
    } else {
        fixed(ratio_sum / Real::from(ratio_count))
    };

    VariableSensitivity {
        variable,
        base_value: variable.value(inputs),
        trend: trend(&points),
        points,
        coefficient,
        max_impact_percent: max_impact,
    }
}

fn trend(points: &[DataPoint]) -> Trend {
    if points.len() < 2 {
        return Trend::Unknown;
    }
    let mut with = false;
    let mut against = false;
    for p in points.iter().filter(|p| !p.change_percent.is_zero()) {
        let response = p.friction_change_percent;
        if response.is_zero() {
            continue;
        }
        if response.is_sign_positive() == p.change_percent.is_sign_positive() {
            with = true;
        } else {
            against = true;
        }
    }
    match (with, against) {
        (true, false) => Trend::Increasing,
        (false, true) => Trend::Decreasing,
        (false, false) => Trend::Flat,
        (true, true) => Trend::Mixed,
    }
}

fn cross_grid(
    engine: &HydraulicEngine,
    inputs: &HydraulicInputs,
    base: &HydraulicResult,
    first: SensitivityVariable,
    second: SensitivityVariable,
) -> CrossGrid {
    let mut points = Vec::with_capacity(CROSS_CHANGES.len() * CROSS_CHANGES.len());
    for a in CROSS_CHANGES {
        for b in CROSS_CHANGES {
            let modified = second.scaled(&first.scaled(inputs, a), b);
            match engine.analyze_inputs(&modified) {
                Ok(r) => points.push(CrossPoint {
                    first_change_percent: a,
                    second_change_percent: b,
                    friction_head_loss_m: r.friction_head_loss_m,
                    outlet_pressure_mpa: r.outlet_pressure_mpa,
                    overall_change_percent: change_percent(
                        base.friction_head_loss_m,
                        r.friction_head_loss_m,
                    ),
                    feasible: r.feasible,
                }),
                Err(e) => debug!(%first, %a, %second, %b, error = %e, "cross point skipped"),
            }
        }
    }
    CrossGrid {
        first,
        second,
        points,
    }
}

/// Variables by descending coefficient; ties keep request order.
fn rank(variables: &[VariableSensitivity]) -> Vec<SensitivityRank> {
    let mut order: Vec<&VariableSensitivity> = variables.iter().collect();
    order.sort_by(|a, b| b.coefficient.abs().cmp(&a.coefficient.abs()));
    order
        .into_iter()
        .enumerate()
        .map(|(i, v)| SensitivityRank {
            rank: i + 1,
            variable: v.variable,
            coefficient: v.coefficient,
            level: SensitivityLevel::from_coefficient(v.coefficient),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FluidProperties, OperatingPoint, PipeGeometry};

    fn inputs() -> HydraulicInputs {
        HydraulicInputs::new(
            PipeGeometry::new(dec!(150), dec!(508), dec!(9), dec!(0.03), dec!(20)),
            FluidProperties::new(dec!(860), dec!(20), dec!(20)),
            OperatingPoint::new(dec!(850), dec!(6)),
        )
    }

    #[test]
    fn sweep_points_are_inclusive() {
        let sweep = VariableSweep::new(SensitivityVariable::FlowRate);
        let p: Vec<Real> = sweep.percents().collect();
        assert_eq!(p.len(), 9);
        assert_eq!(p[0], dec!(-20));
        assert_eq!(p[8], dec!(20));

        let odd = sweep.with_range(dec!(-10), dec!(10), dec!(7));
        let p: Vec<Real> = odd.percents().collect();
        assert_eq!(p, vec![dec!(-10), dec!(-3), dec!(4)]);
    }

    #[test]
    fn sweep_validation() {
        let v = SensitivityVariable::Density;
        assert!(VariableSweep::new(v).validate().is_ok());
        assert!(VariableSweep::new(v).with_range(dec!(-60), dec!(0), dec!(5)).validate().is_err());
        assert!(VariableSweep::new(v).with_range(dec!(10), dec!(-10), dec!(5)).validate().is_err());
        assert!(VariableSweep::new(v).with_range(dec!(-10), dec!(10), dec!(0.5)).validate().is_err());
        assert!(VariableSweep::new(v).with_range(dec!(-10), dec!(10), dec!(25)).validate().is_err());
    }

    #[test]
    fn request_validation() {
        assert!(SensitivityRequest::single(vec![]).validate().is_err());
        let one = vec![VariableSweep::new(SensitivityVariable::FlowRate)];
        assert!(SensitivityRequest::cross(one.clone()).validate().is_err());
        let six = SensitivityVariable::ALL[..6].iter().copied().map(VariableSweep::new).collect();
        assert!(SensitivityRequest::single(six).validate().is_err());
        assert!(SensitivityRequest::single(one).validate().is_ok());
    }

    #[test]
    fn scaling_touches_one_field() {
        let base = inputs();
        let s = SensitivityVariable::Viscosity.scaled(&base, dec!(10));
        assert_eq!(s.fluid.viscosity_cst, dec!(22));
        assert_eq!(s.fluid.density_kg_m3, base.fluid.density_kg_m3);
        assert_eq!(s.geometry, base.geometry);
    }

    #[test]
    fn flow_rate_raises_friction() {
        let engine = HydraulicEngine::default();
        let request = SensitivityRequest::single(vec![VariableSweep::new(SensitivityVariable::FlowRate)]);
        let report = run_sensitivity(&engine, &inputs(), &request).unwrap();
        let v = &report.variables[0];
        assert_eq!(v.base_value, dec!(850));
        assert_eq!(v.points.len(), 9);
        assert_eq!(v.trend, Trend::Increasing);
        // smooth regime: h ∝ Q^1.75
        assert!(v.coefficient > dec!(1.5) && v.coefficient < dec!(2.1), "{}", v.coefficient);
        assert_eq!(report.ranking[0].level, SensitivityLevel::High);
        assert_eq!(report.total_calculations, 10);
        let zero = v.points.iter().find(|p| p.change_percent.is_zero()).unwrap();
        assert_eq!(zero.friction_change_percent, Real::ZERO);
    }

    #[test]
    fn inlet_pressure_leaves_friction_flat() {
        let engine = HydraulicEngine::default();
        let request = SensitivityRequest::single(vec![
            VariableSweep::new(SensitivityVariable::InletPressure),
            VariableSweep::new(SensitivityVariable::Length),
        ]);
        let report = run_sensitivity(&engine, &inputs(), &request).unwrap();
        let pressure = &report.variables[0];
        assert_eq!(pressure.trend, Trend::Flat);
        assert_eq!(pressure.coefficient, Real::ZERO);
        // length is linear in friction loss
        assert_eq!(report.ranking[0].variable, SensitivityVariable::Length);
        assert_eq!(report.ranking[1].rank, 2);
        assert!(report.cross.is_none());
    }

    #[test]
    fn invalid_points_are_skipped() {
        let engine = HydraulicEngine::default();
        let mut base = inputs();
        // 20 mm bore
        base.geometry.wall_thickness_mm = dec!(200);
        base.geometry.outer_diameter_mm = dec!(420);
        let request = SensitivityRequest::single(vec![
            VariableSweep::new(SensitivityVariable::OuterDiameter).with_range(dec!(-10), dec!(0), dec!(5)),
        ]);
        let report = run_sensitivity(&engine, &base, &request).unwrap();
        // 378 mm and 399 mm leave no bore
        assert_eq!(report.variables[0].points.len(), 1);
        assert_eq!(report.variables[0].trend, Trend::Unknown);
    }

    #[test]
    fn cross_grid_is_three_by_three() {
        let engine = HydraulicEngine::default();
        let request = SensitivityRequest::cross(vec![
            VariableSweep::new(SensitivityVariable::FlowRate),
            VariableSweep::new(SensitivityVariable::Viscosity),
        ]);
        let report = run_sensitivity(&engine, &inputs(), &request).unwrap();
        let grid = report.cross.unwrap();
        assert_eq!(grid.points.len(), 9);
        let centre = &grid.points[4];
        assert_eq!(centre.first_change_percent, Real::ZERO);
        assert_eq!(centre.second_change_percent, Real::ZERO);
        assert_eq!(centre.overall_change_percent, Real::ZERO);
        assert_eq!(report.total_calculations, 1 + 9 + 9 + 9);
    }

    #[test]
    fn levels() {
        assert_eq!(SensitivityLevel::from_coefficient(dec!(1.6)), SensitivityLevel::High);
        assert_eq!(SensitivityLevel::from_coefficient(dec!(1.5)), SensitivityLevel::Medium);
        assert_eq!(SensitivityLevel::from_coefficient(dec!(0.5)), SensitivityLevel::Low);
    }

    #[test]
    fn change_percent_rounds_to_two_places() {
        assert_eq!(change_percent(dec!(3), dec!(4)), dec!(33.33));
        assert_eq!(change_percent(Real::ZERO, dec!(4)), Real::ZERO);
    }
}
