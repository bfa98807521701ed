//! ph-hydraulics: steady single-segment pipeline hydraulics.
//!
//! Pipeline: inputs → Reynolds number → regime classification → friction terms → pressure
//! balance → feasibility verdict. Sensitivity sweeps re-run the same engine with one or two
//! inputs perturbed.

pub mod engine;
pub mod error;
pub mod friction;
pub mod model;
pub mod regime;
pub mod sensitivity;

pub use engine::{HydraulicEngine, HydraulicResult, analyze_hydraulics};
pub use error::{EngineResult, HydraulicError};
pub use friction::{FrictionTerms, compute_friction};
pub use model::{FluidProperties, HydraulicInputs, OperatingPoint, PipeGeometry};
pub use regime::{FlowRegime, Regime, classify, mixed_upper_limit, smooth_upper_limit};
pub use sensitivity::{
    AnalysisKind, SensitivityLevel, SensitivityReport, SensitivityRequest, SensitivityVariable,
    Trend, VariableSweep, run_sensitivity,
};
