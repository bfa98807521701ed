//! ph-station: pump-station configuration search.
//!
//! A station has two pump families. Every non-empty combination of running units is
//! evaluated through the hydraulic engine, infeasible combinations are dropped and the
//! remaining ones are ranked by daily energy.

pub mod combination;
pub mod error;
pub mod optimizer;
pub mod pump;
pub mod tariff;

pub use combination::{Combinations, PumpCombination, enumerate_combinations};
pub use error::{StationError, StationResult};
pub use optimizer::{
    CandidateEvaluation, OptimizationResult, evaluate_candidate, optimize, rank_candidates,
    selection_order,
};
pub use pump::{MAX_UNITS_PER_FAMILY, PumpFamilySpec, PumpStation};
pub use tariff::EnergyTariff;
