//! ph-app: service layer shared by the CLI and any other frontend.

pub mod analysis_service;
pub mod error;
pub mod run_service;
pub mod scenario_service;

pub use analysis_service::{
    analyze_hydraulics, analyze_scenario, optimize_pump_station, optimize_scenario,
    run_sensitivity, sensitivity_scenario,
};
pub use error::{AppError, AppResult};
pub use run_service::{
    ENGINE_VERSION, RunOperation, RunOptions, RunOutput, RunRequest, RunResponse, RunTiming,
    delete_run, ensure_run, list_runs, load_run,
};
pub use scenario_service::{
    ScenarioSummary, load_scenario, save_scenario, summarize, validate_scenario,
};
