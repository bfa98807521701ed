//! Cached execution of engine operations against a scenario file.
//!
//! A run is keyed by the SHA-256 of everything that determines its output (operation,
//! hydraulic inputs, station or sensitivity section, engine config, engine version). The cache
//! lives in `.pipehydra/runs` next to the scenario and never changes a result, only whether it
//! is recomputed.

use ph_hydraulics::{HydraulicInputs, HydraulicResult, SensitivityReport, SensitivityRequest};
use ph_project::{Scenario, StationDef};
use ph_results::{RunKind, RunManifest, RunStore, compute_run_id};
use ph_station::OptimizationResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use crate::analysis_service;
use crate::error::AppResult;
use crate::scenario_service;

/// Version stamped into run ids and manifests.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Reuse a stored result when one exists; a fresh result is stored either way.
    pub use_cache: bool,
    pub engine_version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            engine_version: ENGINE_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOperation {
    Analyze,
    Optimize,
    /// `None` uses the scenario's own sensitivity section.
    Sensitivity(Option<SensitivityRequest>),
}

impl RunOperation {
    pub fn kind(&self) -> RunKind {
        match self {
            RunOperation::Analyze => RunKind::Analyze,
            RunOperation::Optimize => RunKind::Optimize,
            RunOperation::Sensitivity(_) => RunKind::Sensitivity,
        }
    }
}

pub struct RunRequest<'a> {
    pub scenario_path: &'a Path,
    pub operation: RunOperation,
    pub options: RunOptions,
}

/// Stored result payload, tagged by operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum RunOutput {
    Analyze(HydraulicResult),
    Optimize(OptimizationResult),
    Sensitivity(SensitivityReport),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunTiming {
    pub compute_time_s: f64,
    pub load_cache_time_s: f64,
    pub total_time_s: f64,
}

#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub loaded_from_cache: bool,
    pub output: RunOutput,
    pub timing: RunTiming,
}

#[derive(Serialize)]
struct CacheKey<'a> {
    inputs: HydraulicInputs,
    #[serde(skip_serializing_if = "Option::is_none")]
    station: Option<&'a StationDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sensitivity: Option<&'a SensitivityRequest>,
}

fn cache_key<'a>(scenario: &'a Scenario, operation: &'a RunOperation) -> AppResult<CacheKey<'a>> {
    let (station, sensitivity) = match operation {
        RunOperation::Analyze => (None, None),
        RunOperation::Optimize => (Some(analysis_service::station_of(scenario)?), None),
        RunOperation::Sensitivity(request) => (
            None,
            Some(analysis_service::sensitivity_request_of(
                scenario,
                request.as_ref(),
            )?),
        ),
    };
    Ok(CacheKey {
        inputs: scenario.inputs(),
        station,
        sensitivity,
    })
}

fn execute(scenario: &Scenario, operation: &RunOperation) -> AppResult<RunOutput> {
    Ok(match operation {
        RunOperation::Analyze => RunOutput::Analyze(analysis_service::analyze_scenario(scenario)?),
        RunOperation::Optimize => {
            RunOutput::Optimize(analysis_service::optimize_scenario(scenario)?)
        }
        RunOperation::Sensitivity(request) => RunOutput::Sensitivity(
            analysis_service::sensitivity_scenario(scenario, request.as_ref())?,
        ),
    })
}

/// Load the stored result for this request or compute and store it.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mut timing = RunTiming::default();

    let scenario = scenario_service::load_scenario(request.scenario_path)?;
    let kind = request.operation.kind();
    let key = cache_key(&scenario, &request.operation)?;
    let run_id = compute_run_id(
        kind,
        &key,
        &scenario.engine,
        &request.options.engine_version,
    )?;
    let store = RunStore::for_scenario(request.scenario_path)?;

    if request.options.use_cache && store.has_run(&run_id) {
        let load_started = Instant::now();
        let manifest = store.load_manifest(&run_id)?;
        let output: RunOutput = store.load_result(&run_id)?;
        timing.load_cache_time_s = load_started.elapsed().as_secs_f64();
        timing.total_time_s = started.elapsed().as_secs_f64();
        debug!(%run_id, %kind, "loaded cached run");
        return Ok(RunResponse {
            run_id,
            manifest,
            loaded_from_cache: true,
            output,
            timing,
        });
    }

    let compute_started = Instant::now();
    let output = execute(&scenario, &request.operation)?;
    timing.compute_time_s = compute_started.elapsed().as_secs_f64();

    let manifest = RunManifest::now(
        run_id.clone(),
        kind,
        &scenario.name,
        &request.options.engine_version,
    );
    store.save_run(&manifest, &output)?;
    timing.total_time_s = started.elapsed().as_secs_f64();

    info!(
        %run_id,
        %kind,
        scenario = %scenario.name,
        compute_time_s = timing.compute_time_s,
        "run stored"
    );

    Ok(RunResponse {
        run_id,
        manifest,
        loaded_from_cache: false,
        output,
        timing,
    })
}

/// Stored runs next to a scenario, oldest first; `scenario_name` filters.
pub fn list_runs(scenario_path: &Path, scenario_name: Option<&str>) -> AppResult<Vec<RunManifest>> {
    let store = RunStore::for_scenario(scenario_path)?;
    Ok(store.list_runs(scenario_name)?)
}

pub fn load_run(scenario_path: &Path, run_id: &str) -> AppResult<(RunManifest, RunOutput)> {
    let store = RunStore::for_scenario(scenario_path)?;
    let manifest = store.load_manifest(run_id)?;
    let output = store.load_result(run_id)?;
    Ok((manifest, output))
}

pub fn delete_run(scenario_path: &Path, run_id: &str) -> AppResult<()> {
    let store = RunStore::for_scenario(scenario_path)?;
    Ok(store.delete_run(run_id)?)
}
