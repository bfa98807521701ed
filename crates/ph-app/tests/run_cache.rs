use ph_app::*;
use ph_core::EngineConfig;
use ph_hydraulics::{
    FluidProperties, OperatingPoint, PipeGeometry, SensitivityRequest, SensitivityVariable,
    VariableSweep,
};
use ph_project::{LATEST_VERSION, Scenario, StationDef};
use ph_results::RunKind;
use ph_station::{EnergyTariff, PumpFamilySpec};
use rust_decimal_macros::dec;
use std::path::PathBuf;

fn scenario(name: &str) -> Scenario {
    Scenario {
        version: LATEST_VERSION,
        name: name.to_string(),
        description: None,
        pipeline: PipeGeometry::new(dec!(150), dec!(508), dec!(9), dec!(0.03), dec!(20)),
        fluid: FluidProperties::new(dec!(860), dec!(20), dec!(20)),
        operating: OperatingPoint::new(dec!(850), dec!(0.3)),
        station: Some(StationDef {
            family_a: PumpFamilySpec::new("ZMI480", dec!(300), dec!(900), dec!(0.82), dec!(0.95), 3),
            family_b: PumpFamilySpec::new("ZMI375", dec!(180), dec!(500), dec!(0.8), dec!(0.95), 2),
            tariff: EnergyTariff::new(dec!(22), dec!(0.62)),
        }),
        sensitivity: Some(SensitivityRequest::single(vec![VariableSweep::new(
            SensitivityVariable::FlowRate,
        )])),
        engine: EngineConfig::default(),
    }
}

/// Fresh directory holding one saved scenario.
fn scenario_file(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ph_app_{test}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("line.yaml");
    save_scenario(&path, &scenario(test)).unwrap();
    path
}

fn request(path: &std::path::Path, operation: RunOperation) -> RunRequest<'_> {
    RunRequest {
        scenario_path: path,
        operation,
        options: RunOptions::default(),
    }
}

#[test]
fn second_run_comes_from_cache() {
    let path = scenario_file("second_run_comes_from_cache");

    let first = ensure_run(&request(&path, RunOperation::Optimize)).unwrap();
    assert!(!first.loaded_from_cache);
    assert_eq!(first.manifest.kind, RunKind::Optimize);

    let second = ensure_run(&request(&path, RunOperation::Optimize)).unwrap();
    assert!(second.loaded_from_cache);
    assert_eq!(first.run_id, second.run_id);
    assert_eq!(first.output, second.output);
    assert_eq!(first.manifest, second.manifest);
}

#[test]
fn no_cache_recomputes_same_result() {
    let path = scenario_file("no_cache_recomputes_same_result");

    let cached = ensure_run(&request(&path, RunOperation::Analyze)).unwrap();
    let mut req = request(&path, RunOperation::Analyze);
    req.options.use_cache = false;
    let fresh = ensure_run(&req).unwrap();

    assert!(!fresh.loaded_from_cache);
    assert_eq!(cached.run_id, fresh.run_id);
    assert_eq!(cached.output, fresh.output);
}

#[test]
fn operations_and_versions_get_distinct_ids() {
    let path = scenario_file("operations_and_versions_get_distinct_ids");

    let analyze = ensure_run(&request(&path, RunOperation::Analyze)).unwrap();
    let optimize = ensure_run(&request(&path, RunOperation::Optimize)).unwrap();
    let sensitivity = ensure_run(&request(&path, RunOperation::Sensitivity(None))).unwrap();
    assert_ne!(analyze.run_id, optimize.run_id);
    assert_ne!(optimize.run_id, sensitivity.run_id);
    assert!(matches!(sensitivity.output, RunOutput::Sensitivity(_)));

    let mut req = request(&path, RunOperation::Analyze);
    req.options.engine_version = "0.0.0-test".to_string();
    let other = ensure_run(&req).unwrap();
    assert!(!other.loaded_from_cache);
    assert_ne!(analyze.run_id, other.run_id);

    let runs = list_runs(&path, None).unwrap();
    assert_eq!(runs.len(), 4);
    assert_eq!(
        list_runs(&path, Some("someone else")).unwrap().len(),
        0
    );
}

#[test]
fn sensitivity_override_changes_the_key() {
    let path = scenario_file("sensitivity_override_changes_the_key");

    let own = ensure_run(&request(&path, RunOperation::Sensitivity(None))).unwrap();
    let other = SensitivityRequest::single(vec![VariableSweep::new(SensitivityVariable::Length)]);
    let overridden =
        ensure_run(&request(&path, RunOperation::Sensitivity(Some(other)))).unwrap();
    assert_ne!(own.run_id, overridden.run_id);
}

#[test]
fn load_and_delete_stored_run() {
    let path = scenario_file("load_and_delete_stored_run");

    let run = ensure_run(&request(&path, RunOperation::Analyze)).unwrap();
    let (manifest, output) = load_run(&path, &run.run_id).unwrap();
    assert_eq!(manifest.run_id, run.run_id);
    assert_eq!(output, run.output);

    delete_run(&path, &run.run_id).unwrap();
    assert!(matches!(
        load_run(&path, &run.run_id),
        Err(AppError::RunNotFound(_))
    ));
}

#[test]
fn missing_scenario_file_is_reported() {
    let path = std::env::temp_dir()
        .join("ph_app_missing_scenario_file")
        .join("absent.yaml");
    let err = ensure_run(&request(&path, RunOperation::Analyze)).unwrap_err();
    assert!(matches!(err, AppError::ScenarioFileRead { .. }));
}
