use clap::{Parser, Subcommand, ValueEnum};
use ph_app::{
    AppError, AppResult, RunOperation, RunOptions, RunOutput, RunRequest, RunResponse,
    run_service, scenario_service,
};
use ph_hydraulics::{
    HydraulicResult, SensitivityReport, SensitivityRequest, SensitivityVariable, VariableSweep,
};
use ph_station::OptimizationResult;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pipehydra")]
#[command(about = "PipeHydra - pipeline hydraulics and pump station optimization", long_about = None)]
struct Cli {
    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a scenario file
    Validate {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// Steady-state hydraulics of the pipeline at the scenario's operating point
    Analyze {
        scenario_path: PathBuf,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// List every pump combination of the scenario's station
    Enumerate { scenario_path: PathBuf },
    /// Find the lowest-energy feasible pump combination
    Optimize {
        scenario_path: PathBuf,
        /// Rows of the ranking to print
        #[arg(long, default_value_t = 10)]
        top: usize,
        #[arg(long)]
        no_cache: bool,
    },
    /// Sweep inputs and rank them by their effect on friction loss
    Sensitivity {
        scenario_path: PathBuf,
        /// Variable to sweep; repeat for several. Defaults to the scenario's section.
        #[arg(long = "variable", value_enum)]
        variables: Vec<VariableArg>,
        /// Add a 3x3 grid over the first two variables
        #[arg(long)]
        cross: bool,
        /// Sweep start (%)
        #[arg(long, default_value = "-20", allow_hyphen_values = true)]
        start: Decimal,
        /// Sweep end (%)
        #[arg(long, default_value = "20")]
        end: Decimal,
        /// Sweep step (%)
        #[arg(long, default_value = "5")]
        step: Decimal,
        #[arg(long)]
        no_cache: bool,
    },
    /// List cached runs next to a scenario
    Runs {
        scenario_path: PathBuf,
        /// Only runs recorded for this scenario name
        #[arg(long)]
        name: Option<String>,
    },
    /// Show a cached run
    ShowRun {
        scenario_path: PathBuf,
        run_id: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariableArg {
    FlowRate,
    Density,
    Viscosity,
    Length,
    OuterDiameter,
    Roughness,
    InletPressure,
    Elevation,
}

impl From<VariableArg> for SensitivityVariable {
    fn from(arg: VariableArg) -> Self {
        match arg {
            VariableArg::FlowRate => SensitivityVariable::FlowRate,
            VariableArg::Density => SensitivityVariable::Density,
            VariableArg::Viscosity => SensitivityVariable::Viscosity,
            VariableArg::Length => SensitivityVariable::Length,
            VariableArg::OuterDiameter => SensitivityVariable::OuterDiameter,
            VariableArg::Roughness => SensitivityVariable::Roughness,
            VariableArg::InletPressure => SensitivityVariable::InletPressure,
            VariableArg::Elevation => SensitivityVariable::ElevationDifference,
        }
    }
}

fn main() -> AppResult<()> {
    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,ph_hydraulics=error")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path, json),
        Commands::Analyze {
            scenario_path,
            no_cache,
        } => cmd_run(&scenario_path, RunOperation::Analyze, !no_cache, json, 0),
        Commands::Enumerate { scenario_path } => cmd_enumerate(&scenario_path, json),
        Commands::Optimize {
            scenario_path,
            top,
            no_cache,
        } => cmd_run(&scenario_path, RunOperation::Optimize, !no_cache, json, top),
        Commands::Sensitivity {
            scenario_path,
            variables,
            cross,
            start,
            end,
            step,
            no_cache,
        } => {
            let request = sensitivity_request(&variables, cross, start, end, step);
            cmd_run(
                &scenario_path,
                RunOperation::Sensitivity(request),
                !no_cache,
                json,
                0,
            )
        }
        Commands::Runs {
            scenario_path,
            name,
        } => cmd_runs(&scenario_path, name.as_deref(), json),
        Commands::ShowRun {
            scenario_path,
            run_id,
        } => cmd_show_run(&scenario_path, &run_id, json),
    }
}

fn sensitivity_request(
    variables: &[VariableArg],
    cross: bool,
    start: Decimal,
    end: Decimal,
    step: Decimal,
) -> Option<SensitivityRequest> {
    if variables.is_empty() {
        return None;
    }
    let sweeps = variables
        .iter()
        .map(|&v| VariableSweep::new(v.into()).with_range(start, end, step))
        .collect();
    Some(if cross {
        SensitivityRequest::cross(sweeps)
    } else {
        SensitivityRequest::single(sweeps)
    })
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_validate(scenario_path: &Path, json: bool) -> AppResult<()> {
    let scenario = scenario_service::load_scenario(scenario_path)?;
    scenario_service::validate_scenario(&scenario)?;
    let summary = scenario_service::summarize(&scenario);
    if json {
        return print_json(&serde_json::json!({
            "valid": true,
            "name": summary.name,
            "version": summary.version,
            "combinations": summary.combination_count,
        }));
    }
    println!("✓ Scenario '{}' is valid (version {})", summary.name, summary.version);
    if summary.has_station {
        println!(
            "  Station: {} installed units, {} combinations",
            summary.installed_units, summary.combination_count
        );
    }
    if summary.sensitivity_variables > 0 {
        println!("  Sensitivity variables: {}", summary.sensitivity_variables);
    }
    Ok(())
}

fn cmd_enumerate(scenario_path: &Path, json: bool) -> AppResult<()> {
    let scenario = scenario_service::load_scenario(scenario_path)?;
    let def = scenario.station.as_ref().ok_or_else(|| AppError::MissingSection {
        scenario: scenario.name.clone(),
        section: "station",
    })?;
    let station = def.pumps();
    let rows: Vec<_> = station
        .combinations()
        .map(|c| {
            serde_json::json!({
                "family_a": c.family_a,
                "family_b": c.family_b,
                "head_added_m": station.head_added_m(c),
                "power_kw": station.power_kw(c),
            })
        })
        .collect();
    if json {
        return print_json(&rows);
    }

    println!(
        "{} combinations of {} (A, max {}) and {} (B, max {}):",
        rows.len(),
        def.family_a.name,
        def.family_a.max_units,
        def.family_b.name,
        def.family_b.max_units
    );
    println!("  {:>3}  {:>5}  {:>12}  {:>10}", "#", "A+B", "head (m)", "power (kW)");
    for (i, c) in station.combinations().enumerate() {
        println!(
            "  {:>3}  {:>5}  {:>12}  {:>10}",
            i + 1,
            c.to_string(),
            station.head_added_m(c).normalize(),
            station.power_kw(c).normalize()
        );
    }
    Ok(())
}

fn cmd_run(
    scenario_path: &Path,
    operation: RunOperation,
    use_cache: bool,
    json: bool,
    top: usize,
) -> AppResult<()> {
    let request = RunRequest {
        scenario_path,
        operation,
        options: RunOptions {
            use_cache,
            ..RunOptions::default()
        },
    };
    let response = run_service::ensure_run(&request)?;
    if json {
        return print_json(&response.output);
    }

    print_run_header(&response);
    print_output(&response.output, top);
    Ok(())
}

fn print_run_header(response: &RunResponse) {
    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!(
            "✓ {} completed in {:.3}s: {}",
            response.manifest.kind, response.timing.compute_time_s, response.run_id
        );
    }
}

fn print_output(output: &RunOutput, top: usize) {
    match output {
        RunOutput::Analyze(result) => print_hydraulics(result),
        RunOutput::Optimize(result) => print_optimization(result, top),
        RunOutput::Sensitivity(report) => print_sensitivity(report),
    }
}

fn print_hydraulics(r: &HydraulicResult) {
    println!("Hydraulics:");
    println!("  Velocity:            {} m/s", r.velocity_mps.normalize());
    println!("  Mass flow:           {} kg/s", r.mass_flow_kgps.normalize());
    println!("  Reynolds number:     {}", r.reynolds.normalize());
    println!("  Relative roughness:  {}", r.relative_roughness.normalize());
    println!("  Flow regime:         {}", r.regime.label());
    println!("  β / m:               {} / {}", r.beta.normalize(), r.m.normalize());
    println!("  Friction factor:     {}", r.friction_factor.normalize());
    println!("  Hydraulic gradient:  {}", r.hydraulic_gradient.normalize());
    println!("  Friction loss:       {} m", r.friction_head_loss_m.normalize());
    println!("  Station loss:        {} m", r.station_loss_m.normalize());
    println!("  Elevation head:      {} m", r.elevation_head_m.normalize());
    println!("  Total head loss:     {} m", r.total_head_loss_m.normalize());
    println!(
        "  Pressure:            {} → {} MPa",
        r.inlet_pressure_mpa.normalize(),
        r.outlet_pressure_mpa.normalize()
    );
    if r.feasible {
        println!("  ✓ Feasible");
    } else {
        println!("  ✗ Infeasible");
    }
    if let Some(msg) = &r.diagnostic {
        println!("  {msg}");
    }
}

fn print_optimization(result: &OptimizationResult, top: usize) {
    println!(
        "Evaluated {} combinations, {} feasible",
        result.evaluated.len(),
        result.feasible_count()
    );
    match &result.optimal {
        Some(best) => {
            println!(
                "Optimal: {} ({} kW, {} kWh/day, cost {}/day, {}/year)",
                best.combination,
                best.power_kw.normalize(),
                best.daily_energy_kwh.normalize(),
                best.daily_cost.normalize(),
                best.annual_cost.normalize()
            );
            println!(
                "  Outlet pressure: {} MPa (inlet boosted to {} MPa)",
                best.hydraulics.outlet_pressure_mpa.normalize(),
                best.adjusted_inlet_pressure_mpa.normalize()
            );
        }
        None => println!("✗ No feasible configuration"),
    }
    if let Some(msg) = &result.diagnostic {
        println!("  {msg}");
    }
    if result.ranking.is_empty() || top == 0 {
        return;
    }

    println!();
    println!(
        "  {:>4}  {:>5}  {:>10}  {:>12}  {:>12}",
        "rank", "A+B", "power (kW)", "kWh/day", "outlet (MPa)"
    );
    for (i, c) in result.ranking.iter().take(top).enumerate() {
        println!(
            "  {:>4}  {:>5}  {:>10}  {:>12}  {:>12}",
            i + 1,
            c.combination.to_string(),
            c.power_kw.normalize(),
            c.daily_energy_kwh.normalize(),
            c.hydraulics.outlet_pressure_mpa.normalize()
        );
    }
}

fn print_sensitivity(report: &SensitivityReport) {
    println!(
        "Base: friction loss {} m, outlet {} MPa ({} calculations)",
        report.base.friction_head_loss_m.normalize(),
        report.base.outlet_pressure_mpa.normalize(),
        report.total_calculations
    );
    for v in &report.variables {
        println!();
        println!(
            "{} (base {} {}): coefficient {}, trend {:?}, max impact {}%",
            v.variable,
            v.base_value.normalize(),
            v.variable.unit(),
            v.coefficient.normalize(),
            v.trend,
            v.max_impact_percent.normalize()
        );
        println!(
            "  {:>8}  {:>14}  {:>10}  {:>14}  {:>10}",
            "change %", "friction (m)", "Δ %", "outlet (MPa)", "Δ %"
        );
        for p in &v.points {
            println!(
                "  {:>8}  {:>14}  {:>10}  {:>14}  {:>10}",
                p.change_percent.normalize(),
                p.friction_head_loss_m.round_dp(2),
                p.friction_change_percent,
                p.outlet_pressure_mpa.round_dp(4),
                p.pressure_change_percent
            );
        }
    }

    if !report.ranking.is_empty() {
        println!();
        println!("Ranking:");
        for r in &report.ranking {
            println!(
                "  {}. {} - {} ({:?})",
                r.rank,
                r.variable,
                r.coefficient.normalize(),
                r.level
            );
        }
    }

    if let Some(grid) = &report.cross {
        println!();
        println!("Cross {} × {}:", grid.first, grid.second);
        for p in &grid.points {
            println!(
                "  {:>4}% / {:>4}%  friction {} m  outlet {} MPa{}",
                p.first_change_percent.normalize(),
                p.second_change_percent.normalize(),
                p.friction_head_loss_m.round_dp(2),
                p.outlet_pressure_mpa.round_dp(4),
                if p.feasible { "" } else { "  ✗" }
            );
        }
    }
}

fn cmd_runs(scenario_path: &Path, name: Option<&str>, json: bool) -> AppResult<()> {
    let runs = run_service::list_runs(scenario_path, name)?;
    if json {
        return print_json(&runs);
    }
    if runs.is_empty() {
        println!("No cached runs");
        return Ok(());
    }
    println!("Cached runs:");
    for run in runs {
        println!(
            "  {}  {:<11}  {}  {}",
            run.run_id, run.kind, run.timestamp, run.scenario_name
        );
    }
    Ok(())
}

fn cmd_show_run(scenario_path: &Path, run_id: &str, json: bool) -> AppResult<()> {
    let (manifest, output) = run_service::load_run(scenario_path, run_id)?;
    if json {
        return print_json(&output);
    }
    println!("Run {}", manifest.run_id);
    println!("  Kind:      {}", manifest.kind);
    println!("  Scenario:  {}", manifest.scenario_name);
    println!("  Timestamp: {}", manifest.timestamp);
    println!("  Engine:    {}", manifest.engine_version);
    println!();
    print_output(&output, usize::MAX);
    Ok(())
}
