use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::config::AppConfig;
use crate::data::base::{load_base_data, BaseData};
use crate::data::scenario::SimulationScenario;
use crate::optimizer::monte_carlo::MonteCarloResult;
use crate::optimizer::pareto::{optimize_objectives, ObjectiveGrid};
use crate::optimizer::ranking::compare_scenarios;
use crate::optimizer::risk::assess_risk;
use crate::optimizer::scenario_generator::{generate_scenarios, GenerationRequest};
use crate::optimizer::sensitivity::analyze_sensitivity;
use crate::optimizer::{plan_scenarios_with_progress, PlanRequest};
use crate::parallel::run_simulation_batches;
use crate::sampling::Rng;
use crate::server;

const USAGE: &str =
    "usage: recruitsim <serve|simulate|sensitivity|optimize|generate|compare|risk|plan>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Simulate,
    Sensitivity,
    Optimize,
    Generate,
    Compare,
    Risk,
    Plan,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("simulate") => Some(Command::Simulate),
        Some("sensitivity") => Some(Command::Sensitivity),
        Some("optimize") => Some(Command::Optimize),
        Some("generate") => Some(Command::Generate),
        Some("compare") => Some(Command::Compare),
        Some("risk") => Some(Command::Risk),
        Some("plan") => Some(Command::Plan),
        _ => None,
    }
}

pub fn run_with_args(args: &[String], config: &AppConfig) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(config),
        Some(Command::Simulate) => handle_simulate(args, config),
        Some(Command::Sensitivity) => handle_sensitivity(args, config),
        Some(Command::Optimize) => handle_optimize(args),
        Some(Command::Generate) => handle_generate(args, config),
        Some(Command::Compare) => handle_compare(args, config),
        Some(Command::Risk) => handle_risk(args, config),
        Some(Command::Plan) => handle_plan(args, config),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn handle_serve(config: &AppConfig) -> i32 {
    match server::run_server(config) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

/// `simulate [budget] [weeks] [quality] [iterations] [seed] [--table] [--csv <path>]`
fn handle_simulate(args: &[String], config: &AppConfig) -> i32 {
    let positional = positional_args(args);
    let scenario = scenario_from_args(&positional);
    let iterations = parse_arg(positional.get(3).copied(), "iterations", config.default_iterations);
    let seed = parse_optional_arg::<u64>(positional.get(4).copied(), "seed");
    let as_table = args.iter().any(|arg| arg == "--table");
    let csv_path = flag_value(args, "--csv");

    let mc_config = config.monte_carlo(Some(iterations), seed);
    let result = match run_simulation_batches(&scenario, &mc_config, &config.worker_pool()) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("simulation failed: {err}");
            return 1;
        }
    };

    if let Some(path) = csv_path {
        if let Err(err) = write_outcomes_csv(path, &result) {
            eprintln!("failed to write outcomes csv '{path}': {err}");
            return 1;
        }
    }

    if as_table {
        let stats = &result.statistics;
        println!("iterations\tseed\tmean_hires\tp10_hires\tp50_hires\tp90_hires\tmean_cost\tsuccess_probability");
        println!(
            "{}\t{}\t{:.4}\t{:.1}\t{:.1}\t{:.1}\t{:.2}\t{:.4}",
            result.iterations,
            result.seed,
            stats.mean_hires,
            stats.p10_hires,
            stats.p50_hires,
            stats.p90_hires,
            stats.mean_cost,
            stats.success_probability
        );
        return 0;
    }

    // Raw samples go to the csv export; stdout gets the summary.
    let summary = MonteCarloResult {
        outcomes: Default::default(),
        ..result
    };
    print_json(&summary, "simulation result")
}

/// `sensitivity [budget] [weeks] [quality]`
fn handle_sensitivity(args: &[String], config: &AppConfig) -> i32 {
    let positional = positional_args(args);
    let scenario = scenario_from_args(&positional);
    match analyze_sensitivity(&scenario.parameters, &config.model) {
        Ok(results) => print_json(&results, "sensitivity result"),
        Err(err) => {
            eprintln!("sensitivity analysis failed: {err}");
            1
        }
    }
}

/// `optimize [--capacity <c>]`
///
/// Without `--capacity` the full objective grid is searched.
fn handle_optimize(args: &[String]) -> i32 {
    let grid = match flag_value(args, "--capacity") {
        None => ObjectiveGrid::default(),
        Some(raw) => match raw.parse::<f64>() {
            Ok(capacity) => ObjectiveGrid::with_capacity(capacity),
            Err(_) => {
                eprintln!("invalid capacity '{raw}'");
                return 2;
            }
        },
    };
    match optimize_objectives(&grid) {
        Ok(result) => print_json(&result, "optimization result"),
        Err(err) => {
            eprintln!("optimization failed: {err}");
            1
        }
    }
}

/// `generate [count] [seed]`
fn handle_generate(args: &[String], config: &AppConfig) -> i32 {
    match generated_scenarios(args, config, &[]) {
        Ok(scenarios) => print_json(&scenarios, "scenarios"),
        Err(code) => code,
    }
}

/// `compare [count] [seed] [iterations]`
fn handle_compare(args: &[String], config: &AppConfig) -> i32 {
    let scenarios = match generated_scenarios(args, config, &[]) {
        Ok(scenarios) => scenarios,
        Err(code) => return code,
    };
    let positional = positional_args(args);
    let iterations = parse_arg(positional.get(2).copied(), "iterations", config.comparison_iterations);
    let seed = parse_optional_arg::<u64>(positional.get(1).copied(), "seed");
    let comparison_config = config.comparison(Some(iterations), seed);
    let comparison = config
        .worker_pool()
        .install(|| compare_scenarios(&scenarios, &comparison_config));
    match comparison {
        Ok(Ok(comparison)) => print_json(&comparison, "comparison"),
        Ok(Err(err)) | Err(err) => {
            eprintln!("comparison failed: {err}");
            1
        }
    }
}

/// `risk <base-data.json> [count] [seed]`
fn handle_risk(args: &[String], config: &AppConfig) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: recruitsim risk <base-data.json> [count] [seed]");
        return 2;
    };
    let base = match load_base_data(path) {
        Ok(base) => base,
        Err(err) => {
            eprintln!("risk failed: {err}");
            return 1;
        }
    };
    // Shift past the path so count/seed line up with `generate`.
    let rest: Vec<String> = args
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != 2)
        .map(|(_, arg)| arg.clone())
        .collect();
    let scenarios = match generated_scenarios(&rest, config, &base.zone_ids()) {
        Ok(scenarios) => scenarios,
        Err(code) => return code,
    };
    match assess_risk(&base, &scenarios) {
        Ok(risk) => print_json(&risk, "risk assessment"),
        Err(err) => {
            eprintln!("risk failed: {err}");
            1
        }
    }
}

/// `plan [base-data.json] [seed]`
fn handle_plan(args: &[String], config: &AppConfig) -> i32 {
    let base = match args.get(2).filter(|arg| Path::new(arg).is_file()) {
        Some(path) => match load_base_data(path) {
            Ok(base) => base,
            Err(err) => {
                eprintln!("plan failed: {err}");
                return 1;
            }
        },
        None => BaseData::default(),
    };
    let seed_arg = args.iter().skip(2).find(|arg| arg.parse::<u64>().is_ok());
    let request = PlanRequest {
        iterations: config.comparison_iterations,
        seed: parse_optional_arg::<u64>(seed_arg, "seed").or(config.seed),
        model: config.model.clone(),
        ..PlanRequest::default()
    };
    let progress = |done: usize, total: usize| info!(done, total, "plan progress");
    match plan_scenarios_with_progress(&base, &request, progress) {
        Ok(report) => print_json(&report, "plan"),
        Err(err) => {
            eprintln!("plan failed: {err}");
            1
        }
    }
}

fn generated_scenarios(
    args: &[String],
    config: &AppConfig,
    zones: &[String],
) -> Result<Vec<SimulationScenario>, i32> {
    let positional = positional_args(args);
    let defaults = GenerationRequest::default();
    let count = parse_arg(positional.first().copied(), "count", defaults.count);
    let seed = parse_optional_arg::<u64>(positional.get(1).copied(), "seed")
        .or(config.seed)
        .unwrap_or_else(Rng::entropy_seed);
    let request = GenerationRequest {
        count,
        available_zones: zones.to_vec(),
        ..defaults
    };
    generate_scenarios(&request, &mut Rng::new(seed)).map_err(|err| {
        eprintln!("scenario generation failed: {err}");
        1
    })
}

fn scenario_from_args(positional: &[&String]) -> SimulationScenario {
    let budget = parse_arg(positional.first().copied(), "budget", 300_000.0);
    let weeks = parse_arg(positional.get(1).copied(), "weeks", 12u32);
    let quality = parse_arg(positional.get(2).copied(), "quality", 0.8);
    SimulationScenario::from_budget("cli", "Command line scenario", budget, weeks, quality, Vec::new())
}

#[derive(Serialize)]
struct OutcomeRow {
    iteration: usize,
    hires: u32,
    cost: f64,
    timeline_weeks: f64,
    success_rate: f64,
}

fn write_outcomes_csv(path: &str, result: &MonteCarloResult) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    let outcomes = &result.outcomes;
    for iteration in 0..outcomes.len() {
        writer.serialize(OutcomeRow {
            iteration,
            hires: outcomes.hires[iteration],
            cost: outcomes.costs[iteration],
            timeline_weeks: outcomes.timelines[iteration],
            success_rate: outcomes.success_rates[iteration],
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T, what: &str) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize {what}: {err}");
            1
        }
    }
}

/// Arguments after the command, without flags or flag values.
fn positional_args(args: &[String]) -> Vec<&String> {
    let mut out = Vec::new();
    let mut iter = args.iter().skip(2);
    while let Some(arg) = iter.next() {
        if arg == "--csv" {
            iter.next();
        } else if !arg.starts_with("--") {
            out.push(arg);
        }
    }
    out
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|index| args.get(index + 1))
        .map(String::as_str)
}

fn parse_arg<T>(raw: Option<&String>, name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    raw.and_then(|value| value.parse::<T>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}

fn parse_optional_arg<T: std::str::FromStr>(raw: Option<&String>, name: &str) -> Option<T> {
    let value = raw?;
    match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            eprintln!("invalid {name} '{value}', ignoring");
            None
        }
    }
}
