//! u-cvrp - command line interface
//!
//! Solves a TSPLIB-style CVRP instance with ALNS and writes the best routes
//! for plotting.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use u_cvrp::alns::{AlnsConfig, AlnsResult, AlnsRunner};
use u_cvrp::constructive::nearest_neighbor;
use u_cvrp::evaluation::check_solution;
use u_cvrp::io::{export_solution, load_instance};
use u_cvrp::models::Instance;

#[derive(Parser)]
#[command(name = "u-cvrp")]
#[command(version)]
#[command(about = "Capacitated vehicle routing with adaptive large neighborhood search")]
struct Cli {
    /// Path to the instance file
    instance: PathBuf,

    /// Random seed (drawn at random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Maximum number of iterations
    #[arg(short, long, default_value = "50000")]
    iterations: usize,

    /// Time limit in seconds
    #[arg(short, long, default_value = "120")]
    time_limit: f64,

    /// Route file for plotting
    #[arg(short, long, default_value = "solution_data.txt")]
    output: PathBuf,

    /// Write a JSON run report to this file
    #[arg(long)]
    summary: Option<PathBuf>,
}

#[derive(Serialize)]
struct RunSummary<'a> {
    instance: &'a Path,
    dimension: usize,
    capacity: i32,
    config: &'a AlnsConfig,
    seed: u64,
    initial_cost: i64,
    best_cost: i64,
    routes: Vec<Vec<usize>>,
    iterations: usize,
    improvements: usize,
    reheats: usize,
    time_limit_hit: bool,
    elapsed_secs: f64,
    destroy_weights: &'a [f64],
    repair_weights: &'a [f64],
    cost_history: &'a [i64],
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    let instance = load_instance(&cli.instance)
        .with_context(|| format!("failed to load instance {}", cli.instance.display()))?;
    println!(
        "Instance: {} nodes | Cap: {}",
        instance.dimension(),
        instance.capacity()
    );

    let time_limit = Duration::try_from_secs_f64(cli.time_limit)
        .with_context(|| format!("invalid time limit {}", cli.time_limit))?;
    let mut config = AlnsConfig::default()
        .with_max_iterations(cli.iterations)
        .with_time_limit(Some(time_limit));
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let initial = nearest_neighbor(&instance);
    println!("Initial solution (NN): {}", initial.total_cost);

    let result = AlnsRunner::run_from(&instance, &config, initial, None, |imp| {
        println!(
            "Iter {} | New best: {} [{}+{}]",
            imp.iteration,
            imp.cost,
            imp.destroy.label(),
            imp.repair.label()
        );
    })
    .map_err(anyhow::Error::msg)
    .context("invalid search configuration")?;

    if result.time_limit_hit {
        println!("Time limit ({}s) reached.", cli.time_limit);
    }
    let violations = check_solution(&result.best, &instance);
    if !violations.is_empty() {
        log::debug!("best solution violations: {violations:?}");
    }

    println!("\n===============================");
    println!("Best cost: {}", result.best_cost);
    println!("Time: {:.3}s", result.elapsed.as_secs_f64());
    println!("===============================");

    export_solution(&result.best, &instance, &cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    if let Some(path) = &cli.summary {
        write_summary(path, &cli.instance, &instance, &config, &result)?;
    }
    Ok(())
}

fn write_summary(
    path: &Path,
    instance_path: &Path,
    instance: &Instance,
    config: &AlnsConfig,
    result: &AlnsResult,
) -> Result<()> {
    let summary = RunSummary {
        instance: instance_path,
        dimension: instance.dimension(),
        capacity: instance.capacity(),
        config,
        seed: result.seed,
        initial_cost: result.initial_cost,
        best_cost: result.best_cost,
        routes: result.best.paths(),
        iterations: result.iterations,
        improvements: result.improvements,
        reheats: result.reheats,
        time_limit_hit: result.time_limit_hit,
        elapsed_secs: result.elapsed.as_secs_f64(),
        destroy_weights: &result.destroy_weights,
        repair_weights: &result.repair_weights,
        cost_history: &result.cost_history,
    };
    let json = serde_json::to_string_pretty(&summary).context("failed to serialize summary")?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
