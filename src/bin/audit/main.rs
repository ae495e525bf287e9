// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gain Estimator - Property Audit Harness
//
// Usage:
//   cargo run --release --bin audit                    # all scenarios, N=200
//   cargo run --release --bin audit -- --runs 1000     # custom N
//   cargo run --release --bin audit -- --seed 99       # custom base seed
//   cargo run --release --bin audit -- recurring       # filter by name
//   cargo run --release --bin audit -- --config a.json # custom assumptions
//
// Logging follows RUST_LOG (default: gain_estimator=info,audit=info).

mod monte_carlo;
mod report;
mod scenarios;

use gain_estimator::{Assumptions, Estimator};
use report::{AuditReport, ScenarioReport, Summary};
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

const RESULTS_DIR: &str = "audit-results";

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: u64,
    filter: Option<String>,
    config: Option<PathBuf>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs { runs: 200, seed: 0, filter: None, config: None };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                if i < args.len() {
                    cli.runs = args[i].parse().unwrap_or(200);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--config" => {
                i += 1;
                if i < args.len() {
                    cli.config = Some(PathBuf::from(&args[i]));
                }
            }
            other if !other.starts_with('-') => {
                cli.filter = Some(other.to_string());
            }
            other => {
                eprintln!("Unknown argument: {}", other);
            }
        }
        i += 1;
    }
    cli
}

fn load_estimator(config: Option<&Path>) -> Result<Estimator, String> {
    let Some(path) = config else {
        return Ok(Estimator::default());
    };
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let assumptions = Assumptions::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))?;
    Ok(Estimator::new(assumptions))
}

fn write_report(report: &AuditReport) -> Result<PathBuf, String> {
    let dir = Path::new(RESULTS_DIR);
    std::fs::create_dir_all(dir).map_err(|e| format!("cannot create {RESULTS_DIR}/: {e}"))?;
    let path = dir.join(format!("audit-{}.json", report.timestamp));
    let json = serde_json::to_string_pretty(report).map_err(|e| format!("cannot serialize report: {e}"))?;
    std::fs::write(&path, json).map_err(|e| format!("cannot write {}: {e}", path.display()))?;
    Ok(path)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gain_estimator=info,audit=info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_args();
    let estimator = match load_estimator(cli.config.as_deref()) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(2);
        }
    };

    let scenarios: Vec<_> = scenarios::all_scenarios()
        .into_iter()
        .filter(|s| match &cli.filter {
            Some(f) => s.name.contains(f.as_str()),
            None => true,
        })
        .collect();

    println!("\n  Gain Estimator — Property Audit");
    println!("  PRNG: ChaCha8Rng | Runs/scenario: {} | Base seed: {}", cli.runs, cli.seed);
    println!("  Scenarios: {}\n", scenarios.len());
    println!("  {:<36} {:>5} {:>14} {:>14} {:>8} {:>6}  {}",
        "Scenario", "Pass", "Revenue μ", "Valuation μ", "Units μ", "Viol.", "Status");
    println!("  {}", "-".repeat(96));

    let suite_start = Instant::now();
    let mut reports: Vec<ScenarioReport> = Vec::with_capacity(scenarios.len());

    for scenario in &scenarios {
        let report = monte_carlo::run_monte_carlo(scenario, &estimator, cli.runs, cli.seed);
        let status = if report.pass_rate >= scenario.criteria.min_pass_rate { "PASS" } else { "FAIL" };

        println!("  {:<36} {:>4}% {:>14.0} {:>14.0} {:>8.1} {:>6}  {}",
            report.scenario_name,
            (report.pass_rate * 100.0) as u32,
            report.additional_revenue.mean,
            report.valuation_gain.mean,
            report.additional_units.mean,
            report.violations.total(),
            status,
        );
        if status == "FAIL" {
            tracing::warn!(scenario = %report.scenario_name, violations = ?report.violations, "property violated");
        }

        reports.push(report);
    }

    // ─── Summary ────────────────────────────────────────────────────────

    let total = reports.len();
    let passed = reports
        .iter()
        .zip(&scenarios)
        .filter(|(r, s)| r.pass_rate >= s.criteria.min_pass_rate)
        .count();
    let failed = total - passed;

    println!("  {}", "-".repeat(96));
    println!("  Total: {}  Passed: {}  Failed: {}  Suite time: {:.1}s\n",
        total, passed, failed, suite_start.elapsed().as_secs_f64());

    // ─── Write JSON Report ──────────────────────────────────────────────

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
        .to_string();

    let report = AuditReport {
        timestamp,
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        n_runs_per_scenario: cli.runs,
        base_seed: cli.seed,
        summary: Summary {
            total,
            passed,
            failed,
            pass_rate: if total == 0 { 1.0 } else { passed as f64 / total as f64 },
        },
        scenarios: reports,
    };

    match write_report(&report) {
        Ok(path) => println!("  Results saved to: {}\n", path.display()),
        Err(e) => tracing::error!("{e}"),
    }

    if failed > 0 {
        std::process::exit(1);
    }
}
