// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gain Estimator - Audit Report Types

use serde::Serialize;

// ─── Statistics (per-figure Monte Carlo aggregation) ────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, ci_lower: 0.0, ci_upper: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        let stderr = std_dev / (n as f64).sqrt();
        let z = 1.96; // 95% CI
        Self {
            mean,
            std_dev,
            ci_lower: mean - z * stderr,
            ci_upper: mean + z * stderr,
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }
}

// ─── Property Checks ────────────────────────────────────────────────────────

/// Violations of one property across the runs of a scenario.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckTally {
    pub deterministic: u32,
    pub finite: u32,
    pub non_negative: u32,
    pub margin_in_bounds: u32,
    pub units_match_growth: u32,
    pub rendering_clean: u32,
}

impl CheckTally {
    pub fn total(&self) -> u32 {
        self.deterministic
            + self.finite
            + self.non_negative
            + self.margin_in_bounds
            + self.units_match_growth
            + self.rendering_clean
    }

    pub fn absorb(&mut self, run: &RunOutcome) {
        self.deterministic += u32::from(!run.deterministic);
        self.finite += u32::from(!run.finite);
        self.non_negative += u32::from(!run.non_negative);
        self.margin_in_bounds += u32::from(!run.margin_in_bounds);
        self.units_match_growth += u32::from(!run.units_match_growth);
        self.rendering_clean += u32::from(!run.rendering_clean);
    }
}

// ─── Single-Run Result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub seed: u64,
    pub provided_keys: usize,
    pub additional_revenue: f64,
    pub valuation_gain: f64,
    pub additional_units: f64,
    pub deterministic: bool,
    pub finite: bool,
    pub non_negative: bool,
    pub margin_in_bounds: bool,
    pub units_match_growth: bool,
    pub rendering_clean: bool,
    /// First offending rendered indicator, if any.
    pub bad_display: Option<String>,
}

impl RunOutcome {
    pub fn pass(&self) -> bool {
        self.deterministic
            && self.finite
            && self.non_negative
            && self.margin_in_bounds
            && self.units_match_growth
            && self.rendering_clean
    }
}

// ─── Monte Carlo Report (per-scenario aggregation) ──────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub scenario_name: String,
    pub label: String,
    pub model: String,
    pub n_runs: usize,
    pub pass_rate: f64,
    pub violations: CheckTally,
    pub additional_revenue: Stats,
    pub valuation_gain: Stats,
    pub additional_units: Stats,
    /// Only failing runs are kept, to keep the report readable.
    pub failing_runs: Vec<RunOutcome>,
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AuditReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub n_runs_per_scenario: usize,
    pub base_seed: u64,
    pub summary: Summary,
    pub scenarios: Vec<ScenarioReport>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
}
