// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gain Estimator - Monte Carlo Property Audit
//
// Each scenario runs N times with seeds base..base+N-1. A run draws one
// form submission, estimates it twice and renders the result view, then
// checks the engine's invariants on the output.

use gain_estimator::fields::{fields_for, Unit};
use gain_estimator::format::plain_decimal;
use gain_estimator::indicators::{compute_with, growth_inputs};
use gain_estimator::numeric::Bounds;
use gain_estimator::{Assumptions, Estimator, ModelVariant, ParameterSet, RawValue};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::report::*;
use crate::scenarios::{InputProfile, Scenario};

const GARBAGE: [&str; 9] = ["abc", "", "   ", "N/A", "€€", "1e400", ",,", "-", "--5"];

// ─── Input Generation ───────────────────────────────────────────────────────

fn plausible(rng: &mut ChaCha8Rng, unit: Unit) -> f64 {
    match unit {
        Unit::Euro => 10f64.powf(rng.gen_range(3.0..6.7)).round(),
        Unit::Percent => (rng.gen_range(0.0..100.0_f64) * 10.0).round() / 10.0,
        Unit::Years => rng.gen_range(0.5..25.0),
        Unit::Months => rng.gen_range(1.0..24.0_f64).round(),
        Unit::PerMonth => rng.gen_range(0.0..40.0_f64).round(),
        Unit::Multiple => rng.gen_range(1.0..15.0),
    }
}

fn hostile(rng: &mut ChaCha8Rng, unit: Unit) -> RawValue {
    match rng.gen_range(0..4) {
        0 => RawValue::Text(GARBAGE.choose(rng).copied().unwrap_or_default().to_string()),
        1 => RawValue::Number(rng.gen_range(1e12..1e15)),
        2 => RawValue::Text(format!("{}abc", plausible(rng, unit).round())),
        _ => RawValue::Number(plausible(rng, unit) * 10.0),
    }
}

/// Draw one form submission for `model`.
pub fn draw_parameters(rng: &mut ChaCha8Rng, model: ModelVariant, profile: InputProfile) -> ParameterSet {
    let mut params = ParameterSet::new();
    if profile == InputProfile::Empty {
        return params;
    }
    for field in fields_for(model) {
        match profile {
            InputProfile::Typical => params.insert(field.key, plausible(rng, field.unit)),
            InputProfile::Sparse => match rng.gen_range(0..3) {
                0 => params.insert(field.key, plausible(rng, field.unit)),
                1 => params.insert(field.key, ""),
                _ => {}
            },
            InputProfile::TextEntry => {
                let v = plausible(rng, field.unit);
                params.insert(field.key, plain_decimal(v));
            }
            InputProfile::Hostile => params.insert(field.key, hostile(rng, field.unit)),
            InputProfile::Empty => {}
        }
    }
    params
}

// ─── Property Checks ────────────────────────────────────────────────────────

fn margin_bounds(model: ModelVariant, a: &Assumptions) -> Option<Bounds> {
    match model {
        ModelVariant::Recurring => a.recurring.incremental_margin_pct.bounds,
        ModelVariant::Projects => a.projects.operating_margin_pct.bounds,
        ModelVariant::Transactions => a.transactions.net_margin_pct.bounds,
        ModelVariant::Financing => a.financing.net_margin_pct.bounds,
        ModelVariant::AssetManagement => a.asset_management.net_margin_pct.bounds,
    }
}

fn is_clean(display: &str) -> bool {
    !display.is_empty() && !display.contains("NaN") && !display.contains("inf")
}

/// Run one seeded draw through the engine and the result view.
pub fn run_single(scenario: &Scenario, estimator: &Estimator, seed: u64) -> RunOutcome {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let params = draw_parameters(&mut rng, scenario.model, scenario.profile);

    let first = estimator.estimate(scenario.model, &params);
    let second = estimator.estimate(scenario.model, &params);
    let units = first.details.additional_units_per_year().unwrap_or(f64::NAN);

    let view = compute_with(estimator, scenario.model, &params);
    let view_again = compute_with(estimator, scenario.model, &params);
    let same_view = match (serde_json::to_string(&view), serde_json::to_string(&view_again)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };

    let growth = growth_inputs(estimator, scenario.model, &params);
    let months = estimator.assumptions().growth.months_per_year;
    let expected_units = growth.intros_per_month * growth.conversion_pct / 100.0 * growth.uplift * months;
    let tolerance = scenario.criteria.units_tolerance * expected_units.abs().max(1.0);

    let margin_in_bounds = match (
        first.details.margin_pct(),
        margin_bounds(scenario.model, estimator.assumptions()),
    ) {
        (Some(m), Some(bounds)) => bounds.contains(m),
        (Some(_), None) => true,
        (None, _) => false,
    };

    let bad_display = view
        .all()
        .find(|i| !is_clean(&i.display) || i.label.is_empty())
        .map(|i| format!("{}: {:?}", i.key, i.display));

    let details_finite = first.details.entries().iter().all(|(_, v)| v.is_finite());

    RunOutcome {
        seed,
        provided_keys: params.len(),
        additional_revenue: first.additional_revenue,
        valuation_gain: first.valuation_gain,
        additional_units: units,
        deterministic: first == second && same_view,
        finite: first.additional_revenue.is_finite()
            && first.valuation_gain.is_finite()
            && details_finite,
        non_negative: first.additional_revenue >= 0.0
            && first.valuation_gain >= 0.0
            && units >= 0.0,
        margin_in_bounds,
        units_match_growth: (units - expected_units).abs() <= tolerance,
        rendering_clean: bad_display.is_none() && view.context.intros.is_finite(),
        bad_display,
    }
}

// ─── Monte Carlo Runner ─────────────────────────────────────────────────────

/// Run a scenario `n_runs` times and aggregate the outcomes.
pub fn run_monte_carlo(scenario: &Scenario, estimator: &Estimator, n_runs: usize, base_seed: u64) -> ScenarioReport {
    let mut revenue = Vec::with_capacity(n_runs);
    let mut valuation = Vec::with_capacity(n_runs);
    let mut units = Vec::with_capacity(n_runs);
    let mut violations = CheckTally::default();
    let mut failing_runs = Vec::new();
    let mut passed = 0usize;

    for i in 0..n_runs {
        let run = run_single(scenario, estimator, base_seed.wrapping_add(i as u64));
        revenue.push(run.additional_revenue);
        valuation.push(run.valuation_gain);
        units.push(run.additional_units);
        violations.absorb(&run);
        if run.pass() {
            passed += 1;
        } else {
            tracing::debug!(scenario = %scenario.name, seed = run.seed, "run failed");
            failing_runs.push(run);
        }
    }

    ScenarioReport {
        scenario_name: scenario.name.clone(),
        label: scenario.label.clone(),
        model: scenario.model.tag().to_string(),
        n_runs,
        pass_rate: if n_runs == 0 { 1.0 } else { passed as f64 / n_runs as f64 },
        violations,
        additional_revenue: Stats::from_samples(&revenue),
        valuation_gain: Stats::from_samples(&valuation),
        additional_units: Stats::from_samples(&units),
        failing_runs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::all_scenarios;
    use gain_estimator::format::PLACEHOLDER;

    #[test]
    fn same_seed_draws_same_parameters() {
        for profile in [InputProfile::Typical, InputProfile::Hostile] {
            let mut a = ChaCha8Rng::seed_from_u64(7);
            let mut b = ChaCha8Rng::seed_from_u64(7);
            assert_eq!(
                draw_parameters(&mut a, ModelVariant::Financing, profile),
                draw_parameters(&mut b, ModelVariant::Financing, profile)
            );
        }
    }

    #[test]
    fn empty_profile_answers_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(draw_parameters(&mut rng, ModelVariant::Recurring, InputProfile::Empty).is_empty());
    }

    #[test]
    fn every_scenario_passes_a_short_run() {
        let estimator = Estimator::default();
        for scenario in all_scenarios() {
            let report = run_monte_carlo(&scenario, &estimator, 5, 42);
            assert_eq!(report.violations.total(), 0, "{}: {:?}", scenario.name, report.failing_runs);
        }
    }

    #[test]
    fn placeholder_counts_as_clean() {
        assert!(is_clean(PLACEHOLDER));
        assert!(!is_clean(""));
        assert!(!is_clean("NaN €"));
    }
}
