// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gain Estimator - Indicator Evaluation

//! Evaluation of the result configuration map.
//!
//! Volume projections are computed first. A [`ComputeContext`] is derived
//! from them so that value projections quote the same client figures the
//! view shows right above them.

use crate::estimation::Estimator;
use crate::fields::growth_keys;
use crate::format::{
    format_currency_compact, format_value, plain_number, round_half_away, DisplayFormat,
    IndicatorValue, PLACEHOLDER,
};
use crate::results_config::{
    self, Basis, GrowthInputs, IndicatorDef, Layout, ModelConfig, SectionTitles,
};
use crate::types::{Details, Estimate, ModelVariant, ParameterSet};
use serde::Serialize;

const INTROS_KEY: &str = "additionalIntros";
const CLIENTS_KEY: &str = "clientsPerQuarter";

/// Figures shared with the value projections.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeContext {
    /// Additional introductions per quarter (upper bound when a range).
    pub intros: f64,
    /// Rendered clients-per-quarter figure, e.g. `8 - 12`.
    pub clients_range: String,
}

impl ComputeContext {
    fn from_volume(volume: &[RenderedIndicator]) -> Self {
        let find = |key: &str| volume.iter().find(|i| i.key == key).map(|i| i.value);
        Self {
            intros: find(INTROS_KEY).map(|v| v.headline()).unwrap_or(0.0),
            clients_range: find(CLIENTS_KEY)
                .map(|v| clients_range(&v))
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
        }
    }
}

/// Clients figure quoted in narratives.
///
/// A range renders as `min - max`. A point estimate is rounded to one
/// decimal, then widened to `floor(×0.9) - ceil(×1.1)`, collapsing to a
/// single number when both ends agree.
pub fn clients_range(value: &IndicatorValue) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    match *value {
        IndicatorValue::Range { min, max } => {
            format!("{} - {}", plain_number(min), plain_number(max))
        }
        IndicatorValue::Number(n) => {
            let rounded = round_half_away(n, 1);
            let min = (rounded * 0.9).floor();
            let max = (rounded * 1.1).ceil();
            if min == max {
                plain_number(min)
            } else {
                format!("{} - {}", plain_number(min), plain_number(max))
            }
        }
    }
}

// ─── Rendered Output ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedIndicator {
    pub key: &'static str,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footnote: Option<String>,
    pub format: DisplayFormat,
    pub value: IndicatorValue,
    pub display: String,
    /// `Md€/M€/k€` rendering, currency indicators only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_width: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    YourFiguresValue,
    YourFiguresVolume,
    ProjectionsVolume,
    ProjectionsValue,
}

/// Everything the result view displays for one model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultValues {
    pub model: ModelVariant,
    pub layout: Layout,
    pub section_titles: SectionTitles,
    pub your_figures_value: Vec<RenderedIndicator>,
    pub your_figures_volume: Vec<RenderedIndicator>,
    pub projections_volume: Vec<RenderedIndicator>,
    pub projections_value: Vec<RenderedIndicator>,
    pub context: ComputeContext,
}

impl ResultValues {
    fn empty(model: ModelVariant) -> Self {
        Self {
            model,
            layout: results_config::layout(model),
            section_titles: *results_config::section_titles(model),
            your_figures_value: Vec::new(),
            your_figures_volume: Vec::new(),
            projections_volume: Vec::new(),
            projections_value: Vec::new(),
            context: ComputeContext::default(),
        }
    }

    pub fn group(&self, group: Group) -> &[RenderedIndicator] {
        match group {
            Group::YourFiguresValue => &self.your_figures_value,
            Group::YourFiguresVolume => &self.your_figures_volume,
            Group::ProjectionsVolume => &self.projections_volume,
            Group::ProjectionsValue => &self.projections_value,
        }
    }

    pub fn get(&self, group: Group, key: &str) -> Option<&RenderedIndicator> {
        self.group(group).iter().find(|i| i.key == key)
    }

    pub fn all(&self) -> impl Iterator<Item = &RenderedIndicator> {
        self.your_figures_value
            .iter()
            .chain(&self.your_figures_volume)
            .chain(&self.projections_volume)
            .chain(&self.projections_value)
    }
}

// ─── Evaluation ─────────────────────────────────────────────────────────────

/// Estimate with the default assumptions and render every indicator.
pub fn compute_all_values(model: ModelVariant, params: &ParameterSet) -> ResultValues {
    compute_with(&Estimator::default(), model, params)
}

/// Tag-based entry point; unknown tags yield `None`.
pub fn compute_for_tag(model: &str, params: &ParameterSet) -> Option<ResultValues> {
    match model.parse::<ModelVariant>() {
        Ok(m) => Some(compute_all_values(m, params)),
        Err(e) => {
            tracing::warn!(model = model, "{e}, no indicators to compute");
            None
        }
    }
}

pub fn compute_with(estimator: &Estimator, model: ModelVariant, params: &ParameterSet) -> ResultValues {
    let estimate = estimator.estimate(model, params);
    let growth = growth_inputs(estimator, model, params);
    evaluate(&estimate, growth).unwrap_or_else(|| ResultValues::empty(model))
}

/// Growth inputs as the engine coerced them.
pub fn growth_inputs(estimator: &Estimator, model: ModelVariant, params: &ParameterSet) -> GrowthInputs {
    let (intros_key, conversion_key) = growth_keys(model);
    let growth = &estimator.assumptions().growth;
    GrowthInputs {
        intros_per_month: growth.intros(params.get(intros_key)),
        conversion_pct: growth.conversion(params.get(conversion_key)),
        uplift: growth.uplift,
    }
}

/// Render the configuration of the model that produced `estimate`.
/// A zeroed estimate has no model and yields `None`.
pub fn evaluate(estimate: &Estimate, growth: GrowthInputs) -> Option<ResultValues> {
    let values = match &estimate.details {
        Details::Recurring(d) => render(
            ModelVariant::Recurring,
            &results_config::RECURRING,
            &Basis { estimate, details: d, growth },
        ),
        Details::Projects(d) => render(
            ModelVariant::Projects,
            &results_config::PROJECTS,
            &Basis { estimate, details: d, growth },
        ),
        Details::Transactions(d) => render(
            ModelVariant::Transactions,
            &results_config::TRANSACTIONS,
            &Basis { estimate, details: d, growth },
        ),
        Details::Financing(d) => render(
            ModelVariant::Financing,
            &results_config::FINANCING,
            &Basis { estimate, details: d, growth },
        ),
        Details::AssetManagement(d) => render(
            ModelVariant::AssetManagement,
            &results_config::ASSET_MANAGEMENT,
            &Basis { estimate, details: d, growth },
        ),
        Details::Empty {} => return None,
    };
    Some(values)
}

fn render<D>(model: ModelVariant, config: &ModelConfig<D>, basis: &Basis<'_, D>) -> ResultValues {
    let no_context = ComputeContext::default();
    let your_figures_value = render_group(config.your_figures.value, basis, &no_context);
    let your_figures_volume = render_group(config.your_figures.volume, basis, &no_context);
    let projections_volume = render_group(config.projections.volume, basis, &no_context);

    let context = ComputeContext::from_volume(&projections_volume);
    let projections_value = render_group(config.projections.value, basis, &context);

    tracing::debug!(
        model = %model,
        clients = %context.clients_range,
        indicators = your_figures_value.len()
            + your_figures_volume.len()
            + projections_volume.len()
            + projections_value.len(),
        "indicators rendered"
    );

    ResultValues {
        model,
        layout: config.layout,
        section_titles: config.section_titles,
        your_figures_value,
        your_figures_volume,
        projections_volume,
        projections_value,
        context,
    }
}

fn render_group<D>(
    defs: &[IndicatorDef<D>],
    basis: &Basis<'_, D>,
    ctx: &ComputeContext,
) -> Vec<RenderedIndicator> {
    defs.iter().map(|def| render_one(def, basis, ctx)).collect()
}

fn render_one<D>(def: &IndicatorDef<D>, basis: &Basis<'_, D>, ctx: &ComputeContext) -> RenderedIndicator {
    let value = (def.value)(basis, ctx);
    RenderedIndicator {
        key: def.key,
        label: def.label.resolve(basis, ctx),
        explanation: def.explanation.map(|t| t.resolve(basis, ctx)),
        description: def.description.map(|t| t.resolve(basis, ctx)),
        footnote: def.footnote.map(|t| t.resolve(basis, ctx)),
        format: def.format,
        value,
        display: format_value(&value, def.format),
        compact: (def.format == DisplayFormat::Currency)
            .then(|| format_currency_compact(value.headline())),
        progress_width: def.progress_width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::keys;
    use crate::results_config::Text;
    use crate::types::RecurringDetails;

    fn recurring_params() -> ParameterSet {
        ParameterSet::new()
            .with(keys::ANNUAL_REVENUE_PER_CLIENT, 24_000.0)
            .with(keys::INCREMENTAL_MARGIN, 70.0)
            .with(keys::INTROS_PER_QUARTER, 12.0)
            .with(keys::CONV_INTRO_TO_CLIENT, 20.0)
            .with(keys::ARR_MULTIPLE, 5.0)
    }

    #[test]
    fn clients_range_from_range_value() {
        let v = IndicatorValue::Range { min: 8.0, max: 12.0 };
        assert_eq!(clients_range(&v), "8 - 12");
    }

    #[test]
    fn clients_range_from_point_estimate() {
        // 3.6 → 3.24 .. 3.96
        assert_eq!(clients_range(&IndicatorValue::Number(3.6)), "3 - 4");
        // 10 → 9 .. 11
        assert_eq!(clients_range(&IndicatorValue::Number(10.0)), "9 - 11");
        // 0 collapses
        assert_eq!(clients_range(&IndicatorValue::Number(0.0)), "0");
        assert_eq!(clients_range(&IndicatorValue::Number(f64::NAN)), PLACEHOLDER);
    }

    #[test]
    fn recurring_projection_is_quarterly_share_of_engine() {
        let values = compute_all_values(ModelVariant::Recurring, &recurring_params());
        assert_eq!(values.layout, Layout::Complete);

        let intros = values.get(Group::ProjectionsVolume, "additionalIntros").expect("test: intros");
        // 12 / month → 36 / quarter → 54 uplifted
        assert_eq!(intros.value, IndicatorValue::Range { min: 43.0, max: 60.0 });
        assert_eq!(intros.display, "43-60");

        let clients = values.get(Group::ProjectionsVolume, "clientsPerQuarter").expect("test: clients");
        // 43.2 / year → 10.8 / quarter
        assert_eq!(clients.value, IndicatorValue::Range { min: 8.0, max: 12.0 });
        assert_eq!(values.context.clients_range, "8 - 12");
        assert_eq!(values.context.intros, 60.0);

        let profit = values.get(Group::ProjectionsValue, "additionalProfit").expect("test: profit");
        assert!((profit.value.headline() - 725_760.0 / 4.0).abs() < 1e-6);
        assert_eq!(profit.display, "181\u{202f}440 €");
        assert_eq!(
            profit.description.as_deref(),
            Some("Profit annuel additionnel généré par 8 - 12 clients avec une marge de 70%.")
        );

        let valuation = values.get(Group::ProjectionsValue, "valuationGain").expect("test: valuation");
        assert_eq!(valuation.display, "1\u{202f}296\u{202f}000 €");
        assert_eq!(valuation.compact.as_deref(), Some("1,3 M€"));
        assert_eq!(
            valuation.footnote.as_deref(),
            Some("En utilisant le multiple de ×5 l’ARR en vigueur dans votre secteur.")
        );
    }

    #[test]
    fn recurring_your_figures_restate_inputs() {
        let values = compute_all_values(ModelVariant::Recurring, &recurring_params());
        let lifetime = values.get(Group::YourFiguresValue, "lifetimeProfit").expect("test: lifetime");
        // 24 000 × 70% × 4 years (default lifetime)
        assert!((lifetime.value.headline() - 67_200.0).abs() < 1e-6);
        assert_eq!(
            lifetime.explanation.as_deref(),
            Some("24\u{202f}000€ de chiffre d’affaires annuel récurrent avec 70% de marge pour une durée de vie de 4 ans.")
        );
        let intros = values.get(Group::YourFiguresVolume, "introsPerMonth").expect("test: intros");
        assert_eq!(intros.display, "12");
    }

    #[test]
    fn value_descriptions_quote_the_displayed_clients() {
        let values = compute_all_values(ModelVariant::Projects, &ParameterSet::new());
        let clients = values.get(Group::ProjectionsVolume, "clientsPerQuarter").expect("test: clients");
        // defaults: 4 × 20% × 1.5 × 12 / 4
        assert_eq!(clients.display, "3,6");
        for indicator in &values.projections_value {
            let text = indicator.description.as_deref().unwrap_or_default();
            assert!(text.contains("3 - 4"), "{}: {text}", indicator.key);
        }
    }

    #[test]
    fn empty_inputs_render_placeholders_not_nan() {
        for m in ModelVariant::ALL {
            let values = compute_all_values(m, &ParameterSet::new());
            for indicator in values.all() {
                assert!(!indicator.display.contains("NaN"), "{m}/{}", indicator.key);
                assert!(!indicator.display.is_empty(), "{m}/{}", indicator.key);
            }
            let revenue_like = &values.projections_value[0];
            assert_eq!(revenue_like.display, PLACEHOLDER, "{m}/{}", revenue_like.key);
        }
    }

    #[test]
    fn asset_management_quotes_intros() {
        let values = compute_all_values(ModelVariant::AssetManagement, &ParameterSet::new());
        // 4 / month → 12 / quarter → 18 uplifted
        assert_eq!(values.context.intros, 18.0);
        let revenue = values.get(Group::ProjectionsValue, "annualRevenue").expect("test: revenue");
        assert_eq!(
            revenue.description.as_deref(),
            Some("Revenus annuels générés par 18 introductions qualifiées.")
        );
    }

    #[test]
    fn financing_label_follows_duration() {
        let params = ParameterSet::new().with(keys::FINANCING_DURATION_YEARS, "6");
        let values = compute_all_values(ModelVariant::Financing, &params);
        let revenue = values.get(Group::YourFiguresValue, "revenuePerOperation").expect("test: revenue");
        assert_eq!(revenue.label, "Frais et rendement moyen par opération sur 6 ans");
    }

    #[test]
    fn zeroed_estimate_has_nothing_to_render() {
        assert!(evaluate(&Estimate::zeroed(), GrowthInputs::default()).is_none());
        assert!(compute_for_tag("unknown", &ParameterSet::new()).is_none());
        assert!(compute_for_tag("transactions", &ParameterSet::new()).is_some());
    }

    #[test]
    fn value_getters_see_the_compute_context() {
        let def: IndicatorDef<RecurringDetails> = IndicatorDef {
            key: "quotedIntros",
            label: Text::Literal("Introductions"),
            format: DisplayFormat::Number,
            progress_width: None,
            explanation: None,
            description: None,
            footnote: None,
            value: |_, ctx| ctx.intros.into(),
        };
        let estimate = Estimator::default().estimate(ModelVariant::Recurring, &recurring_params());
        let Details::Recurring(details) = &estimate.details else {
            panic!("test: recurring details expected");
        };
        let basis = Basis { estimate: &estimate, details, growth: GrowthInputs::default() };
        let ctx = ComputeContext { intros: 60.0, clients_range: "8 - 12".to_string() };

        let rendered = render_one(&def, &basis, &ctx);
        assert_eq!(rendered.value, IndicatorValue::Number(60.0));
        assert_eq!(rendered.display, "60");
    }

    #[test]
    fn evaluation_is_idempotent() {
        let params = recurring_params();
        let a = compute_all_values(ModelVariant::Recurring, &params);
        let b = compute_all_values(ModelVariant::Recurring, &params);
        assert_eq!(a, b);
    }
}
