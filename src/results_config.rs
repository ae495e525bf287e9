// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gain Estimator - Result Configuration Map

//! Static, per-model description of the result view.
//!
//! Four indicator groups per model: "your figures" (value, volume) restate
//! the prospect's own economics, "projections" (volume, value) show one
//! quarter of collaboration under the uplifted growth model. Every figure
//! is read from the engine's [`Estimate`]; this module only decides labels,
//! formats and narrative text.
//!
//! Projections are quarterly: a quarter's cohort of new units carries a
//! quarter of the engine's annual figures.

use crate::format::{plain_decimal, plain_euros, plain_number, DisplayFormat, IndicatorValue};
use crate::indicators::ComputeContext;
use crate::types::{
    AssetManagementDetails, Estimate, FinancingDetails, ModelVariant, ProjectsDetails,
    RecurringDetails, TransactionsDetails,
};
use serde::Serialize;
use std::fmt;

pub const QUARTERS_PER_YEAR: f64 = 4.0;
pub const MONTHS_PER_QUARTER: f64 = 3.0;

// ─── Evaluation Basis ───────────────────────────────────────────────────────

/// Growth inputs after coercion, as the engine used them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthInputs {
    pub intros_per_month: f64,
    pub conversion_pct: f64,
    pub uplift: f64,
}

/// Everything an indicator may read.
#[derive(Debug)]
pub struct Basis<'a, D> {
    pub estimate: &'a Estimate,
    pub details: &'a D,
    pub growth: GrowthInputs,
}

impl<D> Basis<'_, D> {
    pub fn quarterly(&self, annual: f64) -> f64 {
        annual / QUARTERS_PER_YEAR
    }

    pub fn units_per_quarter(&self) -> f64 {
        self.quarterly(self.estimate.details.additional_units_per_year().unwrap_or(0.0))
    }

    pub fn intros_per_quarter(&self) -> f64 {
        self.growth.intros_per_month * MONTHS_PER_QUARTER
    }

    pub fn additional_intros_per_quarter(&self) -> f64 {
        self.intros_per_quarter() * self.growth.uplift
    }

    pub fn margin_pct(&self) -> f64 {
        self.estimate.details.margin_pct().unwrap_or(0.0)
    }

    pub fn multiple(&self) -> f64 {
        self.estimate.details.multiple().unwrap_or(0.0)
    }
}

// ─── Indicator Definitions ──────────────────────────────────────────────────

/// Label or narrative: fixed, or built from the basis and the compute context.
pub enum Text<D> {
    Literal(&'static str),
    Computed(fn(&Basis<'_, D>, &ComputeContext) -> String),
}

impl<D> Clone for Text<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for Text<D> {}

impl<D> fmt::Debug for Text<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(s) => f.debug_tuple("Literal").field(s).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl<D> Text<D> {
    pub fn resolve(&self, basis: &Basis<'_, D>, ctx: &ComputeContext) -> String {
        match self {
            Self::Literal(s) => s.to_string(),
            Self::Computed(f) => f(basis, ctx),
        }
    }
}

/// One displayed figure.
pub struct IndicatorDef<D> {
    pub key: &'static str,
    pub label: Text<D>,
    pub explanation: Option<Text<D>>,
    pub description: Option<Text<D>>,
    pub footnote: Option<Text<D>>,
    pub format: DisplayFormat,
    /// Width of the comparison bar, in percent.
    pub progress_width: Option<u8>,
    /// Value projections may read the context built from the volume ones.
    pub value: fn(&Basis<'_, D>, &ComputeContext) -> IndicatorValue,
}

impl<D> IndicatorDef<D> {
    const BLANK: Self = Self {
        key: "",
        label: Text::Literal(""),
        explanation: None,
        description: None,
        footnote: None,
        format: DisplayFormat::Number,
        progress_width: None,
        value: zero,
    };
}

impl<D> fmt::Debug for IndicatorDef<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndicatorDef")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("format", &self.format)
            .field("progress_width", &self.progress_width)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Detailed breakdown with lifetime figures.
    Complete,
    Simple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionTitles {
    pub your_figures_main: &'static str,
    pub projections_main: &'static str,
    pub your_figures_value: &'static str,
    pub your_figures_volume: &'static str,
    pub projections_volume: &'static str,
    pub projections_value: &'static str,
}

#[derive(Debug)]
pub struct IndicatorGroups<D: 'static> {
    pub value: &'static [IndicatorDef<D>],
    pub volume: &'static [IndicatorDef<D>],
}

#[derive(Debug)]
pub struct ModelConfig<D: 'static> {
    pub layout: Layout,
    pub section_titles: SectionTitles,
    pub your_figures: IndicatorGroups<D>,
    pub projections: IndicatorGroups<D>,
}

pub fn layout(model: ModelVariant) -> Layout {
    match model {
        ModelVariant::Recurring => RECURRING.layout,
        ModelVariant::Projects => PROJECTS.layout,
        ModelVariant::Transactions => TRANSACTIONS.layout,
        ModelVariant::Financing => FINANCING.layout,
        ModelVariant::AssetManagement => ASSET_MANAGEMENT.layout,
    }
}

pub fn section_titles(model: ModelVariant) -> &'static SectionTitles {
    match model {
        ModelVariant::Recurring => &RECURRING.section_titles,
        ModelVariant::Projects => &PROJECTS.section_titles,
        ModelVariant::Transactions => &TRANSACTIONS.section_titles,
        ModelVariant::Financing => &FINANCING.section_titles,
        ModelVariant::AssetManagement => &ASSET_MANAGEMENT.section_titles,
    }
}

const fn titles(your_figures_value: &'static str) -> SectionTitles {
    SectionTitles {
        your_figures_main: "Vos chiffres",
        projections_main: "Projection indicative",
        your_figures_value,
        your_figures_volume: "VOLUME D’AFFAIRES ACTUEL",
        projections_volume: "LE VOLUME D’AFFAIRES POTENTIEL",
        projections_value: "VALEUR D’UN TRIMESTRE DE COLLABORATION",
    }
}

// ─── Shared getters and narratives ──────────────────────────────────────────

fn zero<D>(_: &Basis<'_, D>, _: &ComputeContext) -> IndicatorValue {
    IndicatorValue::Number(0.0)
}

/// ±10% around the point estimate, widened to -20% below.
fn spread(base: f64) -> IndicatorValue {
    IndicatorValue::Range {
        min: (base * 0.8).floor(),
        max: (base * 1.1).ceil(),
    }
}

fn intros_per_month<D>(b: &Basis<'_, D>, _: &ComputeContext) -> IndicatorValue {
    b.growth.intros_per_month.into()
}

fn additional_intros<D>(b: &Basis<'_, D>, _: &ComputeContext) -> IndicatorValue {
    b.additional_intros_per_quarter().into()
}

fn additional_intros_spread<D>(b: &Basis<'_, D>, _: &ComputeContext) -> IndicatorValue {
    spread(b.additional_intros_per_quarter())
}

fn units_per_quarter<D>(b: &Basis<'_, D>, _: &ComputeContext) -> IndicatorValue {
    b.units_per_quarter().into()
}

fn units_spread<D>(b: &Basis<'_, D>, _: &ComputeContext) -> IndicatorValue {
    spread(b.units_per_quarter())
}

fn quarterly_gain<D>(b: &Basis<'_, D>, _: &ComputeContext) -> IndicatorValue {
    b.quarterly(b.estimate.additional_revenue).into()
}

fn quarterly_valuation<D>(b: &Basis<'_, D>, _: &ComputeContext) -> IndicatorValue {
    b.quarterly(b.estimate.valuation_gain).into()
}

fn uplift_explanation<D>(b: &Basis<'_, D>, _: &ComputeContext) -> String {
    format!(
        "Correspond à {}x les {} introductions qualifiées que produit votre meilleur collaborateur chaque trimestre.",
        plain_decimal(b.growth.uplift),
        plain_number(b.intros_per_quarter()),
    )
}

fn signature_rate_explanation<D>(b: &Basis<'_, D>, _: &ComputeContext) -> String {
    format!(
        "En prenant en compte votre taux de signature de {}%.",
        plain_decimal(b.growth.conversion_pct)
    )
}

fn closing_rate_explanation<D>(b: &Basis<'_, D>, _: &ComputeContext) -> String {
    format!(
        "En prenant en compte votre taux de transformation de {}%.",
        plain_decimal(b.growth.conversion_pct)
    )
}

fn net_margin_note<D>(b: &Basis<'_, D>, _: &ComputeContext) -> String {
    format!(
        "Avec une marge opérationnelle nette de {}%.",
        plain_decimal(b.margin_pct())
    )
}

fn ebitda_multiple_note<D>(b: &Basis<'_, D>, _: &ComputeContext) -> String {
    format!(
        "En utilisant le multiple de ×{} l’EBITDA en vigueur dans votre secteur.",
        plain_decimal(b.multiple())
    )
}

// ─── Recurring ──────────────────────────────────────────────────────────────

pub static RECURRING: ModelConfig<RecurringDetails> = ModelConfig {
    layout: Layout::Complete,
    section_titles: titles("VALEUR D’UN CLIENT"),
    your_figures: IndicatorGroups {
        value: &[
            IndicatorDef {
                key: "revenuePerClient",
                label: Text::Literal("Chiffre d’affaires de revenus récurrents par client"),
                format: DisplayFormat::Currency,
                value: |b, _| b.details.annual_revenue_per_client.into(),
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "lifetimeProfit",
                label: Text::Literal("Profit total généré par client sur sa durée de vie"),
                explanation: Some(Text::Computed(|b, _| {
                    format!(
                        "{} de chiffre d’affaires annuel récurrent avec {}% de marge pour une durée de vie de {} ans.",
                        plain_euros(b.details.annual_revenue_per_client),
                        plain_decimal(b.details.incremental_margin_pct),
                        plain_decimal(b.details.lifetime_years),
                    )
                })),
                format: DisplayFormat::Currency,
                value: |b, _| {
                    let d = b.details;
                    (d.annual_revenue_per_client * d.incremental_margin_pct / 100.0 * d.lifetime_years).into()
                },
                ..IndicatorDef::BLANK
            },
        ],
        volume: &[IndicatorDef {
            key: "introsPerMonth",
            label: Text::Literal(
                "Introductions qualifiées par mois par votre meilleur collaborateur en interne",
            ),
            format: DisplayFormat::Number,
            value: intros_per_month,
            ..IndicatorDef::BLANK
        }],
    },
    projections: IndicatorGroups {
        volume: &[
            IndicatorDef {
                key: "additionalIntros",
                label: Text::Literal("introductions qualifiées additionnelles par trimestre"),
                explanation: Some(Text::Computed(uplift_explanation)),
                format: DisplayFormat::Range,
                value: additional_intros_spread,
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "clientsPerQuarter",
                label: Text::Literal("clients par trimestre en moyenne"),
                explanation: Some(Text::Computed(|b, _| {
                    format!(
                        "En comptant votre taux de signature de {}%.",
                        plain_decimal(b.growth.conversion_pct)
                    )
                })),
                format: DisplayFormat::Range,
                value: units_spread,
                ..IndicatorDef::BLANK
            },
        ],
        value: &[
            IndicatorDef {
                key: "additionalRevenue",
                label: Text::Literal("Chiffre d’affaires annuel récurrent additionnel"),
                description: Some(Text::Computed(|_, ctx| {
                    format!(
                        "Chiffre d’affaires annuel récurrent additionnel généré par {} clients.",
                        ctx.clients_range
                    )
                })),
                format: DisplayFormat::Currency,
                progress_width: Some(20),
                value: |b, _| b.quarterly(b.details.incremental_arr).into(),
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "additionalProfit",
                label: Text::Literal("Profit annuel additionnel"),
                description: Some(Text::Computed(|b, ctx| {
                    format!(
                        "Profit annuel additionnel généré par {} clients avec une marge de {}%.",
                        ctx.clients_range,
                        plain_decimal(b.details.incremental_margin_pct)
                    )
                })),
                format: DisplayFormat::Currency,
                progress_width: Some(10),
                value: quarterly_gain,
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "lifetimeProfit",
                label: Text::Literal("Profit total sur la durée de vie"),
                description: Some(Text::Computed(|b, ctx| {
                    format!(
                        "Profit total généré par {} clients sur leur durée de vie de {} ans.",
                        ctx.clients_range,
                        plain_decimal(b.details.lifetime_years)
                    )
                })),
                format: DisplayFormat::Currency,
                progress_width: Some(70),
                value: |b, _| b.quarterly(b.estimate.additional_revenue * b.details.lifetime_years).into(),
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "valuationGain",
                label: Text::Literal("Gain de valorisation d’entreprise"),
                description: Some(Text::Computed(|_, ctx| {
                    format!(
                        "Gain de valorisation d’entreprise généré par {} clients.",
                        ctx.clients_range
                    )
                })),
                footnote: Some(Text::Computed(|b, _| {
                    format!(
                        "En utilisant le multiple de ×{} l’ARR en vigueur dans votre secteur.",
                        plain_decimal(b.details.arr_multiple)
                    )
                })),
                format: DisplayFormat::Currency,
                progress_width: Some(65),
                value: quarterly_valuation,
                ..IndicatorDef::BLANK
            },
        ],
    },
};

// ─── Projects ───────────────────────────────────────────────────────────────

pub static PROJECTS: ModelConfig<ProjectsDetails> = ModelConfig {
    layout: Layout::Simple,
    section_titles: titles("VALEUR D’UN CONTRAT"),
    your_figures: IndicatorGroups {
        value: &[
            IndicatorDef {
                key: "contractValue",
                label: Text::Literal("Chiffre d’affaires moyen par contrat"),
                format: DisplayFormat::Currency,
                value: |b, _| b.details.avg_contract_value.into(),
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "profitPerContract",
                label: Text::Literal("Profit net généré par contrat"),
                explanation: Some(Text::Computed(|b, _| {
                    format!(
                        "{} de contrat avec {}% de marge opérationnelle.",
                        plain_euros(b.details.avg_contract_value),
                        plain_decimal(b.details.margin_pct)
                    )
                })),
                format: DisplayFormat::Currency,
                value: |b, _| (b.details.avg_contract_value * b.details.margin_pct / 100.0).into(),
                ..IndicatorDef::BLANK
            },
        ],
        volume: &[IndicatorDef {
            key: "introsPerMonth",
            label: Text::Literal("Opportunités qualifiées par mois (meilleur collab.)"),
            format: DisplayFormat::Number,
            value: intros_per_month,
            ..IndicatorDef::BLANK
        }],
    },
    projections: IndicatorGroups {
        volume: &[
            IndicatorDef {
                key: "additionalIntros",
                label: Text::Literal("opportunités qualifiées par trimestre"),
                explanation: Some(Text::Computed(|b, _| {
                    format!(
                        "Correspondant à {}x les {} opportunités qualifiées que produit votre meilleur collaborateur chaque trimestre.",
                        plain_decimal(b.growth.uplift),
                        plain_number(b.intros_per_quarter())
                    )
                })),
                format: DisplayFormat::Number,
                value: additional_intros,
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "clientsPerQuarter",
                label: Text::Literal("contrats par trimestre en moyenne"),
                explanation: Some(Text::Computed(signature_rate_explanation)),
                format: DisplayFormat::Decimal,
                value: units_per_quarter,
                ..IndicatorDef::BLANK
            },
        ],
        value: &[
            IndicatorDef {
                key: "additionalRevenue",
                label: Text::Literal("Chiffre d’affaires généré"),
                description: Some(Text::Computed(|_, ctx| {
                    format!("Chiffre d’affaires généré par {} contrats.", ctx.clients_range)
                })),
                format: DisplayFormat::Currency,
                progress_width: Some(20),
                value: |b, _| b.quarterly(b.details.incremental_revenue).into(),
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "additionalProfit",
                label: Text::Literal("Profit généré"),
                description: Some(Text::Computed(|b, ctx| {
                    format!(
                        "Profit généré par {} contrats avec une marge de {}%.",
                        ctx.clients_range,
                        plain_decimal(b.details.margin_pct)
                    )
                })),
                format: DisplayFormat::Currency,
                progress_width: Some(50),
                value: quarterly_gain,
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "valuationGain",
                label: Text::Literal("Gain de valorisation d’entreprise"),
                description: Some(Text::Computed(|_, ctx| {
                    format!(
                        "Gain de valorisation d’entreprise généré par {} contrats.",
                        ctx.clients_range
                    )
                })),
                footnote: Some(Text::Computed(ebitda_multiple_note)),
                format: DisplayFormat::Currency,
                progress_width: Some(100),
                value: quarterly_valuation,
                ..IndicatorDef::BLANK
            },
        ],
    },
};

// ─── Transactions ───────────────────────────────────────────────────────────

pub static TRANSACTIONS: ModelConfig<TransactionsDetails> = ModelConfig {
    layout: Layout::Simple,
    section_titles: titles("VALEUR D’UNE TRANSACTION"),
    your_figures: IndicatorGroups {
        value: &[
            IndicatorDef {
                key: "transactionFees",
                label: Text::Literal("Honoraires moyens par mandat"),
                explanation: Some(Text::Computed(|b, _| {
                    let d = b.details;
                    format!(
                        "{}% de success fee sur {} avec {}% de probabilité de closing + {} de retainer fees.",
                        plain_decimal(d.success_fee_pct),
                        plain_euros(d.avg_transaction_value),
                        plain_decimal(d.closing_probability_pct),
                        plain_euros(d.work_fees),
                    )
                })),
                format: DisplayFormat::Currency,
                value: |b, _| b.details.revenue_per_mandate.into(),
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "profitPerTransaction",
                label: Text::Literal("Profit net généré par mandat"),
                explanation: Some(Text::Computed(net_margin_note)),
                format: DisplayFormat::Currency,
                value: |b, _| (b.details.revenue_per_mandate * b.details.net_margin_pct / 100.0).into(),
                ..IndicatorDef::BLANK
            },
        ],
        volume: &[IndicatorDef {
            key: "introsPerMonth",
            label: Text::Literal("Introductions qualifiées par mois (meilleur collab.)"),
            format: DisplayFormat::Number,
            value: intros_per_month,
            ..IndicatorDef::BLANK
        }],
    },
    projections: IndicatorGroups {
        volume: &[
            IndicatorDef {
                key: "additionalIntros",
                label: Text::Literal("Introductions qualifiées additionnelles par trimestre"),
                explanation: Some(Text::Computed(uplift_explanation)),
                format: DisplayFormat::Number,
                value: additional_intros,
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "clientsPerQuarter",
                label: Text::Literal("Nombre de mandats par trimestre (arrondi)"),
                explanation: Some(Text::Computed(closing_rate_explanation)),
                format: DisplayFormat::Number,
                value: units_per_quarter,
                ..IndicatorDef::BLANK
            },
        ],
        value: &[
            IndicatorDef {
                key: "successFees",
                label: Text::Literal("Honoraires potentiels"),
                description: Some(Text::Computed(|_, ctx| {
                    format!("Honoraires annualisés générés par {} mandats.", ctx.clients_range)
                })),
                format: DisplayFormat::Currency,
                progress_width: Some(30),
                value: |b, _| {
                    let d = b.details;
                    b.quarterly(d.annualised_revenue_per_mandate * d.additional_mandates_per_year).into()
                },
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "additionalProfit",
                label: Text::Literal("Profits additionnels"),
                description: Some(Text::Computed(|_, ctx| {
                    format!("Profits additionnels générés par {} mandats.", ctx.clients_range)
                })),
                footnote: Some(Text::Computed(net_margin_note)),
                format: DisplayFormat::Currency,
                progress_width: Some(60),
                value: quarterly_gain,
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "valuationGain",
                label: Text::Literal("Gain de valorisation d’entreprise"),
                description: Some(Text::Computed(|_, ctx| {
                    format!(
                        "Gain de valorisation d’entreprise généré par {} mandats.",
                        ctx.clients_range
                    )
                })),
                footnote: Some(Text::Computed(ebitda_multiple_note)),
                format: DisplayFormat::Currency,
                progress_width: Some(100),
                value: quarterly_valuation,
                ..IndicatorDef::BLANK
            },
        ],
    },
};

// ─── Financing ──────────────────────────────────────────────────────────────

pub static FINANCING: ModelConfig<FinancingDetails> = ModelConfig {
    layout: Layout::Simple,
    section_titles: titles("VALEUR D’UNE OPÉRATION"),
    your_figures: IndicatorGroups {
        value: &[
            IndicatorDef {
                key: "financedAmount",
                label: Text::Literal("Montant moyen financé par opération"),
                format: DisplayFormat::Currency,
                value: |b, _| b.details.avg_financed_amount.into(),
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "revenuePerOperation",
                label: Text::Computed(|b, _| {
                    format!(
                        "Frais et rendement moyen par opération sur {} ans",
                        plain_decimal(b.details.financing_duration_years)
                    )
                }),
                explanation: Some(Text::Computed(|b, _| {
                    let d = b.details;
                    format!(
                        "{}% de spread sur {} ans + {} de frais.",
                        plain_decimal(d.annual_spread_pct),
                        plain_decimal(d.financing_duration_years),
                        plain_euros(d.fees_per_deal),
                    )
                })),
                format: DisplayFormat::Currency,
                value: |b, _| b.details.lifetime_revenue_per_deal.into(),
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "profitPerOperation",
                label: Text::Literal("Profit net généré par opération"),
                explanation: Some(Text::Computed(net_margin_note)),
                format: DisplayFormat::Currency,
                value: |b, _| {
                    (b.details.lifetime_revenue_per_deal * b.details.net_margin_pct / 100.0).into()
                },
                ..IndicatorDef::BLANK
            },
        ],
        volume: &[IndicatorDef {
            key: "introsPerMonth",
            label: Text::Literal("Introductions qualifiées par mois (meilleur collab.)"),
            format: DisplayFormat::Number,
            value: intros_per_month,
            ..IndicatorDef::BLANK
        }],
    },
    projections: IndicatorGroups {
        volume: &[
            IndicatorDef {
                key: "additionalIntros",
                label: Text::Literal("Introductions qualifiées additionnelles par trimestre"),
                explanation: Some(Text::Computed(uplift_explanation)),
                format: DisplayFormat::Number,
                value: additional_intros,
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "clientsPerQuarter",
                label: Text::Literal("Opérations financées par trimestre"),
                explanation: Some(Text::Computed(closing_rate_explanation)),
                format: DisplayFormat::Decimal,
                value: units_per_quarter,
                ..IndicatorDef::BLANK
            },
        ],
        value: &[
            IndicatorDef {
                key: "financedVolume",
                label: Text::Literal("Volume de financement structuré"),
                description: Some(Text::Computed(|_, ctx| {
                    format!("Volume de financement structuré par {} opérations.", ctx.clients_range)
                })),
                format: DisplayFormat::Currency,
                progress_width: Some(20),
                value: |b, _| {
                    let d = b.details;
                    b.quarterly(d.avg_financed_amount * d.additional_deals_per_year).into()
                },
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "generatedRevenue",
                label: Text::Literal("Revenus annuels générés"),
                description: Some(Text::Computed(|_, ctx| {
                    format!("Revenus annuels générés par {} opérations.", ctx.clients_range)
                })),
                format: DisplayFormat::Currency,
                progress_width: Some(50),
                value: |b, _| {
                    let d = b.details;
                    b.quarterly(d.annual_revenue_per_deal * d.additional_deals_per_year).into()
                },
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "netProfit",
                label: Text::Literal("Profits nets générés"),
                description: Some(Text::Computed(|_, ctx| {
                    format!("Profits nets générés par {} opérations.", ctx.clients_range)
                })),
                footnote: Some(Text::Computed(net_margin_note)),
                format: DisplayFormat::Currency,
                progress_width: Some(80),
                value: quarterly_gain,
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "valuationGain",
                label: Text::Literal("Gain de valorisation d’entreprise"),
                description: Some(Text::Computed(|_, ctx| {
                    format!(
                        "Gain de valorisation d’entreprise généré par {} opérations.",
                        ctx.clients_range
                    )
                })),
                footnote: Some(Text::Computed(ebitda_multiple_note)),
                format: DisplayFormat::Currency,
                progress_width: Some(100),
                value: quarterly_valuation,
                ..IndicatorDef::BLANK
            },
        ],
    },
};

// ─── Asset Management ───────────────────────────────────────────────────────

pub static ASSET_MANAGEMENT: ModelConfig<AssetManagementDetails> = ModelConfig {
    layout: Layout::Simple,
    section_titles: titles("VALEUR D’UNE RELATION"),
    your_figures: IndicatorGroups {
        value: &[
            IndicatorDef {
                key: "initialAum",
                label: Text::Literal("AUM initial moyen par relation"),
                format: DisplayFormat::Currency,
                value: |b, _| b.details.initial_aum.into(),
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "revenuePerRelation",
                label: Text::Literal("Revenus annuels moyens par relation"),
                explanation: Some(Text::Computed(|b, _| {
                    let d = b.details;
                    format!(
                        "{}% de management fee + {}% de performance fee + {}% de commissions.",
                        plain_decimal(d.mgmt_fee_pct),
                        plain_decimal(d.perf_fee_pct),
                        plain_decimal(d.additional_commissions_pct),
                    )
                })),
                format: DisplayFormat::Currency,
                value: |b, _| b.details.annual_revenue_per_relation.into(),
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "profitPerRelation",
                label: Text::Literal("Profit net généré par relation"),
                explanation: Some(Text::Computed(net_margin_note)),
                format: DisplayFormat::Currency,
                value: |b, _| {
                    (b.details.annual_revenue_per_relation * b.details.net_margin_pct / 100.0).into()
                },
                ..IndicatorDef::BLANK
            },
        ],
        volume: &[IndicatorDef {
            key: "introsPerMonth",
            label: Text::Literal("Introductions qualifiées par mois (meilleur collab.)"),
            format: DisplayFormat::Number,
            value: intros_per_month,
            ..IndicatorDef::BLANK
        }],
    },
    projections: IndicatorGroups {
        volume: &[
            IndicatorDef {
                key: "additionalIntros",
                label: Text::Literal("introductions qualifiées par trimestre"),
                explanation: Some(Text::Computed(uplift_explanation)),
                format: DisplayFormat::Number,
                value: additional_intros,
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "clientsPerQuarter",
                label: Text::Literal("relations par trimestre en moyenne"),
                explanation: Some(Text::Computed(signature_rate_explanation)),
                format: DisplayFormat::Decimal,
                value: units_per_quarter,
                ..IndicatorDef::BLANK
            },
        ],
        value: &[
            IndicatorDef {
                key: "annualRevenue",
                label: Text::Literal("Revenus annuels générés"),
                description: Some(Text::Computed(|_, ctx| {
                    format!(
                        "Revenus annuels générés par {} introductions qualifiées.",
                        plain_number(ctx.intros)
                    )
                })),
                format: DisplayFormat::Currency,
                progress_width: Some(30),
                value: |b, _| {
                    let d = b.details;
                    b.quarterly(d.annual_revenue_per_relation * d.additional_relations_per_year).into()
                },
                ..IndicatorDef::BLANK
            },
            IndicatorDef {
                key: "valuationGain",
                label: Text::Literal("Gain de valorisation"),
                description: Some(Text::Computed(|_, ctx| {
                    format!(
                        "Gain de valorisation généré par {} introductions qualifiées.",
                        plain_number(ctx.intros)
                    )
                })),
                footnote: Some(Text::Computed(|b, _| {
                    format!(
                        "En utilisant le multiple de ×{} les management fees annualisés.",
                        plain_decimal(b.details.mgmt_fees_multiple)
                    )
                })),
                format: DisplayFormat::Currency,
                progress_width: Some(100),
                value: quarterly_valuation,
                ..IndicatorDef::BLANK
            },
        ],
    },
};
