// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gain Estimator - Parameter Catalogue

//! Parameter names, the questions asked for each model and the model
//! descriptions shown on the choice step.

use crate::numeric::parse_number;
use crate::types::{ModelVariant, ParameterSet, RawValue};
use serde::Serialize;

// ─── Parameter Keys ─────────────────────────────────────────────────────────

pub mod keys {
    // recurring
    pub const ANNUAL_REVENUE_PER_CLIENT: &str = "annualRevenuePerClient";
    pub const INCREMENTAL_MARGIN: &str = "incrementalMargin";
    pub const CONTRACT_DURATION_YEARS: &str = "contractDurationYears";
    /// Holds the annual churn in percent, despite its name.
    pub const ANNUAL_RETENTION_RATE: &str = "annualRetentionRate";
    pub const CONV_INTRO_TO_CLIENT: &str = "convIntroToClient";
    pub const ARR_MULTIPLE: &str = "arrMultiple";

    // projects
    pub const AVG_CONTRACT_VALUE: &str = "avgContractValue";
    pub const AVG_OPERATING_MARGIN: &str = "avgOperatingMargin";
    pub const QUALIFIED_OPP_PER_QUARTER: &str = "qualifiedOppPerQuarter";
    pub const CONV_OPP_TO_CLIENT: &str = "convOppToClient";

    // transactions
    pub const AVG_TRANSACTION_VALUE: &str = "avgTransactionValue";
    pub const SUCCESS_FEE: &str = "successFee";
    pub const WORK_FEES: &str = "workFees";
    pub const CLOSING_PROBABILITY: &str = "closingProbability";
    pub const MANDATE_DURATION_MONTHS: &str = "mandateDurationMonths";
    pub const CONV_INTRO_TO_MANDATE: &str = "convIntroToMandate";

    // financing
    pub const AVG_FINANCED_AMOUNT: &str = "avgFinancedAmount";
    pub const ANNUAL_SPREAD: &str = "annualSpread";
    pub const FINANCING_DURATION_YEARS: &str = "financingDurationYears";
    pub const ARRANGEMENT_FEES: &str = "arrangementFees";
    pub const STRUCTURING_FEES: &str = "structuringFees";
    pub const SERVICING_FEES_ANNUAL: &str = "servicingFeesAnnual";
    pub const CONV_INTRO_TO_FINANCING: &str = "convIntroToFinancing";

    // asset management
    pub const INITIAL_AUM: &str = "initialAum";
    pub const MGMT_FEE_ANNUAL: &str = "mgmtFeeAnnual";
    pub const PERF_FEE: &str = "perfFee";
    pub const ADDITIONAL_COMMISSIONS: &str = "additionalCommissions";
    pub const RELATIONSHIP_DURATION_YEARS: &str = "relationshipDurationYears";
    pub const CONV_INTRO_TO_RELATIONSHIP: &str = "convIntroToRelationship";
    pub const MGMT_FEES_MULTIPLE: &str = "mgmtFeesMultiple";

    // shared
    /// Introductions per month from the best performer (the key predates
    /// the monthly wording of the form).
    pub const INTROS_PER_QUARTER: &str = "introsPerQuarter";
    pub const NET_MARGIN: &str = "netMargin";
    pub const EBITDA_MULTIPLE: &str = "ebitdaMultiple";
}

/// Name of the intro-volume and conversion parameters of a model.
pub fn growth_keys(model: ModelVariant) -> (&'static str, &'static str) {
    match model {
        ModelVariant::Recurring => (keys::INTROS_PER_QUARTER, keys::CONV_INTRO_TO_CLIENT),
        ModelVariant::Projects => (keys::QUALIFIED_OPP_PER_QUARTER, keys::CONV_OPP_TO_CLIENT),
        ModelVariant::Transactions => (keys::INTROS_PER_QUARTER, keys::CONV_INTRO_TO_MANDATE),
        ModelVariant::Financing => (keys::INTROS_PER_QUARTER, keys::CONV_INTRO_TO_FINANCING),
        ModelVariant::AssetManagement => {
            (keys::INTROS_PER_QUARTER, keys::CONV_INTRO_TO_RELATIONSHIP)
        }
    }
}

// ─── Field Catalogue ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unit {
    #[serde(rename = "€")]
    Euro,
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "ans")]
    Years,
    #[serde(rename = "mois")]
    Months,
    #[serde(rename = "/ mois")]
    PerMonth,
    #[serde(rename = "x")]
    Multiple,
}

/// One question of the parameter step.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: Unit,
    /// Marked with an asterisk on the form; still optional for the engine.
    pub required: bool,
    pub section: u8,
    pub helper: Option<&'static str>,
}

const fn field(key: &'static str, label: &'static str, unit: Unit, required: bool, section: u8) -> FieldSpec {
    FieldSpec { key, label, unit, required, section, helper: None }
}

const INTROS_HELPER: &str =
    "Si inconnu, indiquez un ordre de grandeur. L’outil applique un minimum de 1,5× sur ce levier.";

const RECURRING_FIELDS: &[FieldSpec] = &[
    field(keys::ANNUAL_REVENUE_PER_CLIENT, "Chiffre d’affaires annuel moyen par client", Unit::Euro, true, 1),
    FieldSpec {
        helper: Some("Renseignez soit la durée moyenne, soit le churn annuel. L’outil complètera l’autre."),
        ..field(keys::CONTRACT_DURATION_YEARS, "Durée moyenne d’un contrat", Unit::Years, false, 1)
    },
    field(keys::ANNUAL_RETENTION_RATE, "Churn annuel", Unit::Percent, false, 1),
    field(keys::INCREMENTAL_MARGIN, "Marge sur un nouveau client", Unit::Percent, true, 1),
    FieldSpec {
        helper: Some(INTROS_HELPER),
        ..field(keys::INTROS_PER_QUARTER, "Introductions qualifiées par mois (meilleur collaborateur)", Unit::PerMonth, false, 2)
    },
    field(keys::CONV_INTRO_TO_CLIENT, "Taux de transformation : introduction qualifiée → client", Unit::Percent, false, 2),
    field(keys::ARR_MULTIPLE, "Multiple de valorisation de l’ARR", Unit::Multiple, true, 3),
];

const PROJECTS_FIELDS: &[FieldSpec] = &[
    field(keys::AVG_CONTRACT_VALUE, "Valeur moyenne d’un contrat", Unit::Euro, true, 1),
    field(keys::AVG_OPERATING_MARGIN, "Marge opérationnelle moyenne", Unit::Percent, true, 1),
    field(keys::QUALIFIED_OPP_PER_QUARTER, "Opportunités qualifiées par mois (meilleur collaborateur)", Unit::PerMonth, false, 2),
    field(keys::CONV_OPP_TO_CLIENT, "Taux de transformation : opportunité → client", Unit::Percent, false, 2),
    field(keys::EBITDA_MULTIPLE, "Multiple d’EBITDA observé", Unit::Multiple, true, 3),
];

const TRANSACTIONS_FIELDS: &[FieldSpec] = &[
    field(keys::AVG_TRANSACTION_VALUE, "Valorisation moyenne des transactions", Unit::Euro, true, 1),
    field(keys::SUCCESS_FEE, "Success fee moyen", Unit::Percent, true, 1),
    field(keys::WORK_FEES, "Work fees / retainers", Unit::Euro, false, 1),
    field(keys::CLOSING_PROBABILITY, "Probabilité de closing", Unit::Percent, true, 1),
    field(keys::MANDATE_DURATION_MONTHS, "Durée moyenne d’un mandat", Unit::Months, true, 1),
    field(keys::NET_MARGIN, "Marge opérationnelle nette", Unit::Percent, true, 1),
    field(keys::INTROS_PER_QUARTER, "Introductions qualifiées par mois", Unit::PerMonth, false, 2),
    field(keys::CONV_INTRO_TO_MANDATE, "Taux de transformation : introduction → mandat", Unit::Percent, false, 2),
    field(keys::EBITDA_MULTIPLE, "Multiple d’EBITDA (small / mid-cap)", Unit::Multiple, true, 3),
];

const FINANCING_FIELDS: &[FieldSpec] = &[
    field(keys::AVG_FINANCED_AMOUNT, "Montant moyen financé", Unit::Euro, true, 1),
    field(keys::ANNUAL_SPREAD, "Spread annuel capté", Unit::Percent, true, 1),
    field(keys::FINANCING_DURATION_YEARS, "Durée du financement", Unit::Years, true, 1),
    field(keys::ARRANGEMENT_FEES, "Frais d’arrangement", Unit::Euro, false, 1),
    field(keys::STRUCTURING_FEES, "Frais de structuration", Unit::Euro, false, 1),
    field(keys::SERVICING_FEES_ANNUAL, "Frais de servicing annuels", Unit::Euro, false, 1),
    field(keys::NET_MARGIN, "Marge opérationnelle nette", Unit::Percent, true, 1),
    field(keys::INTROS_PER_QUARTER, "Introductions qualifiées par mois", Unit::PerMonth, false, 2),
    field(keys::CONV_INTRO_TO_FINANCING, "Taux de transformation : introduction → financement", Unit::Percent, false, 2),
    field(keys::EBITDA_MULTIPLE, "Multiple d’EBITDA institutionnel", Unit::Multiple, true, 3),
];

const ASSET_MANAGEMENT_FIELDS: &[FieldSpec] = &[
    field(keys::INITIAL_AUM, "AUM initial moyen", Unit::Euro, true, 1),
    field(keys::MGMT_FEE_ANNUAL, "Management fee annuel", Unit::Percent, true, 1),
    field(keys::PERF_FEE, "Performance fee (optionnel)", Unit::Percent, false, 1),
    field(keys::ADDITIONAL_COMMISSIONS, "Commissions additionnelles", Unit::Percent, false, 1),
    field(keys::RELATIONSHIP_DURATION_YEARS, "Durée moyenne de relation", Unit::Years, true, 1),
    field(keys::NET_MARGIN, "Marge opérationnelle nette", Unit::Percent, true, 1),
    field(keys::INTROS_PER_QUARTER, "Introductions qualifiées par mois", Unit::PerMonth, false, 2),
    field(keys::CONV_INTRO_TO_RELATIONSHIP, "Taux de transformation : introduction → relation", Unit::Percent, false, 2),
    field(keys::MGMT_FEES_MULTIPLE, "Management fees annualisés × multiple (2× à 4×)", Unit::Multiple, true, 3),
];

pub fn fields_for(model: ModelVariant) -> &'static [FieldSpec] {
    match model {
        ModelVariant::Recurring => RECURRING_FIELDS,
        ModelVariant::Projects => PROJECTS_FIELDS,
        ModelVariant::Transactions => TRANSACTIONS_FIELDS,
        ModelVariant::Financing => FINANCING_FIELDS,
        ModelVariant::AssetManagement => ASSET_MANAGEMENT_FIELDS,
    }
}

/// Title of a numbered form section.
pub fn section_title(model: ModelVariant, section: u8) -> &'static str {
    match (model, section) {
        (ModelVariant::Recurring, 1) => "1. Valeur économique d’un client",
        (ModelVariant::Recurring, 2) => "2. Potentiel de croissance",
        (ModelVariant::Projects, 1) => "1. Valeur d’un contrat",
        (ModelVariant::Projects, 2) => "2. Capacité commerciale",
        (ModelVariant::Transactions, 1) => "1. Valeur d’un mandat",
        (ModelVariant::Financing, 1) => "1. Valeur d’une opération",
        (ModelVariant::AssetManagement, 1) => "1. Nouvelle relation",
        (_, 2) => "2. Pipeline",
        (_, 3) => "3. Valorisation",
        _ => "",
    }
}

// ─── Model Metadata ─────────────────────────────────────────────────────────

/// Card shown on the model-choice step.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModelInfo {
    pub model: ModelVariant,
    pub title: &'static str,
    pub examples: &'static str,
    pub valuation: &'static str,
}

impl ModelVariant {
    pub fn info(&self) -> ModelInfo {
        let (title, examples, valuation) = match self {
            Self::Recurring => (
                "Revenus récurrents",
                "SaaS, logiciels métiers, services managés, abonnements professionnels",
                "Multiple d'ARR",
            ),
            Self::Projects => (
                "Projets & prestations à forte valeur",
                "Cabinets de conseil, ingénierie, ESN, BTP privé, intégrateurs ERP",
                "Multiple d'EBITDA",
            ),
            Self::Transactions => (
                "Transactions & intermédiation",
                "Boutiques M&A, cabinets de levée de fonds, brokerage immobilier, advisory transactionnel",
                "Multiple d'EBITDA",
            ),
            Self::Financing => (
                "Financements & dette privée",
                "Fonds de dette privée, plateformes de crédit, finance alternative",
                "Multiple d'EBITDA",
            ),
            Self::AssetManagement => (
                "Gestion d'actifs & patrimoine",
                "Banques privées, wealth managers, family offices, cabinets patrimoniaux",
                "Multiple des management fees annualisés",
            ),
        };
        ModelInfo { model: *self, title, examples, valuation }
    }
}

/// Numbered section of a parameter form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Section {
    pub number: u8,
    pub title: &'static str,
}

/// Everything the model-choice and parameter steps render for one model.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub info: ModelInfo,
    pub fields: &'static [FieldSpec],
    pub sections: Vec<Section>,
}

pub fn catalog() -> Vec<CatalogEntry> {
    ModelVariant::ALL
        .iter()
        .map(|&model| {
            let fields = fields_for(model);
            let mut numbers: Vec<u8> = fields.iter().map(|f| f.section).collect();
            numbers.dedup();
            CatalogEntry {
                info: model.info(),
                fields,
                sections: numbers
                    .into_iter()
                    .map(|number| Section { number, title: section_title(model, number) })
                    .collect(),
            }
        })
        .collect()
}

// ─── Linked Fields ──────────────────────────────────────────────────────────

/// Keep contract duration and churn consistent on the recurring form.
///
/// Editing one of them to a positive number rewrites the other as
/// `100 / value`, rounded to one decimal. Other keys are left alone.
pub fn link_lifetime_fields(params: &mut ParameterSet, edited_key: &str) {
    let counterpart = match edited_key {
        keys::CONTRACT_DURATION_YEARS => keys::ANNUAL_RETENTION_RATE,
        keys::ANNUAL_RETENTION_RATE => keys::CONTRACT_DURATION_YEARS,
        _ => return,
    };
    let edited = match params.get(edited_key) {
        Some(RawValue::Number(n)) => Some(*n),
        Some(RawValue::Text(s)) => parse_number(s),
        None => None,
    };
    if let Some(v) = edited.filter(|v| v.is_finite() && *v > 0.0) {
        params.insert(counterpart, format!("{:.1}", 100.0 / v));
    }
}
