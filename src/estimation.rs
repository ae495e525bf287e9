// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gain Estimator - Estimation Engine

//! One pure formula per business model.
//!
//! Every formula follows the same three steps:
//!   1. volume: additional units per year from the shared growth model,
//!   2. value: per-unit net economics × volume = `additional_revenue`,
//!   3. valuation: a sector multiple applied to the increment.
//!
//! Missing or malformed inputs fall back to the assumption tables and
//! out-of-range inputs are clamped. Nothing here returns an error.

use crate::assumptions::{Assumptions, GrowthAssumptions};
use crate::fields::{growth_keys, keys};
use crate::types::{
    AssetManagementDetails, Details, Estimate, FinancingDetails, ModelVariant, ParameterSet,
    ProjectsDetails, RawValue, RecurringDetails, TransactionsDetails,
};

pub use crate::assumptions::UPLIFT_MIN;

const RECURRING_LEVERS: [&str; 3] = [
    "Optimisation du flux d’introductions qualifiées (min. 1,5× appliqué)",
    "Activation de la marge incrémentale sur les nouveaux clients récurrents",
    "Projection de valorisation sur la base d’un multiple d’ARR de marché",
];

const PROJECTS_LEVERS: [&str; 3] = [
    "Qualité du pipeline d’opportunités à forte valeur",
    "Taux de conversion opportunité → client",
    "Conversion de la marge projet en EBITDA valorisable",
];

const TRANSACTIONS_LEVERS: [&str; 3] = [
    "Structuration du pipeline d’introductions qualifiées en mandats signés",
    "Combinaison des work fees et success fees annualisés",
    "Conversion en EBITDA net à partir de la marge opérationnelle",
];

const FINANCING_LEVERS: [&str; 3] = [
    "Valorisation de la combinaison spreads + fees sur la durée de vie des opérations",
    "Effet volume sur les introductions qualifiées transformées en financements",
    "Projection en EBITDA institutionnel",
];

const ASSET_MANAGEMENT_LEVERS: [&str; 3] = [
    "Accroissement des encours sous gestion via les relations qualifiées",
    "Monétisation des management fees et performance fees sur la durée de la relation",
    "Projection de valorisation sur les management fees annualisés",
];

fn levers(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Additional units per year with the default growth model:
/// `intros × conversion% / 100 × 1.5 × 12`, intros defaulting to 4 and
/// conversion to 20%.
pub fn compute_additional_units(
    intros_per_period: Option<&RawValue>,
    conversion_rate_pct: Option<&RawValue>,
) -> f64 {
    GrowthAssumptions::default().additional_units(intros_per_period, conversion_rate_pct)
}

/// Estimate by wire tag. Unknown tags yield [`Estimate::zeroed`].
pub fn estimate(model: &str, params: &ParameterSet) -> Estimate {
    match model.parse::<ModelVariant>() {
        Ok(variant) => Estimator::default().estimate(variant, params),
        Err(e) => {
            tracing::warn!(model = model, "{e}, returning zeroed estimate");
            Estimate::zeroed()
        }
    }
}

// ---------------------------------------------------------------------------
// Estimator
// ---------------------------------------------------------------------------

/// Stateless formula runner bound to one set of assumption tables.
#[derive(Debug, Clone, Default)]
pub struct Estimator {
    assumptions: Assumptions,
}

impl Estimator {
    pub fn new(assumptions: Assumptions) -> Self {
        Self { assumptions }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn estimate(&self, model: ModelVariant, params: &ParameterSet) -> Estimate {
        let result = match model {
            ModelVariant::Recurring => self.recurring(params),
            ModelVariant::Projects => self.projects(params),
            ModelVariant::Transactions => self.transactions(params),
            ModelVariant::Financing => self.financing(params),
            ModelVariant::AssetManagement => self.asset_management(params),
        };
        tracing::debug!(
            model = %model,
            inputs = params.len(),
            additional_revenue = result.additional_revenue,
            valuation_gain = result.valuation_gain,
            "estimate computed"
        );
        result
    }

    /// Additional units per year for a model, read from its own growth keys.
    pub fn additional_units(&self, model: ModelVariant, params: &ParameterSet) -> f64 {
        let (intros, conversion) = growth_keys(model);
        self.assumptions
            .growth
            .additional_units(params.get(intros), params.get(conversion))
    }

    fn recurring(&self, params: &ParameterSet) -> Estimate {
        let a = &self.assumptions.recurring;
        let annual_revenue_per_client =
            a.annual_revenue_per_client.read(params.get(keys::ANNUAL_REVENUE_PER_CLIENT));
        let incremental_margin = a.incremental_margin_pct.resolve(params.get(keys::INCREMENTAL_MARGIN)) / 100.0;

        // Lifetime: explicit duration, else 1 / churn, else the default
        let duration = a.contract_duration_years.read(params.get(keys::CONTRACT_DURATION_YEARS));
        let churn_pct = a.churn_pct.read(params.get(keys::ANNUAL_RETENTION_RATE));
        let mut lifetime_years = duration;
        if lifetime_years == 0.0 && churn_pct != 0.0 {
            lifetime_years = 100.0 / a.churn_pct.clamp(churn_pct);
        }
        if lifetime_years == 0.0 {
            lifetime_years = a.lifetime_years.default;
        }
        let lifetime_years = a.lifetime_years.clamp(lifetime_years);

        let additional_clients_per_year = self.additional_units(ModelVariant::Recurring, params);

        let additional_revenue =
            annual_revenue_per_client * incremental_margin * additional_clients_per_year;
        let arr_multiple = a.arr_multiple.read(params.get(keys::ARR_MULTIPLE));
        let incremental_arr = annual_revenue_per_client * additional_clients_per_year;
        let valuation_gain = incremental_arr * arr_multiple;

        Estimate {
            additional_revenue,
            valuation_gain,
            levers: levers(&RECURRING_LEVERS),
            details: Details::Recurring(RecurringDetails {
                lifetime_years,
                additional_clients_per_year,
                incremental_margin_pct: incremental_margin * 100.0,
                arr_multiple,
                annual_revenue_per_client,
                incremental_arr,
            }),
        }
    }

    fn projects(&self, params: &ParameterSet) -> Estimate {
        let a = &self.assumptions.projects;
        let avg_contract_value = a.avg_contract_value.read(params.get(keys::AVG_CONTRACT_VALUE));
        let margin = a.operating_margin_pct.resolve(params.get(keys::AVG_OPERATING_MARGIN)) / 100.0;
        let additional_contracts_per_year = self.additional_units(ModelVariant::Projects, params);

        let incremental_revenue = avg_contract_value * additional_contracts_per_year;
        // Project margin is taken as EBITDA
        let incremental_ebitda = avg_contract_value * margin * additional_contracts_per_year;
        let ebitda_multiple = a.ebitda_multiple.read(params.get(keys::EBITDA_MULTIPLE));
        let valuation_gain = incremental_ebitda * ebitda_multiple;

        Estimate {
            additional_revenue: incremental_ebitda,
            valuation_gain,
            levers: levers(&PROJECTS_LEVERS),
            details: Details::Projects(ProjectsDetails {
                additional_contracts_per_year,
                margin_pct: margin * 100.0,
                ebitda_multiple,
                avg_contract_value,
                incremental_revenue,
            }),
        }
    }

    fn transactions(&self, params: &ParameterSet) -> Estimate {
        let a = &self.assumptions.transactions;
        let avg_transaction_value =
            a.avg_transaction_value.read(params.get(keys::AVG_TRANSACTION_VALUE));
        let success_fee = a.success_fee_pct.resolve(params.get(keys::SUCCESS_FEE)) / 100.0;
        let work_fees = a.work_fees.read(params.get(keys::WORK_FEES));
        let closing_probability =
            a.closing_probability_pct.resolve(params.get(keys::CLOSING_PROBABILITY)) / 100.0;
        let duration_months =
            a.mandate_duration_months.resolve(params.get(keys::MANDATE_DURATION_MONTHS));
        let net_margin = a.net_margin_pct.resolve(params.get(keys::NET_MARGIN)) / 100.0;

        let success_fee_revenue = avg_transaction_value * success_fee * closing_probability;
        let revenue_per_mandate = success_fee_revenue + work_fees;
        let annualised_revenue_per_mandate = revenue_per_mandate * 12.0 / duration_months;
        let ebitda_per_mandate = annualised_revenue_per_mandate * net_margin;

        let additional_mandates_per_year = self.additional_units(ModelVariant::Transactions, params);
        let incremental_ebitda = ebitda_per_mandate * additional_mandates_per_year;

        let ebitda_multiple = a.ebitda_multiple.read(params.get(keys::EBITDA_MULTIPLE));
        let valuation_gain = incremental_ebitda * ebitda_multiple;

        Estimate {
            additional_revenue: incremental_ebitda,
            valuation_gain,
            levers: levers(&TRANSACTIONS_LEVERS),
            details: Details::Transactions(TransactionsDetails {
                annualised_revenue_per_mandate,
                additional_mandates_per_year,
                net_margin_pct: net_margin * 100.0,
                ebitda_multiple,
                avg_transaction_value,
                revenue_per_mandate,
                success_fee_pct: success_fee * 100.0,
                closing_probability_pct: closing_probability * 100.0,
                mandate_duration_months: duration_months,
                work_fees,
            }),
        }
    }

    fn financing(&self, params: &ParameterSet) -> Estimate {
        let a = &self.assumptions.financing;
        let avg_financed_amount = a.avg_financed_amount.read(params.get(keys::AVG_FINANCED_AMOUNT));
        let annual_spread = a.annual_spread_pct.resolve(params.get(keys::ANNUAL_SPREAD)) / 100.0;
        let duration_years = a.duration_years.resolve(params.get(keys::FINANCING_DURATION_YEARS));
        let arrangement_fees = a.arrangement_fees.read(params.get(keys::ARRANGEMENT_FEES));
        let structuring_fees = a.structuring_fees.read(params.get(keys::STRUCTURING_FEES));
        let servicing_fees_annual =
            a.servicing_fees_annual.read(params.get(keys::SERVICING_FEES_ANNUAL));
        let net_margin = a.net_margin_pct.resolve(params.get(keys::NET_MARGIN)) / 100.0;

        let spread_revenue_lifetime = avg_financed_amount * annual_spread * duration_years;
        let fees_per_deal = arrangement_fees + structuring_fees + servicing_fees_annual * duration_years;
        let lifetime_revenue_per_deal = spread_revenue_lifetime + fees_per_deal;
        let annual_revenue_per_deal = lifetime_revenue_per_deal / duration_years;
        let ebitda_per_deal = annual_revenue_per_deal * net_margin;

        let additional_deals_per_year = self.additional_units(ModelVariant::Financing, params);
        let incremental_ebitda = ebitda_per_deal * additional_deals_per_year;

        let ebitda_multiple = a.ebitda_multiple.read(params.get(keys::EBITDA_MULTIPLE));
        let valuation_gain = incremental_ebitda * ebitda_multiple;

        Estimate {
            additional_revenue: incremental_ebitda,
            valuation_gain,
            levers: levers(&FINANCING_LEVERS),
            details: Details::Financing(FinancingDetails {
                annual_revenue_per_deal,
                additional_deals_per_year,
                net_margin_pct: net_margin * 100.0,
                ebitda_multiple,
                avg_financed_amount,
                lifetime_revenue_per_deal,
                annual_spread_pct: annual_spread * 100.0,
                financing_duration_years: duration_years,
                fees_per_deal,
            }),
        }
    }

    fn asset_management(&self, params: &ParameterSet) -> Estimate {
        let a = &self.assumptions.asset_management;
        let initial_aum = a.initial_aum.read(params.get(keys::INITIAL_AUM));
        let mgmt_fee = a.mgmt_fee_pct.resolve(params.get(keys::MGMT_FEE_ANNUAL)) / 100.0;
        let perf_fee = a.perf_fee_pct.resolve(params.get(keys::PERF_FEE)) / 100.0;
        let additional_commissions =
            a.additional_commissions_pct.resolve(params.get(keys::ADDITIONAL_COMMISSIONS)) / 100.0;
        let relationship_duration_years =
            a.relationship_duration_years.resolve(params.get(keys::RELATIONSHIP_DURATION_YEARS));
        let net_margin = a.net_margin_pct.resolve(params.get(keys::NET_MARGIN)) / 100.0;

        let total_fee_rate = mgmt_fee + perf_fee + additional_commissions;
        let annual_revenue_per_relation = initial_aum * total_fee_rate;
        let ebitda_per_relation = annual_revenue_per_relation * net_margin;

        let additional_relations_per_year =
            self.additional_units(ModelVariant::AssetManagement, params);
        let incremental_ebitda = ebitda_per_relation * additional_relations_per_year;

        // Only recurring management fees are capitalised
        let mgmt_fees_multiple = a.mgmt_fees_multiple.read(params.get(keys::MGMT_FEES_MULTIPLE));
        let management_fees_annualised = initial_aum * mgmt_fee * additional_relations_per_year;
        let valuation_gain = management_fees_annualised * mgmt_fees_multiple;

        Estimate {
            additional_revenue: incremental_ebitda,
            valuation_gain,
            levers: levers(&ASSET_MANAGEMENT_LEVERS),
            details: Details::AssetManagement(AssetManagementDetails {
                annual_revenue_per_relation,
                additional_relations_per_year,
                net_margin_pct: net_margin * 100.0,
                mgmt_fees_multiple,
                initial_aum,
                mgmt_fee_pct: mgmt_fee * 100.0,
                perf_fee_pct: perf_fee * 100.0,
                additional_commissions_pct: additional_commissions * 100.0,
                relationship_duration_years,
                management_fees_annualised,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS * b.abs().max(1.0)
    }

    fn recurring_details(e: &Estimate) -> &RecurringDetails {
        match &e.details {
            Details::Recurring(d) => d,
            other => panic!("expected recurring details, got {other:?}"),
        }
    }

    #[test]
    fn additional_units_defaults() {
        assert!(close(compute_additional_units(None, None), 14.4));
        let intros = RawValue::from(12.0);
        let conv = RawValue::from("20");
        assert!(close(compute_additional_units(Some(&intros), Some(&conv)), 43.2));
    }

    #[test]
    fn recurring_full_inputs() {
        let params = ParameterSet::new()
            .with(keys::ANNUAL_REVENUE_PER_CLIENT, 24_000.0)
            .with(keys::INCREMENTAL_MARGIN, 70.0)
            .with(keys::INTROS_PER_QUARTER, 12.0)
            .with(keys::CONV_INTRO_TO_CLIENT, 20.0)
            .with(keys::ARR_MULTIPLE, 5.0);
        let e = estimate("recurring", &params);
        let d = recurring_details(&e);
        assert!(close(d.additional_clients_per_year, 43.2));
        assert!(close(e.additional_revenue, 725_760.0));
        assert!(close(e.valuation_gain, 5_184_000.0));
        assert!(close(d.incremental_margin_pct, 70.0));
        assert_eq!(d.arr_multiple, 5.0);
        assert_eq!(d.lifetime_years, 4.0);
        assert_eq!(e.levers.len(), 3);
    }

    #[test]
    fn recurring_lifetime_from_churn() {
        let params = ParameterSet::new().with(keys::ANNUAL_RETENTION_RATE, "25");
        let e = estimate("recurring", &params);
        assert!(close(recurring_details(&e).lifetime_years, 4.0));

        // churn of 1% clamps to 2% → 50 years → clamped to 8
        let params = ParameterSet::new().with(keys::ANNUAL_RETENTION_RATE, "1");
        assert_eq!(recurring_details(&estimate("recurring", &params)).lifetime_years, 8.0);

        // churn of 95% clamps to 35% → 2.86 years
        let params = ParameterSet::new().with(keys::ANNUAL_RETENTION_RATE, "95");
        let lifetime = recurring_details(&estimate("recurring", &params)).lifetime_years;
        assert!(close(lifetime, 100.0 / 35.0));
    }

    #[test]
    fn recurring_duration_wins_over_churn_and_is_clamped() {
        let params = ParameterSet::new()
            .with(keys::CONTRACT_DURATION_YEARS, "12")
            .with(keys::ANNUAL_RETENTION_RATE, "25");
        assert_eq!(recurring_details(&estimate("recurring", &params)).lifetime_years, 8.0);

        let params = ParameterSet::new().with(keys::CONTRACT_DURATION_YEARS, "1");
        assert_eq!(recurring_details(&estimate("recurring", &params)).lifetime_years, 1.5);
    }

    #[test]
    fn recurring_margin_is_clamped() {
        let params = ParameterSet::new().with(keys::INCREMENTAL_MARGIN, "150");
        assert!(close(recurring_details(&estimate("recurring", &params)).incremental_margin_pct, 90.0));
        let params = ParameterSet::new().with(keys::INCREMENTAL_MARGIN, "2");
        assert!(close(recurring_details(&estimate("recurring", &params)).incremental_margin_pct, 10.0));
    }

    #[test]
    fn projects_formula() {
        let params = ParameterSet::new()
            .with(keys::AVG_CONTRACT_VALUE, "50000")
            .with(keys::AVG_OPERATING_MARGIN, "30")
            .with(keys::QUALIFIED_OPP_PER_QUARTER, "10")
            .with(keys::CONV_OPP_TO_CLIENT, "10")
            .with(keys::EBITDA_MULTIPLE, "8");
        let e = estimate("projects", &params);
        // 10 × 10% × 1.5 × 12 = 18 contracts
        let units = e.details.additional_units_per_year().expect("test: projects units");
        assert!(close(units, 18.0));
        assert!(close(e.additional_revenue, 50_000.0 * 0.30 * 18.0));
        assert!(close(e.valuation_gain, e.additional_revenue * 8.0));
    }

    #[test]
    fn projects_default_multiple_is_six() {
        let e = estimate("projects", &ParameterSet::new());
        assert_eq!(e.details.multiple(), Some(6.0));
        assert_eq!(e.details.margin_pct(), Some(30.0));
    }

    #[test]
    fn transactions_zero_work_fees() {
        let params = ParameterSet::new()
            .with(keys::AVG_TRANSACTION_VALUE, "10 000 000")
            .with(keys::SUCCESS_FEE, "3")
            .with(keys::WORK_FEES, "0")
            .with(keys::CLOSING_PROBABILITY, "50")
            .with(keys::MANDATE_DURATION_MONTHS, "6")
            .with(keys::NET_MARGIN, "40");
        let e = estimate("transactions", &params);
        let Details::Transactions(d) = &e.details else {
            panic!("expected transactions details");
        };
        let expected = (10_000_000.0 * 0.03 * 0.50 + 0.0) * 12.0 / 6.0;
        assert!(close(d.annualised_revenue_per_mandate, expected));
        assert!(close(e.additional_revenue, expected * 0.40 * 14.4));
        assert!(close(e.valuation_gain, e.additional_revenue * 7.0));
    }

    #[test]
    fn transactions_clamps() {
        let params = ParameterSet::new()
            .with(keys::SUCCESS_FEE, "20")
            .with(keys::CLOSING_PROBABILITY, "5")
            .with(keys::MANDATE_DURATION_MONTHS, "48")
            .with(keys::NET_MARGIN, "99");
        let Details::Transactions(d) = estimate("transactions", &params).details else {
            panic!("expected transactions details");
        };
        assert!(close(d.success_fee_pct, 8.0));
        assert!(close(d.closing_probability_pct, 30.0));
        assert_eq!(d.mandate_duration_months, 18.0);
        assert!(close(d.net_margin_pct, 60.0));
    }

    #[test]
    fn financing_formula() {
        let params = ParameterSet::new()
            .with(keys::AVG_FINANCED_AMOUNT, "2000000")
            .with(keys::ANNUAL_SPREAD, "3")
            .with(keys::FINANCING_DURATION_YEARS, "5")
            .with(keys::ARRANGEMENT_FEES, "20000")
            .with(keys::STRUCTURING_FEES, "10000")
            .with(keys::SERVICING_FEES_ANNUAL, "2000")
            .with(keys::NET_MARGIN, "50");
        let e = estimate("financing", &params);
        let Details::Financing(d) = &e.details else {
            panic!("expected financing details");
        };
        let lifetime = 2_000_000.0 * 0.03 * 5.0 + 20_000.0 + 10_000.0 + 2_000.0 * 5.0;
        assert!(close(d.lifetime_revenue_per_deal, lifetime));
        assert!(close(d.annual_revenue_per_deal, lifetime / 5.0));
        assert!(close(e.additional_revenue, lifetime / 5.0 * 0.5 * 14.4));
        assert!(close(e.valuation_gain, e.additional_revenue * 7.0));
    }

    #[test]
    fn financing_duration_clamped_before_division() {
        let params = ParameterSet::new()
            .with(keys::AVG_FINANCED_AMOUNT, "1000000")
            .with(keys::FINANCING_DURATION_YEARS, "0");
        let e = estimate("financing", &params);
        let Details::Financing(d) = &e.details else {
            panic!("expected financing details");
        };
        assert_eq!(d.financing_duration_years, 1.0);
        assert!(e.additional_revenue.is_finite());
    }

    #[test]
    fn asset_management_formula() {
        let params = ParameterSet::new()
            .with(keys::INITIAL_AUM, "5000000")
            .with(keys::MGMT_FEE_ANNUAL, "1")
            .with(keys::PERF_FEE, "10")
            .with(keys::ADDITIONAL_COMMISSIONS, "0,5")
            .with(keys::NET_MARGIN, "40")
            .with(keys::MGMT_FEES_MULTIPLE, "4");
        let e = estimate("asset_management", &params);
        let Details::AssetManagement(d) = &e.details else {
            panic!("expected asset management details");
        };
        let revenue = 5_000_000.0 * (0.01 + 0.10 + 0.005);
        assert!(close(d.annual_revenue_per_relation, revenue));
        assert!(close(e.additional_revenue, revenue * 0.40 * 14.4));
        assert!(close(d.management_fees_annualised, 5_000_000.0 * 0.01 * 14.4));
        assert!(close(e.valuation_gain, d.management_fees_annualised * 4.0));
        assert_eq!(d.relationship_duration_years, 8.0);
    }

    #[test]
    fn unknown_model_is_zeroed() {
        let params = ParameterSet::new().with(keys::ANNUAL_REVENUE_PER_CLIENT, 1000.0);
        assert_eq!(estimate("unknown", &params), Estimate::zeroed());
        assert_eq!(estimate("", &params), Estimate::zeroed());
    }

    #[test]
    fn custom_assumptions_are_honoured() {
        let mut assumptions = Assumptions::default();
        assumptions.growth.uplift = 2.0;
        let estimator = Estimator::new(assumptions);
        let units = estimator.additional_units(ModelVariant::Financing, &ParameterSet::new());
        // 4 × 20% × 2 × 12
        assert!(close(units, 19.2));
    }
}
