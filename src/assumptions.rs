// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gain Estimator - Assumption Tables

//! Per-model defaults and plausibility bounds.
//!
//! These tables are the only place a fallback constant or clamp bound
//! lives. The estimation engine reads them; the result configuration map
//! only reads what the engine produced. A table can be overridden from
//! JSON, where omitted sections keep their defaults.

use crate::numeric::{to_number, Bounds};
use crate::types::RawValue;
use serde::{Deserialize, Serialize};

/// Minimum uplift a collaboration is assumed to deliver over the client's
/// best individual performer.
pub const UPLIFT_MIN: f64 = 1.5;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from loading or validating assumption tables.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid assumptions JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{field}` has inverted bounds [{min}, {max}]")]
    InvertedBounds { field: String, min: f64, max: f64 },
    #[error("`{field}` has a non-finite default or bound")]
    NonFinite { field: String },
    #[error("uplift must be at least 1, got {0}")]
    UpliftBelowOne(f64),
    #[error("months per year must be positive, got {0}")]
    NonPositivePeriod(f64),
    #[error("`{field}` is a divisor and needs bounds with a positive minimum")]
    NonPositiveDivisor { field: String },
}

// ---------------------------------------------------------------------------
// Assumption
// ---------------------------------------------------------------------------

/// Default value of one input plus the interval it is clamped to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assumption {
    pub default: f64,
    #[serde(default)]
    pub bounds: Option<Bounds>,
}

impl Assumption {
    /// Unbounded input with a fallback.
    pub const fn fixed(default: f64) -> Self {
        Self { default, bounds: None }
    }

    /// Input clamped to `[min, max]`.
    pub const fn clamped(default: f64, min: f64, max: f64) -> Self {
        Self { default, bounds: Some(Bounds::new(min, max)) }
    }

    /// Coerce without clamping.
    pub fn read(&self, raw: Option<&RawValue>) -> f64 {
        to_number(raw, self.default)
    }

    pub fn clamp(&self, value: f64) -> f64 {
        match self.bounds {
            Some(b) => b.clamp(value),
            None => value,
        }
    }

    /// Coerce then clamp.
    pub fn resolve(&self, raw: Option<&RawValue>) -> f64 {
        self.clamp(self.read(raw))
    }

    /// A value the engine divides by must be clamped away from zero.
    fn validate_divisor(&self, field: &str) -> Result<(), ConfigError> {
        match self.bounds {
            Some(b) if b.min > 0.0 => Ok(()),
            _ => Err(ConfigError::NonPositiveDivisor { field: field.to_string() }),
        }
    }

    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        let finite = self.default.is_finite()
            && self.bounds.map_or(true, |b| b.min.is_finite() && b.max.is_finite());
        if !finite {
            return Err(ConfigError::NonFinite { field: field.to_string() });
        }
        match self.bounds {
            Some(b) if b.min > b.max => Err(ConfigError::InvertedBounds {
                field: field.to_string(),
                min: b.min,
                max: b.max,
            }),
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// GrowthAssumptions
// ---------------------------------------------------------------------------

/// Shared volume model: introductions × conversion × uplift, annualised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthAssumptions {
    /// Fallback introductions per month from the best performer.
    pub intros_per_month: f64,
    /// Fallback introduction → signed conversion rate, in percent.
    pub conversion_rate_pct: f64,
    pub uplift: f64,
    pub months_per_year: f64,
}

impl Default for GrowthAssumptions {
    fn default() -> Self {
        Self {
            intros_per_month: 4.0,
            conversion_rate_pct: 20.0,
            uplift: UPLIFT_MIN,
            months_per_year: 12.0,
        }
    }
}

impl GrowthAssumptions {
    /// Additional units signed per year through the collaboration.
    ///
    /// `intros × conversion% × uplift × months_per_year`
    pub fn additional_units(
        &self,
        intros_per_month: Option<&RawValue>,
        conversion_rate_pct: Option<&RawValue>,
    ) -> f64 {
        let intros = to_number(intros_per_month, self.intros_per_month);
        let conversion = to_number(conversion_rate_pct, self.conversion_rate_pct);
        let base_per_month = intros * conversion / 100.0;
        base_per_month * self.uplift * self.months_per_year
    }

    /// Introductions per month after coercion, before uplift.
    pub fn intros(&self, raw: Option<&RawValue>) -> f64 {
        to_number(raw, self.intros_per_month)
    }

    /// Conversion rate in percent after coercion.
    pub fn conversion(&self, raw: Option<&RawValue>) -> f64 {
        to_number(raw, self.conversion_rate_pct)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, v) in [
            ("growth.intros_per_month", self.intros_per_month),
            ("growth.conversion_rate_pct", self.conversion_rate_pct),
            ("growth.uplift", self.uplift),
            ("growth.months_per_year", self.months_per_year),
        ] {
            if !v.is_finite() {
                return Err(ConfigError::NonFinite { field: field.to_string() });
            }
        }
        if self.uplift < 1.0 {
            return Err(ConfigError::UpliftBelowOne(self.uplift));
        }
        if self.months_per_year <= 0.0 {
            return Err(ConfigError::NonPositivePeriod(self.months_per_year));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Per-model tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecurringAssumptions {
    pub annual_revenue_per_client: Assumption,
    pub incremental_margin_pct: Assumption,
    /// Explicit contract duration; zero means "not given".
    pub contract_duration_years: Assumption,
    /// Annual churn; clamped only when non-zero.
    pub churn_pct: Assumption,
    /// Client lifetime; the default applies when neither duration nor churn is given.
    pub lifetime_years: Assumption,
    pub arr_multiple: Assumption,
}

impl Default for RecurringAssumptions {
    fn default() -> Self {
        Self {
            annual_revenue_per_client: Assumption::fixed(0.0),
            incremental_margin_pct: Assumption::clamped(60.0, 10.0, 90.0),
            contract_duration_years: Assumption::fixed(0.0),
            churn_pct: Assumption::clamped(0.0, 2.0, 35.0),
            lifetime_years: Assumption::clamped(4.0, 1.5, 8.0),
            arr_multiple: Assumption::fixed(6.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectsAssumptions {
    pub avg_contract_value: Assumption,
    pub operating_margin_pct: Assumption,
    pub ebitda_multiple: Assumption,
}

impl Default for ProjectsAssumptions {
    fn default() -> Self {
        Self {
            avg_contract_value: Assumption::fixed(0.0),
            operating_margin_pct: Assumption::clamped(30.0, 5.0, 60.0),
            ebitda_multiple: Assumption::fixed(6.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionsAssumptions {
    pub avg_transaction_value: Assumption,
    pub success_fee_pct: Assumption,
    pub work_fees: Assumption,
    pub closing_probability_pct: Assumption,
    pub mandate_duration_months: Assumption,
    pub net_margin_pct: Assumption,
    pub ebitda_multiple: Assumption,
}

impl Default for TransactionsAssumptions {
    fn default() -> Self {
        Self {
            avg_transaction_value: Assumption::fixed(0.0),
            success_fee_pct: Assumption::clamped(3.0, 1.5, 8.0),
            work_fees: Assumption::fixed(0.0),
            closing_probability_pct: Assumption::clamped(60.0, 30.0, 90.0),
            mandate_duration_months: Assumption::clamped(9.0, 3.0, 18.0),
            net_margin_pct: Assumption::clamped(35.0, 10.0, 60.0),
            ebitda_multiple: Assumption::fixed(7.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancingAssumptions {
    pub avg_financed_amount: Assumption,
    pub annual_spread_pct: Assumption,
    pub duration_years: Assumption,
    pub arrangement_fees: Assumption,
    pub structuring_fees: Assumption,
    pub servicing_fees_annual: Assumption,
    pub net_margin_pct: Assumption,
    pub ebitda_multiple: Assumption,
}

impl Default for FinancingAssumptions {
    fn default() -> Self {
        Self {
            avg_financed_amount: Assumption::fixed(0.0),
            annual_spread_pct: Assumption::clamped(3.0, 1.0, 8.0),
            duration_years: Assumption::clamped(4.0, 1.0, 10.0),
            arrangement_fees: Assumption::fixed(0.0),
            structuring_fees: Assumption::fixed(0.0),
            servicing_fees_annual: Assumption::fixed(0.0),
            net_margin_pct: Assumption::clamped(35.0, 10.0, 60.0),
            ebitda_multiple: Assumption::fixed(7.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManagementAssumptions {
    pub initial_aum: Assumption,
    pub mgmt_fee_pct: Assumption,
    pub perf_fee_pct: Assumption,
    pub additional_commissions_pct: Assumption,
    pub relationship_duration_years: Assumption,
    pub net_margin_pct: Assumption,
    pub mgmt_fees_multiple: Assumption,
}

impl Default for AssetManagementAssumptions {
    fn default() -> Self {
        Self {
            initial_aum: Assumption::fixed(0.0),
            mgmt_fee_pct: Assumption::clamped(0.8, 0.4, 2.5),
            perf_fee_pct: Assumption::clamped(0.0, 0.0, 20.0),
            additional_commissions_pct: Assumption::clamped(0.0, 0.0, 1.5),
            relationship_duration_years: Assumption::clamped(8.0, 3.0, 20.0),
            net_margin_pct: Assumption::clamped(35.0, 15.0, 60.0),
            mgmt_fees_multiple: Assumption::fixed(3.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Assumptions
// ---------------------------------------------------------------------------

/// Complete set of tables consumed by the estimation engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assumptions {
    pub growth: GrowthAssumptions,
    pub recurring: RecurringAssumptions,
    pub projects: ProjectsAssumptions,
    pub transactions: TransactionsAssumptions,
    pub financing: FinancingAssumptions,
    pub asset_management: AssetManagementAssumptions,
}

impl Assumptions {
    /// Parse a (possibly partial) JSON override and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let assumptions: Self = serde_json::from_str(json)?;
        assumptions.validate()?;
        Ok(assumptions)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.growth.validate()?;
        for (field, a) in self.named() {
            a.validate(field)?;
        }
        for (field, a) in [
            ("recurring.churn_pct", &self.recurring.churn_pct),
            ("transactions.mandate_duration_months", &self.transactions.mandate_duration_months),
            ("financing.duration_years", &self.financing.duration_years),
        ] {
            a.validate_divisor(field)?;
        }
        Ok(())
    }

    /// Every per-model assumption with its dotted name.
    pub fn named(&self) -> Vec<(&'static str, &Assumption)> {
        let r = &self.recurring;
        let p = &self.projects;
        let t = &self.transactions;
        let f = &self.financing;
        let a = &self.asset_management;
        vec![
            ("recurring.annual_revenue_per_client", &r.annual_revenue_per_client),
            ("recurring.incremental_margin_pct", &r.incremental_margin_pct),
            ("recurring.contract_duration_years", &r.contract_duration_years),
            ("recurring.churn_pct", &r.churn_pct),
            ("recurring.lifetime_years", &r.lifetime_years),
            ("recurring.arr_multiple", &r.arr_multiple),
            ("projects.avg_contract_value", &p.avg_contract_value),
            ("projects.operating_margin_pct", &p.operating_margin_pct),
            ("projects.ebitda_multiple", &p.ebitda_multiple),
            ("transactions.avg_transaction_value", &t.avg_transaction_value),
            ("transactions.success_fee_pct", &t.success_fee_pct),
            ("transactions.work_fees", &t.work_fees),
            ("transactions.closing_probability_pct", &t.closing_probability_pct),
            ("transactions.mandate_duration_months", &t.mandate_duration_months),
            ("transactions.net_margin_pct", &t.net_margin_pct),
            ("transactions.ebitda_multiple", &t.ebitda_multiple),
            ("financing.avg_financed_amount", &f.avg_financed_amount),
            ("financing.annual_spread_pct", &f.annual_spread_pct),
            ("financing.duration_years", &f.duration_years),
            ("financing.arrangement_fees", &f.arrangement_fees),
            ("financing.structuring_fees", &f.structuring_fees),
            ("financing.servicing_fees_annual", &f.servicing_fees_annual),
            ("financing.net_margin_pct", &f.net_margin_pct),
            ("financing.ebitda_multiple", &f.ebitda_multiple),
            ("asset_management.initial_aum", &a.initial_aum),
            ("asset_management.mgmt_fee_pct", &a.mgmt_fee_pct),
            ("asset_management.perf_fee_pct", &a.perf_fee_pct),
            ("asset_management.additional_commissions_pct", &a.additional_commissions_pct),
            ("asset_management.relationship_duration_years", &a.relationship_duration_years),
            ("asset_management.net_margin_pct", &a.net_margin_pct),
            ("asset_management.mgmt_fees_multiple", &a.mgmt_fees_multiple),
        ]
    }
}

// ===========================================================================
// Tests
// ===========================================================================
