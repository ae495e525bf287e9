// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gain Estimator - Type Definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ─── Model Variant ──────────────────────────────────────────────────────────

/// Business model archetype selected by the prospect.
///
/// The set is closed: every variant owns one formula in the estimation
/// engine and one entry in the result configuration map.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModelVariant {
    Recurring,
    Projects,
    Transactions,
    Financing,
    AssetManagement,
}

impl ModelVariant {
    pub const ALL: [ModelVariant; 5] = [
        Self::Recurring,
        Self::Projects,
        Self::Transactions,
        Self::Financing,
        Self::AssetManagement,
    ];

    /// Wire tag used by the form layer (`recurring`, `asset_management`, ...).
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Recurring => "recurring",
            Self::Projects => "projects",
            Self::Transactions => "transactions",
            Self::Financing => "financing",
            Self::AssetManagement => "asset_management",
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown business model `{0}`")]
pub struct UnknownModel(pub String);

impl FromStr for ModelVariant {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.tag() == s)
            .ok_or_else(|| UnknownModel(s.to_string()))
    }
}

// ─── Raw Parameter Values ───────────────────────────────────────────────────

/// A value as produced by a form input: either already numeric or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self { RawValue::Number(v) }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self { RawValue::Number(v as f64) }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self { RawValue::Text(s.to_string()) }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self { RawValue::Text(s) }
}

// ─── Parameter Set ──────────────────────────────────────────────────────────

/// Snapshot of the answers entered for one model, keyed by parameter name.
///
/// No key is required; absent keys fall back to per-field defaults where
/// they are consumed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet(BTreeMap<String, RawValue>);

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with(mut self, key: &str, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<RawValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<RawValue> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Lenient conversion from an arbitrary JSON object. Entries that are
    /// neither numbers nor strings (null, booleans, nested values) are
    /// dropped so that they fall back to defaults downstream.
    pub fn from_json_value(value: serde_json::Value) -> Self {
        let serde_json::Value::Object(map) = value else {
            return Self::default();
        };
        map.into_iter()
            .filter_map(|(k, v)| match v {
                serde_json::Value::Number(n) => n.as_f64().map(|n| (k, RawValue::Number(n))),
                serde_json::Value::String(s) => Some((k, RawValue::Text(s))),
                _ => None,
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// ─── Estimation Result ──────────────────────────────────────────────────────

/// Output of one model formula over a parameter snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    /// Incremental annual revenue (or EBITDA, depending on the model).
    pub additional_revenue: f64,
    /// One-time valuation uplift from capitalising the increment.
    pub valuation_gain: f64,
    /// Fixed narrative bullets naming the economic levers of the model.
    pub levers: Vec<String>,
    /// Intermediate figures for the "show your work" breakdown.
    pub details: Details,
}

impl Estimate {
    /// Result returned for an unrecognised model tag.
    pub fn zeroed() -> Self {
        Self {
            additional_revenue: 0.0,
            valuation_gain: 0.0,
            levers: Vec::new(),
            details: Details::Empty {},
        }
    }
}

/// Model-specific intermediate quantities, serialized as a flat map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Details {
    Recurring(RecurringDetails),
    Projects(ProjectsDetails),
    Transactions(TransactionsDetails),
    Financing(FinancingDetails),
    AssetManagement(AssetManagementDetails),
    Empty {},
}

impl Details {
    /// Additional units (clients, contracts, mandates, deals, relations) per year.
    pub fn additional_units_per_year(&self) -> Option<f64> {
        match self {
            Self::Recurring(d) => Some(d.additional_clients_per_year),
            Self::Projects(d) => Some(d.additional_contracts_per_year),
            Self::Transactions(d) => Some(d.additional_mandates_per_year),
            Self::Financing(d) => Some(d.additional_deals_per_year),
            Self::AssetManagement(d) => Some(d.additional_relations_per_year),
            Self::Empty {} => None,
        }
    }

    /// Margin actually applied after clamping, in percent.
    pub fn margin_pct(&self) -> Option<f64> {
        match self {
            Self::Recurring(d) => Some(d.incremental_margin_pct),
            Self::Projects(d) => Some(d.margin_pct),
            Self::Transactions(d) => Some(d.net_margin_pct),
            Self::Financing(d) => Some(d.net_margin_pct),
            Self::AssetManagement(d) => Some(d.net_margin_pct),
            Self::Empty {} => None,
        }
    }

    /// Valuation multiple used (ARR, EBITDA or management-fee multiple).
    pub fn multiple(&self) -> Option<f64> {
        match self {
            Self::Recurring(d) => Some(d.arr_multiple),
            Self::Projects(d) => Some(d.ebitda_multiple),
            Self::Transactions(d) => Some(d.ebitda_multiple),
            Self::Financing(d) => Some(d.ebitda_multiple),
            Self::AssetManagement(d) => Some(d.mgmt_fees_multiple),
            Self::Empty {} => None,
        }
    }

    /// Flat `(name, value)` listing, sorted by name.
    pub fn entries(&self) -> Vec<(String, f64)> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map
                .into_iter()
                .filter_map(|(k, v)| v.as_f64().map(|n| (k, n)))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringDetails {
    pub lifetime_years: f64,
    pub additional_clients_per_year: f64,
    pub incremental_margin_pct: f64,
    pub arr_multiple: f64,
    pub annual_revenue_per_client: f64,
    /// Annual recurring revenue brought by the additional clients.
    pub incremental_arr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectsDetails {
    pub additional_contracts_per_year: f64,
    pub margin_pct: f64,
    pub ebitda_multiple: f64,
    pub avg_contract_value: f64,
    pub incremental_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsDetails {
    pub annualised_revenue_per_mandate: f64,
    pub additional_mandates_per_year: f64,
    pub net_margin_pct: f64,
    pub ebitda_multiple: f64,
    pub avg_transaction_value: f64,
    /// Probability-weighted success fee plus work fees, for one mandate.
    pub revenue_per_mandate: f64,
    pub success_fee_pct: f64,
    pub closing_probability_pct: f64,
    pub mandate_duration_months: f64,
    pub work_fees: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancingDetails {
    pub annual_revenue_per_deal: f64,
    pub additional_deals_per_year: f64,
    pub net_margin_pct: f64,
    pub ebitda_multiple: f64,
    pub avg_financed_amount: f64,
    pub lifetime_revenue_per_deal: f64,
    pub annual_spread_pct: f64,
    pub financing_duration_years: f64,
    /// Arrangement + structuring + servicing fees over the whole duration.
    pub fees_per_deal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetManagementDetails {
    pub annual_revenue_per_relation: f64,
    pub additional_relations_per_year: f64,
    pub net_margin_pct: f64,
    pub mgmt_fees_multiple: f64,
    pub initial_aum: f64,
    pub mgmt_fee_pct: f64,
    pub perf_fee_pct: f64,
    pub additional_commissions_pct: f64,
    pub relationship_duration_years: f64,
    pub management_fees_annualised: f64,
}
