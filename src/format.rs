// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gain Estimator - Display Formatting

//! French display rules for indicator values.
//!
//! Rounding goes through `rust_decimal` so that halves round away from zero
//! the way a spreadsheet would, instead of inheriting binary float noise.
//! Thousands are grouped with a narrow no-break space (U+202F).

use num_traits::{Signed, ToPrimitive};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Rendered in place of any missing, zero or non-finite figure.
pub const PLACEHOLDER: &str = "—";

const GROUP_SEPARATOR: char = '\u{202f}';

// ─── Display Format ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayFormat {
    Currency,
    Percent,
    Decimal,
    Number,
    Range,
}

impl DisplayFormat {
    /// Parse a lowercase format tag (`currency`, `percent`, ...).
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "currency" => Some(Self::Currency),
            "percent" => Some(Self::Percent),
            "decimal" => Some(Self::Decimal),
            "number" => Some(Self::Number),
            "range" => Some(Self::Range),
            _ => None,
        }
    }
}

/// Raw value of an indicator before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndicatorValue {
    Range { min: f64, max: f64 },
    Number(f64),
}

impl IndicatorValue {
    /// Figure used when a single number is needed: the upper bound of a range.
    pub fn headline(&self) -> f64 {
        match *self {
            Self::Range { max, .. } => max,
            Self::Number(n) => n,
        }
    }

    pub fn is_finite(&self) -> bool {
        match *self {
            Self::Range { min, max } => min.is_finite() && max.is_finite(),
            Self::Number(n) => n.is_finite(),
        }
    }
}

impl From<f64> for IndicatorValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

// ─── Rounding ───────────────────────────────────────────────────────────────

fn to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}

fn round_dp(d: Decimal, dp: u32) -> Decimal {
    d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Round half away from zero to `dp` decimal places. Values outside the
/// decimal range are returned untouched.
pub fn round_half_away(value: f64, dp: u32) -> f64 {
    to_decimal(value)
        .and_then(|d| round_dp(d, dp).to_f64())
        .unwrap_or(value)
}

/// Group the integer digits of `digits` (no sign) by thousands.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(c);
    }
    out
}

/// Decimal rendered with grouped integer part and a comma separator.
fn french_decimal(d: Decimal) -> String {
    let d = d.normalize();
    let sign = if d.is_negative() { "-" } else { "" };
    let text = d.abs().to_string();
    match text.split_once('.') {
        Some((int, frac)) => format!("{sign}{},{frac}", group_thousands(int)),
        None => format!("{sign}{}", group_thousands(&text)),
    }
}

/// Grouped integer, rounded half away from zero. Huge finite values that do
/// not fit a `Decimal` still render, through float rounding.
fn grouped_integer(value: f64) -> String {
    match to_decimal(value) {
        Some(d) => french_decimal(round_dp(d, 0)),
        None => {
            let sign = if value < 0.0 { "-" } else { "" };
            format!("{sign}{}", group_thousands(&format!("{:.0}", value.abs().round())))
        }
    }
}

fn is_falsy(value: f64) -> bool {
    value == 0.0 || !value.is_finite()
}

// ─── Formatters ─────────────────────────────────────────────────────────────

/// `1234567.4` → `1 234 567 €`
pub fn format_currency(value: f64) -> String {
    if is_falsy(value) {
        return PLACEHOLDER.to_string();
    }
    format!("{} €", grouped_integer(value))
}

/// Compact currency: `Md€` from a billion, `M€` (one decimal) from a
/// million, `k€` from a thousand, plain euros below.
pub fn format_currency_compact(value: f64) -> String {
    let Some(d) = to_decimal(value).filter(|d| !d.is_zero()) else {
        return if is_falsy(value) {
            PLACEHOLDER.to_string()
        } else {
            format_currency(value)
        };
    };
    let magnitude = d.abs();
    if magnitude >= dec!(1_000_000_000) {
        format!("{} Md€", french_decimal(round_dp(d / dec!(1_000_000_000), 1)))
    } else if magnitude >= dec!(1_000_000) {
        format!("{} M€", french_decimal(round_dp(d / dec!(1_000_000), 1)))
    } else if magnitude >= dec!(1_000) {
        format!("{} k€", french_decimal(round_dp(d / dec!(1_000), 0)))
    } else {
        format_currency(value)
    }
}

/// `34.6` → `35%`
pub fn format_percent(value: f64) -> String {
    if is_falsy(value) {
        return PLACEHOLDER.to_string();
    }
    format!("{}%", grouped_integer(value))
}

/// One decimal, comma separator, trailing `,0` dropped: `10.8` → `10,8`,
/// `3.0` → `3`.
pub fn format_decimal(value: f64) -> String {
    if is_falsy(value) {
        return PLACEHOLDER.to_string();
    }
    plain_decimal(value)
}

/// Grouped integer.
pub fn format_number(value: f64) -> String {
    if is_falsy(value) {
        return PLACEHOLDER.to_string();
    }
    grouped_integer(value)
}

/// `{min}-{max}`; a range is rendered even when a bound is zero.
pub fn format_range(min: f64, max: f64) -> String {
    if !min.is_finite() || !max.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{}-{}", grouped_integer(min), grouped_integer(max))
}

/// Render an indicator value in the requested format.
pub fn format_value(value: &IndicatorValue, format: DisplayFormat) -> String {
    match (*value, format) {
        (IndicatorValue::Range { min, max }, _) => format_range(min, max),
        (IndicatorValue::Number(n), DisplayFormat::Currency) => format_currency(n),
        (IndicatorValue::Number(n), DisplayFormat::Percent) => format_percent(n),
        (IndicatorValue::Number(n), DisplayFormat::Decimal) => format_decimal(n),
        (IndicatorValue::Number(n), DisplayFormat::Number | DisplayFormat::Range) => {
            format_number(n)
        }
    }
}

// ─── Narrative helpers ──────────────────────────────────────────────────────
//
// Inputs quoted inside sentences ("avec 0% de performance fee") must show
// zero as `0`, so these do not use the placeholder for zero.

/// One-decimal French number, zero kept.
pub fn plain_decimal(value: f64) -> String {
    match to_decimal(value) {
        Some(d) => french_decimal(round_dp(d, 1)),
        None if value.is_finite() => grouped_integer(value),
        None => PLACEHOLDER.to_string(),
    }
}

/// Grouped integer, zero kept.
pub fn plain_number(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    grouped_integer(value)
}

/// Euro amount inside a sentence, without the spaced suffix: `24 000€`.
pub fn plain_euros(value: f64) -> String {
    format!("{}€", plain_number(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_rounds_and_groups() {
        assert_eq!(format_currency(725_760.0), "725\u{202f}760 €");
        assert_eq!(format_currency(1_234_567.5), "1\u{202f}234\u{202f}568 €");
        assert_eq!(format_currency(999.4), "999 €");
        assert_eq!(format_currency(-2_500.0), "-2\u{202f}500 €");
    }

    #[test]
    fn falsy_values_render_placeholder() {
        for f in [format_currency, format_percent, format_decimal, format_number] {
            assert_eq!(f(0.0), PLACEHOLDER);
            assert_eq!(f(f64::NAN), PLACEHOLDER);
            assert_eq!(f(f64::INFINITY), PLACEHOLDER);
        }
        assert_eq!(format_currency_compact(0.0), PLACEHOLDER);
        assert_eq!(format_range(f64::NAN, 3.0), PLACEHOLDER);
    }

    #[test]
    fn compact_currency_suffixes() {
        assert_eq!(format_currency_compact(5_184_000.0), "5,2 M€");
        assert_eq!(format_currency_compact(2_000_000.0), "2 M€");
        assert_eq!(format_currency_compact(1_250_000_000.0), "1,3 Md€");
        assert_eq!(format_currency_compact(725_760.0), "726 k€");
        assert_eq!(format_currency_compact(1_500.0), "2 k€");
        assert_eq!(format_currency_compact(640.0), "640 €");
    }

    #[test]
    fn percent_and_decimal() {
        assert_eq!(format_percent(34.5), "35%");
        assert_eq!(format_percent(70.0), "70%");
        assert_eq!(format_decimal(10.8), "10,8");
        assert_eq!(format_decimal(3.0), "3");
        assert_eq!(format_decimal(3.04), "3");
        assert_eq!(format_decimal(0.25), "0,3");
        assert_eq!(format_decimal(12_345.67), "12\u{202f}345,7");
    }

    #[test]
    fn number_and_range() {
        assert_eq!(format_number(43.2), "43");
        assert_eq!(format_number(12_000.0), "12\u{202f}000");
        assert_eq!(format_range(43.0, 60.0), "43-60");
        assert_eq!(format_range(0.0, 1.0), "0-1");
    }

    #[test]
    fn format_value_dispatches_on_shape() {
        let range = IndicatorValue::Range { min: 4.0, max: 5.0 };
        assert_eq!(format_value(&range, DisplayFormat::Range), "4-5");
        assert_eq!(format_value(&range, DisplayFormat::Currency), "4-5");
        let n = IndicatorValue::Number(10.8);
        assert_eq!(format_value(&n, DisplayFormat::Decimal), "10,8");
        assert_eq!(format_value(&n, DisplayFormat::Number), "11");
        assert_eq!(format_value(&n, DisplayFormat::Percent), "11%");
    }

    #[test]
    fn narrative_helpers_keep_zero() {
        assert_eq!(plain_decimal(0.0), "0");
        assert_eq!(plain_decimal(2.5), "2,5");
        assert_eq!(plain_number(0.0), "0");
        assert_eq!(plain_euros(24_000.0), "24\u{202f}000€");
    }

    #[test]
    fn round_half_away_from_zero() {
        assert_eq!(round_half_away(2.25, 1), 2.3);
        assert_eq!(round_half_away(-2.25, 1), -2.3);
        assert_eq!(round_half_away(10.8, 0), 11.0);
    }

    #[test]
    fn format_tags_parse() {
        assert_eq!(DisplayFormat::parse("currency"), Some(DisplayFormat::Currency));
        assert_eq!(DisplayFormat::parse("range"), Some(DisplayFormat::Range));
        assert_eq!(DisplayFormat::parse("Currency"), None);
    }

    #[test]
    fn indicator_value_serializes_untagged() {
        let json = serde_json::to_value(IndicatorValue::Range { min: 1.0, max: 2.0 })
            .expect("test: serialize");
        assert_eq!(json, serde_json::json!({ "min": 1.0, "max": 2.0 }));
        let json = serde_json::to_value(IndicatorValue::Number(3.5)).expect("test: serialize");
        assert_eq!(json, serde_json::json!(3.5));
    }
}
