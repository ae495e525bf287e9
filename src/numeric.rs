// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gain Estimator - Numeric Coercion & Clamp Utilities

//! Lenient number parsing for form input.
//!
//! Bad input never surfaces as an error: it degrades to the caller's
//! fallback. Clamping keeps plausible figures inside sector bounds.

use crate::types::RawValue;
use serde::{Deserialize, Serialize};

/// Coerce a raw form value into a finite number.
///
/// Text is stripped of all whitespace (so `"1 234,5"` with a regular,
/// no-break or narrow no-break space works), the first comma becomes the
/// decimal point, then the longest numeric prefix is parsed. Missing,
/// unparsable or non-finite values yield `fallback`.
pub fn to_number(value: Option<&RawValue>, fallback: f64) -> f64 {
    let parsed = match value {
        Some(RawValue::Number(n)) => Some(*n),
        Some(RawValue::Text(s)) => parse_number(s),
        None => None,
    };
    match parsed {
        Some(n) if n.is_finite() => n,
        _ => fallback,
    }
}

/// Parse free text the way a form would, returning `None` when no numeric
/// prefix exists.
pub fn parse_number(text: &str) -> Option<f64> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let normalized = compact.replacen(',', ".", 1);
    let end = numeric_prefix_len(normalized.as_bytes());
    if end == 0 {
        return None;
    }
    normalized[..end].parse::<f64>().ok()
}

/// Length of the longest `[+-]digits[.digits][e[+-]digits]` prefix.
fn numeric_prefix_len(bytes: &[u8]) -> usize {
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        mantissa_digits += j - frac_start;
        if mantissa_digits > 0 {
            i = j;
        }
    }

    if mantissa_digits == 0 {
        return 0;
    }

    // Exponent only counts when at least one digit follows it
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    i
}

/// Two-sided clamp. Unlike `f64::clamp` it never panics: with inverted
/// bounds the upper bound wins.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Closed interval a coerced value is kept inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        clamp(value, self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}
