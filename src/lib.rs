// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gain Estimator ("Potential Economic Gain" calculator)

pub mod types;
pub mod numeric;
pub mod assumptions;
pub mod fields;
pub mod estimation;
pub mod format;
pub mod results_config;
pub mod indicators;
pub mod session;

pub use types::*;
pub use assumptions::{Assumptions, ConfigError, UPLIFT_MIN};
pub use estimation::{compute_additional_units, Estimator};
pub use indicators::{compute_all_values, ComputeContext, ResultValues};
pub use numeric::{clamp, to_number};
pub use session::{ContactDetails, Session, SessionError, Step};

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Once;
use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

static INIT: Once = Once::new();

/// Install the panic hook and the console tracing layer. Safe to call
/// more than once.
#[wasm_bindgen]
pub fn init() {
    INIT.call_once(|| {
        #[cfg(target_arch = "wasm32")]
        {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            tracing_wasm::set_as_global_default();
        }
    });
}

/// Serialize for JS with plain objects instead of `Map` for keyed data.
fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

fn decode_params(value: JsValue) -> ParameterSet {
    match serde_wasm_bindgen::from_value::<serde_json::Value>(value) {
        Ok(json) => ParameterSet::from_json_value(json),
        Err(e) => {
            tracing::warn!(error = %e, "undecodable parameters, using defaults");
            ParameterSet::new()
        }
    }
}

fn decode_raw(value: &JsValue) -> Option<RawValue> {
    value
        .as_f64()
        .map(RawValue::Number)
        .or_else(|| value.as_string().map(RawValue::Text))
}

/// `estimate(model, params)`; unknown models give a zeroed result.
#[wasm_bindgen]
pub fn estimate(model: &str, params: JsValue) -> JsValue {
    let result = estimation::estimate(model, &decode_params(params));
    to_js(&result)
}

/// Rendered result view, or `null` for an unknown model.
#[wasm_bindgen]
pub fn compute_indicators(model: &str, params: JsValue) -> JsValue {
    match indicators::compute_for_tag(model, &decode_params(params)) {
        Some(values) => to_js(&values),
        None => JsValue::NULL,
    }
}

/// Format a number or `{min, max}` range with a display format tag.
#[wasm_bindgen]
pub fn format_value(value: JsValue, format: &str, compact: bool) -> String {
    let Ok(value) = serde_wasm_bindgen::from_value::<format::IndicatorValue>(value) else {
        return format::PLACEHOLDER.to_string();
    };
    let Some(format) = format::DisplayFormat::parse(format) else {
        tracing::warn!(format = format, "unknown display format");
        return format::PLACEHOLDER.to_string();
    };
    if compact && format == format::DisplayFormat::Currency {
        return format::format_currency_compact(value.headline());
    }
    format::format_value(&value, format)
}

/// Model cards, their questions and section titles.
#[wasm_bindgen]
pub fn model_catalog() -> JsValue {
    to_js(&fields::catalog())
}

/// Wizard session driven from the browser.
#[wasm_bindgen]
pub struct Calculator {
    session: Session,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Calculator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        init();
        Self { session: Session::new() }
    }

    pub fn start(&mut self) {
        self.session.start();
    }

    /// Returns `false` for an unknown model tag.
    pub fn select_model(&mut self, model: &str) -> bool {
        match model.parse::<ModelVariant>() {
            Ok(m) => {
                self.session.select_model(m);
                true
            }
            Err(e) => {
                tracing::warn!("{e}");
                false
            }
        }
    }

    /// Record a form edit; the value must be a number or a string.
    pub fn update_field(&mut self, key: &str, value: JsValue) -> bool {
        let Some(raw) = decode_raw(&value) else {
            return false;
        };
        self.session.update_field(key, raw).is_ok()
    }

    pub fn submit(&mut self) -> JsValue {
        match self.session.submit_parameters() {
            Ok(estimate) => to_js(estimate),
            Err(e) => {
                tracing::warn!("{e}");
                JsValue::NULL
            }
        }
    }

    pub fn back(&mut self) {
        self.session.back();
    }

    pub fn results(&self) -> JsValue {
        match self.session.results() {
            Ok(values) => to_js(&values),
            Err(_) => JsValue::NULL,
        }
    }

    pub fn state(&self) -> JsValue {
        to_js(&self.session.snapshot())
    }

    pub fn open_unlock(&mut self) {
        self.session.open_unlock();
    }

    pub fn close_unlock(&mut self) {
        self.session.close_unlock();
    }

    /// Store the contact answers (an object of strings) and unlock the view.
    pub fn unlock(&mut self, contact: JsValue) {
        let contact = serde_wasm_bindgen::from_value::<BTreeMap<String, String>>(contact)
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "undecodable contact details");
                ContactDetails::new()
            });
        self.session.unlock(contact);
    }

    pub fn is_unlocked(&self) -> bool {
        self.session.is_unlocked()
    }

    /// Reset to the landing step, forgetting every answer.
    pub fn reset(&mut self) {
        self.session = Session::new();
    }
}
