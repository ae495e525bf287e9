// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gain Estimator - Wizard Session

//! State owned by the orchestrating layer: current step, chosen model,
//! answers and estimates per model, and the contact gate.
//!
//! The engine never sees the unlock flag; it always computes full results.

use crate::estimation::Estimator;
use crate::fields::link_lifetime_fields;
use crate::indicators::{self, ResultValues};
use crate::types::{Estimate, ModelVariant, ParameterSet, RawValue};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

/// Steps counted by the progress bar (the landing page is step 0).
pub const TOTAL_STEPS: u8 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    #[default]
    Landing,
    Model,
    Parameters,
    Results,
}

impl Step {
    pub fn index(&self) -> u8 {
        match self {
            Self::Landing => 0,
            Self::Model => 1,
            Self::Parameters => 2,
            Self::Results => 3,
        }
    }

    /// Progress bar fill, in percent.
    pub fn progress(&self) -> f64 {
        f64::from(self.index()) / f64::from(TOTAL_STEPS) * 100.0
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Landing => "landing",
            Self::Model => "model",
            Self::Parameters => "parameters",
            Self::Results => "results",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no business model selected")]
    NoModelSelected,
    #[error("no parameters submitted for `{0}`")]
    NoParameters(ModelVariant),
}

/// Contact form answers, kept verbatim. Never validated nor sent anywhere.
pub type ContactDetails = BTreeMap<String, String>;

/// Serializable view of the session for the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub step: Step,
    pub progress: f64,
    pub selected_model: Option<ModelVariant>,
    pub draft: ParameterSet,
    pub unlock_open: bool,
    pub unlocked: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    estimator: Estimator,
    step: Step,
    selected: Option<ModelVariant>,
    draft: ParameterSet,
    parameters: BTreeMap<ModelVariant, ParameterSet>,
    estimates: BTreeMap<ModelVariant, Estimate>,
    unlock_open: bool,
    contact: Option<ContactDetails>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_estimator(estimator: Estimator) -> Self {
        Self { estimator, ..Self::default() }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn selected_model(&self) -> Option<ModelVariant> {
        self.selected
    }

    pub fn draft(&self) -> &ParameterSet {
        &self.draft
    }

    pub fn parameters_for(&self, model: ModelVariant) -> Option<&ParameterSet> {
        self.parameters.get(&model)
    }

    pub fn estimate_for(&self, model: ModelVariant) -> Option<&Estimate> {
        self.estimates.get(&model)
    }

    /// Estimate of the selected model, once its parameters were submitted.
    pub fn estimate(&self) -> Option<&Estimate> {
        self.selected.and_then(|m| self.estimates.get(&m))
    }

    pub fn is_unlocked(&self) -> bool {
        self.contact.is_some()
    }

    pub fn unlock_open(&self) -> bool {
        self.unlock_open
    }

    pub fn contact(&self) -> Option<&ContactDetails> {
        self.contact.as_ref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            step: self.step,
            progress: self.step.progress(),
            selected_model: self.selected,
            draft: self.draft.clone(),
            unlock_open: self.unlock_open,
            unlocked: self.is_unlocked(),
        }
    }

    // ─── Navigation ─────────────────────────────────────────────────────

    pub fn start(&mut self) {
        self.go_to(Step::Model);
    }

    /// Choose a model. Answers previously submitted for it pre-fill the form.
    pub fn select_model(&mut self, model: ModelVariant) {
        self.selected = Some(model);
        self.draft = self.parameters.get(&model).cloned().unwrap_or_default();
        self.go_to(Step::Parameters);
    }

    pub fn back(&mut self) {
        let previous = match self.step {
            Step::Landing | Step::Model => Step::Landing,
            Step::Parameters => Step::Model,
            Step::Results => Step::Parameters,
        };
        if previous == Step::Parameters {
            if let Some(model) = self.selected {
                self.draft = self.parameters.get(&model).cloned().unwrap_or_default();
            }
        }
        self.go_to(previous);
    }

    fn go_to(&mut self, step: Step) {
        if self.step != step {
            tracing::debug!(from = %self.step, to = %step, "session step");
        }
        self.step = step;
    }

    // ─── Parameters ─────────────────────────────────────────────────────

    /// Record one form edit. On the recurring form, duration and churn
    /// keep each other in sync.
    pub fn update_field(&mut self, key: &str, value: impl Into<RawValue>) -> Result<(), SessionError> {
        let model = self.selected.ok_or(SessionError::NoModelSelected)?;
        self.draft.insert(key, value);
        if model == ModelVariant::Recurring {
            link_lifetime_fields(&mut self.draft, key);
        }
        Ok(())
    }

    pub fn replace_draft(&mut self, params: ParameterSet) -> Result<(), SessionError> {
        self.selected.ok_or(SessionError::NoModelSelected)?;
        self.draft = params;
        Ok(())
    }

    /// Snapshot the draft for the selected model, estimate it and move to
    /// the results.
    pub fn submit_parameters(&mut self) -> Result<&Estimate, SessionError> {
        let model = self.selected.ok_or(SessionError::NoModelSelected)?;
        let params = self.draft.clone();
        let estimate = self.estimator.estimate(model, &params);
        tracing::debug!(model = %model, inputs = params.len(), "parameters submitted");

        self.parameters.insert(model, params);
        self.go_to(Step::Results);
        match self.estimates.entry(model) {
            Entry::Occupied(mut slot) => {
                slot.insert(estimate);
                Ok(slot.into_mut())
            }
            Entry::Vacant(slot) => Ok(slot.insert(estimate)),
        }
    }

    /// Rendered result view of the selected model.
    pub fn results(&self) -> Result<ResultValues, SessionError> {
        let model = self.selected.ok_or(SessionError::NoModelSelected)?;
        let (params, estimate) = self
            .parameters
            .get(&model)
            .zip(self.estimates.get(&model))
            .ok_or(SessionError::NoParameters(model))?;
        let growth = indicators::growth_inputs(&self.estimator, model, params);
        indicators::evaluate(estimate, growth).ok_or(SessionError::NoParameters(model))
    }

    // ─── Contact gate ───────────────────────────────────────────────────

    pub fn open_unlock(&mut self) {
        self.unlock_open = true;
    }

    pub fn close_unlock(&mut self) {
        self.unlock_open = false;
    }

    /// Store the contact answers and reveal the detailed figures.
    pub fn unlock(&mut self, contact: ContactDetails) {
        tracing::debug!(fields = contact.len(), "results unlocked");
        self.contact = Some(contact);
        self.unlock_open = false;
    }
}
