// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gain Estimator - Audit Scenarios

use gain_estimator::ModelVariant;

// ─── Scenario Configuration ─────────────────────────────────────────────────

/// How the random form answers of a run are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputProfile {
    /// Every question answered with a plausible number.
    Typical,
    /// Roughly half the questions left unanswered or blank.
    Sparse,
    /// Answers typed as French text (`"12 500,5"`).
    TextEntry,
    /// Garbage text, overflowing literals and out-of-range figures.
    Hostile,
    /// Nothing answered at all.
    Empty,
}

impl InputProfile {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Typical => "typical",
            Self::Sparse => "sparse",
            Self::TextEntry => "text",
            Self::Hostile => "hostile",
            Self::Empty => "empty",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Typical => "plausible answers",
            Self::Sparse => "half-filled form",
            Self::TextEntry => "French text entry",
            Self::Hostile => "malformed and extreme input",
            Self::Empty => "no answers",
        }
    }

    const ALL: [InputProfile; 5] =
        [Self::Typical, Self::Sparse, Self::TextEntry, Self::Hostile, Self::Empty];
}

pub struct Scenario {
    pub name: String,
    pub label: String,
    pub model: ModelVariant,
    pub profile: InputProfile,
    pub criteria: PassCriteria,
}

pub struct PassCriteria {
    /// Fraction of runs that must pass every property check.
    pub min_pass_rate: f64,
    /// Relative tolerance on the growth-model cross-check.
    pub units_tolerance: f64,
}

impl Default for PassCriteria {
    fn default() -> Self {
        Self { min_pass_rate: 1.0, units_tolerance: 1e-9 }
    }
}

/// One scenario per model and input profile.
pub fn all_scenarios() -> Vec<Scenario> {
    ModelVariant::ALL
        .into_iter()
        .flat_map(|model| {
            InputProfile::ALL.into_iter().map(move |profile| Scenario {
                name: format!("{}/{}", model.tag(), profile.name()),
                label: format!("{model}: {}", profile.label()),
                model,
                profile,
                criteria: PassCriteria::default(),
            })
        })
        .collect()
}
