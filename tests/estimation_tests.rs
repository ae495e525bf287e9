#[cfg(test)]
mod tests {
    use gain_estimator::estimation;
    use gain_estimator::fields::{growth_keys, keys};
    use gain_estimator::format::PLACEHOLDER;
    use gain_estimator::indicators::{compute_for_tag, Group};
    use gain_estimator::*;
    use rust_decimal::prelude::FromPrimitive;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6 * b.abs().max(1.0)
    }

    fn cents(v: f64) -> Decimal {
        Decimal::from_f64(v).expect("test: finite figure").round_dp(2)
    }

    fn full_recurring() -> ParameterSet {
        ParameterSet::new()
            .with(keys::ANNUAL_REVENUE_PER_CLIENT, 24_000.0)
            .with(keys::INCREMENTAL_MARGIN, 70.0)
            .with(keys::INTROS_PER_QUARTER, 12.0)
            .with(keys::CONV_INTRO_TO_CLIENT, 20.0)
            .with(keys::ARR_MULTIPLE, 5.0)
    }

    /// Margin key and its clamp bounds for each model.
    fn margin_key(model: ModelVariant) -> (&'static str, f64, f64) {
        match model {
            ModelVariant::Recurring => (keys::INCREMENTAL_MARGIN, 10.0, 90.0),
            ModelVariant::Projects => (keys::AVG_OPERATING_MARGIN, 5.0, 60.0),
            ModelVariant::Transactions => (keys::NET_MARGIN, 10.0, 60.0),
            ModelVariant::Financing => (keys::NET_MARGIN, 10.0, 60.0),
            ModelVariant::AssetManagement => (keys::NET_MARGIN, 15.0, 60.0),
        }
    }

    // ========== Determinism ==========

    #[test]
    fn test_same_inputs_same_estimate() {
        for model in ModelVariant::ALL {
            let params = ParameterSet::new()
                .with(growth_keys(model).0, "7")
                .with(growth_keys(model).1, "35,5");
            let a = estimation::estimate(model.tag(), &params);
            let b = estimation::estimate(model.tag(), &params);
            assert_eq!(a, b, "{model} is not deterministic");
        }
    }

    #[test]
    fn test_rendering_is_idempotent() {
        for model in ModelVariant::ALL {
            let a = compute_all_values(model, &ParameterSet::new());
            let b = compute_all_values(model, &ParameterSet::new());
            let a = serde_json::to_string(&a).expect("test: serialize");
            let b = serde_json::to_string(&b).expect("test: serialize");
            assert_eq!(a, b, "{model} renders differently twice");
        }
    }

    // ========== Fallback Completeness ==========

    #[test]
    fn test_empty_parameters_give_non_negative_results() {
        for model in ModelVariant::ALL {
            let e = estimation::estimate(model.tag(), &ParameterSet::new());
            assert!(e.additional_revenue >= 0.0, "{model}: {}", e.additional_revenue);
            assert!(e.valuation_gain >= 0.0, "{model}: {}", e.valuation_gain);
            assert!(e.additional_revenue.is_finite() && e.valuation_gain.is_finite());
            assert_eq!(e.levers.len(), 3, "{model} should name three levers");
            let units = e.details.additional_units_per_year().expect("test: model details");
            assert!(close(units, 14.4), "{model}: default units {units}");
        }
    }

    #[test]
    fn test_blank_strings_behave_like_missing_keys() {
        for model in ModelVariant::ALL {
            let blank: ParameterSet = gain_estimator::fields::fields_for(model)
                .iter()
                .map(|f| (f.key, ""))
                .collect();
            assert_eq!(
                estimation::estimate(model.tag(), &blank),
                estimation::estimate(model.tag(), &ParameterSet::new()),
                "{model}"
            );
        }
    }

    // ========== Clamp Invariants ==========

    #[test]
    fn test_margin_clamped_for_every_model() {
        for model in ModelVariant::ALL {
            let (key, min, max) = margin_key(model);

            let high = ParameterSet::new().with(key, "150");
            let e = estimation::estimate(model.tag(), &high);
            let margin = e.details.margin_pct().expect("test: margin");
            assert!(close(margin, max), "{model}: high margin {margin}");

            let low = ParameterSet::new().with(key, -20.0);
            let e = estimation::estimate(model.tag(), &low);
            let margin = e.details.margin_pct().expect("test: margin");
            assert!(close(margin, min), "{model}: low margin {margin}");
        }
    }

    #[test]
    fn test_recurring_churn_clamped_before_lifetime() {
        // 95% churn clamps to 35%, lifetime 100/35 then within [1.5, 8]
        let params = full_recurring().with(keys::ANNUAL_RETENTION_RATE, 95.0);
        let e = estimation::estimate("recurring", &params);
        let Details::Recurring(d) = e.details else {
            panic!("test: recurring details expected");
        };
        assert!(close(d.lifetime_years, 100.0 / 35.0));
    }

    fn financing_details(params: &ParameterSet) -> FinancingDetails {
        match estimation::estimate("financing", params).details {
            Details::Financing(d) => d,
            other => panic!("test: financing details expected, got {other:?}"),
        }
    }

    fn asset_management_details(params: &ParameterSet) -> AssetManagementDetails {
        match estimation::estimate("asset_management", params).details {
            Details::AssetManagement(d) => d,
            other => panic!("test: asset management details expected, got {other:?}"),
        }
    }

    #[test]
    fn test_financing_inputs_clamped_both_ways() {
        type Read = fn(&FinancingDetails) -> f64;
        let cases: [(&str, f64, f64, Read); 4] = [
            (keys::ANNUAL_SPREAD, 12.0, 8.0, |d| d.annual_spread_pct),
            (keys::ANNUAL_SPREAD, 0.2, 1.0, |d| d.annual_spread_pct),
            (keys::FINANCING_DURATION_YEARS, 25.0, 10.0, |d| d.financing_duration_years),
            (keys::FINANCING_DURATION_YEARS, 0.0, 1.0, |d| d.financing_duration_years),
        ];
        for (key, input, bound, read) in cases {
            let d = financing_details(&ParameterSet::new().with(key, input));
            assert!(close(read(&d), bound), "{key}={input}: got {}", read(&d));
        }
    }

    #[test]
    fn test_asset_management_inputs_clamped_both_ways() {
        type Read = fn(&AssetManagementDetails) -> f64;
        let cases: [(&str, f64, f64, Read); 8] = [
            (keys::MGMT_FEE_ANNUAL, 4.0, 2.5, |d| d.mgmt_fee_pct),
            (keys::MGMT_FEE_ANNUAL, 0.1, 0.4, |d| d.mgmt_fee_pct),
            (keys::PERF_FEE, 35.0, 20.0, |d| d.perf_fee_pct),
            (keys::PERF_FEE, -5.0, 0.0, |d| d.perf_fee_pct),
            (keys::ADDITIONAL_COMMISSIONS, 3.0, 1.5, |d| d.additional_commissions_pct),
            (keys::ADDITIONAL_COMMISSIONS, -1.0, 0.0, |d| d.additional_commissions_pct),
            (keys::RELATIONSHIP_DURATION_YEARS, 40.0, 20.0, |d| d.relationship_duration_years),
            (keys::RELATIONSHIP_DURATION_YEARS, 1.0, 3.0, |d| d.relationship_duration_years),
        ];
        for (key, input, bound, read) in cases {
            let d = asset_management_details(&ParameterSet::new().with(key, input));
            assert!(close(read(&d), bound), "{key}={input}: got {}", read(&d));
        }
    }

    #[test]
    fn test_zero_durations_stay_finite() {
        let financing = estimation::estimate(
            "financing",
            &ParameterSet::new()
                .with(keys::AVG_FINANCED_AMOUNT, 1_000_000.0)
                .with(keys::FINANCING_DURATION_YEARS, "0"),
        );
        let transactions = estimation::estimate(
            "transactions",
            &ParameterSet::new()
                .with(keys::AVG_TRANSACTION_VALUE, 5_000_000.0)
                .with(keys::MANDATE_DURATION_MONTHS, "0"),
        );
        for e in [financing, transactions] {
            assert!(e.additional_revenue.is_finite() && e.additional_revenue > 0.0);
            assert!(e.valuation_gain.is_finite() && e.valuation_gain > 0.0);
        }
    }

    // ========== Decimal-Separator Tolerance ==========

    #[test]
    fn test_french_and_dotted_numbers_agree() {
        let french = RawValue::from("1 234,5");
        let dotted = RawValue::from("1234.5");
        assert_eq!(to_number(Some(&french), 0.0), 1234.5);
        assert_eq!(to_number(Some(&dotted), 0.0), 1234.5);

        let nbsp = RawValue::from("1\u{a0}234,5");
        assert_eq!(to_number(Some(&nbsp), 0.0), 1234.5);
    }

    #[test]
    fn test_text_inputs_match_numeric_inputs() {
        let text = ParameterSet::new()
            .with(keys::ANNUAL_REVENUE_PER_CLIENT, "24 000")
            .with(keys::INCREMENTAL_MARGIN, "70")
            .with(keys::INTROS_PER_QUARTER, "12")
            .with(keys::CONV_INTRO_TO_CLIENT, "20,0")
            .with(keys::ARR_MULTIPLE, "5");
        assert_eq!(
            estimation::estimate("recurring", &text),
            estimation::estimate("recurring", &full_recurring())
        );
    }

    // ========== Uplift Consistency ==========

    #[test]
    fn test_units_follow_growth_formula_for_every_model() {
        for model in ModelVariant::ALL {
            let (intros_key, conv_key) = growth_keys(model);
            let intros = RawValue::from(9.0);
            let conv = RawValue::from("25");
            let params = ParameterSet::new()
                .with(intros_key, intros.clone())
                .with(conv_key, conv.clone());

            let e = estimation::estimate(model.tag(), &params);
            let units = e.details.additional_units_per_year().expect("test: units");
            let expected = compute_additional_units(Some(&intros), Some(&conv));
            assert!(close(units, expected), "{model}: {units} vs {expected}");
            assert!(close(units, 9.0 * 0.25 * UPLIFT_MIN * 12.0));
        }
    }

    // ========== Scenarios ==========

    #[test]
    fn test_recurring_full_inputs() {
        let e = estimation::estimate("recurring", &full_recurring());
        let units = e.details.additional_units_per_year().expect("test: units");
        assert!(close(units, 43.2));
        assert_eq!(cents(e.additional_revenue), dec!(725760));
        assert_eq!(cents(e.valuation_gain), dec!(5184000));
    }

    #[test]
    fn test_unknown_model_is_zeroed() {
        let params = full_recurring();
        let e = estimation::estimate("unknown", &params);
        assert_eq!(e, Estimate::zeroed());
        let json = serde_json::to_value(&e).expect("test: serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "additionalRevenue": 0.0,
                "valuationGain": 0.0,
                "levers": [],
                "details": {}
            })
        );
        assert!(compute_for_tag("unknown", &params).is_none());
    }

    #[test]
    fn test_transactions_zero_work_fees() {
        let params = ParameterSet::new()
            .with(keys::AVG_TRANSACTION_VALUE, 10_000_000.0)
            .with(keys::SUCCESS_FEE, 3.0)
            .with(keys::CLOSING_PROBABILITY, 60.0)
            .with(keys::MANDATE_DURATION_MONTHS, 9.0)
            .with(keys::WORK_FEES, 0.0);
        let e = estimation::estimate("transactions", &params);
        let Details::Transactions(d) = e.details else {
            panic!("test: transactions details expected");
        };
        let expected = (10_000_000.0 * 0.03 * 0.60 + 0.0) * 12.0 / 9.0;
        assert!(close(d.annualised_revenue_per_mandate, expected));
        assert_eq!(cents(d.annualised_revenue_per_mandate), dec!(240000));
    }

    // ========== Result View ==========

    #[test]
    fn test_recurring_result_view() {
        let view = compute_all_values(ModelVariant::Recurring, &full_recurring());
        let valuation = view
            .get(Group::ProjectionsValue, "valuationGain")
            .expect("test: valuation indicator");
        assert_eq!(valuation.display, "1\u{202f}296\u{202f}000 €");

        let intros = view
            .get(Group::YourFiguresVolume, "introsPerMonth")
            .expect("test: intros indicator");
        assert_eq!(intros.display, "12");
        assert_eq!(view.context.intros, 60.0);
        assert_eq!(view.context.clients_range, "8 - 12");
    }

    #[test]
    fn test_every_indicator_renders_cleanly() {
        for model in ModelVariant::ALL {
            let view = compute_all_values(model, &ParameterSet::new());
            assert!(view.all().count() > 0, "{model} rendered nothing");
            for indicator in view.all() {
                assert!(!indicator.label.is_empty(), "{model}/{}", indicator.key);
                assert!(!indicator.display.is_empty(), "{model}/{}", indicator.key);
                assert!(!indicator.display.contains("NaN"), "{model}/{}", indicator.key);
            }
        }
    }

    #[test]
    fn test_unfilled_figures_use_placeholder() {
        // No contract value: per-contract figures have nothing to show
        let view = compute_all_values(ModelVariant::Projects, &ParameterSet::new());
        let contract = view
            .get(Group::YourFiguresValue, "contractValue")
            .expect("test: contract value indicator");
        assert_eq!(contract.display, PLACEHOLDER);
    }

    // ========== Session ==========

    #[test]
    fn test_session_walkthrough() {
        let mut session = Session::new();
        assert_eq!(session.step(), Step::Landing);
        assert_eq!(session.update_field("x", 1.0), Err(SessionError::NoModelSelected));

        session.start();
        session.select_model(ModelVariant::Recurring);
        for (key, value) in full_recurring().iter() {
            session.update_field(key, value.clone()).expect("test: model selected");
        }
        let revenue = session
            .submit_parameters()
            .expect("test: submit")
            .additional_revenue;
        assert_eq!(cents(revenue), dec!(725760));
        assert_eq!(session.step(), Step::Results);

        let view = session.results().expect("test: results");
        assert_eq!(view.model, ModelVariant::Recurring);
        assert!(!session.is_unlocked());

        session.open_unlock();
        session.unlock(ContactDetails::from([("email".to_string(), "a@b.fr".to_string())]));
        assert!(session.is_unlocked());

        // Returning to the model restores its last answers
        session.start();
        session.select_model(ModelVariant::Projects);
        assert!(session.draft().is_empty());
        session.select_model(ModelVariant::Recurring);
        assert_eq!(session.draft(), &full_recurring());
    }

    #[test]
    fn test_custom_assumptions_flow_through() {
        let json = r#"{ "growth": { "uplift": 2.0 } }"#;
        let assumptions = Assumptions::from_json(json).expect("test: valid assumptions");
        let estimator = Estimator::new(assumptions);
        let e = estimator.estimate(ModelVariant::Recurring, &full_recurring());
        let units = e.details.additional_units_per_year().expect("test: units");
        assert!(close(units, 12.0 * 0.20 * 2.0 * 12.0));
    }
}
