//! 입력 폼 검증 테스트.
use toc_calculator::form::{parse_number, FieldError, FieldId, FieldSpec, RawForm, TocForm, FIELDS};

fn filled(values: [&str; 6]) -> RawForm {
    let mut form = RawForm::new();
    for (id, v) in FieldId::ALL.into_iter().zip(values) {
        form.set(id, v);
    }
    form
}

#[test]
fn field_table_rules() {
    assert_eq!(FIELDS.len(), 6);
    for (spec, id) in FIELDS.iter().zip(FieldId::ALL) {
        assert_eq!(spec.id, id);
        assert!(spec.required);
        assert_eq!(spec.min, Some(0.0));
        assert_eq!(FieldId::from_key(spec.key), Some(id));
    }
    assert_eq!(FieldId::ResidualValue.spec().max, Some(100.0));
    assert_eq!(FieldId::PurchasePrice.spec().max, None);
    assert_eq!(FieldId::InterestRate.spec().step, 0.1);
}

#[test]
fn parse_accepts_comma_decimal() {
    assert_eq!(parse_number(" 12,5 "), Ok(12.5));
    assert_eq!(parse_number("7.25"), Ok(7.25));
}

#[test]
fn parse_rejects_blank_and_garbage() {
    assert_eq!(parse_number("   "), Err(FieldError::Missing));
    assert!(matches!(parse_number("abc"), Err(FieldError::NotANumber(_))));
    assert!(matches!(parse_number("inf"), Err(FieldError::NotANumber(_))));
    assert!(matches!(parse_number("NaN"), Err(FieldError::NotANumber(_))));
}

#[test]
fn dotted_thousands_are_rejected_as_ambiguous() {
    for raw in ["100.000", "1.500", "-2.000", "1.500.000"] {
        assert_eq!(
            parse_number(raw),
            Err(FieldError::AmbiguousGrouping(raw.to_string())),
            "{raw}"
        );
    }
    assert_eq!(parse_number("0.125"), Ok(0.125));
    assert_eq!(parse_number("12.5"), Ok(12.5));
    assert_eq!(parse_number("1234.567"), Ok(1234.567));
    assert_eq!(parse_number("100,000"), Ok(100.0));
    assert_eq!(parse_number("100000"), Ok(100_000.0));
}

#[test]
fn optional_field_treats_blank_as_zero() {
    let optional = FieldSpec {
        required: false,
        ..*FieldId::Insurance.spec()
    };
    assert_eq!(optional.validate(""), Ok(0.0));
    assert_eq!(optional.validate("  "), Ok(0.0));
    assert_eq!(optional.validate("-1"), Err(FieldError::BelowMin { min: 0.0 }));
    assert_eq!(FieldId::Insurance.spec().validate(""), Err(FieldError::Missing));
}

#[test]
fn valid_form_builds_input() {
    let input = filled(["100000", "5", "2000", "5000", "3000", "20"])
        .validate()
        .expect("valid");
    assert_eq!(input.purchase_price, 100_000.0);
    assert_eq!(input.interest_rate, 5.0);
    assert_eq!(input.operating_hours, 2000.0);
    assert_eq!(input.service_costs, 5000.0);
    assert_eq!(input.insurance, 3000.0);
    assert_eq!(input.residual_value, 20.0);
}

#[test]
fn range_boundaries_are_inclusive() {
    assert!(filled(["0", "0", "0", "0", "0", "0"]).validate().is_ok());
    assert!(filled(["0", "0", "0", "0", "0", "100"]).validate().is_ok());
}

#[test]
fn all_errors_are_reported_in_field_order() {
    let err = filled(["", "-1", "abc", "5000", "3000", "100.5"])
        .validate()
        .unwrap_err();
    let ids: Vec<FieldId> = err.errors.iter().map(|(id, _)| *id).collect();
    assert_eq!(
        ids,
        vec![
            FieldId::PurchasePrice,
            FieldId::InterestRate,
            FieldId::OperatingHours,
            FieldId::ResidualValue
        ]
    );
    assert_eq!(err.for_field(FieldId::PurchasePrice), Some(&FieldError::Missing));
    assert_eq!(
        err.for_field(FieldId::InterestRate),
        Some(&FieldError::BelowMin { min: 0.0 })
    );
    assert_eq!(
        err.for_field(FieldId::ResidualValue),
        Some(&FieldError::AboveMax { max: 100.0 })
    );
    assert!(err.for_field(FieldId::Insurance).is_none());
}

#[test]
fn form_state_tracks_submission() {
    let mut form = TocForm::new();
    assert!(!form.is_submitted());
    form.raw = filled(["100000", "5", "0", "5000", "3000", "20"]);
    let total = form.submit().expect("valid").result.total_annual_cost;
    assert!((total - 27_000.0).abs() < 1e-9);
    assert!(form.is_submitted());
    assert_eq!(form.input().map(|i| i.operating_hours), Some(0.0));
    assert!(form.error().is_none());

    form.raw.set(FieldId::Insurance, "");
    assert!(form.submit().is_err());
    assert!(!form.is_submitted());
    assert!(form.error().is_some());

    form.reset();
    assert!(form.error().is_none());
    assert_eq!(form.raw, RawForm::new());
}

#[test]
fn from_input_round_trips_through_validation() {
    let original = filled(["1234.5", "3.2", "1500", "100,125", "200", "12.5"])
        .validate()
        .unwrap();
    let again = RawForm::from_input(&original).validate().unwrap();
    assert_eq!(original, again);
}
