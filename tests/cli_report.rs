//! 한 번 계산 모드 출력 테스트.
use toc_calculator::app::{one_shot_form, run_once, AppError};
use toc_calculator::config::{Config, ConfigError};
use toc_calculator::form::{FieldError, FieldId, RawForm};
use toc_calculator::i18n::Translator;

fn filled(values: [&str; 6]) -> RawForm {
    let mut form = RawForm::new();
    for (id, v) in FieldId::ALL.into_iter().zip(values) {
        form.set(id, v);
    }
    form
}

#[test]
fn danish_text_report() {
    let out = run_once(
        &filled(["100000", "5", "2000", "5000", "3000", "20"]),
        &Config::default(),
        &Translator::new("da-dk"),
        false,
    )
    .unwrap();
    assert!(out.contains("Samlede årlige ejeromkostninger: 27.000,00\u{a0}kr."), "{out}");
    assert!(out.contains("Omkostninger pr. driftstime: 13,50\u{a0}kr."), "{out}");
    assert!(out.contains("16.000,00\u{a0}kr."), "{out}");
}

#[test]
fn zero_hours_report_mentions_substitution() {
    let out = run_once(
        &filled(["100000", "5", "0", "5000", "3000", "20"]),
        &Config::default(),
        &Translator::new("en-us"),
        false,
    )
    .unwrap();
    assert!(out.contains("Cost per operating hour: 27.000,00\u{a0}kr."), "{out}");
    assert!(out.contains("based on 1 hour"), "{out}");
}

#[test]
fn json_report_contains_breakdown() {
    let out = run_once(
        &filled(["100000", "5", "2000", "5000", "3000", "20"]),
        &Config::default(),
        &Translator::new("en-us"),
        true,
    )
    .unwrap();
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["breakdown"]["result"]["total_annual_cost"], 27000.0);
    assert_eq!(v["breakdown"]["result"]["cost_per_hour"], 13.5);
    assert_eq!(v["input"]["residual_value"], 20.0);
    assert_eq!(v["formatted"]["cost_per_hour"], "13,50\u{a0}kr.");
    assert_eq!(v["currency"], "DKK");
}

#[test]
fn invalid_values_are_rejected() {
    let err = run_once(
        &filled(["100000", "5", "2000", "5000", "3000", "101"]),
        &Config::default(),
        &Translator::new("en-us"),
        false,
    )
    .unwrap_err();
    match err {
        AppError::Form(e) => assert_eq!(e.errors.len(), 1),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn no_value_flags_means_interactive_mode() {
    assert!(one_shot_form(FieldId::ALL.map(|id| (id, None))).is_none());
}

#[test]
fn single_value_flag_reports_the_other_five_missing() {
    let form = one_shot_form(
        FieldId::ALL.map(|id| (id, (id == FieldId::PurchasePrice).then_some("100000"))),
    )
    .unwrap();
    assert_eq!(form.get(FieldId::PurchasePrice), "100000");

    let err = run_once(&form, &Config::default(), &Translator::new("en-us"), false).unwrap_err();
    assert_eq!(err.exit_code(), 2);
    match err {
        AppError::Form(e) => {
            assert_eq!(e.errors.len(), 5);
            assert!(e.errors.iter().all(|(id, fe)| *id != FieldId::PurchasePrice
                && *fe == FieldError::Missing));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn exit_codes_split_input_errors_from_runtime_failures() {
    assert_eq!(AppError::NonFiniteResult.exit_code(), 2);
    let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
    assert_eq!(AppError::Config(ConfigError::Io(io)).exit_code(), 1);
    assert_eq!(
        AppError::Io(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof")).exit_code(),
        1
    );
}
