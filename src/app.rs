use serde::Serialize;
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::currency::FormattedResult;
use crate::form::{FieldId, FormError, RawForm};
use crate::i18n::{self, Translator};
use crate::toc::{self, CalculatorInput, TocBreakdown};
use crate::ui_cli;
use crate::ui_cli::MenuChoice;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Form(#[from] FormError),
    #[error("JSON 직렬화 오류: {0}")]
    Json(#[from] serde_json::Error),
    /// 입력은 통과했지만 결과가 NaN/무한대
    #[error("계산 결과가 유한하지 않습니다")]
    NonFiniteResult,
}

impl AppError {
    /// 프로세스 종료 코드. 입력 오류는 2, 그 밖의 실패는 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Form(_) | AppError::NonFiniteResult => 2,
            _ => 1,
        }
    }
}

/// 필드별 인자 값으로 한 번 계산용 폼을 만든다. 값이 하나도 없으면 `None`.
/// 빠진 필드는 빈 문자열로 남아 검증에서 누락 오류가 된다.
pub fn one_shot_form<'a, I>(values: I) -> Option<RawForm>
where
    I: IntoIterator<Item = (FieldId, Option<&'a str>)>,
{
    let mut form = RawForm::new();
    let mut any = false;
    for (id, value) in values {
        if let Some(value) = value {
            form.set(id, value);
            any = true;
        }
    }
    any.then_some(form)
}

/// `--json` 출력 형식.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// ISO 4217 통화 코드
    pub currency: &'a str,
    pub input: &'a CalculatorInput,
    pub breakdown: &'a TocBreakdown,
    pub formatted: FormattedResult,
}

/// 한 번 계산하고 출력 문자열을 돌려준다. CLI 인자로 값이 주어졌을 때 사용한다.
pub fn run_once(
    form: &RawForm,
    config: &Config,
    tr: &Translator,
    json: bool,
) -> Result<String, AppError> {
    let input = form.validate()?;
    let breakdown = toc::compute_breakdown(input);
    if !breakdown.result.is_finite() {
        return Err(AppError::NonFiniteResult);
    }
    tracing::info!(
        total_annual_cost = breakdown.result.total_annual_cost,
        cost_per_hour = breakdown.result.cost_per_hour,
        "one-shot calculation"
    );
    if json {
        let report = JsonReport {
            currency: &config.currency.code,
            input: &input,
            breakdown: &breakdown,
            formatted: FormattedResult::new(&breakdown.result, &config.currency),
        };
        Ok(serde_json::to_string_pretty(&report)?)
    } else {
        Ok(ui_cli::render_report(tr, &config.currency, &input, &breakdown).join("\n"))
    }
}

/// CLI 애플리케이션의 메인 루프를 실행한다.
pub fn run(config: &mut Config, tr: &mut Translator) -> Result<(), AppError> {
    loop {
        match ui_cli::main_menu(tr)? {
            MenuChoice::Calculate => ui_cli::handle_calculate(tr, &config.currency)?,
            MenuChoice::Settings => {
                if ui_cli::handle_settings(tr, config)? {
                    let resolved = i18n::resolve_language(&config.language, None);
                    *tr = Translator::new_with_pack(&resolved, config.language_pack_dir.as_deref());
                }
                config.save()?;
                println!("{}", tr.t(i18n::keys::SETTINGS_SAVED));
            }
            MenuChoice::Exit => {
                config.save()?;
                println!("{}", tr.t(i18n::keys::APP_EXIT));
                break;
            }
        }
    }
    Ok(())
}
