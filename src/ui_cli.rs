use std::io::{self, Write};

use crate::app::AppError;
use crate::config::Config;
use crate::currency::{CurrencyFormatter, FormattedResult};
use crate::form::{FieldSpec, RawForm, FIELDS};
use crate::i18n::{keys, Translator};
use crate::toc::{self, CalculatorInput, TocBreakdown};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Calculate,
    Settings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    println!("{}", tr.t(keys::MAIN_MENU_TITLE));
    println!("{}", tr.t(keys::MAIN_MENU_CALCULATE));
    println!("{}", tr.t(keys::MAIN_MENU_SETTINGS));
    println!("{}", tr.t(keys::MAIN_MENU_EXIT));
    loop {
        let sel = read_line(&tr.t(keys::PROMPT_MENU_SELECT))?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::Calculate),
            "2" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 여섯 항목을 차례로 입력받아 계산하고 결과를 출력한다.
pub fn handle_calculate(
    tr: &Translator,
    currency: &dyn CurrencyFormatter,
) -> Result<(), AppError> {
    println!("\n-- {} --", tr.t(keys::FORM_HEADING));
    let mut form = RawForm::new();
    for spec in FIELDS.iter() {
        let value = read_field(tr, spec)?;
        form.set(spec.id, value);
    }
    let input = form.validate()?;
    let breakdown = toc::compute_breakdown(input);
    for line in render_report(tr, currency, &input, &breakdown) {
        println!("{line}");
    }
    Ok(())
}

/// 필드 하나를 검증을 통과할 때까지 다시 묻는다.
fn read_field(tr: &Translator, spec: &FieldSpec) -> Result<String, AppError> {
    let prompt = match spec.range_hint(tr) {
        Some(hint) => format!("{} [{hint}]: ", spec.label(tr)),
        None => format!("{}: ", spec.label(tr)),
    };
    loop {
        let raw = read_line(&prompt)?;
        match spec.validate(&raw) {
            Ok(_) => return Ok(raw.trim().to_string()),
            Err(e) => println!("{}", e.localized(tr)),
        }
    }
}

/// 결과 블록을 줄 단위 문자열로 만든다.
pub fn render_report(
    tr: &Translator,
    currency: &dyn CurrencyFormatter,
    input: &CalculatorInput,
    breakdown: &TocBreakdown,
) -> Vec<String> {
    let mut lines = vec![format!("\n{}", tr.t(keys::RESULT_HEADING))];
    if !breakdown.result.is_finite() {
        lines.push(tr.t(keys::ERROR_NON_FINITE_RESULT));
        return lines;
    }
    let formatted = FormattedResult::new(&breakdown.result, currency);
    lines.push(format!(
        "{} {}",
        tr.t(keys::RESULT_TOTAL_ANNUAL_COST),
        formatted.total_annual_cost
    ));
    lines.push(format!(
        "{} {}",
        tr.t(keys::RESULT_COST_PER_HOUR),
        formatted.cost_per_hour
    ));
    if input.operating_hours <= 0.0 {
        lines.push(tr.t(keys::RESULT_HOURS_NOTE));
    }
    lines.push(format!("\n{}", tr.t(keys::RESULT_BREAKDOWN)));
    for (key, amount) in [
        (keys::RESULT_RESIDUAL_AMOUNT, breakdown.residual_amount),
        (keys::RESULT_DEPRECIATION, breakdown.depreciation),
        (keys::RESULT_AVERAGE_CAPITAL, breakdown.average_capital),
        (keys::RESULT_INTEREST_COST, breakdown.interest_cost),
    ] {
        lines.push(format!("  {} {}", tr.t(key), currency.format_amount(amount)));
    }
    lines
}

/// 설정 메뉴를 처리한다. 언어가 바뀌면 true.
pub fn handle_settings(tr: &Translator, cfg: &mut Config) -> Result<bool, AppError> {
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    println!("{} {}", tr.t(keys::SETTINGS_CURRENT_LANGUAGE), cfg.language);
    println!("{}", tr.t(keys::SETTINGS_OPTIONS));
    let sel = read_line(&tr.t(keys::SETTINGS_PROMPT_CHANGE))?;
    if sel.trim().is_empty() {
        return Ok(false);
    }
    let lang = match sel.trim() {
        "1" => "da-dk",
        "2" => "en-us",
        "3" => "ko-kr",
        "4" => "auto",
        _ => {
            println!("{}", tr.t(keys::SETTINGS_INVALID));
            return Ok(false);
        }
    };
    let changed = cfg.language != lang;
    cfg.language = lang.to_string();
    tracing::info!(language = lang, "language changed");
    Ok(changed)
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        return Err(AppError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stdin closed",
        )));
    }
    Ok(buf)
}
