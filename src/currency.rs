//! 통화 표시 형식. 계산과 분리된 표시 전용 계층.

use serde::{Deserialize, Serialize};

use crate::toc::CalculatorResult;

/// 숫자 앞뒤 중 통화 기호 위치.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolPosition {
    Prefix,
    Suffix,
}

/// 통화 표시 설정. 기본값은 da-DK 로케일의 DKK 형식(`27.000,00 kr.`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    pub code: String,
    pub symbol: String,
    pub decimal_separator: char,
    pub group_separator: char,
    pub symbol_position: SymbolPosition,
    /// 기호와 숫자 사이에 줄바꿈 없는 공백(U+00A0)을 넣는다.
    pub symbol_spacing: bool,
    pub fraction_digits: u32,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::danish_krone()
    }
}

impl CurrencyFormat {
    /// da-DK, DKK, 소수 둘째 자리.
    pub fn danish_krone() -> Self {
        Self {
            code: "DKK".into(),
            symbol: "kr.".into(),
            decimal_separator: ',',
            group_separator: '.',
            symbol_position: SymbolPosition::Suffix,
            symbol_spacing: true,
            fraction_digits: 2,
        }
    }
}

/// 금액을 문자열로 바꾸는 표시 인터페이스.
pub trait CurrencyFormatter {
    fn format_amount(&self, amount: f64) -> String;
}

impl CurrencyFormatter for CurrencyFormat {
    fn format_amount(&self, amount: f64) -> String {
        let number = if amount.is_nan() {
            "NaN".to_string()
        } else if amount.is_infinite() {
            let sign = if amount < 0.0 { "-" } else { "" };
            format!("{sign}∞")
        } else {
            format_number(amount, self.fraction_digits, self.decimal_separator, self.group_separator)
        };
        let space = if self.symbol_spacing { "\u{a0}" } else { "" };
        match self.symbol_position {
            SymbolPosition::Suffix => format!("{number}{space}{}", self.symbol),
            SymbolPosition::Prefix => match number.strip_prefix('-') {
                Some(rest) => format!("-{}{space}{rest}", self.symbol),
                None => format!("{}{space}{number}", self.symbol),
            },
        }
    }
}

const MAX_FRACTION_DIGITS: u32 = 9;

/// 고정 소수 자리로 반올림(0에서 먼 쪽)하고 천 단위 구분자를 넣는다.
fn format_number(value: f64, digits: u32, decimal_sep: char, group_sep: char) -> String {
    let digits = digits.min(MAX_FRACTION_DIGITS) as usize;
    let (int_digits, frac_digits) = round_decimal(value.abs(), digits);

    let mut grouped = String::with_capacity(int_digits.len() + int_digits.len() / 3);
    for (i, ch) in int_digits.chars().enumerate() {
        if i > 0 && (int_digits.len() - i) % 3 == 0 {
            grouped.push(group_sep);
        }
        grouped.push(ch);
    }

    let is_zero = int_digits.bytes().chain(frac_digits.bytes()).all(|b| b == b'0');
    let mut out = String::new();
    // -0,00 은 표시하지 않는다
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac_digits.is_empty() {
        out.push(decimal_sep);
        out.push_str(&frac_digits);
    }
    out
}

/// 가장 짧은 십진 표현(`1.005`)의 자릿수로 반올림한다. 배율을 곱한 f64는 쓰지 않는다.
fn round_decimal(abs: f64, digits: usize) -> (String, String) {
    let repr = format!("{abs}");
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let mut buf: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(digits))
        .collect();
    let round_up = frac_part.as_bytes().get(digits).is_some_and(|d| *d >= b'5');
    if round_up {
        let mut carry = true;
        for b in buf.iter_mut().rev() {
            if *b == b'9' {
                *b = b'0';
            } else {
                *b += 1;
                carry = false;
                break;
            }
        }
        if carry {
            buf.insert(0, b'1');
        }
    }
    let frac = buf.split_off(buf.len() - digits);
    (
        String::from_utf8_lossy(&buf).into_owned(),
        String::from_utf8_lossy(&frac).into_owned(),
    )
}

/// 표시용으로 변환된 결과 쌍.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedResult {
    pub total_annual_cost: String,
    pub cost_per_hour: String,
}

impl FormattedResult {
    pub fn new(result: &CalculatorResult, formatter: &dyn CurrencyFormatter) -> Self {
        Self {
            total_annual_cost: formatter.format_amount(result.total_annual_cost),
            cost_per_hour: formatter.format_amount(result.cost_per_hour),
        }
    }
}
