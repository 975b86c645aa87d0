//! 입력 폼 모델. 여섯 개 필드의 규칙을 정적 테이블로 두고 계산 함수와 분리한다.

use std::fmt;

use thiserror::Error;

use crate::i18n::{keys, Translator};
use crate::toc::{self, CalculatorInput, TocBreakdown};

/// 폼 필드 식별자. 표시 순서대로 나열한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    PurchasePrice,
    InterestRate,
    OperatingHours,
    ServiceCosts,
    Insurance,
    ResidualValue,
}

/// 필드별 라벨/단위/검증 규칙.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub id: FieldId,
    pub key: &'static str,
    /// 라벨 번역 키
    pub label_key: &'static str,
    /// 단위 번역 키
    pub unit_key: &'static str,
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// 입력 증분 힌트. 검증에는 쓰지 않는다.
    pub step: f64,
}

pub const FIELDS: [FieldSpec; 6] = [
    FieldSpec {
        id: FieldId::PurchasePrice,
        key: "purchase_price",
        label_key: keys::FIELD_PURCHASE_PRICE,
        unit_key: keys::UNIT_CURRENCY,
        required: true,
        min: Some(0.0),
        max: None,
        step: 1.0,
    },
    FieldSpec {
        id: FieldId::InterestRate,
        key: "interest_rate",
        label_key: keys::FIELD_INTEREST_RATE,
        unit_key: keys::UNIT_PERCENT_PER_YEAR,
        required: true,
        min: Some(0.0),
        max: None,
        step: 0.1,
    },
    FieldSpec {
        id: FieldId::OperatingHours,
        key: "operating_hours",
        label_key: keys::FIELD_OPERATING_HOURS,
        unit_key: keys::UNIT_HOURS_PER_YEAR,
        required: true,
        min: Some(0.0),
        max: None,
        step: 1.0,
    },
    FieldSpec {
        id: FieldId::ServiceCosts,
        key: "service_costs",
        label_key: keys::FIELD_SERVICE_COSTS,
        unit_key: keys::UNIT_CURRENCY_PER_YEAR,
        required: true,
        min: Some(0.0),
        max: None,
        step: 1.0,
    },
    FieldSpec {
        id: FieldId::Insurance,
        key: "insurance",
        label_key: keys::FIELD_INSURANCE,
        unit_key: keys::UNIT_CURRENCY_PER_YEAR,
        required: true,
        min: Some(0.0),
        max: None,
        step: 1.0,
    },
    FieldSpec {
        id: FieldId::ResidualValue,
        key: "residual_value",
        label_key: keys::FIELD_RESIDUAL_VALUE,
        unit_key: keys::UNIT_PERCENT_OF_PRICE,
        required: true,
        min: Some(0.0),
        max: Some(100.0),
        step: 0.1,
    },
];

impl FieldId {
    pub const ALL: [FieldId; 6] = [
        FieldId::PurchasePrice,
        FieldId::InterestRate,
        FieldId::OperatingHours,
        FieldId::ServiceCosts,
        FieldId::Insurance,
        FieldId::ResidualValue,
    ];

    fn index(self) -> usize {
        match self {
            FieldId::PurchasePrice => 0,
            FieldId::InterestRate => 1,
            FieldId::OperatingHours => 2,
            FieldId::ServiceCosts => 3,
            FieldId::Insurance => 4,
            FieldId::ResidualValue => 5,
        }
    }

    pub fn spec(self) -> &'static FieldSpec {
        &FIELDS[self.index()]
    }

    pub fn key(self) -> &'static str {
        self.spec().key
    }

    /// `purchase_price` 형태의 키로 필드를 찾는다.
    pub fn from_key(key: &str) -> Option<FieldId> {
        FIELDS.iter().find(|f| f.key == key).map(|f| f.id)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// 단일 필드 검증 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("value is required")]
    Missing,
    #[error("not a number: {0}")]
    NotANumber(String),
    /// `100.000`처럼 천 단위 구분인지 소수점인지 알 수 없는 입력
    #[error("ambiguous number (thousands separator?): {0}")]
    AmbiguousGrouping(String),
    #[error("must be at least {min}")]
    BelowMin { min: f64 },
    #[error("must be at most {max}")]
    AboveMax { max: f64 },
}

impl FieldError {
    /// 화면 표시용 번역 키.
    pub fn message_key(&self) -> &'static str {
        match self {
            FieldError::Missing => keys::ERROR_REQUIRED,
            FieldError::NotANumber(_) => keys::ERROR_INVALID_NUMBER,
            FieldError::AmbiguousGrouping(_) => keys::ERROR_AMBIGUOUS_NUMBER,
            FieldError::BelowMin { .. } => keys::ERROR_BELOW_MIN,
            FieldError::AboveMax { .. } => keys::ERROR_ABOVE_MAX,
        }
    }

    /// 번역된 오류 메시지.
    pub fn localized(&self, tr: &Translator) -> String {
        match self {
            FieldError::BelowMin { min } => tr.tf(self.message_key(), &[("min", min.to_string())]),
            FieldError::AboveMax { max } => tr.tf(self.message_key(), &[("max", max.to_string())]),
            _ => tr.t(self.message_key()),
        }
    }
}

/// 폼 전체 검증 오류. 필드 순서대로 모든 오류를 담는다.
#[derive(Debug, Clone, PartialEq)]
pub struct FormError {
    pub errors: Vec<(FieldId, FieldError)>,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(id, e)| format!("{id}: {e}"))
            .collect();
        write!(f, "invalid input ({})", parts.join(", "))
    }
}

impl std::error::Error for FormError {}

impl FormError {
    pub fn for_field(&self, id: FieldId) -> Option<&FieldError> {
        self.errors.iter().find(|(f, _)| *f == id).map(|(_, e)| e)
    }
}

/// 문자열 입력을 숫자로 변환한다. 소수점은 `.` 또는 `,` 모두 허용한다.
/// `,`가 없고 `.` 뒤가 세 자리 묶음뿐인 입력(`100.000`, `1.500.000`)은 da-DK 천 단위
/// 구분과 구별할 수 없으므로 거부한다.
pub fn parse_number(raw: &str) -> Result<f64, FieldError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(FieldError::Missing);
    }
    if looks_grouped(s) {
        return Err(FieldError::AmbiguousGrouping(s.to_string()));
    }
    let normalized = s.replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(FieldError::NotANumber(s.to_string())),
    }
}

fn looks_grouped(s: &str) -> bool {
    if s.contains(',') {
        return false;
    }
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let mut parts = unsigned.split('.');
    let head = parts.next().unwrap_or_default();
    let head_ok = (1..=3).contains(&head.len())
        && !head.starts_with('0')
        && head.bytes().all(|b| b.is_ascii_digit());
    let mut groups = 0;
    for group in parts {
        if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        groups += 1;
    }
    head_ok && groups > 0
}

impl FieldSpec {
    /// `라벨 (단위)` 형태의 표시 문자열.
    pub fn label(&self, tr: &Translator) -> String {
        format!("{} ({})", tr.t(self.label_key), tr.t(self.unit_key))
    }

    /// 허용 범위 안내 문구.
    pub fn range_hint(&self, tr: &Translator) -> Option<String> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Some(tr.tf(
                keys::RANGE_BETWEEN,
                &[("min", min.to_string()), ("max", max.to_string())],
            )),
            (Some(min), None) => Some(tr.tf(keys::RANGE_MIN_ONLY, &[("min", min.to_string())])),
            _ => None,
        }
    }

    /// 최소/최대 범위를 검사한다.
    pub fn check(&self, value: f64) -> Result<f64, FieldError> {
        if let Some(min) = self.min {
            if value < min {
                return Err(FieldError::BelowMin { min });
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return Err(FieldError::AboveMax { max });
            }
        }
        Ok(value)
    }

    /// 원시 문자열을 파싱하고 범위를 검사한다.
    pub fn validate(&self, raw: &str) -> Result<f64, FieldError> {
        match parse_number(raw) {
            Err(FieldError::Missing) if !self.required => Ok(0.0),
            Err(e) => Err(e),
            Ok(v) => self.check(v),
        }
    }
}

/// 사용자가 입력한 원시 문자열 값 묶음.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawForm {
    values: [String; 6],
}

impl RawForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: FieldId) -> &str {
        &self.values[id.index()]
    }

    pub fn set(&mut self, id: FieldId, value: impl Into<String>) {
        self.values[id.index()] = value.into();
    }

    pub fn get_mut(&mut self, id: FieldId) -> &mut String {
        &mut self.values[id.index()]
    }

    /// 이미 검증된 입력값으로 폼을 채운다. 소수점은 `,`로 적어 천 단위 구분과 섞이지 않게 한다.
    pub fn from_input(input: &CalculatorInput) -> Self {
        let mut form = Self::new();
        for (id, value) in [
            (FieldId::PurchasePrice, input.purchase_price),
            (FieldId::InterestRate, input.interest_rate),
            (FieldId::OperatingHours, input.operating_hours),
            (FieldId::ServiceCosts, input.service_costs),
            (FieldId::Insurance, input.insurance),
            (FieldId::ResidualValue, input.residual_value),
        ] {
            form.set(id, value.to_string().replace('.', ","));
        }
        form
    }

    /// 모든 필드를 검증하고 계산 입력을 만든다.
    pub fn validate(&self) -> Result<CalculatorInput, FormError> {
        let mut values = [0.0; 6];
        let mut errors = Vec::new();
        for spec in FIELDS.iter() {
            match spec.validate(self.get(spec.id)) {
                Ok(v) => values[spec.id.index()] = v,
                Err(e) => errors.push((spec.id, e)),
            }
        }
        if !errors.is_empty() {
            return Err(FormError { errors });
        }
        Ok(CalculatorInput {
            purchase_price: values[FieldId::PurchasePrice.index()],
            interest_rate: values[FieldId::InterestRate.index()],
            operating_hours: values[FieldId::OperatingHours.index()],
            service_costs: values[FieldId::ServiceCosts.index()],
            insurance: values[FieldId::Insurance.index()],
            residual_value: values[FieldId::ResidualValue.index()],
        })
    }
}

/// 제출 여부와 마지막 결과를 보관하는 폼 상태.
#[derive(Debug, Clone, Default)]
pub struct TocForm {
    pub raw: RawForm,
    submitted: Option<(CalculatorInput, TocBreakdown)>,
    error: Option<FormError>,
}

impl TocForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// 검증 후 계산한다. 실패하면 이전 결과를 지운다.
    pub fn submit(&mut self) -> Result<&TocBreakdown, FormError> {
        match self.raw.validate() {
            Ok(input) => {
                let breakdown = toc::compute_breakdown(input);
                self.error = None;
                let (_, breakdown) = self.submitted.insert((input, breakdown));
                Ok(&*breakdown)
            }
            Err(err) => {
                tracing::debug!(fields = err.errors.len(), "form rejected");
                self.submitted = None;
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    pub fn breakdown(&self) -> Option<&TocBreakdown> {
        self.submitted.as_ref().map(|(_, b)| b)
    }

    /// 마지막으로 계산에 쓰인 입력값.
    pub fn input(&self) -> Option<&CalculatorInput> {
        self.submitted.as_ref().map(|(i, _)| i)
    }

    pub fn error(&self) -> Option<&FormError> {
        self.error.as_ref()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted.is_some()
    }

    /// 입력과 결과를 모두 비운다.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
