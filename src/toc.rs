//! 설비 총소유비용(TOC) 계산 모듈. 5년 정액 감가상각 기준.

use serde::{Deserialize, Serialize};

/// 고정 내용연수 [년]
pub const LIFETIME_YEARS: f64 = 5.0;

/// TOC 계산 입력. 금액은 단일 통화, 비율은 0~100 퍼센트.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculatorInput {
    /// 구매가 [DKK]
    pub purchase_price: f64,
    /// 이자율 [%/년]
    pub interest_rate: f64,
    /// 연간 운전시간 [h/년]
    pub operating_hours: f64,
    /// 연간 서비스 비용 [DKK/년]
    pub service_costs: f64,
    /// 연간 보험료 [DKK/년]
    pub insurance: f64,
    /// 잔존가치 [구매가 대비 %]
    pub residual_value: f64,
}

/// TOC 계산 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculatorResult {
    /// 연간 총소유비용 [DKK/년]
    pub total_annual_cost: f64,
    /// 운전시간당 비용 [DKK/h]
    pub cost_per_hour: f64,
}

impl CalculatorResult {
    /// 두 결과값이 모두 유한한지 확인한다. NaN/무한대 결과는 표시하지 않는다.
    pub fn is_finite(&self) -> bool {
        self.total_annual_cost.is_finite() && self.cost_per_hour.is_finite()
    }
}

/// 중간 계산값을 포함한 상세 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TocBreakdown {
    /// 잔존가치 금액 [DKK]
    pub residual_amount: f64,
    /// 연간 감가상각비 [DKK/년]
    pub depreciation: f64,
    /// 평균 자본 [DKK]
    pub average_capital: f64,
    /// 연간 이자비용 [DKK/년]
    pub interest_cost: f64,
    pub result: CalculatorResult,
}

/// 연간 총소유비용과 시간당 비용을 계산한다.
pub fn compute(input: CalculatorInput) -> CalculatorResult {
    compute_breakdown(input).result
}

/// 중간값을 보존하면서 TOC를 계산한다.
///
/// 입력 범위는 검사하지 않는다. 잔존가치가 100%를 넘으면 감가상각비가 음수가 되며
/// 그대로 전달된다. 운전시간이 0 이하이면 나눗수를 1로 대체한다.
pub fn compute_breakdown(input: CalculatorInput) -> TocBreakdown {
    let residual_amount = input.purchase_price * (input.residual_value / 100.0);
    let depreciation = (input.purchase_price - residual_amount) / LIFETIME_YEARS;
    let average_capital = (input.purchase_price + residual_amount) / 2.0;
    let interest_cost = average_capital * (input.interest_rate / 100.0);
    let total_annual_cost = depreciation + interest_cost + input.service_costs + input.insurance;
    let divisor = if input.operating_hours > 0.0 {
        input.operating_hours
    } else {
        1.0
    };
    let result = CalculatorResult {
        total_annual_cost,
        cost_per_hour: total_annual_cost / divisor,
    };
    tracing::debug!(
        total_annual_cost = result.total_annual_cost,
        cost_per_hour = result.cost_per_hour,
        "toc computed"
    );
    TocBreakdown {
        residual_amount,
        depreciation,
        average_capital,
        interest_cost,
        result,
    }
}
