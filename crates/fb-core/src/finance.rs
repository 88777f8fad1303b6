//! Financial readiness calculators: composite risk score, funding gap for a
//! target runway, and a 12-month revenue projection under a growth scenario.

use serde::{Deserialize, Serialize};

/// Months in a revenue projection.
pub const PROJECTION_MONTHS: usize = 12;

/// Market volatility bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Volatility {
    Low,
    #[default]
    Medium,
    High,
}

/// Growth scenario for projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    #[default]
    Base,
    Optimistic,
    Pessimistic,
}

impl Scenario {
    fn growth_adjustment(&self) -> f64 {
        match self {
            Self::Base => 1.0,
            Self::Optimistic => 1.2,
            Self::Pessimistic => 0.7,
        }
    }
}

/// Qualitative bucket for a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub enum RiskLevel {
    Low,
    Moderate,
    Elevated,
    High,
}

impl RiskLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => Self::Low,
            60.. => Self::Moderate,
            40.. => Self::Elevated,
            _ => Self::High,
        }
    }
}

/// Calculator inputs. Missing fields take the defaults shown in the
/// dashboard's calculator form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct FinanceInput {
    pub credit_score: u32,
    pub monthly_revenue: f64,
    pub burn_rate: f64,
    pub market_volatility: Volatility,
    pub cash_reserve: f64,
    /// Desired runway in months.
    pub target_runway: f64,
    pub scenario: Scenario,
    /// Month-over-month growth, percent.
    pub growth_rate: f64,
    /// Month-over-month churn, percent.
    pub churn_rate: f64,
    /// CAC payback period in months.
    pub cac_payback: f64,
}

impl Default for FinanceInput {
    fn default() -> Self {
        Self {
            credit_score: 720,
            monthly_revenue: 85_000.0,
            burn_rate: 65_000.0,
            market_volatility: Volatility::Medium,
            cash_reserve: 220_000.0,
            target_runway: 12.0,
            scenario: Scenario::Base,
            growth_rate: 6.0,
            churn_rate: 2.0,
            cac_payback: 8.0,
        }
    }
}

/// Suggested raise bracket around the required funding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct FundingRange {
    pub low: i64,
    pub high: i64,
}

/// Calculator outputs.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinanceAnalysis {
    pub risk_score: u32,
    pub risk_level: RiskLevel,
    /// Burn as a percentage of revenue.
    pub burn_ratio_pct: i64,
    /// Months of runway from cash; `None` when revenue covers burn.
    pub runway_months: Option<f64>,
    pub required_funding: i64,
    pub suggested_range: FundingRange,
    pub projection: Vec<i64>,
    pub projected_cmgr: i64,
    pub projected_uplift: i64,
}

fn runway_months(input: &FinanceInput) -> f64 {
    let net = input.monthly_revenue - input.burn_rate;
    if net >= 0.0 {
        f64::INFINITY
    } else {
        input.cash_reserve / net.abs()
    }
}

/// Composite score out of 100; higher is safer.
pub fn risk_score(input: &FinanceInput) -> u32 {
    let mut score = 100.0_f64;

    score -= match input.credit_score {
        760.. => 0.0,
        700.. => 6.0,
        640.. => 14.0,
        _ => 28.0,
    };

    let burn_ratio = input.burn_rate / input.monthly_revenue.max(1.0);
    score -= if burn_ratio > 0.9 {
        25.0
    } else if burn_ratio > 0.7 {
        18.0
    } else if burn_ratio > 0.5 {
        10.0
    } else if burn_ratio > 0.3 {
        6.0
    } else {
        2.0
    };

    score -= match input.market_volatility {
        Volatility::High => 18.0,
        Volatility::Medium => 9.0,
        Volatility::Low => 2.0,
    };

    let runway = runway_months(input);
    score -= if runway < 4.0 {
        20.0
    } else if runway < 8.0 {
        10.0
    } else {
        4.0
    };

    score.round().clamp(0.0, 100.0) as u32
}

/// Cash needed on top of reserves to cover the monthly deficit for the
/// target runway.
pub fn required_funding(input: &FinanceInput) -> i64 {
    let deficit = (input.burn_rate - input.monthly_revenue).max(0.0);
    let gap = deficit * input.target_runway - input.cash_reserve;
    gap.round().max(0.0) as i64
}

pub fn suggested_range(required: i64) -> FundingRange {
    FundingRange {
        low: (required as f64 * 0.6).round() as i64,
        high: (required as f64 * 1.2).round() as i64,
    }
}

/// Monthly revenue for the next 12 months, compounding growth less churn
/// scaled by CAC payback.
pub fn projection(input: &FinanceInput) -> Vec<i64> {
    let growth = input.growth_rate / 100.0 * input.scenario.growth_adjustment();
    let churn = input.churn_rate / 100.0 / input.cac_payback.max(1.0);
    let factor = 1.0 + growth - churn;

    let mut rev = input.monthly_revenue;
    (0..PROJECTION_MONTHS)
        .map(|_| {
            rev *= factor;
            rev.round().max(0.0) as i64
        })
        .collect()
}

/// Compound monthly growth rate across a projection, as a rounded percent.
pub fn cmgr(series: &[i64]) -> i64 {
    let (Some(&first), Some(&last)) = (series.first(), series.last()) else {
        return 0;
    };
    let periods = (series.len() as f64 - 1.0).max(1.0);
    let ratio = last as f64 / (first as f64).max(1.0);
    ((ratio.powf(1.0 / periods) - 1.0) * 100.0).round() as i64
}

/// Run every calculator over one input.
pub fn analyze(input: &FinanceInput) -> FinanceAnalysis {
    let score = risk_score(input);
    let required = required_funding(input);
    let series = projection(input);
    let uplift = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (last - first).max(0),
        _ => 0,
    };
    let runway = runway_months(input);

    FinanceAnalysis {
        risk_score: score,
        risk_level: RiskLevel::from_score(score),
        burn_ratio_pct: (input.burn_rate / input.monthly_revenue.max(1.0) * 100.0).round() as i64,
        runway_months: runway.is_finite().then_some((runway * 10.0).round() / 10.0),
        required_funding: required,
        suggested_range: suggested_range(required),
        projected_cmgr: cmgr(&series),
        projected_uplift: uplift,
        projection: series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_inputs_score_moderate() {
        let input = FinanceInput::default();
        // 100 - 6 (credit) - 18 (burn 0.76) - 9 (medium) - 4 (profitable)
        assert_eq!(risk_score(&input), 63);
        assert_eq!(RiskLevel::from_score(63), RiskLevel::Moderate);
    }

    #[test]
    fn worst_case_bottoms_out() {
        let input = FinanceInput {
            credit_score: 500,
            monthly_revenue: 0.0,
            burn_rate: 50_000.0,
            market_volatility: Volatility::High,
            cash_reserve: 10_000.0,
            ..Default::default()
        };
        // 100 - 28 - 25 - 18 - 20
        assert_eq!(risk_score(&input), 9);
        assert_eq!(RiskLevel::from_score(9), RiskLevel::High);
    }

    #[test]
    fn best_case_keeps_small_penalties() {
        let input = FinanceInput {
            credit_score: 800,
            monthly_revenue: 100_000.0,
            burn_rate: 20_000.0,
            market_volatility: Volatility::Low,
            ..Default::default()
        };
        assert_eq!(risk_score(&input), 92);
        assert_eq!(RiskLevel::from_score(92), RiskLevel::Low);
    }

    #[test]
    fn risk_level_boundaries() {
        assert_eq!(RiskLevel::from_score(80), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(79), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(60), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(40), RiskLevel::Elevated);
        assert_eq!(RiskLevel::from_score(39), RiskLevel::High);
    }

    #[test]
    fn no_funding_needed_when_profitable() {
        assert_eq!(required_funding(&FinanceInput::default()), 0);
    }

    #[test]
    fn funding_gap_for_target_runway() {
        let input = FinanceInput {
            monthly_revenue: 40_000.0,
            burn_rate: 90_000.0,
            cash_reserve: 200_000.0,
            target_runway: 18.0,
            ..Default::default()
        };
        // 50k deficit * 18 months - 200k reserve
        assert_eq!(required_funding(&input), 700_000);
        assert_eq!(
            suggested_range(700_000),
            FundingRange {
                low: 420_000,
                high: 840_000
            }
        );
    }

    #[test]
    fn projection_scenarios_are_ordered() {
        let base = projection(&FinanceInput::default());
        let up = projection(&FinanceInput {
            scenario: Scenario::Optimistic,
            ..Default::default()
        });
        let down = projection(&FinanceInput {
            scenario: Scenario::Pessimistic,
            ..Default::default()
        });
        assert_eq!(base.len(), PROJECTION_MONTHS);
        assert!(up[11] > base[11]);
        assert!(base[11] > down[11]);
        assert!(base.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn projection_clamps_at_zero() {
        let input = FinanceInput {
            growth_rate: 0.0,
            churn_rate: 500.0,
            cac_payback: 1.0,
            ..Default::default()
        };
        assert_eq!(projection(&input)[0], 0);

        let wiped = FinanceInput {
            growth_rate: 0.0,
            churn_rate: 100.0,
            cac_payback: 1.0,
            ..Default::default()
        };
        assert!(projection(&wiped).iter().all(|v| *v == 0));
    }

    #[test]
    fn cmgr_of_flat_and_doubling_series() {
        assert_eq!(cmgr(&[100, 100, 100]), 0);
        assert_eq!(cmgr(&[100, 200]), 100);
        assert_eq!(cmgr(&[]), 0);
    }

    #[test]
    fn analysis_is_consistent() {
        let out = analyze(&FinanceInput::default());
        assert_eq!(out.risk_score, 63);
        assert_eq!(out.burn_ratio_pct, 76);
        assert!(out.runway_months.is_none());
        assert_eq!(out.projection.len(), 12);
        assert_eq!(out.projected_uplift, out.projection[11] - out.projection[0]);
        assert!(out.projected_cmgr > 0);
    }

    #[test]
    fn input_fields_default_from_json() {
        let input: FinanceInput =
            serde_json::from_str(r#"{"creditScore": 650, "marketVolatility": "high"}"#).unwrap();
        assert_eq!(input.credit_score, 650);
        assert_eq!(input.market_volatility, Volatility::High);
        assert_eq!(input.burn_rate, 65_000.0);
    }
}
