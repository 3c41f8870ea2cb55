//! Named detector thresholds and the two rule presets.
//!
//! All values are fractions (0.05 = 5%) except ratio levels and day counts.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use statement_core::{AnalysisError, Field};

// Red flags, service preset
pub const HIGH_LEVERAGE_RATIO: f64 = 2.0;
pub const RECEIVABLES_TO_SALES_CAUTION: f64 = 0.15;
pub const RECEIVABLES_TO_SALES_RED_FLAG: f64 = 0.20;
pub const RECEIVABLES_TO_SALES_CRITICAL: f64 = 0.30;
pub const MARGIN_DECLINE_CAUTION: f64 = -0.10;
pub const MARGIN_DECLINE_RED_FLAG: f64 = -0.20;
pub const MARGIN_DECLINE_CRITICAL: f64 = -0.30;
pub const TURNOVER_DECLINE_CAUTION: f64 = -0.05;
pub const TURNOVER_DECLINE_RED_FLAG: f64 = -0.10;
pub const TURNOVER_DECLINE_CRITICAL: f64 = -0.20;
pub const GOODWILL_GROWTH_CAUTION: f64 = 0.10;
pub const GOODWILL_GROWTH_RED_FLAG: f64 = 0.20;
pub const COVERAGE_CAUTION: f64 = 2.5;
pub const COVERAGE_RED_FLAG: f64 = 1.5;
pub const COVERAGE_CRITICAL: f64 = 1.0;
pub const DSO_GROWTH_CAUTION: f64 = 0.05;
pub const DSO_GROWTH_RED_FLAG: f64 = 0.10;
pub const BAD_DSO_DAYS: f64 = 45.0;
pub const PAYOUT_RATIO_LIMIT: f64 = 0.75;
pub const SHARE_ISSUANCE_LIMIT: f64 = 0.10;
pub const SHORT_TERM_DEBT_CAUTION: f64 = 0.15;
pub const SHORT_TERM_DEBT_RED_FLAG: f64 = 0.30;

// Red flags, legacy preset (only the values that differ)
pub const LEGACY_RECEIVABLES_TO_SALES_CAUTION: f64 = 0.10;
pub const LEGACY_BAD_DSO_DAYS: f64 = 60.0;
pub const LEGACY_PAYOUT_RATIO_LIMIT: f64 = 0.50;
pub const LEGACY_SHARE_ISSUANCE_LIMIT: f64 = 0.05;
pub const LEGACY_SHORT_TERM_DEBT_CAUTION: f64 = 0.10;
pub const LEGACY_SHORT_TERM_DEBT_RED_FLAG: f64 = 0.15;

// Positive indicators
pub const STABLE_INCOME_BAND: f64 = 0.10;
pub const DEBT_REDUCTION_MIN: f64 = 0.05;
pub const MARGIN_EXPANSION_MIN: f64 = 0.05;
pub const REVENUE_GROWTH_FLOOR: f64 = 0.04;
pub const HEALTHY_COVERAGE: f64 = 2.5;
pub const CURRENT_RATIO_IMPROVEMENT_MIN: f64 = 0.05;
pub const CAPEX_GROWTH_MIN: f64 = 0.05;
pub const OPERATING_CASH_FLOW_GROWTH_MIN: f64 = 0.05;
pub const DPO_DECLINE_MIN: f64 = 0.05;
pub const DEFERRED_REVENUE_GROWTH_MIN: f64 = 0.05;
pub const RD_GROWTH_MIN: f64 = 0.05;

/// Which threshold preset to start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleVariant {
    #[default]
    Service,
    Legacy,
}

impl FromStr for RuleVariant {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "service" => Ok(RuleVariant::Service),
            "legacy" => Ok(RuleVariant::Legacy),
            other => Err(AnalysisError::Config(format!(
                "unknown rule variant '{other}' (expected 'service' or 'legacy')"
            ))),
        }
    }
}

/// Cash measure compared against dividends paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CashFlowProxy {
    FreeCashFlow,
    OperatingCashFlow,
}

impl CashFlowProxy {
    pub fn field(&self) -> Field {
        match self {
            CashFlowProxy::FreeCashFlow => Field::FreeCashFlow,
            CashFlowProxy::OperatingCashFlow => Field::OperatingCashFlow,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CashFlowProxy::FreeCashFlow => "Free Cash Flow",
            CashFlowProxy::OperatingCashFlow => "Operating Cash Flow",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedFlagThresholds {
    pub high_leverage: f64,
    pub receivables_caution: f64,
    pub receivables_red_flag: f64,
    pub receivables_critical: f64,
    pub margin_decline_caution: f64,
    pub margin_decline_red_flag: f64,
    pub margin_decline_critical: f64,
    pub turnover_decline_caution: f64,
    pub turnover_decline_red_flag: f64,
    pub turnover_decline_critical: f64,
    pub goodwill_caution: f64,
    pub goodwill_red_flag: f64,
    pub coverage_caution: f64,
    pub coverage_red_flag: f64,
    pub coverage_critical: f64,
    pub dso_growth_caution: f64,
    pub dso_growth_red_flag: f64,
    /// DSO level (days) above which growth is reported
    pub bad_dso_days: f64,
    pub payout_ratio: f64,
    pub payout_proxy: CashFlowProxy,
    pub share_issuance: f64,
    pub short_term_debt_caution: f64,
    pub short_term_debt_red_flag: f64,
}

impl Default for RedFlagThresholds {
    fn default() -> Self {
        Self {
            high_leverage: HIGH_LEVERAGE_RATIO,
            receivables_caution: RECEIVABLES_TO_SALES_CAUTION,
            receivables_red_flag: RECEIVABLES_TO_SALES_RED_FLAG,
            receivables_critical: RECEIVABLES_TO_SALES_CRITICAL,
            margin_decline_caution: MARGIN_DECLINE_CAUTION,
            margin_decline_red_flag: MARGIN_DECLINE_RED_FLAG,
            margin_decline_critical: MARGIN_DECLINE_CRITICAL,
            turnover_decline_caution: TURNOVER_DECLINE_CAUTION,
            turnover_decline_red_flag: TURNOVER_DECLINE_RED_FLAG,
            turnover_decline_critical: TURNOVER_DECLINE_CRITICAL,
            goodwill_caution: GOODWILL_GROWTH_CAUTION,
            goodwill_red_flag: GOODWILL_GROWTH_RED_FLAG,
            coverage_caution: COVERAGE_CAUTION,
            coverage_red_flag: COVERAGE_RED_FLAG,
            coverage_critical: COVERAGE_CRITICAL,
            dso_growth_caution: DSO_GROWTH_CAUTION,
            dso_growth_red_flag: DSO_GROWTH_RED_FLAG,
            bad_dso_days: BAD_DSO_DAYS,
            payout_ratio: PAYOUT_RATIO_LIMIT,
            payout_proxy: CashFlowProxy::FreeCashFlow,
            share_issuance: SHARE_ISSUANCE_LIMIT,
            short_term_debt_caution: SHORT_TERM_DEBT_CAUTION,
            short_term_debt_red_flag: SHORT_TERM_DEBT_RED_FLAG,
        }
    }
}

impl RedFlagThresholds {
    /// Thresholds of the earlier standalone rule set.
    pub fn legacy() -> Self {
        Self {
            receivables_caution: LEGACY_RECEIVABLES_TO_SALES_CAUTION,
            bad_dso_days: LEGACY_BAD_DSO_DAYS,
            payout_ratio: LEGACY_PAYOUT_RATIO_LIMIT,
            payout_proxy: CashFlowProxy::OperatingCashFlow,
            share_issuance: LEGACY_SHARE_ISSUANCE_LIMIT,
            short_term_debt_caution: LEGACY_SHORT_TERM_DEBT_CAUTION,
            short_term_debt_red_flag: LEGACY_SHORT_TERM_DEBT_RED_FLAG,
            ..Self::default()
        }
    }

    pub fn for_variant(variant: RuleVariant) -> Self {
        match variant {
            RuleVariant::Service => Self::default(),
            RuleVariant::Legacy => Self::legacy(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositiveThresholds {
    /// Largest |net income change| still considered stable
    pub stable_income_band: f64,
    pub debt_reduction: f64,
    pub margin_expansion: f64,
    pub revenue_growth_floor: f64,
    pub healthy_coverage: f64,
    pub current_ratio_improvement: f64,
    pub capex_growth: f64,
    pub operating_cash_flow_growth: f64,
    pub dpo_decline: f64,
    pub deferred_revenue_growth: f64,
    pub rd_growth: f64,
}

impl Default for PositiveThresholds {
    fn default() -> Self {
        Self {
            stable_income_band: STABLE_INCOME_BAND,
            debt_reduction: DEBT_REDUCTION_MIN,
            margin_expansion: MARGIN_EXPANSION_MIN,
            revenue_growth_floor: REVENUE_GROWTH_FLOOR,
            healthy_coverage: HEALTHY_COVERAGE,
            current_ratio_improvement: CURRENT_RATIO_IMPROVEMENT_MIN,
            capex_growth: CAPEX_GROWTH_MIN,
            operating_cash_flow_growth: OPERATING_CASH_FLOW_GROWTH_MIN,
            dpo_decline: DPO_DECLINE_MIN,
            deferred_revenue_growth: DEFERRED_REVENUE_GROWTH_MIN,
            rd_growth: RD_GROWTH_MIN,
        }
    }
}

/// Complete threshold set for both detector libraries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub red_flags: RedFlagThresholds,
    pub positive: PositiveThresholds,
}

impl Thresholds {
    pub fn for_variant(variant: RuleVariant) -> Self {
        Self {
            red_flags: RedFlagThresholds::for_variant(variant),
            positive: PositiveThresholds::default(),
        }
    }

    /// Applies a partial JSON document on top of the current values.
    ///
    /// Keys absent from `overrides` keep their current value, so a file can
    /// tweak a single threshold of the chosen preset.
    pub fn apply_overrides(&mut self, overrides: &serde_json::Value) -> Result<(), AnalysisError> {
        if !overrides.is_object() {
            return Err(AnalysisError::Config(
                "threshold overrides must be a JSON object".to_string(),
            ));
        }

        let mut merged = serde_json::to_value(&*self)?;
        merge_json(&mut merged, overrides);
        *self = serde_json::from_value(merged)?;
        Ok(())
    }

    pub fn from_json_str(json: &str, variant: RuleVariant) -> Result<Self, AnalysisError> {
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        let mut thresholds = Self::for_variant(variant);
        thresholds.apply_overrides(&overrides)?;
        Ok(thresholds)
    }
}

fn merge_json(base: &mut serde_json::Value, overrides: &serde_json::Value) {
    match (base, overrides) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        tracing::warn!(key = %key, "Ignoring unknown threshold key");
                    }
                }
            }
        }
        (base, overrides) => *base = overrides.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_parsing() {
        assert_eq!("service".parse::<RuleVariant>().unwrap(), RuleVariant::Service);
        assert_eq!(" Legacy ".parse::<RuleVariant>().unwrap(), RuleVariant::Legacy);
        assert!("strict".parse::<RuleVariant>().is_err());
    }

    #[test]
    fn test_legacy_preset_differs_where_expected() {
        let service = RedFlagThresholds::default();
        let legacy = RedFlagThresholds::legacy();
        assert_eq!(legacy.receivables_caution, 0.10);
        assert_eq!(legacy.bad_dso_days, 60.0);
        assert_eq!(legacy.payout_ratio, 0.50);
        assert_eq!(legacy.payout_proxy, CashFlowProxy::OperatingCashFlow);
        assert_eq!(legacy.share_issuance, 0.05);
        assert_eq!(legacy.short_term_debt_caution, 0.10);
        assert_eq!(legacy.short_term_debt_red_flag, 0.15);
        assert_eq!(legacy.high_leverage, service.high_leverage);
        assert_eq!(legacy.coverage_caution, service.coverage_caution);
    }

    #[test]
    fn test_partial_struct_deserialization() {
        let parsed: RedFlagThresholds =
            serde_json::from_str(r#"{"high_leverage": 3.0}"#).unwrap();
        assert_eq!(parsed.high_leverage, 3.0);
        assert_eq!(parsed.goodwill_caution, GOODWILL_GROWTH_CAUTION);
    }

    #[test]
    fn test_overrides_keep_variant_base() {
        let thresholds = Thresholds::from_json_str(
            r#"{"red_flags": {"share_issuance": 0.2}, "positive": {"rd_growth": 0.1}}"#,
            RuleVariant::Legacy,
        )
        .unwrap();

        assert_eq!(thresholds.red_flags.share_issuance, 0.2);
        assert_eq!(thresholds.red_flags.bad_dso_days, LEGACY_BAD_DSO_DAYS);
        assert_eq!(thresholds.positive.rd_growth, 0.1);
        assert_eq!(thresholds.positive.capex_growth, CAPEX_GROWTH_MIN);
    }

    #[test]
    fn test_overrides_reject_bad_documents() {
        assert!(Thresholds::from_json_str("[1, 2]", RuleVariant::Service).is_err());
        assert!(Thresholds::from_json_str(
            r#"{"red_flags": {"payout_proxy": "dividends"}}"#,
            RuleVariant::Service
        )
        .is_err());
    }
}
