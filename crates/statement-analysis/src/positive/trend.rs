//! Single-measure trend indicators: a value moving past a minimum change.

use statement_core::{Detector, Field, FinancialSeries, Finding, FindingKind, Unit};

use crate::assemble::{self, later_periods, Narrative};
use crate::change::pct_change;
use crate::format::measure;
use crate::metrics::{self, nonzero};
use crate::thresholds::PositiveThresholds;

/// Which way the measure has to move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trend {
    /// change > threshold
    Rising(f64),
    /// change < -threshold
    Falling(f64),
}

impl Trend {
    fn matches(&self, change: f64) -> bool {
        match *self {
            Trend::Rising(min) => change > min,
            Trend::Falling(min) => change < -min,
        }
    }
}

/// Table-driven indicator over one field or derived metric.
pub struct TrendIndicator {
    id: &'static str,
    subject: &'static str,
    narrative: Narrative,
    required: &'static [Field],
    values: fn(&FinancialSeries) -> Vec<f64>,
    label: &'static str,
    unit: Unit,
    trend: Trend,
    /// Report |value|, for outflows stored as negatives
    magnitude: bool,
}

impl TrendIndicator {
    pub fn capex_investment(thresholds: &PositiveThresholds) -> Self {
        Self {
            id: "capex_investment",
            subject: "CapEx",
            narrative: Narrative {
                title: "Investment in Capital Expenditures (CapEx)",
                rationale: "Commitment to future growth and competitiveness through investment in \
                            assets. Increased CapEx can signal expansion, modernization, or entry \
                            into new markets, potentially leading to higher future revenues and \
                            market share.",
            },
            required: &[Field::CapitalExpenditure],
            values: |s| nonzero(s.values(Field::CapitalExpenditure)),
            label: "Capital Expenditures",
            unit: Unit::Money,
            trend: Trend::Rising(thresholds.capex_growth),
            magnitude: true,
        }
    }

    pub fn strong_operating_cash_flow(thresholds: &PositiveThresholds) -> Self {
        Self {
            id: "strong_operating_cash_flow",
            subject: "Operating Cash Flow",
            narrative: Narrative {
                title: "Strong Operating Cash Flow",
                rationale: "Robust core business performance, indicating that the company's \
                            operations are generating sufficient cash. This provides a solid \
                            foundation for growth and financial stability without relying on \
                            external financing.",
            },
            required: &[Field::OperatingCashFlow],
            values: |s| nonzero(s.values(Field::OperatingCashFlow)),
            label: "Operating Cash Flow",
            unit: Unit::Money,
            trend: Trend::Rising(thresholds.operating_cash_flow_growth),
            magnitude: false,
        }
    }

    pub fn decreasing_dpo(thresholds: &PositiveThresholds) -> Self {
        Self {
            id: "decreasing_dpo",
            subject: "DPO",
            narrative: Narrative {
                title: "Decreasing Days Payable Outstanding (DPO)",
                rationale: "Strengthened supplier relationships and potential cost savings, as \
                            timely payments can lead to better terms or discounts. A balance is \
                            necessary to maintain optimal cash flow management without straining \
                            liquidity.",
            },
            required: &[Field::AccountPayables, Field::CostOfRevenue],
            values: metrics::dpo,
            label: "DPO",
            unit: Unit::Days,
            trend: Trend::Falling(thresholds.dpo_decline),
            magnitude: false,
        }
    }

    pub fn deferred_revenue_growth(thresholds: &PositiveThresholds) -> Self {
        Self {
            id: "deferred_revenue_growth",
            subject: "Deferred Revenue",
            narrative: Narrative {
                title: "Increase in Deferred Revenue",
                rationale: "Future revenue assurance, as deferred revenue represents payments \
                            received for services or products to be delivered. An increase \
                            suggests strong sales and customer commitment, providing \
                            predictability in future earnings.",
            },
            required: &[Field::DeferredRevenue],
            values: |s| nonzero(s.values(Field::DeferredRevenue)),
            label: "Deferred Revenue",
            unit: Unit::Money,
            trend: Trend::Rising(thresholds.deferred_revenue_growth),
            magnitude: false,
        }
    }

    pub fn rd_investment(thresholds: &PositiveThresholds) -> Self {
        Self {
            id: "rd_investment",
            subject: "R&D Expense",
            narrative: Narrative {
                title: "Patent Acquisitions or R&D Investments",
                rationale: "Investment in innovation and long-term growth, positioning the company \
                            to develop new products or improve existing ones. This can lead to \
                            competitive advantages, entry into new markets, and enhanced \
                            profitability through proprietary technologies.",
            },
            required: &[Field::ResearchAndDevelopmentExpenses],
            values: |s| nonzero(s.values(Field::ResearchAndDevelopmentExpenses)),
            label: "R&D Expenses",
            unit: Unit::Money,
            trend: Trend::Rising(thresholds.rd_growth),
            magnitude: false,
        }
    }
}

impl Detector for TrendIndicator {
    fn id(&self) -> &'static str {
        self.id
    }

    fn subject(&self) -> &'static str {
        self.subject
    }

    fn kind(&self) -> FindingKind {
        FindingKind::Positive
    }

    fn required_fields(&self) -> &[Field] {
        self.required
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let values = (self.values)(series);
        let change = pct_change(&values);

        let observations = later_periods(series.years())
            .filter(|(i, _)| change[*i].is_some_and(|c| self.trend.matches(c)))
            .map(|(i, year)| {
                let shown = if self.magnitude { values[i].abs() } else { values[i] };
                assemble::observation(year, measure(self.label, shown, self.unit, change[i]), Vec::new())
            })
            .collect();

        assemble::finding(self.id, self.kind(), self.narrative, assemble::flat_sections(observations))
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_thresholds_are_strict() {
        assert!(Trend::Rising(0.05).matches(0.06));
        assert!(!Trend::Rising(0.05).matches(0.05));
        assert!(Trend::Falling(0.05).matches(-0.06));
        assert!(!Trend::Falling(0.05).matches(-0.05));
    }
}
