//! Earnings-quality flags: income rising while revenue or operating cash falls.

use statement_core::{Detector, Field, FinancialSeries, Finding, FindingKind, Unit};

use crate::assemble::{self, later_periods, Narrative};
use crate::change::pct_change;
use crate::format::measure;
use crate::metrics::nonzero;

const DECLINING_REVENUE: Narrative = Narrative {
    title: "Declining Revenue with Increasing Net Income",
    rationale: "Possible reliance on non-operational income (e.g., asset sales) or aggressive \
                cost-cutting measures that may not be sustainable. It may mask underlying issues in \
                the core business operations, indicating potential future declines in profitability \
                once temporary measures fade.",
};

const CASH_FLOW_DIVERGENCE: Narrative = Narrative {
    title: "Rising Net Income with Decreasing Cash Flow from Operations",
    rationale: "Potential earnings quality issues, suggesting that reported net income isn't \
                translating into actual cash. This discrepancy could be due to non-cash revenue \
                recognition or changes in working capital, raising concerns about the \
                sustainability of earnings.",
};

/// Income grew and is positive. A loss that deepens never counts as improving.
fn income_improving(change: Option<f64>, level: f64) -> bool {
    let Some(change) = change else {
        return false;
    };
    let increasing = change > 0.0 && level > 0.0;
    let worsening = change < 0.0 && level < 0.0;
    increasing && !worsening
}

/// Revenue falls while net income improves.
pub struct DecliningRevenueRisingIncome;

impl Detector for DecliningRevenueRisingIncome {
    fn id(&self) -> &'static str {
        "declining_revenue_rising_income"
    }

    fn subject(&self) -> &'static str {
        "Revenue and Net Income"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::RedFlag
    }

    fn required_fields(&self) -> &[Field] {
        &[Field::Revenue, Field::NetIncome]
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let revenue = series.values(Field::Revenue);
        let income = series.values(Field::NetIncome);
        let revenue_change = pct_change(&nonzero(revenue));
        let income_change = pct_change(&nonzero(income));

        let observations = later_periods(series.years())
            .filter(|(i, _)| {
                revenue_change[*i].is_some_and(|c| c < 0.0)
                    && income_improving(income_change[*i], income[*i])
            })
            .map(|(i, year)| {
                assemble::observation(
                    year,
                    measure("Revenue", revenue[i], Unit::Money, revenue_change[i]),
                    vec![measure("Net Income", income[i], Unit::Money, income_change[i])],
                )
            })
            .collect();

        assemble::finding(self.id(), self.kind(), DECLINING_REVENUE, assemble::flat_sections(observations))
            .into_iter()
            .collect()
    }
}

/// Operating cash flow falls while net income improves.
pub struct CashFlowIncomeDivergence;

impl Detector for CashFlowIncomeDivergence {
    fn id(&self) -> &'static str {
        "cash_flow_income_divergence"
    }

    fn subject(&self) -> &'static str {
        "Operating Cash Flow and Net Income"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::RedFlag
    }

    fn required_fields(&self) -> &[Field] {
        &[Field::OperatingCashFlow, Field::NetIncome]
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let cash_flow = series.values(Field::OperatingCashFlow);
        let income = series.values(Field::NetIncome);
        let cash_flow_change = pct_change(&nonzero(cash_flow));
        let income_change = pct_change(&nonzero(income));

        let observations = later_periods(series.years())
            .filter(|(i, _)| {
                cash_flow_change[*i].is_some_and(|c| c < 0.0)
                    && income_improving(income_change[*i], income[*i])
            })
            .map(|(i, year)| {
                assemble::observation(
                    year,
                    measure("Net Income", income[i], Unit::Money, income_change[i]),
                    vec![measure(
                        "Operating Cash Flow",
                        cash_flow[i],
                        Unit::Money,
                        cash_flow_change[i],
                    )],
                )
            })
            .collect();

        assemble::finding(self.id(), self.kind(), CASH_FLOW_DIVERGENCE, assemble::flat_sections(observations))
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_income_improving_rule() {
        assert!(income_improving(Some(0.6), 800.0));
        assert!(!income_improving(Some(0.6), -800.0));
        assert!(!income_improving(Some(-0.1), 500.0));
        assert!(!income_improving(None, 500.0));
    }
}
