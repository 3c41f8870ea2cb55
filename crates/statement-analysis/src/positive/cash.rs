//! Cash-generation strengths.

use statement_core::{Detector, Field, FinancialSeries, Finding, FindingKind, Unit};

use crate::assemble::{self, later_periods, Narrative};
use crate::change::pct_change;
use crate::format::measure;
use crate::metrics::nonzero;
use crate::thresholds::PositiveThresholds;

const RISING_FCF: Narrative = Narrative {
    title: "Increasing Free Cash Flow Despite Stable Net Income",
    rationale: "Improved cash efficiency, indicating that the company is generating more cash from \
                operations while net income stays broadly unchanged.",
};

const CASH_ACCUMULATION: Narrative = Narrative {
    title: "Accumulation of Cash Reserves",
    rationale: "Improved liquidity and financial flexibility, enabling the company to invest in \
                growth opportunities, weather economic downturns, or return value to shareholders \
                through dividends or buybacks. A strong cash position enhances strategic options.",
};

/// Positive, growing free cash flow while net income barely moves.
pub struct RisingFcfStableIncome {
    stable_band: f64,
}

impl RisingFcfStableIncome {
    pub fn new(thresholds: &PositiveThresholds) -> Self {
        Self {
            stable_band: thresholds.stable_income_band,
        }
    }
}

impl Detector for RisingFcfStableIncome {
    fn id(&self) -> &'static str {
        "rising_fcf_stable_income"
    }

    fn subject(&self) -> &'static str {
        "FCF and Net Income"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::Positive
    }

    fn required_fields(&self) -> &[Field] {
        &[Field::FreeCashFlow, Field::NetIncome]
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let fcf = series.values(Field::FreeCashFlow);
        let income = series.values(Field::NetIncome);
        let fcf_change = pct_change(&nonzero(fcf));
        let income_change = pct_change(&nonzero(income));

        let observations = later_periods(series.years())
            .filter(|(i, _)| {
                fcf[*i] > 0.0
                    && fcf_change[*i].is_some_and(|c| c > 0.0)
                    && income_change[*i].is_some_and(|c| c.abs() <= self.stable_band)
            })
            .map(|(i, year)| {
                assemble::observation(
                    year,
                    measure("Free Cash Flow", fcf[i], Unit::Money, fcf_change[i]),
                    vec![measure("Net Income", income[i], Unit::Money, income_change[i])],
                )
            })
            .collect();

        assemble::finding(self.id(), self.kind(), RISING_FCF, assemble::flat_sections(observations))
            .into_iter()
            .collect()
    }
}

/// Growing cash balance. Needs a cash value for every period, since a gap
/// would make the next known value look like accumulation.
pub struct CashAccumulation;

impl Detector for CashAccumulation {
    fn id(&self) -> &'static str {
        "cash_accumulation"
    }

    fn subject(&self) -> &'static str {
        "Cash Reserve"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::Positive
    }

    fn required_fields(&self) -> &[Field] {
        &[Field::CashAndCashEquivalents]
    }

    fn complete_fields(&self) -> &[Field] {
        &[Field::CashAndCashEquivalents]
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let cash = series.values(Field::CashAndCashEquivalents);
        let change = pct_change(cash);

        let observations = later_periods(series.years())
            .filter(|(i, _)| change[*i].is_some_and(|c| c > 0.0))
            .map(|(i, year)| {
                assemble::observation(
                    year,
                    measure("Cash and Cash Equivalents", cash[i], Unit::Money, change[i]),
                    Vec::new(),
                )
            })
            .collect();

        assemble::finding(self.id(), self.kind(), CASH_ACCUMULATION, assemble::flat_sections(observations))
            .into_iter()
            .collect()
    }
}
