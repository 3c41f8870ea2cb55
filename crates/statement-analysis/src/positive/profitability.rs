//! Margin, revenue and return strengths.

use statement_core::{Detector, Field, FinancialSeries, Finding, FindingKind, Unit};

use crate::assemble::{self, later_periods, Narrative};
use crate::change::pct_change;
use crate::format::measure;
use crate::metrics::{self, nonzero};
use crate::thresholds::PositiveThresholds;

const EXPANDING_MARGIN: Narrative = Narrative {
    title: "Expanding Gross Profit Margins",
    rationale: "Increased pricing power or cost control, leading to higher profitability. This may \
                result from innovation, brand strength, or economies of scale, indicating a strong \
                competitive position and effective management strategies.",
};

const REVENUE_GROWTH: Narrative = Narrative {
    title: "Consistent Revenue Growth",
    rationale: "Strong market demand and successful business strategies, demonstrating the \
                company's ability to grow its customer base and market share. Consistent growth \
                can lead to economies of scale and attract investment.",
};

const RISING_RETURNS: Narrative = Narrative {
    title: "Increasing Return on Equity and Assets",
    rationale: "Efficient use of capital and assets, indicating management is generating higher \
                returns from available resources. This suggests profitability and effectiveness in \
                deploying capital, enhancing shareholder value.",
};

/// Gross margin up in every period with a known change; periods above the
/// expansion threshold are listed.
pub struct ExpandingGrossMargin {
    min_expansion: f64,
}

impl ExpandingGrossMargin {
    pub fn new(thresholds: &PositiveThresholds) -> Self {
        Self {
            min_expansion: thresholds.margin_expansion,
        }
    }
}

impl Detector for ExpandingGrossMargin {
    fn id(&self) -> &'static str {
        "expanding_gross_margin"
    }

    fn subject(&self) -> &'static str {
        "Gross Profit Margin"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::Positive
    }

    fn required_fields(&self) -> &[Field] {
        &[Field::GrossProfit, Field::Revenue]
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let margin = metrics::gross_margin(series);
        let change = pct_change(&margin);

        if !change.iter().flatten().all(|c| *c > 0.0) {
            return Vec::new();
        }

        let observations = later_periods(series.years())
            .filter(|(i, _)| change[*i].is_some_and(|c| c > self.min_expansion))
            .map(|(i, year)| {
                assemble::observation(
                    year,
                    measure("Gross Profit Margin", margin[i] * 100.0, Unit::Percent, change[i]),
                    Vec::new(),
                )
            })
            .collect();

        assemble::finding(self.id(), self.kind(), EXPANDING_MARGIN, assemble::flat_sections(observations))
            .into_iter()
            .collect()
    }
}

/// Revenue growth above the floor in every period with a known change.
pub struct ConsistentRevenueGrowth {
    floor: f64,
}

impl ConsistentRevenueGrowth {
    pub fn new(thresholds: &PositiveThresholds) -> Self {
        Self {
            floor: thresholds.revenue_growth_floor,
        }
    }
}

impl Detector for ConsistentRevenueGrowth {
    fn id(&self) -> &'static str {
        "consistent_revenue_growth"
    }

    fn subject(&self) -> &'static str {
        "Revenue Growth"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::Positive
    }

    fn required_fields(&self) -> &[Field] {
        &[Field::Revenue]
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let revenue = series.values(Field::Revenue);
        let growth = pct_change(&nonzero(revenue));

        if !growth.iter().flatten().all(|g| *g > self.floor) {
            return Vec::new();
        }

        let observations = later_periods(series.years())
            .filter(|(i, _)| growth[*i].is_some())
            .map(|(i, year)| {
                assemble::observation(year, measure("Revenue", revenue[i], Unit::Money, growth[i]), Vec::new())
            })
            .collect();

        assemble::finding(self.id(), self.kind(), REVENUE_GROWTH, assemble::flat_sections(observations))
            .into_iter()
            .collect()
    }
}

/// Positive ROE and ROA, both rising.
pub struct RisingReturns;

impl Detector for RisingReturns {
    fn id(&self) -> &'static str {
        "rising_returns"
    }

    fn subject(&self) -> &'static str {
        "ROE & ROA"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::Positive
    }

    fn required_fields(&self) -> &[Field] {
        &[Field::NetIncome, Field::TotalStockholdersEquity, Field::TotalAssets]
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let roe = metrics::roe(series);
        let roa = metrics::roa(series);
        let roe_change = pct_change(&roe);
        let roa_change = pct_change(&roa);

        let observations = later_periods(series.years())
            .filter(|(i, _)| {
                roe[*i] > 0.0
                    && roa[*i] > 0.0
                    && roe_change[*i].is_some_and(|c| c > 0.0)
                    && roa_change[*i].is_some_and(|c| c > 0.0)
            })
            .map(|(i, year)| {
                assemble::observation(
                    year,
                    measure("ROE", roe[i], Unit::Percent, roe_change[i]),
                    vec![measure("ROA", roa[i], Unit::Percent, roa_change[i])],
                )
            })
            .collect();

        assemble::finding(self.id(), self.kind(), RISING_RETURNS, assemble::flat_sections(observations))
            .into_iter()
            .collect()
    }
}
