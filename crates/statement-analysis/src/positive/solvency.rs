//! Debt and coverage strengths.

use statement_core::{Detector, Field, FinancialSeries, Finding, FindingKind, Unit};

use crate::assemble::{self, later_periods, Narrative};
use crate::change::pct_change;
use crate::format::measure;
use crate::metrics::{self, nonzero};
use crate::thresholds::PositiveThresholds;

const REDUCING_DEBT: Narrative = Narrative {
    title: "Reducing Debt Levels",
    rationale: "Deleveraging strategy, enhancing financial stability and reducing interest \
                expenses. This strengthens the balance sheet, lowers financial risk, and \
                increases the company's flexibility to invest in growth opportunities.",
};

const HEALTHY_COVERAGE: Narrative = Narrative {
    title: "Healthy Interest Coverage Ratio",
    rationale: "Strong ability to service debt, reducing financial risk. A high ratio indicates \
                ample earnings to cover interest obligations, providing comfort to lenders and \
                investors about the company's solvency and financial health.",
};

/// Total debt falling in every period with a known change, with at least
/// one meaningful reduction.
pub struct ReducingDebt {
    min_reduction: f64,
}

impl ReducingDebt {
    pub fn new(thresholds: &PositiveThresholds) -> Self {
        Self {
            min_reduction: thresholds.debt_reduction,
        }
    }
}

impl Detector for ReducingDebt {
    fn id(&self) -> &'static str {
        "reducing_debt"
    }

    fn subject(&self) -> &'static str {
        "Debt"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::Positive
    }

    fn required_fields(&self) -> &[Field] {
        &[Field::TotalDebt]
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let debt = series.values(Field::TotalDebt);
        let change = pct_change(&nonzero(debt));

        if !change.iter().flatten().all(|c| *c < 0.0) {
            return Vec::new();
        }

        let observations = later_periods(series.years())
            .filter(|(i, _)| change[*i].is_some_and(|c| c < -self.min_reduction))
            .map(|(i, year)| {
                assemble::observation(
                    year,
                    measure("Total Debt", debt[i], Unit::Money, change[i]),
                    Vec::new(),
                )
            })
            .collect();

        assemble::finding(self.id(), self.kind(), REDUCING_DEBT, assemble::flat_sections(observations))
            .into_iter()
            .collect()
    }
}

/// Coverage at or above the healthy level and still improving. Any healthy
/// period where coverage fell suppresses the finding.
pub struct HealthyInterestCoverage {
    healthy: f64,
}

impl HealthyInterestCoverage {
    pub fn new(thresholds: &PositiveThresholds) -> Self {
        Self {
            healthy: thresholds.healthy_coverage,
        }
    }
}

impl Detector for HealthyInterestCoverage {
    fn id(&self) -> &'static str {
        "healthy_interest_coverage"
    }

    fn subject(&self) -> &'static str {
        "Interest Coverage"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::Positive
    }

    fn required_fields(&self) -> &[Field] {
        &[Field::OperatingIncome, Field::InterestExpense]
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let coverage = metrics::interest_coverage(series);
        let change = pct_change(&coverage);

        let healthy: Vec<(usize, i32)> = later_periods(series.years())
            .filter(|(i, _)| coverage[*i] >= self.healthy)
            .collect();

        if healthy.iter().any(|(i, _)| change[*i].is_some_and(|c| c < 0.0)) {
            return Vec::new();
        }

        let observations = healthy
            .into_iter()
            .filter(|(i, _)| change[*i].is_some_and(|c| c > 0.0))
            .map(|(i, year)| {
                assemble::observation(
                    year,
                    measure("Interest Coverage", coverage[i], Unit::Ratio, change[i]),
                    Vec::new(),
                )
            })
            .collect();

        assemble::finding(self.id(), self.kind(), HEALTHY_COVERAGE, assemble::flat_sections(observations))
            .into_iter()
            .collect()
    }
}
