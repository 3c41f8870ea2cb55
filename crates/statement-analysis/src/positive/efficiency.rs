//! Operating-efficiency strengths: turnover, expense control and working capital.

use statement_core::{Detector, Field, FinancialSeries, Finding, FindingKind, Unit};

use crate::assemble::{self, later_periods, Narrative};
use crate::change::pct_change;
use crate::format::measure;
use crate::metrics::{self, nonzero};
use crate::thresholds::PositiveThresholds;

const IMPROVING_EFFICIENCY: Narrative = Narrative {
    title: "Improving Efficiency Ratios",
    rationale: "Enhanced operational performance, suggesting better management of assets. \
                Improved efficiency ratios indicate the company is effectively utilizing its \
                resources to generate sales.",
};

const OPEX_REDUCTION: Narrative = Narrative {
    title: "Reduction in Operating Expenses",
    rationale: "Enhanced operational efficiency, leading to higher profit margins. Cost reductions \
                without sacrificing revenue can indicate effective cost management and process \
                improvements, contributing to sustainable profitability.",
};

const WORKING_CAPITAL: Narrative = Narrative {
    title: "Positive Changes in Working Capital",
    rationale: "Improved short-term financial health, suggesting effective management of \
                receivables, payables, and inventory. Positive changes can enhance liquidity, \
                reduce reliance on external financing, and indicate operational efficiency.",
};

/// Inventory turnover and receivables turnover both rising.
pub struct ImprovingEfficiency;

impl Detector for ImprovingEfficiency {
    fn id(&self) -> &'static str {
        "improving_efficiency"
    }

    fn subject(&self) -> &'static str {
        "Efficiency Ratio"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::Positive
    }

    fn required_fields(&self) -> &[Field] {
        &[
            Field::CostOfRevenue,
            Field::Inventory,
            Field::Revenue,
            Field::NetReceivables,
        ]
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let inventory = metrics::inventory_turnover(series);
        let receivables = metrics::receivables_turnover(series);
        let inventory_change = pct_change(&inventory);
        let receivables_change = pct_change(&receivables);

        let observations = later_periods(series.years())
            .filter(|(i, _)| {
                inventory_change[*i].is_some_and(|c| c > 0.0)
                    && receivables_change[*i].is_some_and(|c| c > 0.0)
            })
            .map(|(i, year)| {
                assemble::observation(
                    year,
                    measure("Inventory Turnover", inventory[i], Unit::Ratio, inventory_change[i]),
                    vec![measure(
                        "Receivables Turnover",
                        receivables[i],
                        Unit::Ratio,
                        receivables_change[i],
                    )],
                )
            })
            .collect();

        assemble::finding(self.id(), self.kind(), IMPROVING_EFFICIENCY, assemble::flat_sections(observations))
            .into_iter()
            .collect()
    }
}

/// Operating expenses fall and so does their share of sales.
pub struct OperatingExpenseReduction;

impl Detector for OperatingExpenseReduction {
    fn id(&self) -> &'static str {
        "operating_expense_reduction"
    }

    fn subject(&self) -> &'static str {
        "Operating Expense"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::Positive
    }

    fn required_fields(&self) -> &[Field] {
        &[Field::OperatingExpenses, Field::Revenue]
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let opex_change = pct_change(&nonzero(series.values(Field::OperatingExpenses)));
        let ratio = metrics::opex_to_sales(series);
        let ratio_change = pct_change(&ratio);

        let observations = later_periods(series.years())
            .filter(|(i, _)| {
                opex_change[*i].is_some_and(|c| c < 0.0) && ratio_change[*i].is_some_and(|c| c < 0.0)
            })
            .map(|(i, year)| {
                assemble::observation(
                    year,
                    measure("Operating Expenses to Sales", ratio[i], Unit::Ratio, ratio_change[i]),
                    Vec::new(),
                )
            })
            .collect();

        assemble::finding(self.id(), self.kind(), OPEX_REDUCTION, assemble::flat_sections(observations))
            .into_iter()
            .collect()
    }
}

/// Net working capital growing with a notable current-ratio improvement.
pub struct WorkingCapitalImprovement {
    min_ratio_change: f64,
}

impl WorkingCapitalImprovement {
    pub fn new(thresholds: &PositiveThresholds) -> Self {
        Self {
            min_ratio_change: thresholds.current_ratio_improvement,
        }
    }
}

impl Detector for WorkingCapitalImprovement {
    fn id(&self) -> &'static str {
        "working_capital_improvement"
    }

    fn subject(&self) -> &'static str {
        "Net Working Capital"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::Positive
    }

    fn required_fields(&self) -> &[Field] {
        &[Field::TotalCurrentAssets, Field::TotalCurrentLiabilities]
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let current_ratio = metrics::current_ratio(series);
        let working_capital = metrics::net_working_capital(series);
        let ratio_change = pct_change(&current_ratio);
        let capital_change = pct_change(&working_capital);

        let observations = later_periods(series.years())
            .filter(|(i, _)| {
                capital_change[*i].is_some_and(|c| c > 0.0)
                    && ratio_change[*i].is_some_and(|c| c > self.min_ratio_change)
            })
            .map(|(i, year)| {
                assemble::observation(
                    year,
                    measure("Current Ratio", current_ratio[i], Unit::Ratio, ratio_change[i]),
                    vec![measure(
                        "Net Working Capital",
                        working_capital[i],
                        Unit::Money,
                        capital_change[i],
                    )],
                )
            })
            .collect();

        assemble::finding(self.id(), self.kind(), WORKING_CAPITAL, assemble::flat_sections(observations))
            .into_iter()
            .collect()
    }
}
