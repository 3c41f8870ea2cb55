//! Debt flags: leverage, interest coverage and short-term borrowing.

use statement_core::{Detector, Field, FinancialSeries, Finding, FindingKind, Unit, Zone};

use crate::assemble::{self, later_periods, Candidate, Narrative};
use crate::change::{pct_change, yoy_change, ChangeBase};
use crate::format::{self, measure};
use crate::metrics::{self, nonzero};
use crate::thresholds::RedFlagThresholds;
use crate::zones::{Band, Bound, ZoneBands};

const RISING_LEVERAGE: Narrative = Narrative {
    title: "High or Increasing Debt Levels Relative to Equity",
    rationale: "Heightened financial risk due to increased leverage. The company may be \
                over-reliant on debt financing, making it vulnerable to interest rate hikes and \
                economic downturns. This can limit future borrowing capacity and increase default \
                risk.",
};

const COVERAGE_DECLINE: Narrative = Narrative {
    title: "Declining Interest Coverage Ratio",
    rationale: "Indicates the company's ability to meet interest obligations from operating \
                income. Persistent issues may indicate financial distress and risk of default.",
};

const SHORT_TERM_DEBT: Narrative = Narrative {
    title: "Unusual Increase in Short-Term Debt",
    rationale: "Potential liquidity crunch, as reliance on short-term financing may indicate cash \
                flow issues. Short-term debt often carries higher rollover risk and may reflect \
                difficulties in securing long-term financing, raising concerns about financial \
                stability.",
};

/// Debt-to-equity above the limit and rising, or crossing the limit from below.
pub struct RisingLeverage {
    limit: f64,
}

impl RisingLeverage {
    pub fn new(thresholds: &RedFlagThresholds) -> Self {
        Self {
            limit: thresholds.high_leverage,
        }
    }
}

impl Detector for RisingLeverage {
    fn id(&self) -> &'static str {
        "rising_leverage"
    }

    fn subject(&self) -> &'static str {
        "Debt-to-Equity"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::RedFlag
    }

    fn required_fields(&self) -> &[Field] {
        &[Field::TotalDebt, Field::TotalStockholdersEquity]
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let ratio = metrics::debt_to_equity(series);
        let change = pct_change(&ratio);

        let observations = later_periods(series.years())
            .filter(|(i, _)| {
                let high_and_rising = ratio[*i] > self.limit && change[*i].is_some_and(|c| c > 0.0);
                let crossed = ratio[*i - 1] <= self.limit && ratio[*i] > self.limit;
                high_and_rising || crossed
            })
            .map(|(i, year)| {
                assemble::observation(
                    year,
                    measure("Debt-to-Equity Ratio", ratio[i], Unit::Ratio, change[i]),
                    Vec::new(),
                )
            })
            .collect();

        assemble::finding(self.id(), self.kind(), RISING_LEVERAGE, assemble::flat_sections(observations))
            .into_iter()
            .collect()
    }
}

/// Interest coverage in a weak band, in any period including the first.
pub struct InterestCoverageDecline {
    bands: ZoneBands,
}

impl InterestCoverageDecline {
    pub fn new(thresholds: &RedFlagThresholds) -> Self {
        let caution = thresholds.coverage_caution;
        let red_flag = thresholds.coverage_red_flag;
        let critical = thresholds.coverage_critical;
        let bands = ZoneBands::new(vec![
            Band::new(
                Zone::Caution,
                Bound::Open(red_flag),
                Bound::Closed(caution),
                format!("Coverage between {red_flag:.1} and {caution:.1}"),
            ),
            Band::new(
                Zone::RedFlag,
                Bound::Open(critical),
                Bound::Closed(red_flag),
                format!("Coverage between {critical:.1} and {red_flag:.1}"),
            ),
            Band::new(
                Zone::Critical,
                Bound::Open(0.0),
                Bound::Closed(critical),
                format!("Coverage below {critical:.1}"),
            ),
            Band::new(Zone::Critical, Bound::Unbounded, Bound::Open(0.0), "Operating loss")
                .with_label("Negative Interest Coverage"),
        ]);
        Self { bands }
    }

    pub fn bands(&self) -> &ZoneBands {
        &self.bands
    }
}

impl Detector for InterestCoverageDecline {
    fn id(&self) -> &'static str {
        "interest_coverage_decline"
    }

    fn subject(&self) -> &'static str {
        "Interest Coverage"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::RedFlag
    }

    fn required_fields(&self) -> &[Field] {
        &[Field::OperatingIncome, Field::InterestExpense]
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let coverage = metrics::interest_coverage(series);
        let change = yoy_change(&coverage, ChangeBase::Absolute);

        let candidates = series.years().iter().enumerate().map(|(i, year)| {
            Candidate::new(
                *year,
                Some(coverage[i]),
                measure("Interest Coverage", coverage[i], Unit::Ratio, change[i]),
            )
        });

        assemble::finding(
            self.id(),
            self.kind(),
            COVERAGE_DECLINE,
            assemble::zoned_sections(&self.bands, candidates),
        )
        .into_iter()
        .collect()
    }
}

/// Year-over-year jumps in short-term debt.
pub struct RisingShortTermDebt {
    bands: ZoneBands,
}

impl RisingShortTermDebt {
    pub fn new(thresholds: &RedFlagThresholds) -> Self {
        let caution = thresholds.short_term_debt_caution;
        let red_flag = thresholds.short_term_debt_red_flag;
        let bands = ZoneBands::new(vec![
            Band::new(
                Zone::Caution,
                Bound::Open(caution),
                Bound::Closed(red_flag),
                format!("Short-Term Debt increased {}", format::percent_range(caution, red_flag)),
            ),
            Band::new(
                Zone::RedFlag,
                Bound::Open(red_flag),
                Bound::Unbounded,
                format!("Short-Term Debt increased {}", format::percent_above(red_flag)),
            ),
        ]);
        Self { bands }
    }

    pub fn bands(&self) -> &ZoneBands {
        &self.bands
    }
}

impl Detector for RisingShortTermDebt {
    fn id(&self) -> &'static str {
        "rising_short_term_debt"
    }

    fn subject(&self) -> &'static str {
        "Short-Term Debt"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::RedFlag
    }

    fn required_fields(&self) -> &[Field] {
        &[Field::ShortTermDebt]
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let debt = series.values(Field::ShortTermDebt);
        let change = pct_change(&nonzero(debt));

        let candidates = later_periods(series.years()).map(|(i, year)| {
            Candidate::new(
                year,
                change[i],
                measure("Short-Term Debt", debt[i], Unit::Money, change[i]),
            )
        });

        assemble::finding(
            self.id(),
            self.kind(),
            SHORT_TERM_DEBT,
            assemble::zoned_sections(&self.bands, candidates),
        )
        .into_iter()
        .collect()
    }
}
