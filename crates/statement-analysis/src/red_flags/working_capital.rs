//! Working-capital flags: receivables, collection days and inventory turnover.

use statement_core::{Detector, Field, FinancialSeries, Finding, FindingKind, Unit, Zone};

use crate::assemble::{self, later_periods, Candidate, Narrative};
use crate::change::pct_change;
use crate::format::{self, measure};
use crate::metrics;
use crate::thresholds::RedFlagThresholds;
use crate::zones::{Band, Bound, ZoneBands};

const RECEIVABLES: Narrative = Narrative {
    title: "Growing Accounts Receivable as a Percentage of Sales",
    rationale: "Indicates worsening collection issues or overly loose credit terms, potentially \
                leading to cash flow problems. Suggests rising bad debt expenses and declining \
                credit quality of customers.",
};

const DSO: Narrative = Narrative {
    title: "Increasing Days Sales Outstanding",
    rationale: "Delayed cash inflows, affecting liquidity. An increasing DSO suggests the company \
                is taking longer to collect payments, which may be due to customer financial \
                strain or ineffective collection processes, potentially leading to cash \
                shortages.",
};

const INVENTORY: Narrative = Narrative {
    title: "Increasing Inventory Levels Relative to Sales",
    rationale: "Indicates potential overstocking or declining demand for products, which can lead \
                to obsolescence. It can tie up capital that could be used for growth or other \
                investments, posing risks to cash flow and profitability.",
};

/// Receivables-to-sales ratio in a high band. Only periods whose ratio
/// change is defined take part.
pub struct ReceivablesVsSales {
    bands: ZoneBands,
}

impl ReceivablesVsSales {
    pub fn new(thresholds: &RedFlagThresholds) -> Self {
        let caution = thresholds.receivables_caution;
        let red_flag = thresholds.receivables_red_flag;
        let critical = thresholds.receivables_critical;
        let bands = ZoneBands::new(vec![
            Band::new(
                Zone::Caution,
                Bound::Closed(caution),
                Bound::Open(red_flag),
                format!("Accounts Receivable to Sales {}", format::percent_range(caution, red_flag)),
            ),
            Band::new(
                Zone::RedFlag,
                Bound::Closed(red_flag),
                Bound::Open(critical),
                format!("Accounts Receivable to Sales {}", format::percent_range(red_flag, critical)),
            ),
            Band::new(
                Zone::Critical,
                Bound::Closed(critical),
                Bound::Unbounded,
                format!("Accounts Receivable to Sales {}", format::percent_above(critical)),
            ),
        ]);
        Self { bands }
    }

    pub fn bands(&self) -> &ZoneBands {
        &self.bands
    }
}

impl Detector for ReceivablesVsSales {
    fn id(&self) -> &'static str {
        "receivables_vs_sales"
    }

    fn subject(&self) -> &'static str {
        "Accounts Receivable"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::RedFlag
    }

    fn required_fields(&self) -> &[Field] {
        &[Field::NetReceivables, Field::Revenue]
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let ratio = metrics::receivables_to_sales(series);
        let change = pct_change(&ratio);

        let candidates = later_periods(series.years())
            .filter(|(i, _)| change[*i].is_some())
            .map(|(i, year)| {
                Candidate::new(
                    year,
                    Some(ratio[i]),
                    measure("Accounts Receivable to Sales", ratio[i] * 100.0, Unit::Percent, change[i]),
                )
            });

        assemble::finding(
            self.id(),
            self.kind(),
            RECEIVABLES,
            assemble::zoned_sections(&self.bands, candidates),
        )
        .into_iter()
        .collect()
    }
}

/// Days sales outstanding growing while already above the bad-DSO floor.
pub struct RisingDso {
    bands: ZoneBands,
    bad_dso_days: f64,
}

impl RisingDso {
    pub fn new(thresholds: &RedFlagThresholds) -> Self {
        let caution = thresholds.dso_growth_caution;
        let red_flag = thresholds.dso_growth_red_flag;
        let bands = ZoneBands::new(vec![
            Band::new(
                Zone::Caution,
                Bound::Open(caution),
                Bound::Closed(red_flag),
                format!("DSO increased {}", format::percent_range(caution, red_flag)),
            ),
            Band::new(
                Zone::RedFlag,
                Bound::Open(red_flag),
                Bound::Unbounded,
                format!("DSO increased {}", format::percent_above(red_flag)),
            ),
        ]);
        Self {
            bands,
            bad_dso_days: thresholds.bad_dso_days,
        }
    }

    pub fn bands(&self) -> &ZoneBands {
        &self.bands
    }
}

impl Detector for RisingDso {
    fn id(&self) -> &'static str {
        "rising_dso"
    }

    fn subject(&self) -> &'static str {
        "Days Sales Outstanding"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::RedFlag
    }

    fn required_fields(&self) -> &[Field] {
        &[Field::NetReceivables, Field::Revenue]
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let dso = metrics::dso(series);
        let change = pct_change(&dso);

        let candidates = later_periods(series.years())
            .filter(|(i, _)| dso[*i] > self.bad_dso_days)
            .map(|(i, year)| Candidate::new(year, change[i], measure("DSO", dso[i], Unit::Ratio, change[i])));

        assemble::finding(self.id(), self.kind(), DSO, assemble::zoned_sections(&self.bands, candidates))
            .into_iter()
            .collect()
    }
}

/// Inventory turnover falling year over year.
pub struct InventoryTurnoverDecline {
    bands: ZoneBands,
}

impl InventoryTurnoverDecline {
    pub fn new(thresholds: &RedFlagThresholds) -> Self {
        let caution = thresholds.turnover_decline_caution;
        let red_flag = thresholds.turnover_decline_red_flag;
        let critical = thresholds.turnover_decline_critical;
        let bands = ZoneBands::new(vec![
            Band::new(
                Zone::Caution,
                Bound::Open(red_flag),
                Bound::Closed(caution),
                format!("Inventory Turnover decreased {}", format::percent_range(caution, red_flag)),
            ),
            Band::new(
                Zone::RedFlag,
                Bound::Open(critical),
                Bound::Closed(red_flag),
                format!("Inventory Turnover decreased {}", format::percent_range(red_flag, critical)),
            ),
            Band::new(
                Zone::Critical,
                Bound::Unbounded,
                Bound::Closed(critical),
                format!("Inventory Turnover decreased {}", format::percent_above(critical)),
            ),
        ]);
        Self { bands }
    }

    pub fn bands(&self) -> &ZoneBands {
        &self.bands
    }
}

impl Detector for InventoryTurnoverDecline {
    fn id(&self) -> &'static str {
        "inventory_turnover_decline"
    }

    fn subject(&self) -> &'static str {
        "Inventory Turnover"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::RedFlag
    }

    fn required_fields(&self) -> &[Field] {
        &[Field::Inventory, Field::CostOfRevenue]
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let turnover = metrics::inventory_turnover(series);
        let change = pct_change(&turnover);

        let candidates = later_periods(series.years()).map(|(i, year)| {
            Candidate::new(
                year,
                change[i],
                measure("Inventory Turnover", turnover[i], Unit::Ratio, change[i]),
            )
        });

        assemble::finding(
            self.id(),
            self.kind(),
            INVENTORY,
            assemble::zoned_sections(&self.bands, candidates),
        )
        .into_iter()
        .collect()
    }
}
