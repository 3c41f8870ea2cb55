//! Balance-sheet growth flags: goodwill and share count.

use statement_core::{Detector, Field, FinancialSeries, Finding, FindingKind, Unit, Zone};

use crate::assemble::{self, later_periods, Candidate, Narrative};
use crate::change::pct_change;
use crate::format::{self, measure};
use crate::metrics::nonzero;
use crate::thresholds::RedFlagThresholds;
use crate::zones::{Band, Bound, ZoneBands};

const GOODWILL: Narrative = Narrative {
    title: "Large Increases in Goodwill or Intangible Assets",
    rationale: "Risk of overpaying for acquisitions, leading to future impairment charges if \
                expected synergies or performance do not materialize. This can negatively impact \
                future earnings and may suggest aggressive growth strategies without adequate due \
                diligence.",
};

const EQUITY_ISSUANCE: Narrative = Narrative {
    title: "Large Equity Issuances",
    rationale: "Dilution of existing shareholders' equity and potential signal of cash flow \
                problems. Reliance on issuing new shares may indicate that the company cannot \
                generate sufficient internal funds. This may undermine investor confidence and \
                negatively affect earnings per share (EPS).",
};

pub struct GoodwillGrowth {
    bands: ZoneBands,
}

impl GoodwillGrowth {
    pub fn new(thresholds: &RedFlagThresholds) -> Self {
        let caution = thresholds.goodwill_caution;
        let red_flag = thresholds.goodwill_red_flag;
        let bands = ZoneBands::new(vec![
            Band::new(
                Zone::Caution,
                Bound::Open(caution),
                Bound::Closed(red_flag),
                format!("Goodwill increased {}", format::percent_range(caution, red_flag)),
            ),
            Band::new(
                Zone::RedFlag,
                Bound::Open(red_flag),
                Bound::Unbounded,
                format!("Goodwill increased {}", format::percent_above(red_flag)),
            ),
        ]);
        Self { bands }
    }

    pub fn bands(&self) -> &ZoneBands {
        &self.bands
    }
}

impl Detector for GoodwillGrowth {
    fn id(&self) -> &'static str {
        "goodwill_growth"
    }

    fn subject(&self) -> &'static str {
        "Goodwill"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::RedFlag
    }

    fn required_fields(&self) -> &[Field] {
        &[Field::Goodwill]
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let goodwill = series.values(Field::Goodwill);
        let change = pct_change(&nonzero(goodwill));

        let candidates = later_periods(series.years()).map(|(i, year)| {
            Candidate::new(year, change[i], measure("Goodwill", goodwill[i], Unit::Money, change[i]))
        });

        assemble::finding(self.id(), self.kind(), GOODWILL, assemble::zoned_sections(&self.bands, candidates))
            .into_iter()
            .collect()
    }
}

/// Weighted average share count growing faster than the issuance limit.
pub struct LargeEquityIssuance {
    limit: f64,
}

impl LargeEquityIssuance {
    pub fn new(thresholds: &RedFlagThresholds) -> Self {
        Self {
            limit: thresholds.share_issuance,
        }
    }
}

impl Detector for LargeEquityIssuance {
    fn id(&self) -> &'static str {
        "large_equity_issuance"
    }

    fn subject(&self) -> &'static str {
        "Equity Issuances"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::RedFlag
    }

    fn required_fields(&self) -> &[Field] {
        &[Field::WeightedAverageShsOut]
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let shares = series.values(Field::WeightedAverageShsOut);
        let change = pct_change(&nonzero(shares));

        let observations = later_periods(series.years())
            .filter(|(i, _)| change[*i].is_some_and(|c| c > self.limit))
            .map(|(i, year)| {
                assemble::observation(
                    year,
                    measure("Shares Outstanding", shares[i], Unit::Shares, change[i]),
                    Vec::new(),
                )
            })
            .collect();

        assemble::finding(self.id(), self.kind(), EQUITY_ISSUANCE, assemble::flat_sections(observations))
            .into_iter()
            .collect()
    }
}
