use statement_core::{Detector, Field, FinancialSeries, Finding, FindingKind, Unit, Zone};

use crate::assemble::{self, later_periods, Candidate, Narrative};
use crate::change::pct_change;
use crate::format::{self, measure};
use crate::metrics;
use crate::thresholds::RedFlagThresholds;
use crate::zones::{Band, Bound, ZoneBands};

pub const NEGATIVE_GROSS_MARGIN_ID: &str = "negative_gross_margin";

const MARGIN_EROSION: Narrative = Narrative {
    title: "Decreasing Gross Profit Margins",
    rationale: "Suggests worsening efficiency or rising costs of goods sold, which can erode \
                profitability. It may indicate market pressures or competitive challenges \
                affecting pricing power, requiring a strategic review to address cost management.",
};

const NEGATIVE_MARGIN: Narrative = Narrative {
    title: "Persistently Negative Gross Profit Margins",
    rationale: "The following years had negative gross profit margins, indicating a loss on sales \
                before other expenses.",
};

/// Gross margin falling year over year, plus a separate finding for any
/// period with a negative margin.
pub struct GrossMarginErosion {
    bands: ZoneBands,
}

impl GrossMarginErosion {
    pub fn new(thresholds: &RedFlagThresholds) -> Self {
        let caution = thresholds.margin_decline_caution;
        let red_flag = thresholds.margin_decline_red_flag;
        let critical = thresholds.margin_decline_critical;
        let bands = ZoneBands::new(vec![
            Band::new(
                Zone::Caution,
                Bound::Open(red_flag),
                Bound::Closed(caution),
                format!("Gross Profit Margin decreased {}", format::percent_range(caution, red_flag)),
            ),
            Band::new(
                Zone::RedFlag,
                Bound::Open(critical),
                Bound::Closed(red_flag),
                format!("Gross Profit Margin decreased {}", format::percent_range(red_flag, critical)),
            ),
            Band::new(
                Zone::Critical,
                Bound::Unbounded,
                Bound::Closed(critical),
                format!("Gross Profit Margin decreased {}", format::percent_above(critical)),
            ),
        ]);
        Self { bands }
    }

    pub fn bands(&self) -> &ZoneBands {
        &self.bands
    }
}

impl Detector for GrossMarginErosion {
    fn id(&self) -> &'static str {
        "gross_margin_erosion"
    }

    fn subject(&self) -> &'static str {
        "Gross Profit Margin"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::RedFlag
    }

    fn required_fields(&self) -> &[Field] {
        &[Field::GrossProfit, Field::Revenue]
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let margin = metrics::gross_margin(series);
        let change = pct_change(&margin);

        let candidates = later_periods(series.years()).map(|(i, year)| {
            Candidate::new(
                year,
                change[i],
                measure("Gross Profit Margin", margin[i] * 100.0, Unit::Percent, change[i]),
            )
        });
        let erosion = assemble::finding(
            self.id(),
            self.kind(),
            MARGIN_EROSION,
            assemble::zoned_sections(&self.bands, candidates),
        );

        let negative_periods = series
            .years()
            .iter()
            .enumerate()
            .filter(|(i, _)| margin[*i] < 0.0)
            .map(|(i, year)| {
                assemble::observation(
                    *year,
                    measure("Gross Profit Margin", margin[i] * 100.0, Unit::Percent, None),
                    Vec::new(),
                )
            })
            .collect();
        let negative = assemble::finding(
            NEGATIVE_GROSS_MARGIN_ID,
            self.kind(),
            NEGATIVE_MARGIN,
            assemble::flat_sections(negative_periods),
        );

        erosion.into_iter().chain(negative).collect()
    }
}
