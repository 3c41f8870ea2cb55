use statement_core::{Detector, Field, FinancialSeries, Finding, FindingKind, Unit};

use crate::assemble::{self, Narrative};
use crate::change::pct_change;
use crate::format::measure;
use crate::metrics;
use crate::thresholds::{CashFlowProxy, RedFlagThresholds};

const NEGATIVE_FCF: Narrative = Narrative {
    title: "Negative Free Cash Flow",
    rationale: "Insufficient internal funds to support operations and growth, potentially \
                requiring external financing. Persistent negative free cash flow can indicate \
                unsustainable business models or overinvestment without adequate returns, \
                increasing financial risk.",
};

const HIGH_PAYOUT_FCF: Narrative = Narrative {
    title: "High Dividend Payout with Poor Free Cash Flow",
    rationale: "Unsustainable dividend policy, possibly leading to increased debt or depletion of \
                cash reserves. This situation may indicate management's attempt to maintain \
                investor confidence at the expense of long-term financial stability.",
};

const HIGH_PAYOUT_OCF: Narrative = Narrative {
    title: "High Dividend Payout with Poor Operating Cash Flow",
    rationale: HIGH_PAYOUT_FCF.rationale,
};

/// Every period, including the first, with negative free cash flow.
pub struct NegativeFreeCashFlow;

impl Detector for NegativeFreeCashFlow {
    fn id(&self) -> &'static str {
        "negative_free_cash_flow"
    }

    fn subject(&self) -> &'static str {
        "Free Cash Flow"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::RedFlag
    }

    fn required_fields(&self) -> &[Field] {
        &[Field::FreeCashFlow]
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let fcf = series.values(Field::FreeCashFlow);

        let observations = series
            .years()
            .iter()
            .zip(fcf)
            .filter(|(_, value)| **value < 0.0)
            .map(|(year, value)| {
                assemble::observation(*year, measure("Free Cash Flow", *value, Unit::Money, None), Vec::new())
            })
            .collect();

        assemble::finding(self.id(), self.kind(), NEGATIVE_FCF, assemble::flat_sections(observations))
            .into_iter()
            .collect()
    }
}

/// Payout ratio above the limit while the cash proxy does not cover dividends.
pub struct HighPayoutWeakCashFlow {
    limit: f64,
    proxy: CashFlowProxy,
    required: [Field; 3],
}

impl HighPayoutWeakCashFlow {
    pub fn new(thresholds: &RedFlagThresholds) -> Self {
        let proxy = thresholds.payout_proxy;
        Self {
            limit: thresholds.payout_ratio,
            proxy,
            required: [Field::DividendsPaid, Field::NetIncome, proxy.field()],
        }
    }

    fn narrative(&self) -> Narrative {
        match self.proxy {
            CashFlowProxy::FreeCashFlow => HIGH_PAYOUT_FCF,
            CashFlowProxy::OperatingCashFlow => HIGH_PAYOUT_OCF,
        }
    }
}

impl Detector for HighPayoutWeakCashFlow {
    fn id(&self) -> &'static str {
        "high_payout_weak_cash_flow"
    }

    fn subject(&self) -> &'static str {
        match self.proxy {
            CashFlowProxy::FreeCashFlow => "Dividend Payout and Free Cash Flow",
            CashFlowProxy::OperatingCashFlow => "Dividend Payout and Operating Cash Flow",
        }
    }

    fn kind(&self) -> FindingKind {
        FindingKind::RedFlag
    }

    fn required_fields(&self) -> &[Field] {
        &self.required
    }

    fn detect(&self, series: &FinancialSeries) -> Vec<Finding> {
        let payout = metrics::payout_ratio(series);
        let change = pct_change(&payout);
        let cash = series.values(self.proxy.field());
        let dividends = series.values(Field::DividendsPaid);

        let observations = series
            .years()
            .iter()
            .enumerate()
            .filter(|(i, _)| payout[*i] > self.limit && cash[*i] < dividends[*i].abs())
            .map(|(i, year)| {
                assemble::observation(
                    *year,
                    measure("Payout Ratio", payout[i], Unit::Ratio, change[i]),
                    vec![
                        measure(self.proxy.label(), cash[i], Unit::Money, None),
                        measure("Dividends Paid", dividends[i].abs(), Unit::Money, None),
                    ],
                )
            })
            .collect();

        assemble::finding(self.id(), self.kind(), self.narrative(), assemble::flat_sections(observations))
            .into_iter()
            .collect()
    }
}
