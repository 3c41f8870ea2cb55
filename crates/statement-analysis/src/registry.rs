//! Detector registries in presentation order.

use statement_core::Detector;

use crate::positive::*;
use crate::red_flags::*;
use crate::thresholds::{PositiveThresholds, RedFlagThresholds};

pub type DetectorSet = Vec<Box<dyn Detector>>;

pub fn red_flag_detectors(thresholds: &RedFlagThresholds) -> DetectorSet {
    vec![
        Box::new(DecliningRevenueRisingIncome),
        Box::new(RisingLeverage::new(thresholds)),
        Box::new(CashFlowIncomeDivergence),
        Box::new(ReceivablesVsSales::new(thresholds)),
        Box::new(GrossMarginErosion::new(thresholds)),
        Box::new(InventoryTurnoverDecline::new(thresholds)),
        Box::new(GoodwillGrowth::new(thresholds)),
        Box::new(InterestCoverageDecline::new(thresholds)),
        Box::new(RisingDso::new(thresholds)),
        Box::new(NegativeFreeCashFlow),
        Box::new(HighPayoutWeakCashFlow::new(thresholds)),
        Box::new(LargeEquityIssuance::new(thresholds)),
        Box::new(RisingShortTermDebt::new(thresholds)),
    ]
}

pub fn positive_detectors(thresholds: &PositiveThresholds) -> DetectorSet {
    vec![
        Box::new(RisingFcfStableIncome::new(thresholds)),
        Box::new(ReducingDebt::new(thresholds)),
        Box::new(ImprovingEfficiency),
        Box::new(ExpandingGrossMargin::new(thresholds)),
        Box::new(ConsistentRevenueGrowth::new(thresholds)),
        Box::new(RisingReturns),
        Box::new(HealthyInterestCoverage::new(thresholds)),
        Box::new(CashAccumulation),
        Box::new(OperatingExpenseReduction),
        Box::new(WorkingCapitalImprovement::new(thresholds)),
        Box::new(TrendIndicator::capex_investment(thresholds)),
        Box::new(TrendIndicator::strong_operating_cash_flow(thresholds)),
        Box::new(TrendIndicator::decreasing_dpo(thresholds)),
        Box::new(TrendIndicator::deferred_revenue_growth(thresholds)),
        Box::new(TrendIndicator::rd_investment(thresholds)),
    ]
}
