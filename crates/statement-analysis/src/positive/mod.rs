//! Positive-indicator (strength) detectors.

mod cash;
mod efficiency;
mod profitability;
mod solvency;
mod trend;

pub use cash::{CashAccumulation, RisingFcfStableIncome};
pub use efficiency::{ImprovingEfficiency, OperatingExpenseReduction, WorkingCapitalImprovement};
pub use profitability::{ConsistentRevenueGrowth, ExpandingGrossMargin, RisingReturns};
pub use solvency::{HealthyInterestCoverage, ReducingDebt};
pub use trend::{Trend, TrendIndicator};
