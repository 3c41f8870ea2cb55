//! Red-flag (risk) detectors.

mod balance_sheet;
mod cash_flow;
mod earnings;
mod leverage;
mod profitability;
mod working_capital;

pub use balance_sheet::{GoodwillGrowth, LargeEquityIssuance};
pub use cash_flow::{HighPayoutWeakCashFlow, NegativeFreeCashFlow};
pub use earnings::{CashFlowIncomeDivergence, DecliningRevenueRisingIncome};
pub use leverage::{InterestCoverageDecline, RisingLeverage, RisingShortTermDebt};
pub use profitability::{GrossMarginErosion, NEGATIVE_GROSS_MARGIN_ID};
pub use working_capital::{InventoryTurnoverDecline, ReceivablesVsSales, RisingDso};
