//! Per-period ratios derived from base statement fields.
//!
//! Every function is elementwise and pure. A denominator that is exactly zero
//! is treated as unknown, so the result is `NaN` rather than an infinity.

use statement_core::{Field, FinancialSeries};

const DAYS_PER_YEAR: f64 = 365.0;

/// Zero-guarded division. Unknown inputs propagate as `NaN`.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() || !numerator.is_finite() {
        f64::NAN
    } else {
        numerator / denominator
    }
}

/// Elementwise `numerator / denominator` with the zero guard.
pub fn ratio(numerator: &[f64], denominator: &[f64]) -> Vec<f64> {
    numerator
        .iter()
        .zip(denominator)
        .map(|(n, d)| safe_div(*n, *d))
        .collect()
}

/// Copy of `values` with exact zeros replaced by `NaN`.
///
/// Used before taking the change of a raw field where a zero means "not
/// reported" rather than a real level.
pub fn nonzero(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .map(|v| if *v == 0.0 { f64::NAN } else { *v })
        .collect()
}

fn field_ratio(series: &FinancialSeries, numerator: Field, denominator: Field) -> Vec<f64> {
    ratio(series.values(numerator), series.values(denominator))
}

fn scaled(values: Vec<f64>, factor: f64) -> Vec<f64> {
    values.into_iter().map(|v| v * factor).collect()
}

pub fn gross_margin(series: &FinancialSeries) -> Vec<f64> {
    field_ratio(series, Field::GrossProfit, Field::Revenue)
}

pub fn debt_to_equity(series: &FinancialSeries) -> Vec<f64> {
    field_ratio(series, Field::TotalDebt, Field::TotalStockholdersEquity)
}

pub fn interest_coverage(series: &FinancialSeries) -> Vec<f64> {
    field_ratio(series, Field::OperatingIncome, Field::InterestExpense)
}

/// Days sales outstanding.
pub fn dso(series: &FinancialSeries) -> Vec<f64> {
    scaled(receivables_to_sales(series), DAYS_PER_YEAR)
}

/// Days payable outstanding.
pub fn dpo(series: &FinancialSeries) -> Vec<f64> {
    scaled(
        field_ratio(series, Field::AccountPayables, Field::CostOfRevenue),
        DAYS_PER_YEAR,
    )
}

pub fn inventory_turnover(series: &FinancialSeries) -> Vec<f64> {
    field_ratio(series, Field::CostOfRevenue, Field::Inventory)
}

pub fn receivables_turnover(series: &FinancialSeries) -> Vec<f64> {
    field_ratio(series, Field::Revenue, Field::NetReceivables)
}

pub fn receivables_to_sales(series: &FinancialSeries) -> Vec<f64> {
    field_ratio(series, Field::NetReceivables, Field::Revenue)
}

/// `|dividendsPaid| / |netIncome|`. Dividends are reported as a cash outflow.
pub fn payout_ratio(series: &FinancialSeries) -> Vec<f64> {
    series
        .values(Field::DividendsPaid)
        .iter()
        .zip(series.values(Field::NetIncome))
        .map(|(dividends, income)| safe_div(dividends.abs(), income.abs()))
        .collect()
}

/// Return on equity in percent points.
pub fn roe(series: &FinancialSeries) -> Vec<f64> {
    scaled(
        field_ratio(series, Field::NetIncome, Field::TotalStockholdersEquity),
        100.0,
    )
}

/// Return on assets in percent points.
pub fn roa(series: &FinancialSeries) -> Vec<f64> {
    scaled(field_ratio(series, Field::NetIncome, Field::TotalAssets), 100.0)
}

pub fn current_ratio(series: &FinancialSeries) -> Vec<f64> {
    field_ratio(series, Field::TotalCurrentAssets, Field::TotalCurrentLiabilities)
}

/// Current assets minus current liabilities. Unknown when liabilities are zero.
pub fn net_working_capital(series: &FinancialSeries) -> Vec<f64> {
    series
        .values(Field::TotalCurrentAssets)
        .iter()
        .zip(nonzero(series.values(Field::TotalCurrentLiabilities)))
        .map(|(assets, liabilities)| assets - liabilities)
        .collect()
}

pub fn opex_to_sales(series: &FinancialSeries) -> Vec<f64> {
    field_ratio(series, Field::OperatingExpenses, Field::Revenue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use statement_core::FiscalPeriodRecord;

    fn series(records: Vec<FiscalPeriodRecord>) -> FinancialSeries {
        FinancialSeries::from_records("TEST", records)
    }

    #[test]
    fn test_zero_denominator_is_nan() {
        assert!(safe_div(10.0, 0.0).is_nan());
        assert!(safe_div(f64::NAN, 2.0).is_nan());
        assert_relative_eq!(safe_div(10.0, 4.0), 2.5);
    }

    #[test]
    fn test_gross_margin_and_zero_revenue() {
        let s = series(vec![
            FiscalPeriodRecord::new(2020)
                .with(Field::GrossProfit, 40.0)
                .with(Field::Revenue, 100.0),
            FiscalPeriodRecord::new(2021)
                .with(Field::GrossProfit, 10.0)
                .with(Field::Revenue, 0.0),
        ]);
        let margin = gross_margin(&s);
        assert_relative_eq!(margin[0], 0.4);
        assert!(margin[1].is_nan());
    }

    #[test]
    fn test_day_count_ratios() {
        let s = series(vec![FiscalPeriodRecord::new(2020)
            .with(Field::NetReceivables, 100.0)
            .with(Field::Revenue, 365.0)
            .with(Field::AccountPayables, 50.0)
            .with(Field::CostOfRevenue, 730.0)]);
        assert_relative_eq!(dso(&s)[0], 100.0, epsilon = 1e-9);
        assert_relative_eq!(dpo(&s)[0], 25.0, epsilon = 1e-9);
    }

    #[test]
    fn test_payout_ratio_uses_magnitudes() {
        let s = series(vec![FiscalPeriodRecord::new(2020)
            .with(Field::DividendsPaid, -80.0)
            .with(Field::NetIncome, -100.0)]);
        assert_relative_eq!(payout_ratio(&s)[0], 0.8);
    }

    #[test]
    fn test_net_working_capital_guard() {
        let s = series(vec![
            FiscalPeriodRecord::new(2020)
                .with(Field::TotalCurrentAssets, 300.0)
                .with(Field::TotalCurrentLiabilities, 100.0),
            FiscalPeriodRecord::new(2021)
                .with(Field::TotalCurrentAssets, 300.0)
                .with(Field::TotalCurrentLiabilities, 0.0),
        ]);
        let nwc = net_working_capital(&s);
        assert_relative_eq!(nwc[0], 200.0);
        assert!(nwc[1].is_nan());
    }

    #[test]
    fn test_returns_in_percent_points() {
        let s = series(vec![FiscalPeriodRecord::new(2020)
            .with(Field::NetIncome, 15.0)
            .with(Field::TotalStockholdersEquity, 100.0)
            .with(Field::TotalAssets, 300.0)]);
        assert_relative_eq!(roe(&s)[0], 15.0, epsilon = 1e-9);
        assert_relative_eq!(roa(&s)[0], 5.0, epsilon = 1e-9);
    }
}
