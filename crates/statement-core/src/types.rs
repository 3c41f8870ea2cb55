use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize};

/// A base statement line item tracked per fiscal period.
///
/// Serialized names match the camelCase keys used by the market-data
/// provider's balance sheet, income statement and cash-flow endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    // Balance sheet
    TotalCurrentAssets,
    CashAndCashEquivalents,
    NetReceivables,
    Inventory,
    Goodwill,
    IntangibleAssets,
    TotalAssets,
    TotalCurrentLiabilities,
    AccountPayables,
    ShortTermDebt,
    TotalDebt,
    TotalLiabilities,
    DeferredRevenue,
    TotalStockholdersEquity,

    // Income statement
    Revenue,
    CostOfRevenue,
    GrossProfit,
    ResearchAndDevelopmentExpenses,
    OperatingExpenses,
    OperatingIncome,
    InterestExpense,
    NetIncome,
    WeightedAverageShsOut,

    // Cash flow statement
    OperatingCashFlow,
    CapitalExpenditure,
    FreeCashFlow,
    DividendsPaid,
}

impl Field {
    pub const ALL: [Field; 27] = [
        Field::TotalCurrentAssets,
        Field::CashAndCashEquivalents,
        Field::NetReceivables,
        Field::Inventory,
        Field::Goodwill,
        Field::IntangibleAssets,
        Field::TotalAssets,
        Field::TotalCurrentLiabilities,
        Field::AccountPayables,
        Field::ShortTermDebt,
        Field::TotalDebt,
        Field::TotalLiabilities,
        Field::DeferredRevenue,
        Field::TotalStockholdersEquity,
        Field::Revenue,
        Field::CostOfRevenue,
        Field::GrossProfit,
        Field::ResearchAndDevelopmentExpenses,
        Field::OperatingExpenses,
        Field::OperatingIncome,
        Field::InterestExpense,
        Field::NetIncome,
        Field::WeightedAverageShsOut,
        Field::OperatingCashFlow,
        Field::CapitalExpenditure,
        Field::FreeCashFlow,
        Field::DividendsPaid,
    ];

    /// Provider key for this field (e.g. `netReceivables`).
    pub fn key(&self) -> &'static str {
        match self {
            Field::TotalCurrentAssets => "totalCurrentAssets",
            Field::CashAndCashEquivalents => "cashAndCashEquivalents",
            Field::NetReceivables => "netReceivables",
            Field::Inventory => "inventory",
            Field::Goodwill => "goodwill",
            Field::IntangibleAssets => "intangibleAssets",
            Field::TotalAssets => "totalAssets",
            Field::TotalCurrentLiabilities => "totalCurrentLiabilities",
            Field::AccountPayables => "accountPayables",
            Field::ShortTermDebt => "shortTermDebt",
            Field::TotalDebt => "totalDebt",
            Field::TotalLiabilities => "totalLiabilities",
            Field::DeferredRevenue => "deferredRevenue",
            Field::TotalStockholdersEquity => "totalStockholdersEquity",
            Field::Revenue => "revenue",
            Field::CostOfRevenue => "costOfRevenue",
            Field::GrossProfit => "grossProfit",
            Field::ResearchAndDevelopmentExpenses => "researchAndDevelopmentExpenses",
            Field::OperatingExpenses => "operatingExpenses",
            Field::OperatingIncome => "operatingIncome",
            Field::InterestExpense => "interestExpense",
            Field::NetIncome => "netIncome",
            Field::WeightedAverageShsOut => "weightedAverageShsOut",
            Field::OperatingCashFlow => "operatingCashFlow",
            Field::CapitalExpenditure => "capitalExpenditure",
            Field::FreeCashFlow => "freeCashFlow",
            Field::DividendsPaid => "dividendsPaid",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One fiscal year of one company, as supplied by the persistence layer.
///
/// Every line item is nullable. A record may carry a single statement
/// (e.g. only balance-sheet items); the series builder merges records that
/// share a fiscal year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FiscalPeriodRecord {
    pub symbol: Option<String>,
    #[serde(deserialize_with = "deserialize_year")]
    pub calendar_year: Option<i32>,
    /// Statement date; its year is used when `calendar_year` is missing
    pub date: Option<NaiveDate>,

    pub total_current_assets: Option<f64>,
    pub cash_and_cash_equivalents: Option<f64>,
    pub net_receivables: Option<f64>,
    pub inventory: Option<f64>,
    pub goodwill: Option<f64>,
    pub intangible_assets: Option<f64>,
    pub total_assets: Option<f64>,
    pub total_current_liabilities: Option<f64>,
    pub account_payables: Option<f64>,
    pub short_term_debt: Option<f64>,
    pub total_debt: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub deferred_revenue: Option<f64>,
    pub total_stockholders_equity: Option<f64>,

    pub revenue: Option<f64>,
    pub cost_of_revenue: Option<f64>,
    pub gross_profit: Option<f64>,
    pub research_and_development_expenses: Option<f64>,
    pub operating_expenses: Option<f64>,
    pub operating_income: Option<f64>,
    pub interest_expense: Option<f64>,
    pub net_income: Option<f64>,
    pub weighted_average_shs_out: Option<f64>,

    pub operating_cash_flow: Option<f64>,
    pub capital_expenditure: Option<f64>,
    pub free_cash_flow: Option<f64>,
    pub dividends_paid: Option<f64>,
}

impl FiscalPeriodRecord {
    pub fn new(calendar_year: i32) -> Self {
        Self {
            calendar_year: Some(calendar_year),
            ..Self::default()
        }
    }

    /// Builder-style setter, mostly useful for fixtures.
    pub fn with(mut self, field: Field, value: f64) -> Self {
        *self.slot_mut(field) = Some(value);
        self
    }

    /// Fiscal year of the record: `calendarYear`, else the statement date's year.
    pub fn fiscal_year(&self) -> Option<i32> {
        self.calendar_year.or_else(|| self.date.map(|d| d.year()))
    }

    pub fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::TotalCurrentAssets => self.total_current_assets,
            Field::CashAndCashEquivalents => self.cash_and_cash_equivalents,
            Field::NetReceivables => self.net_receivables,
            Field::Inventory => self.inventory,
            Field::Goodwill => self.goodwill,
            Field::IntangibleAssets => self.intangible_assets,
            Field::TotalAssets => self.total_assets,
            Field::TotalCurrentLiabilities => self.total_current_liabilities,
            Field::AccountPayables => self.account_payables,
            Field::ShortTermDebt => self.short_term_debt,
            Field::TotalDebt => self.total_debt,
            Field::TotalLiabilities => self.total_liabilities,
            Field::DeferredRevenue => self.deferred_revenue,
            Field::TotalStockholdersEquity => self.total_stockholders_equity,
            Field::Revenue => self.revenue,
            Field::CostOfRevenue => self.cost_of_revenue,
            Field::GrossProfit => self.gross_profit,
            Field::ResearchAndDevelopmentExpenses => self.research_and_development_expenses,
            Field::OperatingExpenses => self.operating_expenses,
            Field::OperatingIncome => self.operating_income,
            Field::InterestExpense => self.interest_expense,
            Field::NetIncome => self.net_income,
            Field::WeightedAverageShsOut => self.weighted_average_shs_out,
            Field::OperatingCashFlow => self.operating_cash_flow,
            Field::CapitalExpenditure => self.capital_expenditure,
            Field::FreeCashFlow => self.free_cash_flow,
            Field::DividendsPaid => self.dividends_paid,
        }
    }

    pub fn slot_mut(&mut self, field: Field) -> &mut Option<f64> {
        match field {
            Field::TotalCurrentAssets => &mut self.total_current_assets,
            Field::CashAndCashEquivalents => &mut self.cash_and_cash_equivalents,
            Field::NetReceivables => &mut self.net_receivables,
            Field::Inventory => &mut self.inventory,
            Field::Goodwill => &mut self.goodwill,
            Field::IntangibleAssets => &mut self.intangible_assets,
            Field::TotalAssets => &mut self.total_assets,
            Field::TotalCurrentLiabilities => &mut self.total_current_liabilities,
            Field::AccountPayables => &mut self.account_payables,
            Field::ShortTermDebt => &mut self.short_term_debt,
            Field::TotalDebt => &mut self.total_debt,
            Field::TotalLiabilities => &mut self.total_liabilities,
            Field::DeferredRevenue => &mut self.deferred_revenue,
            Field::TotalStockholdersEquity => &mut self.total_stockholders_equity,
            Field::Revenue => &mut self.revenue,
            Field::CostOfRevenue => &mut self.cost_of_revenue,
            Field::GrossProfit => &mut self.gross_profit,
            Field::ResearchAndDevelopmentExpenses => &mut self.research_and_development_expenses,
            Field::OperatingExpenses => &mut self.operating_expenses,
            Field::OperatingIncome => &mut self.operating_income,
            Field::InterestExpense => &mut self.interest_expense,
            Field::NetIncome => &mut self.net_income,
            Field::WeightedAverageShsOut => &mut self.weighted_average_shs_out,
            Field::OperatingCashFlow => &mut self.operating_cash_flow,
            Field::CapitalExpenditure => &mut self.capital_expenditure,
            Field::FreeCashFlow => &mut self.free_cash_flow,
            Field::DividendsPaid => &mut self.dividends_paid,
        }
    }
}

/// The provider reports `calendarYear` as a string; older exports use a number.
fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum YearRepr {
        Number(i64),
        Text(String),
    }

    match Option::<YearRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(YearRepr::Number(n)) => i32::try_from(n).map(Some).map_err(de::Error::custom),
        Some(YearRepr::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                trimmed.parse::<i32>().map(Some).map_err(de::Error::custom)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_keys_match_serde_names() {
        for field in Field::ALL {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.key()));
        }
    }

    #[test]
    fn test_record_accepts_string_year() {
        let record: FiscalPeriodRecord =
            serde_json::from_str(r#"{"calendarYear": "2021", "revenue": 1000, "netIncome": null}"#).unwrap();
        assert_eq!(record.fiscal_year(), Some(2021));
        assert_eq!(record.get(Field::Revenue), Some(1000.0));
        assert_eq!(record.get(Field::NetIncome), None);
    }

    #[test]
    fn test_record_falls_back_to_statement_date() {
        let record: FiscalPeriodRecord =
            serde_json::from_str(r#"{"date": "2019-09-28", "goodwill": 5.0, "link": "ignored"}"#).unwrap();
        assert_eq!(record.fiscal_year(), Some(2019));
        assert_eq!(record.get(Field::Goodwill), Some(5.0));
    }

    #[test]
    fn test_builder_setter() {
        let record = FiscalPeriodRecord::new(2020)
            .with(Field::FreeCashFlow, -205.0)
            .with(Field::DividendsPaid, -40.0);
        assert_eq!(record.get(Field::FreeCashFlow), Some(-205.0));
        assert_eq!(record.get(Field::DividendsPaid), Some(-40.0));
        assert_eq!(record.get(Field::Revenue), None);
    }
}
