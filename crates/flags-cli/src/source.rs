//! Statement records read from JSON exports on disk.

use std::path::PathBuf;

use serde::Deserialize;
use statement_core::{AnalysisError, FactSource, FiscalPeriodRecord};

/// Three-statement export as returned by the fundamentals provider.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StatementBundle {
    balance_sheet: Vec<FiscalPeriodRecord>,
    income_statement: Vec<FiscalPeriodRecord>,
    cash_flow: Vec<FiscalPeriodRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StatementFile {
    Records(Vec<FiscalPeriodRecord>),
    Bundle(StatementBundle),
}

impl StatementFile {
    fn into_records(self) -> Vec<FiscalPeriodRecord> {
        match self {
            StatementFile::Records(records) => records,
            StatementFile::Bundle(bundle) => bundle
                .balance_sheet
                .into_iter()
                .chain(bundle.income_statement)
                .chain(bundle.cash_flow)
                .collect(),
        }
    }
}

pub fn parse_statements(json: &str) -> Result<Vec<FiscalPeriodRecord>, AnalysisError> {
    let file: StatementFile = serde_json::from_str(json)?;
    Ok(file.into_records())
}

/// Reads every file on each fetch. An empty symbol accepts all records;
/// otherwise records tagged with a different symbol are dropped.
pub struct JsonFileSource {
    paths: Vec<PathBuf>,
}

impl JsonFileSource {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl FactSource for JsonFileSource {
    fn fetch_periods(&self, symbol: &str) -> Result<Vec<FiscalPeriodRecord>, AnalysisError> {
        let mut records = Vec::new();

        for path in &self.paths {
            let json = std::fs::read_to_string(path)
                .map_err(|e| AnalysisError::Source(format!("{}: {}", path.display(), e)))?;
            let parsed = parse_statements(&json)?;
            tracing::debug!("Read {} records from {}", parsed.len(), path.display());
            records.extend(parsed);
        }

        if !symbol.is_empty() {
            let before = records.len();
            records.retain(|record| {
                record
                    .symbol
                    .as_deref()
                    .map_or(true, |s| s.eq_ignore_ascii_case(symbol))
            });
            if records.len() < before {
                tracing::debug!("Dropped {} records for other symbols", before - records.len());
            }
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statement_core::Field;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_flat_array() {
        let records = parse_statements(
            r#"[
                {"symbol": "ACME", "calendarYear": "2021", "revenue": 1000},
                {"symbol": "ACME", "calendarYear": 2022, "revenue": 1100}
            ]"#,
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].fiscal_year(), Some(2022));
        assert_eq!(records[1].get(Field::Revenue), Some(1100.0));
    }

    #[test]
    fn test_parse_three_statement_bundle() {
        let records = parse_statements(
            r#"{
                "balanceSheet": [{"date": "2021-12-31", "goodwill": 50}],
                "incomeStatement": [{"date": "2021-12-31", "revenue": 1000}],
                "cashFlow": [{"date": "2021-12-31", "freeCashFlow": -20}]
            }"#,
        )
        .unwrap();

        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.fiscal_year() == Some(2021)));
        assert_eq!(records[2].get(Field::FreeCashFlow), Some(-20.0));
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let result = parse_statements("not json");
        assert!(matches!(result, Err(AnalysisError::Serialization(_))));
    }

    #[test]
    fn test_symbol_filter_keeps_untagged_records() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"[
                {"symbol": "ACME", "calendarYear": 2021, "revenue": 1},
                {"symbol": "OTHER", "calendarYear": 2021, "revenue": 2},
                {"calendarYear": 2022, "revenue": 3}
            ]"#,
        )
        .unwrap();

        let source = JsonFileSource::new(vec![file.path().to_path_buf()]);
        let filtered = source.fetch_periods("acme").unwrap();
        let all = source.fetch_periods("").unwrap();

        assert_eq!(filtered.len(), 2);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_missing_file_is_source_error() {
        let source = JsonFileSource::new(vec![PathBuf::from("/nonexistent/statements.json")]);
        assert!(matches!(source.fetch_periods("ACME"), Err(AnalysisError::Source(_))));
    }
}
