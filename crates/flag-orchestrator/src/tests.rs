#[cfg(test)]
mod analyzer_tests {
    use crate::*;
    use statement_analysis::RuleVariant;
    use statement_core::{Field, FiscalPeriodRecord};

    fn records(columns: &[(Field, &[f64])]) -> Vec<FiscalPeriodRecord> {
        let periods = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
        (0..periods)
            .map(|i| {
                columns.iter().fold(FiscalPeriodRecord::new(2019 + i as i32), |record, (field, values)| {
                    match values.get(i) {
                        Some(value) if !value.is_nan() => record.with(*field, *value),
                        _ => record,
                    }
                })
            })
            .collect()
    }

    fn fixture_series() -> FinancialSeries {
        FinancialSeries::from_records(
            "ACME",
            records(&[
                (Field::Revenue, &[1000.0, 1100.0, 1200.0, 1150.0, 1050.0]),
                (Field::NetIncome, &[300.0, 500.0, 600.0, 500.0, 800.0]),
                (Field::FreeCashFlow, &[180.0, 190.0, 210.0, -205.0, f64::NAN]),
            ]),
        )
    }

    struct InMemorySource(Vec<FiscalPeriodRecord>);

    impl FactSource for InMemorySource {
        fn fetch_periods(&self, symbol: &str) -> Result<Vec<FiscalPeriodRecord>, AnalysisError> {
            if symbol == "ACME" {
                Ok(self.0.clone())
            } else {
                Err(AnalysisError::Source(format!("unknown symbol {symbol}")))
            }
        }
    }

    #[test]
    fn test_clean_series_returns_sentinels() {
        let series = FinancialSeries::empty("EMPTY");
        assert_eq!(analyze_red_flags(&series), NO_RED_FLAGS);
        assert_eq!(analyze_positive_indicators(&series), NO_POSITIVE_INDICATORS);
    }

    #[test]
    fn test_steady_company_returns_sentinels() {
        let levels = [
            (Field::TotalCurrentAssets, 500.0),
            (Field::CashAndCashEquivalents, 200.0),
            (Field::NetReceivables, 80.0),
            (Field::Inventory, 90.0),
            (Field::Goodwill, 50.0),
            (Field::IntangibleAssets, 30.0),
            (Field::TotalAssets, 2000.0),
            (Field::TotalCurrentLiabilities, 250.0),
            (Field::AccountPayables, 60.0),
            (Field::ShortTermDebt, 40.0),
            (Field::TotalDebt, 400.0),
            (Field::TotalLiabilities, 900.0),
            (Field::DeferredRevenue, 20.0),
            (Field::TotalStockholdersEquity, 1100.0),
            (Field::Revenue, 1000.0),
            (Field::CostOfRevenue, 600.0),
            (Field::GrossProfit, 400.0),
            (Field::ResearchAndDevelopmentExpenses, 50.0),
            (Field::OperatingExpenses, 200.0),
            (Field::OperatingIncome, 200.0),
            (Field::InterestExpense, 20.0),
            (Field::NetIncome, 150.0),
            (Field::WeightedAverageShsOut, 100.0),
            (Field::OperatingCashFlow, 220.0),
            (Field::CapitalExpenditure, -60.0),
            (Field::FreeCashFlow, 160.0),
            (Field::DividendsPaid, -30.0),
        ];
        let columns: Vec<(Field, [f64; 3])> = levels.iter().map(|(field, value)| (*field, [*value; 3])).collect();
        let columns: Vec<(Field, &[f64])> = columns.iter().map(|(field, values)| (*field, values.as_slice())).collect();
        let series = FinancialSeries::from_records("STEADY", records(&columns));
        assert!(series.missing(&Field::ALL).is_empty());

        let analyzer = FlagAnalyzer::default();
        let red_flags = analyzer.red_flags(&series);
        let positives = analyzer.positive_indicators(&series);

        assert!(red_flags.unevaluated.is_empty());
        assert!(positives.unevaluated.is_empty());
        assert_eq!(red_flags.text, NO_RED_FLAGS);
        assert_eq!(positives.text, NO_POSITIVE_INDICATORS);
    }

    #[test]
    fn test_findings_joined_by_separator() {
        let report = FlagAnalyzer::default().red_flags(&fixture_series());

        let ids: Vec<_> = report.findings.iter().map(|f| f.detector_id).collect();
        assert_eq!(ids, vec!["declining_revenue_rising_income", "negative_free_cash_flow"]);
        assert_eq!(report.text.matches(SEPARATOR).count(), 1);
        assert!(report.text.starts_with("!!! Declining Revenue with Increasing Net Income"));
        assert!(report.text.contains(&format!("\n\n{SEPARATOR}\n\n!!! Negative Free Cash Flow")));
    }

    #[test]
    fn test_missing_columns_do_not_abort_batch() {
        let report = FlagAnalyzer::default().red_flags(&fixture_series());

        assert_eq!(report.findings.len(), 2);
        assert_eq!(report.unevaluated.len(), 11);
        assert!(!report.text.contains("analysis requires"));
    }

    #[test]
    fn test_unevaluated_messages_appended_when_configured() {
        let config = EngineConfig {
            include_unevaluated: true,
            ..EngineConfig::default()
        };
        let report = FlagAnalyzer::new(config).red_flags(&fixture_series());

        assert!(report.text.contains("Goodwill analysis requires 'goodwill' column."));
        assert!(report
            .text
            .contains("Debt-to-Equity analysis requires 'totalDebt' and 'totalStockholdersEquity' columns."));
        assert_eq!(report.text.matches(SEPARATOR).count(), 12);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let series = fixture_series();
        let sequential = FlagAnalyzer::default();
        let parallel = FlagAnalyzer::new(EngineConfig {
            parallel: true,
            ..EngineConfig::default()
        });

        assert_eq!(sequential.red_flags(&series), parallel.red_flags(&series));
        assert_eq!(
            sequential.positive_indicators(&series),
            parallel.positive_indicators(&series)
        );
    }

    #[test]
    fn test_legacy_variant_changes_payout_proxy() {
        let series = FinancialSeries::from_records(
            "ACME",
            records(&[
                (Field::DividendsPaid, &[-60.0, -60.0]),
                (Field::NetIncome, &[100.0, 100.0]),
                (Field::OperatingCashFlow, &[50.0, 200.0]),
            ]),
        );

        let service = FlagAnalyzer::default().red_flags(&series);
        assert!(service.findings.iter().all(|f| f.detector_id != "high_payout_weak_cash_flow"));

        let legacy = FlagAnalyzer::new(EngineConfig::for_variant(RuleVariant::Legacy)).red_flags(&series);
        let payout = legacy
            .findings
            .iter()
            .find(|f| f.detector_id == "high_payout_weak_cash_flow")
            .expect("legacy payout finding");
        assert_eq!(payout.years(), vec![2019]);
    }

    #[test]
    fn test_analyze_symbol_merges_statements() {
        let mut statements = records(&[(Field::Revenue, &[1000.0, 1100.0, 1200.0, 1150.0, 1050.0])]);
        statements.extend(records(&[(Field::NetIncome, &[300.0, 500.0, 600.0, 500.0, 800.0])]));
        statements.push(FiscalPeriodRecord::default());
        let source = InMemorySource(statements);

        let analysis = FlagAnalyzer::default().analyze_symbol(&source, "ACME").unwrap();

        assert_eq!(analysis.fiscal_years, vec![2019, 2020, 2021, 2022, 2023]);
        assert_eq!(analysis.red_flags.findings.len(), 1);
        assert_eq!(analysis.red_flags.findings[0].years(), vec![2023]);
    }

    #[test]
    fn test_analyze_symbol_propagates_source_error() {
        let source = InMemorySource(Vec::new());
        let result = FlagAnalyzer::default().analyze_symbol(&source, "NOPE");
        assert!(matches!(result, Err(AnalysisError::Source(_))));
    }
}
