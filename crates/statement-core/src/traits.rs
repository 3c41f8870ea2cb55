use crate::{
    AnalysisError, Field, FinancialSeries, Finding, FindingKind, FiscalPeriodRecord,
    InsufficientData, Outcome,
};

/// A single financial heuristic evaluated against a yearly series.
///
/// Implementations are stateless apart from their thresholds and must not
/// cache anything derived from a series; every call recomputes its own
/// ratios and changes from the borrowed snapshot.
pub trait Detector: Send + Sync {
    /// Stable identifier, e.g. `rising_leverage`.
    fn id(&self) -> &'static str;

    /// Human name used in insufficient-data messages.
    fn subject(&self) -> &'static str;

    fn kind(&self) -> FindingKind;

    /// Fields that must be present in at least one period.
    fn required_fields(&self) -> &[Field];

    /// Fields that must be known in every period.
    fn complete_fields(&self) -> &[Field] {
        &[]
    }

    /// Runs the heuristic. Called only when the required fields are available.
    fn detect(&self, series: &FinancialSeries) -> Vec<Finding>;

    fn evaluate(&self, series: &FinancialSeries) -> Outcome {
        if series.is_empty() {
            return Outcome::NoFinding;
        }

        let missing_fields = series.missing(self.required_fields());
        let incomplete_fields = series.incomplete(self.complete_fields());
        if !missing_fields.is_empty() || !incomplete_fields.is_empty() {
            return Outcome::InsufficientData(InsufficientData {
                detector_id: self.id(),
                subject: self.subject(),
                missing_fields,
                incomplete_fields,
            });
        }

        Outcome::from_findings(self.detect(series))
    }
}

/// Supplies raw statement records for a company. Implemented by whatever
/// persistence or provider layer sits in front of the engine.
pub trait FactSource: Send + Sync {
    fn fetch_periods(&self, symbol: &str) -> Result<Vec<FiscalPeriodRecord>, AnalysisError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Section, Zone};

    struct AlwaysFires;

    impl Detector for AlwaysFires {
        fn id(&self) -> &'static str {
            "always_fires"
        }

        fn subject(&self) -> &'static str {
            "Revenue"
        }

        fn kind(&self) -> FindingKind {
            FindingKind::RedFlag
        }

        fn required_fields(&self) -> &[Field] {
            &[Field::Revenue]
        }

        fn detect(&self, _series: &FinancialSeries) -> Vec<Finding> {
            vec![Finding {
                detector_id: "always_fires",
                kind: FindingKind::RedFlag,
                title: "Always".to_string(),
                rationale: String::new(),
                zone: Zone::None,
                sections: vec![Section {
                    zone: Zone::None,
                    heading: None,
                    observations: Vec::new(),
                }],
            }]
        }
    }

    #[test]
    fn test_empty_series_is_skipped() {
        let outcome = AlwaysFires.evaluate(&FinancialSeries::empty("ACME"));
        assert_eq!(outcome, Outcome::NoFinding);
    }

    #[test]
    fn test_missing_field_reports_insufficient_data() {
        let series = FinancialSeries::from_records(
            "ACME",
            vec![FiscalPeriodRecord::new(2020).with(Field::NetIncome, 1.0)],
        );

        match AlwaysFires.evaluate(&series) {
            Outcome::InsufficientData(data) => {
                assert_eq!(data.detector_id, "always_fires");
                assert_eq!(data.missing_fields, vec![Field::Revenue]);
            }
            other => panic!("expected insufficient data, got {other:?}"),
        }
    }

    #[test]
    fn test_present_field_runs_detector() {
        let series = FinancialSeries::from_records(
            "ACME",
            vec![FiscalPeriodRecord::new(2020).with(Field::Revenue, 1.0)],
        );
        assert!(AlwaysFires.evaluate(&series).is_found());
    }
}
