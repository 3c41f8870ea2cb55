use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Field;

/// Severity tier assigned to a flagged value. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Zone {
    None,
    Caution,
    RedFlag,
    Critical,
}

/// Sign of a period-over-period change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    pub fn from_change(change: f64) -> Self {
        if change > 0.0 {
            Direction::Up
        } else if change < 0.0 {
            Direction::Down
        } else {
            Direction::Flat
        }
    }
}

/// How a measure's raw value should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    /// Currency amount, scaled to millions/billions
    Money,
    /// Share counts, scaled like money
    Shares,
    /// Plain ratio with two decimals
    Ratio,
    /// Value already expressed in percent points
    Percent,
    /// Day counts rendered with a " days" suffix (DPO)
    Days,
}

/// One labelled value of a period observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measure {
    pub label: String,
    pub value: f64,
    pub formatted: String,
    /// Period-over-period change as a fraction (0.1 = 10%)
    pub change: Option<f64>,
    pub direction: Option<Direction>,
}

/// A flagged fiscal year within a finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodObservation {
    pub year: i32,
    pub zone: Zone,
    #[serde(flatten)]
    pub measure: Measure,
    /// Further measures reported on the same line
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub companions: Vec<Measure>,
}

/// Observations that classified into the same zone band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub zone: Zone,
    /// Band heading, rendered above the section's lines when present
    pub heading: Option<String>,
    pub observations: Vec<PeriodObservation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FindingKind {
    RedFlag,
    Positive,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub detector_id: &'static str,
    pub kind: FindingKind,
    pub title: String,
    pub rationale: String,
    /// Most severe zone among the observations
    pub zone: Zone,
    /// Sections ordered from most lenient to most severe
    pub sections: Vec<Section>,
}

impl Finding {
    /// Flagged periods in presentation order.
    pub fn observations(&self) -> impl Iterator<Item = &PeriodObservation> {
        self.sections.iter().flat_map(|s| s.observations.iter())
    }

    pub fn years(&self) -> Vec<i32> {
        self.observations().map(|o| o.year).collect()
    }
}

/// Why a detector could not be evaluated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsufficientData {
    pub detector_id: &'static str,
    /// Human name of the analysis, e.g. "Gross Profit Margin"
    pub subject: &'static str,
    /// Required fields with no value in any period
    pub missing_fields: Vec<Field>,
    /// Required fields that must be complete but have gaps
    pub incomplete_fields: Vec<Field>,
}

impl fmt::Display for InsufficientData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.missing_fields.is_empty() {
            let noun = if self.missing_fields.len() == 1 { "column" } else { "columns" };
            write!(
                f,
                "{} analysis requires {} {}.",
                self.subject,
                quoted_list(&self.missing_fields),
                noun
            )
        } else {
            write!(
                f,
                "{} analysis found missing values in {}.",
                self.subject,
                quoted_list(&self.incomplete_fields)
            )
        }
    }
}

fn quoted_list(fields: &[Field]) -> String {
    let quoted: Vec<String> = fields.iter().map(|f| format!("'{}'", f.key())).collect();
    match quoted.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        _ => quoted.join(", "),
    }
}

/// Result of evaluating one detector against a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Outcome {
    Found(Vec<Finding>),
    NoFinding,
    InsufficientData(InsufficientData),
}

impl Outcome {
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        if findings.is_empty() {
            Outcome::NoFinding
        } else {
            Outcome::Found(findings)
        }
    }

    pub fn findings(&self) -> &[Finding] {
        match self {
            Outcome::Found(findings) => findings,
            _ => &[],
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_ordering() {
        assert!(Zone::None < Zone::Caution);
        assert!(Zone::Caution < Zone::RedFlag);
        assert!(Zone::RedFlag < Zone::Critical);
    }

    #[test]
    fn test_direction_from_change() {
        assert_eq!(Direction::from_change(0.2), Direction::Up);
        assert_eq!(Direction::from_change(-0.2), Direction::Down);
        assert_eq!(Direction::from_change(0.0), Direction::Flat);
    }

    #[test]
    fn test_insufficient_data_message() {
        let two = InsufficientData {
            detector_id: "gross_margin_erosion",
            subject: "Gross Profit Margin",
            missing_fields: vec![Field::GrossProfit, Field::Revenue],
            incomplete_fields: vec![],
        };
        assert_eq!(
            two.to_string(),
            "Gross Profit Margin analysis requires 'grossProfit' and 'revenue' columns."
        );

        let one = InsufficientData {
            detector_id: "goodwill_growth",
            subject: "Goodwill",
            missing_fields: vec![Field::Goodwill],
            incomplete_fields: vec![],
        };
        assert_eq!(one.to_string(), "Goodwill analysis requires 'goodwill' column.");

        let gaps = InsufficientData {
            detector_id: "cash_accumulation",
            subject: "Cash Reserve",
            missing_fields: vec![],
            incomplete_fields: vec![Field::CashAndCashEquivalents],
        };
        assert_eq!(
            gaps.to_string(),
            "Cash Reserve analysis found missing values in 'cashAndCashEquivalents'."
        );
    }

    #[test]
    fn test_empty_findings_become_no_finding() {
        assert_eq!(Outcome::from_findings(Vec::new()), Outcome::NoFinding);
        assert!(Outcome::NoFinding.findings().is_empty());
    }
}
