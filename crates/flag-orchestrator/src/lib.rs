//! Runs the red-flag and positive-indicator detector libraries over a
//! company's statement history and assembles the text reports.

use rayon::prelude::*;
use serde::Serialize;
use statement_analysis::format::{render_finding, render_insufficient, SEPARATOR};
use statement_analysis::{positive_detectors, red_flag_detectors, DetectorSet};
use statement_core::{
    AnalysisError, FactSource, FinancialSeries, Finding, FindingKind, InsufficientData, Outcome,
    SeriesBuilder,
};

pub mod config;
pub use config::EngineConfig;

pub const NO_RED_FLAGS: &str = "No red flags identified.";
pub const NO_POSITIVE_INDICATORS: &str = "No positive indicators identified.";

/// Result of one analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub kind: FindingKind,
    pub findings: Vec<Finding>,
    /// Detectors skipped for lack of data
    pub unevaluated: Vec<InsufficientData>,
    /// Display-ready text, never empty
    pub text: String,
}

/// Both reports for one company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolAnalysis {
    pub symbol: String,
    pub fiscal_years: Vec<i32>,
    pub red_flags: Report,
    pub positive_indicators: Report,
}

pub struct FlagAnalyzer {
    config: EngineConfig,
    red_flags: DetectorSet,
    positives: DetectorSet,
}

impl Default for FlagAnalyzer {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl FlagAnalyzer {
    pub fn new(config: EngineConfig) -> Self {
        let red_flags = red_flag_detectors(&config.thresholds.red_flags);
        let positives = positive_detectors(&config.thresholds.positive);
        Self {
            config,
            red_flags,
            positives,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn red_flags(&self, series: &FinancialSeries) -> Report {
        self.run(&self.red_flags, FindingKind::RedFlag, series)
    }

    pub fn positive_indicators(&self, series: &FinancialSeries) -> Report {
        self.run(&self.positives, FindingKind::Positive, series)
    }

    /// Fetches a company's records, builds the series and runs both passes.
    pub fn analyze_symbol(
        &self,
        source: &dyn FactSource,
        symbol: &str,
    ) -> Result<SymbolAnalysis, AnalysisError> {
        let records = source.fetch_periods(symbol)?;
        tracing::info!("Fetched {} statement records for {}", records.len(), symbol);

        let mut builder = SeriesBuilder::new(symbol);
        builder.extend(records);
        if builder.skipped() > 0 {
            tracing::warn!("Skipped {} records without a fiscal year for {}", builder.skipped(), symbol);
        }
        let series = builder.build();

        Ok(SymbolAnalysis {
            symbol: series.symbol().to_string(),
            fiscal_years: series.years().to_vec(),
            red_flags: self.red_flags(&series),
            positive_indicators: self.positive_indicators(&series),
        })
    }

    fn run(&self, detectors: &DetectorSet, kind: FindingKind, series: &FinancialSeries) -> Report {
        tracing::info!(
            "Running {} {:?} detectors over {} periods for {}",
            detectors.len(),
            kind,
            series.len(),
            series.symbol()
        );

        // Collecting an indexed parallel iterator keeps registry order.
        let outcomes: Vec<Outcome> = if self.config.parallel {
            detectors.par_iter().map(|d| d.evaluate(series)).collect()
        } else {
            detectors.iter().map(|d| d.evaluate(series)).collect()
        };

        let mut findings = Vec::new();
        let mut unevaluated = Vec::new();
        for (detector, outcome) in detectors.iter().zip(outcomes) {
            match outcome {
                Outcome::Found(found) => {
                    tracing::debug!(detector = detector.id(), findings = found.len(), "Detector fired");
                    findings.extend(found);
                }
                Outcome::NoFinding => {
                    tracing::debug!(detector = detector.id(), "No finding");
                }
                Outcome::InsufficientData(data) => {
                    tracing::debug!(detector = detector.id(), reason = %data, "Insufficient data");
                    unevaluated.push(data);
                }
            }
        }

        let text = self.render(kind, &findings, &unevaluated);
        Report {
            kind,
            findings,
            unevaluated,
            text,
        }
    }

    fn render(&self, kind: FindingKind, findings: &[Finding], unevaluated: &[InsufficientData]) -> String {
        let mut blocks: Vec<String> = findings.iter().map(render_finding).collect();
        if self.config.include_unevaluated {
            blocks.extend(unevaluated.iter().map(render_insufficient));
        }

        if blocks.is_empty() {
            return match kind {
                FindingKind::RedFlag => NO_RED_FLAGS.to_string(),
                FindingKind::Positive => NO_POSITIVE_INDICATORS.to_string(),
            };
        }
        let separator = format!("\n\n{SEPARATOR}\n\n");
        blocks.join(separator.as_str())
    }
}

/// Red-flag report text with the default service thresholds.
pub fn analyze_red_flags(series: &FinancialSeries) -> String {
    FlagAnalyzer::default().red_flags(series).text
}

/// Positive-indicator report text with the default thresholds.
pub fn analyze_positive_indicators(series: &FinancialSeries) -> String {
    FlagAnalyzer::default().positive_indicators(series).text
}

#[cfg(test)]
mod tests;
