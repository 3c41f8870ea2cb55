//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::Parser;
use statement_analysis::RuleVariant;

/// Screen a company's financial statements for red flags and strengths
#[derive(Parser, Debug)]
#[command(name = "statement-flags")]
#[command(about = "Financial statement red-flag and positive-indicator screener", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Statement JSON files (a flat array of yearly records, or an object with
    /// balanceSheet / incomeStatement / cashFlow arrays)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Only use records for this ticker
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Threshold preset: service or legacy (overrides FLAGS_RULE_VARIANT)
    #[arg(long)]
    pub variant: Option<RuleVariant>,

    /// Partial JSON threshold overrides (overrides FLAGS_THRESHOLDS_FILE)
    #[arg(long)]
    pub thresholds: Option<PathBuf>,

    /// Print the full analysis as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Only run the red-flag detectors
    #[arg(long, conflicts_with = "positive_only")]
    pub red_flags_only: bool,

    /// Only run the positive-indicator detectors
    #[arg(long)]
    pub positive_only: bool,

    /// Evaluate detectors in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Append detectors that could not run to the text report
    #[arg(long)]
    pub include_unevaluated: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
