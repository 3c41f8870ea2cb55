//! statement-flags: screen yearly financial statements for red flags and strengths.
//!
//! Usage:
//!   statement-flags aapl.json
//!   statement-flags --symbol AAPL balance.json income.json cashflow.json
//!   statement-flags --variant legacy --json aapl.json
//!   statement-flags --red-flags-only --thresholds strict.json aapl.json

mod cli;
mod source;

use anyhow::{Context, Result};
use clap::Parser;
use flag_orchestrator::{EngineConfig, FlagAnalyzer, SymbolAnalysis};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use source::JsonFileSource;

fn init_tracing(verbose: bool) {
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

fn engine_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = EngineConfig::from_env().context("Failed to load FLAGS_* configuration")?;

    if let Some(variant) = cli.variant {
        config = config.with_variant(variant)?;
    }
    if let Some(path) = &cli.thresholds {
        config = config.with_thresholds_file(path)?;
    }
    config.parallel |= cli.parallel;
    config.include_unevaluated |= cli.include_unevaluated;

    Ok(config)
}

fn print_text(cli: &Cli, analysis: &SymbolAnalysis) {
    if !cli.positive_only {
        println!("{}", analysis.red_flags.text);
    }
    if !cli.positive_only && !cli.red_flags_only {
        println!();
    }
    if !cli.red_flags_only {
        println!("{}", analysis.positive_indicators.text);
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = engine_config(&cli)?;
    tracing::debug!(?config, "Engine configuration");
    let analyzer = FlagAnalyzer::new(config);

    let source = JsonFileSource::new(cli.files.clone());
    let symbol = cli.symbol.clone().unwrap_or_default();
    let analysis = analyzer
        .analyze_symbol(&source, &symbol)
        .context("Failed to analyze statements")?;

    tracing::info!(
        symbol = %analysis.symbol,
        periods = analysis.fiscal_years.len(),
        red_flags = analysis.red_flags.findings.len(),
        positive_indicators = analysis.positive_indicators.findings.len(),
        "Analysis complete"
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_text(&cli, &analysis);
    }

    Ok(())
}
