use anyhow::{Context, Result};
use serde::Serialize;
use statement_analysis::{RuleVariant, Thresholds};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EngineConfig {
    pub variant: RuleVariant,
    pub thresholds: Thresholds,
    /// Partial JSON applied on top of the variant's preset
    pub thresholds_file: Option<PathBuf>,
    /// Evaluate detectors on the rayon pool
    pub parallel: bool,
    /// Append insufficient-data messages to the rendered report
    pub include_unevaluated: bool,
}

impl EngineConfig {
    pub fn for_variant(variant: RuleVariant) -> Self {
        Self {
            variant,
            thresholds: Thresholds::for_variant(variant),
            ..Self::default()
        }
    }

    /// Reads `FLAGS_*` variables. Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        let variant: RuleVariant = env::var("FLAGS_RULE_VARIANT")
            .unwrap_or_else(|_| "service".to_string())
            .parse()?;

        let mut config = Self::for_variant(variant);

        config.parallel = env::var("FLAGS_PARALLEL")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .context("FLAGS_PARALLEL must be true or false")?;
        config.include_unevaluated = env::var("FLAGS_INCLUDE_UNEVALUATED")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .context("FLAGS_INCLUDE_UNEVALUATED must be true or false")?;

        if let Ok(path) = env::var("FLAGS_THRESHOLDS_FILE") {
            config = config.with_thresholds_file(path)?;
        }

        Ok(config)
    }

    /// Switches preset, re-applying the thresholds file if one is set.
    pub fn with_variant(mut self, variant: RuleVariant) -> Result<Self> {
        self.variant = variant;
        self.thresholds = Thresholds::for_variant(variant);
        match self.thresholds_file.take() {
            Some(path) => self.with_thresholds_file(path),
            None => Ok(self),
        }
    }

    /// Overrides thresholds of the current preset from a partial JSON file.
    pub fn with_thresholds_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read thresholds file {}", path.display()))?;
        self.thresholds = Thresholds::from_json_str(&json, self.variant)
            .with_context(|| format!("Invalid thresholds file {}", path.display()))?;
        self.thresholds_file = Some(path.to_path_buf());

        tracing::info!(path = %path.display(), variant = ?self.variant, "Loaded threshold overrides");
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statement_analysis::CashFlowProxy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_overrides(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_legacy_preset_switches_proxy() {
        let config = EngineConfig::for_variant(RuleVariant::Legacy);
        assert_eq!(config.thresholds.red_flags.payout_proxy, CashFlowProxy::OperatingCashFlow);
        assert!(!config.parallel);
        assert!(!config.include_unevaluated);
    }

    #[test]
    fn test_thresholds_file_overrides_subset() {
        let file = write_overrides(r#"{"red_flags": {"high_leverage": 3.0}}"#);

        let config = EngineConfig::for_variant(RuleVariant::Legacy)
            .with_thresholds_file(file.path())
            .unwrap();

        assert_eq!(config.thresholds.red_flags.high_leverage, 3.0);
        assert_eq!(config.thresholds.red_flags.bad_dso_days, 60.0);
    }

    #[test]
    fn test_variant_switch_keeps_file_overrides() {
        let file = write_overrides(r#"{"positive": {"revenue_growth_floor": 0.1}}"#);

        let config = EngineConfig::default()
            .with_thresholds_file(file.path())
            .and_then(|c| c.with_variant(RuleVariant::Legacy))
            .unwrap();

        assert_eq!(config.variant, RuleVariant::Legacy);
        assert_eq!(config.thresholds.positive.revenue_growth_floor, 0.1);
        assert_eq!(config.thresholds.red_flags.share_issuance, 0.05);
    }

    // Only test in the crate touching FLAGS_* variables; keep it that way.
    #[test]
    fn test_from_env_parsing() {
        const VARS: [&str; 4] = [
            "FLAGS_RULE_VARIANT",
            "FLAGS_PARALLEL",
            "FLAGS_INCLUDE_UNEVALUATED",
            "FLAGS_THRESHOLDS_FILE",
        ];
        VARS.iter().for_each(|key| env::remove_var(key));

        let config = EngineConfig::from_env().unwrap();
        assert_eq!(config, EngineConfig::default());

        let file = write_overrides(r#"{"red_flags": {"high_leverage": 3.0}}"#);
        env::set_var("FLAGS_RULE_VARIANT", "Legacy");
        env::set_var("FLAGS_PARALLEL", "true");
        env::set_var("FLAGS_INCLUDE_UNEVALUATED", "false");
        env::set_var("FLAGS_THRESHOLDS_FILE", file.path());
        let config = EngineConfig::from_env().unwrap();
        assert_eq!(config.variant, RuleVariant::Legacy);
        assert!(config.parallel);
        assert!(!config.include_unevaluated);
        assert_eq!(config.thresholds.red_flags.high_leverage, 3.0);
        assert_eq!(config.thresholds.red_flags.payout_proxy, CashFlowProxy::OperatingCashFlow);
        env::remove_var("FLAGS_THRESHOLDS_FILE");

        env::set_var("FLAGS_PARALLEL", "yes");
        let err = EngineConfig::from_env().unwrap_err();
        assert_eq!(err.to_string(), "FLAGS_PARALLEL must be true or false");

        env::set_var("FLAGS_PARALLEL", "false");
        env::set_var("FLAGS_RULE_VARIANT", "aggressive");
        assert!(EngineConfig::from_env().is_err());

        VARS.iter().for_each(|key| env::remove_var(key));
    }

    #[test]
    fn test_missing_thresholds_file_is_an_error() {
        let result = EngineConfig::default().with_thresholds_file("/nonexistent/thresholds.json");
        assert!(result.is_err());
    }
}
