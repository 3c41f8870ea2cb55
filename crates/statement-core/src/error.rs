use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Fact source error: {0}")]
    Source(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AnalysisError::Source("statements.json: not found".to_string());
        assert_eq!(err.to_string(), "Fact source error: statements.json: not found");

        let err: AnalysisError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(err.to_string().starts_with("Serialization error:"));
    }
}
