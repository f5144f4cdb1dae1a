use hf_inference::{DEFAULT_MODEL_URL, DecisionPolicy};
use review_corpus::DEFAULT_TEXT_COLUMN;
use std::{env, fmt, str::FromStr};

const DEFAULT_DATASET_SOURCE: &str = "reviews_test.tsv";

pub struct AnalyzerConfig {
    pub dataset_source: String,
    pub text_column: String,
    pub model_url: String,
    pub hf_token: Option<String>,
    pub decision_policy: DecisionPolicy,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl AnalyzerConfig {
    pub fn try_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dataset_source = lookup("DATASET_SOURCE")
            .unwrap_or_else(|| DEFAULT_DATASET_SOURCE.to_string());
        let text_column = lookup("DATASET_TEXT_COLUMN")
            .unwrap_or_else(|| DEFAULT_TEXT_COLUMN.to_string());
        let model_url = lookup("MODEL_URL").unwrap_or_else(|| DEFAULT_MODEL_URL.to_string());
        let hf_token = lookup("HF_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        let decision_policy = match lookup("DECISION_POLICY") {
            Some(value) => value
                .parse()
                .map_err(|e| ConfigError::ParseError(format!("DECISION_POLICY, {e}")))?,
            None => DecisionPolicy::default(),
        };
        let format = match lookup("LOG_FORMAT") {
            Some(value) => value
                .parse()
                .map_err(|e| ConfigError::ParseError(format!("LOG_FORMAT, {e}")))?,
            None => LogFormat::default(),
        };

        let config = Self {
            dataset_source,
            text_column,
            model_url,
            hf_token,
            decision_policy,
            logging: LoggingConfig { format },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dataset_source.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "DATASET_SOURCE cannot be empty".to_string(),
            ));
        }

        if self.text_column.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "DATASET_TEXT_COLUMN cannot be empty".to_string(),
            ));
        }

        if !(self.model_url.starts_with("http://") || self.model_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(format!(
                "MODEL_URL must be an http(s) URL, got '{}'",
                self.model_url
            )));
        }

        Ok(())
    }
}

impl fmt::Debug for AnalyzerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerConfig")
            .field("dataset_source", &self.dataset_source)
            .field("text_column", &self.text_column)
            .field("model_url", &self.model_url)
            .field("hf_token", &self.hf_token.as_ref().map(|_| "<redacted>"))
            .field("decision_policy", &self.decision_policy)
            .field("logging", &self.logging)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse environment variable: {0}")]
    ParseError(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AnalyzerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AnalyzerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.dataset_source, "reviews_test.tsv");
        assert_eq!(config.text_column, "text");
        assert_eq!(config.model_url, DEFAULT_MODEL_URL);
        assert_eq!(config.hf_token, None);
        assert_eq!(config.decision_policy, DecisionPolicy::Threshold);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATASET_SOURCE", "https://example.com/reviews.tsv"),
            ("DATASET_TEXT_COLUMN", "review"),
            ("MODEL_URL", "http://localhost:8080/classify"),
            ("HF_TOKEN", "  hf_abc  "),
            ("DECISION_POLICY", "label"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(config.dataset_source, "https://example.com/reviews.tsv");
        assert_eq!(config.text_column, "review");
        assert_eq!(config.model_url, "http://localhost:8080/classify");
        assert_eq!(config.hf_token.as_deref(), Some("hf_abc"));
        assert_eq!(config.decision_policy, DecisionPolicy::LabelOnly);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_blank_token_is_unset() {
        let config = config_from(&[("HF_TOKEN", "   ")]).unwrap();
        assert_eq!(config.hf_token, None);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("DECISION_POLICY", "vote")]),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            config_from(&[("LOG_FORMAT", "xml")]),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            config_from(&[("DATASET_TEXT_COLUMN", " ")]),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            config_from(&[("MODEL_URL", "ftp://models")]),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = config_from(&[("HF_TOKEN", "hf_secret")]).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("hf_secret"));
    }
}
