use std::env;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_OCR_LANGUAGE: &str = "eng";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime settings for the intake pipeline, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeConfig {
    pub ocr_language: String,
    pub tessdata_prefix: Option<String>,
    pub extraction_timeout: Duration,
    pub log_level: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        IntakeConfig {
            ocr_language: DEFAULT_OCR_LANGUAGE.to_string(),
            tessdata_prefix: None,
            extraction_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl IntakeConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let ocr_language = env::var("VISA_INTAKE_OCR_LANG")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_OCR_LANGUAGE.to_string());

        let tessdata_prefix = env::var("TESSDATA_PREFIX")
            .ok()
            .filter(|value| !value.trim().is_empty());

        let timeout_secs = match env::var("VISA_INTAKE_OCR_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout(raw))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let log_level =
            env::var("VISA_INTAKE_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            ocr_language,
            tessdata_prefix,
            extraction_timeout: Duration::from_secs(timeout_secs),
            log_level,
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("VISA_INTAKE_OCR_TIMEOUT_SECS must be a positive number of seconds, got '{0}'")]
    InvalidTimeout(String),
}
