use crate::config::ConfigError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("Document not found: {0}")]
    DocumentNotFound(String),
    #[error("Application not found: {0}")]
    ApplicationNotFound(String),
    #[error("Image processing error: {0}")]
    ImageProcessingError(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IntakeError {
    /// Extraction failures degrade to "no data"; everything else is fatal to the call.
    pub fn is_extraction_failure(&self) -> bool {
        matches!(self, IntakeError::ExtractionFailed(_))
    }
}
