use crate::utils::IntakeError;

/// Turns an uploaded image into recognised text.
///
/// Implementations are blocking; the pipeline runs them on the blocking pool under a
/// timeout. An empty string means the engine found no text and is not an error.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, image_data: &[u8]) -> Result<String, IntakeError>;

    fn engine_name(&self) -> &str;
}

/// Treats the payload as text that was already recognised upstream.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_text(&self, image_data: &[u8]) -> Result<String, IntakeError> {
        String::from_utf8(image_data.to_vec())
            .map_err(|e| IntakeError::ExtractionFailed(format!("Payload is not UTF-8 text: {}", e)))
    }

    fn engine_name(&self) -> &str {
        "plain-text"
    }
}

#[cfg(feature = "tesseract")]
pub use self::engine::TesseractExtractor;

#[cfg(feature = "tesseract")]
mod engine {
    use std::io::Write;

    use log::debug;
    use tempfile::NamedTempFile;
    use tesseract::Tesseract;

    use super::TextExtractor;
    use crate::config::IntakeConfig;
    use crate::processing::image::ImageProcessor;
    use crate::utils::IntakeError;

    /// Tesseract-backed extractor; a fresh engine is initialised per call.
    #[derive(Debug, Clone)]
    pub struct TesseractExtractor {
        language: String,
        tessdata_prefix: Option<String>,
    }

    impl TesseractExtractor {
        pub fn new(language: impl Into<String>, tessdata_prefix: Option<String>) -> Self {
            TesseractExtractor {
                language: language.into(),
                tessdata_prefix,
            }
        }

        pub fn from_config(config: &IntakeConfig) -> Self {
            Self::new(config.ocr_language.clone(), config.tessdata_prefix.clone())
        }
    }

    impl TextExtractor for TesseractExtractor {
        fn extract_text(&self, image_data: &[u8]) -> Result<String, IntakeError> {
            let processed = ImageProcessor::preprocess(image_data)?;

            let mut temp_file = NamedTempFile::new().map_err(|e| {
                IntakeError::ExtractionFailed(format!("Failed to create temp file: {}", e))
            })?;
            temp_file.write_all(&processed).map_err(|e| {
                IntakeError::ExtractionFailed(format!("Failed to write to temp file: {}", e))
            })?;
            let image_path = temp_file.path().to_str().ok_or_else(|| {
                IntakeError::ExtractionFailed("Failed to convert path to string".to_string())
            })?;

            let text = Tesseract::new(self.tessdata_prefix.as_deref(), Some(&self.language))
                .map_err(|e| IntakeError::ExtractionFailed(format!("Tesseract init error: {}", e)))?
                .set_image(image_path)
                .map_err(|e| {
                    IntakeError::ExtractionFailed(format!("Tesseract set image error: {}", e))
                })?
                .get_text()
                .map_err(|e| IntakeError::ExtractionFailed(format!("Tesseract error: {}", e)))?;

            debug!("Tesseract recognised {} characters", text.len());
            Ok(text)
        }

        fn engine_name(&self) -> &str {
            "tesseract"
        }
    }
}
