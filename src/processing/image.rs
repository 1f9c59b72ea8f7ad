use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, GenericImageView, ImageOutputFormat};
use imageproc::contrast::{otsu_level, threshold};
use log::debug;
use std::io::Cursor;

use crate::utils::IntakeError;

const MIN_DIMENSION: u32 = 16;

pub struct ImageProcessor;

impl ImageProcessor {
    /// Grayscale + Otsu binarisation, re-encoded as PNG for the OCR engine.
    pub fn preprocess(image_data: &[u8]) -> Result<Vec<u8>, IntakeError> {
        if Self::is_pdf(image_data) {
            return Err(IntakeError::ExtractionFailed(
                "PDF payloads must be rasterised before OCR".to_string(),
            ));
        }

        let img = image::load_from_memory(image_data).map_err(|e| {
            IntakeError::ExtractionFailed(format!("Failed to decode image: {}", e))
        })?;

        let (width, height) = img.dimensions();
        if width < MIN_DIMENSION || height < MIN_DIMENSION {
            return Err(IntakeError::ExtractionFailed(format!(
                "Image too small for OCR: {}x{}",
                width, height
            )));
        }

        let gray = img.to_luma8();
        let level = otsu_level(&gray);
        debug!("Binarising {}x{} image at level {}", width, height, level);
        let binary = threshold(&gray, level);

        let mut buffer = Vec::new();
        DynamicImage::ImageLuma8(binary)
            .write_to(&mut Cursor::new(&mut buffer), ImageOutputFormat::Png)
            .map_err(|e| {
                IntakeError::ExtractionFailed(format!("Failed to encode image: {}", e))
            })?;

        Ok(buffer)
    }

    pub fn is_pdf(data: &[u8]) -> bool {
        data.starts_with(b"%PDF-")
    }

    /// Decodes a `data:<mime>;base64,<payload>` URL as produced by browser uploads.
    pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, IntakeError> {
        let payload = data_url
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(','))
            .filter(|(header, _)| header.ends_with(";base64"))
            .map(|(_, payload)| payload)
            .ok_or_else(|| {
                IntakeError::ImageProcessingError("Not a base64 data URL".to_string())
            })?;

        STANDARD
            .decode(payload.trim())
            .map_err(|e| IntakeError::ImageProcessingError(format!("Invalid base64 payload: {}", e)))
    }
}
