pub mod extractors;
pub mod field_merge;
pub mod flight;
pub mod image;
pub mod ocr;
pub mod passport;
pub mod tax_id;

pub use field_merge::FieldMerge;
pub use flight::FlightTicketParser;
pub use image::ImageProcessor;
pub use ocr::{PlainTextExtractor, TextExtractor};
pub use passport::PassportParser;
pub use tax_id::TaxIdParser;

#[cfg(feature = "tesseract")]
pub use ocr::TesseractExtractor;
