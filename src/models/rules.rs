use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use super::data::{DocumentType, VisaType};

/// One checklist entry an application has to satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredDocumentSpec {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub name: String,
    pub description: String,
    pub required: bool,
}

impl RequiredDocumentSpec {
    fn new(doc_type: DocumentType, name: &str, description: &str, required: bool) -> Self {
        RequiredDocumentSpec {
            doc_type,
            name: name.to_string(),
            description: description.to_string(),
            required,
        }
    }
}

lazy_static! {
    static ref UAE_REQUIRED_DOCUMENTS: Vec<RequiredDocumentSpec> = vec![
        RequiredDocumentSpec::new(
            DocumentType::Passport,
            "Passport Scan",
            "Clear scan of passport bio page. Must be valid for at least 6 months after planned return date.",
            true,
        ),
        RequiredDocumentSpec::new(
            DocumentType::Photo,
            "Passport Photo",
            "Recent passport-sized photograph with white background (3.5 x 4.5 cm).",
            true,
        ),
        RequiredDocumentSpec::new(
            DocumentType::Selfie,
            "Selfie Photo",
            "Selfie taken with a webcam, sized to 45mm x 45mm.",
            true,
        ),
        RequiredDocumentSpec::new(
            DocumentType::TaxIdCard,
            "Tax ID Card",
            "Clear scan of the national tax-ID (PAN) card.",
            true,
        ),
        RequiredDocumentSpec::new(
            DocumentType::FlightTicket,
            "Flight Tickets",
            "Confirmed return flight tickets to and from the destination.",
            true,
        ),
        RequiredDocumentSpec::new(
            DocumentType::HotelBooking,
            "Hotel Booking",
            "Confirmed hotel reservations for the entire duration of stay.",
            true,
        ),
        RequiredDocumentSpec::new(
            DocumentType::BankStatement,
            "Bank Statement",
            "Last 3 months bank statements showing sufficient funds for travel.",
            true,
        ),
    ];
}

/// Static checklist lookup, loaded once per process.
pub struct RequiredDocumentCatalog;

impl RequiredDocumentCatalog {
    pub fn for_visa_type(visa_type: VisaType) -> &'static [RequiredDocumentSpec] {
        match visa_type {
            VisaType::Uae => UAE_REQUIRED_DOCUMENTS.as_slice(),
        }
    }
}
