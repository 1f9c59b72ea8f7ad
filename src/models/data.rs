use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::fields::{ApplicationExtractedData, ParsedFields};

/// Identifier wrapper for visa applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for uploaded documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Passport,
    Photo,
    FlightTicket,
    HotelBooking,
    BankStatement,
    Selfie,
    TaxIdCard,
    Other,
}

impl DocumentType {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentType::Passport => "passport",
            DocumentType::Photo => "photo",
            DocumentType::FlightTicket => "flight_ticket",
            DocumentType::HotelBooking => "hotel_booking",
            DocumentType::BankStatement => "bank_statement",
            DocumentType::Selfie => "selfie",
            DocumentType::TaxIdCard => "tax_id_card",
            DocumentType::Other => "other",
        }
    }

    /// Document types the intake pipeline runs OCR on.
    pub const fn has_text_fields(self) -> bool {
        matches!(
            self,
            DocumentType::Passport | DocumentType::TaxIdCard | DocumentType::FlightTicket
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Received,
    Rejected,
}

/// A single checklist slot of an application and whatever was uploaded into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub application_id: ApplicationId,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub name: String,
    pub status: DocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_fields: Option<ParsedFields>,
}

impl Document {
    pub fn is_received(&self) -> bool {
        self.status == DocumentStatus::Received
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum VisaType {
    Uae,
}

/// Workflow status tracked on the application itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    DocumentsRequested,
    DocumentsReceived,
    InProcess,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::DocumentsRequested => "documents_requested",
            ApplicationStatus::DocumentsReceived => "documents_received",
            ApplicationStatus::InProcess => "in_process",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisaApplication {
    pub id: ApplicationId,
    pub customer_name: String,
    pub visa_type: VisaType,
    /// Start of the visa validity window.
    pub start_date: DateTime<Utc>,
    /// End of the visa validity window.
    pub end_date: DateTime<Utc>,
    pub status: ApplicationStatus,
    pub share_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traveler_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traveler_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_data: Option<ApplicationExtractedData>,
}

impl VisaApplication {
    /// Relative link handed to the traveler for uploads.
    pub fn share_link(&self) -> String {
        format!("/upload/{}", self.share_token)
    }
}
