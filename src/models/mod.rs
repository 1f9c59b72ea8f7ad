pub mod data;
pub mod fields;
pub mod rules;

pub use data::{
    ApplicationId, ApplicationStatus, Document, DocumentId, DocumentStatus, DocumentType,
    VisaApplication, VisaType,
};
pub use fields::{
    ApplicationExtractedData, ExtractedFields, FieldName, FieldSource, FlightTicketFields,
    ParsedFields, PassportFields, TaxIdFields,
};
pub use rules::{RequiredDocumentCatalog, RequiredDocumentSpec};
