use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every logical field the intake pipeline can extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    FullName,
    PassportNumber,
    DocumentNumber,
    DateOfBirth,
    Nationality,
    DateOfIssue,
    DateOfExpiry,
    TaxId,
    DepartureDate,
    ReturnDate,
}

impl FieldName {
    /// Display order used by `ApplicationExtractedData::labelled_fields`.
    pub const ALL: [FieldName; 10] = [
        FieldName::FullName,
        FieldName::PassportNumber,
        FieldName::DocumentNumber,
        FieldName::DateOfBirth,
        FieldName::Nationality,
        FieldName::DateOfIssue,
        FieldName::DateOfExpiry,
        FieldName::TaxId,
        FieldName::DepartureDate,
        FieldName::ReturnDate,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            FieldName::FullName => "Full Name",
            FieldName::PassportNumber => "Passport Number",
            FieldName::DocumentNumber => "Document Number",
            FieldName::DateOfBirth => "Date of Birth",
            FieldName::Nationality => "Nationality",
            FieldName::DateOfIssue => "Date of Issue",
            FieldName::DateOfExpiry => "Date of Expiry",
            FieldName::TaxId => "Tax ID",
            FieldName::DepartureDate => "Departure Date",
            FieldName::ReturnDate => "Return Date",
        }
    }
}

/// Flat per-field record shared by documents and applications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_issue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_expiry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
}

impl ExtractedFields {
    /// Returns the value only when it carries non-whitespace text.
    pub fn get(&self, field: FieldName) -> Option<&str> {
        let slot = match field {
            FieldName::FullName => &self.full_name,
            FieldName::PassportNumber => &self.passport_number,
            FieldName::DocumentNumber => &self.document_number,
            FieldName::DateOfBirth => &self.date_of_birth,
            FieldName::Nationality => &self.nationality,
            FieldName::DateOfIssue => &self.date_of_issue,
            FieldName::DateOfExpiry => &self.date_of_expiry,
            FieldName::TaxId => &self.tax_id,
            FieldName::DepartureDate => &self.departure_date,
            FieldName::ReturnDate => &self.return_date,
        };
        slot.as_deref().filter(|value| !value.trim().is_empty())
    }

    pub fn set(&mut self, field: FieldName, value: String) {
        let slot = match field {
            FieldName::FullName => &mut self.full_name,
            FieldName::PassportNumber => &mut self.passport_number,
            FieldName::DocumentNumber => &mut self.document_number,
            FieldName::DateOfBirth => &mut self.date_of_birth,
            FieldName::Nationality => &mut self.nationality,
            FieldName::DateOfIssue => &mut self.date_of_issue,
            FieldName::DateOfExpiry => &mut self.date_of_expiry,
            FieldName::TaxId => &mut self.tax_id,
            FieldName::DepartureDate => &mut self.departure_date,
            FieldName::ReturnDate => &mut self.return_date,
        };
        *slot = Some(value);
    }

    pub fn is_empty(&self) -> bool {
        FieldName::ALL.iter().all(|field| self.get(*field).is_none())
    }
}

/// Fields read from a passport bio page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassportFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_issue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_expiry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_number: Option<String>,
    /// Alias of `passport_number` kept for older consumers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
}

/// Fields read from a national tax-ID card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxIdFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
}

/// Travel dates read from a flight ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightTicketFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
}

/// Partial record produced by one parser run, tagged by the document kind it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "documentType")]
pub enum ParsedFields {
    #[serde(rename = "passport")]
    Passport(PassportFields),
    #[serde(rename = "tax_id")]
    TaxId(TaxIdFields),
    #[serde(rename = "flight_ticket")]
    FlightTicket(FlightTicketFields),
}

impl ParsedFields {
    pub fn source(&self) -> FieldSource {
        match self {
            ParsedFields::Passport(_) => FieldSource::Passport,
            ParsedFields::TaxId(_) => FieldSource::TaxIdCard,
            ParsedFields::FlightTicket(_) => FieldSource::FlightTicket,
        }
    }

    /// Populated fields of the record, in the flat vocabulary.
    pub fn entries(&self) -> Vec<(FieldName, &str)> {
        let candidates: Vec<(FieldName, &Option<String>)> = match self {
            ParsedFields::Passport(fields) => vec![
                (FieldName::FullName, &fields.full_name),
                (FieldName::PassportNumber, &fields.passport_number),
                (FieldName::DocumentNumber, &fields.document_number),
                (FieldName::DateOfBirth, &fields.date_of_birth),
                (FieldName::Nationality, &fields.nationality),
                (FieldName::DateOfIssue, &fields.date_of_issue),
                (FieldName::DateOfExpiry, &fields.date_of_expiry),
            ],
            ParsedFields::TaxId(fields) => vec![
                (FieldName::FullName, &fields.full_name),
                (FieldName::TaxId, &fields.tax_id),
                (FieldName::DateOfBirth, &fields.date_of_birth),
            ],
            ParsedFields::FlightTicket(fields) => vec![
                (FieldName::DepartureDate, &fields.departure_date),
                (FieldName::ReturnDate, &fields.return_date),
            ],
        };

        candidates
            .into_iter()
            .filter_map(|(field, value)| {
                value
                    .as_deref()
                    .filter(|value| !value.trim().is_empty())
                    .map(|value| (field, value))
            })
            .collect()
    }
}

impl From<PassportFields> for ParsedFields {
    fn from(fields: PassportFields) -> Self {
        ParsedFields::Passport(fields)
    }
}

impl From<TaxIdFields> for ParsedFields {
    fn from(fields: TaxIdFields) -> Self {
        ParsedFields::TaxId(fields)
    }
}

impl From<FlightTicketFields> for ParsedFields {
    fn from(fields: FlightTicketFields) -> Self {
        ParsedFields::FlightTicket(fields)
    }
}

/// Document kinds that contribute fields, ordered from least to most authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    TaxIdCard,
    FlightTicket,
    Passport,
}

/// Application-scoped record accumulated across every received document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationExtractedData {
    #[serde(default)]
    pub fields: ExtractedFields,
    /// Which document kind last wrote each field.
    #[serde(default)]
    pub provenance: BTreeMap<FieldName, FieldSource>,
}

impl ApplicationExtractedData {
    /// Populated fields with their display labels.
    pub fn labelled_fields(&self) -> Vec<(&'static str, &str)> {
        FieldName::ALL
            .iter()
            .filter_map(|field| self.fields.get(*field).map(|value| (field.label(), value)))
            .collect()
    }

    pub fn has_data(&self) -> bool {
        !self.fields.is_empty()
    }
}
