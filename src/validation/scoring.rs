use serde::{Deserialize, Serialize};

use super::dates::{DateCheck, DateConsistencyChecker};
use crate::models::{
    Document, DocumentType, FieldName, ParsedFields, RequiredDocumentSpec, VisaApplication,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalTier {
    Low,
    Moderate,
    High,
}

impl ApprovalTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=39 => ApprovalTier::Low,
            40..=79 => ApprovalTier::Moderate,
            _ => ApprovalTier::High,
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            ApprovalTier::Low => "Several required documents are missing.",
            ApprovalTier::Moderate => "More documents needed for higher chances.",
            ApprovalTier::High => "Your documentation is nearly complete.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalScore {
    pub score: u8,
    pub tier: ApprovalTier,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_check: Option<DateCheck>,
}

impl ApprovalScore {
    fn new(score: u8, date_check: Option<DateCheck>) -> Self {
        let tier = ApprovalTier::from_score(score);
        ApprovalScore {
            score,
            tier,
            message: tier.message().to_string(),
            date_check,
        }
    }
}

/// Estimates approval chances from checklist completeness and flight date consistency.
pub struct ApprovalScorer;

impl ApprovalScorer {
    pub fn score(
        documents: &[Document],
        checklist: &[RequiredDocumentSpec],
        application: Option<&VisaApplication>,
    ) -> ApprovalScore {
        let Some(application) = application else {
            return ApprovalScore::new(0, None);
        };

        // Step 1: Count required checklist entries that have been received
        let received = |doc_type: DocumentType| {
            documents
                .iter()
                .any(|document| document.doc_type == doc_type && document.is_received())
        };

        let required: Vec<&RequiredDocumentSpec> =
            checklist.iter().filter(|spec| spec.required).collect();
        let mut total = required.len() as u32;
        let mut earned = required
            .iter()
            .filter(|spec| received(spec.doc_type))
            .count() as u32;

        // Step 2: A received flight ticket adds a date-consistency point
        let flight_ticket = documents.iter().find(|document| {
            document.doc_type == DocumentType::FlightTicket && document.is_received()
        });

        let date_check = flight_ticket.map(|ticket| {
            let (departure, return_date) = Self::flight_dates(ticket, application);
            let check = DateConsistencyChecker::check(
                departure,
                return_date,
                application.start_date,
                application.end_date,
            );
            total += 1;
            if check.matches {
                earned += 1;
            }
            check
        });

        // Step 3: Round to a whole percentage
        let score = if total == 0 {
            0
        } else {
            ((100.0 * earned as f64) / total as f64).round().min(100.0) as u8
        };

        ApprovalScore::new(score, date_check)
    }

    /// Ticket's own dates first, then whatever the merged application record holds.
    fn flight_dates<'a>(
        ticket: &'a Document,
        application: &'a VisaApplication,
    ) -> (Option<&'a str>, Option<&'a str>) {
        let (mut departure, mut return_date) = match &ticket.extracted_fields {
            Some(ParsedFields::FlightTicket(fields)) => (
                fields.departure_date.as_deref().filter(|v| !v.trim().is_empty()),
                fields.return_date.as_deref().filter(|v| !v.trim().is_empty()),
            ),
            _ => (None, None),
        };

        if let Some(data) = &application.extracted_data {
            departure = departure.or_else(|| data.fields.get(FieldName::DepartureDate));
            return_date = return_date.or_else(|| data.fields.get(FieldName::ReturnDate));
        }

        (departure, return_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ApplicationExtractedData, ApplicationId, ApplicationStatus, DocumentId, DocumentStatus,
        FlightTicketFields, RequiredDocumentCatalog, VisaType,
    };
    use chrono::{TimeZone, Utc};

    fn application() -> VisaApplication {
        let created = Utc.with_ymd_and_hms(2025, 1, 5, 9, 0, 0).unwrap();
        VisaApplication {
            id: ApplicationId("app-1".to_string()),
            customer_name: "Priya Sharma".to_string(),
            visa_type: VisaType::Uae,
            start_date: Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2025, 3, 20, 0, 0, 0).unwrap(),
            status: ApplicationStatus::DocumentsRequested,
            share_token: "tok".to_string(),
            traveler_email: None,
            traveler_phone: None,
            created_at: created,
            updated_at: created,
            extracted_data: None,
        }
    }

    fn documents(received: usize) -> Vec<Document> {
        RequiredDocumentCatalog::for_visa_type(VisaType::Uae)
            .iter()
            .enumerate()
            .map(|(index, spec)| Document {
                id: DocumentId(format!("doc-{}", index)),
                application_id: ApplicationId("app-1".to_string()),
                doc_type: spec.doc_type,
                name: spec.name.clone(),
                status: if index < received {
                    DocumentStatus::Received
                } else {
                    DocumentStatus::Pending
                },
                uploaded_at: None,
                extracted_fields: None,
            })
            .collect()
    }

    fn flight_fields(departure: &str, return_date: &str) -> Option<ParsedFields> {
        Some(ParsedFields::FlightTicket(FlightTicketFields {
            departure_date: Some(departure.to_string()),
            return_date: Some(return_date.to_string()),
        }))
    }

    fn checklist() -> &'static [RequiredDocumentSpec] {
        RequiredDocumentCatalog::for_visa_type(VisaType::Uae)
    }

    #[test]
    fn no_application_scores_zero() {
        let score = ApprovalScorer::score(&documents(7), checklist(), None);
        assert_eq!(score.score, 0);
        assert_eq!(score.tier, ApprovalTier::Low);
        assert_eq!(score.message, "Several required documents are missing.");
    }

    #[test]
    fn five_of_seven_without_flight_is_moderate() {
        let mut docs = documents(7);
        for document in docs.iter_mut() {
            if matches!(
                document.doc_type,
                DocumentType::FlightTicket | DocumentType::BankStatement
            ) {
                document.status = DocumentStatus::Pending;
            }
        }

        let score = ApprovalScorer::score(&docs, checklist(), Some(&application()));
        assert_eq!(score.score, 71);
        assert_eq!(score.tier, ApprovalTier::Moderate);
        assert_eq!(score.date_check, None);
    }

    #[test]
    fn complete_checklist_with_matching_flight_is_full_marks() {
        let mut docs = documents(7);
        for document in docs.iter_mut() {
            if document.doc_type == DocumentType::FlightTicket {
                document.extracted_fields = flight_fields("11/03/2025", "2025-03-19");
            }
        }

        let score = ApprovalScorer::score(&docs, checklist(), Some(&application()));
        assert_eq!(score.score, 100);
        assert_eq!(score.tier, ApprovalTier::High);
        assert_eq!(score.message, "Your documentation is nearly complete.");
        assert!(score.date_check.expect("flight checked").matches);
    }

    #[test]
    fn mismatched_flight_costs_a_point() {
        let mut docs = documents(7);
        for document in docs.iter_mut() {
            if document.doc_type == DocumentType::FlightTicket {
                document.extracted_fields = flight_fields("2025-04-01", "2025-04-10");
            }
        }

        let score = ApprovalScorer::score(&docs, checklist(), Some(&application()));
        assert_eq!(score.score, 88);
        let check = score.date_check.expect("flight checked");
        assert!(!check.matches);
        assert!(check.message.contains("Mar 10, 2025"));
    }

    #[test]
    fn flight_dates_fall_back_to_merged_record() {
        let mut app = application();
        let mut data = ApplicationExtractedData::default();
        data.fields.set(FieldName::DepartureDate, "2025-03-10".to_string());
        data.fields.set(FieldName::ReturnDate, "2025-03-20".to_string());
        app.extracted_data = Some(data);

        let score = ApprovalScorer::score(&documents(7), checklist(), Some(&app));
        assert_eq!(score.score, 100);
    }

    #[test]
    fn empty_checklist_scores_zero() {
        let score = ApprovalScorer::score(&[], &[], Some(&application()));
        assert_eq!(score.score, 0);
        assert_eq!(score.tier, ApprovalTier::Low);
    }

    #[test]
    fn tier_serializes_by_name() {
        let score = ApprovalScore::new(71, None);
        let value = serde_json::to_value(&score).expect("serializes");
        assert_eq!(value["tier"], "Moderate");
        assert_eq!(value["message"], "More documents needed for higher chances.");
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(ApprovalTier::from_score(39), ApprovalTier::Low);
        assert_eq!(ApprovalTier::from_score(40), ApprovalTier::Moderate);
        assert_eq!(ApprovalTier::from_score(79), ApprovalTier::Moderate);
        assert_eq!(ApprovalTier::from_score(80), ApprovalTier::High);
        assert_eq!(ApprovalTier::from_score(100), ApprovalTier::High);
    }
}
