use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::models::{
    ApplicationExtractedData, ApplicationId, Document, DocumentId, DocumentStatus, ParsedFields,
    VisaApplication,
};

/// Storage abstraction for applications and their documents.
pub trait RecordStore: Send + Sync {
    fn insert_application(&self, application: VisaApplication) -> Result<(), StoreError>;
    fn insert_document(&self, document: Document) -> Result<(), StoreError>;
    fn get_application(&self, id: &ApplicationId)
        -> Result<Option<VisaApplication>, StoreError>;
    fn find_application_by_token(&self, token: &str)
        -> Result<Option<VisaApplication>, StoreError>;
    fn update_application(&self, application: VisaApplication) -> Result<(), StoreError>;
    fn get_document(&self, id: &DocumentId) -> Result<Option<Document>, StoreError>;
    /// Documents of one application in creation order.
    fn documents_for_application(&self, id: &ApplicationId) -> Result<Vec<Document>, StoreError>;
    /// Sets the status and extracted fields together. Moving to `Received` stamps the
    /// upload time.
    fn set_document_status(
        &self,
        id: &DocumentId,
        status: DocumentStatus,
        extracted_fields: Option<ParsedFields>,
    ) -> Result<Document, StoreError>;
    fn set_application_extracted_data(
        &self,
        id: &ApplicationId,
        data: ApplicationExtractedData,
    ) -> Result<VisaApplication, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Default)]
struct Records {
    applications: HashMap<ApplicationId, VisaApplication>,
    documents: HashMap<DocumentId, Document>,
    document_order: Vec<DocumentId>,
}

/// Process-local store backing the CLI and the test suites.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: Mutex<Records>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Records>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("record store mutex poisoned".to_string()))
    }
}

impl RecordStore for InMemoryRecordStore {
    fn insert_application(&self, application: VisaApplication) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        if guard.applications.contains_key(&application.id) {
            return Err(StoreError::Conflict);
        }
        guard.applications.insert(application.id.clone(), application);
        Ok(())
    }

    fn insert_document(&self, document: Document) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        if guard.documents.contains_key(&document.id) {
            return Err(StoreError::Conflict);
        }
        if !guard.applications.contains_key(&document.application_id) {
            return Err(StoreError::NotFound);
        }
        guard.document_order.push(document.id.clone());
        guard.documents.insert(document.id.clone(), document);
        Ok(())
    }

    fn get_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<VisaApplication>, StoreError> {
        Ok(self.lock()?.applications.get(id).cloned())
    }

    fn find_application_by_token(
        &self,
        token: &str,
    ) -> Result<Option<VisaApplication>, StoreError> {
        Ok(self
            .lock()?
            .applications
            .values()
            .find(|application| application.share_token == token)
            .cloned())
    }

    fn update_application(&self, application: VisaApplication) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        match guard.applications.get_mut(&application.id) {
            Some(slot) => {
                *slot = VisaApplication {
                    updated_at: Utc::now(),
                    ..application
                };
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn get_document(&self, id: &DocumentId) -> Result<Option<Document>, StoreError> {
        Ok(self.lock()?.documents.get(id).cloned())
    }

    fn documents_for_application(&self, id: &ApplicationId) -> Result<Vec<Document>, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .document_order
            .iter()
            .filter_map(|doc_id| guard.documents.get(doc_id))
            .filter(|document| &document.application_id == id)
            .cloned()
            .collect())
    }

    fn set_document_status(
        &self,
        id: &DocumentId,
        status: DocumentStatus,
        extracted_fields: Option<ParsedFields>,
    ) -> Result<Document, StoreError> {
        let mut guard = self.lock()?;
        let document = guard.documents.get_mut(id).ok_or(StoreError::NotFound)?;
        document.status = status;
        document.extracted_fields = extracted_fields;
        if status == DocumentStatus::Received {
            document.uploaded_at = Some(Utc::now());
        }
        Ok(document.clone())
    }

    fn set_application_extracted_data(
        &self,
        id: &ApplicationId,
        data: ApplicationExtractedData,
    ) -> Result<VisaApplication, StoreError> {
        let mut guard = self.lock()?;
        let application = guard.applications.get_mut(id).ok_or(StoreError::NotFound)?;
        application.extracted_data = Some(data);
        application.updated_at = Utc::now();
        Ok(application.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApplicationStatus, DocumentType, TaxIdFields, VisaType};
    use chrono::TimeZone;

    fn application(id: &str, token: &str) -> VisaApplication {
        let now = Utc::now();
        VisaApplication {
            id: ApplicationId(id.to_string()),
            customer_name: "Priya Sharma".to_string(),
            visa_type: VisaType::Uae,
            start_date: Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2025, 3, 20, 0, 0, 0).unwrap(),
            status: ApplicationStatus::Pending,
            share_token: token.to_string(),
            traveler_email: None,
            traveler_phone: None,
            created_at: now,
            updated_at: now,
            extracted_data: None,
        }
    }

    fn document(id: &str, application_id: &str, doc_type: DocumentType) -> Document {
        Document {
            id: DocumentId(id.to_string()),
            application_id: ApplicationId(application_id.to_string()),
            doc_type,
            name: doc_type.label().to_string(),
            status: DocumentStatus::Pending,
            uploaded_at: None,
            extracted_fields: None,
        }
    }

    #[test]
    fn rejects_duplicate_application() {
        let store = InMemoryRecordStore::new();
        store
            .insert_application(application("app-1", "tok-1"))
            .expect("first insert");
        assert!(matches!(
            store.insert_application(application("app-1", "tok-2")),
            Err(StoreError::Conflict)
        ));
    }

    #[test]
    fn documents_keep_creation_order_and_require_application() {
        let store = InMemoryRecordStore::new();
        store
            .insert_application(application("app-1", "tok-1"))
            .expect("insert");
        for (id, doc_type) in [
            ("doc-b", DocumentType::Passport),
            ("doc-a", DocumentType::Photo),
        ] {
            store
                .insert_document(document(id, "app-1", doc_type))
                .expect("insert document");
        }
        assert!(matches!(
            store.insert_document(document("doc-c", "app-missing", DocumentType::Selfie)),
            Err(StoreError::NotFound)
        ));

        let ids: Vec<_> = store
            .documents_for_application(&ApplicationId("app-1".to_string()))
            .expect("list")
            .into_iter()
            .map(|document| document.id.0)
            .collect();
        assert_eq!(ids, vec!["doc-b", "doc-a"]);
    }

    #[test]
    fn receiving_a_document_stamps_upload_time() {
        let store = InMemoryRecordStore::new();
        store
            .insert_application(application("app-1", "tok-1"))
            .expect("insert");
        store
            .insert_document(document("doc-1", "app-1", DocumentType::TaxIdCard))
            .expect("insert document");

        let fields = ParsedFields::TaxId(TaxIdFields {
            tax_id: Some("ABCDE1234F".to_string()),
            ..TaxIdFields::default()
        });
        let updated = store
            .set_document_status(
                &DocumentId("doc-1".to_string()),
                DocumentStatus::Received,
                Some(fields.clone()),
            )
            .expect("update");

        assert!(updated.is_received());
        assert!(updated.uploaded_at.is_some());
        assert_eq!(updated.extracted_fields, Some(fields));

        let reset = store
            .set_document_status(&DocumentId("doc-1".to_string()), DocumentStatus::Pending, None)
            .expect("reset");
        assert_eq!(reset.extracted_fields, None);
    }

    #[test]
    fn finds_application_by_share_token() {
        let store = InMemoryRecordStore::new();
        store
            .insert_application(application("app-1", "tok-1"))
            .expect("insert");

        let found = store.find_application_by_token("tok-1").expect("lookup");
        assert_eq!(found.map(|application| application.id.0), Some("app-1".to_string()));
        assert!(store.find_application_by_token("nope").expect("lookup").is_none());
        assert!(matches!(
            store.set_application_extracted_data(
                &ApplicationId("missing".to_string()),
                ApplicationExtractedData::default()
            ),
            Err(StoreError::NotFound)
        ));
    }
}
