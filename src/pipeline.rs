use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use ring::rand::{SecureRandom, SystemRandom};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::config::IntakeConfig;
use crate::models::{
    ApplicationId, ApplicationStatus, Document, DocumentId, DocumentStatus, DocumentType,
    FlightTicketFields, ParsedFields, PassportFields, RequiredDocumentCatalog, TaxIdFields,
    VisaApplication, VisaType,
};
use crate::processing::{
    FieldMerge, FlightTicketParser, ImageProcessor, PassportParser, TaxIdParser, TextExtractor,
};
use crate::store::{RecordStore, StoreError};
use crate::utils::IntakeError;
use crate::validation::{ApprovalScore, ApprovalScorer};

/// Result of one upload cycle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub document: Document,
    pub score: ApprovalScore,
    /// Set when OCR failed or timed out; the document is still marked received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_error: Option<String>,
}

/// One async mutex per application, created on first use.
#[derive(Default)]
pub struct ApplicationLocks {
    locks: StdMutex<HashMap<ApplicationId, Arc<Mutex<()>>>>,
}

impl ApplicationLocks {
    pub fn handle(&self, id: &ApplicationId) -> Result<Arc<Mutex<()>>, IntakeError> {
        let mut guard = self.locks.lock().map_err(|_| {
            IntakeError::Store(StoreError::Unavailable(
                "application lock table poisoned".to_string(),
            ))
        })?;
        Ok(Arc::clone(guard.entry(id.clone()).or_default()))
    }
}

/// Drives applications from creation through upload, extraction, merge and scoring.
pub struct IntakePipeline<S> {
    store: Arc<S>,
    extractor: Arc<dyn TextExtractor>,
    config: IntakeConfig,
    locks: ApplicationLocks,
    next_id: AtomicU64,
    rng: SystemRandom,
}

impl<S: RecordStore + 'static> IntakePipeline<S> {
    pub fn new(store: Arc<S>, extractor: Arc<dyn TextExtractor>, config: IntakeConfig) -> Self {
        IntakePipeline {
            store,
            extractor,
            config,
            locks: ApplicationLocks::default(),
            next_id: AtomicU64::new(1),
            rng: SystemRandom::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn extract_passport_data(&self, image: &[u8]) -> Result<PassportFields, IntakeError> {
        let text = self.extract_text(image.to_vec()).await?;
        Ok(PassportParser::parse(&text))
    }

    pub async fn extract_tax_id_data(&self, image: &[u8]) -> Result<TaxIdFields, IntakeError> {
        let text = self.extract_text(image.to_vec()).await?;
        Ok(TaxIdParser::parse(&text))
    }

    pub async fn extract_flight_ticket_data(
        &self,
        image: &[u8],
    ) -> Result<FlightTicketFields, IntakeError> {
        let text = self.extract_text(image.to_vec()).await?;
        Ok(FlightTicketParser::parse(&text))
    }

    pub async fn create_application(
        &self,
        customer_name: &str,
        visa_type: VisaType,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<(VisaApplication, Vec<Document>), IntakeError> {
        if end_date < start_date {
            return Err(IntakeError::InvalidDate(format!(
                "visa window ends ({}) before it starts ({})",
                end_date.date_naive(),
                start_date.date_naive()
            )));
        }

        // Step 1: Store the application itself
        let now = Utc::now();
        let application = VisaApplication {
            id: ApplicationId(self.next_id("app")),
            customer_name: customer_name.trim().to_string(),
            visa_type,
            start_date,
            end_date,
            status: ApplicationStatus::Pending,
            share_token: self.share_token()?,
            traveler_email: None,
            traveler_phone: None,
            created_at: now,
            updated_at: now,
            extracted_data: None,
        };
        self.store.insert_application(application.clone())?;

        // Step 2: One pending document per checklist entry
        let mut documents = Vec::new();
        for spec in RequiredDocumentCatalog::for_visa_type(visa_type) {
            let document = Document {
                id: DocumentId(self.next_id("doc")),
                application_id: application.id.clone(),
                doc_type: spec.doc_type,
                name: spec.name.clone(),
                status: DocumentStatus::Pending,
                uploaded_at: None,
                extracted_fields: None,
            };
            self.store.insert_document(document.clone())?;
            documents.push(document);
        }

        info!(
            "Created application {} for {} with {} documents",
            application.id,
            application.customer_name,
            documents.len()
        );
        Ok((application, documents))
    }

    /// Stores the traveler's contact details against the application behind a share token.
    pub async fn record_traveler_contact(
        &self,
        token: &str,
        email: &str,
        phone: Option<&str>,
    ) -> Result<VisaApplication, IntakeError> {
        let application = self
            .store
            .find_application_by_token(token)?
            .ok_or_else(|| IntakeError::ApplicationNotFound(format!("share token {}", token)))?;

        let lock = self.locks.handle(&application.id)?;
        let _guard = lock.lock().await;

        // Re-read under the lock
        let mut application = self
            .store
            .get_application(&application.id)?
            .ok_or_else(|| IntakeError::ApplicationNotFound(application.id.to_string()))?;
        application.traveler_email = Some(email.trim().to_string());
        application.traveler_phone = phone
            .map(str::trim)
            .filter(|phone| !phone.is_empty())
            .map(str::to_string);
        if application.status == ApplicationStatus::Pending {
            application.status = ApplicationStatus::DocumentsRequested;
        }
        self.store.update_application(application.clone())?;

        Ok(application)
    }

    pub async fn upload_document_data_url(
        &self,
        document_id: &DocumentId,
        data_url: &str,
    ) -> Result<UploadOutcome, IntakeError> {
        let image = ImageProcessor::decode_data_url(data_url)?;
        self.upload_document(document_id, image).await
    }

    /// Runs one upload cycle: reset, extract, mark received, merge and re-score.
    pub async fn upload_document(
        &self,
        document_id: &DocumentId,
        image: Vec<u8>,
    ) -> Result<UploadOutcome, IntakeError> {
        let document = self
            .store
            .get_document(document_id)?
            .ok_or_else(|| IntakeError::DocumentNotFound(document_id.to_string()))?;

        // A re-upload starts over from pending
        self.store
            .set_document_status(document_id, DocumentStatus::Pending, None)?;

        // Step 1: Extract and parse outside the application lock
        let mut extraction_error = None;
        let fields = if document.doc_type.has_text_fields() {
            match self.extract_text(image).await {
                Ok(text) => Self::parse_text(document.doc_type, &text),
                Err(e) => {
                    warn!("Extraction for document {} failed: {}", document_id, e);
                    extraction_error = Some(e.to_string());
                    None
                }
            }
        } else {
            None
        };

        let lock = self.locks.handle(&document.application_id)?;
        let _guard = lock.lock().await;

        // Step 2: Mark the document received, with or without fields
        let document =
            self.store
                .set_document_status(document_id, DocumentStatus::Received, fields.clone())?;

        let mut application = self
            .store
            .get_application(&document.application_id)?
            .ok_or_else(|| IntakeError::ApplicationNotFound(document.application_id.to_string()))?;

        // Step 3: Fold the parsed fields into the application record
        if let Some(fields) = &fields {
            let current = application.extracted_data.clone().unwrap_or_default();
            let merged = FieldMerge::merge(&current, fields);
            application = self
                .store
                .set_application_extracted_data(&application.id, merged)?;
        }

        // Step 4: Advance the status once the checklist is complete
        let documents = self.store.documents_for_application(&application.id)?;
        if documents.iter().all(Document::is_received)
            && matches!(
                application.status,
                ApplicationStatus::Pending | ApplicationStatus::DocumentsRequested
            )
        {
            application.status = ApplicationStatus::DocumentsReceived;
            self.store.update_application(application.clone())?;
            info!(
                "All documents received, application {} is now {}",
                application.id,
                application.status.label()
            );
        }

        // Step 5: Re-score against the updated checklist state
        let checklist = RequiredDocumentCatalog::for_visa_type(application.visa_type);
        let score = ApprovalScorer::score(&documents, checklist, Some(&application));
        debug!(
            "Application {} scored {} after document {}",
            application.id, score.score, document_id
        );

        Ok(UploadOutcome {
            document,
            score,
            extraction_error,
        })
    }

    pub async fn approval_score(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ApprovalScore, IntakeError> {
        let application = self
            .store
            .get_application(application_id)?
            .ok_or_else(|| IntakeError::ApplicationNotFound(application_id.to_string()))?;
        let documents = self.store.documents_for_application(application_id)?;
        let checklist = RequiredDocumentCatalog::for_visa_type(application.visa_type);
        Ok(ApprovalScorer::score(&documents, checklist, Some(&application)))
    }

    fn parse_text(doc_type: DocumentType, text: &str) -> Option<ParsedFields> {
        match doc_type {
            DocumentType::Passport => Some(PassportParser::parse(text).into()),
            DocumentType::TaxIdCard => Some(TaxIdParser::parse(text).into()),
            DocumentType::FlightTicket => Some(FlightTicketParser::parse(text).into()),
            _ => None,
        }
    }

    async fn extract_text(&self, image: Vec<u8>) -> Result<String, IntakeError> {
        let extractor = Arc::clone(&self.extractor);
        let engine = extractor.engine_name().to_string();
        let task = tokio::task::spawn_blocking(move || extractor.extract_text(&image));

        // Every engine error counts as an extraction failure
        match timeout(self.config.extraction_timeout, task).await {
            Ok(Ok(Ok(text))) => Ok(text),
            Ok(Ok(Err(e))) if e.is_extraction_failure() => Err(e),
            Ok(Ok(Err(e))) => Err(IntakeError::ExtractionFailed(format!("{}: {}", engine, e))),
            Ok(Err(join_error)) => Err(IntakeError::ExtractionFailed(format!(
                "{} task failed: {}",
                engine, join_error
            ))),
            Err(_) => Err(IntakeError::ExtractionFailed(format!(
                "{} timed out after {}s",
                engine,
                self.config.extraction_timeout.as_secs_f32()
            ))),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn share_token(&self) -> Result<String, IntakeError> {
        let mut bytes = [0u8; 8];
        self.rng.fill(&mut bytes).map_err(|_| {
            IntakeError::Store(StoreError::Unavailable(
                "system random source unavailable".to_string(),
            ))
        })?;
        Ok(bytes.iter().map(|b| format!("{:02x}", b)).collect())
    }
}
