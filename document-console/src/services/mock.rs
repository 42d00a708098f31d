//! In-memory API double for unit tests.
//!
//! Responses for individual documents can be held back with [`MockDocumentApi::hold`]
//! so tests control the order in which concurrent loads complete.

use crate::models::{
    BatchOutcome, BatchRequest, DocumentContent, DocumentDetail, DocumentSummary,
    MetadataUpdate, NewAnnotation,
};
use crate::services::DocumentApi;
use async_trait::async_trait;
use console_core::error::ApiError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Notify;

/// Recorded mutation, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    UpdateMetadata(String, MetadataUpdate),
    AddAnnotation(String, String),
    Batch(BatchRequest),
    Delete(String),
}

#[derive(Default)]
pub struct MockDocumentApi {
    documents: Mutex<Vec<DocumentSummary>>,
    details: Mutex<HashMap<String, DocumentDetail>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    fetch_counts: Mutex<HashMap<String, usize>>,
    batch_outcome: Mutex<Option<Result<BatchOutcome, String>>>,
    list_failure: Mutex<Option<String>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockDocumentApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<DocumentSummary>) -> Self {
        let api = Self::default();
        api.set_documents(documents);
        api
    }

    pub fn set_documents(&self, documents: Vec<DocumentSummary>) {
        *lock(&self.documents) = documents;
    }

    pub fn insert_detail(&self, detail: DocumentDetail) {
        lock(&self.details).insert(detail.id.clone(), detail);
    }

    /// Make `list_documents` fail with a transport error until cleared.
    pub fn fail_listing(&self, message: Option<&str>) {
        *lock(&self.list_failure) = message.map(str::to_string);
    }

    /// Answer batch operations with the given outcome, or an `Unknown` error.
    pub fn set_batch_outcome(&self, outcome: Result<BatchOutcome, String>) {
        *lock(&self.batch_outcome) = Some(outcome);
    }

    /// Hold back `get_document(id)` until the returned handle is notified.
    pub fn hold(&self, document_id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        lock(&self.gates).insert(document_id.to_string(), gate.clone());
        gate
    }

    pub fn fetch_count(&self, document_id: &str) -> usize {
        lock(&self.fetch_counts)
            .get(document_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: RecordedCall) {
        lock(&self.calls).push(call);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl DocumentApi for MockDocumentApi {
    async fn list_documents(&self) -> Result<Vec<DocumentSummary>, ApiError> {
        if let Some(message) = lock(&self.list_failure).clone() {
            return Err(ApiError::Transport(message));
        }
        Ok(lock(&self.documents).clone())
    }

    async fn get_document(&self, document_id: &str) -> Result<DocumentDetail, ApiError> {
        *lock(&self.fetch_counts)
            .entry(document_id.to_string())
            .or_insert(0) += 1;

        let gate = lock(&self.gates).get(document_id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        lock(&self.details)
            .get(document_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Document {} not found", document_id)))
    }

    async fn get_document_content(&self, document_id: &str) -> Result<DocumentContent, ApiError> {
        let details = lock(&self.details);
        let detail = details
            .get(document_id)
            .ok_or_else(|| ApiError::NotFound(format!("Document {} not found", document_id)))?;

        Ok(DocumentContent {
            content_type: "text/plain".to_string(),
            bytes: detail.content.clone().unwrap_or_default().into_bytes(),
        })
    }

    async fn update_metadata(
        &self,
        document_id: &str,
        update: &MetadataUpdate,
    ) -> Result<(), ApiError> {
        let mut details = lock(&self.details);
        let detail = details
            .get_mut(document_id)
            .ok_or_else(|| ApiError::NotFound(format!("Document {} not found", document_id)))?;
        detail
            .metadata
            .extend(update.iter().map(|(k, v)| (k.clone(), v.clone())));
        drop(details);

        self.record(RecordedCall::UpdateMetadata(
            document_id.to_string(),
            update.clone(),
        ));
        Ok(())
    }

    async fn add_annotation(
        &self,
        document_id: &str,
        annotation: &NewAnnotation,
    ) -> Result<(), ApiError> {
        if !lock(&self.details).contains_key(document_id) {
            return Err(ApiError::NotFound(format!(
                "Document {} not found",
                document_id
            )));
        }

        self.record(RecordedCall::AddAnnotation(
            document_id.to_string(),
            annotation.text.clone(),
        ));
        Ok(())
    }

    async fn batch_operation(&self, request: &BatchRequest) -> Result<BatchOutcome, ApiError> {
        self.record(RecordedCall::Batch(request.clone()));

        match lock(&self.batch_outcome).clone() {
            Some(Ok(outcome)) => Ok(outcome),
            Some(Err(message)) => Err(ApiError::Unknown(message)),
            None => Ok(BatchOutcome {
                success: true,
                message: None,
            }),
        }
    }

    async fn delete_document(&self, document_id: &str) -> Result<(), ApiError> {
        let removed = lock(&self.details).remove(document_id).is_some();
        lock(&self.documents).retain(|doc| doc.id != document_id);

        if !removed {
            return Err(ApiError::NotFound(format!(
                "Document {} not found",
                document_id
            )));
        }

        self.record(RecordedCall::Delete(document_id.to_string()));
        Ok(())
    }
}
