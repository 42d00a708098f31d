//! Remote API collaborators.
//!
//! The console never persists anything itself; everything goes through these
//! traits so controllers can run against the HTTP client or a test double.

pub mod api_client;
pub mod credentials;
#[cfg(test)]
pub mod mock;

use crate::models::{
    BatchOutcome, BatchRequest, DashboardStats, DocumentContent, DocumentDetail, DocumentSummary,
    Finding, FindingComment, FindingQuery, FindingStatus, Meeting, MeetingQuery, MetadataUpdate,
    NewAnnotation, NewComment, NewFinding, NewMeeting, WriteReceipt,
};
use async_trait::async_trait;
use console_core::error::ApiError;

pub use api_client::ApiClient;
pub use credentials::{CredentialProvider, SessionCredentials, StaticCredentials};

/// Document endpoints consumed by the list and the viewer.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// Fetch the full document collection for the current session.
    async fn list_documents(&self) -> Result<Vec<DocumentSummary>, ApiError>;

    /// Fetch one document aggregate.
    async fn get_document(&self, document_id: &str) -> Result<DocumentDetail, ApiError>;

    /// Download the stored file.
    async fn get_document_content(&self, document_id: &str) -> Result<DocumentContent, ApiError>;

    async fn update_metadata(
        &self,
        document_id: &str,
        update: &MetadataUpdate,
    ) -> Result<(), ApiError>;

    async fn add_annotation(
        &self,
        document_id: &str,
        annotation: &NewAnnotation,
    ) -> Result<(), ApiError>;

    async fn batch_operation(&self, request: &BatchRequest) -> Result<BatchOutcome, ApiError>;

    async fn delete_document(&self, document_id: &str) -> Result<(), ApiError>;
}

/// Audit findings and meetings endpoints.
#[async_trait]
pub trait FindingsApi: Send + Sync {
    async fn list_findings(&self, query: &FindingQuery) -> Result<Vec<Finding>, ApiError>;

    async fn create_finding(&self, finding: &NewFinding) -> Result<WriteReceipt, ApiError>;

    async fn update_finding_status(
        &self,
        finding_id: &str,
        status: FindingStatus,
    ) -> Result<WriteReceipt, ApiError>;

    async fn findings_stats(&self) -> Result<DashboardStats, ApiError>;

    async fn list_meetings(&self, query: &MeetingQuery) -> Result<Vec<Meeting>, ApiError>;

    async fn schedule_meeting(&self, meeting: &NewMeeting) -> Result<WriteReceipt, ApiError>;

    /// Comments on one finding, oldest first as the API returns them.
    async fn list_finding_comments(&self, finding_id: &str)
        -> Result<Vec<FindingComment>, ApiError>;

    async fn add_finding_comment(
        &self,
        finding_id: &str,
        comment: &NewComment,
    ) -> Result<(), ApiError>;
}
