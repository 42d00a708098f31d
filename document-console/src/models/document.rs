use super::{id_from_string_or_number, null_as_default, timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// Processing state of a document as reported by the API.
///
/// Ordering follows the declaration order and is used when sorting by status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentStatus {
    Processed,
    Analyzing,
    Error,
}

impl DocumentStatus {
    pub const ALL: [DocumentStatus; 3] = [
        DocumentStatus::Processed,
        DocumentStatus::Analyzing,
        DocumentStatus::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Processed => "Processed",
            DocumentStatus::Analyzing => "Analyzing",
            DocumentStatus::Error => "Error",
        }
    }

    /// Case-insensitive parse; unknown values yield `None`.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(raw))
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lightweight record describing a document for list display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentSummary {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(rename = "uploadDate", alias = "upload_date", deserialize_with = "timestamp")]
    pub upload_date: DateTime<Utc>,
    pub status: DocumentStatus,
    /// Searchable text extract.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

/// The collection endpoint answers with either a bare array or a paged envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DocumentCollectionResponse {
    Bare(Vec<DocumentSummary>),
    Paged { documents: Vec<DocumentSummary> },
}

impl DocumentCollectionResponse {
    pub fn into_documents(self) -> Vec<DocumentSummary> {
        match self {
            DocumentCollectionResponse::Bare(documents) => documents,
            DocumentCollectionResponse::Paged { documents } => documents,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Annotation {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub text: String,
    pub user: String,
    #[serde(deserialize_with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentVersion {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub version_number: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(deserialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelatedDocument {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub status: Option<DocumentStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityEntry {
    pub action: String,
    pub user: String,
    #[serde(deserialize_with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Complete,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkflowStep {
    pub name: String,
    pub status: StepStatus,
}

impl WorkflowStep {
    fn new(name: &str, status: StepStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }

    /// Review workflow shown when the API does not report one.
    pub fn standard_stages() -> Vec<WorkflowStep> {
        vec![
            WorkflowStep::new("Upload", StepStatus::Complete),
            WorkflowStep::new("Review", StepStatus::Current),
            WorkflowStep::new("Approve", StepStatus::Upcoming),
            WorkflowStep::new("Finalize", StepStatus::Upcoming),
        ]
    }
}

fn standard_workflow() -> Vec<WorkflowStep> {
    WorkflowStep::standard_stages()
}

/// Full aggregate of a single document and its sub-resources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentDetail {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_type: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    /// Text extract shown in the preview panel, when the API provides one.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// Opaque analysis payload; its shape varies per document.
    #[serde(rename = "aiAnalysis", alias = "ai_analysis", default)]
    pub ai_analysis: serde_json::Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub annotations: Vec<Annotation>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub versions: Vec<DocumentVersion>,
    #[serde(
        rename = "relatedDocuments",
        alias = "related_documents",
        default,
        deserialize_with = "null_as_default"
    )]
    pub related_documents: Vec<RelatedDocument>,
    #[serde(
        rename = "activityLog",
        alias = "activity_log",
        default,
        deserialize_with = "null_as_default"
    )]
    pub activity_log: Vec<ActivityEntry>,
    #[serde(default = "standard_workflow", deserialize_with = "null_as_default")]
    pub workflow: Vec<WorkflowStep>,
}

impl DocumentDetail {
    /// Put versions in order and fill a missing workflow.
    pub fn normalize(mut self) -> Self {
        self.versions.sort_by_key(|version| version.version_number);
        if self.workflow.is_empty() {
            self.workflow = WorkflowStep::standard_stages();
        }
        self
    }
}

/// Raw document bytes from the content endpoint.
#[derive(Debug, Clone)]
pub struct DocumentContent {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Metadata fields to merge into a document's metadata.
pub type MetadataUpdate = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewAnnotation {
    #[validate(length(min = 1, message = "Annotation text cannot be empty"))]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct BatchRequest {
    #[validate(length(min = 1, message = "Operation name cannot be empty"))]
    pub operation: String,
    #[validate(length(min = 1, message = "Select at least one document"))]
    pub document_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchOutcome {
    /// A 2xx answer without an explicit flag counts as success.
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_accepts_numeric_id_and_naive_date() {
        let summary: DocumentSummary = serde_json::from_value(json!({
            "id": 42,
            "name": "Invoice Q1",
            "type": "application/pdf",
            "uploadDate": "2024-01-15T08:00:00",
            "status": "Processed",
            "content": "payment due"
        }))
        .unwrap();

        assert_eq!(summary.id, "42");
        assert_eq!(summary.doc_type, "application/pdf");
        assert_eq!(summary.status, DocumentStatus::Processed);
    }

    #[test]
    fn test_summary_missing_content_is_empty() {
        let summary: DocumentSummary = serde_json::from_value(json!({
            "id": "a",
            "name": "Report",
            "type": "pdf",
            "uploadDate": "2024-01-15T08:00:00Z",
            "status": "Analyzing",
            "content": null
        }))
        .unwrap();
        assert_eq!(summary.content, "");
    }

    #[test]
    fn test_collection_response_shapes() {
        let doc = json!({
            "id": "1", "name": "A", "type": "pdf",
            "uploadDate": "2024-01-15T08:00:00Z", "status": "Error"
        });

        let bare: DocumentCollectionResponse = serde_json::from_value(json!([doc.clone()])).unwrap();
        assert_eq!(bare.into_documents().len(), 1);

        let paged: DocumentCollectionResponse = serde_json::from_value(json!({
            "documents": [doc], "total": 1, "page": 1, "limit": 20, "total_pages": 1
        }))
        .unwrap();
        assert_eq!(paged.into_documents().len(), 1);
    }

    #[test]
    fn test_detail_minimal_payload_defaults() {
        let detail: DocumentDetail = serde_json::from_value(json!({
            "id": 7,
            "title": "Audit plan",
            "name": "Audit plan",
            "metadata": null
        }))
        .unwrap();

        assert_eq!(detail.id, "7");
        assert!(detail.metadata.is_empty());
        assert!(detail.ai_analysis.is_null());
        assert!(detail.annotations.is_empty());
        assert_eq!(detail.workflow, WorkflowStep::standard_stages());
    }

    #[test]
    fn test_detail_null_collections_default() {
        let detail = serde_json::from_value::<DocumentDetail>(json!({
            "id": 1,
            "title": "t",
            "metadata": null,
            "annotations": null,
            "versions": null,
            "relatedDocuments": null,
            "activityLog": null,
            "workflow": null
        }))
        .unwrap()
        .normalize();

        assert!(detail.annotations.is_empty());
        assert!(detail.versions.is_empty());
        assert!(detail.related_documents.is_empty());
        assert!(detail.activity_log.is_empty());
        assert_eq!(detail.workflow, WorkflowStep::standard_stages());
    }

    #[test]
    fn test_normalize_orders_versions() {
        let detail = serde_json::from_value::<DocumentDetail>(json!({
            "id": "d",
            "title": "Policy",
            "versions": [
                {"id": 3, "version_number": 3, "content": "c", "created_at": "2024-03-01T00:00:00Z"},
                {"id": 1, "version_number": 1, "content": "a", "created_at": "2024-01-01T00:00:00Z"},
                {"id": 2, "version_number": 2, "content": "b", "created_at": "2024-02-01T00:00:00Z"}
            ],
            "workflow": []
        }))
        .unwrap()
        .normalize();

        let numbers: Vec<u32> = detail.versions.iter().map(|v| v.version_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(detail.workflow.len(), 4);
    }

    #[test]
    fn test_status_parse_lenient() {
        assert_eq!(DocumentStatus::parse_lenient("analyzing"), Some(DocumentStatus::Analyzing));
        assert_eq!(DocumentStatus::parse_lenient(" ERROR "), Some(DocumentStatus::Error));
        assert_eq!(DocumentStatus::parse_lenient("archived"), None);
    }

    #[test]
    fn test_batch_request_validation() {
        let request = BatchRequest {
            operation: "archive".to_string(),
            document_ids: vec![],
        };
        assert!(request.validate().is_err());

        let request = BatchRequest {
            operation: "archive".to_string(),
            document_ids: vec!["1".to_string()],
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_batch_outcome_defaults_to_success() {
        let outcome: BatchOutcome = serde_json::from_value(json!({"message": "done"})).unwrap();
        assert!(outcome.success);
    }
}
