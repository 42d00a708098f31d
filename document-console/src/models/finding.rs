use super::{id_from_string_or_number, null_as_default, optional_id_from_string_or_number, optional_timestamp, timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Major,
    Minor,
    Informational,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FindingStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finding {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    /// Human-facing reference such as `FND-2024-001`.
    pub finding_id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub finding_type: String,
    pub severity: Severity,
    pub status: FindingStatus,
    #[serde(default)]
    pub ai_detected: bool,
    #[serde(default)]
    pub ai_confidence_score: Option<f64>,
    #[serde(default, deserialize_with = "optional_id_from_string_or_number")]
    pub document_id: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_by: String,
    #[serde(deserialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub comments_count: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MeetingStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meeting {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub meeting_id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meeting_type: String,
    #[serde(deserialize_with = "timestamp")]
    pub scheduled_time: DateTime<Utc>,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub location: Option<String>,
    pub status: MeetingStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub organizer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub participants: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub agenda: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_findings: u64,
    #[serde(default)]
    pub open_findings: u64,
    #[serde(default)]
    pub critical_findings: u64,
    #[serde(default)]
    pub ai_detected_findings: u64,
    #[serde(default)]
    pub upcoming_meetings: u64,
}

/// Query string for the findings list; unset fields are omitted.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct FindingQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FindingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct MeetingQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MeetingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FindingListResponse {
    Bare(Vec<Finding>),
    Wrapped { findings: Vec<Finding> },
}

impl FindingListResponse {
    pub fn into_findings(self) -> Vec<Finding> {
        match self {
            FindingListResponse::Bare(findings) => findings,
            FindingListResponse::Wrapped { findings } => findings,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MeetingListResponse {
    Bare(Vec<Meeting>),
    Wrapped { meetings: Vec<Meeting> },
}

impl MeetingListResponse {
    pub fn into_meetings(self) -> Vec<Meeting> {
        match self {
            MeetingListResponse::Bare(meetings) => meetings,
            MeetingListResponse::Wrapped { meetings } => meetings,
        }
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewComment {
    #[validate(length(min = 1, message = "Comment cannot be empty"))]
    pub comment: String,
    pub comment_type: String,
}

impl NewComment {
    pub fn general(comment: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
            comment_type: "general".to_string(),
        }
    }
}

/// Body for `POST /api/findings`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewFinding {
    pub audit_id: u64,
    #[validate(length(min = 1, message = "Finding title cannot be empty"))]
    pub title: String,
    pub description: String,
    pub finding_type: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation_plan: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct FindingStatusUpdate {
    pub status: FindingStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FindingComment {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub comment: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_by: String,
    #[serde(deserialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FindingCommentListResponse {
    Bare(Vec<FindingComment>),
    Wrapped {
        #[serde(default, deserialize_with = "null_as_default")]
        comments: Vec<FindingComment>,
    },
}

impl FindingCommentListResponse {
    pub fn into_comments(self) -> Vec<FindingComment> {
        match self {
            FindingCommentListResponse::Bare(comments) => comments,
            FindingCommentListResponse::Wrapped { comments } => comments,
        }
    }
}

/// Body for `POST /api/findings/meetings`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewMeeting {
    pub audit_id: u64,
    #[validate(length(min = 1, message = "Meeting title cannot be empty"))]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub meeting_type: String,
    pub scheduled_time: DateTime<Utc>,
    #[validate(range(min = 1, message = "Meeting must last at least one minute"))]
    pub duration_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub participants: Vec<String>,
    pub agenda: Vec<String>,
}

/// What the API echoes back after a create or update.
///
/// The body shape is not fixed, so every field is optional and an empty or
/// non-JSON body yields the default.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct WriteReceipt {
    #[serde(default, deserialize_with = "optional_id_from_string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "optional_id_from_string_or_number")]
    pub finding_id: Option<String>,
    #[serde(default, deserialize_with = "optional_id_from_string_or_number")]
    pub meeting_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl WriteReceipt {
    /// Most specific identifier the API returned.
    pub fn reference(&self) -> Option<&str> {
        self.finding_id
            .as_deref()
            .or(self.meeting_id.as_deref())
            .or(self.id.as_deref())
    }
}
