//! Command-line arguments for the document console.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use document_console::controllers::ViewMode;
use document_console::models::{FindingStatus, MeetingStatus, Severity};
use document_console::store::{SortDirection, SortKey};
use document_console::viewer::Tab;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "document-console",
    version,
    about = "Browse and act on documents held by the document API"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding base.yaml (default: ./document-console/config).
    #[arg(long = "config-dir", value_name = "DIR", global = true)]
    pub config_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List documents with search, filters, sort and paging.
    List(ListArgs),

    /// Load one document and print a viewer panel.
    Open(OpenArgs),

    /// Run a batch operation over the given document ids.
    Batch(BatchArgs),

    /// List audit findings.
    Findings(FindingsArgs),

    /// Record a new audit finding.
    FindingCreate(FindingCreateArgs),

    /// Move a finding to another status.
    FindingStatus(FindingStatusArgs),

    /// Show the comment thread of a finding.
    Comments(CommentsArgs),

    /// Add a comment to a finding.
    Comment(CommentArgs),

    /// List audit meetings.
    Meetings(MeetingsArgs),

    /// Schedule an audit meeting.
    MeetingSchedule(MeetingScheduleArgs),

    /// Show the findings dashboard counters.
    Stats,
}

#[derive(Args)]
pub struct ListArgs {
    /// Case-insensitive text matched against name and content.
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Status filter (Processed, Analyzing, Error); unknown values are ignored.
    #[arg(long)]
    pub status: Option<String>,

    /// Exact document type filter.
    #[arg(long = "type", value_name = "TYPE")]
    pub doc_type: Option<String>,

    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,

    #[arg(long, value_enum, default_value = "asc")]
    pub direction: DirectionArg,

    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Overrides list.items_per_page.
    #[arg(long = "page-size")]
    pub page_size: Option<usize>,

    /// Overrides list.default_view_mode.
    #[arg(long = "view", value_enum)]
    pub view_mode: Option<ViewModeArg>,
}

#[derive(Args)]
pub struct OpenArgs {
    pub document_id: String,

    #[arg(long, value_enum, default_value = "preview")]
    pub tab: TabArg,
}

#[derive(Args)]
pub struct BatchArgs {
    /// Operation name understood by the API (e.g., archive, reprocess).
    pub operation: String,

    #[arg(required = true, num_args = 1..)]
    pub document_ids: Vec<String>,
}

#[derive(Args)]
pub struct FindingsArgs {
    #[arg(long, short = 's')]
    pub search: Option<String>,

    #[arg(long, value_enum)]
    pub severity: Option<SeverityArg>,

    #[arg(long, value_enum)]
    pub status: Option<FindingStatusArg>,

    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Args)]
pub struct MeetingsArgs {
    #[arg(long, value_enum)]
    pub status: Option<MeetingStatusArg>,

    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Args)]
pub struct FindingCreateArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// compliance, operational, financial, technical or governance.
    #[arg(long = "type", value_name = "TYPE", default_value = "compliance")]
    pub finding_type: String,

    #[arg(long, value_enum, default_value = "major")]
    pub severity: SeverityArg,

    #[arg(long = "assigned-to")]
    pub assigned_to: Option<String>,

    /// RFC 3339 timestamp, e.g. 2024-06-30T17:00:00Z.
    #[arg(long = "due", value_parser = parse_timestamp)]
    pub due_date: Option<DateTime<Utc>>,

    #[arg(long = "remediation-plan")]
    pub remediation_plan: Option<String>,

    #[arg(long = "audit-id", default_value_t = 1)]
    pub audit_id: u64,
}

#[derive(Args)]
pub struct FindingStatusArgs {
    pub finding_id: String,

    #[arg(value_enum)]
    pub status: FindingStatusArg,
}

#[derive(Args)]
pub struct CommentsArgs {
    pub finding_id: String,
}

#[derive(Args)]
pub struct CommentArgs {
    pub finding_id: String,

    pub text: String,

    /// general, resolution or evidence.
    #[arg(long = "type", value_name = "TYPE", default_value = "general")]
    pub comment_type: String,
}

#[derive(Args)]
pub struct MeetingScheduleArgs {
    #[arg(long)]
    pub title: String,

    /// Start time as an RFC 3339 timestamp.
    #[arg(long = "at", value_parser = parse_timestamp)]
    pub scheduled_time: DateTime<Utc>,

    #[arg(long = "duration", default_value_t = 60)]
    pub duration_minutes: u32,

    /// kickoff, progress, urgent, exit or ad_hoc.
    #[arg(long = "type", value_name = "TYPE", default_value = "progress")]
    pub meeting_type: String,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long = "participant")]
    pub participants: Vec<String>,

    #[arg(long = "agenda-item")]
    pub agenda: Vec<String>,

    #[arg(long = "audit-id", default_value_t = 1)]
    pub audit_id: u64,
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {}", e))
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortArg {
    Name,
    Type,
    Date,
    Status,
}

impl From<SortArg> for SortKey {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Name => SortKey::Name,
            SortArg::Type => SortKey::Type,
            SortArg::Date => SortKey::UploadDate,
            SortArg::Status => SortKey::Status,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DirectionArg {
    Asc,
    Desc,
}

impl From<DirectionArg> for SortDirection {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Asc => SortDirection::Ascending,
            DirectionArg::Desc => SortDirection::Descending,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ViewModeArg {
    Grid,
    List,
}

impl From<ViewModeArg> for ViewMode {
    fn from(value: ViewModeArg) -> Self {
        match value {
            ViewModeArg::Grid => ViewMode::Grid,
            ViewModeArg::List => ViewMode::List,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TabArg {
    Preview,
    Metadata,
    AiAnalysis,
    Annotations,
    Versions,
    Related,
    Workflow,
    Activity,
}

impl From<TabArg> for Tab {
    fn from(value: TabArg) -> Self {
        match value {
            TabArg::Preview => Tab::Preview,
            TabArg::Metadata => Tab::Metadata,
            TabArg::AiAnalysis => Tab::AiAnalysis,
            TabArg::Annotations => Tab::Annotations,
            TabArg::Versions => Tab::Versions,
            TabArg::Related => Tab::Related,
            TabArg::Workflow => Tab::Workflow,
            TabArg::Activity => Tab::Activity,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SeverityArg {
    Critical,
    Major,
    Minor,
    Informational,
}

impl From<SeverityArg> for Severity {
    fn from(value: SeverityArg) -> Self {
        match value {
            SeverityArg::Critical => Severity::Critical,
            SeverityArg::Major => Severity::Major,
            SeverityArg::Minor => Severity::Minor,
            SeverityArg::Informational => Severity::Informational,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FindingStatusArg {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl From<FindingStatusArg> for FindingStatus {
    fn from(value: FindingStatusArg) -> Self {
        match value {
            FindingStatusArg::Open => FindingStatus::Open,
            FindingStatusArg::InProgress => FindingStatus::InProgress,
            FindingStatusArg::Resolved => FindingStatus::Resolved,
            FindingStatusArg::Closed => FindingStatus::Closed,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MeetingStatusArg {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl From<MeetingStatusArg> for MeetingStatus {
    fn from(value: MeetingStatusArg) -> Self {
        match value {
            MeetingStatusArg::Scheduled => MeetingStatus::Scheduled,
            MeetingStatusArg::InProgress => MeetingStatus::InProgress,
            MeetingStatusArg::Completed => MeetingStatus::Completed,
            MeetingStatusArg::Cancelled => MeetingStatus::Cancelled,
        }
    }
}
