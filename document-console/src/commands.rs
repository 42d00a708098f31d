//! Subcommand implementations.

use crate::cli::{
    BatchArgs, CommentArgs, CommentsArgs, FindingCreateArgs, FindingStatusArgs, FindingsArgs,
    ListArgs, MeetingScheduleArgs, MeetingsArgs, OpenArgs,
};
use document_console::config::Settings;
use document_console::controllers::{DocumentListController, LoadState, ViewMode};
use document_console::models::{
    DocumentSummary, FindingComment, FindingQuery, FindingStatus, MeetingQuery, NewComment,
    NewFinding, NewMeeting, WriteReceipt,
};
use document_console::services::{ApiClient, DocumentApi, FindingsApi, SessionCredentials};
use document_console::store::{DocumentFilters, SortOrder};
use document_console::viewer::DocumentViewer;
use std::sync::Arc;

pub fn build_client(settings: &Settings) -> anyhow::Result<Arc<ApiClient>> {
    let credentials = Arc::new(SessionCredentials::from_settings(&settings.session));
    if !credentials.is_signed_in() {
        tracing::warn!("No access token configured; API calls will be rejected");
    }
    let client = ApiClient::new(&settings.api, credentials)?;
    Ok(Arc::new(client))
}

pub async fn run_list(settings: &Settings, api: Arc<dyn DocumentApi>, args: ListArgs) -> anyhow::Result<()> {
    let mut list_settings = settings.list.clone();
    if let Some(page_size) = args.page_size {
        list_settings.items_per_page = page_size;
    }

    let mut controller = DocumentListController::new(api, list_settings);
    if let Some(view_mode) = args.view_mode {
        controller.set_view_mode(view_mode.into());
    }
    controller.refresh().await?;

    let sort = args
        .sort
        .map(|key| SortOrder::new(key.into(), args.direction.into()));
    controller.apply_filter_sort(
        DocumentFilters::from_raw(args.status.as_deref(), args.doc_type.as_deref()),
        sort,
    );
    if let Some(query) = args.search.as_deref() {
        controller.search(query);
    }
    controller.set_page(args.page);

    let items = controller.current_page_items();
    for document in &items {
        println!("{}", format_summary(document, controller.view_mode()));
    }
    println!(
        "page {}/{} ({} matching, {} total)",
        controller.current_page(),
        controller.page_count(),
        controller.collection().view_len(),
        controller.collection().len()
    );
    Ok(())
}

fn format_summary(document: &DocumentSummary, view_mode: ViewMode) -> String {
    match view_mode {
        ViewMode::Grid => format!("[{}] {} ({})", document.id, document.name, document.status),
        ViewMode::List => format!(
            "{:<10} {:<40} {:<12} {:<10} {}",
            document.id,
            document.name,
            document.doc_type,
            document.status,
            document.upload_date.format("%Y-%m-%d")
        ),
    }
}

pub async fn run_open(api: Arc<dyn DocumentApi>, args: OpenArgs) -> anyhow::Result<()> {
    let mut viewer = DocumentViewer::new(api);
    viewer.open(&args.document_id).await?;
    viewer.select(args.tab.into());

    match viewer.state() {
        LoadState::Failed { failure, .. } => {
            anyhow::bail!("{} ({})", failure.kind.describe(), failure.message)
        }
        _ => match viewer.current_panel() {
            Some(panel) => {
                print!("{}", panel);
                Ok(())
            }
            None => anyhow::bail!("Document {} did not finish loading", args.document_id),
        },
    }
}

pub async fn run_batch(settings: &Settings, api: Arc<dyn DocumentApi>, args: BatchArgs) -> anyhow::Result<()> {
    let mut controller = DocumentListController::new(api, settings.list.clone());
    for document_id in &args.document_ids {
        if !controller.selection().contains(document_id) {
            controller.toggle_selection(document_id);
        }
    }

    let outcome = controller.batch_operation(&args.operation).await?;
    let message = outcome.message.unwrap_or_default();
    if outcome.success {
        println!("{} succeeded {}", args.operation, message);
        Ok(())
    } else {
        anyhow::bail!("{} was rejected: {}", args.operation, message)
    }
}

pub async fn run_findings(api: Arc<dyn FindingsApi>, args: FindingsArgs) -> anyhow::Result<()> {
    let query = FindingQuery {
        search: args.search,
        severity: args.severity.map(Into::into),
        status: args.status.map(Into::into),
        page: args.page,
        limit: args.limit,
    };

    let findings = api.list_findings(&query).await?;
    for finding in &findings {
        println!(
            "{:<14} {:<14} {:<12} {}{}",
            finding.finding_id,
            format!("{:?}", finding.severity),
            format!("{:?}", finding.status),
            finding.title,
            if finding.ai_detected { " [AI]" } else { "" }
        );
    }
    println!("{} findings", findings.len());
    Ok(())
}

pub async fn run_finding_create(api: Arc<dyn FindingsApi>, args: FindingCreateArgs) -> anyhow::Result<()> {
    let finding = NewFinding {
        audit_id: args.audit_id,
        title: args.title,
        description: args.description,
        finding_type: args.finding_type,
        severity: args.severity.into(),
        assigned_to: args.assigned_to,
        due_date: args.due_date,
        remediation_plan: args.remediation_plan,
    };

    let receipt = api.create_finding(&finding).await?;
    println!("created finding {}", describe_receipt(&receipt));
    Ok(())
}

pub async fn run_finding_status(api: Arc<dyn FindingsApi>, args: FindingStatusArgs) -> anyhow::Result<()> {
    let status: FindingStatus = args.status.into();
    api.update_finding_status(&args.finding_id, status).await?;
    println!("finding {} is now {:?}", args.finding_id, status);
    Ok(())
}

pub async fn run_comments(api: Arc<dyn FindingsApi>, args: CommentsArgs) -> anyhow::Result<()> {
    let comments = api.list_finding_comments(&args.finding_id).await?;
    for comment in &comments {
        println!("{}", format_comment(comment));
    }
    println!("{} comments", comments.len());
    Ok(())
}

fn format_comment(comment: &FindingComment) -> String {
    let kind = if comment.comment_type.is_empty() || comment.comment_type == "general" {
        String::new()
    } else {
        format!(" [{}]", comment.comment_type)
    };
    format!(
        "{} {}{}: {}",
        comment.created_at.format("%Y-%m-%d %H:%M"),
        comment.created_by,
        kind,
        comment.comment
    )
}

pub async fn run_comment(api: Arc<dyn FindingsApi>, args: CommentArgs) -> anyhow::Result<()> {
    let comment = NewComment {
        comment: args.text,
        comment_type: args.comment_type,
    };
    api.add_finding_comment(&args.finding_id, &comment).await?;
    println!("comment added to finding {}", args.finding_id);
    Ok(())
}

pub async fn run_meetings(api: Arc<dyn FindingsApi>, args: MeetingsArgs) -> anyhow::Result<()> {
    let query = MeetingQuery {
        status: args.status.map(Into::into),
        page: args.page,
        limit: args.limit,
    };

    let meetings = api.list_meetings(&query).await?;
    for meeting in &meetings {
        println!(
            "{:<14} {} {:>4} min  {}",
            meeting.meeting_id,
            meeting.scheduled_time.format("%Y-%m-%d %H:%M"),
            meeting.duration_minutes,
            meeting.title
        );
    }
    println!("{} meetings", meetings.len());
    Ok(())
}

pub async fn run_meeting_schedule(api: Arc<dyn FindingsApi>, args: MeetingScheduleArgs) -> anyhow::Result<()> {
    let meeting = NewMeeting {
        audit_id: args.audit_id,
        title: args.title,
        description: args.description,
        meeting_type: args.meeting_type,
        scheduled_time: args.scheduled_time,
        duration_minutes: args.duration_minutes,
        location: args.location,
        participants: args.participants,
        agenda: args.agenda,
    };

    let receipt = api.schedule_meeting(&meeting).await?;
    println!(
        "scheduled meeting {} for {}",
        describe_receipt(&receipt),
        meeting.scheduled_time.format("%Y-%m-%d %H:%M")
    );
    Ok(())
}

fn describe_receipt(receipt: &WriteReceipt) -> String {
    receipt.reference().unwrap_or("(no id returned)").to_string()
}

pub async fn run_stats(api: Arc<dyn FindingsApi>) -> anyhow::Result<()> {
    let stats = api.findings_stats().await?;
    println!("total findings:     {}", stats.total_findings);
    println!("open findings:      {}", stats.open_findings);
    println!("critical findings:  {}", stats.critical_findings);
    println!("AI-detected:        {}", stats.ai_detected_findings);
    println!("upcoming meetings:  {}", stats.upcoming_meetings);
    Ok(())
}
