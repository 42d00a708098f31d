//! Panel rendering for the viewer tabs.
//!
//! Rendering is a pure function of the loaded document and the active tab.

use super::Tab;
use crate::models::{DocumentDetail, StepStatus, WorkflowStep};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: String,
    pub value: String,
}

impl Field {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub fields: Vec<Field>,
}

/// One row of a list-shaped panel (annotations, versions, related, activity).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    pub subtitle: String,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelBody {
    Empty(&'static str),
    Text(String),
    Fields(Vec<Field>),
    Sections(Vec<Section>),
    Entries(Vec<Entry>),
    Steps(Vec<WorkflowStep>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub tab: Tab,
    pub heading: String,
    pub body: PanelBody,
}

impl Panel {
    pub fn is_empty(&self) -> bool {
        matches!(self.body, PanelBody::Empty(_))
    }
}

pub fn render(detail: &DocumentDetail, tab: Tab) -> Panel {
    let body = match tab {
        Tab::Preview => preview(detail),
        Tab::Metadata => metadata(detail),
        Tab::AiAnalysis => ai_analysis(&detail.ai_analysis),
        Tab::Annotations => annotations(detail),
        Tab::Versions => versions(detail),
        Tab::Related => related(detail),
        Tab::Workflow => PanelBody::Steps(detail.workflow.clone()),
        Tab::Activity => activity(detail),
    };

    Panel {
        tab,
        heading: format!("{} | {}", detail.title, tab.label()),
        body,
    }
}

fn preview(detail: &DocumentDetail) -> PanelBody {
    match detail.content.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => PanelBody::Text(text.to_string()),
        _ => PanelBody::Empty("No preview available for this document"),
    }
}

fn metadata(detail: &DocumentDetail) -> PanelBody {
    let mut fields = Vec::new();
    if !detail.file_type.is_empty() {
        fields.push(Field::new("File type", detail.file_type.clone()));
    }
    if let Some(size) = detail.file_size {
        fields.push(Field::new("File size", human_size(size)));
    }
    fields.extend(
        detail
            .metadata
            .iter()
            .map(|(key, value)| Field::new(key.clone(), scalar_text(value))),
    );

    if fields.is_empty() {
        PanelBody::Empty("No metadata available")
    } else {
        PanelBody::Fields(fields)
    }
}

/// Generic rendering of the opaque analysis payload.
///
/// Top-level keys become sections and nested objects flatten into dotted
/// labels; anything that is not an object becomes one "Analysis" section.
pub fn ai_analysis(analysis: &Value) -> PanelBody {
    let sections = match analysis {
        Value::Null => Vec::new(),
        Value::Object(map) => map
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| {
                let mut fields = Vec::new();
                match value {
                    Value::Object(_) => flatten("", value, &mut fields),
                    _ => flatten(key, value, &mut fields),
                }
                Section {
                    title: section_title(key),
                    fields,
                }
            })
            .collect(),
        other => {
            let mut fields = Vec::new();
            flatten("value", other, &mut fields);
            vec![Section {
                title: "Analysis".to_string(),
                fields,
            }]
        }
    };

    if sections.is_empty() {
        PanelBody::Empty("No AI analysis available")
    } else {
        PanelBody::Sections(sections)
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut Vec<Field>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                let label = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(&label, nested, out);
            }
        }
        Value::Array(items) if items.iter().all(|item| !item.is_object() && !item.is_array()) => {
            let joined = items.iter().map(scalar_text).collect::<Vec<_>>().join(", ");
            out.push(Field::new(prefix, joined));
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten(&format!("{}.{}", prefix, index), item, out);
            }
        }
        scalar => out.push(Field::new(prefix, scalar_text(scalar))),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// `risk_assessment` -> `Risk Assessment`.
fn section_title(key: &str) -> String {
    key.split(|c| c == '_' || c == '-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn annotations(detail: &DocumentDetail) -> PanelBody {
    if detail.annotations.is_empty() {
        return PanelBody::Empty("No annotations yet");
    }
    PanelBody::Entries(
        detail
            .annotations
            .iter()
            .map(|annotation| Entry {
                title: annotation.text.clone(),
                subtitle: format!("{} at {}", annotation.user, annotation.timestamp.to_rfc3339()),
                body: None,
            })
            .collect(),
    )
}

fn versions(detail: &DocumentDetail) -> PanelBody {
    if detail.versions.is_empty() {
        return PanelBody::Empty("No previous versions");
    }
    PanelBody::Entries(
        detail
            .versions
            .iter()
            .map(|version| Entry {
                title: format!("Version {}", version.version_number),
                subtitle: version.created_at.to_rfc3339(),
                body: Some(version.content.clone()).filter(|content| !content.is_empty()),
            })
            .collect(),
    )
}

fn related(detail: &DocumentDetail) -> PanelBody {
    if detail.related_documents.is_empty() {
        return PanelBody::Empty("No related documents");
    }
    PanelBody::Entries(
        detail
            .related_documents
            .iter()
            .map(|doc| {
                let subtitle = [
                    doc.doc_type.clone(),
                    doc.status.map(|status| status.to_string()),
                ]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(", ");
                Entry {
                    title: doc.name.clone(),
                    subtitle,
                    body: None,
                }
            })
            .collect(),
    )
}

fn activity(detail: &DocumentDetail) -> PanelBody {
    if detail.activity_log.is_empty() {
        return PanelBody::Empty("No recorded activity");
    }
    PanelBody::Entries(
        detail
            .activity_log
            .iter()
            .map(|entry| Entry {
                title: entry.action.clone(),
                subtitle: format!("{} at {}", entry.user, entry.timestamp.to_rfc3339()),
                body: None,
            })
            .collect(),
    )
}

pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.heading)?;
        match &self.body {
            PanelBody::Empty(message) => writeln!(f, "({})", message),
            PanelBody::Text(text) => writeln!(f, "{}", text),
            PanelBody::Fields(fields) => write_fields(f, fields, ""),
            PanelBody::Sections(sections) => {
                for section in sections {
                    writeln!(f, "[{}]", section.title)?;
                    write_fields(f, &section.fields, "  ")?;
                }
                Ok(())
            }
            PanelBody::Entries(entries) => {
                for entry in entries {
                    writeln!(f, "- {}", entry.title)?;
                    if !entry.subtitle.is_empty() {
                        writeln!(f, "  {}", entry.subtitle)?;
                    }
                    if let Some(body) = &entry.body {
                        writeln!(f, "  {}", body)?;
                    }
                }
                Ok(())
            }
            PanelBody::Steps(steps) => {
                for step in steps {
                    let marker = match step.status {
                        StepStatus::Complete => "[x]",
                        StepStatus::Current => "[>]",
                        StepStatus::Upcoming => "[ ]",
                    };
                    writeln!(f, "{} {}", marker, step.name)?;
                }
                Ok(())
            }
        }
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &[Field], indent: &str) -> fmt::Result {
    for field in fields {
        writeln!(f, "{}{}: {}", indent, field.label, field.value)?;
    }
    Ok(())
}
