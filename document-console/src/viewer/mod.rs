//! The document viewer: tab selection on top of the detail loader.

pub mod panels;

use crate::controllers::loader::{DocumentDetailLoader, LoadState};
use crate::models::{DocumentContent, MetadataUpdate, NewAnnotation};
use crate::services::DocumentApi;
use console_core::error::ApiError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub use panels::{render, Entry, Field, Panel, PanelBody, Section};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Preview,
    Metadata,
    AiAnalysis,
    Annotations,
    Versions,
    Related,
    Workflow,
    Activity,
}

impl Tab {
    /// Display order of the tab strip.
    pub const ALL: [Tab; 8] = [
        Tab::Preview,
        Tab::Metadata,
        Tab::AiAnalysis,
        Tab::Annotations,
        Tab::Versions,
        Tab::Related,
        Tab::Workflow,
        Tab::Activity,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Tab::Preview => "preview",
            Tab::Metadata => "metadata",
            Tab::AiAnalysis => "ai-analysis",
            Tab::Annotations => "annotations",
            Tab::Versions => "versions",
            Tab::Related => "related",
            Tab::Workflow => "workflow",
            Tab::Activity => "activity",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Preview => "Preview",
            Tab::Metadata => "Metadata",
            Tab::AiAnalysis => "AI Analysis",
            Tab::Annotations => "Annotations",
            Tab::Versions => "Versions",
            Tab::Related => "Related",
            Tab::Workflow => "Workflow",
            Tab::Activity => "Activity",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTab(pub String);

impl fmt::Display for UnknownTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tab '{}'", self.0)
    }
}

impl std::error::Error for UnknownTab {}

impl FromStr for Tab {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.id() == s)
            .ok_or_else(|| UnknownTab(s.to_string()))
    }
}

/// Exactly one active tab, starting at preview.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabController {
    active: Tab,
}

impl TabController {
    pub fn active(&self) -> Tab {
        self.active
    }

    /// Activate the tab named `tab_id`; unknown ids leave the state untouched.
    pub fn select_tab(&mut self, tab_id: &str) -> bool {
        match tab_id.parse::<Tab>() {
            Ok(tab) => {
                self.active = tab;
                true
            }
            Err(err) => {
                tracing::debug!(error = %err, "Ignoring tab selection");
                false
            }
        }
    }

    pub fn select(&mut self, tab: Tab) {
        self.active = tab;
    }

    pub fn reset(&mut self) {
        self.active = Tab::Preview;
    }
}

/// Viewer for one document at a time.
pub struct DocumentViewer {
    api: Arc<dyn DocumentApi>,
    loader: DocumentDetailLoader,
    tabs: TabController,
}

impl DocumentViewer {
    pub fn new(api: Arc<dyn DocumentApi>) -> Self {
        Self {
            loader: DocumentDetailLoader::new(api.clone()),
            api,
            tabs: TabController::default(),
        }
    }

    pub fn loader(&self) -> &DocumentDetailLoader {
        &self.loader
    }

    pub fn state(&self) -> LoadState {
        self.loader.state()
    }

    pub fn active_tab(&self) -> Tab {
        self.tabs.active()
    }

    pub fn select_tab(&mut self, tab_id: &str) -> bool {
        self.tabs.select_tab(tab_id)
    }

    pub fn select(&mut self, tab: Tab) {
        self.tabs.select(tab);
    }

    /// Show `document_id` from the preview tab, fetching it afresh.
    pub fn open(&mut self, document_id: &str) -> JoinHandle<()> {
        self.tabs.reset();
        self.loader.load(document_id)
    }

    pub fn close(&mut self) {
        self.loader.close();
        self.tabs.reset();
    }

    /// Panel for the active tab, once the document has loaded.
    pub fn current_panel(&self) -> Option<Panel> {
        let state = self.loader.state();
        state.detail().map(|detail| render(detail, self.tabs.active()))
    }

    pub async fn download(&self) -> Result<DocumentContent, ApiError> {
        let document_id = self.open_document_id()?;
        self.api.get_document_content(&document_id).await
    }

    /// Merge `update` into the open document's metadata, then reload it.
    pub async fn update_metadata(&self, update: &MetadataUpdate) -> Result<(), ApiError> {
        let document_id = self.open_document_id()?;
        self.api.update_metadata(&document_id, update).await?;
        self.loader.load_now(&document_id).await;
        Ok(())
    }

    pub async fn add_annotation(&self, text: &str) -> Result<(), ApiError> {
        let document_id = self.open_document_id()?;
        let annotation = NewAnnotation {
            text: text.to_string(),
        };
        self.api.add_annotation(&document_id, &annotation).await?;
        self.loader.load_now(&document_id).await;
        Ok(())
    }

    fn open_document_id(&self) -> Result<String, ApiError> {
        self.loader
            .state()
            .document_id()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Validation("No document is open".to_string()))
    }
}
