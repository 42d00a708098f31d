//! Document list screen: collection view, paging, selection and batch actions.

use crate::config::ListSettings;
use crate::models::{BatchOutcome, BatchRequest, DocumentSummary};
use crate::services::DocumentApi;
use crate::store::{DocumentCollection, DocumentFilters, FilterState, SortOrder};
use crate::viewer::DocumentViewer;
use console_core::error::ApiError;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Grid => f.write_str("grid"),
            ViewMode::List => f.write_str("list"),
        }
    }
}

/// Ids chosen for a batch action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<String>,
}

impl SelectionSet {
    /// Flip membership of `document_id`; returns whether it is now selected.
    pub fn toggle(&mut self, document_id: &str) -> bool {
        if self.ids.remove(document_id) {
            false
        } else {
            self.ids.insert(document_id.to_string());
            true
        }
    }

    pub fn contains(&self, document_id: &str) -> bool {
        self.ids.contains(document_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn retain(&mut self, keep: impl FnMut(&String) -> bool) {
        self.ids.retain(keep);
    }
}

pub struct DocumentListController {
    api: Arc<dyn DocumentApi>,
    collection: DocumentCollection,
    filter_state: FilterState,
    selection: SelectionSet,
    view_mode: ViewMode,
    settings: ListSettings,
    viewer: DocumentViewer,
}

impl DocumentListController {
    pub fn new(api: Arc<dyn DocumentApi>, settings: ListSettings) -> Self {
        Self {
            viewer: DocumentViewer::new(api.clone()),
            api,
            collection: DocumentCollection::default(),
            filter_state: FilterState::new(settings.items_per_page),
            selection: SelectionSet::default(),
            view_mode: settings.default_view_mode,
            settings,
        }
    }

    /// Fetch the collection and rebuild the view.
    ///
    /// Selected ids that disappeared are dropped. On failure the previous
    /// collection stays in place.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<usize, ApiError> {
        let documents = match self.api.list_documents().await {
            Ok(documents) => documents,
            Err(e) => {
                tracing::warn!(error = %e, kind = %e.kind(), "Failed to refresh document list");
                return Err(e);
            }
        };

        self.collection.replace(documents);
        let collection = &self.collection;
        self.selection.retain(|id| collection.contains(id));
        self.reapply();

        tracing::info!(
            total = self.collection.len(),
            visible = self.collection.view_len(),
            "Document list refreshed"
        );
        Ok(self.collection.len())
    }

    pub fn collection(&self) -> &DocumentCollection {
        &self.collection
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter_state
    }

    /// Text search composed with the active filters; lands on the first page.
    pub fn search(&mut self, query: &str) -> Vec<&DocumentSummary> {
        self.filter_state.set_search_query(query);
        self.collection.record_search(query);
        self.reapply();
        self.collection.view()
    }

    pub fn recent_searches(&self) -> Vec<&str> {
        self.collection.recent_searches()
    }

    pub fn apply_filter_sort(
        &mut self,
        filters: DocumentFilters,
        sort: Option<SortOrder>,
    ) -> Vec<&DocumentSummary> {
        self.filter_state.set_filters(filters);
        self.filter_state.set_sort(sort);
        self.reapply();
        self.collection.view()
    }

    pub fn set_filters(&mut self, filters: DocumentFilters) {
        self.filter_state.set_filters(filters);
        self.reapply();
    }

    pub fn set_sort(&mut self, sort: Option<SortOrder>) {
        self.filter_state.set_sort(sort);
        self.reapply();
    }

    /// Drop the search query and structural filters; the sort is kept.
    pub fn clear_filters(&mut self) {
        self.filter_state.set_search_query("");
        self.filter_state.set_filters(DocumentFilters::default());
        self.reapply();
    }

    pub fn set_page(&mut self, page: usize) {
        self.filter_state.set_page(page, self.collection.view_len());
    }

    /// Returns false when already on the last page.
    pub fn next_page(&mut self) -> bool {
        let before = self.filter_state.current_page();
        self.set_page(before + 1);
        self.filter_state.current_page() != before
    }

    pub fn previous_page(&mut self) -> bool {
        let before = self.filter_state.current_page();
        self.set_page(before.saturating_sub(1));
        self.filter_state.current_page() != before
    }

    /// Change the page size; zero is ignored.
    pub fn set_items_per_page(&mut self, items_per_page: usize) -> bool {
        self.filter_state.set_items_per_page(items_per_page)
    }

    pub fn current_page(&self) -> usize {
        self.filter_state.current_page()
    }

    pub fn page_count(&self) -> usize {
        self.filter_state.page_count(self.collection.view_len())
    }

    pub fn current_page_items(&self) -> Vec<&DocumentSummary> {
        let view = self.collection.view();
        let window = self.filter_state.window(view.len());
        view[window].to_vec()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.view_mode = view_mode;
    }

    pub fn toggle_view_mode(&mut self) -> ViewMode {
        self.view_mode = self.view_mode.toggled();
        self.view_mode
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn toggle_selection(&mut self, document_id: &str) -> bool {
        self.selection.toggle(document_id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn viewer(&self) -> &DocumentViewer {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut DocumentViewer {
        &mut self.viewer
    }

    /// Show a document in the viewer; the fetch runs in the background.
    pub fn open_document(&mut self, document_id: &str) -> JoinHandle<()> {
        tracing::info!(document_id, "Opening document");
        self.viewer.open(document_id)
    }

    /// Run `operation` over the selected documents.
    ///
    /// The selection is cleared only when the API reports success and
    /// `clear_selection_on_batch_success` is set.
    #[tracing::instrument(skip(self), fields(count = self.selection.len()))]
    pub async fn batch_operation(&mut self, operation: &str) -> Result<BatchOutcome, ApiError> {
        let request = BatchRequest {
            operation: operation.trim().to_string(),
            document_ids: self.selection.ids(),
        };
        request.validate()?;

        let outcome = self.api.batch_operation(&request).await.map_err(|e| {
            tracing::error!(error = %e, "Batch operation failed");
            e
        })?;

        if outcome.success {
            tracing::info!(message = ?outcome.message, "Batch operation succeeded");
            if self.settings.clear_selection_on_batch_success {
                self.selection.clear();
            }
        } else {
            tracing::warn!(message = ?outcome.message, "Batch operation reported failure");
        }
        Ok(outcome)
    }

    /// Delete one document, then refresh the list.
    #[tracing::instrument(skip(self))]
    pub async fn delete_document(&mut self, document_id: &str) -> Result<(), ApiError> {
        self.api.delete_document(document_id).await?;

        self.selection.retain(|id| id != document_id);
        if self.viewer.state().document_id() == Some(document_id) {
            self.viewer.close();
        }
        self.refresh().await?;
        Ok(())
    }

    fn reapply(&mut self) {
        self.collection.apply(&self.filter_state);
        self.filter_state.clamp_page(self.collection.view_len());
    }
}
