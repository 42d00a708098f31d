//! The in-memory document collection and its derived view.

use super::filter::{DocumentFilters, FilterState, SortOrder};
use crate::models::DocumentSummary;
use std::collections::{HashSet, VecDeque};

pub const RECENT_SEARCH_LIMIT: usize = 5;

/// Most-recent-first list of search terms, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentSearches {
    entries: VecDeque<String>,
}

impl RecentSearches {
    pub fn record(&mut self, query: &str) {
        if query.is_empty() {
            return;
        }
        if let Some(position) = self.entries.iter().position(|entry| entry == query) {
            self.entries.remove(position);
        }
        self.entries.push_front(query.to_string());
        self.entries.truncate(RECENT_SEARCH_LIMIT);
    }

    pub fn entries(&self) -> Vec<&str> {
        self.entries.iter().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Case-insensitive substring match on name or content.
pub fn matches_query(document: &DocumentSummary, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    document.name.to_lowercase().contains(&needle)
        || document.content.to_lowercase().contains(&needle)
}

/// Slice out page `page` (1-based) of `view`.
///
/// Out-of-range pages and a zero page size give an empty slice; page 0 reads
/// as page 1.
pub fn paginate<T>(view: &[T], page: usize, page_size: usize) -> &[T] {
    if page_size == 0 {
        return &[];
    }
    let start = page
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(view.len());
    let end = start.saturating_add(page_size).min(view.len());
    &view[start..end]
}

/// Authoritative document list for the session plus the current derived view.
///
/// The view is a list of indices into the base collection, so recomputing it
/// never touches the documents themselves.
#[derive(Debug, Clone, Default)]
pub struct DocumentCollection {
    documents: Vec<DocumentSummary>,
    view: Vec<usize>,
    recent_searches: RecentSearches,
}

impl DocumentCollection {
    pub fn new(documents: Vec<DocumentSummary>) -> Self {
        let mut collection = Self::default();
        collection.replace(documents);
        collection
    }

    /// Swap in a freshly fetched collection; the view resets to everything.
    ///
    /// Later entries reusing an id already seen are dropped.
    pub fn replace(&mut self, documents: Vec<DocumentSummary>) {
        let mut seen = HashSet::with_capacity(documents.len());
        let mut unique = Vec::with_capacity(documents.len());
        for document in documents {
            if seen.insert(document.id.clone()) {
                unique.push(document);
            } else {
                tracing::warn!(document_id = %document.id, "Dropping duplicate document id");
            }
        }

        self.view = (0..unique.len()).collect();
        self.documents = unique;
    }

    pub fn documents(&self) -> &[DocumentSummary] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn contains(&self, document_id: &str) -> bool {
        self.documents.iter().any(|doc| doc.id == document_id)
    }

    pub fn get(&self, document_id: &str) -> Option<&DocumentSummary> {
        self.documents.iter().find(|doc| doc.id == document_id)
    }

    /// Documents in the current view, in view order.
    pub fn view(&self) -> Vec<&DocumentSummary> {
        self.view.iter().map(|&index| &self.documents[index]).collect()
    }

    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    pub fn recent_searches(&self) -> Vec<&str> {
        self.recent_searches.entries()
    }

    pub fn record_search(&mut self, query: &str) {
        self.recent_searches.record(query);
    }

    /// Text search over the whole collection, remembering non-empty queries.
    pub fn search(&mut self, query: &str) -> Vec<&DocumentSummary> {
        self.record_search(query);
        self.view = self.select(query, &DocumentFilters::default(), None);
        self.view()
    }

    /// Structural filters plus an optional stable sort over the whole collection.
    pub fn apply_filter_sort(
        &mut self,
        filters: &DocumentFilters,
        sort: Option<SortOrder>,
    ) -> Vec<&DocumentSummary> {
        self.view = self.select("", filters, sort);
        self.view()
    }

    /// Search query, filters and sort from `state`, all at once.
    pub fn apply(&mut self, state: &FilterState) -> Vec<&DocumentSummary> {
        self.view = self.select(state.search_query(), state.filters(), state.sort());
        self.view()
    }

    fn select(&self, query: &str, filters: &DocumentFilters, sort: Option<SortOrder>) -> Vec<usize> {
        let mut selected: Vec<usize> = self
            .documents
            .iter()
            .enumerate()
            .filter(|(_, doc)| matches_query(doc, query) && filters.matches(doc))
            .map(|(index, _)| index)
            .collect();

        if let Some(order) = sort {
            // sort_by is stable: equal keys keep base-collection order
            selected.sort_by(|&a, &b| order.compare(&self.documents[a], &self.documents[b]));
        }
        selected
    }
}
