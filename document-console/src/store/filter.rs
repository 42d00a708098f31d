//! Filter, sort and paging state for the document list.
//!
//! Raw user input is parsed leniently: anything unrecognised means
//! "no constraint" rather than an error.

use crate::models::{DocumentStatus, DocumentSummary};
use std::cmp::Ordering;
use std::ops::Range;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Structural predicates, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFilters {
    pub status: Option<DocumentStatus>,
    pub doc_type: Option<String>,
}

impl DocumentFilters {
    pub fn from_raw(status: Option<&str>, doc_type: Option<&str>) -> Self {
        let status = status.and_then(|raw| {
            let parsed = DocumentStatus::parse_lenient(raw);
            if parsed.is_none() && !raw.trim().is_empty() {
                tracing::debug!(status = raw, "Ignoring unknown status filter");
            }
            parsed
        });
        let doc_type = doc_type
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(str::to_string);

        Self { status, doc_type }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.doc_type.is_none()
    }

    pub fn matches(&self, document: &DocumentSummary) -> bool {
        let status_ok = self.status.map_or(true, |status| document.status == status);
        let type_ok = self
            .doc_type
            .as_deref()
            .map_or(true, |doc_type| document.doc_type == doc_type);
        status_ok && type_ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Type,
    UploadDate,
    Status,
}

impl SortKey {
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "name" | "title" => Some(SortKey::Name),
            "type" | "file_type" => Some(SortKey::Type),
            "uploaddate" | "upload_date" | "date" => Some(SortKey::UploadDate),
            "status" => Some(SortKey::Status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "desc" | "descending" => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub fn ascending(key: SortKey) -> Self {
        Self::new(key, SortDirection::Ascending)
    }

    pub fn compare(&self, a: &DocumentSummary, b: &DocumentSummary) -> Ordering {
        let ordering = match self.key {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::Type => a.doc_type.to_lowercase().cmp(&b.doc_type.to_lowercase()),
            SortKey::UploadDate => a.upload_date.cmp(&b.upload_date),
            SortKey::Status => a.status.cmp(&b.status),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Everything that shapes the visible page of the list.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    search_query: String,
    filters: DocumentFilters,
    sort: Option<SortOrder>,
    current_page: usize,
    items_per_page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE)
    }
}

impl FilterState {
    /// `items_per_page` of zero falls back to the default page size.
    pub fn new(items_per_page: usize) -> Self {
        Self {
            search_query: String::new(),
            filters: DocumentFilters::default(),
            sort: None,
            current_page: 1,
            items_per_page: if items_per_page == 0 {
                DEFAULT_ITEMS_PER_PAGE
            } else {
                items_per_page
            },
        }
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn filters(&self) -> &DocumentFilters {
        &self.filters
    }

    pub fn sort(&self) -> Option<SortOrder> {
        self.sort
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
        self.current_page = 1;
    }

    pub fn set_filters(&mut self, filters: DocumentFilters) {
        self.filters = filters;
        self.current_page = 1;
    }

    pub fn set_sort(&mut self, sort: Option<SortOrder>) {
        self.sort = sort;
    }

    /// Zero is ignored; any other size resets to the first page.
    pub fn set_items_per_page(&mut self, items_per_page: usize) -> bool {
        if items_per_page == 0 {
            return false;
        }
        self.items_per_page = items_per_page;
        self.current_page = 1;
        true
    }

    /// Number of pages for `total` items; an empty view still has one page.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.items_per_page).max(1)
    }

    /// Move to `page`, clamped into `[1, page_count(total)]`.
    pub fn set_page(&mut self, page: usize, total: usize) {
        self.current_page = page.clamp(1, self.page_count(total));
    }

    pub fn clamp_page(&mut self, total: usize) {
        self.set_page(self.current_page, total);
    }

    /// Index range of the current page within a view of `total` items.
    pub fn window(&self, total: usize) -> Range<usize> {
        let start = (self.current_page - 1)
            .saturating_mul(self.items_per_page)
            .min(total);
        let end = start.saturating_add(self.items_per_page).min(total);
        start..end
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.items_per_page);
    }
}
