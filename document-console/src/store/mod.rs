//! Client-side view over the fetched document collection.

pub mod collection;
pub mod filter;

pub use collection::{paginate, DocumentCollection, RecentSearches, RECENT_SEARCH_LIMIT};
pub use filter::{
    DocumentFilters, FilterState, SortDirection, SortKey, SortOrder, DEFAULT_ITEMS_PER_PAGE,
};
