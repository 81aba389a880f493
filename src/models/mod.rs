pub use book::{Document, FavoriteEntry, UNKNOWN_AUTHOR, UNTITLED};
pub use search::{RecentSearchEntry, SearchForm, SearchPage, SearchQuery, SortMode};

mod book;
mod search;
