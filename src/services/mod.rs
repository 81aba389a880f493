pub mod favorites;
pub mod open_library;
pub mod presets;
pub mod query_builder;
pub mod recent_searches;
pub mod sorter;
pub mod storage;

// Re-export public types
pub use favorites::FavoritesStore;
pub use open_library::{decode_page, OpenLibraryClient, SearchSource};
pub use presets::{find_quick_filter, QuickFilter, QUICK_FILTERS};
pub use query_builder::QueryBuilder;
pub use recent_searches::{RecentSearchStore, MAX_RECENT};
pub use sorter::sort_documents;
pub use storage::{FileStorage, LocalStorage, MemoryStorage};
