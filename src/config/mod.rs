use crate::error::Result;
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_PAGE_SIZE: u32 = 24;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub search_url: String,
    pub cover_base_url: String,
    pub work_base_url: String,
    pub page_size: u32,
    pub storage_dir: PathBuf,
    pub startup_search: bool,
    pub startup_title: String,
    pub startup_subject: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_url: "https://openlibrary.org/search.json".to_string(),
            cover_base_url: "https://covers.openlibrary.org/b/id".to_string(),
            work_base_url: "https://openlibrary.org".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            storage_dir: PathBuf::from(".book-finder"),
            startup_search: true,
            startup_title: "Harry Potter".to_string(),
            startup_subject: "fantasy".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from defaults overlaid with `BOOK_FINDER_*` variables.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_source(config::Environment::with_prefix("BOOK_FINDER").try_parsing(true))
    }

    fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let defaults = Config::default();

        let config = config::Config::builder()
            .set_default("search_url", defaults.search_url)?
            .set_default("cover_base_url", defaults.cover_base_url)?
            .set_default("work_base_url", defaults.work_base_url)?
            .set_default("page_size", defaults.page_size as i64)?
            .set_default(
                "storage_dir",
                defaults.storage_dir.to_string_lossy().into_owned(),
            )?
            .set_default("startup_search", defaults.startup_search)?
            .set_default("startup_title", defaults.startup_title)?
            .set_default("startup_subject", defaults.startup_subject)?
            .add_source(source)
            .build()?;

        let mut loaded: Config = config.try_deserialize()?;
        if loaded.page_size == 0 {
            loaded.page_size = DEFAULT_PAGE_SIZE;
        }
        loaded.search_url = loaded.search_url.trim().to_string();
        loaded.cover_base_url = loaded.cover_base_url.trim_end_matches('/').to_string();
        loaded.work_base_url = loaded.work_base_url.trim_end_matches('/').to_string();

        Ok(loaded)
    }
}
