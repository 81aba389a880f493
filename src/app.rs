use crate::{
    config::Config,
    error::{FinderError, Result},
    models::{Document, RecentSearchEntry, SearchForm, SearchQuery, SortMode},
    services::{
        find_quick_filter, sort_documents, FavoritesStore, FileStorage, LocalStorage,
        OpenLibraryClient, QueryBuilder, RecentSearchStore, SearchSource, MAX_RECENT,
        QUICK_FILTERS,
    },
    view::{
        CardRenderer, ChipView, FavoriteToggleView, PageView, ResultsView, Tab, ERROR_MESSAGE,
    },
};
use anyhow::Context;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

/// What happened to one search request.
#[derive(Debug)]
pub enum SearchOutcome {
    /// The page was accepted and the results region now shows it.
    Applied,
    /// The request failed; the results region shows the inline error message.
    Failed(FinderError),
    /// A newer request was issued while this one was in flight, so it was dropped.
    Stale,
    /// "Load more" with no previous search.
    Ignored,
}

impl SearchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SearchOutcome::Applied)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchKind {
    New,
    LoadMore,
}

/// All mutable state of the client. Only ever touched through `Application`.
struct AppState {
    form: SearchForm,
    /// Query of the last accepted page; "load more" continues from it.
    query: Option<SearchQuery>,
    /// Accumulated documents in server order.
    docs: Vec<Document>,
    total: u64,
    results_status: String,
    results_failed: bool,
    load_more_visible: bool,
    active_tab: Tab,
    busy: bool,
    generation: u64,
    last_anomaly: Option<FinderError>,
    favorites: FavoritesStore,
    recent: RecentSearchStore,
}

/// Orchestrates searches, stores and views for one user session.
#[derive(Clone)]
pub struct Application {
    source: Arc<dyn SearchSource>,
    builder: QueryBuilder,
    cards: CardRenderer,
    state: Arc<Mutex<AppState>>,
}

impl Application {
    pub fn new(
        source: Arc<dyn SearchSource>,
        storage: Arc<dyn LocalStorage>,
        builder: QueryBuilder,
        cards: CardRenderer,
    ) -> Self {
        let favorites = FavoritesStore::load(storage.clone());
        let recent = RecentSearchStore::load(storage);
        for anomaly in [favorites.load_anomaly(), recent.load_anomaly()]
            .into_iter()
            .flatten()
        {
            warn!("Started with empty state: {}", anomaly);
        }

        let state = AppState {
            form: SearchForm::default(),
            query: None,
            docs: Vec::new(),
            total: 0,
            results_status: String::new(),
            results_failed: false,
            load_more_visible: false,
            active_tab: Tab::SearchResults,
            busy: false,
            generation: 0,
            last_anomaly: None,
            favorites,
            recent,
        };

        Self {
            source,
            builder,
            cards,
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Wire the Open Library client and file-backed storage from configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let storage = FileStorage::open(&config.storage_dir).with_context(|| {
            format!("Failed to open storage at {}", config.storage_dir.display())
        })?;
        info!("Using storage at {}", config.storage_dir.display());

        Ok(Self::new(
            Arc::new(OpenLibraryClient::new(&config.search_url)),
            Arc::new(storage),
            QueryBuilder::new(config.page_size),
            CardRenderer::from_config(config),
        ))
    }

    fn lock(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn form(&self) -> SearchForm {
        self.lock().form.clone()
    }

    pub fn set_form(&self, form: SearchForm) {
        self.lock().form = form;
    }

    pub fn is_busy(&self) -> bool {
        self.lock().busy
    }

    pub fn result_count(&self) -> usize {
        self.lock().docs.len()
    }

    /// Latest soft decode problem seen in an accepted page.
    pub fn last_anomaly(&self) -> Option<String> {
        self.lock().last_anomaly.as_ref().map(ToString::to_string)
    }

    /// Soft problems found while loading the persisted stores.
    pub fn storage_anomalies(&self) -> Vec<String> {
        let state = self.lock();
        [state.favorites.load_anomaly(), state.recent.load_anomaly()]
            .into_iter()
            .flatten()
            .map(ToString::to_string)
            .collect()
    }

    /// Fill the form with the configured default and search, unless disabled.
    pub async fn startup(&self, config: &Config) -> Option<SearchOutcome> {
        if !config.startup_search {
            return None;
        }
        let form = SearchForm {
            title: config.startup_title.clone(),
            subject: config.startup_subject.clone(),
            ..self.form()
        };
        Some(self.submit_form(form).await)
    }

    /// Search with the current form from page 1, replacing any results.
    pub async fn submit(&self) -> SearchOutcome {
        self.run_search(SearchKind::New).await
    }

    pub async fn submit_form(&self, form: SearchForm) -> SearchOutcome {
        self.set_form(form);
        self.submit().await
    }

    /// Fetch the next page of the last accepted query and append it.
    pub async fn load_more(&self) -> SearchOutcome {
        self.run_search(SearchKind::LoadMore).await
    }

    /// Restore a recent search (1-based position on the strip) and run it.
    pub async fn replay_recent(&self, position: usize) -> Result<SearchOutcome> {
        let entry = self.lock().recent.get(position).cloned().ok_or_else(|| {
            FinderError::InvalidInput(format!("No recent search at position {}", position))
        })?;
        Ok(self.submit_form(entry.to_form()).await)
    }

    /// Apply a quick-filter preset to the form and run it.
    pub async fn apply_quick_filter(&self, selector: &str) -> Result<SearchOutcome> {
        let filter = find_quick_filter(selector).ok_or_else(|| {
            FinderError::InvalidInput(format!("No quick filter matches '{}'", selector))
        })?;
        let mut form = self.form();
        filter.apply(&mut form);
        Ok(self.submit_form(form).await)
    }

    async fn run_search(&self, kind: SearchKind) -> SearchOutcome {
        let (generation, query, entry) = {
            let mut state = self.lock();
            let query = match kind {
                SearchKind::New => {
                    state.docs.clear();
                    state.total = 0;
                    state.results_failed = false;
                    state.load_more_visible = false;
                    // Paging continues only once this query has been accepted.
                    state.query = None;
                    self.builder.build(&state.form)
                }
                SearchKind::LoadMore => match &state.query {
                    Some(previous) if state.load_more_visible => previous.next_page(),
                    Some(_) => {
                        debug!("Load more requested with every result loaded");
                        return SearchOutcome::Ignored;
                    }
                    None => {
                        debug!("Load more requested without an accepted search");
                        return SearchOutcome::Ignored;
                    }
                },
            };
            state.generation += 1;
            state.busy = true;
            let entry = (kind == SearchKind::New).then(|| RecentSearchEntry::from_form(&state.form));
            (state.generation, query, entry)
        };

        info!("Searching page {} (request #{})", query.page, generation);
        let result = self.source.search(&query).await;

        let mut state = self.lock();
        if state.generation != generation {
            debug!(
                "Discarding response #{}; request #{} is newer",
                generation, state.generation
            );
            return SearchOutcome::Stale;
        }
        state.busy = false;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                error!("Search request #{} failed: {}", generation, e);
                state.results_failed = true;
                return SearchOutcome::Failed(e);
            }
        };

        if let Some(anomaly) = &page.anomaly {
            debug!("Request #{} returned a malformed page: {}", generation, anomaly);
        }
        state.last_anomaly = page.anomaly;

        match kind {
            SearchKind::New => state.docs = page.docs,
            SearchKind::LoadMore => state.docs.extend(page.docs),
        }
        state.total = page.total;
        state.results_failed = false;
        state.load_more_visible = (state.docs.len() as u64) < state.total;
        state.results_status = format!(
            "{} results • Page {}",
            format_count(state.total),
            query.page
        );
        state.query = Some(query);

        if let Some(entry) = entry {
            if let Err(e) = state.recent.record(entry) {
                error!("Failed to save recent searches: {}", e);
            }
        }

        SearchOutcome::Applied
    }

    /// Change the sort selector and re-order what is already loaded.
    pub fn change_sort(&self, mode: SortMode) -> PageView {
        {
            let mut state = self.lock();
            state.form.sort = mode;
            state.results_failed = false;
        }
        self.view()
    }

    pub fn switch_tab(&self, tab: Tab) -> PageView {
        self.lock().active_tab = tab;
        self.view()
    }

    /// Toggle the favorite state of a document and return its redrawn toggle.
    pub fn toggle_favorite(&self, doc: &Document) -> FavoriteToggleView {
        let mut state = self.lock();
        let active = match state.favorites.toggle(doc) {
            Ok(active) => active,
            Err(e) => {
                error!("Failed to save favorites: {}", e);
                state.favorites.is_favorite(doc)
            }
        };
        FavoriteToggleView::new(active)
    }

    /// Toggle the n-th card (1-based) of the visible tab.
    pub fn toggle_favorite_at(&self, position: usize) -> Result<FavoriteToggleView> {
        let docs = visible_documents(&self.lock());
        let doc = position
            .checked_sub(1)
            .and_then(|index| docs.into_iter().nth(index))
            .ok_or_else(|| {
                FinderError::InvalidInput(format!("No card at position {}", position))
            })?;
        Ok(self.toggle_favorite(&doc))
    }

    pub fn favorites_count(&self) -> usize {
        self.lock().favorites.len()
    }

    /// Describe the whole screen from the current state.
    pub fn view(&self) -> PageView {
        let state = self.lock();

        let results = if state.results_failed {
            ResultsView::Message(ERROR_MESSAGE.to_string())
        } else {
            ResultsView::Cards(
                sort_documents(&state.docs, state.form.sort)
                    .iter()
                    .map(|doc| self.cards.render(doc, state.favorites.is_favorite(doc)))
                    .collect(),
            )
        };

        let favorites = state
            .favorites
            .list()
            .iter()
            .map(|entry| {
                let doc = entry.to_document();
                self.cards.render(&doc, state.favorites.is_favorite(&doc))
            })
            .collect();

        let status = match state.active_tab {
            Tab::SearchResults => state.results_status.clone(),
            Tab::Favorites => format!("{} saved", state.favorites.len()),
        };

        PageView {
            form: state.form.clone(),
            quick_filters: QUICK_FILTERS
                .iter()
                .map(|filter| ChipView {
                    label: filter.label.to_string(),
                })
                .collect(),
            recent: state
                .recent
                .list(MAX_RECENT)
                .iter()
                .map(|entry| ChipView {
                    label: entry.label(),
                })
                .collect(),
            active_tab: state.active_tab,
            busy: state.busy,
            status,
            results,
            favorites,
            load_more_visible: state.load_more_visible,
        }
    }
}

/// Documents behind the cards of the visible tab, in display order.
fn visible_documents(state: &AppState) -> Vec<Document> {
    match state.active_tab {
        Tab::SearchResults if state.results_failed => Vec::new(),
        Tab::SearchResults => sort_documents(&state.docs, state.form.sort),
        Tab::Favorites => state
            .favorites
            .list()
            .iter()
            .map(|entry| entry.to_document())
            .collect(),
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}
