//! Pure view descriptions and the renderers that materialize them.

pub mod card;
pub mod html;
pub mod terminal;

pub use card::{CardRenderer, CardView, CoverSize, CoverView, FavoriteToggleView, LinkView};
pub use html::HtmlRenderer;
pub use terminal::{BusyIndicator, TerminalRenderer};

use crate::error::FinderError;
use crate::models::SearchForm;
use std::str::FromStr;

pub const ERROR_MESSAGE: &str = "Something went wrong. Try again.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    SearchResults,
    Favorites,
}

impl FromStr for Tab {
    type Err = FinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "results" | "search-results" | "search" => Ok(Tab::SearchResults),
            "favorites" | "favourites" | "saved" => Ok(Tab::Favorites),
            other => Err(FinderError::InvalidInput(format!("Unknown tab '{}'", other))),
        }
    }
}

/// Content of the results region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsView {
    Cards(Vec<CardView>),
    /// A single inline message in place of the cards.
    Message(String),
}

impl Default for ResultsView {
    fn default() -> Self {
        ResultsView::Cards(Vec::new())
    }
}

impl ResultsView {
    pub fn cards(&self) -> &[CardView] {
        match self {
            ResultsView::Cards(cards) => cards,
            ResultsView::Message(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipView {
    pub label: String,
}

/// Everything a renderer needs to draw the whole screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageView {
    pub form: SearchForm,
    pub quick_filters: Vec<ChipView>,
    pub recent: Vec<ChipView>,
    pub active_tab: Tab,
    pub busy: bool,
    pub status: String,
    pub results: ResultsView,
    pub favorites: Vec<CardView>,
    pub load_more_visible: bool,
}

impl PageView {
    /// Cards of whichever tab is showing.
    pub fn visible_cards(&self) -> &[CardView] {
        match self.active_tab {
            Tab::SearchResults => self.results.cards(),
            Tab::Favorites => &self.favorites,
        }
    }
}

/// Materializes a page description into some output format.
pub trait Renderer {
    fn render_page(&self, page: &PageView) -> String;
    fn render_card(&self, card: &CardView) -> String;
    fn render_toggle(&self, toggle: &FavoriteToggleView) -> String;
}
