use crate::{config::Config, models::Document};

pub const FALLBACK_DETAIL_URL: &str = "https://openlibrary.org/";
pub const SAVED_LABEL: &str = "★ Saved";
pub const SAVE_LABEL: &str = "☆ Save";
pub const VIEW_DETAILS: &str = "View details";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSize {
    Small,
    Medium,
    Large,
}

impl CoverSize {
    fn token(&self) -> &'static str {
        match self {
            CoverSize::Small => "S",
            CoverSize::Medium => "M",
            CoverSize::Large => "L",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverView {
    Image { url: String, alt: String },
    /// Drawn in place of a cover, tagged with the title text.
    Placeholder { title: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkView {
    pub href: String,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FavoriteToggleView {
    pub active: bool,
    pub label: &'static str,
}

impl FavoriteToggleView {
    pub fn new(active: bool) -> Self {
        Self {
            active,
            label: if active { SAVED_LABEL } else { SAVE_LABEL },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    /// Identity of the document behind the card, used to route toggles.
    pub identity: String,
    pub cover: CoverView,
    pub title: String,
    pub meta: String,
    pub link: LinkView,
    pub favorite: FavoriteToggleView,
}

/// Turns documents into card descriptions.
#[derive(Debug, Clone)]
pub struct CardRenderer {
    cover_base_url: String,
    work_base_url: String,
}

impl CardRenderer {
    pub fn new(cover_base_url: &str, work_base_url: &str) -> Self {
        Self {
            cover_base_url: cover_base_url.trim_end_matches('/').to_string(),
            work_base_url: work_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.cover_base_url, &config.work_base_url)
    }

    pub fn cover_url(&self, cover_id: u64, size: CoverSize) -> String {
        format!("{}/{}-{}.jpg", self.cover_base_url, cover_id, size.token())
    }

    pub fn detail_url(&self, key: Option<&str>) -> String {
        match key {
            Some(key) if !key.is_empty() => format!("{}{}", self.work_base_url, key),
            _ => FALLBACK_DETAIL_URL.to_string(),
        }
    }

    pub fn render(&self, doc: &Document, is_favorite: bool) -> CardView {
        let title = doc.display_title().to_string();

        let cover = match doc.cover_id {
            Some(id) => CoverView::Image {
                url: self.cover_url(id, CoverSize::Large),
                alt: format!("{} cover", title),
            },
            None => CoverView::Placeholder {
                title: title.clone(),
            },
        };

        let meta = match doc.first_publish_year {
            Some(year) => format!("{} • {}", doc.display_author(), year),
            None => doc.display_author().to_string(),
        };

        CardView {
            identity: doc.identity(),
            cover,
            title,
            meta,
            link: LinkView {
                href: self.detail_url(doc.key.as_deref()),
                text: VIEW_DETAILS,
            },
            favorite: FavoriteToggleView::new(is_favorite),
        }
    }
}
