use crate::error::FinderError;
use crate::models::Document;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result ordering selected in the search form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Relevance,
    YearDesc,
    YearAsc,
    TitleAsc,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [
        SortMode::Relevance,
        SortMode::YearDesc,
        SortMode::YearAsc,
        SortMode::TitleAsc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Relevance => "relevance",
            SortMode::YearDesc => "year_desc",
            SortMode::YearAsc => "year_asc",
            SortMode::TitleAsc => "title_asc",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = FinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s.trim())
            .ok_or_else(|| FinderError::InvalidInput(format!("Unknown sort mode '{}'", s)))
    }
}

/// Raw values of the search form, exactly as the user left them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub fulltext: bool,
    pub sort: SortMode,
}

/// Query parameters for one page of the catalog search.
///
/// Text fields hold `None` when the form field was blank after trimming, so
/// they never reach the request URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub fulltext_only: bool,
    pub page: u32,
    pub page_size: u32,
}

impl SearchQuery {
    /// The same query one page further along.
    pub fn next_page(&self) -> Self {
        Self {
            page: self.page + 1,
            ..self.clone()
        }
    }

    /// Parameter mapping sent to the search endpoint, in a stable order.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(6);
        for (name, value) in [
            ("title", &self.title),
            ("author", &self.author),
            ("subject", &self.subject),
        ] {
            if let Some(value) = value {
                params.push((name, value.clone()));
            }
        }
        // The endpoint treats an explicit "false" differently from no filter.
        if self.fulltext_only {
            params.push(("has_fulltext", "true".to_string()));
        }
        params.push(("page", self.page.to_string()));
        params.push(("limit", self.page_size.to_string()));
        params
    }
}

/// Snapshot of the form fields used for a past search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSearchEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub fulltext: bool,
    #[serde(default)]
    pub sort: SortMode,
}

impl RecentSearchEntry {
    pub fn from_form(form: &SearchForm) -> Self {
        Self {
            title: form.title.trim().to_string(),
            author: form.author.trim().to_string(),
            subject: form.subject.trim().to_string(),
            fulltext: form.fulltext,
            sort: form.sort,
        }
    }

    pub fn to_form(&self) -> SearchForm {
        SearchForm {
            title: self.title.clone(),
            author: self.author.clone(),
            subject: self.subject.clone(),
            fulltext: self.fulltext,
            sort: self.sort,
        }
    }

    /// Chip label: the non-empty text fields joined with a bullet.
    pub fn label(&self) -> String {
        [&self.title, &self.author, &self.subject]
            .into_iter()
            .filter(|field| !field.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" • ")
    }
}

/// One decoded page of search results.
#[derive(Debug, Default)]
pub struct SearchPage {
    pub docs: Vec<Document>,
    pub total: u64,
    /// Set when the body was usable but not shaped as expected.
    pub anomaly: Option<FinderError>,
}
