use crate::models::{SearchForm, SearchQuery};

/// Builds search queries from the form with a fixed page size.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder {
    page_size: u32,
}

impl QueryBuilder {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// First page of a fresh search. Blank fields are dropped; nothing else is validated.
    pub fn build(&self, form: &SearchForm) -> SearchQuery {
        SearchQuery {
            title: non_empty(&form.title),
            author: non_empty(&form.author),
            subject: non_empty(&form.subject),
            fulltext_only: form.fulltext,
            page: 1,
            page_size: self.page_size,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
