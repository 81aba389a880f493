use crate::models::{Document, SortMode};

/// Return the documents in the order selected by `mode`.
///
/// The input is left untouched so relevance order can always be restored.
/// Sorting is stable: ties keep the server's order.
pub fn sort_documents(docs: &[Document], mode: SortMode) -> Vec<Document> {
    let mut sorted = docs.to_vec();
    match mode {
        SortMode::Relevance => {}
        SortMode::YearDesc => sorted.sort_by_key(|doc| std::cmp::Reverse(year(doc))),
        SortMode::YearAsc => sorted.sort_by_key(year),
        SortMode::TitleAsc => sorted.sort_by(|a, b| title(a).cmp(title(b))),
    }
    sorted
}

fn year(doc: &Document) -> i32 {
    doc.first_publish_year.unwrap_or(0)
}

fn title(doc: &Document) -> &str {
    doc.title.as_deref().unwrap_or("")
}
