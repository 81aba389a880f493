use crate::models::SearchForm;
use once_cell::sync::Lazy;

/// A quick-filter button that fills the text fields of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickFilter {
    pub label: &'static str,
    pub title: &'static str,
    pub author: &'static str,
    pub subject: &'static str,
}

impl QuickFilter {
    /// Overwrite the text fields; fulltext and sort keep their current values.
    pub fn apply(&self, form: &mut SearchForm) {
        form.title = self.title.to_string();
        form.author = self.author.to_string();
        form.subject = self.subject.to_string();
    }
}

pub static QUICK_FILTERS: Lazy<Vec<QuickFilter>> = Lazy::new(|| {
    vec![
        QuickFilter {
            label: "Fantasy",
            title: "",
            author: "",
            subject: "fantasy",
        },
        QuickFilter {
            label: "Science Fiction",
            title: "",
            author: "",
            subject: "science_fiction",
        },
        QuickFilter {
            label: "Mystery",
            title: "",
            author: "",
            subject: "mystery",
        },
        QuickFilter {
            label: "Tolkien",
            title: "",
            author: "J.R.R. Tolkien",
            subject: "",
        },
        QuickFilter {
            label: "Austen",
            title: "",
            author: "Jane Austen",
            subject: "",
        },
    ]
});

/// Look a preset up by 1-based position or case-insensitive label.
pub fn find_quick_filter(selector: &str) -> Option<&'static QuickFilter> {
    let selector = selector.trim();
    if let Ok(position) = selector.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|index| QUICK_FILTERS.get(index));
    }
    QUICK_FILTERS
        .iter()
        .find(|filter| filter.label.eq_ignore_ascii_case(selector))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortMode;

    #[test]
    fn test_apply_clears_unset_fields_only() {
        let mut form = SearchForm {
            title: "Harry Potter".into(),
            author: "Rowling".into(),
            subject: "".into(),
            fulltext: true,
            sort: SortMode::YearAsc,
        };

        find_quick_filter("fantasy").unwrap().apply(&mut form);

        assert_eq!(form.title, "");
        assert_eq!(form.author, "");
        assert_eq!(form.subject, "fantasy");
        assert!(form.fulltext);
        assert_eq!(form.sort, SortMode::YearAsc);
    }

    #[test]
    fn test_lookup_by_position_and_label() {
        assert_eq!(find_quick_filter("4").unwrap().label, "Tolkien");
        assert_eq!(find_quick_filter("Science Fiction").unwrap().subject, "science_fiction");
        assert!(find_quick_filter("0").is_none());
        assert!(find_quick_filter("poetry").is_none());
    }
}
