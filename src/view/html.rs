use super::{CardView, CoverView, FavoriteToggleView, PageView, Renderer, ResultsView, Tab};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

/// Renders views as HTML fragments using the catalog page's class names.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    fn render_message(&self, message: &str) -> String {
        format!(
            r#"<div class="book-card"><div class="no-cover" data-title="{}"></div></div>"#,
            attr(message)
        )
    }

    fn render_cards(&self, cards: &[CardView]) -> String {
        cards.iter().map(|card| self.render_card(card)).collect()
    }
}

impl Renderer for HtmlRenderer {
    fn render_page(&self, page: &PageView) -> String {
        let results_hidden = page.active_tab != Tab::SearchResults;
        let results = match &page.results {
            ResultsView::Cards(cards) => self.render_cards(cards),
            ResultsView::Message(message) => self.render_message(message),
        };
        let recent: String = page
            .recent
            .iter()
            .map(|chip| format!(r#"<button class="chip">{}</button>"#, text(&chip.label)))
            .collect();

        let mut html = String::new();
        html.push_str(&format!(r#"<div id="recent">{}</div>"#, recent));
        html.push_str(&format!(r#"<p id="count">{}</p>"#, text(&page.status)));
        html.push_str(&format!(
            r#"<section class="results" aria-busy="{}">"#,
            page.busy
        ));
        html.push_str(&format!(
            r#"<div id="results" role="list"{}>{}</div>"#,
            if results_hidden { " hidden" } else { "" },
            results
        ));
        html.push_str(&format!(
            r#"<div id="favorites" role="list"{}>{}</div>"#,
            if results_hidden { "" } else { " hidden" },
            self.render_cards(&page.favorites)
        ));
        html.push_str(&format!(
            r#"<button id="loadMore"{}>Load more</button>"#,
            if page.load_more_visible { "" } else { " hidden" }
        ));
        html.push_str("</section>");
        html
    }

    fn render_card(&self, card: &CardView) -> String {
        let cover = match &card.cover {
            CoverView::Image { url, alt } => format!(
                r#"<img class="cover" alt="{}" loading="lazy" src="{}">"#,
                attr(alt),
                attr(url)
            ),
            CoverView::Placeholder { title } => format!(
                r#"<div class="cover no-cover" data-title="{}"></div>"#,
                attr(title)
            ),
        };

        format!(
            concat!(
                r#"<article class="book-card" role="listitem">{}"#,
                r#"<div class="book-body"><h3 class="book-title">{}</h3><div class="meta">{}</div></div>"#,
                r#"<div class="actions">{}"#,
                r#"<a class="link" target="_blank" rel="noreferrer" href="{}">{}</a></div></article>"#
            ),
            cover,
            text(&card.title),
            text(&card.meta),
            self.render_toggle(&card.favorite),
            attr(&card.link.href),
            text(card.link.text),
        )
    }

    fn render_toggle(&self, toggle: &FavoriteToggleView) -> String {
        format!(
            r#"<button class="fav{}">{}</button>"#,
            if toggle.active { " active" } else { "" },
            text(toggle.label)
        )
    }
}
