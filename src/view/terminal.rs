use super::{CardView, CoverView, FavoriteToggleView, PageView, Renderer, ResultsView, Tab};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Renders views as styled text for an interactive terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalRenderer;

impl TerminalRenderer {
    fn render_tabs(&self, active: Tab) -> String {
        let tab = |label: &str, selected: bool| {
            if selected {
                style(format!("[{}]", label)).bold().cyan().to_string()
            } else {
                style(format!(" {} ", label)).dim().to_string()
            }
        };
        format!(
            "{} {}",
            tab("Results", active == Tab::SearchResults),
            tab("Favorites", active == Tab::Favorites)
        )
    }

    fn render_card_list(&self, cards: &[CardView]) -> String {
        cards
            .iter()
            .enumerate()
            .map(|(index, card)| {
                format!("{:>3}. {}", index + 1, self.render_card(card).replace('\n', "\n     "))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Renderer for TerminalRenderer {
    fn render_page(&self, page: &PageView) -> String {
        let mut out = Vec::new();

        if !page.recent.is_empty() {
            let chips: Vec<String> = page
                .recent
                .iter()
                .enumerate()
                .map(|(index, chip)| format!("({}) {}", index + 1, chip.label))
                .collect();
            out.push(format!("{} {}", style("Recent:").dim(), chips.join("  ")));
        }

        out.push(self.render_tabs(page.active_tab));
        if page.busy {
            out.push(style("Searching...").yellow().to_string());
        }
        if !page.status.is_empty() {
            out.push(style(&page.status).italic().to_string());
        }

        match page.active_tab {
            Tab::SearchResults => match &page.results {
                ResultsView::Cards(cards) if cards.is_empty() => {
                    out.push(style("No results.").dim().to_string())
                }
                ResultsView::Cards(cards) => out.push(self.render_card_list(cards)),
                ResultsView::Message(message) => out.push(style(message).red().to_string()),
            },
            Tab::Favorites if page.favorites.is_empty() => {
                out.push(style("No saved books yet.").dim().to_string())
            }
            Tab::Favorites => out.push(self.render_card_list(&page.favorites)),
        }

        if page.active_tab == Tab::SearchResults && page.load_more_visible {
            out.push(style("Type `more` to load more results.").dim().to_string());
        }

        out.join("\n")
    }

    fn render_card(&self, card: &CardView) -> String {
        let cover = match &card.cover {
            CoverView::Image { url, .. } => format!("cover: {}", url),
            CoverView::Placeholder { title } => format!("[no cover: {}]", title),
        };

        format!(
            "{}  {}\n{}\n{}\n{}: {}",
            style(&card.title).bold(),
            self.render_toggle(&card.favorite),
            card.meta,
            style(cover).dim(),
            card.link.text,
            style(&card.link.href).underlined()
        )
    }

    fn render_toggle(&self, toggle: &FavoriteToggleView) -> String {
        if toggle.active {
            style(toggle.label).yellow().to_string()
        } else {
            style(toggle.label).dim().to_string()
        }
    }
}

/// Spinner shown while a search is outstanding.
pub struct BusyIndicator {
    bar: ProgressBar,
}

impl BusyIndicator {
    pub fn start(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}"));
        bar.set_message(message.to_string());
        bar.enable_steady_tick(80);
        Self { bar }
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}
