use crate::{
    app::{Application, SearchOutcome},
    error::Result,
    handlers::command::{Command, SearchArgs, HELP},
    models::SearchForm,
    view::{FavoriteToggleView, HtmlRenderer, PageView, Renderer},
};
use tracing::debug;

/// What the prompt should show after a command.
#[derive(Debug)]
pub enum Reply {
    Page(PageView),
    /// Only the toggled control changed.
    Toggled {
        position: usize,
        toggle: FavoriteToggleView,
    },
    Text(String),
    /// Nothing to draw; a newer request owns the screen.
    Nothing,
    Quit,
}

fn form_from_args(args: SearchArgs, current: SearchForm) -> SearchForm {
    SearchForm {
        title: args.title,
        author: args.author,
        subject: args.subject,
        fulltext: args.fulltext,
        sort: args.sort.unwrap_or(current.sort),
    }
}

fn after_search(app: &Application, outcome: SearchOutcome) -> Reply {
    match outcome {
        SearchOutcome::Stale => Reply::Nothing,
        SearchOutcome::Ignored => Reply::Text("Nothing to load yet; run a search first.".into()),
        SearchOutcome::Applied | SearchOutcome::Failed(_) => Reply::Page(app.view()),
    }
}

/// Run one command against the application.
pub async fn handle_command(app: &Application, command: Command) -> Result<Reply> {
    debug!("Handling {:?}", command);

    let reply = match command {
        Command::Search(None) => after_search(app, app.submit().await),
        Command::Search(Some(args)) => {
            let form = form_from_args(args, app.form());
            after_search(app, app.submit_form(form).await)
        }
        Command::LoadMore => after_search(app, app.load_more().await),
        Command::Replay(position) => after_search(app, app.replay_recent(position).await?),
        Command::Preset(selector) => after_search(app, app.apply_quick_filter(&selector).await?),
        Command::Sort(mode) => Reply::Page(app.change_sort(mode)),
        Command::ToggleFavorite(position) => Reply::Toggled {
            position,
            toggle: app.toggle_favorite_at(position)?,
        },
        Command::SwitchTab(tab) => Reply::Page(app.switch_tab(tab)),
        Command::Recent => {
            let view = app.view();
            if view.recent.is_empty() {
                Reply::Text("No recent searches.".into())
            } else {
                Reply::Text(
                    view.recent
                        .iter()
                        .enumerate()
                        .map(|(index, chip)| format!("{:>2}. {}", index + 1, chip.label))
                        .collect::<Vec<_>>()
                        .join("\n"),
                )
            }
        }
        Command::Show => Reply::Page(app.view()),
        Command::Html => Reply::Text(HtmlRenderer.render_page(&app.view())),
        Command::Help => Reply::Text(HELP.to_string()),
        Command::Quit => Reply::Quit,
    };
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::command::parse_command;
    use crate::models::{Document, SearchPage, SearchQuery, SortMode};
    use crate::services::{MemoryStorage, QueryBuilder, SearchSource};
    use crate::view::{CardRenderer, Tab};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct EchoSource {
        queries: Mutex<Vec<SearchQuery>>,
    }

    #[async_trait]
    impl SearchSource for EchoSource {
        async fn search(&self, query: &SearchQuery) -> Result<SearchPage> {
            self.queries.lock().unwrap().push(query.clone());
            let title = query.title.clone().unwrap_or_else(|| "untitled".into());
            Ok(SearchPage {
                docs: vec![Document {
                    key: Some(format!("/works/{}", query.page)),
                    title: Some(format!("{} p{}", title, query.page)),
                    ..Default::default()
                }],
                total: 2,
                anomaly: None,
            })
        }
    }

    fn app(source: Arc<EchoSource>) -> Application {
        Application::new(
            source,
            Arc::new(MemoryStorage::new()),
            QueryBuilder::new(1),
            CardRenderer::new("https://covers.openlibrary.org/b/id", "https://openlibrary.org"),
        )
    }

    async fn run(app: &Application, line: &str) -> Reply {
        let command = parse_command(line).unwrap().unwrap();
        handle_command(app, command).await.unwrap()
    }

    #[tokio::test]
    async fn test_search_then_more() {
        let source = Arc::new(EchoSource::default());
        let app = app(source.clone());

        let Reply::Page(page) = run(&app, r#"search title="Dune" sort=title_asc"#).await else {
            panic!("expected a page");
        };
        assert_eq!(page.form.sort, SortMode::TitleAsc);
        assert!(page.load_more_visible);

        let Reply::Page(page) = run(&app, "more").await else {
            panic!("expected a page");
        };
        assert_eq!(page.results.cards().len(), 2);
        assert!(!page.load_more_visible);
        assert_eq!(source.queries.lock().unwrap()[1].page, 2);
    }

    #[tokio::test]
    async fn test_favorite_toggle_reply_is_in_place() {
        let app = app(Arc::new(EchoSource::default()));
        run(&app, "search title=Emma").await;

        match run(&app, "fav 1").await {
            Reply::Toggled { position, toggle } => {
                assert_eq!(position, 1);
                assert!(toggle.active);
            }
            other => panic!("unexpected reply {:?}", other),
        }

        let Reply::Page(page) = run(&app, "tab favorites").await else {
            panic!("expected a page");
        };
        assert_eq!(page.active_tab, Tab::Favorites);
        assert_eq!(page.status, "1 saved");
    }

    #[tokio::test]
    async fn test_more_before_search_and_bad_positions() {
        let app = app(Arc::new(EchoSource::default()));

        assert!(matches!(run(&app, "more").await, Reply::Text(_)));
        let replay = parse_command("replay 1").unwrap().unwrap();
        assert!(handle_command(&app, replay).await.is_err());
        let fav = parse_command("fav 1").unwrap().unwrap();
        assert!(handle_command(&app, fav).await.is_err());
    }

    #[tokio::test]
    async fn test_html_and_recent() {
        let app = app(Arc::new(EchoSource::default()));
        run(&app, "search title=Emma").await;

        let Reply::Text(html) = run(&app, "html").await else {
            panic!("expected text");
        };
        assert!(html.contains(r#"<h3 class="book-title">Emma p1</h3>"#));

        let Reply::Text(recent) = run(&app, "recent").await else {
            panic!("expected text");
        };
        assert_eq!(recent, " 1. Emma");
    }
}
