use crate::{
    error::{FinderError, Result},
    models::SortMode,
    view::Tab,
};
use once_cell::sync::Lazy;
use regex::Regex;

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\w+)="([^"]*)"|"([^"]*)"|(\S+)"#).expect("token pattern is valid")
});

pub const HELP: &str = "\
search [title=..] [author=..] [subject=..] [fulltext] [sort=<mode>]
                      new search; with no arguments, re-run the current form
more                  load the next page of results
sort <mode>           relevance | year_desc | year_asc | title_asc
fav <n>               save or unsave the n-th card of the visible tab
tab results|favorites switch tabs
recent                list recent searches
replay <n>            run the n-th recent search again
preset <n|name>       run a quick filter (Fantasy, Science Fiction, Mystery, Tolkien, Austen)
show                  redraw the screen
html                  print the screen as HTML
quit                  leave";

/// Fields given on a `search` line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchArgs {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub fulltext: bool,
    pub sort: Option<SortMode>,
}

/// One UI event typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(Option<SearchArgs>),
    LoadMore,
    Sort(SortMode),
    ToggleFavorite(usize),
    SwitchTab(Tab),
    Recent,
    Replay(usize),
    Preset(String),
    Show,
    Html,
    Help,
    Quit,
}

impl Command {
    /// Commands that hit the network and may take a while.
    pub fn is_search(&self) -> bool {
        matches!(
            self,
            Command::Search(_) | Command::LoadMore | Command::Replay(_) | Command::Preset(_)
        )
    }
}

fn tokenize(line: &str) -> Vec<(Option<String>, String)> {
    TOKEN
        .captures_iter(line)
        .map(|caps| {
            if let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) {
                (Some(key.as_str().to_lowercase()), value.as_str().to_string())
            } else if let Some(quoted) = caps.get(3) {
                (None, quoted.as_str().to_string())
            } else {
                let word = caps.get(4).map(|m| m.as_str()).unwrap_or_default();
                match word.split_once('=') {
                    Some((key, value)) if !key.is_empty() => {
                        (Some(key.to_lowercase()), value.to_string())
                    }
                    _ => (None, word.to_string()),
                }
            }
        })
        .collect()
}

fn parse_position(arg: Option<&String>, what: &str) -> Result<usize> {
    arg.ok_or_else(|| FinderError::InvalidInput(format!("Usage: {} <n>", what)))?
        .parse::<usize>()
        .map_err(|_| FinderError::InvalidInput(format!("'{}' needs a number", what)))
}

fn parse_search_args(tokens: &[(Option<String>, String)]) -> Result<SearchArgs> {
    let mut args = SearchArgs::default();
    for (key, value) in tokens {
        match (key.as_deref(), value.as_str()) {
            (Some("title"), value) => args.title = value.to_string(),
            (Some("author"), value) => args.author = value.to_string(),
            (Some("subject"), value) => args.subject = value.to_string(),
            (Some("sort"), value) => args.sort = Some(value.parse()?),
            (Some("fulltext"), value) => args.fulltext = matches!(value, "true" | "1" | "yes"),
            (None, "fulltext") => args.fulltext = true,
            (Some(key), _) => {
                return Err(FinderError::InvalidInput(format!(
                    "Unknown search field '{}'",
                    key
                )))
            }
            (None, word) => {
                return Err(FinderError::InvalidInput(format!(
                    "Expected field=value, got '{}'",
                    word
                )))
            }
        }
    }
    Ok(args)
}

/// Parse one input line. Blank lines parse to `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let tokens = tokenize(line);
    let Some(((_, name), rest)) = tokens.split_first() else {
        return Ok(None);
    };
    let first_arg = rest.first().map(|(_, value)| value);

    let command = match name.to_lowercase().as_str() {
        "search" | "s" if rest.is_empty() => Command::Search(None),
        "search" | "s" => Command::Search(Some(parse_search_args(rest)?)),
        "more" | "m" => Command::LoadMore,
        "sort" => Command::Sort(
            first_arg
                .ok_or_else(|| FinderError::InvalidInput("Usage: sort <mode>".to_string()))?
                .parse()?,
        ),
        "fav" | "f" => Command::ToggleFavorite(parse_position(first_arg, "fav")?),
        "tab" => Command::SwitchTab(
            first_arg
                .ok_or_else(|| FinderError::InvalidInput("Usage: tab results|favorites".into()))?
                .parse()?,
        ),
        "results" => Command::SwitchTab(Tab::SearchResults),
        "favorites" | "favs" => Command::SwitchTab(Tab::Favorites),
        "recent" => Command::Recent,
        "replay" | "r" => Command::Replay(parse_position(first_arg, "replay")?),
        "preset" | "p" if rest.is_empty() => {
            return Err(FinderError::InvalidInput("Usage: preset <n|name>".into()))
        }
        "preset" | "p" => Command::Preset(
            rest.iter()
                .map(|(_, value)| value.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        ),
        "show" => Command::Show,
        "html" => Command::Html,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => {
            return Err(FinderError::InvalidInput(format!(
                "Unknown command '{}'; type `help`",
                other
            )))
        }
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_with_quoted_values() {
        let command =
            parse_command(r#"search title="Harry Potter" subject=fantasy fulltext sort=year_desc"#)
                .unwrap()
                .unwrap();

        assert_eq!(
            command,
            Command::Search(Some(SearchArgs {
                title: "Harry Potter".into(),
                author: "".into(),
                subject: "fantasy".into(),
                fulltext: true,
                sort: Some(SortMode::YearDesc),
            }))
        );
        assert!(command.is_search());
    }

    #[test]
    fn test_bare_search_reruns_form() {
        assert_eq!(
            parse_command("search").unwrap(),
            Some(Command::Search(None))
        );
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_command("more").unwrap(), Some(Command::LoadMore));
        assert_eq!(
            parse_command("sort title_asc").unwrap(),
            Some(Command::Sort(SortMode::TitleAsc))
        );
        assert_eq!(
            parse_command("fav 3").unwrap(),
            Some(Command::ToggleFavorite(3))
        );
        assert_eq!(
            parse_command("tab favorites").unwrap(),
            Some(Command::SwitchTab(Tab::Favorites))
        );
        assert_eq!(
            parse_command("preset Science Fiction").unwrap(),
            Some(Command::Preset("Science Fiction".into()))
        );
        assert_eq!(parse_command("   ").unwrap(), None);
        assert!(!Command::Show.is_search());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse_command("sort newest").is_err());
        assert!(parse_command("fav two").is_err());
        assert!(parse_command("search isbn=123").is_err());
        assert!(parse_command("search dune").is_err());
        assert!(parse_command("launch").is_err());
        assert!(parse_command("replay").is_err());
    }
}
