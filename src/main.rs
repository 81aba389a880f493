use anyhow::Context;
use book_finder::{
    handlers::{handle_command, parse_command, Command, Reply, HELP},
    view::{BusyIndicator, Renderer, TerminalRenderer},
    Application, Config,
};
use log::info;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_reply(reply: Reply) -> bool {
    let renderer = TerminalRenderer;
    match reply {
        Reply::Page(page) => println!("{}\n", renderer.render_page(&page)),
        Reply::Toggled { position, toggle } => {
            println!("{:>3}. {}\n", position, renderer.render_toggle(&toggle))
        }
        Reply::Text(text) => println!("{}\n", text),
        Reply::Nothing => {}
        Reply::Quit => return false,
    }
    true
}

async fn run_command(app: Application, command: Command) -> bool {
    match handle_command(&app, command).await {
        Ok(reply) => print_reply(reply),
        Err(e) => {
            println!("{}\n", console::style(e).red());
            true
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup logging; stderr keeps it out of the rendered screen
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "book_finder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Loading configuration...");
    let config = Config::load().context("Failed to load configuration")?;
    let app = Application::from_config(&config)?;

    println!("{}\n", TerminalRenderer.render_page(&app.view()));
    if config.startup_search {
        let busy = BusyIndicator::start("Searching...");
        let outcome = app.startup(&config).await;
        busy.finish();
        if outcome.is_some() {
            print_reply(Reply::Page(app.view()));
        }
    }
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}\n{}\n", console::style(e).red(), HELP);
                continue;
            }
        };

        if command.is_search() {
            // Searches run in the background so the prompt stays responsive.
            println!("{}\n", console::style("Searching...").yellow());
            tokio::spawn(run_command(app.clone(), command));
        } else if !run_command(app.clone(), command).await {
            break;
        }
    }

    info!("Bye");
    Ok(())
}
