use anyhow::{Context, Result};
use clap::Parser;
use prompt_catalog::headless::HeadlessPage;
use prompt_catalog::scroll::ScrollMetrics;
use prompt_catalog::storage::{FileSystemFeed, PromptFeed};
use prompt_catalog::{App, ButtonKey, UiEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file holding the array of prompt records
    #[arg(long, default_value = "prompts.json")]
    feed: String,

    /// Page URL the catalog is opened at (query and fragment are honored)
    #[arg(long, default_value = "http://localhost/")]
    url: Url,

    /// Treat the page as a non-secure context
    #[arg(long)]
    insecure: bool,

    /// Pretend the privileged clipboard API does not exist
    #[arg(long)]
    no_clipboard_api: bool,
}

const HELP: &str = "commands: search <text> | tag <name> | clear | copy <id> | link <id> | scroll <y> <height> <viewport> | show | quit";

enum Command {
    Event(UiEvent),
    Show,
    Quit,
}

fn parse_command(line: &str, page: &HeadlessPage) -> Result<Command, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    match verb {
        "search" => Ok(Command::Event(page.type_search(rest))),
        "tag" => page
            .click_tag(rest)
            .map(Command::Event)
            .ok_or_else(|| format!("no tag button labelled {rest:?}")),
        "clear" => Ok(Command::Event(UiEvent::Clear)),
        "copy" | "link" => {
            let button = if verb == "copy" {
                ButtonKey::copy_code(rest)
            } else {
                ButtonKey::copy_link(rest)
            };
            page.click(&button)
                .map(Command::Event)
                .ok_or_else(|| format!("no card with id {rest:?} on the page"))
        }
        "scroll" => {
            let values: Vec<f64> = rest
                .split_whitespace()
                .map(str::parse)
                .collect::<Result<_, _>>()
                .map_err(|e| format!("invalid scroll metrics: {e}"))?;
            match values[..] {
                [y, height, viewport] => Ok(Command::Event(UiEvent::Scrolled(ScrollMetrics::new(
                    y, height, viewport,
                )))),
                _ => Err("scroll expects <y> <height> <viewport>".to_string()),
            }
        }
        "show" | "" => Ok(Command::Show),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(HELP.to_string()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays a clean session transcript.
    // Use `RUST_LOG=prompt_catalog=debug` to see filter and clipboard decisions.
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    tracing::info!(args = ?args, "Starting prompt catalog session");

    let feed = FileSystemFeed::new(&args.feed);
    let prompts = feed
        .load_prompts()
        .await
        .with_context(|| format!("Failed to load prompt feed from {}", args.feed))?;

    let page = HeadlessPage::new(args.url.clone())
        .with_secure_context(!args.insecure)
        .with_clipboard_api(!args.no_clipboard_api);

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut app = App::new(prompts, page.clone(), page.clone(), page.clipboard(), &events_tx)
        .context("Failed to set up card renderer")?;
    app.start().context("Failed to render catalog")?;
    println!("{}", page.snapshot());
    eprintln!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };
                match parse_command(&line, &page) {
                    Ok(Command::Event(event)) => {
                        if let Err(e) = app.handle(event).await {
                            tracing::error!(error = %e, "Failed to handle command");
                        }
                        println!("{}", page.snapshot());
                    }
                    Ok(Command::Show) => println!("{}", page.snapshot()),
                    Ok(Command::Quit) => break,
                    Err(message) => eprintln!("{message}"),
                }
            }
            Some(event) = events_rx.recv() => {
                if let Err(e) = app.handle(event).await {
                    tracing::error!(error = %e, "Failed to handle timer event");
                }
                println!("{}", page.snapshot());
            }
        }
    }

    tracing::info!("Session finished");
    Ok(())
}
