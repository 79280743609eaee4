//! Photo Search CLI
//!
//! Searches the public photo feed for a keyword and prints the results.
//! Without a keyword, reads one keyword per line from stdin.

use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use photo_search::{
    Config, LogFormat, PhotoSearchClient, SearchCoordinator, SearchState, SearchStatus,
};

#[derive(Parser)]
#[command(name = "photo-search")]
#[command(about = "Search the public photo feed by keyword")]
struct Cli {
    /// Keyword to search for (reads keywords from stdin when omitted)
    keyword: Option<String>,

    /// Print the search state as JSON
    #[arg(long)]
    json: bool,

    /// Path to a TOML config file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Override the feed endpoint
    #[arg(long, env = "PHOTO_SEARCH_ENDPOINT")]
    endpoint: Option<String>,

    /// More logging on stderr (-v: queries, -vv: HTTP client)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log line format on stderr
    #[arg(long, value_enum, env = "LOG_FORMAT", default_value_t = LogFormat::Text, ignore_case = true)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    photo_search::init_tracing(cli.verbose, cli.log_format)?;

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    if let Some(endpoint) = cli.endpoint {
        config.feed.endpoint = endpoint;
    }
    let client = PhotoSearchClient::from_config(&config)?;
    tracing::info!("Feed endpoint: {}", client.template().endpoint());
    let coordinator = SearchCoordinator::new(Arc::new(client), config.messages.clone());

    match cli.keyword {
        Some(keyword) => {
            coordinator.search(&keyword).await;
            let state = coordinator.state();
            render(&state, cli.json)?;
            if state.status == SearchStatus::Failed {
                std::process::exit(1);
            }
        }
        None => interactive(&coordinator, cli.json).await?,
    }

    Ok(())
}

/// One search per line of stdin until EOF
async fn interactive(coordinator: &SearchCoordinator, json: bool) -> Result<()> {
    render(&coordinator.state(), json)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let keyword = line.trim();
        coordinator.search(keyword).await;
        render(&coordinator.state(), json)?;
    }

    Ok(())
}

fn render(state: &SearchState, json: bool) -> Result<()> {
    let mut out = std::io::stdout().lock();
    write_state(&mut out, state, json)
}

fn write_state(out: &mut impl Write, state: &SearchState, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, state)?;
        writeln!(out)?;
        out.flush()?;
        return Ok(());
    }

    if !state.keyword.is_empty() {
        writeln!(out, "[{}] {} result(s)", state.keyword, state.results.len())?;
    }
    writeln!(out, "{}", state.message)?;
    for (i, photo) in state.results.iter().enumerate() {
        writeln!(out, "{:>3}. {}", i + 1, photo.title)?;
        writeln!(out, "     link:  {}", photo.link)?;
        writeln!(out, "     image: {}", photo.image)?;
        if !photo.description.is_empty() {
            writeln!(out, "     {}", photo.description)?;
        }
    }
    out.flush()?;

    Ok(())
}
