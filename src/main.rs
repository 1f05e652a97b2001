//! FlickFind CLI
//!
//! With no subcommand the interactive search UI starts. `search` runs a
//! single query and prints the page without entering the UI.

use clap::{Parser, Subcommand};
use console::style;
use flickfind::{CatalogClient, CatalogError, Config};
use indicatif::ProgressBar;
use std::time::Duration;

/// FlickFind - terminal movie search
///
/// Searches the TMDB catalog: type a title, page through the results,
/// open a movie's details.
#[derive(Parser)]
#[command(name = "flickfind")]
#[command(author = "FlickFind Contributors")]
#[command(version)]
#[command(about = "Search the TMDB movie catalog from your terminal", long_about = None)]
struct Cli {
    /// Bearer token for the catalog API (defaults to $TMDB_API_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one search and print the results
    Search {
        /// Search text (use -- before text if it starts with -)
        #[arg(allow_hyphen_values = true)]
        query: String,

        /// Result page to request
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },
}

fn main() {
    dotenvy::dotenv().ok();
    flickfind::logging::init();
    tracing::info!(version = flickfind::VERSION, "flickfind starting up");

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // The credential is resolved once here and injected into the client;
    // a missing token fails fast instead of surfacing as a 401 later.
    let token = match cli.token.or_else(|| std::env::var("TMDB_API_TOKEN").ok()) {
        Some(token) if !token.trim().is_empty() => token,
        _ => return Err(CatalogError::MissingToken.into()),
    };

    let client = CatalogClient::new(&Config::new(token))?;

    match cli.command {
        None => flickfind::tui::run(client),
        Some(Commands::Search {
            query,
            page,
            output,
        }) => cmd_search(&client, &query, page, &output),
    }
}

/// One-shot search command implementation
fn cmd_search(
    client: &CatalogClient,
    query: &str,
    page: u32,
    output_format: &str,
) -> anyhow::Result<()> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        anyhow::bail!("nothing to search for");
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Searching for '{trimmed}'..."));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = client.search(trimmed, page.max(1));
    spinner.finish_and_clear();
    let found = result?;

    if output_format == "json" {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    if found.results.is_empty() {
        println!(
            "{} No movies found for your request.",
            style("!").yellow().bold()
        );
        return Ok(());
    }

    println!(
        "{} {} results for '{}' (page {}/{})",
        style("\u{2713}").green().bold(),
        style(flickfind::format_count(u64::from(found.total_results))).yellow(),
        style(trimmed).cyan(),
        found.page,
        found.total_pages,
    );
    println!();

    for (i, movie) in found.results.iter().enumerate() {
        let year = movie.year().map(|y| format!(" ({y})")).unwrap_or_default();
        println!(
            "  {} {}{}",
            style(format!("{:3}.", i + 1)).dim(),
            style(&movie.title).cyan(),
            style(year).dim(),
        );
        if movie.vote_count > 0 {
            println!(
                "      {} {:.1}/10 ({} votes)",
                style("Rating:").dim(),
                movie.vote_average,
                flickfind::format_count(movie.vote_count)
            );
        }
        if !movie.overview.is_empty() {
            println!("      {}", snippet(&movie.overview, 100));
        }
    }

    Ok(())
}

/// First `max_chars` characters of `text`, with a marker when cut short
fn snippet(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}
