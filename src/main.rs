//! nfetch - Top headlines and news search from NewsAPI
//!
//! Reads the API key from `GNEWS_API_KEY`, runs the requested query (or a
//! demo of every query) and saves the query cache on the way out, whether
//! the query succeeded or not.

use std::error::Error;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use nfetch::cli::{Cli, Command};
use nfetch::config::ClientConfig;
use nfetch::data::{Article, Category, NewsClient};

/// Installs the log subscriber, writing to stderr so stdout only carries articles
fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nfetch=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_article(article: &Article) {
    println!(
        "author: {}, title: {}",
        article.author.as_deref().unwrap_or("None"),
        article.title.as_deref().unwrap_or("None")
    );
}

fn print_all<'a>(articles: impl IntoIterator<Item = &'a Article>) {
    for article in articles {
        print_article(article);
    }
}

/// Walks through every query once
async fn run_demo(client: &mut NewsClient) -> Result<(), Box<dyn Error>> {
    let top_n = client.fetch_n_top(100).await?.len();
    println!("Leading articles (up to 100): {}", top_n);

    let all_top = client.fetch_top_headlines("us", Category::General).await?;
    println!("Total leading articles: {}", all_top.len());
    print_all(all_top);

    print_all(client.search_by_title("AI", 5).await?);
    print_all(client.search_for_article("ChatGPT", 5).await?);
    print_all(client.search_by_author("bbc").await?);

    Ok(())
}

async fn run(client: &mut NewsClient, command: Option<Command>) -> Result<(), Box<dyn Error>> {
    match command {
        None => run_demo(client).await?,
        Some(Command::Top {
            limit,
            country,
            category,
        }) => {
            let articles = client.fetch_top_headlines(&country, category).await?;
            let shown = limit.map_or(articles.len(), |n| n.min(articles.len()));
            print_all(&articles[..shown]);
        }
        Some(Command::Title { term, limit }) => {
            print_all(client.search_by_title(&term, limit).await?);
        }
        Some(Command::Search { term, limit }) => {
            print_all(client.search_for_article(&term, limit).await?);
        }
        Some(Command::Author { substring }) => {
            print_all(client.search_by_author(&substring).await?);
        }
        Some(Command::ClearCache) => {
            client.clear_cache()?;
            println!("Cache cleared");
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    let cli = Cli::parse();
    let config = cli.configure(ClientConfig::from_env()?);
    let mut client = NewsClient::new(config)?;

    let result = run(&mut client, cli.command).await;

    // Save whatever was fetched before reporting any failure
    let saved = client.shutdown();
    if let Err(e) = &result {
        error!(error = %e, "Query failed");
    }
    result?;
    saved?;

    Ok(())
}
