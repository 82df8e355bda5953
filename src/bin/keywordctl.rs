//! `keywordctl`: command-line front end for the keyword registry.
//!
//! # Usage
//!
//! ```text
//! keywordctl list --page 2
//! keywordctl add --username bob --channels "chan1, chan2"
//! keywordctl delete 3f2a... 91bc...
//! keywordctl clear-page --page 3
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use keyword_registry::client::{KeywordApi, SyncController};

#[derive(Parser, Debug)]
#[command(name = "keywordctl", about = "Manage channel keyword records")]
struct Args {
    /// Base URL of the keyword registry server.
    #[arg(long, env = "KEYWORDS_URL", default_value = "http://127.0.0.1:3001")]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show one page of keyword cards.
    List {
        #[arg(long, default_value_t = 1)]
        page: u64,
    },
    /// Create one keyword per comma-separated channel.
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        channels: String,
    },
    /// Delete keywords by id; several ids are deleted as one bulk action.
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Select every keyword on a page and delete them.
    ClearPage {
        #[arg(long, default_value_t = 1)]
        page: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let api = KeywordApi::new(args.url.clone()).context("failed to build HTTP client")?;
    let mut controller = SyncController::new(api);

    match args.command {
        Command::List { page } => {
            controller
                .jump_to(page)
                .await
                .with_context(|| format!("listing page {page}"))?;
            print_page(&controller);
        }
        Command::Add { username, channels } => {
            let created = controller.submit(&username, &channels).await?;
            println!("Created {} keyword(s)", created.len());
            print_page(&controller);
        }
        Command::Delete { ids } => {
            if let [id] = ids.as_slice() {
                controller.delete_one(id).await?;
                println!("Deleted {id}");
            } else {
                let deleted = controller.delete_ids(&ids).await?;
                println!("Deleted {deleted} keyword(s)");
            }
            print_page(&controller);
        }
        Command::ClearPage { page } => {
            controller.jump_to(page).await?;
            controller.set_all_selected(true);
            let deleted = controller.delete_selected().await?;
            println!("Deleted {deleted} keyword(s)");
            print_page(&controller);
        }
    }

    Ok(())
}

fn print_page(controller: &SyncController) {
    for card in controller.cards() {
        println!("{}\n", card.render());
    }
    println!(
        "{} of {}",
        controller.page_label(),
        controller.total_pages().max(1)
    );
}
