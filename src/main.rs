//! orbisweep - bulk-delete your own orbi.kr posts.
//!
//! Logs into the forum with a headless browser, lists every post the account
//! still owns, and deletes an interactively selected subset.

mod browser;
mod config;
mod listing;
mod selection;
mod sweep;
mod ui;

use browser::ForumClient;
use config::SweepConfig;
use selection::Selection;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ui::Action;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they don't interleave with the prompts.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orbisweep=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = SweepConfig::from_env();

    // Credentials are validated before any browser is launched.
    let (username, password) = ui::prompt_credentials()?;

    ui::notice("Launching browser...");
    let client = ForumClient::launch(config).await?;

    if let Err(e) = client.login(&username, &password).await {
        ui::error(&format!("Login failed: {e}"));
        client.close().await;
        std::process::exit(1);
    }

    ui::notice("Collecting your posts...");
    let posts = listing::collect_posts(&client).await;

    if posts.is_empty() {
        ui::notice("No posts found (posts already removed by their author are excluded).");
        client.close().await;
        return Ok(());
    }

    ui::notice(&format!("Found {} posts.", posts.len()));
    let mut selection = Selection::new(posts);

    loop {
        match ui::choose_action(&selection)? {
            Action::EditSelection => ui::edit_selection(&mut selection)?,
            Action::SelectAll => selection.set_all(true),
            Action::ClearAll => selection.set_all(false),
            Action::Export => {
                let path = ui::prompt_export_path()?;
                match listing::export_json(Path::new(&path), &selection.posts()) {
                    Ok(()) => ui::notice(&format!("Saved {} posts to {path}.", selection.len())),
                    Err(e) => ui::error(&format!("Could not write {path}: {e}")),
                }
            }
            Action::DeleteSelected => {
                let chosen = selection.selected();
                if chosen.is_empty() {
                    ui::notice("Select at least one post first.");
                    continue;
                }
                if !ui::confirm_delete(chosen.len())? {
                    continue;
                }

                let report = sweep::run(&client, &chosen).await;
                ui::print_report(&report);
            }
            Action::Quit => break,
        }
    }

    client.close().await;
    Ok(())
}
