use std::{path::PathBuf, process::ExitCode, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use board_core::{
    ActionOutcome, ActivityBoard, BoardEvent, HttpDirectoryClient, PageState, RefreshOutcome,
};
use clap::{Parser, Subcommand};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod report;
mod settings;

#[derive(Parser, Debug)]
#[command(about = "Browse and manage extracurricular activity signups")]
struct Args {
    /// Base url of the activity directory service.
    #[arg(long)]
    server_url: Option<String>,
    /// Settings file; defaults to ./board.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every activity with its roster.
    List,
    /// Write the page as HTML.
    Render {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Signup {
        #[arg(long)]
        activity: String,
        #[arg(long)]
        email: String,
    },
    Unregister {
        #[arg(long)]
        activity: String,
        #[arg(long)]
        email: String,
    },
    /// Refresh periodically and log board events until interrupted.
    Watch {
        #[arg(long, default_value_t = 10)]
        interval_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();
    let args = Args::parse();

    let mut settings = settings::load_settings(args.config.as_deref())?;
    if let Some(url) = args.server_url {
        settings.server_url = url;
    }

    let client = HttpDirectoryClient::with_timeout(&settings.server_url, settings.request_timeout())
        .with_context(|| format!("cannot use server url '{}'", settings.server_url))?;
    let page = Arc::new(PageState::new());
    let board = Arc::new(ActivityBoard::new(
        Arc::new(client),
        page.clone(),
        settings.board_config(),
    ));

    let refreshed = board.mount().await;
    let ok = match args.command {
        Command::List => {
            print!("{}", report::page_text(&page.snapshot().await));
            matches!(refreshed, RefreshOutcome::Applied { .. })
        }
        Command::Render { out } => {
            let html = page.html().await.context("failed to render page")?;
            match out {
                Some(path) => {
                    std::fs::write(&path, html)
                        .with_context(|| format!("failed to write '{}'", path.display()))?;
                    info!(path = %path.display(), "page written");
                }
                None => print!("{html}"),
            }
            matches!(refreshed, RefreshOutcome::Applied { .. })
        }
        Command::Signup { activity, email } => {
            page.fill_form(email, activity).await;
            let outcome = board.submit_form().await;
            print!("{}", report::page_text(&page.snapshot().await));
            outcome == ActionOutcome::Succeeded
        }
        Command::Unregister { activity, email } => {
            let outcome = board.submit_unregister(&activity, &email).await;
            print!("{}", report::page_text(&page.snapshot().await));
            outcome == ActionOutcome::Succeeded
        }
        Command::Watch { interval_secs } => {
            watch(board.clone(), Duration::from_secs(interval_secs.max(1))).await;
            true
        }
    };

    board.unmount().await;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn watch(board: Arc<ActivityBoard>, interval: Duration) {
    let mut events = board.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "watch fell behind board events");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            match event {
                BoardEvent::Refreshed { activities, .. } => {
                    println!("refreshed: {activities} activities")
                }
                BoardEvent::RefreshFailed { reason, .. } => println!("refresh failed: {reason}"),
                BoardEvent::StaleRefreshDiscarded { ticket } => {
                    println!("discarded stale refresh #{ticket}")
                }
                BoardEvent::FeedbackShown(feedback) => println!("message: {}", feedback.text),
                BoardEvent::FeedbackHidden => println!("message hidden"),
            }
        }
    });

    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                board.refresh().await;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    printer.abort();
}
