// src/main.rs

use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ayuni::config::CONFIG;
use ayuni::llm::{LlmDialogGenerator, TextGenClient};
use ayuni::notify::LoggingNotifier;
use ayuni::server;
use ayuni::state::AppState;
use ayuni::storage::AyuniStore;
use ayuni::tasks::TaskManager;

#[derive(Parser)]
#[command(name = "ayuni", version, about = "Ayuni companion backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the admin API with background batch loops (default)
    Serve,
    /// One decay pass over all eligible sessions, then exit
    DecayRun,
    /// One social interaction pass over all active companions, then exit
    SocialRun,
    /// Delete interactions older than the retention window, then exit
    Cleanup,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = Level::from_str(&CONFIG.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Ayuni backend");

    let pool = server::create_optimized_pool(&CONFIG.database_url).await?;
    server::run_migrations(&pool).await?;

    let store = Arc::new(AyuniStore::new(pool));
    let generator = Arc::new(LlmDialogGenerator::new(TextGenClient::from_config()?));
    let app_state = Arc::new(AppState::from_config(
        store,
        generator,
        Arc::new(LoggingNotifier),
    ));

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let mut tasks = TaskManager::new(app_state.clone());
            tasks.start();

            server::serve(app_state).await?;
        }
        Command::DecayRun => {
            let summary = app_state.decay.process_all_eligible_sessions().await?;
            info!(
                "Decay run: {} examined, {} decayed, {} triggered, {} failed",
                summary.processed, summary.decayed, summary.triggered, summary.failed
            );
        }
        Command::SocialRun => {
            let summary = app_state.social.process_all_aei_social().await?;
            info!(
                "Social run: {} companions, {} interactions, {} failures",
                summary.processed, summary.interactions, summary.failures
            );
        }
        Command::Cleanup => {
            let deleted = app_state.social.cleanup_old_interactions().await?;
            info!("Cleanup removed {} interactions", deleted);
        }
    }

    Ok(())
}
