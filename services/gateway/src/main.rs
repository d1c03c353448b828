use gateway::auth::AuthKeys;
use gateway::config::Config;
use gateway::seed::seed_demo_data;
use gateway::{create_router, AppState};
use matching_engine::{InMemoryListings, MatchEngine};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    tracing::info!("starting marketplace gateway");

    let listings = Arc::new(InMemoryListings::new());
    let auth = AuthKeys::new(&config.auth_secret);
    seed_demo_data(&listings, &auth);

    let directory: Arc<dyn matching_engine::ListingDirectory> = listings.clone();
    let engine = match &config.journal_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "journaling to disk");
            MatchEngine::with_journal(directory, dir)?
        }
        None => {
            tracing::warn!("MARKET_JOURNAL_DIR unset; running without durability");
            MatchEngine::in_memory(directory)
        }
    };

    let state = AppState::new(engine, listings, auth);
    let app = create_router(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
