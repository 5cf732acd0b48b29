use movie_recommender::{
    api::{create_router, AppState},
    config::Config,
    repl,
    services::{CsvDataset, Recommender},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    // Build phase: everything below only reads the recommender
    let dataset = CsvDataset::new(&config.ratings_path, &config.movies_path);
    let settings = config.settings()?;
    let recommender =
        tokio::task::spawn_blocking(move || Recommender::from_source(&dataset, settings)).await??;

    let state = AppState::new(recommender);

    if config.interactive {
        let stdin = std::io::BufReader::new(std::io::stdin());
        repl::run_blocking(state.recommender, stdin, std::io::stdout()).await?;
        return Ok(());
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
