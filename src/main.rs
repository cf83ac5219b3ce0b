use std::sync::Arc;

use anyhow::Context;
use movie_recommender_api::{
    catalog::load_catalog,
    config::Config,
    routes::{create_router, AppState},
    services::{Recommender, ReqwestTransport, TmdbPosterProvider},
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_json);

    // Catalog problems are fatal: nothing can be served without it
    let catalog = Arc::new(
        load_catalog(&config.movies_path, &config.similarity_path)
            .context("Failed to load movie catalog")?,
    );

    let posters = Arc::new(TmdbPosterProvider::new(
        Arc::new(ReqwestTransport::new(reqwest::Client::new())),
        Arc::new(config.tmdb_api_key.clone()),
        config.poster_retry_policy(),
        config.tmdb_api_url.clone(),
        config.tmdb_image_url.clone(),
    ));

    let recommender =
        Recommender::new(catalog.clone(), posters).with_limit(config.recommendation_count);

    let state = Arc::new(AppState {
        catalog,
        recommender,
    });
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(address = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
