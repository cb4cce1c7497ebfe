use anyhow::Context;
use synergia_api::{app, AppState};
use synergia_store::{app_config::Config, open_repository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "synergia_api=debug,synergia_store=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;

    let bookings = open_repository(&config.database).await;
    let app = app(AppState::new(bookings));

    let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.server.host, config.server.port))?;
    tracing::info!("Synergia Event Booking API running on port {}", config.server.port);

    axum::serve(listener, app).await?;
    Ok(())
}
