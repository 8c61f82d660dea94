use std::sync::Arc;

use anyhow::Context;

use beerstock_api::{app, config::ApiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env()?;
    beerstock_observability::init_with(config.log_format);

    let services = app::services::build_services(&config).await?;
    tracing::info!(store = services.backend(), "services ready");

    let app = app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
