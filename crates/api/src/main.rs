use anyhow::Result;
use prayaas_api::{build_app, AppConfig};
use prayaas_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("prayaas_api");

    let config = AppConfig::from_env();
    let app = build_app(&config);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(
        bind = %config.bind,
        rate_limit_max = config.rate_limit_max,
        session_ttl_secs = config.session_ttl.as_secs(),
        "prayaas advisory api started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
