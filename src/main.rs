use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use solar_savings_estimator::{build_app, build_state, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "solar_savings_estimator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 1. Load configuration
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());
    let config = Config::load(&config_path)
        .map_err(|e| anyhow::anyhow!("failed to load {}: {}", config_path, e))?;
    let estimator = &config.estimator;
    tracing::info!(
        path = %config_path,
        tariff = estimator.average_tariff,
        efficiency = estimator.system_efficiency,
        panel_kw = estimator.panel_unit_power_kw,
        default_region = estimator.default_region.as_str(),
        "configuration loaded"
    );

    // 2. Shared state
    let server_port = config.server.port;
    let shared = build_state(config)?;

    // 3. HTTP server
    let app = build_app(shared);
    let addr = SocketAddr::from(([0, 0, 0, 0], server_port));
    tracing::info!("API server listening on http://{}", addr);
    tracing::info!("Scalar UI: http://{}/scalar", addr);

    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
