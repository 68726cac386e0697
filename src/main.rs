use std::net::SocketAddr;

use ads_companion::{config, router, AppState};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = config::from_env();
    if config.owner_id.is_none() {
        info!("no ADS_OWNER_ID configured; list endpoints will report an error until it is set");
    }

    let port = config.port;
    let state = AppState::new(config);
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
