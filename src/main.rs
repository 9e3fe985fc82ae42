mod config;
mod error;
mod handlers;
mod routes;
mod server;
mod source;
mod state;
mod store;

use anyhow::Context;
use config::Config;
use source::ZarrSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    tracing::info!("zarr-serve starting");

    let config = Config::from_env()?;
    config.log_startup();

    let source = ZarrSource::open(&config.zarr_path, config.allow_write)
        .with_context(|| format!("failed to open zarr source at {}", config.zarr_path.display()))?;
    tracing::info!(
        "Opened {:?} node, access policy: {:?}",
        source.kind(),
        server::AccessPolicy::for_source(&source)
    );

    let app = server::build_app(&source, config.mount_name.as_deref(), &config.allowed_origins)?;

    let listener =
        tokio::net::TcpListener::bind((config.service_host.as_str(), config.service_port))
            .await
            .with_context(|| {
                format!(
                    "failed to bind {}:{}",
                    config.service_host, config.service_port
                )
            })?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
