use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub zarr_path: PathBuf,
    pub allow_write: bool,
    pub mount_name: Option<String>,
    pub allowed_origins: Vec<String>,
    pub service_host: String,
    pub service_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let zarr_path = PathBuf::from(
            env::var("ZARR_PATH").context("ZARR_PATH environment variable is required")?,
        );

        let allow_write = match env::var("ALLOW_WRITE") {
            Ok(value) => parse_bool(&value)
                .with_context(|| format!("ALLOW_WRITE must be a boolean, got '{value}'"))?,
            Err(_) => false,
        };

        let mount_name = env::var("MOUNT_NAME").ok().filter(|name| !name.is_empty());
        if let Some(name) = &mount_name {
            if name.contains('/') {
                bail!("MOUNT_NAME must be a single path segment, got '{name}'");
            }
        }

        let allowed_origins: Vec<String> = env::var("CORS_ALLOW_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let service_port = env::var("SERVICE_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = env::var("SERVICE_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        Ok(Config {
            zarr_path,
            allow_write,
            mount_name,
            allowed_origins,
            service_host,
            service_port,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Zarr store path: {}", self.zarr_path.display());
        tracing::info!(
            "  Write access: {}",
            if self.allow_write { "enabled" } else { "disabled" }
        );
        tracing::info!(
            "  Mount name: {}",
            self.mount_name.as_deref().unwrap_or("none")
        );
        if self.allowed_origins.is_empty() {
            tracing::info!("  CORS: disabled");
        } else {
            tracing::info!("  CORS allowed origins: {}", self.allowed_origins.join(", "));
        }
        tracing::info!(
            "  Service listening on: {}:{}",
            self.service_host,
            self.service_port
        );
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => bail!("expected a boolean"),
    }
}
