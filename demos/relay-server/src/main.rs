use std::time::Duration;

use pairline::prelude::*;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const BIND_VAR: &str = "PAIRLINE_BIND";
const IDLE_TIMEOUT_VAR: &str = "PAIRLINE_IDLE_TIMEOUT_SECS";

/// Builds the server config from optional environment overrides.
fn config_from(
    bind: Option<String>,
    idle_secs: Option<String>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let mut config = ServerConfig::default();
    if let Some(addr) = bind {
        config.bind_addr = addr;
    }
    if let Some(secs) = idle_secs {
        let secs: u64 = secs
            .trim()
            .parse()
            .map_err(|e| format!("{IDLE_TIMEOUT_VAR} must be whole seconds: {e}"))?;
        // 0 disables the timeout
        config.idle_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// Server bootstrap
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config_from(
        std::env::var(BIND_VAR).ok(),
        std::env::var(IDLE_TIMEOUT_VAR).ok(),
    )?;
    tracing::info!(addr = %config.bind_addr, "starting relay server");

    let server = PairlineServerBuilder::new().config(config).build().await?;

    server.run().await?;
    Ok(())
}
