//! PropDeck Shell Server
//!
//! Serves the role-gated dashboard for the signed-in user: resolves the
//! session against the hosted backend, mounts a gate on every protected
//! route group, and dispatches the root route by role.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PROPDECK_CONFIG` | - | Path to a TOML config file |
//! | `PROPDECK_HTTP_HOST` | `127.0.0.1` | Shell bind address |
//! | `PROPDECK_HTTP_PORT` | `4600` | Shell HTTP port |
//! | `PROPDECK_BACKEND_URL` | `http://localhost:54321` | Hosted backend base URL |
//! | `PROPDECK_BACKEND_ANON_KEY` | - | Publishable backend API key |
//! | `PROPDECK_DEV_MODE` | `false` | Verbose gate decision logging |
//! | `RUST_LOG` | `info` | Log level |

use std::sync::Arc;

use anyhow::Result;
use tokio::{net::TcpListener, signal};
use tracing::info;

use pd_access::{RoleLandingTable, RouteTable, SessionResolver};
use pd_config::ConfigLoader;
use pd_platform::{shell_router, HostedIdentityProvider, HostedRoleStore, ShellState};

#[tokio::main]
async fn main() -> Result<()> {
    pd_common::logging::init_logging("pd-shell");

    info!("Starting PropDeck Shell");

    let config = ConfigLoader::new().load()?;

    let identity = Arc::new(HostedIdentityProvider::new(&config.backend)?);
    let roles = Arc::new(HostedRoleStore::new(&config.backend, identity.clone())?);
    let resolver = Arc::new(SessionResolver::new(identity.clone(), roles));

    // Initial resolution before the first request lands.
    resolver.initialize().await;
    info!(session = ?resolver.current(), "session resolved");

    // Forward provider auth events to the resolver for the lifetime of the
    // process.
    {
        let mut events = identity.subscribe();
        let resolver = resolver.clone();
        tokio::spawn(async move {
            while let Ok(event) = events.recv().await {
                resolver.handle_auth_event(event).await;
            }
        });
    }

    let table = RouteTable::standard().map_err(|e| anyhow::anyhow!("route table: {e}"))?;
    let app = shell_router(ShellState {
        resolver,
        identity,
        landing: Arc::new(RoleLandingTable::standard()),
        table: Arc::new(table),
        dev_mode: config.dev_mode,
    });

    let addr = format!("{}:{}", config.http.host, config.http.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Shell listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shell stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("Shutdown signal received");
}
