use std::{
    future::{Future, IntoFuture},
    net::SocketAddr,
    path::Path,
    time::Duration,
};

use axum::Router;
use configs::{AppConfig, ServerConfig};
use tokio::{net::TcpListener, sync::oneshot};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Read `config.toml` (or `CONFIG_PATH`). A missing file falls back to env
/// vars; a file that exists but does not validate is an error.
pub fn load_config() -> Result<AppConfig, StartupError> {
    let path = configs::config_path();
    if !Path::new(&path).exists() {
        warn!(%path, "config file not found; using environment and defaults");
        return AppConfig::load_env_and_validate()
            .map_err(|e| StartupError::InvalidConfig(format!("environment: {e}")));
    }
    AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(format!("{path}: {e}")))
}

fn bind_addr(cfg: &ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.host, cfg.port).parse()?)
}

/// Build the app from `cfg` and serve it until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState::from_config(&cfg.store)?;
    let app = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, backend = ?cfg.store.backend, "starting kvstore server");
    let listener = TcpListener::bind(addr).await?;
    serve(listener, app, shutdown, Duration::from_secs(cfg.server.shutdown_grace_secs)).await
}

/// Serve `app` on an already bound listener. After `shutdown` fires, open
/// connections get `grace` to finish; past that, `serve` returns `Ok`
/// without waiting for them.
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
    grace: Duration,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            let _ = signalled_tx.send(());
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        res = &mut server => return Ok(res?),
        _ = signalled_rx => {
            info!(grace_secs = grace.as_secs(), "shutdown requested; draining connections");
        }
    }

    match tokio::time::timeout(grace, server).await {
        Ok(res) => Ok(res?),
        Err(_) => {
            warn!(grace_secs = grace.as_secs(), "grace period elapsed; dropping open connections");
            Ok(())
        }
    }
}
