use std::process::ExitCode;

use common::utils::logging::{init_logging as common_init_logging, LogFormat};
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_logging() {
    // load .env first so RUST_LOG and LOG_FORMAT from it take effect
    dotenv().ok();
    let format = LogFormat::from_env();
    common_init_logging(format);
    info!(
        service = "kvstore",
        event = "logger_init",
        format = ?format,
        "tracing subscriber initialized"
    );
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(
            service = "kvstore",
            event = "signal_error",
            error = %e,
            "failed to listen for Ctrl+C"
        );
        std::future::pending::<()>().await;
    }
    info!(service = "kvstore", event = "shutdown_signal", "received Ctrl+C, shutting down");
}

fn main() -> ExitCode {
    init_logging();

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "kvstore",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let cfg = match server::startup::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "kvstore", event = "config_invalid", error = %e, "refusing to start");
            return ExitCode::FAILURE;
        }
    };
    let worker_threads = cfg.server.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads {
        builder.worker_threads(w);
    }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(
                service = "kvstore",
                event = "runtime_build_failed",
                error = %e,
                "failed to build tokio runtime"
            );
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "kvstore",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "kvstore service starting"
    );

    rt.block_on(async move {
        match server::run(cfg, shutdown_signal()).await {
            Ok(()) => {
                info!(
                    service = "kvstore",
                    event = "stop",
                    %service_id,
                    pid,
                    "kvstore stopped normally"
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(
                    service = "kvstore",
                    event = "run_failed",
                    error = %e,
                    "server::run returned error"
                );
                ExitCode::FAILURE
            }
        }
    })
}
