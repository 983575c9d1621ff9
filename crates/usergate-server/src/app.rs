//! Application lifecycle: startup, serving, and graceful shutdown.

use crate::di::build_module;
use crate::startup::{ensure_super_user, print_startup_info};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use usergate_config::{ConfigLoader, ConfigReceiver, ConfigWatcher};
use usergate_core::telemetry::init_logging;
use usergate_core::{UsergateError, UsergateResult};
use usergate_repository::{DatabasePool, DatabasePoolInterface};
use usergate_rest::create_router;

/// Runs the server until SIGINT or SIGTERM.
///
/// Startup order: configuration and logging, config watcher, database and
/// migrations, DI module (with the Redis pool), default super user, HTTP.
/// Any startup failure is returned.
pub async fn run(loader: ConfigLoader) -> UsergateResult<()> {
    let config = loader.load()?;
    let logging = init_logging(
        &config.observability.log_level,
        config.observability.log_format,
    )?;

    info!("Starting Usergate Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (watcher, config_rx) = ConfigWatcher::new(loader, config.clone());
    let watcher_task = watcher.spawn(shutdown_rx.clone());
    let log_level_task = spawn_log_level_updater(
        config_rx,
        move |level| logging.set_level(level),
        shutdown_rx,
    );

    let database = DatabasePool::connect(&config.database).await?;
    database.run_migrations().await?;

    let module = build_module(&database, &config.redis, &config.service)?;
    ensure_super_user(module.user_service().as_ref(), &config.app).await?;

    let router = create_router(module.as_ref(), &config.server);
    let addr = config.server.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| UsergateError::Internal(format!("Failed to bind {addr}: {e}")))?;
    print_startup_info(&config.server);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| UsergateError::Internal(format!("REST server error: {e}")));

    shutdown_tx.send_replace(true);
    for task in [watcher_task, log_level_task] {
        if let Err(e) = task.await {
            warn!(error = %e, "Background task ended abnormally");
        }
    }
    module.database().close().await;

    info!("Server shutdown complete");
    served
}

/// Re-applies `observability.log_level` whenever a new config snapshot
/// changes it. `apply` receives the new filter directives.
pub fn spawn_log_level_updater<F>(
    mut config_rx: ConfigReceiver,
    apply: F,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    F: Fn(&str) -> UsergateResult<()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut current = config_rx.borrow_and_update().observability.log_level.clone();

        loop {
            tokio::select! {
                changed = config_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let level = config_rx.borrow_and_update().observability.log_level.clone();
                    if level == current {
                        continue;
                    }
                    match apply(&level) {
                        Ok(()) => {
                            info!(level = %level, "Log level updated");
                            current = level;
                        }
                        Err(e) => warn!(error = %e, "Keeping previous log level"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
    })
}

/// Completes on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
