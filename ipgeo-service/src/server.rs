//! Process lifecycle: startup, serving and graceful shutdown.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{extract::Request, Router};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use ipgeo::{LookupService, MaxMindDatabase};
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tower::Service;

use crate::config::Config;
use crate::routes::create_router;
use crate::AppState;

/// Time in-flight requests get to finish once shutdown starts.
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Errors that end the serving phase.
#[derive(Error, Debug)]
pub enum ServerError {
    /// In-flight requests were still running when the grace period ran out.
    #[error("server forced to shutdown: {open} connections still open after {grace:?}")]
    GracePeriodElapsed { grace: Duration, open: usize },
}

/// Run the service until SIGINT or SIGTERM.
pub async fn run(config: Config) -> anyhow::Result<()> {
    run_until(config, shutdown_signal()).await
}

/// Run the service until `shutdown` completes.
///
/// The database is opened before the listener is bound, so a bad
/// `GEO_FILE` fails startup without ever accepting a connection. The
/// database is closed after serving ends, whatever the outcome.
pub async fn run_until<F>(config: Config, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!(mode = %config.mode, "Starting ipgeo service");

    let database = MaxMindDatabase::open(&config.geo_file)
        .with_context(|| format!("Failed to open geo database {}", config.geo_file.display()))?;

    let info = database.metadata();
    tracing::info!(
        path = %database.path().display(),
        database_type = %info.database_type,
        build_epoch = info.build_epoch,
        ip_version = info.ip_version,
        node_count = info.node_count,
        "Geo database opened"
    );

    let state = Arc::new(AppState::new(LookupService::new(database), config.mode));
    let app = create_router(state.clone());

    let addr = config.listen_addr();
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            drop(app);
            close_database(state);
            return Err(e).with_context(|| format!("Failed to bind {addr}"));
        }
    };

    tracing::info!("Listening on http://{}", listener.local_addr()?);

    let result = serve_with_grace(listener, app, shutdown, SHUTDOWN_GRACE_PERIOD).await;
    close_database(state);
    result?;

    tracing::info!("Server exiting");
    Ok(())
}

/// Serve `app` on `listener` until `shutdown` completes, then drain.
///
/// Every accepted connection runs on its own task. Once `shutdown` fires the
/// listener is closed and each connection is asked to finish its current
/// request and close. Connections still open after `grace` are aborted,
/// together with the handlers they are running, and
/// [`ServerError::GracePeriodElapsed`] is returned. Either way, no connection
/// task outlives this call.
pub async fn serve_with_grace<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
    grace: Duration,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (stop_tx, stop_rx) = watch::channel(false);
    let mut connections = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, _remote)) => {
                    connections.spawn(serve_connection(stream, app.clone(), stop_rx.clone()));
                }
                Err(e) => {
                    // Usually fd exhaustion; back off before retrying.
                    tracing::warn!(error = %e, "Failed to accept connection");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            },
            Some(joined) = connections.join_next(), if !connections.is_empty() => {
                log_connection_exit(joined);
            }
        }
    }

    drop(listener);
    tracing::info!(
        grace_secs = grace.as_secs_f64(),
        connections = connections.len(),
        "Shutting down server..."
    );
    stop_tx.send_replace(true);

    let drain = async {
        while let Some(joined) = connections.join_next().await {
            log_connection_exit(joined);
        }
    };
    if tokio::time::timeout(grace, drain).await.is_ok() {
        return Ok(());
    }

    let open = connections.len();
    tracing::warn!(open, "Aborting connections still open after grace period");
    connections.shutdown().await;

    Err(ServerError::GracePeriodElapsed { grace, open })
}

/// Serve HTTP/1.1 on one connection until the client is done or `stop` flips.
async fn serve_connection(stream: TcpStream, app: Router, mut stop: watch::Receiver<bool>) {
    let service = hyper::service::service_fn(move |request: Request<Incoming>| {
        app.clone().call(request)
    });

    let connection = http1::Builder::new()
        .timer(TokioTimer::new())
        .serve_connection(TokioIo::new(stream), service);
    tokio::pin!(connection);

    tokio::select! {
        result = connection.as_mut() => {
            if let Err(e) = result {
                tracing::debug!(error = %e, "Connection closed with error");
            }
            return;
        }
        _ = stop.wait_for(|stopping| *stopping) => {}
    }

    // Finish the request in flight, if any, then close.
    connection.as_mut().graceful_shutdown();
    if let Err(e) = connection.await {
        tracing::debug!(error = %e, "Connection closed with error during shutdown");
    }
}

fn log_connection_exit(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        if e.is_panic() {
            tracing::error!(error = %e, "Connection task panicked");
        }
    }
}

/// Release the database once the server no longer needs it.
///
/// Returns `false`, leaving the database to be freed with its last
/// reference, if anything besides `state` still holds the shared state.
pub fn close_database(state: Arc<AppState>) -> bool {
    match Arc::try_unwrap(state) {
        Ok(state) => {
            state.lookup.close();
            tracing::info!("Geo database closed");
            true
        }
        Err(_) => {
            tracing::warn!("Geo database still referenced, skipping close");
            false
        }
    }
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
