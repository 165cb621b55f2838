//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGINT/SIGTERM and report them as a shutdown request
//! - Turn SIGHUP into a site reload
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGHUP triggers a reload, not shutdown
//! - A handler that cannot be installed is logged and treated as never firing

use std::path::PathBuf;

use tokio::signal;
use tokio::sync::mpsc;

use crate::site::Site;

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
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
        _ = ctrl_c => tracing::info!("Received Ctrl+C"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}

/// Rebuild the site from `root` on every SIGHUP and send it to the server.
#[cfg(unix)]
pub fn reload_on_hangup(root: PathBuf, reloads: mpsc::UnboundedSender<Site>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut hangup = match signal::unix::signal(signal::unix::SignalKind::hangup()) {
            Ok(hangup) => hangup,
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGHUP handler");
                return;
            }
        };
        while hangup.recv().await.is_some() {
            tracing::info!(root = %root.display(), "Received SIGHUP, reloading site");
            if reloads.send(Site::load(&root)).is_err() {
                break;
            }
        }
    })
}

#[cfg(not(unix))]
pub fn reload_on_hangup(_root: PathBuf, _reloads: mpsc::UnboundedSender<Site>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async {})
}
