//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the project into the first site snapshot
//! - Start the reload sources (project watcher, SIGHUP)
//! - Bind the listener and run the server until shutdown
//!
//! # Design Decisions
//! - Fail fast: a missing project, a watcher or bind error is fatal
//! - Problems inside the project are not: they are logged and defaulted
//! - Listener binds last (traffic only when the site is loaded)

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::loader::ConfigError;
use crate::config::watcher::ProjectWatcher;
use crate::config::ServerConfig;
use crate::http::HttpServer;
use crate::lifecycle::signals;
use crate::lifecycle::Shutdown;
use crate::site::{SiteHandle, INDEX_TEMPLATE};

/// Fatal startup or serving error.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("project directory not found: {0}")]
    MissingProject(PathBuf),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to watch project: {0}")]
    Watch(#[from] notify::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Replace the port of `listener.bind_address`.
pub fn override_port(config: &mut ServerConfig, port: u16) {
    let host = config
        .listener
        .bind_address
        .rsplit_once(':')
        .map(|(host, _)| host.to_string())
        .unwrap_or_else(|| config.listener.bind_address.clone());
    config.listener.bind_address = format!("{host}:{port}");
}

/// Serve the project at `project` until `shutdown` fires.
pub async fn run(project: &Path, config: ServerConfig, shutdown: Shutdown) -> Result<(), ServerError> {
    if !project.is_dir() {
        return Err(ServerError::MissingProject(project.to_path_buf()));
    }

    let site = Arc::new(SiteHandle::open(project));
    let snapshot = site.snapshot();
    tracing::info!(
        root = %project.display(),
        templates = snapshot.templates().len(),
        mappings = snapshot.routes().len(),
        layouts = snapshot.layouts().len(),
        "Site loaded"
    );

    let (reload_tx, reload_rx) = mpsc::unbounded_channel();
    let _watcher = if config.watch.enabled {
        let poll_interval = Duration::from_millis(config.watch.poll_interval_ms);
        Some(ProjectWatcher::with_sender(project, poll_interval, reload_tx.clone()).run()?)
    } else {
        tracing::info!("Project watching disabled");
        None
    };
    let hangup = signals::reload_on_hangup(project.to_path_buf(), reload_tx);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let start_page = snapshot.config().index.as_deref().unwrap_or(INDEX_TEMPLATE);
    let start_path = if start_page == INDEX_TEMPLATE { String::new() } else { start_page.to_string() };
    tracing::info!(
        url = %format!("http://{}/{}", listener.local_addr()?, start_path),
        "Preview available"
    );

    let server = HttpServer::new(config, site);
    let result = server.run(listener, reload_rx, shutdown.subscribe()).await;
    hangup.abort();
    result.map_err(ServerError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_port() {
        let mut config = ServerConfig::default();
        override_port(&mut config, 9000);
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");

        config.listener.bind_address = "localhost".into();
        override_port(&mut config, 80);
        assert_eq!(config.listener.bind_address, "localhost:80");
    }

    #[tokio::test]
    async fn test_missing_project() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let result = run(&missing, ServerConfig::default(), Shutdown::new()).await;
        assert!(matches!(result, Err(ServerError::MissingProject(_))));
    }
}
