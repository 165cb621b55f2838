//! Project watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;
use notify::{Watcher, RecursiveMode, Event, RecommendedWatcher, Config};
use tokio::sync::mpsc;

use crate::site::Site;

/// A watcher that rebuilds the site whenever a file below the project
/// root changes.
pub struct ProjectWatcher {
    root: PathBuf,
    poll_interval: Duration,
    update_tx: mpsc::UnboundedSender<Site>,
}

impl ProjectWatcher {
    /// Create a new ProjectWatcher.
    ///
    /// Returns the watcher and a receiver for rebuilt sites.
    pub fn new(root: &Path, poll_interval: Duration) -> (Self, mpsc::UnboundedReceiver<Site>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (Self::with_sender(root, poll_interval, update_tx), update_rx)
    }

    /// Create a watcher that reports into an existing channel.
    pub fn with_sender(root: &Path, poll_interval: Duration, update_tx: mpsc::UnboundedSender<Site>) -> Self {
        Self {
            root: root.to_path_buf(),
            poll_interval,
            update_tx,
        }
    }

    /// Start watching in a background thread. Dropping the returned
    /// watcher stops it.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let root = self.root.clone();

        let mut watcher = RecommendedWatcher::new(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove() {
                        tracing::info!(paths = ?event.paths, "Project change detected, reloading");
                        let _ = tx.send(Site::load(&root));
                    }
                }
                Err(e) => tracing::error!(error = %e, "Watch error"),
            }
        }, Config::default().with_poll_interval(self.poll_interval))?;

        watcher.watch(&self.root, RecursiveMode::Recursive)?;

        tracing::info!(root = ?self.root, "Project watcher started");
        Ok(watcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_change_triggers_reload() {
        let dir = tempfile::tempdir().unwrap();
        let pages = dir.path().join("src/main/resources/templates/pages");
        fs::create_dir_all(&pages).unwrap();

        let (watcher, mut updates) = ProjectWatcher::new(dir.path(), Duration::from_millis(100));
        let _watcher = watcher.run().unwrap();
        fs::write(pages.join("about.html"), "about").unwrap();

        let site = tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                let site = updates.recv().await.unwrap();
                if site.template("about").is_some() {
                    break site;
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(site.templates().len(), 1);
    }
}
