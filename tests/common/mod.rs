//! Shared utilities for integration tests.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use pagewire::config::ServerConfig;
use pagewire::http::HttpServer;
use pagewire::lifecycle::Shutdown;
use pagewire::site::{Site, SiteHandle};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// A project directory laid out with the default conventions.
pub struct Project {
    dir: TempDir,
}

#[allow(dead_code)]
impl Project {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.root().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Any template below the templates root (layouts, fragments).
    pub fn template(&self, name: &str, content: &str) {
        self.write(&format!("src/main/resources/templates/{name}.html"), content);
    }

    pub fn page(&self, name: &str, content: &str) {
        self.template(&format!("pages/{name}"), content);
    }

    /// Mock document below the mock root, e.g. `pages/events/list.json`.
    pub fn mock(&self, relative: &str, content: &str) {
        self.write(&format!("src/test/resources/templates/{relative}"), content);
    }

    pub fn site_config(&self, content: &str) {
        self.write("site.json", content);
    }
}

/// A running preview server.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub site: Arc<SiteHandle>,
    pub reloads: mpsc::UnboundedSender<Site>,
    shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the server for `project` on an ephemeral port.
pub async fn start_server(project: &Project) -> TestServer {
    let site = Arc::new(SiteHandle::open(project.root()));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (reloads, reload_rx) = mpsc::unbounded_channel();
    let shutdown = Shutdown::new();

    let server = HttpServer::new(ServerConfig::default(), site.clone());
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, reload_rx, server_shutdown).await;
    });

    TestServer {
        addr,
        site,
        reloads,
        shutdown,
    }
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}

/// Send a GET with the path exactly as given and return the status code.
///
/// HTTP clients normalize `..` segments away, so traversal attempts are
/// written to the socket by hand.
#[allow(dead_code)]
pub async fn raw_get_status(addr: SocketAddr, path: &str) -> u16 {
    let mut socket = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    socket.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    socket.read_to_end(&mut response).await.unwrap();
    let response = String::from_utf8_lossy(&response);
    response
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .unwrap()
}
