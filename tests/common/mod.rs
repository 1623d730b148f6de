//! Shared test fixtures for integration tests.
//!
//! - [`TempSite`]: a temporary local copy of a site, with manifests and artifacts
//! - [`StubServer`]: a loopback HTTP server answering canned responses, for
//!   exercising the remote fetch path without network access
//!
//! Local sites are available as rstest fixtures through [`temp_site`] and [`sample_site`].

use manifest_browser::{Config, ManifestClient, Source};
use rstest::fixture;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// The three-file manifest used throughout the search scenarios.
#[allow(dead_code)] // Used across different integration test crates
pub const SAMPLE_FILES: &str = r#"["docs/report.pdf", "docs/report_final.pdf", "img/image.png"]"#;

/// A temporary site directory that is removed when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempSite {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempSite {
    /// Creates a new empty site directory.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file with the given content, creating parent directories.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
    }

    /// Configuration pointing at this directory, otherwise default.
    pub fn config(&self) -> Config {
        Config {
            source: self.root.display().to_string(),
            ..Config::default()
        }
    }

    pub fn client(&self) -> ManifestClient {
        ManifestClient::new(Source::Local(self.root.clone()), &self.config())
    }
}

impl Default for TempSite {
    fn default() -> Self {
        Self::new()
    }
}

/// An empty site.
#[allow(dead_code)] // Used across different integration test crates
#[fixture]
pub fn temp_site() -> TempSite {
    TempSite::new()
}

/// A site with the sample manifest, a one-entry `new.json` and the artifacts under `db/`.
#[allow(dead_code)] // Used across different integration test crates
#[fixture]
pub fn sample_site() -> TempSite {
    let site = TempSite::new();
    site.create_file("files.json", SAMPLE_FILES);
    site.create_file("new.json", r#"["docs/report_final.pdf"]"#);
    site.create_file("db/docs/report.pdf", "report");
    site.create_file("db/docs/report_final.pdf", "final report");
    site.create_file("db/img/image.png", "png");
    site
}

/// A canned HTTP response.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

#[allow(dead_code)] // Used across different integration test crates
impl Reply {
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }
}

/// A loopback HTTP/1.1 server that answers each request path with a fixed reply.
///
/// Unknown paths get a 404. Every request head is recorded for inspection.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct StubServer {
    base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl StubServer {
    /// Bind an ephemeral port and start serving in the background.
    pub async fn start(routes: &[(&str, Reply)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind loopback listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let routes: Arc<HashMap<String, Reply>> = Arc::new(
            routes
                .iter()
                .map(|(path, reply)| ((*path).to_string(), reply.clone()))
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let routes = Arc::clone(&routes);
                let recorded = Arc::clone(&recorded);
                tokio::spawn(async move {
                    let mut head = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                        match stream.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => head.extend_from_slice(&buf[..n]),
                        }
                    }
                    let head = String::from_utf8_lossy(&head).to_string();
                    let target = head.split_whitespace().nth(1).unwrap_or("/");
                    let path = target.split('?').next().unwrap_or("/").to_string();
                    recorded.lock().unwrap().push(head.clone());

                    let reply = routes.get(&path).cloned().unwrap_or(Reply::status(404));
                    let response = format!(
                        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        reply.status,
                        reply.body.len(),
                        reply.body
                    );
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        Self {
            base: format!("http://{}/site/", addr),
            requests,
        }
    }

    /// Base URL of the stub site (`http://127.0.0.1:<port>/site/`).
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Recorded request heads, oldest first.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// A client for this server with default manifest names and prefix.
    pub fn client(&self) -> ManifestClient {
        let config = Config {
            source: self.base.clone(),
            ..Config::default()
        };
        ManifestClient::from_config(&config).expect("Stub base URL is valid")
    }
}
