//! Loading manifests and artifacts from a remote site or a local checkout.
//!
//! A manifest is a JSON array of relative file paths. Remote manifests are fetched
//! with a single unauthenticated GET carrying a cache-busting `_` parameter and a
//! `Cache-Control: no-store` header. There is no retry, backoff or custom timeout.

use crate::config::{Config, expand_tilde};
use crate::error::FetchError;
use crate::links::{artifact_href, local_path};
use crate::types::{FileEntry, ManifestKind};
use reqwest::header::CACHE_CONTROL;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

/// Where manifests and artifacts are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Base URL of the hosted site, always ending in `/`.
    Remote(Url),
    /// Directory of a local copy of the site.
    Local(PathBuf),
}

impl Source {
    /// `http://` and `https://` strings are URLs; anything else is a directory.
    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            let mut url = Url::parse(raw)?;
            if !url.path().ends_with('/') {
                let path = format!("{}/", url.path());
                url.set_path(&path);
            }
            Ok(Self::Remote(url))
        } else {
            Ok(Self::Local(PathBuf::from(&*expand_tilde(raw))))
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{}", url),
            Self::Local(dir) => write!(f, "{}", dir.display()),
        }
    }
}

/// Fetches manifests and artifacts from a [`Source`].
#[derive(Debug, Clone)]
pub struct ManifestClient {
    http: reqwest::Client,
    source: Source,
    files_manifest: String,
    new_manifest: String,
    storage_prefix: String,
}

impl ManifestClient {
    pub fn new(source: Source, config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            source,
            files_manifest: config.files_manifest.clone(),
            new_manifest: config.new_manifest.clone(),
            storage_prefix: config.storage_prefix.clone(),
        }
    }

    /// Build a client for the source named in `config`.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let source = Source::parse(&config.source).map_err(|source| FetchError::Url {
            name: config.source.clone(),
            source,
        })?;
        Ok(Self::new(source, config))
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn storage_prefix(&self) -> &str {
        &self.storage_prefix
    }

    /// The file name of the manifest for `kind`.
    pub fn manifest_name(&self, kind: ManifestKind) -> &str {
        match kind {
            ManifestKind::All => &self.files_manifest,
            ManifestKind::New => &self.new_manifest,
        }
    }

    /// Load the entries for `kind`.
    ///
    /// `All` also reads the "new" manifest to flag recently added entries; if that
    /// second read fails the entries are returned unflagged. Every `New` entry is
    /// flagged.
    pub async fn load(&self, kind: ManifestKind) -> Result<Vec<FileEntry>, FetchError> {
        match kind {
            ManifestKind::New => {
                let paths = self.fetch(&self.new_manifest).await?;
                Ok(paths.into_iter().map(|p| FileEntry::new(p, true)).collect())
            }
            ManifestKind::All => {
                let paths = self.fetch(&self.files_manifest).await?;
                let fresh: HashSet<String> = match self.fetch(&self.new_manifest).await {
                    Ok(fresh) => fresh.into_iter().collect(),
                    Err(e) => {
                        tracing::warn!("Could not flag new entries: {}", e);
                        HashSet::new()
                    }
                };
                Ok(paths
                    .into_iter()
                    .map(|p| {
                        let is_new = fresh.contains(&p);
                        FileEntry::new(p, is_new)
                    })
                    .collect())
            }
        }
    }

    /// Fetch one manifest by file name and return its paths in order.
    pub async fn fetch(&self, name: &str) -> Result<Vec<String>, FetchError> {
        let body = match &self.source {
            Source::Remote(base) => {
                let url = base.join(name).map_err(|source| FetchError::Url {
                    name: name.to_string(),
                    source,
                })?;
                self.get(name, url, true).await?
            }
            Source::Local(dir) => {
                let path = dir.join(name);
                tokio::fs::read(&path)
                    .await
                    .map_err(|source| FetchError::Io { path, source })?
            }
        };

        let paths = parse_manifest(name, &body)?;
        tracing::info!("Loaded {} ({} entries) from {}", name, paths.len(), self.source);
        Ok(paths)
    }

    /// Save the artifact at `rel_path` to `dest`. Returns the number of bytes written.
    pub async fn download(&self, rel_path: &str, dest: &Path) -> Result<u64, FetchError> {
        let io_err = |source| FetchError::Io {
            path: dest.to_path_buf(),
            source,
        };

        match &self.source {
            Source::Remote(base) => {
                let href = artifact_href(&self.storage_prefix, rel_path);
                let url = base.join(&href).map_err(|source| FetchError::Url {
                    name: rel_path.to_string(),
                    source,
                })?;
                let body = self.get(rel_path, url, false).await?;
                tokio::fs::write(dest, &body).await.map_err(io_err)?;
                Ok(body.len() as u64)
            }
            Source::Local(dir) => {
                let from = local_path(dir, &self.storage_prefix, rel_path);
                if let Err(source) = tokio::fs::metadata(&from).await {
                    return Err(FetchError::Io { path: from, source });
                }
                tokio::fs::copy(&from, dest).await.map_err(io_err)
            }
        }
    }

    async fn get(&self, name: &str, url: Url, bust_cache: bool) -> Result<Vec<u8>, FetchError> {
        let transport = |source| FetchError::Transport {
            name: name.to_string(),
            source,
        };

        let mut request = self.http.get(url);
        if bust_cache {
            request = request
                .query(&[("_", nonce().to_string())])
                .header(CACHE_CONTROL, "no-store");
        }

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                name: name.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        Ok(body.to_vec())
    }
}

/// Validate a manifest body: it must be a JSON array. Non-string elements are skipped.
pub fn parse_manifest(name: &str, body: &[u8]) -> Result<Vec<String>, FetchError> {
    let value: Value = serde_json::from_slice(body).map_err(|source| FetchError::Json {
        name: name.to_string(),
        source,
    })?;

    let Value::Array(items) = value else {
        return Err(FetchError::NotAnArray {
            name: name.to_string(),
        });
    };

    let total = items.len();
    let paths: Vec<String> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(path) => Some(path),
            _ => None,
        })
        .collect();

    if paths.len() < total {
        tracing::warn!(
            "{}: skipped {} non-string entries",
            name,
            total - paths.len()
        );
    }

    Ok(paths)
}

/// Milliseconds since the epoch, used as the cache-busting parameter.
fn nonce() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}
