use serde::Serialize;

/// One browsable file from the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Slash-separated path relative to the storage prefix.
    pub path: String,
    /// Whether the path is listed in the "recently added" manifest.
    pub is_new: bool,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, is_new: bool) -> Self {
        Self {
            path: path.into(),
            is_new,
        }
    }

    /// The basename: everything after the last `/`.
    pub fn name(&self) -> &str {
        basename(&self.path)
    }
}

/// Returns the text after the last `/` in `path`.
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Which of the two well-known manifests to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    /// The full file list (`files.json` by default).
    All,
    /// Only newly added files (`new.json` by default).
    New,
}
