//! Links from manifest entries to the stored artifacts.

use crate::manifest::Source;
use serde::Serialize;
use url::Url;

/// Where an entry can be viewed inline and downloaded.
///
/// Both point at the same artifact; presentation decides how each is followed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactLinks {
    pub open: String,
    pub download: String,
}

impl ArtifactLinks {
    /// Build the links for `rel_path` stored under `prefix`.
    ///
    /// Remote sources yield absolute URLs. Local sources yield filesystem paths.
    pub fn new(source: &Source, prefix: &str, rel_path: &str) -> Self {
        let target = match source {
            Source::Remote(base) => {
                let href = artifact_href(prefix, rel_path);
                base.join(&href).map_or(href, |url| url.to_string())
            }
            Source::Local(dir) => local_path(dir, prefix, rel_path).display().to_string(),
        };

        Self {
            open: target.clone(),
            download: target,
        }
    }
}

/// Relative href for an artifact: `prefix` followed by `rel_path`, with every
/// path segment percent-encoded. A leading `/` on `prefix` is kept.
pub fn artifact_href(prefix: &str, rel_path: &str) -> String {
    // Any special-scheme URL works; only its path is kept.
    let Ok(mut scratch) = Url::parse("http://localhost/") else {
        return format!("{prefix}{rel_path}");
    };

    if let Ok(mut segments) = scratch.path_segments_mut() {
        segments.clear();
        segments.extend(prefix.split('/').filter(|s| !s.is_empty()));
        segments.extend(rel_path.split('/').filter(|s| !s.is_empty()));
    }

    let path = scratch.path();
    if prefix.starts_with('/') {
        path.to_string()
    } else {
        path.trim_start_matches('/').to_string()
    }
}

/// Filesystem location of an artifact under a local site directory.
pub(crate) fn local_path(dir: &std::path::Path, prefix: &str, rel_path: &str) -> std::path::PathBuf {
    let mut path = dir.to_path_buf();
    path.extend(prefix.split('/').filter(|s| !s.is_empty()));
    path.extend(rel_path.split('/').filter(|s| !s.is_empty() && *s != ".."));
    path
}
