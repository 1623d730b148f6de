//! Search and browse the files listed in a static site manifest.
//!
//! The [`search`] module is the pure core: query matching, highlighting and
//! edit-distance suggestions over an in-memory [`FileEntry`] list. [`Session`]
//! holds browsing state, [`ManifestClient`] loads manifests, and [`format`] and
//! [`repl`] are a plain-text front end.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod links;
pub mod manifest;
pub mod pager;
pub mod repl;
pub mod search;
pub mod session;
pub mod tracing;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, FetchError};
pub use links::{ArtifactLinks, artifact_href};
pub use manifest::{ManifestClient, Source};
pub use pager::Pager;
pub use search::{Highlighted, Query, Suggestion};
pub use session::{ReloadTicket, Session};
pub use types::{FileEntry, ManifestKind};
