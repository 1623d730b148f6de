use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "manifest-browser")]
#[command(about = "Search and browse the files listed in a static site manifest", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to <config dir>/manifest-browser/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Site base URL or local directory holding files.json / new.json
    #[arg(short, long, global = true)]
    pub source: Option<String>,
    /// Folder prepended to entry paths in links
    #[arg(long, global = true)]
    pub storage_prefix: Option<String>,
    #[arg(long, global = true)]
    pub page_size: Option<usize>,
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Filter the manifest and print one page of results
    Search {
        #[arg(default_value = "")]
        query: String,
        /// Search only newly added files
        #[arg(long)]
        new: bool,
        /// One-based page number
        #[arg(short, long, default_value = "1")]
        page: usize,
        #[arg(long)]
        json: bool,
    },
    /// Print "did you mean" candidates for a query
    Suggest {
        query: String,
        #[arg(long)]
        new: bool,
        #[arg(long)]
        json: bool,
    },
    /// Print the open/download links for a manifest path
    Links { path: String },
    /// Save an artifact to disk
    Download {
        path: String,
        /// Output file (defaults to the basename in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Browse interactively (the default)
    Interactive,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(source) = &self.source {
            config.source.clone_from(source);
        }
        if let Some(prefix) = &self.storage_prefix {
            config.storage_prefix.clone_from(prefix);
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
    }
}
