//! Line-oriented interactive browsing.
//!
//! Plain lines replace the query. Lines starting with `:` are commands:
//! `:reload`, `:new`, `:more`, `:pick N`, `:help`, `:quit`.

use crate::config::Config;
use crate::error::Result;
use crate::format::PageView;
use crate::manifest::ManifestClient;
use crate::session::Session;
use crate::types::ManifestKind;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const HELP: &str = "\
Type to search. Queries support \"phrases\", a*b wildcards, and AND / OR / NOT / -term.
Commands:
  :reload   reload the full file list
  :new      show only newly added files
  :more     show the next page of results
  :pick N   search for suggestion N
  :help     show this message
  :quit     exit
";

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Query(String),
    Reload,
    New,
    More,
    /// One-based suggestion number, as displayed.
    Pick(usize),
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let Some(command) = line.trim().strip_prefix(':') else {
            return Self::Query(line.to_string());
        };

        let mut parts = command.split_whitespace();
        match parts.next().unwrap_or_default() {
            "reload" | "r" => Self::Reload,
            "new" | "n" => Self::New,
            "more" | "m" => Self::More,
            "pick" | "p" => match parts.next().and_then(|n| n.parse().ok()) {
                Some(n) if n > 0 => Self::Pick(n),
                _ => Self::Unknown(line.trim().to_string()),
            },
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => Self::Unknown(line.trim().to_string()),
        }
    }
}

/// Load the full list, then handle `input` line by line until it ends or `:quit`.
pub async fn run<R, W>(
    session: &mut Session,
    client: &ManifestClient,
    config: &Config,
    input: R,
    output: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    session.reload(client, ManifestKind::All).await;
    show_page(session, client, config, output, true)?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Query(query) => {
                session.set_query(&query);
                show_page(session, client, config, output, true)?;
            }
            Command::Reload => {
                session.reload(client, ManifestKind::All).await;
                show_page(session, client, config, output, true)?;
            }
            Command::New => {
                session.reload(client, ManifestKind::New).await;
                show_page(session, client, config, output, true)?;
            }
            Command::More => {
                if session.has_more() {
                    show_page(session, client, config, output, false)?;
                } else {
                    writeln!(output, "No more results.")?;
                }
            }
            Command::Pick(n) => match session.apply_suggestion(n - 1) {
                Some(query) => {
                    writeln!(output, "Searching for '{}'", query)?;
                    show_page(session, client, config, output, true)?;
                }
                None => writeln!(output, "No suggestion {}.", n)?,
            },
            Command::Help => write!(output, "{}", HELP)?,
            Command::Quit => break,
            Command::Unknown(line) => {
                writeln!(output, "Unknown command '{}'. Type :help for commands.", line)?;
            }
        }
        output.flush()?;
    }

    Ok(())
}

/// Hand out the next page and write it. Suggestions are only repeated on a fresh query.
fn show_page<W: Write>(
    session: &mut Session,
    client: &ManifestClient,
    config: &Config,
    output: &mut W,
    with_suggestions: bool,
) -> Result<()> {
    let range = session.load_more();
    let page = session.page(range);
    let mut view = PageView::new(session, &page, client.source(), client.storage_prefix());
    if !with_suggestions {
        view.suggestions.clear();
    }
    write!(output, "{}", view.to_text(config))?;
    Ok(())
}
