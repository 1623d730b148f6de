use anyhow::{Context, bail};
use clap::Parser;
use manifest_browser::cli::{Cli, Commands};
use manifest_browser::format::{PageView, format_suggestions};
use manifest_browser::search::suggest;
use manifest_browser::types::basename;
use manifest_browser::{ArtifactLinks, Config, ManifestClient, ManifestKind, Session, repl};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    manifest_browser::tracing::init(cli.verbose);

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply(&mut config);
    config.validate()?;

    let client = ManifestClient::from_config(&config)?;
    tracing::debug!("Using source {}", client.source());

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            let mut session = Session::from_config(&config);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            repl::run(&mut session, &client, &config, stdin, &mut stdout).await?;
        }
        Commands::Search {
            query,
            new,
            page,
            json,
        } => {
            let mut session = load(&client, &config, new).await?;
            session.set_query(&query);

            let mut range = session.load_more();
            for _ in 1..page.max(1) {
                range = session.load_more();
            }
            let entries = session.page(range);
            let view = PageView::new(&session, &entries, client.source(), client.storage_prefix());

            if json {
                println!("{}", view.to_json()?);
            } else {
                print!("{}", view.to_text(&config));
            }
        }
        Commands::Suggest { query, new, json } => {
            let session = load(&client, &config, new).await?;
            let suggestions = suggest(&query, session.entries(), config.suggestion_limit);

            if json {
                println!("{}", serde_json::to_string_pretty(&suggestions)?);
            } else if suggestions.is_empty() {
                println!("No suggestions for '{}'.", query);
            } else {
                print!("{}", format_suggestions(&suggestions));
            }
        }
        Commands::Links { path } => {
            let links = ArtifactLinks::new(client.source(), &config.storage_prefix, &path);
            println!("open:     {}", links.open);
            println!("download: {}", links.download);
        }
        Commands::Download { path, output } => {
            let dest = output.unwrap_or_else(|| PathBuf::from(basename(&path)));
            let bytes = client
                .download(&path, &dest)
                .await
                .with_context(|| format!("Failed to download {}", path))?;
            println!("Saved {} ({} bytes)", dest.display(), bytes);
        }
    }

    Ok(())
}

/// Load the requested manifest into a fresh session, failing if the load fails.
async fn load(client: &ManifestClient, config: &Config, new: bool) -> anyhow::Result<Session> {
    let kind = if new { ManifestKind::New } else { ManifestKind::All };
    let mut session = Session::from_config(config);
    session.reload(client, kind).await;

    if let Some(status) = session.status() {
        bail!("{}", status);
    }
    Ok(session)
}
