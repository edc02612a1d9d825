//! Docstore - command-line host for a segmented document store
//!
//! Loads a content directory once at startup (any failure is fatal) and
//! answers lookups, or keeps watching the directory and reloading it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use docstore::{CurrentStore, DocumentStore, Separator, StoreConfig, StoreWatcher};

#[derive(Debug, Parser)]
#[command(name = "docstore", version, about = "Load and query a directory of segmented documents")]
struct Cli {
    /// JSON config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Content directory, overrides the config
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Exact separator token, overrides the config
    #[arg(long, global = true)]
    separator: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every document id with its segment count
    List,
    /// Print a document's segments
    Show {
        id: String,
        /// Print only this segment
        #[arg(long)]
        segment: Option<usize>,
    },
    /// List documents related to a document
    Related { id: String },
    /// Keep the store loaded and reload it on changes
    Watch,
    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docstore=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = effective_config(&cli)?;
    let dir = config.content_dir();
    let load_store = || {
        DocumentStore::load_with(&dir, &config.load)
            .with_context(|| format!("Refusing to start: cannot load {}", dir.display()))
    };

    match cli.command {
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::List => {
            let store = load_store()?;
            for doc in store.iter() {
                println!("{}\t{}", doc.id(), doc.segment_count());
            }
        }
        Command::Show { id, segment } => {
            let store = load_store()?;
            let segments = store.segments_of(&id)?;
            match segment {
                Some(n) => {
                    let text = segments.get(n).with_context(|| {
                        format!("{} has {} segments, no segment {}", id, segments.len(), n)
                    })?;
                    print!("{}", text);
                }
                None => {
                    for (i, text) in segments.iter().enumerate() {
                        println!("--- segment {} ---", i);
                        print!("{}", text);
                        if !text.ends_with('\n') {
                            println!();
                        }
                    }
                }
            }
        }
        Command::Related { id } => {
            let store = load_store()?;
            for related in store.related(&id)? {
                println!("{}", related);
            }
        }
        Command::Watch => {
            let handle = CurrentStore::new(load_store()?);
            let root = handle.snapshot().root().to_path_buf();
            let _watcher = StoreWatcher::spawn(
                handle,
                root,
                config.load.clone(),
                config.watch_debounce(),
            )?;
            tracing::info!("Press Ctrl-C to stop");
            loop {
                std::thread::park();
            }
        }
    }

    Ok(())
}

/// Config file values with command-line overrides applied
fn effective_config(cli: &Cli) -> Result<StoreConfig> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::load_from(path)?,
        None => StoreConfig::load()?,
    };
    if let Some(dir) = &cli.dir {
        config.content_dir = Some(dir.clone());
    }
    if let Some(token) = &cli.separator {
        config.load.separator = Separator::literal(token.clone());
    }
    Ok(config)
}
