//! Offset Blocks CLI
//!
//! Discovers a blocks directory and lets you list blocks, inspect their assets,
//! fire host events, and render a block against an in-memory host.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use offset_blocks::BlockLibrary;
use offset_blocks::config::Config;
use offset_blocks::hooks::{Attributes, HostEvent};
use offset_blocks::host::RecordingHost;

/// Template picked up from a block directory when `--template` is not given.
const DEFAULT_TEMPLATE: &str = "render.html";

#[derive(Debug, Parser)]
#[command(name = "offset-blocks", version, about = "Inspect and render manifest-described blocks")]
struct Cli {
    /// Blocks directory (overrides BLOCKS_DIR).
    #[arg(long, global = true)]
    blocks_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List discovered blocks.
    List,
    /// Print a block's asset descriptors as JSON.
    Assets {
        /// Block name, e.g. "offset/hero".
        block: String,
    },
    /// Fire a host event and print the resulting host calls as JSON.
    Dispatch {
        /// One of: init, admin_enqueue_scripts, wp_enqueue_scripts.
        event: String,
        /// Pretend the current admin screen is the block editor.
        #[arg(long)]
        block_editor: bool,
    },
    /// Render a block and print its HTML.
    Render {
        /// Block name, e.g. "offset/hero".
        block: String,
        /// Attributes as a JSON object.
        #[arg(long, default_value = "{}")]
        attributes: String,
        /// Inner content.
        #[arg(long, default_value = "")]
        content: String,
        /// Template file; defaults to render.html in the block directory.
        #[arg(long)]
        template: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("failed to load configuration")?;
    if let Some(dir) = cli.blocks_dir {
        config.blocks_dir = dir;
    }

    let mut library = BlockLibrary::new(config.host_roots());
    library
        .discover(&config.blocks_dir)
        .with_context(|| format!("failed to discover blocks in {}", config.blocks_dir.display()))?;
    info!(blocks = library.len(), "Blocks loaded");

    match cli.command {
        Command::List => {
            for block in library.blocks() {
                println!(
                    "{}\t{}\t{}\t{}",
                    block.name(),
                    block.hook_name(),
                    block.location(),
                    block.dir().display()
                );
            }
        }
        Command::Assets { block } => {
            let entry = library
                .get(&block)
                .with_context(|| format!("unknown block '{block}'"))?;
            let assets: Vec<_> = entry.assets().iter().collect();
            println!("{}", serde_json::to_string_pretty(&assets)?);
        }
        Command::Dispatch {
            event,
            block_editor,
        } => {
            let event =
                HostEvent::from_name(&event).with_context(|| format!("unknown event '{event}'"))?;
            let host = if block_editor {
                RecordingHost::in_block_editor()
            } else {
                RecordingHost::new()
            };
            library.dispatch(event, &host);
            println!("{}", serde_json::to_string_pretty(&host.calls())?);
        }
        Command::Render {
            block,
            attributes,
            content,
            template,
        } => {
            let attributes: Attributes =
                serde_json::from_str(&attributes).context("--attributes must be a JSON object")?;

            let template = match template {
                Some(path) => Some(path),
                None => library
                    .get(&block)
                    .map(|b| b.dir().join(DEFAULT_TEMPLATE))
                    .filter(|p| p.is_file()),
            };
            if let Some(path) = template {
                library.set_render(&block, path)?;
            }

            let host = RecordingHost::new();
            let html = library.render(&block, attributes, content, &host)?;
            println!("{html}");
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
