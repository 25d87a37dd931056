//! RedFS CLI - Command line host for the storage broker.
//!
//! Drives a storage registry the way a game host would: load it, answer
//! storage requests, then unload it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use redfs_common::SHARED_STORAGE_NAME;
use redfs_storage::{validate, StorageHandle, StorageLayout, StorageRegistry, Validation};

#[derive(Parser)]
#[command(name = "redfs")]
#[command(about = "RedFS - Per-mod storage broker")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Game directory (default: two levels above the working directory).
    #[arg(short, long, global = true)]
    base: Option<PathBuf>,

    /// JSON file describing the storage layout.
    #[arg(short, long, global = true, conflicts_with = "base")]
    layout: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check storage names without touching the disk.
    Validate {
        /// Names to check.
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Run one session requesting each storage in order.
    Acquire {
        /// Storage names; "shared" requests the shared storage.
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Show the resolved storage layout.
    Layout,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Validate { names } => cmd_validate(&names),
        Commands::Acquire { names } => {
            let layout = resolve_layout(cli.base.as_deref(), cli.layout.as_deref())?;
            cmd_acquire(layout, &names)
        }
        Commands::Layout => {
            let layout = resolve_layout(cli.base.as_deref(), cli.layout.as_deref())?;
            cmd_layout(&layout)
        }
    }
}

/// Build the layout from the command line options.
fn resolve_layout(base: Option<&Path>, layout: Option<&Path>) -> Result<StorageLayout> {
    if let Some(file) = layout {
        let json = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read layout file {}", file.display()))?;
        return StorageLayout::from_json(&json).context("Invalid layout file");
    }
    match base {
        Some(base) => {
            let base = std::path::absolute(base).context("Invalid base directory")?;
            Ok(StorageLayout::new(base))
        }
        None => StorageLayout::from_working_dir().context("Failed to derive base directory"),
    }
}

/// Print the verdict for each name.
fn cmd_validate(names: &[String]) -> Result<()> {
    for name in names {
        let verdict = match validate(name) {
            Validation::Accepted => "accepted",
            Validation::InvalidSyntax => "rejected (3 to 24 ASCII letters required)",
            Validation::Reserved => "rejected (reserved)",
        };
        println!("{:<26} {}", name, verdict);
    }
    Ok(())
}

/// Load a registry, request every name, then unload it.
fn cmd_acquire(layout: StorageLayout, names: &[String]) -> Result<()> {
    info!("Storage root: {}", layout.root().display());

    let mut registry = StorageRegistry::new(layout);
    if let Err(e) = registry.load() {
        println!("Registry disabled: {}", e);
    }

    let mut granted: Vec<StorageHandle> = Vec::new();
    for name in names {
        let result = if name == SHARED_STORAGE_NAME {
            registry.acquire_shared()
        } else {
            registry.acquire(name)
        };

        match result {
            Ok(handle) => {
                let path = handle.path()?.display().to_string();
                println!("{:<26} granted  {}", name, path);
                granted.push(handle);
            }
            Err(e) => println!("{:<26} rejected ({})", name, e),
        }
    }

    let revoked: Vec<&StorageHandle> = granted.iter().filter(|h| h.is_revoked()).collect();
    if !revoked.is_empty() {
        println!("\nRevoked this session:");
        for handle in revoked {
            println!("  {}", handle.name());
        }
    }

    registry.unload();
    Ok(())
}

/// Print the layout as JSON.
fn cmd_layout(layout: &StorageLayout) -> Result<()> {
    println!("{}", layout.to_json()?);
    println!("  Storage root: {}", layout.root().display());
    println!("  Legacy root:  {}", layout.legacy_root().display());
    Ok(())
}
