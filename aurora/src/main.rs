//! aurora command-line entry point

#![deny(unsafe_code)]

mod cli;

use anyhow::{Context, Result};
use aurora::editor_config::{EditorConfig, CONFIG_FILE_NAME};
use aurora::markdown_import::MarkdownImporter;
use aurora::Editor;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};

/// Main entry point for the aurora CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Info);
    }
    logger.init();

    match cli.command {
        Commands::Stats { file } => {
            let config = load_config(cli.config.as_deref())?;
            handle_stats_command(config, &file)?;
        }

        Commands::Snapshot { file, output } => {
            let config = load_config(cli.config.as_deref())?;
            handle_snapshot_command(config, &file, output)?;
        }

        Commands::Init { path, force } => {
            handle_init_command(path, force)?;
        }
    }

    Ok(())
}

/// Load the configuration named on the command line, or ./aurora.toml
fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(CONFIG_FILE_NAME);
            if !default.exists() {
                log::info!("No {} found, using defaults", CONFIG_FILE_NAME);
                return Ok(EditorConfig::default());
            }
            default
        }
    };

    EditorConfig::load(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Open an editor session on an imported manuscript
fn open_manuscript(config: EditorConfig, file: &Path) -> Result<Editor> {
    let blocks = MarkdownImporter::import_file(file)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    Editor::builder(config)
        .blocks(blocks)
        .build()
        .context("Failed to start editor session")
}

/// Handle the stats command
fn handle_stats_command(config: EditorConfig, file: &Path) -> Result<()> {
    let editor = open_manuscript(config, file)?;
    println!("{}", editor.status_line());
    Ok(())
}

/// Handle the snapshot command
fn handle_snapshot_command(
    config: EditorConfig,
    file: &Path,
    output: Option<PathBuf>,
) -> Result<()> {
    let editor = open_manuscript(config, file)?;
    let json = editor
        .snapshot()
        .to_json_pretty()
        .context("Failed to serialize document")?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✓ Wrote snapshot to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Handle the init command
fn handle_init_command(path: Option<PathBuf>, force: bool) -> Result<()> {
    let target_path = path.unwrap_or_else(|| PathBuf::from("."));

    if !target_path.exists() {
        std::fs::create_dir_all(&target_path)
            .with_context(|| format!("Failed to create directory {}", target_path.display()))?;
    }

    let config_path = target_path.join(CONFIG_FILE_NAME);
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it.",
            config_path.display()
        );
    }

    EditorConfig::default()
        .save(&config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("✓ Created {}", config_path.display());
    Ok(())
}
