// SPDX-License-Identifier: GPL-3.0-or-later
// src/main.rs
//
// Command-line entry point: export a board to an image, inspect crops, or
// show the configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use tierboard::app::export::{export_board, save_sheet};
use tierboard::app::loader::load_all;
use tierboard::config::AppConfig;
use tierboard::domain::board::TierBoard;
use tierboard::domain::crop::resolve_render_rect;

#[derive(Parser)]
#[command(name = "tierboard", about = "Tier list export and crop inspection", version)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every tier into one image
    Export {
        board: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        card_width: Option<u32>,
        #[arg(long)]
        card_height: Option<u32>,
        #[arg(long)]
        columns: Option<u32>,
    },
    /// Print the crop rectangle each card resolves to
    Inspect { board: PathBuf },
    /// Print the effective configuration as JSON
    Config {
        /// Also write it to the config file
        #[arg(long)]
        save: bool,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) if path.exists() => AppConfig::load_from(path),
        Some(_) => Ok(AppConfig::default()),
        None => Ok(AppConfig::load()),
    }
}

fn board_dir(board: &Path) -> &Path {
    board.parent().unwrap_or_else(|| Path::new("."))
}

async fn export(board_path: &Path, output: &Path, config: &AppConfig) -> anyhow::Result<()> {
    let mut board = TierBoard::open(board_path)?;
    let images = load_all(&mut board, board_dir(board_path)).await;
    let sheet = export_board(&board, &images, &config.sheet_layout(), config.tile_spec()).await;
    save_sheet(&sheet, output)
}

async fn inspect(board_path: &Path, config: &AppConfig) -> anyhow::Result<()> {
    let mut board = TierBoard::open(board_path)?;
    load_all(&mut board, board_dir(board_path)).await;

    let width = f64::from(config.card_width);
    let height = f64::from(config.card_height);
    for id in board.container_ids() {
        let Some(items) = board.list(&id) else {
            continue;
        };
        println!("{id}:");
        for item in items {
            match resolve_render_rect(item, width, height).rect() {
                Some(placement) => {
                    let source = placement.source;
                    println!(
                        "  {} {:<24} {:?} -> ({:.1}, {:.1}, {:.1}, {:.1})",
                        item.id,
                        item.title,
                        item.crop_descriptor(),
                        source.x,
                        source.y,
                        source.width,
                        source.height
                    );
                }
                None => println!("  {} {:<24} not loaded", item.id, item.title),
            }
        }
    }
    Ok(())
}

fn show_config(config: &AppConfig, path: Option<&Path>, save: bool) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    if !save {
        return Ok(());
    }
    match path {
        Some(path) => config.save_to(path)?,
        None => config.save()?,
    }
    log::info!("Config saved");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref()).context("Failed to load config")?;

    match cli.command {
        Commands::Export {
            board,
            output,
            card_width,
            card_height,
            columns,
        } => {
            if let Some(width) = card_width.filter(|w| *w > 0) {
                config.card_width = width;
            }
            if let Some(height) = card_height.filter(|h| *h > 0) {
                config.card_height = height;
            }
            if let Some(columns) = columns.filter(|c| *c > 0) {
                config.columns_per_row = columns;
            }
            export(&board, &output, &config).await
        }
        Commands::Inspect { board } => inspect(&board, &config).await,
        Commands::Config { save } => show_config(&config, cli.config.as_deref(), save),
    }
}
