//! # Deck CLI
//!
//! Command line host for Deck presentations.
//!
//! ## Usage
//!
//! ```bash
//! deck new talk.json --title "Launch plan"
//! deck info talk.json
//! deck export-image talk.json --slide 2 --format jpeg --out slide2.jpg
//! deck export-deck talk.json --out talk.deck.json
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `Command` - One variant per subcommand
//! - `commands` - Subcommand implementations on top of `deck-core` and `deck-renderer`

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod commands;

pub use commands::{export_deck, export_image, info, new_presentation, run, PresentationInfo};

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use deck_core::EditorConfig;
use deck_renderer::{ExportConfig, RasterFormat};

/// Command-line arguments for deck.
#[derive(Debug, Clone, Parser)]
#[command(name = "deck")]
#[command(about = "Create, inspect and export Deck presentations")]
#[command(version)]
pub struct CliArgs {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Slide canvas width in pixels
    #[arg(long, global = true, env = "DECK_CANVAS_WIDTH", default_value = "1280")]
    pub canvas_width: u32,

    /// Slide canvas height in pixels
    #[arg(long, global = true, env = "DECK_CANVAS_HEIGHT", default_value = "720")]
    pub canvas_height: u32,

    /// Maximum number of undo steps
    #[arg(long, global = true, env = "DECK_HISTORY_LIMIT", default_value = "50")]
    pub history_limit: usize,
}

/// Deck subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create a new presentation with one empty slide
    New {
        /// Output file
        out: PathBuf,
        /// Presentation title
        #[arg(long)]
        title: Option<String>,
    },

    /// Print a summary of a presentation file
    Info {
        /// Presentation file
        file: PathBuf,
    },

    /// Render one slide to an image
    ExportImage {
        /// Presentation file
        file: PathBuf,
        /// Slide number starting at 1 (defaults to the active slide)
        #[arg(long)]
        slide: Option<usize>,
        /// Image format
        #[arg(long, value_enum, default_value = "png")]
        format: ImageFormatArg,
        /// Output file
        #[arg(long)]
        out: PathBuf,
    },

    /// Write the presentation-file projection of every slide
    ExportDeck {
        /// Presentation file
        file: PathBuf,
        /// Output file
        #[arg(long)]
        out: PathBuf,
    },
}

/// Raster format accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageFormatArg {
    /// PNG image.
    Png,
    /// JPEG image.
    Jpeg,
}

impl From<ImageFormatArg> for RasterFormat {
    fn from(arg: ImageFormatArg) -> Self {
        match arg {
            ImageFormatArg::Png => Self::Png,
            ImageFormatArg::Jpeg => Self::Jpeg,
        }
    }
}

impl From<&CliArgs> for EditorConfig {
    fn from(args: &CliArgs) -> Self {
        Self {
            history_limit: args.history_limit,
            canvas_width: args.canvas_width,
            canvas_height: args.canvas_height,
            ..Self::default()
        }
    }
}

impl From<&CliArgs> for ExportConfig {
    fn from(args: &CliArgs) -> Self {
        Self::for_canvas(args.canvas_width, args.canvas_height)
    }
}
