//! CLI argument definitions using Clap v4

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use linktag::template::SUPPORTED_DPI;

/// linktag - printable link labels from the command line
#[derive(Parser, Debug)]
#[command(name = "linktag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Display templates, print densities and the font in use
    #[command(alias = "i")]
    Info(InfoArgs),

    /// Render one label to a PNG file
    #[command(alias = "r")]
    Render(Box<RenderArgs>),

    /// Render labels from a JSONL file, one job per line
    Batch(BatchArgs),
}

impl Commands {
    pub fn verbose(&self) -> bool {
        match self {
            Self::Info(_) => false,
            Self::Render(args) => args.verbose,
            Self::Batch(args) => args.verbose,
        }
    }

    pub fn quiet(&self) -> bool {
        match self {
            Self::Info(_) => false,
            Self::Render(args) => args.quiet,
            Self::Batch(args) => args.quiet,
        }
    }
}

/// Arguments for the info command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Only list templates
    #[arg(long)]
    pub templates: bool,

    /// Only show which font would be used
    #[arg(long)]
    pub fonts: bool,
}

/// Arguments for the render command
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Template: bar, stack-3, stack-6 or stack-N
    #[arg(short = 't', long = "template", default_value = "bar")]
    pub template: String,

    /// Print density in dots per inch
    #[arg(short = 'd', long = "dpi", default_value_t = 300, value_parser = parse_dpi)]
    pub dpi: u32,

    /// Starting text size in points; text shrinks until it fits
    #[arg(short = 's', long = "font-size", default_value_t = 18.0)]
    pub font_size: f32,

    /// Literal code payload
    #[arg(short = 'p', long = "payload", conflicts_with = "link")]
    pub payload: Option<String>,

    /// Link base identifier, e.g. 2L3
    #[arg(short = 'l', long = "link", requires_all = ["from", "to"])]
    pub link: Option<String>,

    /// Source position as RACK-UNIT, e.g. D12-43
    #[arg(long = "from", requires = "link")]
    pub from: Option<String>,

    /// Destination position as RACK-UNIT, e.g. AE12-43
    #[arg(long = "to", requires = "link")]
    pub to: Option<String>,

    /// Port count carried by the link
    #[arg(long = "ports", default_value = "48")]
    pub ports: String,

    /// Slot text, optionally with its own fill: TEXT or TEXT:#RRGGBB (repeatable)
    #[arg(long = "slot", action = ArgAction::Append)]
    pub slots: Vec<String>,

    /// Read slot texts from a file, one per non-empty line (TEXT or TEXT:#RRGGBB)
    #[arg(long = "slots-file", conflicts_with_all = ["slots", "auto_slots"])]
    pub slots_file: Option<PathBuf>,

    /// Fill the first N slots with BASE.1 .. BASE.N, leaving the rest blank
    #[arg(long = "auto-slots", conflicts_with = "slots")]
    pub auto_slots: Option<usize>,

    /// Default slot fill color
    #[arg(short = 'c', long = "color", default_value = "#ef2f68")]
    pub color: String,

    /// Font file to try before the system fonts
    #[arg(short = 'f', long = "font-file")]
    pub font_file: Option<PathBuf>,

    /// Outer border thickness in points
    #[arg(long = "border")]
    pub border: Option<f32>,

    /// Outer border color
    #[arg(long = "border-color", default_value = "#1f1f1f")]
    pub border_color: String,

    /// Output directory, or a file path ending in .png
    #[arg(short = 'o', long = "output", default_value = ".")]
    pub output: PathBuf,

    /// Silent mode
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Verbose output
    #[arg(long = "verbose")]
    pub verbose: bool,
}

/// Arguments for the batch command
#[derive(Parser, Debug)]
pub struct BatchArgs {
    /// Input JSONL file (stdin if omitted)
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output directory for rendered files
    #[arg(short = 'o', long = "output", default_value = ".")]
    pub output: PathBuf,

    /// Font file to try before the system fonts
    #[arg(short = 'f', long = "font-file")]
    pub font_file: Option<PathBuf>,

    /// Worker threads (0 = one per core)
    #[arg(short = 'j', long = "jobs", default_value_t = 0)]
    pub jobs: usize,

    /// Silent mode
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Verbose output
    #[arg(long = "verbose")]
    pub verbose: bool,
}

fn parse_dpi(raw: &str) -> Result<u32, String> {
    let dpi: u32 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a whole number"))?;
    if SUPPORTED_DPI.contains(&dpi) {
        Ok(dpi)
    } else {
        Err(format!("supported densities are {SUPPORTED_DPI:?}"))
    }
}
