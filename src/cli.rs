//! Command-line front end over the sheet service.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use sheetline_core::request::{
    AppendBody, AppendQuery, ReadQuery, RecordList, UpdateBody, UpdateData, UpdatePayload,
    UpdateQuery,
};
use sheetline_core::{CsvWorkbooks, SheetService};
use sheetline_engine::engine::{OutputMode, Rgb, StyleOverrides};
use std::path::PathBuf;
use tracing::debug;

use crate::config::load_config;

/// Placeholder for an omitted range segment.
pub const SKIP_SEGMENT: &str = "-";

#[derive(Parser, Debug)]
#[command(name = "sheetline", version, about = "Read, append to and update header-keyed grids")]
pub struct Cli {
    /// Configuration file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding one subdirectory of CSV sheets per spreadsheet
    #[arg(long, global = true, env = "SHEETLINE_ROOT")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read a range and print it as LIST, KEY_VALUE or KEY_PAIR
    Get(GetArgs),
    /// Append records under a sheet's header row
    Append(AppendArgs),
    /// Write records over a range, aligned to the sheet's header row
    Update(UpdateArgs),
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Spreadsheet id
    #[arg(long)]
    pub id: String,

    /// Range segments: SHEET [FROM [TO]], with "-" for an omitted segment
    #[arg(long, num_args = 1..=3, allow_hyphen_values = true)]
    pub range: Vec<String>,

    /// Output shape
    #[arg(long = "type", default_value = "LIST")]
    pub mode: OutputMode,

    /// Maximum number of data rows (zero or negative for no limit)
    #[arg(long, allow_hyphen_values = true)]
    pub limit: Option<i64>,
}

#[derive(Args, Debug)]
pub struct AppendArgs {
    /// Spreadsheet id
    #[arg(long)]
    pub id: String,

    /// Sheet whose first row is the header
    #[arg(long)]
    pub sheet_name: String,

    /// Numeric id of the sheet rows are appended to
    #[arg(long, default_value_t = 0)]
    pub sheet_id: u32,

    /// JSON array of records, or @FILE to read it from a file
    #[arg(long)]
    pub data: String,

    /// Background color as r,g,b[,a]
    #[arg(long, value_parser = parse_rgb)]
    pub bg: Option<Rgb>,

    /// Text color as r,g,b
    #[arg(long, value_parser = parse_rgb)]
    pub fg: Option<Rgb>,

    /// Font family
    #[arg(long)]
    pub font: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Spreadsheet id
    #[arg(long)]
    pub id: String,

    /// Range segments: SHEET [FROM [TO]]
    #[arg(long, num_args = 1..=3, required = true, allow_hyphen_values = true)]
    pub range: Vec<String>,

    /// JSON array of records, or @FILE to read it from a file
    #[arg(long)]
    pub values: String,
}

/// Parse "r,g,b" or "r,g,b,a" into a color.
pub fn parse_rgb(s: &str) -> std::result::Result<Rgb, String> {
    let channels = s
        .split(',')
        .map(|c| {
            c.trim()
                .parse::<u8>()
                .map_err(|e| format!("invalid color channel '{}': {}", c.trim(), e))
        })
        .collect::<std::result::Result<Vec<u8>, String>>()?;
    Rgb::try_from(channels)
}

/// Map CLI range words to positional segments.
pub fn range_segments(words: &[String]) -> Vec<Option<String>> {
    words
        .iter()
        .map(|w| (w != SKIP_SEGMENT).then(|| w.clone()))
        .collect()
}

fn read_json_arg(arg: String) -> Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
        }
        None => Ok(arg),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Execute a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let (config, warnings) = load_config(cli.config.as_deref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let root = config
        .workbook_root(cli.root.as_deref())
        .context("No workbook directory: pass --root or set storage.root in the config file")?;
    debug!(root = %root.display(), "opening csv workbooks");
    let service = SheetService::new(CsvWorkbooks::new(root)).with_style(config.style);

    match cli.command {
        Command::Get(args) => {
            let query = ReadQuery {
                id: args.id,
                mode: args.mode,
                limit: args.limit,
                range: range_segments(&args.range),
            };
            print_json(&service.read(&query)?)
        }
        Command::Append(args) => {
            let query = AppendQuery {
                id: args.id,
                sheet_id: args.sheet_id,
                sheet_name: args.sheet_name,
            };
            let body = AppendBody {
                data: RecordList::Encoded(read_json_arg(args.data)?),
                props: Some(StyleOverrides {
                    bgrgb: args.bg,
                    fgrgb: args.fg,
                    font: args.font,
                }),
            };
            print_json(&service.append(&query, body)?)
        }
        Command::Update(args) => {
            let query = UpdateQuery { id: args.id };
            let body = UpdateBody {
                data: UpdatePayload::Structured(UpdateData {
                    range: range_segments(&args.range),
                    values: RecordList::Encoded(read_json_arg(args.values)?),
                }),
            };
            print_json(&service.update(&query, body)?)
        }
    }
}
