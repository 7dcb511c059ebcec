//! strokemove command line entry point.

mod commands;

use clap::{Parser, Subcommand};
use commands::CliError;
use kurbo::{Point, Vec2};
use std::path::PathBuf;
use std::process::ExitCode;
use strokemove_core::storage::FileStorage;

#[derive(Debug, Parser)]
#[command(
    name = "strokemove",
    version,
    about = "Select, move, lasso and export handwritten strokes"
)]
struct Cli {
    /// Directory notes are stored in (defaults to the per-user data directory).
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an empty note and print its id.
    New { title: String },
    /// List stored notes.
    List,
    /// Draw a stroke through the given points with the pen.
    Draw {
        note: String,
        /// Points as "x,y x,y ...".
        #[arg(long, value_parser = parse_polyline, allow_hyphen_values = true)]
        points: Polyline,
        /// Nib width.
        #[arg(long)]
        width: Option<f64>,
    },
    /// Print the index of the first stroke under a point.
    Hit {
        note: String,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },
    /// Select the stroke under `--at` and drag it by `--by`.
    Move {
        note: String,
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        at: Point,
        #[arg(long, value_parser = parse_vec, allow_hyphen_values = true)]
        by: Vec2,
    },
    /// Report which strokes a lasso polygon covers, as JSON.
    Lasso {
        note: String,
        /// Polygon as "x,y x,y x,y ...".
        #[arg(long, value_parser = parse_polyline, allow_hyphen_values = true)]
        polygon: Polyline,
    },
    /// Export strokes to PNG.
    Export {
        note: String,
        /// Stroke indices to export; the whole canvas when omitted.
        #[arg(long, value_delimiter = ',', conflicts_with = "lasso")]
        select: Vec<usize>,
        /// Export whatever this lasso polygon covers.
        #[arg(long, value_parser = parse_polyline, allow_hyphen_values = true)]
        lasso: Option<Polyline>,
        /// Resolution multiplier.
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
        #[arg(long)]
        out: PathBuf,
    },
}

/// Whitespace-separated `x,y` pairs.
#[derive(Debug, Clone, PartialEq)]
struct Polyline(Vec<Point>);

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{}'", s))?;
    let x = x.trim().parse::<f64>().map_err(|e| format!("bad x in '{}': {}", s, e))?;
    let y = y.trim().parse::<f64>().map_err(|e| format!("bad y in '{}': {}", s, e))?;
    Ok(Point::new(x, y))
}

fn parse_vec(s: &str) -> Result<Vec2, String> {
    parse_point(s).map(|p| p.to_vec2())
}

fn parse_polyline(s: &str) -> Result<Polyline, String> {
    let points = s
        .split_whitespace()
        .map(parse_point)
        .collect::<Result<Vec<_>, _>>()?;
    if points.is_empty() {
        return Err("expected at least one x,y point".to_string());
    }
    Ok(Polyline(points))
}

fn run(cli: Cli) -> Result<(), CliError> {
    let storage = match cli.storage_dir {
        Some(dir) => FileStorage::new(dir)?,
        None => FileStorage::default_location()?,
    };

    let output = match cli.command {
        Command::New { title } => commands::new_note(&storage, &title)?,
        Command::List => commands::list_notes(&storage)?,
        Command::Draw { note, points, width } => commands::draw(&storage, &note, &points.0, width)?,
        Command::Hit { note, x, y } => commands::hit(&storage, &note, Point::new(x, y))?,
        Command::Move { note, at, by } => commands::move_stroke(&storage, &note, at, by)?,
        Command::Lasso { note, polygon } => commands::lasso(&storage, &note, &polygon.0)?,
        Command::Export {
            note,
            select,
            lasso,
            scale,
            out,
        } => {
            let source = match lasso {
                Some(polygon) => commands::ExportSource::Lasso(polygon.0),
                None => commands::ExportSource::Indices(select),
            };
            commands::export(&storage, &note, source, scale, &out)?
        }
    };
    println!("{}", output);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
