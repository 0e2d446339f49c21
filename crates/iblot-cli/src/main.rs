//! iblot: export drawings to plotter scripts and SVG from the command line.
//!
//! Reads a drawing document, optionally erases parts of it, runs the
//! export pipeline and writes the result to a file or stdout. Useful
//! for:
//!
//! - Comparing effects and intensities on the same drawing
//! - Producing reproducible noise/jitter output with `--seed`
//! - Converting line-art SVGs into plotter scripts
//!
//! # Usage
//!
//! ```text
//! cargo run --bin iblot -- [OPTIONS] <INPUT>
//! ```
//!
//! `INPUT` is either a JSON drawing document:
//!
//! ```text
//! {"canvas": {"width": 250, "height": 250},
//!  "drawing": [[{"x": 10, "y": 10}, {"x": 20, "y": 20}]]}
//! ```
//!
//! or an `.svg` file whose straight-line paths are imported.

#![allow(clippy::print_stderr)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::info;

use iblot_export::{ExportError, ImportError};
use iblot_pipeline::{
    Dimensions, EffectKind, EffectSettings, ExportConfig, ExportFormat, Intensity, PipelineError,
    Point, Session, Snapshot,
};

/// Export drawings to plotter scripts and SVG.
///
/// Normalizes the drawing into the output space, applies an optional
/// effect and writes the result.
#[derive(Parser)]
#[command(name = "iblot", version)]
struct Cli {
    /// Drawing document (.json) or SVG file (.svg).
    input: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Script)]
    format: Format,

    /// Width of the output space.
    #[arg(long, default_value_t = ExportConfig::DEFAULT_WIDTH)]
    width: f64,

    /// Height of the output space.
    #[arg(long, default_value_t = ExportConfig::DEFAULT_HEIGHT)]
    height: f64,

    /// Mirror the vertical axis (default: on for scripts, off for SVG).
    #[arg(long)]
    flip_y: Option<bool>,

    /// Clamp coordinates to the output space.
    #[arg(long)]
    clamp: bool,

    /// Effect to apply.
    #[arg(long, value_enum)]
    effect: Option<Effect>,

    /// Effect intensity in (0, 1].
    #[arg(long, default_value_t = Intensity::default().get())]
    intensity: f64,

    /// Seed for the noise and jitter effects.
    #[arg(long)]
    seed: Option<u64>,

    /// Erase points within R of (X, Y) in canvas space, as `X,Y,R`.
    /// May be repeated; erasers are applied in order.
    #[arg(long, value_parser = parse_eraser)]
    erase: Vec<Eraser>,

    /// Canvas size the drawing was captured on, as `WxH`.
    ///
    /// Overrides the document's canvas. Required for SVG input without
    /// a `viewBox`.
    #[arg(long, value_parser = parse_canvas)]
    canvas: Option<Dimensions>,

    /// Title embedded in the output (default: the input file stem).
    #[arg(long)]
    title: Option<String>,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Full export config as a JSON string.
    ///
    /// When provided, all other export parameter flags are ignored.
    /// The JSON must be a valid `ExportConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,
}

/// Output format selection.
#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// JavaScript program for the plotter runtime.
    Script,
    /// SVG document.
    Svg,
}

/// Effect selection.
#[derive(Clone, Copy, ValueEnum)]
enum Effect {
    /// Vertical sine displacement.
    Wave,
    /// Twist about the center.
    Spiral,
    /// Shrink toward the center.
    Implode,
    /// Rotated copies about the center.
    Kaleidoscope,
    /// Random displacement of every point.
    Noise,
    /// Random displacement of about half the points.
    Jitter,
}

/// One `--erase` argument.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Eraser {
    center: Point,
    radius: f64,
}

/// Everything that can go wrong in the CLI.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Error parsing --config-json: {0}")]
    ConfigJson(serde_json::Error),

    #[error(transparent)]
    Config(#[from] PipelineError),

    #[error("Error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error parsing drawing document {}: {source}", path.display())]
    Document {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Error importing {}: {source}", path.display())]
    Import { path: PathBuf, source: ImportError },

    #[error("{} has no viewBox; pass --canvas WxH", path.display())]
    MissingCanvas { path: PathBuf },

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Error writing {target}: {source}")]
    Write {
        target: String,
        source: std::io::Error,
    },
}

fn parse_eraser(s: &str) -> Result<Eraser, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("expected X,Y,R: {e}"))?;
    let [x, y, radius] = parts[..] else {
        return Err(format!("expected X,Y,R, got {} values", parts.len()));
    };
    Ok(Eraser {
        center: Point::new(x, y),
        radius,
    })
}

fn parse_canvas(s: &str) -> Result<Dimensions, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got {s:?}"))?;
    let width = w.trim().parse::<f64>().map_err(|e| format!("bad width: {e}"))?;
    let height = h.trim().parse::<f64>().map_err(|e| format!("bad height: {e}"))?;
    Dimensions::new(width, height)
        .validate()
        .map_err(|e| e.to_string())
}

/// Build an [`ExportConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored. Otherwise, a config is
/// assembled from the individual flags.
fn config_from_cli(cli: &Cli) -> Result<ExportConfig, CliError> {
    let config: ExportConfig = if let Some(ref json) = cli.config_json {
        serde_json::from_str(json).map_err(CliError::ConfigJson)?
    } else {
        let effect = match cli.effect {
            Some(effect) => Some(EffectSettings::new(
                match effect {
                    Effect::Wave => EffectKind::Wave,
                    Effect::Spiral => EffectKind::Spiral,
                    Effect::Implode => EffectKind::Implode,
                    Effect::Kaleidoscope => EffectKind::Kaleidoscope,
                    Effect::Noise => EffectKind::Noise,
                    Effect::Jitter => EffectKind::Jitter,
                },
                Intensity::new(cli.intensity)?,
            )),
            None => None,
        };
        ExportConfig {
            format: match cli.format {
                Format::Script => ExportFormat::Script,
                Format::Svg => ExportFormat::Svg,
            },
            width: cli.width,
            height: cli.height,
            flip_y: cli.flip_y,
            clamp: cli.clamp,
            effect,
            seed: cli.seed,
        }
    };
    config.validate()?;
    Ok(config)
}

/// Read the input into a snapshot, picking the reader by extension.
fn load_snapshot(path: &Path, canvas: Option<Dimensions>) -> Result<Snapshot, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let is_svg = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

    if is_svg {
        let imported = iblot_export::from_svg(&content).map_err(|source| CliError::Import {
            path: path.to_path_buf(),
            source,
        })?;
        let canvas = canvas
            .or(imported.dimensions)
            .ok_or_else(|| CliError::MissingCanvas {
                path: path.to_path_buf(),
            })?;
        return Ok(Snapshot {
            canvas,
            drawing: imported.drawing,
        });
    }

    let mut snapshot: Snapshot =
        serde_json::from_str(&content).map_err(|source| CliError::Document {
            path: path.to_path_buf(),
            source,
        })?;
    if let Some(canvas) = canvas {
        snapshot.canvas = canvas;
    }
    Ok(snapshot)
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = config_from_cli(cli)?;
    let snapshot = load_snapshot(&cli.input, cli.canvas)?;
    info!(
        "loaded {}: {} strokes, {} points on {}x{}",
        cli.input.display(),
        snapshot.drawing.len(),
        snapshot.drawing.point_count(),
        snapshot.canvas.width,
        snapshot.canvas.height,
    );

    let mut session = Session::with_drawing(snapshot.drawing, snapshot.canvas);
    for eraser in &cli.erase {
        let removed = session.erase(eraser.center, eraser.radius);
        info!(
            "erase at ({}, {}) r={} removed {removed} points",
            eraser.center.x, eraser.center.y, eraser.radius
        );
    }

    let title = cli
        .title
        .as_deref()
        .or_else(|| cli.input.file_stem().and_then(|s| s.to_str()));
    let mut rng = config.rng();
    let output = iblot_export::export_titled(&session.snapshot(), &config, title, &mut rng)?;

    match cli.output {
        Some(ref path) => {
            std::fs::write(path, &output).map_err(|source| CliError::Write {
                target: path.display().to_string(),
                source,
            })?;
            info!(
                "{} written to {} ({} bytes)",
                config.format,
                path.display(),
                output.len()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|source| CliError::Write {
                    target: "stdout".to_string(),
                    source,
                })?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
