// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanwerk — command-line shell for trying the scanner on still images.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::human_errors::humanize_error;
use scanwerk_core::{Point, RectifyRequest, ScannerConfig};
use scanwerk_vision::codec::decode_path;
use scanwerk_vision::geometry::order_corners;
use scanwerk_vision::{Pipeline, encode_jpeg};
use tracing::info;

#[derive(Parser)]
#[command(name = "scanwerk", version)]
#[command(about = "Find documents in photos and flatten them")]
struct Cli {
    /// Scanner settings file (JSON); defaults apply when omitted
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the document boundary found in an image
    Detect {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Print the detection as JSON
        #[arg(long)]
        json: bool,
    },

    /// Flatten the region inside four corners
    Rectify {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Corners as x1,y1,x2,y2,x3,y3,x4,y4 in any order
        #[arg(long, value_name = "COORDS", allow_hyphen_values = true)]
        corners: String,

        /// JPEG quality in [0, 1]
        #[arg(long)]
        quality: Option<f64>,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Detect then flatten; writes the original when no page is found
    Capture {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// JPEG quality in [0, 1]
        #[arg(long)]
        quality: Option<f64>,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Print the effective settings, or write them to a file
    Config {
        #[arg(long, value_name = "FILE")]
        write: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let human = humanize_error(&err);
            eprintln!("error [{}]: {}", err.code(), human.message);
            eprintln!("  {}", human.suggestion);
            eprintln!("  ({err})");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so `detect --json` output stays clean.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ScannerConfig::load(path)?,
        None => ScannerConfig::default(),
    };

    match cli.command {
        Command::Detect { image, json } => detect(&Pipeline::new(config)?, &image, json),
        Command::Rectify {
            image,
            corners,
            quality,
            output,
        } => rectify(&Pipeline::new(config)?, &image, &corners, quality, &output),
        Command::Capture {
            image,
            quality,
            output,
        } => capture(&Pipeline::new(config)?, &image, quality, &output),
        Command::Config { write } => match write {
            Some(path) => {
                config.save(&path)?;
                info!(path = %path.display(), "Settings written");
                Ok(())
            }
            None => {
                println!("{}", serde_json::to_string_pretty(&config)?);
                Ok(())
            }
        },
    }
}

fn detect(pipeline: &Pipeline, image: &Path, json: bool) -> Result<()> {
    let img = decode_path(image)?;
    let detection = pipeline.detect(&img)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&detection)?);
        return Ok(());
    }
    match detection {
        Some(det) => {
            let q = det.quad;
            println!("confidence {:.3}", det.confidence);
            for (name, p) in [
                ("top-left", q.top_left),
                ("top-right", q.top_right),
                ("bottom-right", q.bottom_right),
                ("bottom-left", q.bottom_left),
            ] {
                println!("{name:>13}  {:8.1} {:8.1}", p.x, p.y);
            }
        }
        None => println!("none"),
    }
    Ok(())
}

fn rectify(
    pipeline: &Pipeline,
    image: &Path,
    corners: &str,
    quality: Option<f64>,
    output: &Path,
) -> Result<()> {
    let quad = order_corners(parse_corners(corners)?)?;
    let img = decode_path(image)?;
    let request = RectifyRequest {
        quad,
        quality: pipeline.resolve_quality(quality),
    };
    let bytes = pipeline.rectify_encoded(&img, request)?;
    std::fs::write(output, &bytes)?;
    info!(path = %output.display(), bytes = bytes.len(), "Rectified page written");
    Ok(())
}

fn capture(pipeline: &Pipeline, image: &Path, quality: Option<f64>, output: &Path) -> Result<()> {
    let img = decode_path(image)?;
    let quality = pipeline.resolve_quality(quality);
    let bytes = match pipeline.detect(&img)? {
        Some(det) => pipeline.rectify_encoded(&img, RectifyRequest { quad: det.quad, quality })?,
        None => {
            info!("No page detected, writing the original image");
            encode_jpeg(&img.to_rgb8(), quality)?
        }
    };
    std::fs::write(output, &bytes)?;
    info!(path = %output.display(), bytes = bytes.len(), "Capture written");
    Ok(())
}

/// Parse `x1,y1,x2,y2,x3,y3,x4,y4`.
fn parse_corners(text: &str) -> Result<[Point; 4]> {
    let values = text
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| ScanError::InvalidGeometry(format!("'{}' is not a number", v.trim())))
        })
        .collect::<Result<Vec<f64>>>()?;
    if values.len() != 8 {
        return Err(ScanError::InvalidGeometry(format!(
            "expected 8 coordinates, got {}",
            values.len()
        )));
    }
    Ok([
        Point::new(values[0], values[1]),
        Point::new(values[2], values[3]),
        Point::new(values[4], values[5]),
        Point::new(values[6], values[7]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_eight_coordinates() {
        let pts = parse_corners("10,20, 30,40,50,60,70,80").unwrap();
        assert_eq!(pts[3], Point::new(70.0, 80.0));
    }

    #[test]
    fn rejects_short_corner_list() {
        assert!(matches!(parse_corners("1,2,3"), Err(ScanError::InvalidGeometry(_))));
        assert!(parse_corners("1,2,3,4,5,6,7,x").is_err());
    }

    #[test]
    fn rectify_arguments() {
        let cli = Cli::try_parse_from([
            "scanwerk",
            "-v",
            "rectify",
            "page.jpg",
            "--corners",
            "0,0,10,0,10,10,0,10",
            "-o",
            "out.jpg",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Rectify { quality: None, .. }));
    }
}
