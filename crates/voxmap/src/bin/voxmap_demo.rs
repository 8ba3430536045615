//! # VOXMAP Demo
//!
//! Walks a player across a procedural world and writes the minimap to PNG.
//!
//! ## Usage
//!
//! ```bash
//! voxmap_demo demos/voxmap.toml --frames 600 --out minimap.png
//! ```
//!
//! Log level follows `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use voxmap::{run_demo, DemoConfig, DemoError, DemoSummary};
use voxmap::rendering::MinimapConfig;

struct Cli {
    config: Option<PathBuf>,
    frames: Option<u32>,
    output: Option<PathBuf>,
    paced: bool,
}

fn print_help() {
    println!("Usage: voxmap_demo [CONFIG] [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -f, --frames <N>      Frames to render (default: 300)");
    println!("  -o, --out <PATH>      Output PNG (default: voxmap_demo.png)");
    println!("  -p, --paced           Run at the configured frame rate");
    println!("  -h, --help            Show this help");
}

fn parse_args() -> Option<Cli> {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = Cli {
        config: None,
        frames: None,
        output: None,
        paced: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--frames" | "-f" => {
                if i + 1 < args.len() {
                    cli.frames = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--out" | "-o" => {
                if i + 1 < args.len() {
                    cli.output = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--paced" | "-p" => cli.paced = true,
            "--help" | "-h" => {
                print_help();
                return None;
            }
            other if !other.starts_with('-') => cli.config = Some(PathBuf::from(other)),
            other => tracing::warn!("ignoring unknown option {other}"),
        }
        i += 1;
    }
    Some(cli)
}

fn run(cli: Cli) -> Result<DemoSummary, DemoError> {
    let (minimap, mut demo) = match &cli.config {
        Some(path) => {
            tracing::info!("loading {}", path.display());
            (MinimapConfig::load(path)?, DemoConfig::load(path)?)
        }
        None => (MinimapConfig::default(), DemoConfig::default()),
    };
    if let Some(frames) = cli.frames {
        demo.walk.frames = frames;
    }
    if cli.output.is_some() {
        demo.walk.output = cli.output;
    }
    demo.walk.paced |= cli.paced;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(DemoError::Runtime)?;
    runtime.block_on(run_demo(&minimap, &demo))
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let Some(cli) = parse_args() else {
        return ExitCode::SUCCESS;
    };

    match run(cli) {
        Ok(summary) => {
            tracing::info!(
                "{} frames ({} drawn), {} tiles cached, {} chunks streamed, {} block colors from textures",
                summary.frames,
                summary.drawn,
                summary.tiles_cached,
                summary.chunks_streamed,
                summary.table.resolved
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
