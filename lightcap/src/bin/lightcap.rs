use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use common::log_setup::setup_logging;
use lightcap::config::RunConfig;
use lightcap::export::write_csv;

/// Differential photometry light curve from a sequence of FITS frames
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// YAML run description (frames, apertures, method)
    #[arg(short, long)]
    config: PathBuf,

    /// CSV output file; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Directory for rotated log files
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_logging(&args.log_level, &args.log_dir, "lightcap")?;

    let config = RunConfig::from_file(&args.config)?;
    tracing::info!(
        "Running '{}' with {} method",
        config.frames.display(),
        config.method
    );

    let curve = config.run().context("Light curve run failed")?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create '{}'", path.display()))?;
            write_csv(&curve, BufWriter::new(file))?;
            tracing::info!("Light curve written to '{}'", path.display());
        }
        None => write_csv(&curve, io::stdout().lock())?,
    }

    Ok(())
}
