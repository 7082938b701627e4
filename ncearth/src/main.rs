mod animate;
mod options;
mod overlay;
mod perimeter;
mod progress;

use anyhow::Result;
use clap::Parser;
use firekml::Outcome;
use log::{error, warn};
use options::Cli;
use std::process::ExitCode;

/// Exit status of a single-shot command with nothing to show.
const NO_DATA: u8 = 2;

fn main() -> Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();
    let outcome = match cli {
        Cli::Perimeter(perimeter) => perimeter.run(),
        Cli::Shapefile(shapefile) => shapefile.run(),
        Cli::Overlay(overlay) => overlay.run(),
        Cli::Kmz(kmz) => kmz.run(),
        Cli::Preload(preload) => preload.run(),
        Cli::Sequence(sequence) => sequence.run(),
    };
    match outcome {
        Ok(outcome) => {
            match &outcome {
                Outcome::Written(paths) => {
                    for path in paths {
                        println!("{}", path.display());
                    }
                }
                Outcome::NoData => {
                    warn!("no valid data at the requested step, nothing written");
                }
            }
            Ok(ExitCode::from(status(&outcome)))
        }
        Err(e) => {
            error!("{e:#}");
            Err(e)
        }
    }
}

/// Returns the process exit status for a finished command.
fn status(outcome: &Outcome) -> u8 {
    match outcome {
        Outcome::Written(_) => 0,
        Outcome::NoData => NO_DATA,
    }
}
