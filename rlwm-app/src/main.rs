//! Terminal front end for the RLWM task.
//!
//! Shows each stimulus, reads `1`/`2`/`3` from stdin, holds the feedback and
//! inter-trial delays, and writes the results as JSON when the run ends.

mod app;
mod cli;
mod input;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rlwm_experiment::export;
use rlwm_timing::HighPrecisionTimer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::{App, Outcome};
use cli::Cli;
use input::ChannelLines;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = cli.experiment_config()?;
    let mut rng: Box<dyn RngCore> = match cli.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::rng()),
    };

    let mut app = App::new(
        &config,
        &mut rng,
        HighPrecisionTimer::new(),
        ChannelLines::stdin(),
        std::io::stdout(),
    )?;

    match app.run()? {
        Outcome::Completed(results) => {
            let path = cli.output_path(chrono::Local::now());
            export::save(&results, &path)
                .with_context(|| format!("failed to write results to {}", path.display()))?;
            info!(path = %path.display(), "results saved");
            println!("Results saved to {}. Thank you!", path.display());
        }
        Outcome::Abandoned => {
            println!("Experiment abandoned. Nothing was saved.");
        }
    }

    Ok(())
}
