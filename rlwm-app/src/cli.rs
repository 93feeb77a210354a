use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, TimeZone};
use clap::Parser;
use rlwm_experiment::ExperimentConfig;

#[derive(Parser, Debug)]
#[command(name = "rlwm")]
#[command(version)]
#[command(about = "Reinforcement learning and working memory task")]
pub struct Cli {
    /// JSON configuration file; flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Set size of each block, in order (each 2-6)
    #[arg(long, value_delimiter = ',')]
    pub set_sizes: Option<Vec<usize>>,

    /// Presentations of every stimulus per block
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Feedback display time in milliseconds
    #[arg(long = "feedback-ms")]
    pub feedback_ms: Option<u64>,

    /// Pause before each trial in milliseconds
    #[arg(long = "iti-ms")]
    pub iti_ms: Option<u64>,

    /// Random seed for reproducible blocks
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file for results (default: rlwm-data-<timestamp>.json)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Enable debug logging. `RUST_LOG` takes precedence when set.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Builds the configuration from the file (or defaults) plus flag overrides.
    pub fn experiment_config(&self) -> Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::load(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?,
            None => ExperimentConfig::default(),
        };

        if let Some(sizes) = &self.set_sizes {
            if sizes.is_empty() {
                bail!("--set-sizes needs at least one block");
            }
            let mut edited = ExperimentConfig::from_set_sizes(sizes);
            for (block, &size) in sizes.iter().enumerate() {
                edited.set_block_size(block, size)?;
            }
            config.blocks = edited.blocks;
        }
        if let Some(iterations) = self.iterations {
            config.iterations_per_stimulus = iterations;
        }
        if let Some(ms) = self.feedback_ms {
            config.feedback_duration_ms = ms;
        }
        if let Some(ms) = self.iti_ms {
            config.inter_trial_interval_ms = ms;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn output_path<Tz: TimeZone>(&self, now: DateTime<Tz>) -> PathBuf
    where
        Tz::Offset: std::fmt::Display,
    {
        match &self.output {
            Some(path) => path.clone(),
            None => PathBuf::from(format!("rlwm-data-{}.json", now.format("%Y%m%d-%H%M%S"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("rlwm").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_to_reference_config() {
        let config = parse(&[]).experiment_config().unwrap();
        assert_eq!(config, ExperimentConfig::default());
    }

    #[test]
    fn flags_override_config() {
        let cli = parse(&["--set-sizes", "2,5", "--iterations", "4", "--feedback-ms", "100", "--iti-ms", "0"]);
        let config = cli.experiment_config().unwrap();
        assert_eq!(config.set_sizes(), vec![2, 5]);
        assert_eq!(config.iterations_per_stimulus, 4);
        assert_eq!(config.feedback_duration_ms, 100);
        assert_eq!(config.inter_trial_interval_ms, 0);
    }

    #[test]
    fn out_of_range_set_size_is_rejected() {
        assert!(parse(&["--set-sizes", "2,7"]).experiment_config().is_err());
        assert!(parse(&["--set-sizes", "1"]).experiment_config().is_err());
        assert!(parse(&["--iterations", "0"]).experiment_config().is_err());
    }

    #[test]
    fn default_output_is_timestamped() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 9, 5, 30).unwrap();
        assert_eq!(parse(&[]).output_path(now), PathBuf::from("rlwm-data-20261017-090530.json"));
        assert_eq!(
            parse(&["--output", "out.json"]).output_path(now),
            PathBuf::from("out.json")
        );
    }
}
