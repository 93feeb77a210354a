//! Error types for the task engine.

use thiserror::Error;

/// Everything that can stop an experiment from being set up or exported.
///
/// Configuration variants are raised before any block is materialized, so a
/// failed setup never leaves a partial experiment behind.
#[derive(Error, Debug)]
pub enum ExperimentError {
    #[error("Configuration error: block list is empty")]
    EmptyBlockList,

    #[error("Configuration error: block {block} has invalid set size {set_size}")]
    InvalidSetSize { block: usize, set_size: usize },

    #[error(
        "Configuration error: block {block} needs {set_size} stimuli but category '{category}' has {available}"
    )]
    SetSizeExceedsCategory {
        block: usize,
        set_size: usize,
        category: String,
        available: usize,
    },

    #[error("Configuration error: iterations per stimulus must be at least 1")]
    ZeroIterations,

    #[error("Configuration error: no stimulus categories defined")]
    NoCategories,

    #[error("Configuration error: block {block} does not exist ({count} blocks configured)")]
    BlockOutOfRange { block: usize, count: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ExperimentError {
    pub fn is_config(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::Serialization(_))
    }
}

pub type Result<T> = std::result::Result<T, ExperimentError>;
