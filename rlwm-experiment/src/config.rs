use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ExperimentError, Result};
use crate::trial::TrialTiming;

/// Smallest set size offered when editing the block list.
pub const MIN_SET_SIZE: usize = 2;
/// Largest set size offered when editing the block list.
pub const MAX_SET_SIZE: usize = 6;
/// Set size given to a newly added block.
pub const DEFAULT_SET_SIZE: usize = 3;

/// A named pool of symbols; a block draws its stimuli from the front of one pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StimulusCategory {
    pub name: String,
    pub symbols: Vec<String>,
}

impl StimulusCategory {
    pub fn new(name: &str, symbols: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

pub fn default_categories() -> Vec<StimulusCategory> {
    vec![
        StimulusCategory::new("animals", &["🐱", "🐶", "🐭", "🐹", "🐰", "🦊"]),
        StimulusCategory::new("fruits", &["🍎", "🍊", "🍋", "🍌", "🍇", "🍓"]),
        StimulusCategory::new("sports", &["⚽", "🏀", "🎾", "🏈", "⚾", "🎱"]),
        StimulusCategory::new("vehicles", &["🚗", "🚕", "🚙", "🚌", "🚎", "🏎️"]),
        StimulusCategory::new("flowers", &["🌸", "🌺", "🌻", "🌷", "🌹", "🏵️"]),
        StimulusCategory::new("stars", &["⭐", "🌟", "✨", "💫", "🌠", "☄️"]),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSpec {
    pub set_size: usize,
    /// Category to draw from, taken modulo the number of categories.
    pub category_index: usize,
}

/// Setup of one experiment run. Read once when the blocks are materialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub blocks: Vec<BlockSpec>,
    pub iterations_per_stimulus: usize,
    pub feedback_duration_ms: u64,
    pub inter_trial_interval_ms: u64,
    /// Pause between an accepted response and the end of its highlight.
    pub response_highlight_ms: u64,
    pub categories: Vec<StimulusCategory>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self::from_set_sizes(&[2, 3, 4, 5, 6, 3])
    }
}

impl ExperimentConfig {
    /// Blocks with the given set sizes, block `i` drawing from category `i`.
    pub fn from_set_sizes(set_sizes: &[usize]) -> Self {
        Self {
            blocks: set_sizes
                .iter()
                .enumerate()
                .map(|(i, &set_size)| BlockSpec {
                    set_size,
                    category_index: i,
                })
                .collect(),
            iterations_per_stimulus: 10,
            feedback_duration_ms: 800,
            inter_trial_interval_ms: 500,
            response_highlight_ms: 300,
            categories: default_categories(),
        }
    }

    pub fn set_sizes(&self) -> Vec<usize> {
        self.blocks.iter().map(|b| b.set_size).collect()
    }

    pub fn timing(&self) -> TrialTiming {
        TrialTiming {
            feedback_ms: self.feedback_duration_ms,
            inter_trial_interval_ms: self.inter_trial_interval_ms,
            response_highlight_ms: self.response_highlight_ms,
        }
    }

    /// Changes the set size of one block, restricted to the offered range.
    pub fn set_block_size(&mut self, block: usize, set_size: usize) -> Result<()> {
        let count = self.blocks.len();
        let spec = self
            .blocks
            .get_mut(block)
            .ok_or(ExperimentError::BlockOutOfRange { block, count })?;
        if !(MIN_SET_SIZE..=MAX_SET_SIZE).contains(&set_size) {
            return Err(ExperimentError::InvalidSetSize { block, set_size });
        }
        spec.set_size = set_size;
        Ok(())
    }

    pub fn add_block(&mut self) {
        self.blocks.push(BlockSpec {
            set_size: DEFAULT_SET_SIZE,
            category_index: self.blocks.len(),
        });
    }

    /// Drops the last block. The final remaining block is never removed.
    pub fn remove_block(&mut self) -> bool {
        if self.blocks.len() > 1 {
            self.blocks.pop();
            true
        } else {
            false
        }
    }

    pub fn category_for(&self, spec: &BlockSpec) -> Option<&StimulusCategory> {
        if self.categories.is_empty() {
            return None;
        }
        self.categories.get(spec.category_index % self.categories.len())
    }

    pub fn validate(&self) -> Result<()> {
        if self.blocks.is_empty() {
            return Err(ExperimentError::EmptyBlockList);
        }
        if self.iterations_per_stimulus == 0 {
            return Err(ExperimentError::ZeroIterations);
        }
        if self.categories.is_empty() {
            return Err(ExperimentError::NoCategories);
        }
        for (block, spec) in self.blocks.iter().enumerate() {
            if spec.set_size < 1 {
                return Err(ExperimentError::InvalidSetSize {
                    block,
                    set_size: spec.set_size,
                });
            }
            let category = self.category_for(spec).ok_or(ExperimentError::NoCategories)?;
            if spec.set_size > category.len() {
                return Err(ExperimentError::SetSizeExceedsCategory {
                    block,
                    set_size: spec.set_size,
                    category: category.name.clone(),
                    available: category.len(),
                });
            }
        }
        Ok(())
    }

    /// Reads and validates a JSON configuration file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}
