use rlwm_core::{BlockResult, ExperimentResults, Response};

use crate::block::Block;

/// Running totals for one experiment run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsAggregator {
    total_trials: usize,
    correct_responses: usize,
    block_results: Vec<BlockResult>,
}

impl ResultsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_response(&mut self, response: &Response) {
        self.total_trials += 1;
        if response.correct {
            self.correct_responses += 1;
        }
    }

    /// Derives the block's result and appends it to the run.
    pub fn close_block(&mut self, block: &Block) -> BlockResult {
        let result = BlockResult {
            block: block.index(),
            set_size: block.set_size(),
            accuracy: accuracy(block.results()),
            trials: block.results().len(),
        };
        self.block_results.push(result.clone());
        result
    }

    pub fn total_trials(&self) -> usize {
        self.total_trials
    }

    pub fn correct_responses(&self) -> usize {
        self.correct_responses
    }

    pub fn block_results(&self) -> &[BlockResult] {
        &self.block_results
    }

    pub fn finalize(&self) -> ExperimentResults {
        ExperimentResults {
            total_trials: self.total_trials,
            correct_responses: self.correct_responses,
            block_results: self.block_results.clone(),
        }
    }
}

/// Fraction of correct responses; 0 for an empty slice.
pub fn accuracy(responses: &[Response]) -> f64 {
    if responses.is_empty() {
        return 0.0;
    }
    let correct = responses.iter().filter(|r| r.correct).count();
    correct as f64 / responses.len() as f64
}
