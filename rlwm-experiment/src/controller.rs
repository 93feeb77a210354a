use rand::Rng;
use rlwm_core::ExperimentResults;
use tracing::info;

use crate::block::Block;
use crate::config::{BlockSpec, ExperimentConfig};
use crate::error::Result;
use crate::sequence::build_sequence;
use crate::state::{Effect, EngineEvent, ExperimentState};
use crate::stimulus::{generate_correct_actions, select_stimuli};

/// Validates `config` and materializes every block up front.
///
/// Nothing is built when validation fails.
pub fn setup<R: Rng>(config: &ExperimentConfig, rng: &mut R) -> Result<ExperimentState> {
    config.validate()?;
    let blocks = config
        .blocks
        .iter()
        .enumerate()
        .map(|(index, spec)| materialize_block(config, index, spec, rng))
        .collect::<Result<Vec<_>>>()?;
    info!(
        blocks = blocks.len(),
        iterations = config.iterations_per_stimulus,
        set_sizes = ?config.set_sizes(),
        "experiment materialized"
    );
    Ok(ExperimentState::new(blocks, config.timing()))
}

fn materialize_block<R: Rng>(
    config: &ExperimentConfig,
    index: usize,
    spec: &BlockSpec,
    rng: &mut R,
) -> Result<Block> {
    let stimuli = select_stimuli(&config.categories, index, spec)?;
    let correct_actions = generate_correct_actions(stimuli.len(), rng);
    let sequence = build_sequence(&stimuli, config.iterations_per_stimulus, rng);
    Ok(Block::new(index, stimuli, correct_actions, sequence))
}

/// Enters the first block. A second call changes nothing.
pub fn begin(mut state: ExperimentState) -> (ExperimentState, Vec<Effect>) {
    let mut effects = Vec::new();
    if !state.is_started() {
        state.enter_block(0, &mut effects);
    }
    (state, effects)
}

/// Moves past a completed block: either into the next one or to the end of the run.
pub(crate) fn advance_block(state: &mut ExperimentState, effects: &mut Vec<Effect>) {
    let next = state.block_index() + 1;
    if next < state.blocks().len() {
        state.enter_block(next, effects);
    } else {
        state.complete(effects);
    }
}

/// Owner of one run's [`ExperimentState`]; the application talks to the engine through it.
#[derive(Debug, Clone)]
pub struct ExperimentController {
    state: ExperimentState,
}

impl ExperimentController {
    pub fn new<R: Rng>(config: &ExperimentConfig, rng: &mut R) -> Result<Self> {
        Ok(Self {
            state: setup(config, rng)?,
        })
    }

    pub fn begin(&mut self) -> Vec<Effect> {
        let (state, effects) = begin(std::mem::take(&mut self.state));
        self.state = state;
        effects
    }

    pub fn dispatch(&mut self, event: EngineEvent) -> Vec<Effect> {
        let (state, effects) = std::mem::take(&mut self.state).transition(event);
        self.state = state;
        effects
    }

    pub fn state(&self) -> &ExperimentState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn results(&self) -> Option<ExperimentResults> {
        self.state.results()
    }
}
