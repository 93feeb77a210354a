//! Trial/block state machine.
//!
//! The engine never sleeps or touches the screen. Every operation takes the
//! current [`ExperimentState`] by value and returns the next one together with
//! the [`Effect`]s the surrounding application must carry out, including
//! [`Effect::Schedule`] requests that it turns into timer delays.

use rlwm_core::{Action, BlockResult, ExperimentResults, StimulusId, TrialPhase};
use tracing::{debug, info};

use crate::block::Block;
use crate::controller;
use crate::results::ResultsAggregator;
use crate::trial::{TrialTiming, TrialView};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The inter-trial interval has elapsed; show the next stimulus.
    StartTrial,
    SubmitResponse {
        action: Action,
        reaction_time_ms: Option<u64>,
    },
    /// The feedback display time has elapsed.
    FeedbackElapsed,
    /// The participant dismissed the end-of-block screen.
    ContinueToNextBlock,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    BlockStarted {
        block_number: usize,
        set_size: usize,
        total_trials: usize,
        legend: Vec<(StimulusId, Action)>,
    },
    PresentTrial(TrialView),
    ResponseScored {
        action: Action,
        correct: bool,
    },
    /// Dispatch `event` once `delay_ms` has passed.
    Schedule {
        delay_ms: u64,
        event: EngineEvent,
    },
    BlockEnded(BlockResult),
    ExperimentEnded(ExperimentResults),
}

/// Everything the engine knows about a run in progress.
#[derive(Debug, Clone, Default)]
pub struct ExperimentState {
    blocks: Vec<Block>,
    timing: TrialTiming,
    started: bool,
    block_index: usize,
    trial_index: usize,
    phase: TrialPhase,
    aggregator: ResultsAggregator,
}

impl ExperimentState {
    pub(crate) fn new(blocks: Vec<Block>, timing: TrialTiming) -> Self {
        Self {
            blocks,
            timing,
            ..Self::default()
        }
    }

    /// Applies one event. Events that do not fit the current phase change nothing.
    pub fn transition(mut self, event: EngineEvent) -> (Self, Vec<Effect>) {
        let mut effects = Vec::new();
        if !self.started {
            return (self, effects);
        }

        match (self.phase, event) {
            (TrialPhase::Idle, EngineEvent::StartTrial) => self.start_trial(&mut effects),
            (
                phase,
                EngineEvent::SubmitResponse {
                    action,
                    reaction_time_ms,
                },
            ) if phase.accepts_response() => {
                self.submit_response(action, reaction_time_ms, &mut effects)
            }
            (TrialPhase::Feedback, EngineEvent::FeedbackElapsed) => {
                self.finish_feedback(&mut effects)
            }
            (phase, EngineEvent::ContinueToNextBlock) if phase.is_block_complete() => {
                controller::advance_block(&mut self, &mut effects)
            }
            _ => {}
        }

        (self, effects)
    }

    fn start_trial(&mut self, effects: &mut Vec<Effect>) {
        if let Some(view) = self.view() {
            effects.push(Effect::PresentTrial(view));
            self.phase = TrialPhase::AwaitingResponse;
        }
    }

    fn submit_response(
        &mut self,
        action: Action,
        reaction_time_ms: Option<u64>,
        effects: &mut Vec<Effect>,
    ) {
        let Some(block) = self.blocks.get_mut(self.block_index) else {
            return;
        };
        self.phase = TrialPhase::Scoring;
        let Some(response) = block.score(self.trial_index, action, reaction_time_ms) else {
            self.phase = TrialPhase::AwaitingResponse;
            return;
        };
        debug!(
            block = self.block_index,
            trial = self.trial_index,
            stimulus = response.stimulus_index,
            %action,
            correct = response.correct,
            "response scored"
        );

        let correct = response.correct;
        self.aggregator.record_response(&response);
        block.record(response);
        self.phase = TrialPhase::Feedback;

        effects.push(Effect::ResponseScored { action, correct });
        effects.push(Effect::Schedule {
            delay_ms: self.timing.post_response_ms(),
            event: EngineEvent::FeedbackElapsed,
        });
    }

    fn finish_feedback(&mut self, effects: &mut Vec<Effect>) {
        let Some(block) = self.blocks.get(self.block_index) else {
            return;
        };
        if self.trial_index + 1 < block.total_trials() {
            self.trial_index += 1;
            self.phase = TrialPhase::Idle;
            effects.push(Effect::Schedule {
                delay_ms: self.timing.inter_trial_interval_ms,
                event: EngineEvent::StartTrial,
            });
        } else {
            self.close_block(effects);
        }
    }

    fn close_block(&mut self, effects: &mut Vec<Effect>) {
        let Some(block) = self.blocks.get(self.block_index) else {
            return;
        };
        let result = self.aggregator.close_block(block);
        info!(
            block = result.block,
            set_size = result.set_size,
            accuracy = result.accuracy,
            trials = result.trials,
            "block complete"
        );
        self.phase = TrialPhase::BlockComplete;
        effects.push(Effect::BlockEnded(result));
    }

    /// Makes block `index` current and schedules its first trial.
    pub(crate) fn enter_block(&mut self, index: usize, effects: &mut Vec<Effect>) {
        let Some(block) = self.blocks.get(index) else {
            return;
        };
        self.started = true;
        self.block_index = index;
        self.trial_index = 0;
        self.phase = TrialPhase::Idle;
        info!(
            block = index,
            set_size = block.set_size(),
            trials = block.total_trials(),
            "block started"
        );

        effects.push(Effect::BlockStarted {
            block_number: index + 1,
            set_size: block.set_size(),
            total_trials: block.total_trials(),
            legend: block.legend(),
        });
        if block.total_trials() == 0 {
            self.close_block(effects);
            return;
        }
        effects.push(Effect::Schedule {
            delay_ms: self.timing.inter_trial_interval_ms,
            event: EngineEvent::StartTrial,
        });
    }

    pub(crate) fn complete(&mut self, effects: &mut Vec<Effect>) {
        self.phase = TrialPhase::ExperimentComplete;
        let results = self.aggregator.finalize();
        info!(
            total_trials = results.total_trials,
            correct = results.correct_responses,
            blocks = results.block_results.len(),
            "experiment complete"
        );
        effects.push(Effect::ExperimentEnded(results));
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn phase(&self) -> TrialPhase {
        self.phase
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block_index(&self) -> usize {
        self.block_index
    }

    pub fn trial_index(&self) -> usize {
        self.trial_index
    }

    pub fn current_block(&self) -> Option<&Block> {
        self.blocks.get(self.block_index)
    }

    pub fn aggregator(&self) -> &ResultsAggregator {
        &self.aggregator
    }

    /// The trial at the current position, as the rendering layer sees it.
    pub fn view(&self) -> Option<TrialView> {
        let block = self.current_block()?;
        let trial = block.trial(self.trial_index)?;
        let total = block.total_trials();
        Some(TrialView {
            stimulus: trial.stimulus.clone(),
            trial_number: self.trial_index + 1,
            block_number: self.block_index + 1,
            total_trials_in_block: total,
            progress: (self.trial_index + 1) as f64 / total as f64,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Final results, available once the last block has been closed.
    pub fn results(&self) -> Option<ExperimentResults> {
        self.is_finished().then(|| self.aggregator.finalize())
    }
}
