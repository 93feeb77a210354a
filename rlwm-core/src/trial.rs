use serde::{Deserialize, Serialize};

use crate::stimulus::{Action, StimulusId};

/// A single scheduled presentation within a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trial {
    pub stimulus_index: usize,
    pub stimulus: StimulusId,
    /// 1-based repetition number of this stimulus.
    pub iteration: usize,
}

/// Recorded answer to one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// 0-based position of the trial in the block sequence.
    pub trial_ordinal: usize,
    pub stimulus: StimulusId,
    pub stimulus_index: usize,
    pub iteration: usize,
    pub action: Action,
    pub correct: bool,
    pub reaction_time_ms: Option<u64>,
}
