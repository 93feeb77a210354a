use rlwm_core::StimulusId;

/// Delays the driver must hold between transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrialTiming {
    pub feedback_ms: u64,
    pub inter_trial_interval_ms: u64,
    pub response_highlight_ms: u64,
}

impl TrialTiming {
    /// Time from an accepted response until the next transition.
    pub fn post_response_ms(&self) -> u64 {
        self.response_highlight_ms.saturating_add(self.feedback_ms)
    }
}

/// What the rendering layer needs to show a trial.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialView {
    pub stimulus: StimulusId,
    /// 1-based trial number within the block.
    pub trial_number: usize,
    /// 1-based block number.
    pub block_number: usize,
    pub total_trials_in_block: usize,
    /// `trial_number / total_trials_in_block`.
    pub progress: f64,
}
