/// Progression of the task engine through a block.
///
/// `Idle → AwaitingResponse → Scoring → Feedback → {Idle | BlockComplete}`,
/// and `BlockComplete` leads to the next block's `Idle` or to
/// `ExperimentComplete`.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Default)]
pub enum TrialPhase {
    /// Waiting for the next trial to be started.
    #[default]
    Idle,
    /// A stimulus is on screen and exactly one response may be accepted.
    AwaitingResponse,
    /// A response was accepted and is being scored.
    Scoring,
    /// The outcome is on screen for the feedback duration.
    Feedback,
    /// Every trial of the current block has been answered.
    BlockComplete,
    /// The last block has been closed. Terminal.
    ExperimentComplete,
}

impl TrialPhase {
    pub fn accepts_response(&self) -> bool {
        matches!(self, Self::AwaitingResponse)
    }

    pub fn is_block_complete(&self) -> bool {
        matches!(self, Self::BlockComplete)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::ExperimentComplete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_awaiting_response_accepts_input() {
        let phases = [
            TrialPhase::Idle,
            TrialPhase::AwaitingResponse,
            TrialPhase::Scoring,
            TrialPhase::Feedback,
            TrialPhase::BlockComplete,
            TrialPhase::ExperimentComplete,
        ];
        let accepting: Vec<_> = phases.iter().filter(|p| p.accepts_response()).collect();
        assert_eq!(accepting, vec![&TrialPhase::AwaitingResponse]);
    }

    #[test]
    fn default_is_idle() {
        assert_eq!(TrialPhase::default(), TrialPhase::Idle);
        assert!(!TrialPhase::Idle.is_terminal());
        assert!(TrialPhase::ExperimentComplete.is_terminal());
        assert!(TrialPhase::BlockComplete.is_block_complete());
        assert!(!TrialPhase::ExperimentComplete.is_block_complete());
    }
}
