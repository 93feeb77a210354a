use rlwm_core::{Action, Response, StimulusId, Trial};

/// One phase of the experiment: a fixed stimulus set with a hidden reward mapping.
///
/// Stimuli, mapping and sequence are fixed at construction; only `results`
/// grows, one response per trial, in trial order.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    index: usize,
    stimuli: Vec<StimulusId>,
    correct_actions: Vec<Action>,
    sequence: Vec<Trial>,
    results: Vec<Response>,
}

impl Block {
    pub fn new(
        index: usize,
        stimuli: Vec<StimulusId>,
        correct_actions: Vec<Action>,
        sequence: Vec<Trial>,
    ) -> Self {
        debug_assert_eq!(stimuli.len(), correct_actions.len());
        Self {
            index,
            stimuli,
            correct_actions,
            sequence,
            results: Vec::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_size(&self) -> usize {
        self.stimuli.len()
    }

    pub fn correct_actions(&self) -> &[Action] {
        &self.correct_actions
    }

    pub fn correct_action(&self, stimulus_index: usize) -> Option<Action> {
        self.correct_actions.get(stimulus_index).copied()
    }

    pub fn sequence(&self) -> &[Trial] {
        &self.sequence
    }

    pub fn trial(&self, ordinal: usize) -> Option<&Trial> {
        self.sequence.get(ordinal)
    }

    pub fn total_trials(&self) -> usize {
        self.sequence.len()
    }

    pub fn results(&self) -> &[Response] {
        &self.results
    }

    pub fn correct_count(&self) -> usize {
        self.results.iter().filter(|r| r.correct).count()
    }

    pub fn is_complete(&self) -> bool {
        self.results.len() == self.sequence.len()
    }

    /// Stimulus → rewarded action pairs, for an optional answer key.
    pub fn legend(&self) -> Vec<(StimulusId, Action)> {
        self.stimuli
            .iter()
            .cloned()
            .zip(self.correct_actions.iter().copied())
            .collect()
    }

    /// Scores `action` against trial `ordinal`. Returns `None` past the end of the block.
    pub(crate) fn score(
        &self,
        ordinal: usize,
        action: Action,
        reaction_time_ms: Option<u64>,
    ) -> Option<Response> {
        let trial = self.trial(ordinal)?;
        let correct = self.correct_action(trial.stimulus_index) == Some(action);
        Some(Response {
            trial_ordinal: ordinal,
            stimulus: trial.stimulus.clone(),
            stimulus_index: trial.stimulus_index,
            iteration: trial.iteration,
            action,
            correct,
            reaction_time_ms,
        })
    }

    pub(crate) fn record(&mut self, response: Response) {
        debug_assert_eq!(response.trial_ordinal, self.results.len());
        self.results.push(response);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> Block {
        let stimuli: Vec<StimulusId> = vec!["a".into(), "b".into()];
        let sequence = vec![
            Trial { stimulus_index: 1, stimulus: "b".into(), iteration: 1 },
            Trial { stimulus_index: 0, stimulus: "a".into(), iteration: 1 },
        ];
        Block::new(0, stimuli, vec![Action::Three, Action::One], sequence)
    }

    #[test]
    fn scores_against_the_trial_stimulus() {
        let block = block();
        let hit = block.score(0, Action::One, Some(420)).unwrap();
        assert!(hit.correct);
        assert_eq!(hit.stimulus_index, 1);
        assert_eq!(hit.reaction_time_ms, Some(420));

        let miss = block.score(1, Action::One, None).unwrap();
        assert!(!miss.correct);
        assert!(block.score(2, Action::One, None).is_none());
    }

    #[test]
    fn completes_after_every_trial_is_recorded() {
        let mut block = block();
        assert_eq!(
            block.legend(),
            vec![(StimulusId::from("a"), Action::Three), (StimulusId::from("b"), Action::One)]
        );
        for ordinal in 0..2 {
            let response = block.score(ordinal, Action::One, None).unwrap();
            block.record(response);
        }
        assert!(block.is_complete());
        assert_eq!(block.correct_count(), 1);
    }
}
