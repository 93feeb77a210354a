use serde::{Deserialize, Serialize};

/// Outcome of one finished block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockResult {
    /// 0-based block index.
    pub block: usize,
    pub set_size: usize,
    /// Fraction of correct responses, 0..=1.
    pub accuracy: f64,
    pub trials: usize,
}

/// Totals of an experiment run. This is the exported artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentResults {
    pub total_trials: usize,
    pub correct_responses: usize,
    pub block_results: Vec<BlockResult>,
}

impl ExperimentResults {
    /// Fraction of correct responses over the whole run, 0 when nothing was answered.
    pub fn overall_accuracy(&self) -> f64 {
        if self.total_trials == 0 {
            return 0.0;
        }
        self.correct_responses as f64 / self.total_trials as f64
    }

    pub fn summary(&self) -> ExperimentSummary {
        ExperimentSummary {
            overall_accuracy: self.overall_accuracy(),
            total_trials: self.total_trials,
            blocks_completed: self.block_results.len(),
        }
    }
}

/// End-of-experiment figures shown to the participant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExperimentSummary {
    pub overall_accuracy: f64,
    pub total_trials: usize,
    pub blocks_completed: usize,
}

impl ExperimentSummary {
    pub fn overall_accuracy_percent(&self) -> String {
        format_percent(self.overall_accuracy)
    }
}

/// Formats a 0..=1 fraction as a percentage with one decimal, e.g. `87.5%`.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExperimentResults {
        ExperimentResults {
            total_trials: 10,
            correct_responses: 7,
            block_results: vec![
                BlockResult { block: 0, set_size: 2, accuracy: 0.75, trials: 4 },
                BlockResult { block: 1, set_size: 3, accuracy: 4.0 / 6.0, trials: 6 },
            ],
        }
    }

    #[test]
    fn overall_accuracy_guards_empty_run() {
        assert_eq!(ExperimentResults::default().overall_accuracy(), 0.0);
        assert!((sample().overall_accuracy() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn summary_counts_blocks() {
        let summary = sample().summary();
        assert_eq!(summary.blocks_completed, 2);
        assert_eq!(summary.total_trials, 10);
        assert_eq!(summary.overall_accuracy_percent(), "70.0%");
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(format_percent(1.0), "100.0%");
        assert_eq!(format_percent(2.0 / 3.0), "66.7%");
        assert_eq!(format_percent(0.0), "0.0%");
    }

    #[test]
    fn serializes_with_export_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["totalTrials"], 10);
        assert_eq!(json["correctResponses"], 7);
        let first = &json["blockResults"][0];
        assert_eq!(first["block"], 0);
        assert_eq!(first["setSize"], 2);
        assert_eq!(first["accuracy"], 0.75);
        assert_eq!(first["trials"], 4);
    }
}
