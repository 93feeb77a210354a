pub mod phase;
pub mod results;
pub mod stimulus;
pub mod trial;

pub use phase::TrialPhase;
pub use results::{BlockResult, ExperimentResults, ExperimentSummary, format_percent};
pub use stimulus::{Action, InvalidAction, StimulusId};
pub use trial::{Response, Trial};
