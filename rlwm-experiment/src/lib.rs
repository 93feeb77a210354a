pub mod block;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod results;
pub mod sequence;
pub mod state;
pub mod stimulus;
pub mod trial;

pub use block::Block;
pub use config::{BlockSpec, ExperimentConfig, StimulusCategory};
pub use controller::ExperimentController;
pub use error::{ExperimentError, Result};
pub use results::ResultsAggregator;
pub use state::{Effect, EngineEvent, ExperimentState};
pub use trial::{TrialTiming, TrialView};
