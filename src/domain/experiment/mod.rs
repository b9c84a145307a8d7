pub mod checkpoint;
pub mod dto;
pub mod metrics;
pub mod runner;

pub use checkpoint::{ChainCheckpoint, ChainStage};
pub use dto::{corrections_by_id, ExperimentResult};
pub use metrics::{evaluate_correction, EvaluationScore};
pub use runner::{build_few_shot_block, ExperimentRunner};
