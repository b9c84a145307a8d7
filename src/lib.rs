pub mod app;
pub mod config;
pub mod domain;
pub mod utils;

pub use app::{run_pipeline, write_features, PipelineOptions, PipelineOutcome};
