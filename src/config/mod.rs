pub mod app_config;
pub mod experiment;

pub use app_config::{AppConfig, ConfigError};
pub use experiment::{ExperimentConfig, ExperimentConfigBuilder};
