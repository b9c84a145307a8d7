pub mod ai;
pub mod dataset;
pub mod experiment;
pub mod pos;
