pub mod retrieval;
pub mod similarity;
pub mod tagger;

pub use retrieval::{top_k, top_k_for_pattern, SimilarityResult};
pub use similarity::{similarity, SequenceMatcher};
pub use tagger::PosTagger;
#[cfg(feature = "kiwi")]
pub use tagger::KiwiTagger;
