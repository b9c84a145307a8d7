pub mod feature;
pub mod io;
pub mod record;
pub mod split;

pub use feature::ensure_pos_pattern;
pub use io::{read_records, write_records, write_submission};
pub use record::{Prediction, SentenceRecord};
pub use split::{sample, train_test_split};
