mod compact;
mod emit;
mod history;
mod similarity;
mod stream;
mod tokenize;
mod types;

pub use compact::Compactor;

pub use similarity::line_similarity;

pub use stream::compact_stream;

pub use tokenize::tokenize_line;

pub use types::{
    CompactOptions, CompactOutcome, CompactStats, DEFAULT_FIRST_SIMILARITY_THRESHOLD,
    DEFAULT_KEEP_SIMILARITY_THRESHOLD, MAX_LINES_TRACK, TIME_WITHOUT_OUTPUT,
};
