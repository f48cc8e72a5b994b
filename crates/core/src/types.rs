use std::io;
use std::time::Duration;

/// How many lines we track back (ring capacity).
pub const MAX_LINES_TRACK: usize = 50;

/// Minimum score for a line to establish a new block against history.
pub const DEFAULT_FIRST_SIMILARITY_THRESHOLD: f64 = 0.9;

/// Minimum score for a line to keep riding an established block.
pub const DEFAULT_KEEP_SIMILARITY_THRESHOLD: f64 = 0.49;

/// Quiet period after which a long-running block prints a progress notice.
pub const TIME_WITHOUT_OUTPUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq)]
pub struct CompactOptions {
    pub first_similarity_threshold: f64,
    pub keep_similarity_threshold: f64,
    pub debug: bool,
    pub color: bool,
    pub history_capacity: usize,
    pub progress_interval: Duration,
}

impl Default for CompactOptions {
    fn default() -> Self {
        Self {
            first_similarity_threshold: DEFAULT_FIRST_SIMILARITY_THRESHOLD,
            keep_similarity_threshold: DEFAULT_KEEP_SIMILARITY_THRESHOLD,
            debug: false,
            color: true,
            history_capacity: MAX_LINES_TRACK,
            progress_interval: TIME_WITHOUT_OUTPUT,
        }
    }
}

/// Line accounting for one input stream.
///
/// `emitted <= consumed` holds after every line; once the stream has been
/// finished the two are equal.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompactStats {
    pub consumed: u64,
    pub emitted: u64,
    pub skipped_short: u64,
    pub blocks_collapsed: u64,
    pub lines_folded: u64,
    pub false_starts: u64,
    pub progress_notices: u64,
}

#[derive(Debug)]
pub struct CompactOutcome {
    pub stats: CompactStats,
    /// Set when reading stopped early; everything read before it was still drained.
    pub read_error: Option<io::Error>,
}
