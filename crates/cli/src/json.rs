use std::io;

use serde::Serialize;
use uniqlog_core::CompactStats;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonCompactStats {
    pub(crate) source: String,
    pub(crate) consumed: u64,
    pub(crate) emitted: u64,
    pub(crate) skipped_short: u64,
    pub(crate) blocks_collapsed: u64,
    pub(crate) lines_folded: u64,
    pub(crate) false_starts: u64,
    pub(crate) progress_notices: u64,
}

impl JsonCompactStats {
    pub(crate) fn new(source: &str, stats: &CompactStats) -> Self {
        Self {
            source: source.to_string(),
            consumed: stats.consumed,
            emitted: stats.emitted,
            skipped_short: stats.skipped_short,
            blocks_collapsed: stats.blocks_collapsed,
            lines_folded: stats.lines_folded,
            false_starts: stats.false_starts,
            progress_notices: stats.progress_notices,
        }
    }
}

/// Stdout carries the compacted stream, so JSON goes to stderr, one object per line.
pub(crate) fn write_json_line<T: Serialize>(value: &T) -> io::Result<()> {
    let json =
        serde_json::to_string(value).map_err(|e| io::Error::other(format!("json encode: {e}")))?;
    eprintln!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_serialize_with_camel_case_keys() -> Result<(), serde_json::Error> {
        let stats = CompactStats {
            consumed: 5,
            emitted: 5,
            lines_folded: 4,
            blocks_collapsed: 1,
            ..CompactStats::default()
        };
        let value = serde_json::to_value(JsonCompactStats::new("<stdin>", &stats))?;
        assert_eq!(
            value,
            serde_json::json!({
                "source": "<stdin>",
                "consumed": 5,
                "emitted": 5,
                "skippedShort": 0,
                "blocksCollapsed": 1,
                "linesFolded": 4,
                "falseStarts": 0,
                "progressNotices": 0,
            })
        );
        Ok(())
    }
}
