use uniqlog_core::CompactStats;

pub(crate) fn format_compact_stats(label: &str, stats: &CompactStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("== stats: {label} ==\n"));
    out.push_str(&format!(
        "consumed={} emitted={}\n",
        stats.consumed, stats.emitted
    ));

    let mut details: Vec<(&str, u64)> = vec![
        ("skipped_short", stats.skipped_short),
        ("blocks_collapsed", stats.blocks_collapsed),
        ("lines_folded", stats.lines_folded),
        ("false_starts", stats.false_starts),
        ("progress_notices", stats.progress_notices),
    ];
    details.retain(|(_, v)| *v > 0);
    if !details.is_empty() {
        out.push_str("details:\n");
        for (k, v) in details {
            out.push_str(&format!("- {k}={v}\n"));
        }
    }
    out.push('\n');
    out
}
