use crate::models::{DetectionStats, RangeCounts, StatsDisplay, StatsSummary};

/// Render the stats region for `selected` from the cached counts.
pub fn render_stats(stats: &DetectionStats, selected: &str) -> StatsDisplay {
    match stats.get(selected) {
        Some(counts) => StatsDisplay::Summary(summarize(counts)),
        None => StatsDisplay::NoData,
    }
}

pub fn summarize(counts: &RangeCounts) -> StatsSummary {
    StatsSummary {
        true_count: counts.true_count,
        false_count: counts.false_count,
        false_percent: false_percent(counts),
    }
}

/// Share of false detections in percent, rounded to two decimals.
pub fn false_percent(counts: &RangeCounts) -> f64 {
    let total = counts.true_count.saturating_add(counts.false_count);
    if total == 0 {
        return 0.0;
    }
    round2(counts.false_count as f64 / total as f64 * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
