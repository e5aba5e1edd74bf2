use domain::TodoStats;
use std::fmt::Write;

/// 統計カード（4 つの件数と完了率）
pub fn render_stats_card(stats: &TodoStats) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Statistics ({:.1}% completion rate)",
        stats.completion_rate()
    );
    for (label, value) in [
        ("Total Todos", stats.total),
        ("Completed", stats.completed),
        ("Pending", stats.pending),
        ("High Priority", stats.high_priority),
    ] {
        let _ = writeln!(out, "  {label:<14} {value:>5}");
    }
    let _ = write!(
        out,
        "Progress: {} of {} completed",
        stats.completed, stats.total
    );
    out
}
