//! Plain-text rendering of an aggregate snapshot.

use std::fmt::Write;

use crate::stats::AggregateSnapshot;

/// Render the snapshot as the classic sectioned text report. Pure string
/// building; the caller decides where it goes.
pub fn render(snap: &AggregateSnapshot) -> String {
    let mut out = String::new();
    let bar = "=".repeat(50);

    let _ = writeln!(out, "{bar}");
    let _ = writeln!(out, "LOG PARSING RESULTS");
    let _ = writeln!(out, "{bar}");

    let _ = writeln!(out, "\nTotal Requests: {}", snap.total_records);
    if snap.lines_rejected > 0 {
        let _ = writeln!(
            out,
            "Rejected Lines: {} (of {} seen)",
            snap.lines_rejected, snap.lines_seen
        );
    }

    let _ = writeln!(out, "\nBy Method:");
    for (method, count) in &snap.method_counts {
        let _ = writeln!(out, "  {method}: {count}");
    }

    let _ = writeln!(out, "\nBy Status Class:");
    for (class, count) in &snap.status_class_counts {
        let _ = writeln!(out, "  {class}: {count}");
    }

    let _ = writeln!(out, "\nLatency (ms):");
    let _ = writeln!(out, "  Count: {}", snap.latency.count);
    let _ = writeln!(out, "  Average: {:.2}", snap.latency.avg);
    let _ = writeln!(out, "  Min: {:.2}", snap.latency.min);
    let _ = writeln!(out, "  Max: {:.2}", snap.latency.max);

    let _ = writeln!(out, "\nTop User Agents:");
    for (agent, count) in top_user_agents(snap, 5) {
        let _ = writeln!(out, "  {agent}: {count}");
    }

    out
}

/// The `limit` most frequent user agents, most frequent first. Ties break
/// alphabetically so the report is stable.
fn top_user_agents<'a>(snap: &'a AggregateSnapshot, limit: usize) -> Vec<(&'a str, u64)> {
    let mut agents: Vec<(&str, u64)> = snap
        .user_agent_counts
        .iter()
        .map(|(agent, &count)| (agent.as_str(), count))
        .collect();
    agents.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    agents.truncate(limit);
    agents
}
