//! Running aggregates for one ingestion run.
//!
//! [`AggregateStats`] is the single mutable accumulator every worker feeds.
//! The struct itself is not synchronized; in shared mode the coordinator
//! wraps it in a `Mutex` so each [`AggregateStats::record`] call updates all
//! linked containers inside one critical section, and in isolated mode each
//! worker owns a private instance folded together with
//! [`AggregateStats::merge`] after the pool joins.
//!
//! Invariant: `total_records` equals the sum of each frequency table and
//! the number of latency samples. Every operation here preserves it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::parse::LogRecord;

/// Mutable statistics accumulator. One per run (or per worker in isolated
/// mode, merged at the end).
#[derive(Debug, Default, Clone)]
pub struct AggregateStats {
    total_records: u64,
    method_counts: BTreeMap<String, u64>,
    status_class_counts: BTreeMap<String, u64>,
    latency_samples: Vec<f64>,
    user_agent_counts: BTreeMap<String, u64>,
    lines_seen: u64,
    lines_rejected: u64,
}

/// Derived latency statistics. All fields are zero for an empty run; an
/// empty input is a valid result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatencySummary {
    pub count: u64,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

/// Immutable point-in-time copy of the aggregates plus derived stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateSnapshot {
    pub total_records: u64,
    pub method_counts: BTreeMap<String, u64>,
    pub status_class_counts: BTreeMap<String, u64>,
    pub user_agent_counts: BTreeMap<String, u64>,
    pub latency: LatencySummary,
    /// Total lines offered to the parser, matching or not.
    pub lines_seen: u64,
    /// Lines that did not fit the grammar. Rejects never contribute to
    /// `total_records` or any frequency table.
    pub lines_rejected: u64,
}

impl AggregateStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one parsed line into every container.
    ///
    /// Callers that share one store across threads must hold its lock for
    /// the whole call so the containers never disagree.
    pub fn record(&mut self, rec: &LogRecord) {
        self.total_records += 1;
        *self.method_counts.entry(rec.method.clone()).or_insert(0) += 1;
        *self
            .status_class_counts
            .entry(rec.status_class.clone())
            .or_insert(0) += 1;
        self.latency_samples.push(rec.latency_ms);
        *self
            .user_agent_counts
            .entry(rec.user_agent.clone())
            .or_insert(0) += 1;
        self.lines_seen += 1;
    }

    /// Note a line that failed the grammar. Observable via the snapshot's
    /// reject counters only; rejected lines are otherwise invisible.
    pub fn reject_line(&mut self) {
        self.lines_seen += 1;
        self.lines_rejected += 1;
    }

    /// Fold another accumulator into this one. Used by the isolated worker
    /// mode to combine per-worker stores after the pool joins.
    pub fn merge(&mut self, other: AggregateStats) {
        self.total_records += other.total_records;
        for (method, n) in other.method_counts {
            *self.method_counts.entry(method).or_insert(0) += n;
        }
        for (class, n) in other.status_class_counts {
            *self.status_class_counts.entry(class).or_insert(0) += n;
        }
        self.latency_samples.extend(other.latency_samples);
        for (agent, n) in other.user_agent_counts {
            *self.user_agent_counts.entry(agent).or_insert(0) += n;
        }
        self.lines_seen += other.lines_seen;
        self.lines_rejected += other.lines_rejected;
    }

    /// Copy out all aggregates plus derived latency statistics.
    ///
    /// Precondition (enforced by the coordinator, not here): all `record`
    /// calls for the run have completed. Reading while records are still in
    /// flight is not supported.
    pub fn snapshot(&self) -> AggregateSnapshot {
        let latency = if self.latency_samples.is_empty() {
            LatencySummary {
                count: 0,
                avg: 0.0,
                min: 0.0,
                max: 0.0,
            }
        } else {
            // Sum in sorted order: arrival order across workers is
            // unspecified, and float addition is not associative, so a
            // fixed summation order keeps snapshots identical for any
            // worker count.
            let mut sorted = self.latency_samples.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let sum: f64 = sorted.iter().sum();
            LatencySummary {
                count: sorted.len() as u64,
                avg: sum / sorted.len() as f64,
                min: sorted[0],
                max: sorted[sorted.len() - 1],
            }
        };
        AggregateSnapshot {
            total_records: self.total_records,
            method_counts: self.method_counts.clone(),
            status_class_counts: self.status_class_counts.clone(),
            user_agent_counts: self.user_agent_counts.clone(),
            latency,
            lines_seen: self.lines_seen,
            lines_rejected: self.lines_rejected,
        }
    }
}

impl AggregateSnapshot {
    /// Check the core bookkeeping invariant. Test helper.
    pub fn invariant_holds(&self) -> bool {
        let by_method: u64 = self.method_counts.values().sum();
        let by_class: u64 = self.status_class_counts.values().sum();
        let by_agent: u64 = self.user_agent_counts.values().sum();
        self.total_records == by_method
            && self.total_records == by_class
            && self.total_records == by_agent
            && self.total_records == self.latency.count
    }
}
