//! Ingestion coordinator.
//!
//! Distributes the scanned file list round-robin over a fixed pool of
//! worker threads, streams each file line-by-line through the grammar and
//! folds matches into one [`AggregateStats`]. The pool joins before the
//! single snapshot is taken, so no snapshot ever observes an in-flight
//! record.
//!
//! Two substrates produce identical results:
//!
//! * [`Mode::Threading`] — all workers share one store behind a mutex;
//!   each record is one critical section, keeping the linked containers
//!   consistent under any interleaving.
//! * [`Mode::Process`] — each worker owns an isolated store; the stores
//!   are merged after the join. This is the results-merge rendering of the
//!   original's process mode: isolation semantics without the cost of
//!   actual child processes.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::Instant;

use crate::error::SawmillError;
use crate::parse::parse_line;
use crate::scan::scan;
use crate::stats::{AggregateSnapshot, AggregateStats};

/// Concurrency substrate. A performance and isolation knob, never a
/// semantics knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Workers share one mutex-guarded store.
    Threading,
    /// Workers keep isolated stores, merged after the pool joins.
    Process,
}

/// Ingest every log file under `path` and return the final snapshot.
///
/// `PathNotFound` from the scanner propagates unchanged. An empty file
/// list yields a zero-valued snapshot without spawning any workers. A
/// `worker_count` of zero is treated as one. Any per-file I/O failure
/// aborts the run; partial aggregates are never returned.
pub fn ingest(
    path: &Path,
    worker_count: usize,
    mode: Mode,
) -> Result<AggregateSnapshot, SawmillError> {
    let files = scan(path)?;
    if files.is_empty() {
        return Ok(AggregateStats::new().snapshot());
    }

    // Never more workers than files; round-robin would leave the rest idle.
    let worker_count = worker_count.max(1).min(files.len());
    let assignments = assign_round_robin(&files, worker_count);

    eprintln!(
        "Found {} log file(s), using {} worker(s) ({:?})",
        files.len(),
        worker_count,
        mode
    );
    let start = Instant::now();

    let snapshot = match mode {
        Mode::Threading => run_shared(&assignments)?,
        Mode::Process => run_isolated(&assignments)?,
    };

    eprintln!("Ingestion completed in {:.2?}", start.elapsed());
    Ok(snapshot)
}

/// Deal files out one at a time so every file lands on exactly one worker.
fn assign_round_robin(files: &[PathBuf], worker_count: usize) -> Vec<Vec<PathBuf>> {
    let mut assignments = vec![Vec::new(); worker_count];
    for (i, file) in files.iter().enumerate() {
        assignments[i % worker_count].push(file.clone());
    }
    assignments
}

/// Stream one file through `on_line`, never holding more than one line in
/// memory. Read failures carry the path for the error message.
fn stream_file<F: FnMut(&str)>(path: &Path, mut on_line: F) -> Result<(), SawmillError> {
    let file = File::open(path).map_err(|e| SawmillError::io_at(path, e))?;
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| SawmillError::io_at(path, e))?;
        on_line(&line);
    }
    Ok(())
}

fn run_shared(assignments: &[Vec<PathBuf>]) -> Result<AggregateSnapshot, SawmillError> {
    let store = Mutex::new(AggregateStats::new());

    let results: Vec<Result<(), SawmillError>> = thread::scope(|s| {
        let handles: Vec<_> = assignments
            .iter()
            .map(|files| {
                let store = &store;
                s.spawn(move || -> Result<(), SawmillError> {
                    for file in files {
                        stream_file(file, |line| {
                            // Lock around the whole record so a snapshot can
                            // never see the containers out of step.
                            let mut guard =
                                store.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                            match parse_line(line) {
                                Some(rec) => guard.record(&rec),
                                None => guard.reject_line(),
                            }
                        })?;
                    }
                    Ok(())
                })
            })
            .collect();
        handles.into_iter().map(join_worker).collect()
    });

    for result in results {
        result?;
    }
    let store = store
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    Ok(store.snapshot())
}

fn run_isolated(assignments: &[Vec<PathBuf>]) -> Result<AggregateSnapshot, SawmillError> {
    let results: Vec<Result<AggregateStats, SawmillError>> = thread::scope(|s| {
        let handles: Vec<_> = assignments
            .iter()
            .map(|files| {
                s.spawn(move || -> Result<AggregateStats, SawmillError> {
                    let mut local = AggregateStats::new();
                    for file in files {
                        stream_file(file, |line| match parse_line(line) {
                            Some(rec) => local.record(&rec),
                            None => local.reject_line(),
                        })?;
                    }
                    Ok(local)
                })
            })
            .collect();
        handles.into_iter().map(join_worker).collect()
    });

    let mut merged = AggregateStats::new();
    for result in results {
        merged.merge(result?);
    }
    Ok(merged.snapshot())
}

/// Join one worker, turning a panic into a run-level error.
fn join_worker<T>(
    handle: thread::ScopedJoinHandle<'_, Result<T, SawmillError>>,
) -> Result<T, SawmillError> {
    match handle.join() {
        Ok(result) => result,
        Err(panic) => {
            let msg = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "worker panicked".to_string());
            Err(SawmillError::Worker(msg))
        }
    }
}
