//! Chunked trial-division prime finder.
//!
//! The batch companion to ingestion: embarrassingly parallel, no shared
//! state. The range `[1, max]` is cut into one contiguous chunk per
//! worker, each worker sieves its chunk by trial division, and the chunk
//! results are concatenated and sorted.

use std::thread;
use std::time::Instant;

/// Trial division by 2 and the odd numbers up to the square root.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut i = 3;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

/// All primes in the inclusive range `[start, end]`.
pub fn primes_in_range(start: u64, end: u64) -> Vec<u64> {
    (start..=end).filter(|&n| is_prime(n)).collect()
}

/// Split `[1, max]` into `worker_count` contiguous inclusive chunks. The
/// last chunk absorbs the division remainder, so the chunks cover the
/// range exactly once.
pub fn chunk_ranges(max: u64, worker_count: usize) -> Vec<(u64, u64)> {
    if max == 0 {
        return Vec::new();
    }
    let worker_count = worker_count.max(1).min(max as usize);
    let chunk = max / worker_count as u64;

    (0..worker_count as u64)
        .map(|i| {
            let start = i * chunk + 1;
            let end = if i == worker_count as u64 - 1 {
                max
            } else {
                (i + 1) * chunk
            };
            (start, end)
        })
        .collect()
}

/// Find every prime up to `max` using one thread per chunk. A
/// `worker_count` of zero is treated as one. The result is sorted and
/// identical for any worker count.
pub fn find_primes(max: u64, worker_count: usize) -> Vec<u64> {
    let ranges = chunk_ranges(max, worker_count);
    if ranges.is_empty() {
        return Vec::new();
    }

    let start = Instant::now();
    let mut primes: Vec<u64> = thread::scope(|s| {
        let handles: Vec<_> = ranges
            .iter()
            .map(|&(lo, hi)| s.spawn(move || primes_in_range(lo, hi)))
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().expect("prime worker does not panic"))
            .collect()
    });
    primes.sort_unstable();

    eprintln!(
        "Found {} primes up to {} in {:.2?} ({} chunk(s))",
        primes.len(),
        max,
        start.elapsed(),
        ranges.len()
    );
    primes
}

/// Headline statistics over a sorted prime list.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PrimeSummary {
    pub count: usize,
    pub smallest: u64,
    pub largest: u64,
    /// Mean of the first 100 primes, or of all of them when fewer exist.
    pub avg_first_100: f64,
}

pub fn summarize(primes: &[u64]) -> Option<PrimeSummary> {
    let first = *primes.first()?;
    let last = *primes.last()?;
    let head = &primes[..primes.len().min(100)];
    let avg = head.iter().sum::<u64>() as f64 / head.len() as f64;
    Some(PrimeSummary {
        count: primes.len(),
        smallest: first,
        largest: last,
        avg_first_100: avg,
    })
}
