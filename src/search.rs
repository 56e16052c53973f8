//! Streaming enumeration of primitive abc triples.
//!
//! The core is a lazy walk over the \((a, c)\) grid: for each `a` in
//! `[1, limit/2]` and `c` in `(a, limit]`, the candidate `b = c - a` is
//! kept iff `a < b` and `gcd(a, b) = 1`. Together the two filters emit
//! every unordered coprime pair `{a, b}` with `a + b <= limit` exactly
//! once, `a` always the smaller summand. Emission order (increasing `a`,
//! then increasing `c` within an `a` block) is an observable contract,
//! not an accident of the loop shape.
//!
//! Candidate counts grow as O(limit²) and each accepted triple costs three
//! O(\(\sqrt{c}\)) factorizations, so everything streams: records flow to a
//! [`RecordSink`] one at a time and nothing is materialized. The sharded
//! runner keeps that property with a bounded hand-off queue.

use crate::factor::factorize;
use crate::metrics::Metrics;
use crate::sink::{RecordSink, SinkError};
use crossbeam::queue::ArrayQueue;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

// ============================================================================
// Configuration
// ============================================================================

/// Consecutive `a` values scored by one worker before hand-off.
const BLOCK_SPAN: u64 = 64;

/// Completed blocks buffered between workers and the drainer.
const QUEUE_CAPACITY: usize = 128;

/// Enumeration run parameters.
#[derive(Clone, Debug)]
pub struct EnumerateConfig {
    /// Maximum value of `c` considered.
    pub limit: u64,
    /// Progress report period in emitted records; 0 disables reporting.
    pub report_every: u64,
    /// Worker count for the sharded runner; 1 runs fully sequential.
    pub workers: usize,
    /// Quality threshold for the notable-hits summary.
    pub quality_threshold: f64,
}

impl Default for EnumerateConfig {
    fn default() -> Self {
        Self {
            limit: 20_000,
            report_every: 500_000,
            workers: 1,
            quality_threshold: 1.4,
        }
    }
}

// ============================================================================
// Triples and records
// ============================================================================

/// A primitive triple `a + b = c` with `a < b` and `gcd(a, b) = 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triple {
    /// Smaller summand.
    pub a: u64,
    /// Larger summand.
    pub b: u64,
    /// The sum `a + b`.
    pub c: u64,
}

/// One enumerated triple with its metrics; the unit a sink consumes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Record {
    /// The triple itself.
    pub triple: Triple,
    /// Its derived invariants.
    pub metrics: Metrics,
}

/// Outcome of a completed run.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    /// Number of records handed to the sink.
    pub emitted: u64,
    /// Records with finite quality above the configured threshold,
    /// sorted by descending quality.
    pub notable_hits: Vec<Record>,
}

/// Euclidean gcd.
#[inline]
pub(crate) fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

// ============================================================================
// Lazy iterator
// ============================================================================

/// Lazy, finite, non-restartable walk over the `(a, c)` grid.
///
/// Yields `(Triple, Metrics)` in canonical order. Factorization happens on
/// demand inside `next`, so dropping the iterator early does no wasted
/// work.
#[derive(Clone, Debug)]
pub struct TripleIter {
    limit: u64,
    a: u64,
    a_max: u64,
    c: u64,
}

/// Enumerates every primitive triple with `c <= limit`, scored.
pub fn enumerate(limit: u64) -> TripleIter {
    enumerate_span(limit, 1, limit / 2)
}

/// Restriction of [`enumerate`] to `a` in `[a_lo, a_hi]`; the sharded
/// runner walks these spans in parallel.
fn enumerate_span(limit: u64, a_lo: u64, a_hi: u64) -> TripleIter {
    TripleIter {
        limit,
        a: a_lo,
        a_max: a_hi.min(limit / 2),
        c: a_lo + 1,
    }
}

impl Iterator for TripleIter {
    type Item = (Triple, Metrics);

    fn next(&mut self) -> Option<Self::Item> {
        while self.a <= self.a_max {
            while self.c <= self.limit {
                let (a, c) = (self.a, self.c);
                self.c += 1;
                let b = c - a;
                if a < b && gcd(a, b) == 1 {
                    return Some(score(Triple { a, b, c }));
                }
            }
            self.a += 1;
            self.c = self.a + 1;
        }
        None
    }
}

/// Factors all three components and derives the metrics.
fn score(triple: Triple) -> (Triple, Metrics) {
    let fa = factorize(triple.a as i64);
    let fb = factorize(triple.b as i64);
    let fc = factorize(triple.c as i64);
    let metrics = Metrics::compute(triple.c, &fa, &fb, &fc);
    (triple, metrics)
}

// ============================================================================
// Sequential runner
// ============================================================================

/// Drives the full enumeration into `sink`, streaming one record at a time.
///
/// A sink failure aborts the run and propagates: a partial dataset that
/// fails loudly beats a silently truncated one.
///
/// # Errors
/// Returns the first [`SinkError`] raised by `append` or `finish`.
pub fn run<S: RecordSink>(cfg: &EnumerateConfig, sink: &mut S) -> Result<RunSummary, SinkError> {
    let start = Instant::now();
    let mut summary = RunSummary::default();

    for (triple, metrics) in enumerate(cfg.limit) {
        let record = Record { triple, metrics };
        sink.append(&record)?;
        summary.emitted += 1;
        note_hit(&mut summary, &record, cfg.quality_threshold);
        if cfg.report_every > 0 && summary.emitted.is_multiple_of(cfg.report_every) {
            report_progress(summary.emitted, triple.a, start);
        }
    }

    sink.finish()?;
    finish_summary(&mut summary);
    Ok(summary)
}

// ============================================================================
// Sharded runner
// ============================================================================

/// Like [`run`], but shards the `a` range across `cfg.workers` threads.
///
/// Workers score fixed-span `a` blocks independently and push completed
/// blocks through a bounded queue; the calling thread reassembles blocks
/// in index order, so the sink observes exactly the sequential emission
/// order and the output is value-identical to [`run`]. With
/// `workers <= 1` this delegates to [`run`].
///
/// # Errors
/// Returns the first [`SinkError`] raised by the sink; in-flight workers
/// are signalled to stop and drained before the error is returned.
pub fn run_parallel<S: RecordSink>(
    cfg: &EnumerateConfig,
    sink: &mut S,
) -> Result<RunSummary, SinkError> {
    if cfg.workers <= 1 {
        return run(cfg, sink);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cfg.workers)
        .build()
        .map_err(|e| SinkError::msg(format!("worker pool: {e}")))?;

    let limit = cfg.limit;
    let blocks = (limit / 2).div_ceil(BLOCK_SPAN);
    let queue: ArrayQueue<(u64, Vec<Record>)> = ArrayQueue::new(QUEUE_CAPACITY);
    let stop = AtomicBool::new(false);
    let start = Instant::now();

    let mut summary = RunSummary::default();
    let mut result: Result<(), SinkError> = Ok(());

    std::thread::scope(|scope| {
        scope.spawn(|| {
            pool.install(|| {
                (0..blocks).into_par_iter().for_each(|block| {
                    if stop.load(Ordering::Relaxed) {
                        return;
                    }
                    let mut item = (block, score_block(limit, block));
                    loop {
                        if stop.load(Ordering::Relaxed) {
                            return;
                        }
                        match queue.push(item) {
                            Ok(()) => return,
                            Err(back) => {
                                item = back;
                                std::thread::yield_now();
                            }
                        }
                    }
                });
            });
        });

        // Blocks complete out of order; the stash holds at most the queue
        // capacity plus one block per worker before index `next_block`
        // arrives.
        let mut stash: BTreeMap<u64, Vec<Record>> = BTreeMap::new();
        let mut next_block = 0u64;
        'drain: while next_block < blocks {
            let Some((index, records)) = queue.pop() else {
                std::thread::yield_now();
                continue;
            };
            stash.insert(index, records);
            while let Some(records) = stash.remove(&next_block) {
                for record in &records {
                    if let Err(e) = sink.append(record) {
                        result = Err(e);
                        break 'drain;
                    }
                    summary.emitted += 1;
                    note_hit(&mut summary, record, cfg.quality_threshold);
                    if cfg.report_every > 0 && summary.emitted.is_multiple_of(cfg.report_every) {
                        report_progress(summary.emitted, record.triple.a, start);
                    }
                }
                next_block += 1;
            }
        }
        stop.store(true, Ordering::Relaxed);
    });

    result?;
    sink.finish()?;
    finish_summary(&mut summary);
    Ok(summary)
}

/// Scores one `a` block; the records come out in canonical order already.
fn score_block(limit: u64, block: u64) -> Vec<Record> {
    let a_lo = 1 + block * BLOCK_SPAN;
    let a_hi = (a_lo + BLOCK_SPAN - 1).min(limit / 2);
    enumerate_span(limit, a_lo, a_hi)
        .map(|(triple, metrics)| Record { triple, metrics })
        .collect()
}

// ============================================================================
// Summary bookkeeping
// ============================================================================

#[inline]
fn note_hit(summary: &mut RunSummary, record: &Record, threshold: f64) {
    if record.metrics.quality.is_finite() && record.metrics.quality > threshold {
        summary.notable_hits.push(*record);
    }
}

fn finish_summary(summary: &mut RunSummary) {
    summary
        .notable_hits
        .sort_by(|x, y| y.metrics.quality.total_cmp(&x.metrics.quality));
}

fn report_progress(emitted: u64, a: u64, start: Instant) {
    let secs = start.elapsed().as_secs_f64();
    print!("\r{emitted} triples scored | a = {a} | {secs:.1}s elapsed    ");
    let _ = std::io::stdout().flush();
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    fn triples(limit: u64) -> Vec<(u64, u64, u64)> {
        enumerate(limit).map(|(t, _)| (t.a, t.b, t.c)).collect()
    }

    #[test]
    fn gcd_basics() {
        assert_eq!(gcd(1, 1), 1);
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(35, 64), 1);
        assert_eq!(gcd(0, 7), 7);
        assert_eq!(gcd(7, 0), 7);
    }

    #[test]
    fn config_default_is_valid() {
        let cfg = EnumerateConfig::default();
        assert!(cfg.limit > 0);
        assert!(cfg.workers >= 1);
        assert!(cfg.quality_threshold > 0.0);
    }

    #[test]
    fn limit_5_exact_set_in_order() {
        assert_eq!(triples(5), vec![(1, 2, 3), (1, 3, 4), (1, 4, 5), (2, 3, 5)]);
    }

    #[test]
    fn tiny_limits_are_empty() {
        assert!(triples(0).is_empty());
        assert!(triples(1).is_empty());
        assert!(triples(2).is_empty());
        assert_eq!(triples(3), vec![(1, 2, 3)]);
    }

    #[test]
    fn limit_9_contains_1_8_9_with_metrics() {
        let hit = enumerate(9)
            .find(|(t, _)| (t.a, t.b, t.c) == (1, 8, 9))
            .expect("(1, 8, 9) must be emitted at limit 9");
        let m = hit.1;
        assert_eq!(m.radical, 6);
        assert!((m.quality - 1.226_294_385_530_917).abs() < 1e-9);
        assert_eq!(m.ramification_depth, 3);
    }

    #[test]
    fn limit_128_contains_3_125_128() {
        let hit = enumerate(128)
            .find(|(t, _)| (t.a, t.b, t.c) == (3, 125, 128))
            .expect("(3, 125, 128) must be emitted at limit 128");
        let m = hit.1;
        assert_eq!(m.radical, 30);
        assert!((m.quality - 1.426_565_329_633_543).abs() < 1e-9);
        assert_eq!(m.ramification_depth, 7);
    }

    #[test]
    fn every_emitted_triple_satisfies_the_filters() {
        for (t, _) in enumerate(80) {
            assert_eq!(t.a + t.b, t.c);
            assert!(t.a < t.b);
            assert!(t.c <= 80);
            assert_eq!(gcd(t.a, t.b), 1);
        }
    }

    #[test]
    fn exhaustive_and_nonduplicating_vs_bruteforce() {
        const LIMIT: u64 = 60;
        let emitted = triples(LIMIT);

        let mut expected = Vec::new();
        for a in 1..=LIMIT {
            for b in (a + 1)..=LIMIT {
                if a + b <= LIMIT && gcd(a, b) == 1 {
                    expected.push((a, b, a + b));
                }
            }
        }
        assert_eq!(emitted.len(), expected.len());
        for t in &expected {
            assert_eq!(
                emitted.iter().filter(|e| *e == t).count(),
                1,
                "{t:?} must appear exactly once"
            );
        }
    }

    #[test]
    fn emission_order_is_canonical() {
        let emitted = triples(100);
        for pair in emitted.windows(2) {
            let (a0, _, c0) = pair[0];
            let (a1, _, c1) = pair[1];
            assert!(
                a0 < a1 || (a0 == a1 && c0 < c1),
                "order must be increasing a, then increasing c: {pair:?}"
            );
        }
    }

    #[test]
    fn enumeration_is_idempotent() {
        let first: Vec<_> = enumerate(70).collect();
        let second: Vec<_> = enumerate(70).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn run_streams_every_record_into_the_sink() {
        let cfg = EnumerateConfig {
            limit: 30,
            report_every: 0,
            quality_threshold: 0.9,
            ..EnumerateConfig::default()
        };
        let mut sink = MemorySink::new();
        let summary = run(&cfg, &mut sink).unwrap();

        assert_eq!(summary.emitted as usize, sink.records().len());
        assert_eq!(sink.records().len(), triples(30).len());
        for pair in summary.notable_hits.windows(2) {
            assert!(pair[0].metrics.quality >= pair[1].metrics.quality);
        }
        for hit in &summary.notable_hits {
            assert!(hit.metrics.quality.is_finite());
            assert!(hit.metrics.quality > 0.9);
        }
    }

    #[test]
    fn parallel_output_matches_sequential() {
        for limit in [1u64, 2, 5, 37, 100, 301] {
            for workers in [2usize, 3, 8] {
                let cfg_seq = EnumerateConfig {
                    limit,
                    report_every: 0,
                    workers: 1,
                    ..EnumerateConfig::default()
                };
                let cfg_par = EnumerateConfig {
                    workers,
                    ..cfg_seq.clone()
                };

                let mut seq = MemorySink::new();
                let mut par = MemorySink::new();
                let s1 = run(&cfg_seq, &mut seq).unwrap();
                let s2 = run_parallel(&cfg_par, &mut par).unwrap();

                assert_eq!(s1.emitted, s2.emitted, "limit {limit} workers {workers}");
                assert_eq!(seq.records(), par.records());
                assert_eq!(s1.notable_hits, s2.notable_hits);
            }
        }
    }

    #[test]
    fn sink_failure_aborts_both_runners() {
        struct FailingSink {
            appended: usize,
            fail_after: usize,
        }
        impl RecordSink for FailingSink {
            fn append(&mut self, _record: &Record) -> Result<(), SinkError> {
                self.appended += 1;
                if self.appended > self.fail_after {
                    return Err(SinkError::msg("synthetic sink failure"));
                }
                Ok(())
            }
            fn finish(&mut self) -> Result<(), SinkError> {
                Ok(())
            }
        }

        let cfg = EnumerateConfig {
            limit: 200,
            report_every: 0,
            ..EnumerateConfig::default()
        };
        let mut sink = FailingSink { appended: 0, fail_after: 50 };
        assert!(run(&cfg, &mut sink).is_err());

        let cfg = EnumerateConfig { workers: 2, ..cfg };
        let mut sink = FailingSink { appended: 0, fail_after: 50 };
        assert!(run_parallel(&cfg, &mut sink).is_err());
    }
}
