//! # abc Triple Search Engine
//!
//! A streaming enumerator for primitive abc triples: coprime pairs
//! `a < b` with `a + b = c <= limit`, each scored with two
//! number-theoretic invariants:
//!
//! - **quality** \(q = \ln c / \ln \mathrm{rad}(abc)\), the standard
//!   abc-conjecture ratio (values above 1 are the interesting ones), and
//! - **ramification depth** \(\rho\), the largest single-prime valuation
//!   jump between either summand and the sum.
//!
//! This crate provides:
//! - A trial-division factorizer with an explicit degenerate-zero case.
//! - Pure metric functions over the three factorizations of a triple.
//! - A lazy enumeration iterator plus sequential and sharded runners that
//!   stream records into a pluggable sink (CSV bundled).
//!
//! ## Quick Start
//!
//! ```
//! use abc_triples::search::enumerate;
//!
//! // Score everything with c <= 9; (1, 8, 9) is the first notable triple.
//! let records: Vec<_> = enumerate(9).collect();
//! assert!(records
//!     .iter()
//!     .any(|(t, m)| (t.a, t.b, t.c) == (1, 8, 9) && m.ramification_depth == 3));
//! ```
//!
//! ## Driving a Sink
//!
//! ```
//! use abc_triples::search::{run, EnumerateConfig};
//! use abc_triples::sink::MemorySink;
//!
//! let cfg = EnumerateConfig {
//!     limit: 128,
//!     report_every: 0,
//!     ..EnumerateConfig::default()
//! };
//! let mut sink = MemorySink::new();
//! let summary = run(&cfg, &mut sink).expect("memory sink cannot fail");
//! assert_eq!(summary.emitted as usize, sink.records().len());
//! ```
//!
//! ## Validating Known Triples
//!
//! ```
//! use abc_triples::validate::validate_known_triples;
//!
//! validate_known_triples().expect("bundled triples should check out");
//! ```
//!
//! ## Modules
//!
//! - [`factor`]: Trial-division factorization into prime-power form.
//! - [`metrics`]: Radical, quality, and ramification depth.
//! - [`search`]: The lazy grid walk and the sequential/sharded runners.
//! - [`sink`]: The record sink trait, CSV and in-memory implementations.
//! - [`validate`]: Deterministic validation of bundled known triples.
//!
//! ## Performance Notes
//!
//! - Candidate pairs grow as O(limit²); each accepted triple costs three
//!   O(\(\sqrt{c}\)) factorizations, which dominates for large limits.
//! - Output streams record-by-record, so peak memory stays flat no matter
//!   how many triples a run emits.
//! - The sharded runner (`workers > 1`) reproduces the sequential output
//!   exactly, merged back into canonical order before the sink.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)] // fa / fb / fc are the domain's names
#![allow(clippy::many_single_char_names)] // Mathematical variable names
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::doc_markdown)] // LaTeX-style notation in docs
#![allow(clippy::multiple_crate_versions)] // Cargo.lock management is external

pub mod factor;
pub mod metrics;
pub mod search;
pub mod sink;
pub mod validate;

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::factor::{factorize, PrimeFactorization};
    pub use crate::metrics::{quality, radical, ramification_depth, Metrics};
    pub use crate::search::{
        enumerate, run, run_parallel, EnumerateConfig, Record, RunSummary, Triple, TripleIter,
    };
    pub use crate::sink::{CsvSink, MemorySink, RecordSink, SinkError};
    pub use crate::validate::validate_known_triples;
}
