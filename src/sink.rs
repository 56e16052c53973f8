//! Record sinks: where scored triples go.
//!
//! A sink is an append-only, ordered consumer. The enumeration core makes
//! no assumption about the medium beyond `append` not blocking forever;
//! any failure it reports is fatal to the run.

use crate::search::Record;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

// ============================================================================
// SinkError
// ============================================================================

/// Failure raised by a sink, or by the machinery driving one.
#[derive(Debug)]
pub struct SinkError {
    context: String,
    source: Option<io::Error>,
}

impl SinkError {
    /// A bare failure with a context message.
    pub fn msg(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            source: None,
        }
    }

    /// An I/O failure wrapped with context.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self {
            context: context.into(),
            source: Some(source),
        }
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {source}", self.context),
            None => write!(f, "{}", self.context),
        }
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ============================================================================
// RecordSink
// ============================================================================

/// Append-only, ordered consumer of enumeration records.
pub trait RecordSink {
    /// Consumes one record.
    ///
    /// # Errors
    /// Any error aborts the enumeration that feeds this sink.
    fn append(&mut self, record: &Record) -> Result<(), SinkError>;

    /// Flushes buffered state after the final record.
    ///
    /// # Errors
    /// Any error is reported to the caller of the run.
    fn finish(&mut self) -> Result<(), SinkError>;
}

// ============================================================================
// CsvSink
// ============================================================================

/// CSV sink with the `a,b,c,quality,ramification_depth` layout.
///
/// Quality is written with six fractional digits, or `inf` for the
/// degenerate-radical sentinel so that downstream numeric parsers see an
/// explicit marker rather than a silently wrong number.
pub struct CsvSink<W: Write> {
    out: W,
}

impl CsvSink<BufWriter<File>> {
    /// Creates the file at `path` and writes the header row.
    ///
    /// # Errors
    /// Propagates file-creation or header-write failures.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| SinkError::io(format!("create {}", path.display()), e))?;
        Self::from_writer(BufWriter::new(file))
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps an arbitrary writer and writes the header row.
    ///
    /// # Errors
    /// Propagates the header-write failure.
    pub fn from_writer(mut out: W) -> Result<Self, SinkError> {
        writeln!(out, "a,b,c,quality,ramification_depth")
            .map_err(|e| SinkError::io("write csv header", e))?;
        Ok(Self { out })
    }

    /// Unwraps the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn append(&mut self, record: &Record) -> Result<(), SinkError> {
        let t = record.triple;
        let m = record.metrics;
        if m.quality.is_finite() {
            writeln!(
                self.out,
                "{},{},{},{:.6},{}",
                t.a, t.b, t.c, m.quality, m.ramification_depth
            )
        } else {
            writeln!(
                self.out,
                "{},{},{},inf,{}",
                t.a, t.b, t.c, m.ramification_depth
            )
        }
        .map_err(|e| SinkError::io("write csv row", e))
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.out.flush().map_err(|e| SinkError::io("flush csv", e))
    }
}

// ============================================================================
// MemorySink
// ============================================================================

/// Vec-backed sink for tests and in-process consumers.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    records: Vec<Record>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The records appended so far, in arrival order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consumes the sink, returning its records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl RecordSink for MemorySink {
    fn append(&mut self, record: &Record) -> Result<(), SinkError> {
        self.records.push(*record);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
