//! # Diagnostics
//!
//! Accumulated, location-carrying failure reports. A conversion run
//! records every node-local failure here and keeps going; the owning
//! collaborator decides at the end whether the run as a whole failed.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Source location of a declaration, as reported by the front end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Source file of the declaration.
    pub file: String,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
}

impl Span {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Span {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file.is_empty() {
            f.write_str("<unknown>")
        } else {
            write!(f, "{}:{}:{}", self.file, self.line, self.column)
        }
    }
}

/// One recorded failure together with its originating declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub error: SchemaError,
    pub span: Span,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.span, self.error)
    }
}

/// Append-only failure sink shared by every conversion in a package.
///
/// Interior mutability behind a `Mutex` so the owning collaborator may
/// parallelize per-type generation; the engine itself appends from a
/// single thread.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    inner: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one failure against a declaration.
    pub fn record(&self, error: SchemaError, span: Span) {
        self.lock().push(Diagnostic { error, span });
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// A copy of everything recorded so far.
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    /// Drain the sink, leaving it empty.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Diagnostic>> {
        // A poisoned sink still holds valid diagnostics; keep reporting.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_drain() {
        let sink = DiagnosticSink::new();
        assert!(sink.is_empty());
        sink.record(
            SchemaError::InvalidEmbedding,
            Span::new("widgets/types.api", 14, 2),
        );
        sink.record(
            SchemaError::UnresolvedType {
                type_name: "Gadget".to_string(),
            },
            Span::new("widgets/types.api", 20, 9),
        );
        assert_eq!(sink.len(), 2);

        let drained = sink.take();
        assert_eq!(drained.len(), 2);
        assert!(sink.is_empty());
        assert_eq!(
            drained[0].to_string(),
            "widgets/types.api:14:2: encountered non-top-level struct (possibly embedded), those are not allowed"
        );
    }

    #[test]
    fn test_unknown_span_display() {
        let diag = Diagnostic {
            error: SchemaError::InvalidEmbedding,
            span: Span::default(),
        };
        assert!(diag.to_string().starts_with("<unknown>: "));
    }
}
