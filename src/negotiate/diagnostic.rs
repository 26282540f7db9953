//! Diagnostics emitted while synthesizing.
//!
//! The pipeline only ever appends to a `Vec<Diagnostic>`. Callers that want
//! the records elsewhere pass a [`DiagnosticSink`] to [`super::synthesize`];
//! `None` there falls back to [`NullSink`].

use std::fmt;

use crate::{debug, log};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
}

/// Machine-readable diagnostic code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    DuplicateAsset,
    MissingRelatedAsset,
    MissingEndpoints,
    AlreadyNegotiated,
    MissingContentType,
}

impl DiagnosticCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DuplicateAsset => "duplicate-asset",
            Self::MissingRelatedAsset => "missing-related-asset",
            Self::MissingEndpoints => "missing-endpoints",
            Self::AlreadyNegotiated => "already-negotiated",
            Self::MissingContentType => "missing-content-type",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    /// Asset identity or route the diagnostic refers to.
    pub target: Option<String>,
}

impl Diagnostic {
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            target: None,
        }
    }

    pub fn info(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            ..Self::warning(code, message)
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(target) = &self.target {
            write!(f, " ({target})")?;
        }
        Ok(())
    }
}

/// Append-only destination for diagnostics. Must not fail.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Drops everything.
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _: Diagnostic) {}
}

/// Forwards diagnostics to the terminal logger.
///
/// Info records are only shown with `--verbose`.
#[derive(Debug, Default)]
pub struct LogSink {
    warnings: usize,
}

impl LogSink {
    pub const fn new() -> Self {
        Self { warnings: 0 }
    }

    /// Number of warnings seen so far.
    pub const fn warnings(&self) -> usize {
        self.warnings
    }
}

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Info => debug!("negotiate"; "{}", diagnostic),
            Severity::Warning => {
                self.warnings += 1;
                log!("warning"; "{}", diagnostic);
            }
        }
    }
}
