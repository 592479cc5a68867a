//! Problems found while lowering, as structured values.
//!
//! Lowering never prints. It records a [`Diagnostic`] per problem and the
//! driver decides how to show them.

use std::fmt;

use vela_ir::Span;

use crate::ErrorCode;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        })
    }
}

/// Role of a label within its diagnostic.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LabelStyle {
    /// The declaration or expression at fault.
    Primary,
    /// Related location, e.g. the use site of a bad declaration.
    Secondary,
}

impl LabelStyle {
    /// Gutter marker in plain-text output.
    pub fn marker(self) -> &'static str {
        match self {
            LabelStyle::Primary => "-->",
            LabelStyle::Secondary => "   ",
        }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub style: LabelStyle,
}

impl Label {
    pub fn is_primary(&self) -> bool {
        self.style == LabelStyle::Primary
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.style.marker(), self.span, self.message)
    }
}

/// One reported problem.
///
/// Built with the `with_*` methods and handed to a
/// [`DiagnosticQueue`](crate::DiagnosticQueue).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn new(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Self::new(code, Severity::Error)
    }

    #[cold]
    pub fn warning(code: ErrorCode) -> Self {
        Self::new(code, Severity::Warning)
    }

    /// Error `code` about the node at `span`.
    #[cold]
    pub fn at(code: ErrorCode, span: Span, message: impl Into<String>, label: &str) -> Self {
        Self::error(code).with_message(message).with_label(span, label)
    }

    /// `error[E9001]: internal compiler error` with `detail` as a note.
    #[cold]
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::error(ErrorCode::E9001)
            .with_message(ErrorCode::E9001.description())
            .with_note(detail)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    fn push_label(mut self, span: Span, message: impl Into<String>, style: LabelStyle) -> Self {
        self.labels.push(Label {
            span,
            message: message.into(),
            style,
        });
        self
    }

    pub fn with_label(self, span: Span, message: impl Into<String>) -> Self {
        self.push_label(span, message, LabelStyle::Primary)
    }

    pub fn with_secondary_label(self, span: Span, message: impl Into<String>) -> Self {
        self.push_label(span, message, LabelStyle::Secondary)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.is_primary()).map(|l| l.span)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        for label in &self.labels {
            write!(f, "\n  {label}")?;
        }
        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }
        Ok(())
    }
}
