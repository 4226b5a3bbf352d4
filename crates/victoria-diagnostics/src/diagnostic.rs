use crate::code::ErrorCode;
use serde::Serialize;
use std::sync::Arc;
use victoria_ast::location::SourceLocation;

/// The kind of diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    Error,
    Warning,
    Note,
    Help,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::Error => "error",
            DiagnosticKind::Warning => "warning",
            DiagnosticKind::Note => "note",
            DiagnosticKind::Help => "help",
        }
    }
}

/// A span of source annotated with a message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub location: SourceLocation,
    pub message: String,
    pub primary: bool,
}

impl Label {
    pub fn primary(location: SourceLocation, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
            primary: true,
        }
    }

    pub fn secondary(location: SourceLocation, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
            primary: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub code: ErrorCode,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    pub help: Option<String>,
    /// Program text for snippet rendering; attached by whoever owns the source.
    #[serde(skip)]
    pub source: Option<Arc<str>>,
}

impl Diagnostic {
    /// A diagnostic whose kind follows from its code.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            kind: code.kind(),
            code,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
            help: None,
            source: None,
        }
    }

    pub fn with_primary(mut self, location: SourceLocation, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(location, message));
        self
    }

    pub fn with_secondary(mut self, location: SourceLocation, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(location, message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Sets the help line; a later call replaces an earlier one.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_source(mut self, source: Arc<str>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == DiagnosticKind::Error
    }

    /// Location of the first primary label, falling back to the first label.
    pub fn location(&self) -> Option<&SourceLocation> {
        self.labels
            .iter()
            .find(|l| l.primary)
            .or_else(|| self.labels.first())
            .map(|l| &l.location)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.kind.as_str(), self.code, self.message)
    }
}

impl std::error::Error for Diagnostic {}
