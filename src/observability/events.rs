//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::{Logger, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Validation
    /// `valid()` found no errors
    DocumentValidated,
    /// `valid()` found at least one error
    DocumentInvalid,

    // Persistence
    DocumentInsert,
    DocumentUpdate,
    DocumentDelete,
    DocumentFind,
    /// Save refused because the document is invalid
    DocumentRejected,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::DocumentValidated => "DOCUMENT_VALIDATED",
            Event::DocumentInvalid => "DOCUMENT_INVALID",
            Event::DocumentInsert => "DOCUMENT_INSERT",
            Event::DocumentUpdate => "DOCUMENT_UPDATE",
            Event::DocumentDelete => "DOCUMENT_DELETE",
            Event::DocumentFind => "DOCUMENT_FIND",
            Event::DocumentRejected => "DOCUMENT_REJECTED",
        }
    }

    /// Severity the event is logged at.
    pub fn severity(&self) -> Severity {
        match self {
            Event::DocumentValidated | Event::DocumentInvalid => Severity::Trace,
            Event::DocumentRejected => Severity::Warn,
            _ => Severity::Info,
        }
    }

    /// Logs the event at its own severity.
    pub fn log(&self, fields: &[(&str, &str)]) {
        Logger::log(self.severity(), self.as_str(), fields);
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
