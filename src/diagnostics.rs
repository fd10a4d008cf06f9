//! Structured, accumulate-only diagnostics.
//!
//! Nothing in the generation pass returns an error for a bad member; it
//! pushes a [`Diagnostic`] and moves on to the next member.
use std::fmt;

use serde::Serialize;

use crate::model::Location;

pub const CATEGORY: &str = "OnReadyGen.Parsing";

// Diagnostic codes, one per failure shape.
pub const UNRESOLVED_CLASS: &str = "ORG0001";
pub const UNSUPPORTED_MEMBER_TYPE: &str = "ORG0002";
pub const AMBIGUOUS_MEMBER_TYPE: &str = "ORG0003";
pub const ANCESTOR_NO_MATCH: &str = "ORG0004";
pub const ANCESTOR_MULTIPLE_MATCHES: &str = "ORG0005";
pub const ON_READY_SIGNATURE: &str = "ORG0006";
pub const MISPLACED_ANNOTATION: &str = "ORG0007";
pub const FIND_REQUIRES_NODE: &str = "ORG0008";
pub const UNRESOLVED_ANCESTOR_TYPE: &str = "ORG0009";
pub const ENUM_NAME_MISSING: &str = "ORG0010";
pub const NESTED_CLASS: &str = "ORG0011";
pub const ENUM_ON_GENERIC_CLASS: &str = "ORG0012";
pub const COMPANION_NAME_CLASH: &str = "ORG0013";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>, location: &Location) -> Self {
        Self::new(Severity::Error, code, message, location)
    }

    pub fn warning(code: &'static str, message: impl Into<String>, location: &Location) -> Self {
        Self::new(Severity::Warning, code, message, location)
    }

    fn new(
        severity: Severity,
        code: &'static str,
        message: impl Into<String>,
        location: &Location,
    ) -> Self {
        Self {
            code,
            category: CATEGORY,
            severity,
            message: message.into(),
            location: Some(location.clone()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{loc}: ")?;
        }
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}

/// Append-only sink scoped to one run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, d: Diagnostic) {
        // 由驱动程序负责展示，这里只留调试痕迹
        tracing::debug!(code = d.code, severity = %d.severity, message = %d.message, "diagnostic");
        self.0.push(d);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn has_errors(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.0.iter().filter(|d| d.is_error()).count()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
