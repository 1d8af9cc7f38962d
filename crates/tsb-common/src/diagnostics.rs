//! Diagnostic types and message lookup for the binder and resolver.
//!
//! The resolver never raises errors for user mistakes; it records a
//! [`Diagnostic`] and substitutes the error type so resolution of sibling
//! declarations can continue. The type-checker layer that drives the
//! resolver owns presenting them.

use crate::span::Span;
use serde::Serialize;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// Related information for a diagnostic (e.g., "see also" locations).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagnosticRelatedInformation {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

/// A binding or resolution diagnostic with optional related information.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    /// Related information spans (e.g., where a colliding member was declared)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub const fn error(file: String, start: u32, length: u32, message: String, code: u32) -> Self {
        Self {
            file,
            start,
            length,
            message_text: message,
            category: DiagnosticCategory::Error,
            code,
            related_information: Vec::new(),
        }
    }

    /// Create an error diagnostic from a registered code, filling `{0}`, `{1}`, …
    /// with `args`. Spans that are not valid are reported at offset 0.
    #[must_use]
    pub fn from_code(file: &str, span: Span, code: u32, args: &[&str]) -> Self {
        let template = get_message_template(code).unwrap_or("Unknown diagnostic.");
        let (start, length) = if span.is_valid() {
            (span.start, span.len())
        } else {
            (0, 0)
        };
        let category = get_diagnostic_category(code).unwrap_or(DiagnosticCategory::Error);
        Self {
            file: file.to_string(),
            start,
            length,
            message_text: format_message(template, args),
            category,
            code,
            related_information: Vec::new(),
        }
    }

    /// Add related information to this diagnostic.
    #[must_use]
    pub fn with_related(mut self, file: String, start: u32, length: u32, message: String) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            file,
            start,
            length,
            message_text: message,
            category: DiagnosticCategory::Message,
            code: 0,
        });
        self
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

// =============================================================================
// Message Data
// =============================================================================

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const DUPLICATE_IDENTIFIER: u32 = 2300;
    pub const CANNOT_FIND_NAME: u32 = 2304;
    pub const TYPE_RECURSIVELY_REFERENCES_ITSELF_AS_BASE: u32 = 2310;
    pub const INTERFACE_CAN_ONLY_EXTEND_OBJECT_TYPE: u32 = 2312;
    pub const DUPLICATE_FUNCTION_IMPLEMENTATION: u32 = 2393;
    pub const CLASS_CAN_ONLY_IMPLEMENT_OBJECT_TYPE: u32 = 2422;
    pub const CANNOT_FIND_NAMESPACE: u32 = 2503;
    /// Not a TypeScript code. Reported by the declaration collector.
    pub const DECLARATIONS_NESTED_TOO_DEEPLY: u32 = 9100;
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::DUPLICATE_IDENTIFIER,
        category: DiagnosticCategory::Error,
        message: "Duplicate identifier '{0}'.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::CANNOT_FIND_NAME,
        category: DiagnosticCategory::Error,
        message: "Cannot find name '{0}'.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::TYPE_RECURSIVELY_REFERENCES_ITSELF_AS_BASE,
        category: DiagnosticCategory::Error,
        message: "Type '{0}' recursively references itself as a base type.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::INTERFACE_CAN_ONLY_EXTEND_OBJECT_TYPE,
        category: DiagnosticCategory::Error,
        message: "An interface can only extend an object type or intersection of object types with statically known members.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::DUPLICATE_FUNCTION_IMPLEMENTATION,
        category: DiagnosticCategory::Error,
        message: "Duplicate function implementation.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::CLASS_CAN_ONLY_IMPLEMENT_OBJECT_TYPE,
        category: DiagnosticCategory::Error,
        message: "A class can only implement an object type or intersection of object types with statically known members.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::CANNOT_FIND_NAMESPACE,
        category: DiagnosticCategory::Error,
        message: "Cannot find namespace '{0}'.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::DECLARATIONS_NESTED_TOO_DEEPLY,
        category: DiagnosticCategory::Warning,
        message: "Declarations nested more than {0} levels deep were not collected.",
    },
];

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
///
/// Returns the template string with `{0}`, `{1}`, etc. placeholders.
/// Use `format_message()` to fill in the placeholders.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}

/// Get the category for a diagnostic code.
#[must_use]
pub fn get_diagnostic_category(code: u32) -> Option<DiagnosticCategory> {
    get_diagnostic_message(code).map(|m| m.category)
}
