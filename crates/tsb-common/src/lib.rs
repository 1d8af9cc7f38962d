//! Common types and utilities for the tsb binder.
//!
//! This crate provides foundational types used across all tsb crates:
//! - Source spans (`Span`)
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, stable codes and templates)
//! - Binder limits and thresholds

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Diagnostics reported by the resolver and collected by the checker layer
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation, diagnostic_codes,
    format_message,
};

// Centralized limits and thresholds
pub mod limits;
