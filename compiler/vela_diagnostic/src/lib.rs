//! Diagnostic system for lowering-time error reporting.
//!
//! Every diagnostic carries:
//! - an error code for searchability
//! - a message saying what went wrong
//! - a primary span saying where (the declaration or expression responsible)
//! - optional notes
//!
//! Lowering never stops on a diagnosable error. It records the diagnostic
//! in a [`DiagnosticQueue`], substitutes a placeholder, and keeps going.
//! Broken invariants in the input tree are not diagnostics; backends report
//! those as their own fault type.
//!
//! # Error Guarantees
//!
//! `ErrorGuaranteed` is type-level proof that at least one error was emitted:
//!
//! ```text
//! let guarantee = queue.emit_error(diagnostic);
//! fn finish() -> Result<String, ErrorGuaranteed> { ... }
//! ```

mod diagnostic;
pub mod emitter;
mod error_code;
mod guarantee;
pub mod queue;

pub use diagnostic::{Diagnostic, Label, LabelStyle, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
