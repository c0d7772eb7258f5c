//! Linepatch: brace-balanced, line-span-safe single-file source patcher.
//!
//! This library patches one HTML/JS application file by locating function
//! definitions and insertion anchors through textual matching (brace
//! counting, substring search) and rewriting those line spans with
//! replacement code. It deliberately does not parse the target language:
//! braces inside string literals or comments are indistinguishable from
//! structural braces.

#![warn(missing_docs)]
// env_logger and sha2 are used by src/main.rs (binary), not this library
#![expect(unused_crate_dependencies)]

pub mod cli;
pub mod document;
pub mod error;
pub mod locate;
pub mod plan;
pub mod replace;

/// Re-export common error types for convenience.
pub use error::{PatchError, Result};

/// Re-export the document and span types for convenience.
pub use document::Document;
pub use locate::Span;

/// Linepatch version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
