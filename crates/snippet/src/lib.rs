//! # Context Snippet
//!
//! The snippet model consumed by the bundle engine: per-declaration text
//! renderings of a package, with the signals the engine needs to decide how
//! much of each declaration to show.
//!
//! ## Model
//!
//! ```text
//! Package (SnippetSource)
//!     │
//!     ├──> id -> Snippet        (block declarations share one snippet)
//!     │      ├─ short view     (doc + signature)
//!     │      ├─ full view      (complete body)
//!     │      ├─ documented ids, test-file flag
//!     │      └─ file + offset  (output ordering)
//!     │
//!     └──> package doc snippet (optional)
//! ```
//!
//! Token costs are measured through [`TokenCounter`]; [`ByteEstimate`] is the
//! bytes/4 default.

mod error;
mod ident;
mod package;
mod tokens;
mod types;

pub use error::{Result, SnippetError};
pub use ident::{
    is_ambiguous_identifier, is_exported_identifier, is_test_function, PACKAGE_IDENTIFIER,
};
pub use package::{Package, SnippetSource};
pub use tokens::{ByteEstimate, TokenCounter};
pub use types::{Snippet, SnippetKind};
