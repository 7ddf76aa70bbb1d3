//! # schemagen-core — Foundational Types for the Schemagen Engine
//!
//! This crate is the bedrock of the schemagen workspace. It defines the
//! vocabulary every other crate speaks: package identity, source spans,
//! hierarchical schema paths, the schema output document, the structural
//! error taxonomy, and the diagnostics sink. Every other crate in the
//! workspace depends on `schemagen-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identity.** `PackagePath` is a newtype, not a
//!    bare string, so a package path cannot be confused with a type name or
//!    a rendered schema path.
//!
//! 2. **Typed schema paths.** `PathKey` is an ordered chain of typed
//!    segments rather than a delimited string. The "starts with a type
//!    segment" invariant is checked where paths grow, not re-parsed at
//!    every consumer.
//!
//! 3. **Node-local failure.** `SchemaError` values are recorded into a
//!    `DiagnosticSink` together with the originating `Span`; conversion
//!    degrades and continues. Nothing in this crate panics on bad input.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `schemagen-*` crates (this is the leaf of
//!   the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Public data types derive `Debug` and `Clone`, and the wire-facing
//!   ones implement `Serialize`/`Deserialize`.

pub mod diagnostics;
pub mod error;
pub mod package;
pub mod path;
pub mod schema;
pub mod types;

// Re-export primary types for ergonomic imports.
pub use diagnostics::{Diagnostic, DiagnosticSink, Span};
pub use error::SchemaError;
pub use package::PackagePath;
pub use path::{PathKey, Segment};
pub use schema::Schema;
pub use types::{ResolvedType, ScalarKind, TypeExpr, TypeResolver};
