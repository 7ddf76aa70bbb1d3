//! # schemagen-schema — Type-to-Schema Conversion Engine
//!
//! The central engine of the workspace: a depth-first, context-sensitive
//! mapping from declared types to JSON-Schema-compatible documents.
//!
//! ## Shape of a Run
//!
//! The owning collaborator loads the override table once
//! ([`load_overrides`]), then drives one conversion per type it wants a
//! schema for: build a [`SchemaContext`], enter the type with
//! [`SchemaContext::for_type`], and call [`info_to_schema`]. References to
//! other named types come back as `$ref` links, and a matching
//! [`TypeIdent`] request is pushed through the [`SchemaRequester`] so the
//! referent gets converted exactly once, not once per reference site.
//!
//! ## Failure Stance
//!
//! Structural problems are node-local: they are recorded into the
//! package's diagnostics sink with the originating declaration location,
//! the node degrades to an empty schema, and the walk continues with
//! siblings. Only override loading is fatal, since the table is a
//! prerequisite for every conversion.

pub mod context;
pub mod convert;
pub mod overrides;

pub use context::{SchemaContext, SchemaRequester, TypeIdent};
pub use convert::{apply_markers, info_to_schema, type_ref_link, type_to_schema};
pub use overrides::{load_overrides, OverrideLoadError, OverrideNode, Overrides};
