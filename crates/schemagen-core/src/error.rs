//! # Structural Error Taxonomy
//!
//! The node-local failures conversion can hit. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Every variant names the offending declaration element, so a recorded
//!   diagnostic reads usefully without its surrounding context.
//! - None of these abort a conversion walk: the engine records them and
//!   substitutes an empty or best-effort schema for the node.

use thiserror::Error;

/// Node-local failure during schema conversion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The declared type has no schema mapping at all.
    #[error("unsupported type {type_name:?}")]
    UnsupportedType {
        /// Rendered form of the offending expression.
        type_name: String,
    },

    /// A name did not resolve to any known type.
    #[error("unknown type {type_name:?}")]
    UnresolvedType {
        /// Rendered form of the unresolvable reference.
        type_name: String,
    },

    /// Map keys must bottom out at a string kind.
    #[error("map keys must be strings, not {key_type}")]
    InvalidMapKey {
        /// Rendered form of the rejected key type.
        key_type: String,
    },

    /// Anonymous structs are only valid as a type's own top-level
    /// expression.
    #[error("encountered non-top-level struct (possibly embedded), those are not allowed")]
    InvalidEmbedding,

    /// A struct field carries no wire-name metadata and cannot appear in
    /// a serialized form.
    #[error("field {field:?} in type {type_name:?} has no wire name")]
    MissingWireName {
        /// Declared field name.
        field: String,
        /// Name of the owning type.
        type_name: String,
    },

    /// Floating-point kinds are rejected unless dangerous types are
    /// explicitly allowed, since their wire behavior varies across
    /// consumers.
    #[error("found float, the usage of which is discouraged; serialize as string instead, or enable dangerous types to emit \"number\"")]
    DangerousTypeRejected,

    /// A schema-mutating marker failed while applying.
    #[error("marker {marker:?} failed to apply: {message}")]
    MarkerApplication {
        /// Name of the failing marker.
        marker: String,
        /// The marker's own failure message.
        message: String,
    },
}
