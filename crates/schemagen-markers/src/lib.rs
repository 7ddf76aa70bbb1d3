//! # schemagen-markers — Annotation Model
//!
//! Markers are named, typed directives attached to types, fields, and
//! packages. Some merely flag a fact the engine consults by name (a field
//! is optional, a type is schemaless); others carry the schema-mutation
//! capability and run against the generated document in priority order.
//!
//! ## Capability Slots
//!
//! Rather than downcasting, capabilities are optional slot methods on the
//! base [`Marker`] trait: a marker that mutates schemas returns itself
//! from [`Marker::as_schema_marker`]. Adding a capability means adding a
//! slot, not inspecting concrete types.
//!
//! ## Registry
//!
//! [`MarkerRegistry`] is an explicit value built once by the composition
//! root ([`MarkerRegistry::with_builtin_markers`]) and threaded to every
//! consumer. There is no global registration and no hidden mutable state.

pub mod builtin;
pub mod info;
pub mod marker;
pub mod registry;

pub use builtin::{
    DropListMapKeys, DropProperties, Optional, Required, Schemaless, DROP_LIST_MAP_KEYS,
    DROP_PROPERTIES, OPTIONAL, REQUIRED, SCHEMALESS,
};
pub use info::{FieldInfo, Package, TypeInfo, WireTag};
pub use marker::{ApplyPriority, Marker, MarkerApplicationError, MarkerSet, MarkerValue, SchemaMarker};
pub use registry::{MarkerDefinition, MarkerParseError, MarkerRegistry, TargetKind};
