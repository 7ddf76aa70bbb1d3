//! # Built-in Validation Markers
//!
//! The marker vocabulary the engine itself consults: the required-mode
//! flags, the schemaless escape hatch, and the two schema operations that
//! strip structure from a generated document.

use std::sync::Arc;

use schemagen_core::Schema;

use crate::marker::{Marker, MarkerApplicationError, MarkerValue, SchemaMarker};
use crate::registry::{MarkerDefinition, MarkerRegistry, TargetKind};

/// Marker name: the field is optional regardless of the package default.
/// At package level, flips the package's required default to optional.
pub const OPTIONAL: &str = "validation:Optional";

/// Marker name: the field is required even under an optional package
/// default.
pub const REQUIRED: &str = "validation:Required";

/// Marker name: skip structural recursion and emit an opaque schema.
pub const SCHEMALESS: &str = "validation:Schemaless";

/// Marker name: strip child property definitions from the schema.
pub const DROP_PROPERTIES: &str = "validation:DropProperties";

/// Marker name: strip the list-as-keyed-map hint, when present.
pub const DROP_LIST_MAP_KEYS: &str = "validation:DropListMapKeys";

/// Field (or package) is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Optional;

impl Marker for Optional {}

/// Field is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Required;

impl Marker for Required {}

/// Opaque escape hatch: the node keeps an empty schema instead of a
/// structural one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schemaless;

impl Marker for Schemaless {}

/// Omits child property definitions from the generated schema.
///
/// Typically paired with a preserve-unknown-fields marker so the object
/// stays intentionally opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropProperties;

impl Marker for DropProperties {
    fn as_schema_marker(&self) -> Option<&dyn SchemaMarker> {
        Some(self)
    }
}

impl SchemaMarker for DropProperties {
    fn apply_to_schema(&self, schema: &mut Schema) -> Result<(), MarkerApplicationError> {
        schema.properties.clear();
        schema.required.clear();
        schema.items = None;
        schema.additional_properties = None;
        Ok(())
    }
}

/// Drops the list-as-keyed-map hint if the schema carries one, else no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropListMapKeys;

impl Marker for DropListMapKeys {
    fn as_schema_marker(&self) -> Option<&dyn SchemaMarker> {
        Some(self)
    }
}

impl SchemaMarker for DropListMapKeys {
    fn apply_to_schema(&self, schema: &mut Schema) -> Result<(), MarkerApplicationError> {
        if schema.list_type.as_deref() == Some("map") {
            schema.list_type = None;
            schema.list_map_keys.clear();
        }
        Ok(())
    }
}

/// Register the built-in marker vocabulary into `registry`.
pub fn register_builtin_markers(registry: &mut MarkerRegistry) {
    for target in [TargetKind::Type, TargetKind::Field] {
        registry.define(MarkerDefinition::flag(OPTIONAL, target, || {
            Arc::new(Optional) as MarkerValue
        }));
        registry.define(MarkerDefinition::flag(REQUIRED, target, || {
            Arc::new(Required) as MarkerValue
        }));
        registry.define(MarkerDefinition::flag(SCHEMALESS, target, || {
            Arc::new(Schemaless) as MarkerValue
        }));
        registry.define(MarkerDefinition::flag(DROP_PROPERTIES, target, || {
            Arc::new(DropProperties) as MarkerValue
        }));
        registry.define(MarkerDefinition::flag(DROP_LIST_MAP_KEYS, target, || {
            Arc::new(DropListMapKeys) as MarkerValue
        }));
    }
    registry.define(MarkerDefinition::flag(OPTIONAL, TargetKind::Package, || {
        Arc::new(Optional) as MarkerValue
    }));
}
