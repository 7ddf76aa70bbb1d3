//! # Schema Documents
//!
//! The JSON-Schema-compatible output node built by the conversion engine.
//! This is the subset of the schema vocabulary the engine actually emits
//! and mutates; it is not a general-purpose schema model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A JSON-Schema-compatible validation document for one type or field.
///
/// Built fresh per conversion and mutated in place by markers before being
/// returned. The `properties`/`required` pair, `items`, and
/// `additional_properties` are mutually exclusive per conversion (struct
/// vs array vs map output).
///
/// Deserialization rejects unknown keys. Override patches decode through
/// this type, so a typo in a patch fails the load instead of silently
/// vanishing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Schema {
    /// JSON type tag ("object", "array", "string", ...).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,

    /// Format refinement ("int32", "int64", "byte", ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Human documentation carried from the declaration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Link to another generated document instead of inlining it.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Named property schemas for object output. Keyed by wire name;
    /// insertion order is irrelevant.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Schema>,

    /// Wire names of required properties, in declaration order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Element schema for array output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    /// Value schema for map-shaped objects. Presence means additional
    /// properties are explicitly allowed.
    #[serde(rename = "additionalProperties", skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<Schema>>,

    /// Conjunction branches. Embedded fields land here; flattening them is
    /// a later assembly pass, not this engine's concern.
    #[serde(rename = "allOf", skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<Schema>,

    /// List-as-keyed-map hint: "map" treats an array as keyed by
    /// `list_map_keys`.
    #[serde(rename = "x-list-type", skip_serializing_if = "Option::is_none")]
    pub list_type: Option<String>,

    /// Key property names for the list-as-keyed-map hint.
    #[serde(rename = "x-list-map-keys", skip_serializing_if = "Vec::is_empty")]
    pub list_map_keys: Vec<String>,
}

impl Schema {
    /// A document with only the type tag set.
    pub fn of_type(tag: &str) -> Self {
        Schema {
            type_tag: Some(tag.to_string()),
            ..Schema::default()
        }
    }

    /// Whether nothing has been set. An empty document matches any
    /// instance, which is what the schemaless escape hatch relies on.
    pub fn is_empty(&self) -> bool {
        *self == Schema::default()
    }
}
