//! # Marker Traits and Sets
//!
//! The value model for markers: the base trait with its capability slots,
//! the application priority, and the per-node collection of attached
//! marker values.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use schemagen_core::Schema;

/// Failure inside a schema-mutating marker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct MarkerApplicationError(pub String);

/// Application order for schema-mutating markers. Lower applies earlier.
///
/// Most markers never declare a priority and apply at
/// [`ApplyPriority::DEFAULT`]; markers whose mutation is a structural
/// prerequisite for others claim [`ApplyPriority::FIRST`] instead of
/// forcing every author to pick numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApplyPriority(pub u32);

impl ApplyPriority {
    /// Reserved sentinel: applies before every explicitly prioritized
    /// marker.
    pub const FIRST: ApplyPriority = ApplyPriority(0);

    /// Priority of markers that do not declare one.
    pub const DEFAULT: ApplyPriority = ApplyPriority(100);
}

/// Base trait for marker values.
///
/// Capabilities are optional slots, `None` by default. A marker
/// implements the slot method for each capability it has.
pub trait Marker: fmt::Debug + Send + Sync + 'static {
    /// The schema-mutation capability, if this marker has it.
    fn as_schema_marker(&self) -> Option<&dyn SchemaMarker> {
        None
    }
}

/// A marker that mutates the generated schema of its node.
pub trait SchemaMarker: fmt::Debug + Send + Sync {
    /// Mutate `schema` after the structural conversion of the node.
    fn apply_to_schema(&self, schema: &mut Schema) -> Result<(), MarkerApplicationError>;

    /// Application order relative to other schema-mutating markers on the
    /// same node.
    fn priority(&self) -> ApplyPriority {
        ApplyPriority::DEFAULT
    }
}

/// Shared handle to one parsed marker value.
pub type MarkerValue = Arc<dyn Marker>;

/// All marker values attached to one type, field, or package, keyed by
/// marker name.
///
/// Backed by a `BTreeMap` so iteration order is the marker-name order;
/// that order is the deterministic tie-break when equal-priority markers
/// apply.
#[derive(Debug, Clone, Default)]
pub struct MarkerSet {
    values: BTreeMap<String, Vec<MarkerValue>>,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a value under `name`. Repeated names accumulate.
    pub fn insert(&mut self, name: impl Into<String>, value: MarkerValue) {
        self.values.entry(name.into()).or_default().push(value);
    }

    /// The first value registered under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&MarkerValue> {
        self.values.get(name).and_then(|v| v.first())
    }

    /// Every value registered under `name`.
    pub fn get_all(&self, name: &str) -> &[MarkerValue] {
        self.values.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any value is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(name, value)` pairs in name order; repeated values under
    /// one name keep their insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MarkerValue)> {
        self.values
            .iter()
            .flat_map(|(name, values)| values.iter().map(move |v| (name.as_str(), v)))
    }

    /// Union of `self` and `extra`. Values from `extra` land after the
    /// originals under the same name.
    pub fn merged(&self, extra: &MarkerSet) -> MarkerSet {
        let mut out = self.clone();
        for (name, value) in extra.iter() {
            out.insert(name, Arc::clone(value));
        }
        out
    }
}
