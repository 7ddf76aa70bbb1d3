//! # Schema Overrides
//!
//! Externally configured patches addressed by schema path. The table is
//! built once, before any conversion starts, and is read-only for the
//! rest of the run.
//!
//! ## Configuration Shape
//!
//! The file is a YAML mapping from fully-qualified type name to an
//! override record. A record's reserved keys are `additionalMarkers`,
//! `fieldMask`, `fieldOverrides`, and `itemOverride`; every other key
//! belongs to the record's inline schema patch. Decoding is strict: an
//! unknown key anywhere rejects the whole load.
//!
//! ```yaml
//! acme.io/widgets.Widget:
//!   description: externally patched
//!   additionalMarkers:
//!     - "validation:DropProperties"
//!   fieldOverrides:
//!     parts:
//!       itemOverride:
//!         description: one part
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use schemagen_core::Schema;
use schemagen_markers::{MarkerParseError, MarkerRegistry, MarkerSet, TargetKind};

/// Why an override load failed. Any of these aborts the run before
/// conversion starts; the table is a hard prerequisite.
#[derive(Error, Debug)]
pub enum OverrideLoadError {
    /// The configuration file could not be read.
    #[error("failed to read override config at {path:?}: {source}")]
    Read {
        /// Path that was attempted.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration did not decode as the expected shape.
    #[error("failed to parse override config: {message}")]
    Parse {
        /// What failed, with the dotted record context where applicable.
        message: String,
    },

    /// An additional marker matched a definition but its argument text
    /// did not parse.
    #[error("failed to parse marker {marker:?} for {context}: {source}")]
    Marker {
        /// The raw marker text from the configuration.
        marker: String,
        /// Dotted record context the marker appeared under.
        context: String,
        #[source]
        source: MarkerParseError,
    },
}

/// One override: a partial schema patch, injected markers, a field mask,
/// and nested overrides for fields and collection items.
#[derive(Debug, Clone, Default)]
pub struct OverrideNode {
    /// Partial schema patch for the target. The conversion engine
    /// consults the description; the remaining members ride along for the
    /// assembly stage.
    pub schema: Schema,

    /// Markers injected on top of the target's own.
    pub additional_markers: MarkerSet,

    /// Field names to keep for struct targets. An empty set keeps all
    /// fields.
    pub field_mask: BTreeSet<String>,

    /// Overrides for named fields of struct targets.
    pub field_overrides: BTreeMap<String, OverrideNode>,

    /// Override for array elements and map values.
    pub item_override: Option<Box<OverrideNode>>,
}

/// Override table keyed by fully-qualified type name (`<package>.<Name>`).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    by_type: BTreeMap<String, OverrideNode>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, type_key: &str) -> Option<&OverrideNode> {
        self.by_type.get(type_key)
    }

    pub fn insert(&mut self, type_key: String, node: OverrideNode) {
        self.by_type.insert(type_key, node);
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }
}

impl FromIterator<(String, OverrideNode)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (String, OverrideNode)>>(iter: I) -> Self {
        Overrides {
            by_type: iter.into_iter().collect(),
        }
    }
}

const KEY_ADDITIONAL_MARKERS: &str = "additionalMarkers";
const KEY_FIELD_MASK: &str = "fieldMask";
const KEY_FIELD_OVERRIDES: &str = "fieldOverrides";
const KEY_ITEM_OVERRIDE: &str = "itemOverride";

/// Load an override table from a YAML file, resolving additional markers
/// against `registry`.
pub fn load_overrides(
    path: &Path,
    registry: &MarkerRegistry,
) -> Result<Overrides, OverrideLoadError> {
    let text = fs::read_to_string(path).map_err(|source| OverrideLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let raw: BTreeMap<String, serde_yaml::Value> =
        serde_yaml::from_str(&text).map_err(|e| OverrideLoadError::Parse {
            message: e.to_string(),
        })?;

    let mut table = Overrides::new();
    for (type_key, value) in raw {
        let node = convert_override(registry, &type_key, value)?;
        table.insert(type_key, node);
    }
    debug!(overrides = table.len(), path = %path.display(), "loaded override table");
    Ok(table)
}

fn convert_override(
    registry: &MarkerRegistry,
    context: &str,
    value: serde_yaml::Value,
) -> Result<OverrideNode, OverrideLoadError> {
    let serde_yaml::Value::Mapping(mapping) = value else {
        return Err(OverrideLoadError::Parse {
            message: format!("override record for {context} must be a mapping"),
        });
    };

    let mut node = OverrideNode::default();
    let mut marker_texts: Vec<String> = Vec::new();
    let mut patch = serde_yaml::Mapping::new();

    for (key, entry) in mapping {
        let Some(key_name) = key.as_str().map(str::to_owned) else {
            return Err(OverrideLoadError::Parse {
                message: format!("non-string key in override record for {context}"),
            });
        };
        match key_name.as_str() {
            KEY_ADDITIONAL_MARKERS => {
                marker_texts =
                    serde_yaml::from_value(entry).map_err(|e| OverrideLoadError::Parse {
                        message: format!("{context}.{KEY_ADDITIONAL_MARKERS}: {e}"),
                    })?;
            }
            KEY_FIELD_MASK => {
                node.field_mask =
                    serde_yaml::from_value(entry).map_err(|e| OverrideLoadError::Parse {
                        message: format!("{context}.{KEY_FIELD_MASK}: {e}"),
                    })?;
            }
            KEY_FIELD_OVERRIDES => {
                let serde_yaml::Value::Mapping(fields) = entry else {
                    return Err(OverrideLoadError::Parse {
                        message: format!("{context}.{KEY_FIELD_OVERRIDES} must be a mapping"),
                    });
                };
                for (field_key, field_value) in fields {
                    let Some(field_name) = field_key.as_str().map(str::to_owned) else {
                        return Err(OverrideLoadError::Parse {
                            message: format!(
                                "non-string field name in {context}.{KEY_FIELD_OVERRIDES}"
                            ),
                        });
                    };
                    let child_context = format!("{context}.{KEY_FIELD_OVERRIDES}.{field_name}");
                    let child = convert_override(registry, &child_context, field_value)?;
                    node.field_overrides.insert(field_name, child);
                }
            }
            KEY_ITEM_OVERRIDE => {
                let child_context = format!("{context}.{KEY_ITEM_OVERRIDE}");
                node.item_override =
                    Some(Box::new(convert_override(registry, &child_context, entry)?));
            }
            _ => {
                patch.insert(key, entry);
            }
        }
    }

    // Schema rejects unknown keys, which is what makes the record strict.
    node.schema = serde_yaml::from_value(serde_yaml::Value::Mapping(patch)).map_err(|e| {
        OverrideLoadError::Parse {
            message: format!("schema patch for {context}: {e}"),
        }
    })?;

    parse_markers(
        registry,
        TargetKind::Field,
        &marker_texts,
        context,
        &mut node.additional_markers,
    )?;
    parse_markers(
        registry,
        TargetKind::Type,
        &marker_texts,
        context,
        &mut node.additional_markers,
    )?;

    Ok(node)
}

/// Resolve marker texts against the registry for one target kind.
///
/// Texts with no matching definition are tolerated, so marker
/// vocabularies may drift between configuration producers and this
/// consumer. A matching definition that fails to parse is fatal.
fn parse_markers(
    registry: &MarkerRegistry,
    target: TargetKind,
    texts: &[String],
    context: &str,
    out: &mut MarkerSet,
) -> Result<(), OverrideLoadError> {
    for text in texts {
        let Some(def) = registry.lookup(text, target) else {
            debug!(marker = %text, context = %context, "skipping marker with no definition");
            continue;
        };
        let value = def.parse(text).map_err(|source| OverrideLoadError::Marker {
            marker: text.clone(),
            context: context.to_string(),
            source,
        })?;
        out.insert(def.name(), value);
    }
    Ok(())
}
