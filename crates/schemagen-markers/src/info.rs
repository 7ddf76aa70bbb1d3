//! # Type and Field Metadata
//!
//! The records the type-analysis front end hands to the engine. They are
//! read-only for the duration of a conversion; the front end owns their
//! construction and lifetime.

use schemagen_core::{DiagnosticSink, PackagePath, SchemaError, Span, TypeExpr};

use crate::marker::MarkerSet;

/// Wire-serialization metadata for one struct field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireTag {
    /// Serialized property name. Empty for inline/embedded fields.
    pub name: String,
    /// Field is excluded from the wire form entirely.
    pub skip: bool,
    /// Field is embedded: its schema merges into the parent rather than
    /// appearing as a property.
    pub inline: bool,
    /// Field is omitted from the wire form when empty.
    pub omit_empty: bool,
}

impl WireTag {
    /// A plain named tag.
    pub fn named(name: impl Into<String>) -> Self {
        WireTag {
            name: name.into(),
            ..WireTag::default()
        }
    }

    /// An inline/embedded tag (no property name of its own).
    pub fn inline() -> Self {
        WireTag {
            inline: true,
            ..WireTag::default()
        }
    }

    /// A tag excluding the field from the wire form.
    pub fn skipped() -> Self {
        WireTag {
            skip: true,
            ..WireTag::default()
        }
    }

    pub fn with_omit_empty(mut self) -> Self {
        self.omit_empty = true;
        self
    }
}

/// One declared member of a struct-like type.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    /// Declared (language-level) name; may be empty for embedded fields.
    pub name: String,
    /// Documentation attached to the field declaration.
    pub doc: String,
    /// Raw declared type.
    pub raw: TypeExpr,
    /// Markers attached to the field.
    pub markers: MarkerSet,
    /// Wire-serialization metadata; `None` when the declaration carries no
    /// wire name at all.
    pub tag: Option<WireTag>,
    /// Whether the field is visible outside its package.
    pub exported: bool,
    /// Declaration location.
    pub span: Span,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>, raw: TypeExpr) -> Self {
        FieldInfo {
            name: name.into(),
            doc: String::new(),
            raw,
            markers: MarkerSet::new(),
            tag: None,
            exported: true,
            span: Span::default(),
        }
    }

    pub fn with_tag(mut self, tag: WireTag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn with_markers(mut self, markers: MarkerSet) -> Self {
        self.markers = markers;
        self
    }

    pub fn unexported(mut self) -> Self {
        self.exported = false;
        self
    }
}

/// One declared type, as consumed by the engine.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    /// Normalized path of the owning package.
    pub package: PackagePath,
    /// Declared type name.
    pub name: String,
    /// Documentation attached to the declaration.
    pub doc: String,
    /// Raw declared-type expression.
    pub raw: TypeExpr,
    /// Markers attached to the declaration.
    pub markers: MarkerSet,
    /// Ordered field list for struct kinds; empty otherwise.
    pub fields: Vec<FieldInfo>,
    /// Declaration location.
    pub span: Span,
}

impl TypeInfo {
    pub fn new(package: impl Into<PackagePath>, name: impl Into<String>, raw: TypeExpr) -> Self {
        TypeInfo {
            package: package.into(),
            name: name.into(),
            doc: String::new(),
            raw,
            markers: MarkerSet::new(),
            fields: Vec::new(),
            span: Span::default(),
        }
    }

    pub fn with_fields(mut self, fields: Vec<FieldInfo>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn with_markers(mut self, markers: MarkerSet) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Fully-qualified `<package>.<Name>` key, as used by override tables
    /// and path roots.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.package, self.name)
    }
}

/// Per-package state shared by every conversion in that package.
#[derive(Debug, Default)]
pub struct Package {
    /// Normalized package path.
    pub path: PackagePath,
    /// Package-level markers; the required-mode default lives here.
    pub markers: MarkerSet,
    /// Failure sink for every conversion in this package.
    pub diagnostics: DiagnosticSink,
}

impl Package {
    pub fn new(path: impl Into<PackagePath>) -> Self {
        Package {
            path: path.into(),
            markers: MarkerSet::new(),
            diagnostics: DiagnosticSink::new(),
        }
    }

    pub fn with_markers(mut self, markers: MarkerSet) -> Self {
        self.markers = markers;
        self
    }

    /// Record a node-local failure against a declaration.
    pub fn record(&self, error: SchemaError, span: Span) {
        self.diagnostics.record(error, span);
    }
}
