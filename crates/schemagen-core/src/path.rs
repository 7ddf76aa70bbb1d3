//! # Schema Paths
//!
//! The hierarchical address of a node within a conversion: which type was
//! entered, which fields and collections were descended through. Paths do
//! double duty as the lookup key for overrides and as the namespace prefix
//! of context-sensitive reference links.

use std::fmt;

/// One step in a [`PathKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Entering a named type's conversion; carries the fully-qualified
    /// `<package>.<Name>` key.
    Type(String),
    /// Descending into the elements of an array or the values of a map.
    Collection,
    /// Descending into the named struct field.
    Field(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Type(name) => write!(f, "type:{name}"),
            Segment::Collection => f.write_str("collection:[]"),
            Segment::Field(name) => write!(f, "field:{name}"),
        }
    }
}

/// Ordered chain of segments addressing a node in a conversion.
///
/// A non-empty key always begins with a `Type` segment; `Collection` and
/// `Field` segments only ever descend from it. The empty key means "not
/// inside any conversion yet" and is valid only as a starting state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PathKey {
    segments: Vec<Segment>,
}

impl PathKey {
    /// The empty key.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A key rooted at a type, i.e. `type:<key>`.
    pub fn root(type_key: impl Into<String>) -> Self {
        PathKey {
            segments: vec![Segment::Type(type_key.into())],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The segments in root-to-leaf order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Append a segment.
    pub fn push(&mut self, segment: Segment) {
        debug_assert!(
            !self.segments.is_empty() || matches!(segment, Segment::Type(_)),
            "path keys must start with a type segment"
        );
        self.segments.push(segment);
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("::")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_renders_segment_chain() {
        let mut path = PathKey::root("acme.io/widgets.Widget");
        path.push(Segment::Field("parts".to_string()));
        path.push(Segment::Collection);
        assert_eq!(
            path.to_string(),
            "type:acme.io/widgets.Widget::field:parts::collection:[]"
        );
    }

    #[test]
    fn test_empty_key_renders_empty() {
        assert_eq!(PathKey::empty().to_string(), "");
        assert!(PathKey::empty().is_empty());
    }

    #[test]
    fn test_root_is_single_type_segment() {
        let path = PathKey::root("pkg.Thing");
        assert_eq!(
            path.segments(),
            &[Segment::Type("pkg.Thing".to_string())]
        );
    }
}
