//! # Marker Registry
//!
//! Definitions of the textual marker vocabulary. External configuration
//! refers to markers by text (`name` or `name=argument`); the registry
//! maps that text to a definition for a given target kind, and the
//! definition parses the argument into a typed value.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::marker::MarkerValue;

/// What a marker definition may describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TargetKind {
    Type,
    Field,
    Package,
}

/// Failure parsing a textual marker's argument.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkerParseError {
    /// The marker takes no argument but one was given.
    #[error("marker {name:?} takes no argument, got {args:?}")]
    UnexpectedArgument { name: String, args: String },

    /// The argument text did not parse.
    #[error("invalid argument for marker {name:?}: {message}")]
    InvalidArgument { name: String, message: String },
}

type ParseFn = Box<dyn Fn(&str) -> Result<MarkerValue, MarkerParseError> + Send + Sync>;

/// One registered marker: a name, a target kind, and an argument parser.
pub struct MarkerDefinition {
    name: String,
    target: TargetKind,
    parser: ParseFn,
}

impl fmt::Debug for MarkerDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerDefinition")
            .field("name", &self.name)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl MarkerDefinition {
    /// Definition whose parser receives the raw argument text (the portion
    /// after `=`, empty when absent).
    pub fn new(
        name: impl Into<String>,
        target: TargetKind,
        parser: impl Fn(&str) -> Result<MarkerValue, MarkerParseError> + Send + Sync + 'static,
    ) -> Self {
        MarkerDefinition {
            name: name.into(),
            target,
            parser: Box::new(parser),
        }
    }

    /// Definition for an argument-less flag marker.
    pub fn flag(
        name: impl Into<String>,
        target: TargetKind,
        make: impl Fn() -> MarkerValue + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        let flag_name = name.clone();
        Self::new(name, target, move |args| {
            if args.is_empty() {
                Ok(make())
            } else {
                Err(MarkerParseError::UnexpectedArgument {
                    name: flag_name.clone(),
                    args: args.to_string(),
                })
            }
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> TargetKind {
        self.target
    }

    /// Parse the textual form (`name` or `name=args`) into a value.
    pub fn parse(&self, text: &str) -> Result<MarkerValue, MarkerParseError> {
        let (_, args) = split_marker(text);
        (self.parser)(args)
    }
}

/// Split a textual marker into its name and argument portions.
fn split_marker(text: &str) -> (&str, &str) {
    match text.split_once('=') {
        Some((name, args)) => (name, args),
        None => (text, ""),
    }
}

/// Lookup table of marker definitions keyed by name and target kind.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    defs: BTreeMap<(String, TargetKind), MarkerDefinition>,
}

impl MarkerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in validation markers.
    pub fn with_builtin_markers() -> Self {
        let mut registry = Self::new();
        crate::builtin::register_builtin_markers(&mut registry);
        registry
    }

    /// Register a definition, replacing any previous one for the same name
    /// and target.
    pub fn define(&mut self, def: MarkerDefinition) {
        self.defs.insert((def.name.clone(), def.target), def);
    }

    /// Find the definition matching a textual marker for the given target.
    pub fn lookup(&self, text: &str, target: TargetKind) -> Option<&MarkerDefinition> {
        let (name, _) = split_marker(text);
        self.defs.get(&(name.to_string(), target))
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::marker::Marker;

    #[derive(Debug)]
    struct Flagged;
    impl Marker for Flagged {}

    #[derive(Debug, PartialEq)]
    struct MaxLen(u64);
    impl Marker for MaxLen {}

    fn registry() -> MarkerRegistry {
        let mut registry = MarkerRegistry::new();
        registry.define(MarkerDefinition::flag("flagged", TargetKind::Field, || {
            Arc::new(Flagged)
        }));
        registry.define(MarkerDefinition::new(
            "maxLen",
            TargetKind::Field,
            |args| {
                let len: u64 = args.parse().map_err(|_| MarkerParseError::InvalidArgument {
                    name: "maxLen".to_string(),
                    message: format!("expected an integer, got {args:?}"),
                })?;
                Ok(Arc::new(MaxLen(len)) as MarkerValue)
            },
        ));
        registry
    }

    #[test]
    fn test_lookup_respects_target_kind() {
        let registry = registry();
        assert!(registry.lookup("flagged", TargetKind::Field).is_some());
        assert!(registry.lookup("flagged", TargetKind::Type).is_none());
        assert!(registry.lookup("unheard-of", TargetKind::Field).is_none());
    }

    #[test]
    fn test_lookup_ignores_argument_portion() {
        let registry = registry();
        assert!(registry.lookup("maxLen=32", TargetKind::Field).is_some());
    }

    #[test]
    fn test_parse_arguments() {
        let registry = registry();
        let def = registry.lookup("maxLen=32", TargetKind::Field).unwrap();
        def.parse("maxLen=32").unwrap();

        let err = def.parse("maxLen=many").unwrap_err();
        assert!(matches!(err, MarkerParseError::InvalidArgument { .. }));
    }

    #[test]
    fn test_flag_rejects_arguments() {
        let registry = registry();
        let def = registry.lookup("flagged", TargetKind::Field).unwrap();
        def.parse("flagged").unwrap();

        let err = def.parse("flagged=yes").unwrap_err();
        assert!(matches!(err, MarkerParseError::UnexpectedArgument { .. }));
    }
}
