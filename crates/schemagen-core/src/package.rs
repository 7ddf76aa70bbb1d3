//! # Package Identity
//!
//! Newtype wrapper for the normalized import path of the package that owns
//! a type declaration. The type-analysis front end is responsible for
//! normalization (vendoring prefixes stripped, module roots resolved);
//! this crate treats the path as opaque identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized import path of the package owning a type declaration.
///
/// The empty path is the "current package" sentinel: when a reference link
/// points at a type in the package being converted, the link carries no
/// package component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackagePath(pub String);

impl PackagePath {
    /// Wrap an already-normalized package path.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The raw path string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the current-package sentinel.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PackagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PackagePath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl From<String> for PackagePath {
    fn from(path: String) -> Self {
        Self(path)
    }
}
