//! # Type Expressions
//!
//! The raw declared-type surface the engine consumes from the
//! type-analysis front end, reduced to exactly the kinds the conversion
//! dispatches on. Semantic questions (is this name a builtin? what does
//! this alias bottom out at?) go back through the [`TypeResolver`] seam
//! rather than being answered structurally here.

use std::fmt;

use crate::package::PackagePath;

/// Raw declared-type expression for a type or field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A reference to a builtin or named type, optionally qualified with
    /// the owning package.
    Named {
        package: Option<PackagePath>,
        name: String,
    },
    /// Array of `elem`; `len` is `None` for unsized arrays.
    Array {
        elem: Box<TypeExpr>,
        len: Option<u64>,
    },
    /// Map from `key` to `value`.
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// Pointer or other transparent indirection around a referent.
    Pointer(Box<TypeExpr>),
    /// Anonymous struct body. Field metadata lives on the owning type's
    /// record; the expression is only valid as a type's own top-level
    /// declaration.
    Struct,
}

impl TypeExpr {
    /// An unqualified name reference.
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named {
            package: None,
            name: name.into(),
        }
    }

    /// A package-qualified name reference.
    pub fn qualified(package: impl Into<PackagePath>, name: impl Into<String>) -> Self {
        TypeExpr::Named {
            package: Some(package.into()),
            name: name.into(),
        }
    }

    /// An unsized array of `elem`.
    pub fn array(elem: TypeExpr) -> Self {
        TypeExpr::Array {
            elem: Box::new(elem),
            len: None,
        }
    }

    /// A fixed-length array of `elem`.
    pub fn sized_array(elem: TypeExpr, len: u64) -> Self {
        TypeExpr::Array {
            elem: Box::new(elem),
            len: Some(len),
        }
    }

    /// A map from `key` to `value`.
    pub fn map(key: TypeExpr, value: TypeExpr) -> Self {
        TypeExpr::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// A pointer to `referent`.
    pub fn pointer(referent: TypeExpr) -> Self {
        TypeExpr::Pointer(Box::new(referent))
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named { package: None, name } => f.write_str(name),
            TypeExpr::Named {
                package: Some(package),
                name,
            } => write!(f, "{package}.{name}"),
            TypeExpr::Array { elem, len: None } => write!(f, "[{elem}]"),
            TypeExpr::Array {
                elem,
                len: Some(len),
            } => write!(f, "[{elem}; {len}]"),
            TypeExpr::Map { key, value } => write!(f, "map<{key}, {value}>"),
            TypeExpr::Pointer(referent) => write!(f, "*{referent}"),
            TypeExpr::Struct => f.write_str("struct{..}"),
        }
    }
}

/// Builtin scalar kinds the front end can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    String,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    /// A builtin with no schema mapping (machine-width pointers and the
    /// like). Conversion rejects it.
    Other,
}

impl ScalarKind {
    pub fn is_bool(&self) -> bool {
        matches!(self, ScalarKind::Bool)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, ScalarKind::String)
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ScalarKind::Int
                | ScalarKind::Int8
                | ScalarKind::Int16
                | ScalarKind::Int32
                | ScalarKind::Int64
                | ScalarKind::Uint
                | ScalarKind::Uint8
                | ScalarKind::Uint16
                | ScalarKind::Uint32
                | ScalarKind::Uint64
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, ScalarKind::Float32 | ScalarKind::Float64)
    }

    /// The schema format refinement for this kind, where one exists.
    ///
    /// Only the 32- and 64-bit integer widths carry a format; every other
    /// width (and every non-integer kind) is unbounded in the output.
    pub fn format(&self) -> Option<&'static str> {
        match self {
            ScalarKind::Int32 | ScalarKind::Uint32 => Some("int32"),
            ScalarKind::Int64 | ScalarKind::Uint64 => Some("int64"),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Bool => "bool",
            ScalarKind::String => "string",
            ScalarKind::Int => "int",
            ScalarKind::Int8 => "int8",
            ScalarKind::Int16 => "int16",
            ScalarKind::Int32 => "int32",
            ScalarKind::Int64 => "int64",
            ScalarKind::Uint => "uint",
            ScalarKind::Uint8 => "uint8",
            ScalarKind::Uint16 => "uint16",
            ScalarKind::Uint32 => "uint32",
            ScalarKind::Uint64 => "uint64",
            ScalarKind::Float32 => "float32",
            ScalarKind::Float64 => "float64",
            ScalarKind::Other => "unmappable builtin",
        };
        f.write_str(name)
    }
}

/// Semantic resolution of a [`TypeExpr::Named`] reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedType {
    /// The name denotes a builtin scalar.
    Scalar(ScalarKind),
    /// The name denotes a declared type owned by `package`.
    Named { package: PackagePath, name: String },
}

/// Callback seam into the type-analysis front end.
///
/// The engine calls back here for exactly two semantic questions it cannot
/// answer structurally: what a name reference denotes, and what scalar an
/// expression bottoms out at after alias-following. Implementations are
/// expected to answer [`TypeResolver::resolve`] for `Named` expressions;
/// other expression kinds may return `None`.
pub trait TypeResolver {
    /// Resolve a raw expression within `pkg` to its semantic type.
    /// `None` means the name cannot be resolved at all.
    fn resolve(&self, pkg: &PackagePath, expr: &TypeExpr) -> Option<ResolvedType>;

    /// The scalar kind an expression reaches after following named-type
    /// aliases, if any.
    fn underlying_scalar(&self, pkg: &PackagePath, expr: &TypeExpr) -> Option<ScalarKind>;

    /// Whether the named type declares its own wire serialization, in
    /// which case structural reflection is bypassed.
    fn has_custom_serialization(&self, _pkg: &PackagePath, _name: &str) -> bool {
        false
    }
}
