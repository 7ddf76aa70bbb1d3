//! # Conversion Context
//!
//! Per-node state for one schema conversion: the active path, the active
//! override, and handles into the collaborating subsystems. Contexts are
//! immutable values; every descent clones one and specializes the copy,
//! so the recursion stays safe if the owning collaborator parallelizes
//! per-type generation.

use schemagen_core::{PackagePath, PathKey, Segment, TypeResolver};
use schemagen_markers::{Package, TypeInfo};

use crate::overrides::{OverrideNode, Overrides};

/// Identity of a schema request for another named type.
///
/// The path context participates in identity: the same referent reached
/// under different override contexts may produce different documents, so
/// deduplication must key on all three members.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeIdent {
    /// Owning package of the referent.
    pub package: PackagePath,
    /// Referent type name.
    pub name: String,
    /// Override path context active at the reference site; empty when
    /// none was.
    pub path_context: PathKey,
}

/// Receiver for "a schema for this type is needed" requests emitted while
/// converting references.
///
/// Deduplicating repeated requests is the receiver's responsibility;
/// [`TypeIdent`] is hashable to make that cheap.
pub trait SchemaRequester {
    fn need_schema_for(&self, ident: TypeIdent);
}

/// Context threaded through one depth-first conversion walk.
#[derive(Clone)]
pub struct SchemaContext<'a> {
    pkg: &'a Package,
    resolver: &'a dyn TypeResolver,
    requester: &'a dyn SchemaRequester,
    overrides: &'a Overrides,

    /// Permit `{type: "number"}` for floating-point kinds.
    pub allow_dangerous_types: bool,
    /// Drop named fields that are not exported.
    pub ignore_unexported_fields: bool,

    info: Option<&'a TypeInfo>,
    path: PathKey,
    active_override: Option<&'a OverrideNode>,
}

impl<'a> SchemaContext<'a> {
    /// Root context for conversions within `pkg`.
    ///
    /// `path_context` replays the override descent of the reference site
    /// that requested this conversion; pass [`PathKey::empty`] for a
    /// fresh root.
    pub fn new(
        pkg: &'a Package,
        resolver: &'a dyn TypeResolver,
        requester: &'a dyn SchemaRequester,
        overrides: &'a Overrides,
        path_context: PathKey,
    ) -> Self {
        SchemaContext {
            pkg,
            resolver,
            requester,
            overrides,
            allow_dangerous_types: false,
            ignore_unexported_fields: false,
            info: None,
            path: path_context,
            active_override: None,
        }
    }

    pub fn with_flags(
        mut self,
        allow_dangerous_types: bool,
        ignore_unexported_fields: bool,
    ) -> Self {
        self.allow_dangerous_types = allow_dangerous_types;
        self.ignore_unexported_fields = ignore_unexported_fields;
        self
    }

    pub fn package(&self) -> &'a Package {
        self.pkg
    }

    pub fn resolver(&self) -> &'a dyn TypeResolver {
        self.resolver
    }

    /// The type being converted, when positioned at a type's own node.
    pub fn info(&self) -> Option<&'a TypeInfo> {
        self.info
    }

    pub fn path(&self) -> &PathKey {
        &self.path
    }

    pub fn active_override(&self) -> Option<&'a OverrideNode> {
        self.active_override
    }

    /// Context for converting a named type's own declaration.
    ///
    /// At a fresh root the override table is consulted by the type's
    /// fully-qualified name. A non-empty path is first replayed against
    /// the table: collection and field segments move the override, type
    /// segments do not (nested named types keep the reference site's
    /// override in scope).
    pub fn for_type(&self, info: &'a TypeInfo) -> SchemaContext<'a> {
        let mut ctx = self.clone();
        ctx.info = Some(info);
        if ctx.path.is_empty() {
            let key = info.qualified_name();
            ctx.active_override = ctx.overrides.get(&key);
            ctx.path = PathKey::root(key);
        } else {
            ctx.active_override = replay_overrides(ctx.overrides, &ctx.path);
            ctx.path.push(Segment::Type(info.qualified_name()));
        }
        ctx
    }

    /// Context for the elements of an array or the values of a map.
    ///
    /// The path grows regardless of override state (reference links need
    /// it); the override descent short-circuits on absence.
    pub fn for_collection(&self) -> SchemaContext<'a> {
        let mut ctx = self.clone();
        ctx.info = None;
        ctx.path.push(Segment::Collection);
        ctx.active_override = ctx
            .active_override
            .and_then(|o| o.item_override.as_deref());
        ctx
    }

    /// Context for a named struct field.
    pub fn for_field(&self, name: &str) -> SchemaContext<'a> {
        let mut ctx = self.clone();
        ctx.info = None;
        ctx.path.push(Segment::Field(name.to_string()));
        ctx.active_override = ctx
            .active_override
            .and_then(|o| o.field_overrides.get(name));
        ctx
    }

    /// The path as it appears in reference links: present only while an
    /// override is in scope, so unoverridden conversions share one flat
    /// namespace.
    pub fn path_context(&self) -> PathKey {
        if self.active_override.is_some() {
            self.path.clone()
        } else {
            PathKey::empty()
        }
    }

    /// Emit a schema request for a referent.
    pub(crate) fn request_schema(&self, package: PackagePath, name: &str) {
        self.requester.need_schema_for(TypeIdent {
            package,
            name: name.to_string(),
            path_context: self.path_context(),
        });
    }
}

/// Walk an existing path against the override table, reproducing the
/// descent that led to it.
fn replay_overrides<'a>(overrides: &'a Overrides, path: &PathKey) -> Option<&'a OverrideNode> {
    let mut segments = path.segments().iter();
    let Some(Segment::Type(root)) = segments.next() else {
        debug_assert!(false, "path keys must start with a type segment");
        return None;
    };
    let mut active = overrides.get(root);
    for segment in segments {
        active = match segment {
            // nested named types are implicitly scoped by the enclosing
            // override; they do not move it
            Segment::Type(_) => active,
            Segment::Collection => active.and_then(|o| o.item_override.as_deref()),
            Segment::Field(name) => active.and_then(|o| o.field_overrides.get(name)),
        };
    }
    active
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use schemagen_core::{ResolvedType, ScalarKind, TypeExpr};

    use super::*;

    struct NoResolver;
    impl TypeResolver for NoResolver {
        fn resolve(&self, _pkg: &PackagePath, _expr: &TypeExpr) -> Option<ResolvedType> {
            None
        }
        fn underlying_scalar(&self, _pkg: &PackagePath, _expr: &TypeExpr) -> Option<ScalarKind> {
            None
        }
    }

    #[derive(Default)]
    struct Requests(Mutex<Vec<TypeIdent>>);
    impl SchemaRequester for Requests {
        fn need_schema_for(&self, ident: TypeIdent) {
            self.0.lock().unwrap().push(ident);
        }
    }

    fn overrides_for_widget() -> Overrides {
        let mut bar = OverrideNode::default();
        bar.item_override = Some(Box::new(OverrideNode {
            schema: schemagen_core::Schema {
                description: Some("patched".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }));
        let mut widget = OverrideNode::default();
        widget.field_overrides.insert("bar".to_string(), bar);

        let mut table = Overrides::new();
        table.insert("acme.io/widgets.Widget".to_string(), widget);
        table
    }

    #[test]
    fn test_root_entry_looks_up_by_qualified_name() {
        let pkg = Package::new("acme.io/widgets");
        let requests = Requests::default();
        let table = overrides_for_widget();
        let ctx = SchemaContext::new(&pkg, &NoResolver, &requests, &table, PathKey::empty());

        let info = TypeInfo::new("acme.io/widgets", "Widget", TypeExpr::Struct);
        let entered = ctx.for_type(&info);
        assert!(entered.active_override().is_some());
        assert_eq!(entered.path().to_string(), "type:acme.io/widgets.Widget");
    }

    #[test]
    fn test_descent_moves_override_and_extends_path() {
        let pkg = Package::new("acme.io/widgets");
        let requests = Requests::default();
        let table = overrides_for_widget();
        let ctx = SchemaContext::new(&pkg, &NoResolver, &requests, &table, PathKey::empty());

        let info = TypeInfo::new("acme.io/widgets", "Widget", TypeExpr::Struct);
        let entered = ctx.for_type(&info);

        let field = entered.for_field("bar");
        assert!(field.active_override().is_some());

        let element = field.for_collection();
        assert!(element.active_override().is_some());
        assert_eq!(
            element.active_override().unwrap().schema.description.as_deref(),
            Some("patched")
        );
        assert_eq!(
            element.path().to_string(),
            "type:acme.io/widgets.Widget::field:bar::collection:[]"
        );

        // only field "bar" carries the override
        let other = entered.for_field("baz");
        assert!(other.active_override().is_none());
        // the path still grows without an override
        assert_eq!(
            other.for_collection().path().to_string(),
            "type:acme.io/widgets.Widget::field:baz::collection:[]"
        );
    }

    #[test]
    fn test_absent_type_has_no_override_at_any_depth() {
        let pkg = Package::new("acme.io/widgets");
        let requests = Requests::default();
        let table = overrides_for_widget();
        let ctx = SchemaContext::new(&pkg, &NoResolver, &requests, &table, PathKey::empty());

        let info = TypeInfo::new("acme.io/widgets", "Unlisted", TypeExpr::Struct);
        let entered = ctx.for_type(&info);
        assert!(entered.active_override().is_none());
        let field = entered.for_field("bar");
        assert!(field.active_override().is_none());
        let element = field.for_collection();
        assert!(element.active_override().is_none());
    }

    #[test]
    fn test_replay_reenters_override_scope() {
        let pkg = Package::new("acme.io/widgets");
        let requests = Requests::default();
        let table = overrides_for_widget();

        // the context a referent conversion would start from, carrying the
        // reference site's path
        let mut site = PathKey::root("acme.io/widgets.Widget");
        site.push(Segment::Field("bar".to_string()));
        site.push(Segment::Collection);
        let ctx = SchemaContext::new(&pkg, &NoResolver, &requests, &table, site);

        let info = TypeInfo::new("acme.io/widgets", "Part", TypeExpr::Struct);
        let entered = ctx.for_type(&info);
        assert!(entered.active_override().is_some());
        assert_eq!(
            entered.path().to_string(),
            "type:acme.io/widgets.Widget::field:bar::collection:[]::type:acme.io/widgets.Part"
        );
    }

    #[test]
    fn test_path_context_requires_active_override() {
        let pkg = Package::new("acme.io/widgets");
        let requests = Requests::default();
        let table = overrides_for_widget();
        let ctx = SchemaContext::new(&pkg, &NoResolver, &requests, &table, PathKey::empty());

        let listed = TypeInfo::new("acme.io/widgets", "Widget", TypeExpr::Struct);
        assert!(!ctx.for_type(&listed).path_context().is_empty());

        let unlisted = TypeInfo::new("acme.io/widgets", "Unlisted", TypeExpr::Struct);
        assert!(ctx.for_type(&unlisted).path_context().is_empty());
    }
}
