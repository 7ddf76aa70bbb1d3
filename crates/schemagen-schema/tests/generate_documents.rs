//! End-to-end conversion tests: full documents out of declared types,
//! exercised both by exact comparison and by validating real instances
//! against the generated schema.

use std::sync::Mutex;

use serde_json::json;

use schemagen_core::{
    PackagePath, PathKey, ResolvedType, ScalarKind, Span, TypeExpr, TypeResolver,
};
use schemagen_markers::{FieldInfo, Package, TypeInfo, WireTag};
use schemagen_schema::{info_to_schema, Overrides, SchemaContext, SchemaRequester, TypeIdent};

/// Front-end stand-in: conventional builtin names resolve to scalars,
/// everything else is a named type in the current package.
struct Builtins;

impl TypeResolver for Builtins {
    fn resolve(&self, pkg: &PackagePath, expr: &TypeExpr) -> Option<ResolvedType> {
        let TypeExpr::Named { package, name } = expr else {
            return None;
        };
        if let Some(package) = package {
            return Some(ResolvedType::Named {
                package: package.clone(),
                name: name.clone(),
            });
        }
        let scalar = match name.as_str() {
            "bool" => ScalarKind::Bool,
            "string" => ScalarKind::String,
            "int" => ScalarKind::Int,
            "int32" => ScalarKind::Int32,
            "int64" => ScalarKind::Int64,
            "byte" => ScalarKind::Uint8,
            _ => {
                return Some(ResolvedType::Named {
                    package: pkg.clone(),
                    name: name.clone(),
                })
            }
        };
        Some(ResolvedType::Scalar(scalar))
    }

    fn underlying_scalar(&self, pkg: &PackagePath, expr: &TypeExpr) -> Option<ScalarKind> {
        match self.resolve(pkg, expr)? {
            ResolvedType::Scalar(kind) => Some(kind),
            ResolvedType::Named { .. } => None,
        }
    }
}

#[derive(Default)]
struct Requests(Mutex<Vec<TypeIdent>>);

impl SchemaRequester for Requests {
    fn need_schema_for(&self, ident: TypeIdent) {
        self.0.lock().unwrap().push(ident);
    }
}

fn widget_type() -> TypeInfo {
    TypeInfo::new("acme.io/widgets", "Widget", TypeExpr::Struct)
        .with_span(Span::new("widgets/types.api", 10, 1))
        .with_fields(vec![
            FieldInfo::new("name", TypeExpr::named("string")).with_tag(WireTag::named("name")),
            FieldInfo::new("count", TypeExpr::named("int"))
                .with_tag(WireTag::named("count").with_omit_empty()),
        ])
}

#[test]
fn test_generates_expected_document_for_simple_struct() {
    let pkg = Package::new("acme.io/widgets");
    let resolver = Builtins;
    let requests = Requests::default();
    let overrides = Overrides::new();

    let info = widget_type();
    let ctx = SchemaContext::new(&pkg, &resolver, &requests, &overrides, PathKey::empty());
    let schema = info_to_schema(&ctx.for_type(&info));

    assert_eq!(
        serde_json::to_value(&schema).unwrap(),
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "count": {"type": "integer"},
            },
            "required": ["name"],
        })
    );
    assert!(pkg.diagnostics.is_empty());
}

#[test]
fn test_generated_document_validates_instances() {
    let pkg = Package::new("acme.io/widgets");
    let resolver = Builtins;
    let requests = Requests::default();
    let overrides = Overrides::new();

    let info = widget_type();
    let ctx = SchemaContext::new(&pkg, &resolver, &requests, &overrides, PathKey::empty());
    let schema = info_to_schema(&ctx.for_type(&info));

    let document = serde_json::to_value(&schema).unwrap();
    let validator = jsonschema::validator_for(&document).unwrap();

    assert!(validator.is_valid(&json!({"name": "gear", "count": 3})));
    assert!(validator.is_valid(&json!({"name": "gear"})));
    // missing the required property
    assert!(!validator.is_valid(&json!({"count": 3})));
    // wrong property type
    assert!(!validator.is_valid(&json!({"name": "gear", "count": "three"})));
}

#[test]
fn test_references_carry_stable_identity_for_dedup() {
    let pkg = Package::new("acme.io/widgets");
    let resolver = Builtins;
    let requests = Requests::default();
    let overrides = Overrides::new();

    let info = TypeInfo::new("acme.io/widgets", "Assembly", TypeExpr::Struct).with_fields(vec![
        FieldInfo::new("primary", TypeExpr::named("Part")).with_tag(WireTag::named("primary")),
        FieldInfo::new("backup", TypeExpr::named("Part")).with_tag(WireTag::named("backup")),
        FieldInfo::new("bolt", TypeExpr::qualified("acme.io/parts", "Bolt"))
            .with_tag(WireTag::named("bolt")),
    ]);
    let ctx = SchemaContext::new(&pkg, &resolver, &requests, &overrides, PathKey::empty());
    let schema = info_to_schema(&ctx.for_type(&info));

    assert_eq!(
        schema.properties["primary"].reference.as_deref(),
        Some("#/definitions/Part")
    );
    assert_eq!(
        schema.properties["bolt"].reference.as_deref(),
        Some("#/definitions/acme.io~1parts~0Bolt")
    );

    // both local sites emit an identical ident, so the owning registry can
    // deduplicate them into one conversion
    let emitted = requests.0.lock().unwrap();
    assert_eq!(emitted.len(), 3);
    assert_eq!(emitted[0], emitted[1]);
    assert_ne!(emitted[0], emitted[2]);
    assert_eq!(emitted[2].package, PackagePath::new("acme.io/parts"));
}

#[test]
fn test_byte_payload_and_map_fields_take_their_special_forms() {
    let pkg = Package::new("acme.io/widgets");
    let resolver = Builtins;
    let requests = Requests::default();
    let overrides = Overrides::new();

    let info = TypeInfo::new("acme.io/widgets", "Payload", TypeExpr::Struct).with_fields(vec![
        FieldInfo::new("data", TypeExpr::array(TypeExpr::named("byte")))
            .with_tag(WireTag::named("data")),
        FieldInfo::new(
            "labels",
            TypeExpr::map(TypeExpr::named("string"), TypeExpr::named("string")),
        )
        .with_tag(WireTag::named("labels")),
    ]);
    let ctx = SchemaContext::new(&pkg, &resolver, &requests, &overrides, PathKey::empty());
    let schema = info_to_schema(&ctx.for_type(&info));

    assert_eq!(
        serde_json::to_value(&schema).unwrap(),
        json!({
            "type": "object",
            "properties": {
                "data": {"type": "string", "format": "byte"},
                "labels": {
                    "type": "object",
                    "additionalProperties": {"type": "string"},
                },
            },
            "required": ["data", "labels"],
        })
    );
}
