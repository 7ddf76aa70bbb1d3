//! # Type-to-Schema Conversion
//!
//! The recursive mapping from declared types to schema documents. Start
//! reading at [`info_to_schema`].
//!
//! Every arm is non-fatal: a structural problem records a diagnostic
//! against the originating declaration, substitutes an empty schema for
//! the node, and lets the walk continue with siblings and other types.

use schemagen_core::{
    PackagePath, PathKey, ResolvedType, ScalarKind, Schema, SchemaError, Span, TypeExpr,
};
use schemagen_markers::{builtin, MarkerSet, SchemaMarker};

use crate::context::SchemaContext;

/// Prefix of definition reference links.
const DEF_PREFIX: &str = "#/definitions/";

/// The schema for the type entered via [`SchemaContext::for_type`].
///
/// Types that declare their own wire serialization bypass structural
/// reflection, since their serialized form can be anything: their markers
/// are applied to an empty document, and that document is used only if a
/// marker actually set the type tag. Otherwise conversion falls back to
/// the structural walk.
pub fn info_to_schema(ctx: &SchemaContext<'_>) -> Schema {
    let Some(info) = ctx.info() else {
        debug_assert!(false, "info_to_schema requires a for_type context");
        return Schema::default();
    };

    if ctx
        .resolver()
        .has_custom_serialization(&info.package, &info.name)
    {
        let mut schema = Schema::default();
        let markers = merged_markers(ctx, &info.markers);
        apply_markers(ctx, &markers, &mut schema, &info.span);
        if schema.type_tag.is_some() {
            return schema;
        }
    }

    type_to_schema(ctx, &info.raw, &info.span)
}

/// The schema for one raw type expression.
///
/// `span` is the declaration the expression came from; diagnostics for
/// anything under this expression attach there.
pub fn type_to_schema(ctx: &SchemaContext<'_>, expr: &TypeExpr, span: &Span) -> Schema {
    let mut schema = match expr {
        TypeExpr::Named { .. } => named_to_schema(ctx, expr, span),
        TypeExpr::Array { elem, len } => array_to_schema(ctx, elem, *len, span),
        TypeExpr::Map { key, value } => map_to_schema(ctx, key, value, span),
        TypeExpr::Pointer(referent) => type_to_schema(ctx, referent, span),
        TypeExpr::Struct => struct_to_schema(ctx, expr, span),
    };

    if let Some(info) = ctx.info() {
        if !info.doc.is_empty() {
            schema.description = Some(info.doc.clone());
        }
        let markers = merged_markers(ctx, &info.markers);
        apply_markers(ctx, &markers, &mut schema, &info.span);
    }

    schema
}

/// The node's own markers plus any override-injected ones.
fn merged_markers(ctx: &SchemaContext<'_>, original: &MarkerSet) -> MarkerSet {
    match ctx.active_override() {
        Some(o) if !o.additional_markers.is_empty() => original.merged(&o.additional_markers),
        _ => original.clone(),
    }
}

/// Apply the schema-mutating subset of `set` to `schema` in priority
/// order.
///
/// Ascending priority, stable sort; equal priorities fall back to
/// marker-name order (the set iterates name-sorted). A failing mutation
/// is recorded against `span` and does not block the rest.
pub fn apply_markers(ctx: &SchemaContext<'_>, set: &MarkerSet, schema: &mut Schema, span: &Span) {
    let mut mutations: Vec<(&str, &dyn SchemaMarker)> = Vec::new();
    for (name, value) in set.iter() {
        if let Some(mutation) = value.as_schema_marker() {
            mutations.push((name, mutation));
        }
    }
    mutations.sort_by_key(|(_, mutation)| mutation.priority());

    for (name, mutation) in mutations {
        if let Err(err) = mutation.apply_to_schema(schema) {
            ctx.package().record(
                SchemaError::MarkerApplication {
                    marker: name.to_string(),
                    message: err.to_string(),
                },
                span.clone(),
            );
        }
    }
}

/// Schema for a builtin scalar kind.
fn scalar_to_schema(ctx: &SchemaContext<'_>, kind: ScalarKind, span: &Span) -> Schema {
    let type_tag = if kind.is_bool() {
        "boolean"
    } else if kind.is_string() {
        "string"
    } else if kind.is_integer() {
        "integer"
    } else if kind.is_float() {
        if ctx.allow_dangerous_types {
            "number"
        } else {
            ctx.package()
                .record(SchemaError::DangerousTypeRejected, span.clone());
            return Schema::default();
        }
    } else {
        ctx.package().record(
            SchemaError::UnsupportedType {
                type_name: kind.to_string(),
            },
            span.clone(),
        );
        return Schema::default();
    };

    let mut schema = Schema::of_type(type_tag);
    schema.format = kind.format().map(str::to_string);
    schema
}

/// Schema for a name reference: inline for builtins, a `$ref` link plus a
/// schema request for declared types.
fn named_to_schema(ctx: &SchemaContext<'_>, expr: &TypeExpr, span: &Span) -> Schema {
    let Some(resolved) = ctx.resolver().resolve(&ctx.package().path, expr) else {
        ctx.package().record(
            SchemaError::UnresolvedType {
                type_name: expr.to_string(),
            },
            span.clone(),
        );
        return Schema::default();
    };

    match resolved {
        ResolvedType::Scalar(kind) => scalar_to_schema(ctx, kind, span),
        ResolvedType::Named { package, name } => {
            // referents in the current package carry no package component
            // in the link
            let link_package = if package == ctx.package().path {
                PackagePath::default()
            } else {
                package.clone()
            };
            ctx.request_schema(package, &name);
            Schema {
                reference: Some(type_ref_link(&ctx.path_context(), &link_package, &name)),
                ..Schema::default()
            }
        }
    }
}

/// JSON-Pointer-escaped qualified name:
/// `<pathContext>/<package>~0<TypeName>`, where `/` inside the context
/// and package components escapes to `~1`. An empty context omits its
/// segment and separator entirely.
fn qualified_name(path_context: &PathKey, package: &PackagePath, type_name: &str) -> String {
    let mut out = String::new();
    if !path_context.is_empty() {
        out.push_str(&path_context.to_string().replace('/', "~1"));
        out.push('/');
    }
    if !package.is_empty() {
        out.push_str(&package.as_str().replace('/', "~1"));
        out.push_str("~0");
    }
    out.push_str(type_name);
    out
}

/// Definition link for a type under an (optionally empty) path context.
pub fn type_ref_link(path_context: &PathKey, package: &PackagePath, type_name: &str) -> String {
    format!("{DEF_PREFIX}{}", qualified_name(path_context, package, type_name))
}

/// Schema for an array. Unsized arrays of the 8-bit unsigned builtin are
/// binary data and serialize as base64 strings; everything else recurses
/// on the element under a collection segment.
fn array_to_schema(
    ctx: &SchemaContext<'_>,
    elem: &TypeExpr,
    len: Option<u64>,
    span: &Span,
) -> Schema {
    if len.is_none()
        && matches!(
            ctx.resolver().resolve(&ctx.package().path, elem),
            Some(ResolvedType::Scalar(ScalarKind::Uint8))
        )
    {
        let mut schema = Schema::of_type("string");
        schema.format = Some("byte".to_string());
        return schema;
    }

    let items = type_to_schema(&ctx.for_collection(), elem, span);
    let mut schema = Schema::of_type("array");
    schema.items = Some(Box::new(items));
    schema
}

/// Schema for a map. Keys must bottom out at a string kind after
/// alias-following; values recurse under a collection segment and land in
/// `additionalProperties` (explicitly allowed).
fn map_to_schema(
    ctx: &SchemaContext<'_>,
    key: &TypeExpr,
    value: &TypeExpr,
    span: &Span,
) -> Schema {
    match ctx.resolver().underlying_scalar(&ctx.package().path, key) {
        Some(kind) if kind.is_string() => {}
        _ => {
            ctx.package().record(
                SchemaError::InvalidMapKey {
                    key_type: key.to_string(),
                },
                span.clone(),
            );
            return Schema::default();
        }
    }

    let value_schema = match value {
        TypeExpr::Struct => {
            ctx.package().record(
                SchemaError::UnsupportedType {
                    type_name: value.to_string(),
                },
                span.clone(),
            );
            return Schema::default();
        }
        _ => type_to_schema(&ctx.for_collection(), value, span),
    };

    let mut schema = Schema::of_type("object");
    schema.additional_properties = Some(Box::new(value_schema));
    schema
}

/// Schema for a struct body. Only valid as the entered type's own
/// top-level expression; embedded anonymous structs are rejected.
/// Embedded (inline) fields land in `allOf` for a later flattening pass.
fn struct_to_schema(ctx: &SchemaContext<'_>, expr: &TypeExpr, span: &Span) -> Schema {
    let mut schema = Schema::of_type("object");

    // only the entered type's own top-level expression converts here;
    // the identity check is what catches anonymous structs in fields
    let Some(info) = ctx.info().filter(|info| std::ptr::eq(expr, &info.raw)) else {
        ctx.package()
            .record(SchemaError::InvalidEmbedding, span.clone());
        return schema;
    };

    let default_optional = ctx.package().markers.contains(builtin::OPTIONAL);

    for field in &info.fields {
        // embedded fields have no declared name and are never dropped here
        if !field.name.is_empty() && ctx.ignore_unexported_fields && !field.exported {
            continue;
        }

        let field_override = ctx
            .active_override()
            .and_then(|o| o.field_overrides.get(field.name.as_str()));
        let markers = match field_override {
            Some(o) if !o.additional_markers.is_empty() => {
                field.markers.merged(&o.additional_markers)
            }
            _ => field.markers.clone(),
        };

        let Some(tag) = &field.tag else {
            ctx.package().record(
                SchemaError::MissingWireName {
                    field: field.name.clone(),
                    type_name: info.name.clone(),
                },
                field.span.clone(),
            );
            continue;
        };
        if tag.skip {
            continue;
        }

        if default_optional {
            // everything not explicitly required is optional
            if markers.contains(builtin::REQUIRED) {
                schema.required.push(tag.name.clone());
            }
        } else if !tag.inline && !tag.omit_empty && !markers.contains(builtin::OPTIONAL) {
            // everything not inline, omit-empty, or explicitly optional is
            // required
            schema.required.push(tag.name.clone());
        }

        let mut prop_schema = if markers.contains(builtin::SCHEMALESS) {
            Schema::default()
        } else {
            type_to_schema(&ctx.for_field(&field.name), &field.raw, &field.span)
        };
        if !field.doc.is_empty() {
            prop_schema.description = Some(field.doc.clone());
        }

        apply_markers(ctx, &markers, &mut prop_schema, &field.span);

        if tag.inline {
            schema.all_of.push(prop_schema);
            continue;
        }

        if let Some(o) = field_override {
            if let Some(description) = &o.schema.description {
                if !description.is_empty() {
                    prop_schema.description = Some(description.clone());
                }
            }
        }

        schema.properties.insert(tag.name.clone(), prop_schema);
    }

    schema
}
