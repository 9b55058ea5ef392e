use super::*;
use tsschema_common::GLOBAL_MODULE_NAME;
use tsschema_frontend::{
    ClassParts, ModifierFlags, NodeIndex, Program, ProgramBuilder, PropertySpec, SymbolId,
    SyntaxKind, symbol_flags,
};
use tsschema_model::{ConstructorKind, SchemaType};

/// Two files referencing each other: `src/a.ts` holds `A { b: B }` and
/// `src/b.ts` holds `B { a: A }`. `reversed` adds the files in the other
/// order.
fn mutual_program(reversed: bool) -> Program {
    let mut b = ProgramBuilder::new();
    let a = b.symbol("A", symbol_flags::CLASS);
    let b_sym = b.symbol("B", symbol_flags::CLASS);

    let to_b = b.type_ref("B", b_sym, vec![]);
    let field_b = b.property_declaration(PropertySpec::new("b", to_b));
    let a_decl = b.class_declaration(
        a,
        ModifierFlags::EXPORT,
        ClassParts {
            members: vec![field_b],
            ..ClassParts::default()
        },
    );
    let to_a = b.type_ref("A", a, vec![]);
    let field_a = b.property_declaration(PropertySpec::new("a", to_a));
    let b_decl = b.class_declaration(
        b_sym,
        ModifierFlags::EXPORT,
        ClassParts {
            members: vec![field_a],
            ..ClassParts::default()
        },
    );
    if reversed {
        b.source_file("src/b.ts", vec![b_decl]);
        b.source_file("src/a.ts", vec![a_decl]);
    } else {
        b.source_file("src/a.ts", vec![a_decl]);
        b.source_file("src/b.ts", vec![b_decl]);
    }
    b.build()
}

fn class_id(schema: &Schema, module: &str, name: &str) -> tsschema_model::ConstructorId {
    let container = schema.module(module).unwrap();
    schema
        .find_constructor(container, ConstructorKind::Class, name)
        .unwrap()
}

fn member_target(schema: &Schema, class: tsschema_model::ConstructorId, member: &str) -> String {
    let ty = &schema.constructor(class).instance_type.member(member).unwrap().ty;
    let target = ty.as_reference().unwrap().constructor;
    schema.constructor(target).name.clone()
}

#[test]
fn test_references_across_files_share_one_constructor() {
    let schema = resolve_program(&mutual_program(false), &ResolverOptions::default()).unwrap();

    let a = class_id(&schema, "./src/a", "A");
    let b = class_id(&schema, "./src/b", "B");
    assert_eq!(schema.constructor_count(), 2);
    let b_field = &schema.constructor(a).instance_type.member("b").unwrap().ty;
    assert_eq!(b_field.as_reference().unwrap().constructor, b);
    let a_field = &schema.constructor(b).instance_type.member("a").unwrap().ty;
    assert_eq!(a_field.as_reference().unwrap().constructor, a);
}

#[test]
fn test_file_order_does_not_change_homes() {
    let forward = resolve_program(&mutual_program(false), &ResolverOptions::default()).unwrap();
    let backward = resolve_program(&mutual_program(true), &ResolverOptions::default()).unwrap();

    for schema in [&forward, &backward] {
        let a = class_id(schema, "./src/a", "A");
        let b = class_id(schema, "./src/b", "B");
        assert_eq!(member_target(schema, a, "b"), "B");
        assert_eq!(member_target(schema, b, "a"), "A");
    }
    assert_eq!(forward.to_raw(), backward.to_raw());
}

#[test]
fn test_local_declaration_shadows_global_one() {
    let mut b = ProgramBuilder::new();
    let global_event = b.symbol("Event", symbol_flags::INTERFACE);
    let lib_decl =
        b.interface_declaration(global_event, ModifierFlags::empty(), vec![], vec![], vec![]);
    b.source_file("lib.d.ts", vec![lib_decl]);

    let local_event = b.symbol("Event", symbol_flags::CLASS);
    let local_decl = b.class_declaration(local_event, ModifierFlags::EXPORT, ClassParts::default());
    let uses_global = b.type_ref("Event", global_event, vec![]);
    let uses_local = b.type_ref("Event", local_event, vec![]);
    let native = b.property_declaration(PropertySpec::new("native", uses_global));
    let wrapped = b.property_declaration(PropertySpec::new("wrapped", uses_local));
    let handler = b.symbol("Handler", symbol_flags::CLASS);
    let handler_decl = b.class_declaration(
        handler,
        ModifierFlags::EXPORT,
        ClassParts {
            members: vec![native, wrapped],
            ..ClassParts::default()
        },
    );
    b.source_file("src/events.ts", vec![local_decl, handler_decl]);
    let schema = resolve_program(&b.build(), &ResolverOptions::default()).unwrap();

    let handler = class_id(&schema, "./src/events", "Handler");
    let members = &schema.constructor(handler).instance_type;
    let native = members.member("native").unwrap().ty.as_reference().unwrap().constructor;
    let wrapped = members.member("wrapped").unwrap().ty.as_reference().unwrap().constructor;
    assert_ne!(native, wrapped);
    let global = schema.module(GLOBAL_MODULE_NAME).unwrap();
    assert_eq!(schema.constructor(native).container, global);
    assert_eq!(wrapped, class_id(&schema, "./src/events", "Event"));
}

#[test]
fn test_structural_error_aborts_the_pass() {
    let mut b = ProgramBuilder::new();
    let (_, ok_decl) = plain_class(&mut b, "Fine");
    let flag = b.keyword(SyntaxKind::BooleanKeyword);
    let value = b.keyword(SyntaxKind::StringKeyword);
    let index = b.index_signature("key", flag, value);
    let broken = b.symbol("Broken", symbol_flags::INTERFACE);
    let broken_decl =
        b.interface_declaration(broken, ModifierFlags::EXPORT, vec![], vec![], vec![index]);
    b.source_file("src/broken.ts", vec![ok_decl, broken_decl]);

    let err = resolve_program(&b.build(), &ResolverOptions::default()).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidIndexKey { .. }));
    assert!(err.to_string().contains("must be string or number"));
}

#[test]
fn test_empty_program_yields_empty_schema() {
    let schema = resolve_program(&ProgramBuilder::new().build(), &ResolverOptions::default())
        .unwrap();
    assert_eq!(schema.constructor_count(), 0);
    assert!(
        schema
            .modules()
            .all(|(_, id)| schema.container(id).is_empty())
    );
}

#[test]
fn test_exported_function_signature_is_materialized() {
    let mut b = ProgramBuilder::new();
    let n = b.keyword(SyntaxKind::NumberKeyword);
    let param = b.parameter("value", n);
    let s = b.keyword(SyntaxKind::StringKeyword);
    let format = b.symbol("format", symbol_flags::FUNCTION);
    let decl = b.function_declaration(
        format,
        ModifierFlags::EXPORT,
        tsschema_frontend::SignatureParts::new(vec![param], s),
    );
    b.source_file("src/format.ts", vec![decl]);
    let schema = resolve_program(&b.build(), &ResolverOptions::default()).unwrap();

    let module = schema.module("./src/format").unwrap();
    let value = schema.value(schema.find_value(module, "format").unwrap());
    let Some(SchemaType::Function(signature)) = &value.ty else {
        panic!("expected a function type, got {:?}", value.ty);
    };
    assert_eq!(signature.parameters[0].name, "value");
    assert_eq!(
        signature.return_type,
        SchemaType::primitive(tsschema_model::PrimitiveKind::String)
    );
}

fn plain_class(b: &mut ProgramBuilder, name: &str) -> (SymbolId, NodeIndex) {
    let symbol = b.symbol(name, symbol_flags::CLASS);
    let decl = b.class_declaration(symbol, ModifierFlags::EXPORT, ClassParts::default());
    (symbol, decl)
}
