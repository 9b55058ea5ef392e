use super::*;
use tsschema_common::ResolverOptions;
use tsschema_frontend::{
    ClassParts, ParameterSpec, Program, ProgramBuilder, PropertySpec, SignatureParts, SymbolId,
    symbol_flags,
};
use tsschema_model::{
    ConstructorKind, ContainerId, DecoratorTarget, EnumId, Expression, Schema, TypeConstructor,
    TypeParameterOwner, TypeParameterRef, TypeReference,
};

fn resolve(program: &Program) -> Result<Schema> {
    crate::resolve_program(program, &ResolverOptions::default())
}

fn module(schema: &Schema, name: &str) -> ContainerId {
    schema.module(name).unwrap()
}

fn class<'s>(schema: &'s Schema, module_name: &str, name: &str) -> &'s TypeConstructor {
    schema.find_class(module(schema, module_name), name).unwrap()
}

fn interface<'s>(schema: &'s Schema, module_name: &str, name: &str) -> &'s TypeConstructor {
    schema.find_interface(module(schema, module_name), name).unwrap()
}

fn primitive(kind: PrimitiveKind) -> SchemaType {
    SchemaType::primitive(kind)
}

fn exported_class(b: &mut ProgramBuilder, symbol: SymbolId, parts: ClassParts) -> NodeIndex {
    b.class_declaration(symbol, ModifierFlags::EXPORT, parts)
}

// =============================================================================
// Classes
// =============================================================================

#[test]
fn test_generic_base_is_closed_by_subclass() {
    let mut b = ProgramBuilder::new();
    let t = b.symbol("T", symbol_flags::TYPE_PARAMETER);
    let t_decl = b.type_parameter("T", t, NodeIndex::NONE);
    let value_type = b.type_ref("T", t, vec![]);
    let value = b.property_declaration(PropertySpec::new("value", value_type));
    let param_type = b.type_ref("T", t, vec![]);
    let param = b.parameter("value", param_type);
    let ctor = b.constructor(vec![param]);
    let boxed = b.symbol("Box", symbol_flags::CLASS);
    let box_decl = exported_class(
        &mut b,
        boxed,
        ClassParts {
            type_parameters: vec![t_decl],
            members: vec![value, ctor],
            ..ClassParts::default()
        },
    );
    let number = b.keyword(SyntaxKind::NumberKeyword);
    let base = b.heritage_type(&[("Box", boxed)], vec![number]);
    let extends = b.heritage_clause(SyntaxKind::ExtendsKeyword, vec![base]);
    let int_box = b.symbol("IntBox", symbol_flags::CLASS);
    let int_box_decl = exported_class(
        &mut b,
        int_box,
        ClassParts {
            heritage_clauses: vec![extends],
            ..ClassParts::default()
        },
    );
    b.source_file("src/box.ts", vec![box_decl, int_box_decl]);
    let schema = resolve(&b.build()).unwrap();

    let module_id = module(&schema, "./src/box");
    let box_id = schema
        .find_constructor(module_id, ConstructorKind::Class, "Box")
        .unwrap();
    let box_ctor = schema.constructor(box_id);
    assert_eq!(box_ctor.type_parameters.len(), 1);
    assert_eq!(box_ctor.type_parameters[0].name, "T");
    let t_ref = SchemaType::TypeParameter(TypeParameterRef {
        owner: TypeParameterOwner::Constructor { id: box_id },
        name: "T".to_string(),
    });
    assert_eq!(box_ctor.instance_type.member("value").unwrap().ty, t_ref);

    let statics = box_ctor.static_type.as_ref().unwrap();
    assert_eq!(statics.calls.len(), 1);
    assert_eq!(statics.calls[0].parameters[0].ty, t_ref);

    let int_box = class(&schema, "./src/box", "IntBox");
    assert_eq!(
        int_box.extends,
        vec![SchemaType::Reference(TypeReference {
            constructor: box_id,
            type_arguments: vec![primitive(PrimitiveKind::Number)],
        })]
    );
}

#[test]
fn test_class_implementing_generic_interface() {
    let mut b = ProgramBuilder::new();
    let t = b.symbol("T", symbol_flags::TYPE_PARAMETER);
    let t_decl = b.type_parameter("T", t, NodeIndex::NONE);
    let value_type = b.type_ref("T", t, vec![]);
    let value = b.property_signature("value", value_type, false);
    let boxed = b.symbol("Box", symbol_flags::INTERFACE);
    let box_decl =
        b.interface_declaration(boxed, ModifierFlags::EXPORT, vec![t_decl], vec![], vec![value]);
    let number = b.keyword(SyntaxKind::NumberKeyword);
    let base = b.heritage_type(&[("Box", boxed)], vec![number]);
    let implements = b.heritage_clause(SyntaxKind::ImplementsKeyword, vec![base]);
    let int_box = b.symbol("IntBox", symbol_flags::CLASS);
    let int_box_decl = exported_class(
        &mut b,
        int_box,
        ClassParts {
            heritage_clauses: vec![implements],
            ..ClassParts::default()
        },
    );
    b.source_file("src/box.ts", vec![box_decl, int_box_decl]);
    let schema = resolve(&b.build()).unwrap();

    let module_id = module(&schema, "./src/box");
    let box_id = schema
        .find_constructor(module_id, ConstructorKind::Interface, "Box")
        .unwrap();
    let box_ctor = schema.constructor(box_id);
    assert_eq!(box_ctor.type_parameters.len(), 1);
    assert_eq!(
        box_ctor.instance_type.member("value").unwrap().ty,
        SchemaType::TypeParameter(TypeParameterRef {
            owner: TypeParameterOwner::Constructor { id: box_id },
            name: "T".to_string(),
        })
    );

    let int_box = class(&schema, "./src/box", "IntBox");
    assert!(int_box.extends.is_empty());
    assert_eq!(
        int_box.implements,
        vec![SchemaType::Reference(TypeReference {
            constructor: box_id,
            type_arguments: vec![primitive(PrimitiveKind::Number)],
        })]
    );
}

#[test]
fn test_bare_generic_reference_is_closed_over_any() {
    let mut b = ProgramBuilder::new();
    let k = b.symbol("K", symbol_flags::TYPE_PARAMETER);
    let k_decl = b.type_parameter("K", k, NodeIndex::NONE);
    let v = b.symbol("V", symbol_flags::TYPE_PARAMETER);
    let v_decl = b.type_parameter("V", v, NodeIndex::NONE);
    let pair = b.symbol("Pair", symbol_flags::INTERFACE);
    let pair_decl =
        b.interface_declaration(pair, ModifierFlags::EXPORT, vec![k_decl, v_decl], vec![], vec![]);
    let bare = b.type_ref("Pair", pair, vec![]);
    let loose = b.property_signature("loose", bare, false);
    let s = b.keyword(SyntaxKind::StringKeyword);
    let n = b.keyword(SyntaxKind::NumberKeyword);
    let explicit = b.type_ref("Pair", pair, vec![s, n]);
    let strict = b.property_signature("strict", explicit, false);
    let holder = b.symbol("Holder", symbol_flags::INTERFACE);
    let holder_decl =
        b.interface_declaration(holder, ModifierFlags::EXPORT, vec![], vec![], vec![loose, strict]);
    b.source_file("src/pair.ts", vec![pair_decl, holder_decl]);
    let schema = resolve(&b.build()).unwrap();

    let holder = interface(&schema, "./src/pair", "Holder");
    let loose = holder.instance_type.member("loose").unwrap().ty.as_reference().unwrap();
    assert_eq!(loose.type_arguments, vec![SchemaType::any(), SchemaType::any()]);
    let strict = holder.instance_type.member("strict").unwrap().ty.as_reference().unwrap();
    assert_eq!(
        strict.type_arguments,
        vec![primitive(PrimitiveKind::String), primitive(PrimitiveKind::Number)]
    );
}

#[test]
fn test_self_referential_class_terminates() {
    let mut b = ProgramBuilder::new();
    let node = b.symbol("Node", symbol_flags::CLASS);
    let element = b.type_ref("Node", node, vec![]);
    let list = b.array_type(element);
    let next = b.property_declaration(PropertySpec::new("next", list));
    let decl = exported_class(
        &mut b,
        node,
        ClassParts {
            members: vec![next],
            ..ClassParts::default()
        },
    );
    b.source_file("src/node.ts", vec![decl]);
    let schema = resolve(&b.build()).unwrap();

    let module_id = module(&schema, "./src/node");
    let node_id = schema
        .find_constructor(module_id, ConstructorKind::Class, "Node")
        .unwrap();
    let next = &schema.constructor(node_id).instance_type.member("next").unwrap().ty;
    let array = next.as_reference().unwrap();
    assert_eq!(schema.constructor(array.constructor).name, "Array");
    assert_eq!(
        array.type_arguments[0].as_reference().unwrap().constructor,
        node_id
    );
}

#[test]
fn test_class_modifiers_decorators_and_statics() {
    let mut b = ProgramBuilder::new();
    let sealed = b.symbol("sealed", symbol_flags::FUNCTION);
    let sealed_decl = b.function_declaration(sealed, ModifierFlags::EXPORT, SignatureParts::default());
    let callee = b.identifier_expr("sealed", sealed);
    let decorator = b.decorator(callee);
    let n = b.keyword(SyntaxKind::NumberKeyword);
    let mut count = PropertySpec::new("count", n);
    count.modifiers = ModifierFlags::STATIC;
    let count = b.property_declaration(count);
    let s = b.keyword(SyntaxKind::StringKeyword);
    let describe = b.method_declaration(
        "describe",
        ModifierFlags::ABSTRACT,
        SignatureParts::new(vec![], s),
        vec![],
    );
    let shape = b.symbol("Shape", symbol_flags::CLASS);
    let decl = b.class_declaration(
        shape,
        ModifierFlags::EXPORT | ModifierFlags::ABSTRACT,
        ClassParts {
            members: vec![count, describe],
            decorators: vec![decorator],
            ..ClassParts::default()
        },
    );
    b.source_file("src/shape.ts", vec![sealed_decl, decl]);
    let schema = resolve(&b.build()).unwrap();

    let shape = class(&schema, "./src/shape", "Shape");
    assert!(shape.is_abstract);
    let sealed_id = schema
        .find_value(module(&schema, "./src/shape"), "sealed")
        .unwrap();
    assert_eq!(shape.decorators.len(), 1);
    assert_eq!(
        shape.decorators[0].target,
        DecoratorTarget::Value { id: sealed_id }
    );
    assert!(shape.static_type.as_ref().unwrap().member("count").is_some());
    assert!(shape.instance_type.member("count").is_none());
    let SchemaType::Function(describe) = &shape.instance_type.member("describe").unwrap().ty
    else {
        panic!("expected a method signature");
    };
    assert_eq!(describe.return_type, primitive(PrimitiveKind::String));
}

#[test]
fn test_parameter_properties_become_instance_members() {
    let mut b = ProgramBuilder::new();
    let s = b.keyword(SyntaxKind::StringKeyword);
    let mut id = ParameterSpec::new("id", s);
    id.modifiers = ModifierFlags::PUBLIC | ModifierFlags::READONLY;
    let id = b.parameter_with(id);
    let n = b.keyword(SyntaxKind::NumberKeyword);
    let plain = b.parameter("size", n);
    let ctor = b.constructor(vec![id, plain]);
    let user = b.symbol("User", symbol_flags::CLASS);
    let decl = exported_class(
        &mut b,
        user,
        ClassParts {
            members: vec![ctor],
            ..ClassParts::default()
        },
    );
    b.source_file("src/user.ts", vec![decl]);
    let schema = resolve(&b.build()).unwrap();

    let user = class(&schema, "./src/user", "User");
    let id = user.instance_type.member("id").unwrap();
    assert!(id.readonly);
    assert_eq!(id.ty, primitive(PrimitiveKind::String));
    assert!(user.instance_type.member("size").is_none());
    assert_eq!(user.static_type.as_ref().unwrap().calls[0].parameters.len(), 2);
}

#[test]
fn test_accessors_merge_into_one_member() {
    let mut b = ProgramBuilder::new();
    let n = b.keyword(SyntaxKind::NumberKeyword);
    let area = b.get_accessor("area", ModifierFlags::empty(), n);
    let s = b.keyword(SyntaxKind::StringKeyword);
    let name_get = b.get_accessor("name", ModifierFlags::empty(), s);
    let s2 = b.keyword(SyntaxKind::StringKeyword);
    let value = b.parameter("value", s2);
    let name_set = b.set_accessor("name", ModifierFlags::empty(), value);
    let square = b.symbol("Square", symbol_flags::CLASS);
    let decl = exported_class(
        &mut b,
        square,
        ClassParts {
            members: vec![area, name_get, name_set],
            ..ClassParts::default()
        },
    );
    b.source_file("src/square.ts", vec![decl]);
    let schema = resolve(&b.build()).unwrap();

    let square = class(&schema, "./src/square", "Square");
    let area = square.instance_type.member("area").unwrap();
    assert!(area.readonly);
    assert_eq!(area.ty, primitive(PrimitiveKind::Number));
    let name = square.instance_type.member("name").unwrap();
    assert!(!name.readonly);
    assert_eq!(name.ty, primitive(PrimitiveKind::String));
}

#[test]
fn test_class_extending_two_types_is_rejected() {
    let mut b = ProgramBuilder::new();
    let a = b.symbol("A", symbol_flags::CLASS);
    let a_decl = exported_class(&mut b, a, ClassParts::default());
    let c = b.symbol("C", symbol_flags::CLASS);
    let c_decl = exported_class(&mut b, c, ClassParts::default());
    let first = b.heritage_type(&[("A", a)], vec![]);
    let second = b.heritage_type(&[("C", c)], vec![]);
    let extends = b.heritage_clause(SyntaxKind::ExtendsKeyword, vec![first, second]);
    let both = b.symbol("Both", symbol_flags::CLASS);
    let both_decl = exported_class(
        &mut b,
        both,
        ClassParts {
            heritage_clauses: vec![extends],
            ..ClassParts::default()
        },
    );
    b.source_file("src/both.ts", vec![a_decl, c_decl, both_decl]);

    assert_eq!(
        resolve(&b.build()),
        Err(SchemaError::InvalidExtends {
            class: "Both".to_string(),
            count: 2,
        })
    );
}

// =============================================================================
// Interfaces and aliases
// =============================================================================

#[test]
fn test_interface_declarations_merge() {
    let mut b = ProgramBuilder::new();
    let s = b.keyword(SyntaxKind::StringKeyword);
    let host = b.property_signature("host", s, false);
    let s2 = b.keyword(SyntaxKind::StringKeyword);
    let key = b.parameter("key", s2);
    let get_string = b.method_signature("get", SignatureParts::new(vec![key], NodeIndex::NONE));
    let options = b.symbol("Options", symbol_flags::INTERFACE);
    let first = b.interface_declaration(options, ModifierFlags::EXPORT, vec![], vec![], vec![host, get_string]);

    let n = b.keyword(SyntaxKind::NumberKeyword);
    let port = b.property_signature("port", n, true);
    let n2 = b.keyword(SyntaxKind::NumberKeyword);
    let index = b.parameter("index", n2);
    let get_number = b.method_signature("get", SignatureParts::new(vec![index], NodeIndex::NONE));
    let n3 = b.keyword(SyntaxKind::NumberKeyword);
    let host_again = b.property_signature("host", n3, false);
    let second = b.interface_declaration(
        options,
        ModifierFlags::EXPORT,
        vec![],
        vec![],
        vec![port, get_number, host_again],
    );
    b.source_file("src/options.ts", vec![first, second]);
    let schema = resolve(&b.build()).unwrap();

    let options = interface(&schema, "./src/options", "Options");
    let names: Vec<&str> = options
        .instance_type
        .members
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(names, vec!["host", "get", "port"]);
    // First declaration of a property wins.
    assert_eq!(
        options.instance_type.member("host").unwrap().ty,
        primitive(PrimitiveKind::String)
    );
    assert!(options.instance_type.member("port").unwrap().optional);
    let SchemaType::Intersection { types } = &options.instance_type.member("get").unwrap().ty else {
        panic!("expected merged overloads");
    };
    assert_eq!(types.len(), 2);
}

/// `class Foo { a: string }` and `interface Foo extends Base { extra: number }`
/// in one file, plus `class User { foo: Foo }` elsewhere. `interface_first`
/// swaps the declaration order.
fn class_interface_merge(interface_first: bool) -> (Program, NodeIndex, NodeIndex) {
    let mut b = ProgramBuilder::new();
    let base = b.symbol("Base", symbol_flags::INTERFACE);
    let base_decl = b.interface_declaration(base, ModifierFlags::EXPORT, vec![], vec![], vec![]);

    let foo = b.symbol("Foo", symbol_flags::CLASS | symbol_flags::INTERFACE);
    let build_interface = |b: &mut ProgramBuilder| {
        let n = b.keyword(SyntaxKind::NumberKeyword);
        let extra = b.property_signature("extra", n, false);
        let base_ref = b.heritage_type(&[("Base", base)], vec![]);
        let heritage = b.heritage_clause(SyntaxKind::ExtendsKeyword, vec![base_ref]);
        b.interface_declaration(foo, ModifierFlags::EXPORT, vec![], vec![heritage], vec![extra])
    };
    let build_class = |b: &mut ProgramBuilder| {
        let s = b.keyword(SyntaxKind::StringKeyword);
        let a = b.property_declaration(PropertySpec::new("a", s));
        exported_class(
            b,
            foo,
            ClassParts {
                members: vec![a],
                ..ClassParts::default()
            },
        )
    };
    let (class_decl, interface_decl, statements) = if interface_first {
        let interface_decl = build_interface(&mut b);
        let class_decl = build_class(&mut b);
        (class_decl, interface_decl, vec![base_decl, interface_decl, class_decl])
    } else {
        let class_decl = build_class(&mut b);
        let interface_decl = build_interface(&mut b);
        (class_decl, interface_decl, vec![base_decl, class_decl, interface_decl])
    };
    b.source_file("src/foo.ts", statements);

    let foo_type = b.type_ref("Foo", foo, vec![]);
    let field = b.property_declaration(PropertySpec::new("foo", foo_type));
    let user = b.symbol("User", symbol_flags::CLASS);
    let user_decl = exported_class(
        &mut b,
        user,
        ClassParts {
            members: vec![field],
            ..ClassParts::default()
        },
    );
    b.source_file("src/user.ts", vec![user_decl]);
    (b.build(), class_decl, interface_decl)
}

#[test]
fn test_class_and_interface_merge_into_one_stub() {
    for interface_first in [false, true] {
        let (program, class_decl, interface_decl) = class_interface_merge(interface_first);
        let options = ResolverOptions::default();
        let mut state = ResolverState::new(&program, &options);
        assert_eq!(
            state.resolve_declaration(class_decl, false).unwrap(),
            state.resolve_declaration(interface_decl, false).unwrap()
        );

        let schema = resolve(&program).unwrap();
        let foo_module = module(&schema, "./src/foo");
        assert!(schema.find_interface(foo_module, "Foo").is_none());
        let foo = class(&schema, "./src/foo", "Foo");
        let names: Vec<&str> = foo.instance_type.members.keys().map(String::as_str).collect();
        assert!(names.contains(&"a") && names.contains(&"extra"), "{names:?}");
        assert!(foo.extends.is_empty());
        assert_eq!(foo.implements.len(), 1);

        let user = class(&schema, "./src/user", "User");
        let field = user.instance_type.member("foo").unwrap().ty.as_reference().unwrap();
        assert_eq!(schema.constructor(field.constructor).name, "Foo");
        assert!(
            schema
                .constructor(field.constructor)
                .instance_type
                .member("extra")
                .is_some()
        );
    }
}

#[test]
fn test_interface_heritage_call_and_construct_signatures() {
    let mut b = ProgramBuilder::new();
    let base = b.symbol("Base", symbol_flags::INTERFACE);
    let base_decl = b.interface_declaration(base, ModifierFlags::EXPORT, vec![], vec![], vec![]);
    let heritage = b.heritage_type(&[("Base", base)], vec![]);
    let extends = b.heritage_clause(SyntaxKind::ExtendsKeyword, vec![heritage]);
    let s = b.keyword(SyntaxKind::StringKeyword);
    let call = b.call_signature(SignatureParts::new(vec![], s));
    let derived = b.symbol("Factory", symbol_flags::INTERFACE);
    let derived_ret = b.type_ref("Factory", derived, vec![]);
    let construct = b.construct_signature(SignatureParts::new(vec![], derived_ret));
    let s2 = b.keyword(SyntaxKind::StringKeyword);
    let n = b.keyword(SyntaxKind::NumberKeyword);
    let index = b.index_signature("key", s2, n);
    let derived_decl = b.interface_declaration(
        derived,
        ModifierFlags::EXPORT,
        vec![],
        vec![extends],
        vec![call, construct, index],
    );
    b.source_file("src/factory.ts", vec![base_decl, derived_decl]);
    let schema = resolve(&b.build()).unwrap();

    let module_id = module(&schema, "./src/factory");
    let base_id = schema
        .find_constructor(module_id, ConstructorKind::Interface, "Base")
        .unwrap();
    let factory = interface(&schema, "./src/factory", "Factory");
    assert_eq!(
        factory.extends,
        vec![SchemaType::Reference(TypeReference {
            constructor: base_id,
            type_arguments: vec![],
        })]
    );
    assert_eq!(factory.instance_type.calls.len(), 1);
    assert_eq!(factory.instance_type.constructs.len(), 1);
    assert_eq!(
        factory.instance_type.index,
        Some(IndexSignature {
            key: IndexKeyKind::String,
            value: primitive(PrimitiveKind::Number),
        })
    );
}

#[test]
fn test_heritage_must_be_a_reference() {
    let mut b = ProgramBuilder::new();
    let s = b.keyword(SyntaxKind::StringKeyword);
    let name = b.symbol("Name", symbol_flags::TYPE_ALIAS);
    let alias = b.type_alias_declaration(name, ModifierFlags::EXPORT, vec![], s);
    let heritage = b.heritage_type(&[("Name", name)], vec![]);
    let extends = b.heritage_clause(SyntaxKind::ExtendsKeyword, vec![heritage]);
    let tagged = b.symbol("Tagged", symbol_flags::INTERFACE);
    let decl = b.interface_declaration(tagged, ModifierFlags::EXPORT, vec![], vec![extends], vec![]);
    b.source_file("src/tagged.ts", vec![alias, decl]);

    assert_eq!(
        resolve(&b.build()),
        Err(SchemaError::HeritageNotReference {
            text: "Name".to_string(),
            owner: "Tagged".to_string(),
        })
    );
}

#[test]
fn test_index_signature_key_must_be_string_or_number() {
    let mut b = ProgramBuilder::new();
    let flag = b.keyword(SyntaxKind::BooleanKeyword);
    let value = b.keyword(SyntaxKind::StringKeyword);
    let index = b.index_signature("key", flag, value);
    let lookup = b.symbol("Lookup", symbol_flags::INTERFACE);
    let decl = b.interface_declaration(lookup, ModifierFlags::EXPORT, vec![], vec![], vec![index]);
    b.source_file("src/lookup.ts", vec![decl]);

    assert!(matches!(
        resolve(&b.build()),
        Err(SchemaError::InvalidIndexKey { .. })
    ));
}

#[test]
fn test_unbound_type_parameter_is_fatal() {
    let mut b = ProgramBuilder::new();
    let t = b.symbol("T", symbol_flags::TYPE_PARAMETER);
    let stray = b.type_ref("T", t, vec![]);
    let item = b.property_signature("item", stray, false);
    let holder = b.symbol("Holder", symbol_flags::INTERFACE);
    let decl = b.interface_declaration(holder, ModifierFlags::EXPORT, vec![], vec![], vec![item]);
    b.source_file("src/holder.ts", vec![decl]);

    assert_eq!(
        resolve(&b.build()),
        Err(SchemaError::TypeParameterNotFound {
            name: "T".to_string()
        })
    );
}

#[test]
fn test_generic_type_alias() {
    let mut b = ProgramBuilder::new();
    let t = b.symbol("T", symbol_flags::TYPE_PARAMETER);
    let t_decl = b.type_parameter("T", t, NodeIndex::NONE);
    let element = b.type_ref("T", t, vec![]);
    let list = b.array_type(element);
    let s = b.keyword(SyntaxKind::StringKeyword);
    let aliased = b.union_type(vec![list, s]);
    let many = b.symbol("Many", symbol_flags::TYPE_ALIAS);
    let decl = b.type_alias_declaration(many, ModifierFlags::EXPORT, vec![t_decl], aliased);
    b.source_file("src/many.ts", vec![decl]);
    let schema = resolve(&b.build()).unwrap();

    let module_id = module(&schema, "./src/many");
    let many_id = schema
        .find_constructor(module_id, ConstructorKind::TypeAlias, "Many")
        .unwrap();
    let many = schema.find_type_alias(module_id, "Many").unwrap();
    assert_eq!(many, schema.constructor(many_id));
    assert_eq!(many.type_parameters.len(), 1);
    let Some(SchemaType::Union { types }) = &many.aliased_type else {
        panic!("expected a union alias");
    };
    assert_eq!(types[1], primitive(PrimitiveKind::String));
    let array = types[0].as_reference().unwrap();
    assert_eq!(
        array.type_arguments,
        vec![SchemaType::TypeParameter(TypeParameterRef {
            owner: TypeParameterOwner::Constructor { id: many_id },
            name: "T".to_string(),
        })]
    );
}

// =============================================================================
// Enums and values
// =============================================================================

fn enum_id(schema: &Schema, module_name: &str, name: &str) -> EnumId {
    schema.find_enum(module(schema, module_name), name).unwrap()
}

#[test]
fn test_merged_enum_keeps_first_initializer() {
    let mut b = ProgramBuilder::new();
    let color = b.symbol("Color", symbol_flags::REGULAR_ENUM);
    let red = b.symbol("Red", symbol_flags::ENUM_MEMBER);
    let one = b.numeric_literal("1");
    let red_decl = b.enum_member("Red", red, one);
    let green = b.symbol("Green", symbol_flags::ENUM_MEMBER);
    let green_decl = b.enum_member("Green", green, NodeIndex::NONE);
    let first = b.enum_declaration(color, ModifierFlags::EXPORT, vec![red_decl, green_decl]);
    let blue = b.symbol("Blue", symbol_flags::ENUM_MEMBER);
    let label = b.string_literal("blue");
    let blue_decl = b.enum_member("Blue", blue, label);
    let second = b.enum_declaration(color, ModifierFlags::EXPORT, vec![blue_decl]);
    b.source_file("src/color.ts", vec![first, second]);
    let schema = resolve(&b.build()).unwrap();

    let color = schema.enum_def(enum_id(&schema, "./src/color", "Color"));
    let names: Vec<&str> = color.members.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Red", "Green", "Blue"]);
    assert_eq!(color.members["Red"].initializer, Some(Expression::number(1.0)));
    assert_eq!(color.members["Green"].initializer, None);
    assert_eq!(
        color.members["Blue"].initializer,
        Some(Expression::string("blue"))
    );
}

#[test]
fn test_function_overloads_intersect() {
    let mut b = ProgramBuilder::new();
    let parse = b.symbol("parse", symbol_flags::FUNCTION);
    let s = b.keyword(SyntaxKind::StringKeyword);
    let text = b.parameter("text", s);
    let n = b.keyword(SyntaxKind::NumberKeyword);
    let first = b.function_declaration(parse, ModifierFlags::EXPORT, SignatureParts::new(vec![text], n));
    let n2 = b.keyword(SyntaxKind::NumberKeyword);
    let value = b.parameter("value", n2);
    let n3 = b.keyword(SyntaxKind::NumberKeyword);
    let second =
        b.function_declaration(parse, ModifierFlags::EXPORT, SignatureParts::new(vec![value], n3));
    b.source_file("src/parse.ts", vec![first, second]);
    let schema = resolve(&b.build()).unwrap();

    let module_id = module(&schema, "./src/parse");
    let parse = schema.value(schema.find_value(module_id, "parse").unwrap());
    assert_eq!(parse.value_kind, Some(ValueKind::Function));
    let Some(SchemaType::Intersection { types }) = &parse.ty else {
        panic!("expected overloads");
    };
    assert_eq!(types.len(), 2);
}

#[test]
fn test_implementation_signature_is_hidden_by_overloads() {
    // function parse(text: string): number;
    // function parse(value: number): number;
    // function parse(input: any): number { ... }
    // function lone(flag: boolean): void { ... }
    let mut b = ProgramBuilder::new();
    let parse = b.symbol("parse", symbol_flags::FUNCTION);
    let mut statements = Vec::new();
    for (name, kind, has_body) in [
        ("text", SyntaxKind::StringKeyword, false),
        ("value", SyntaxKind::NumberKeyword, false),
        ("input", SyntaxKind::AnyKeyword, true),
    ] {
        let param_type = b.keyword(kind);
        let param = b.parameter(name, param_type);
        let ret = b.keyword(SyntaxKind::NumberKeyword);
        let mut parts = SignatureParts::new(vec![param], ret);
        if has_body {
            parts = parts.with_body();
        }
        statements.push(b.function_declaration(parse, ModifierFlags::EXPORT, parts));
    }
    let boolean = b.keyword(SyntaxKind::BooleanKeyword);
    let flag = b.parameter("flag", boolean);
    let lone = b.symbol("lone", symbol_flags::FUNCTION);
    statements.push(b.function_declaration(
        lone,
        ModifierFlags::EXPORT,
        SignatureParts::new(vec![flag], NodeIndex::NONE).with_body(),
    ));
    b.source_file("src/parse.ts", statements);
    let schema = resolve(&b.build()).unwrap();

    let module_id = module(&schema, "./src/parse");
    let parse = schema.value(schema.find_value(module_id, "parse").unwrap());
    let Some(SchemaType::Intersection { types }) = &parse.ty else {
        panic!("expected overloads");
    };
    assert_eq!(types.len(), 2);
    let lone = schema.value(schema.find_value(module_id, "lone").unwrap());
    assert!(matches!(lone.ty, Some(SchemaType::Function(_))));
}

#[test]
fn test_method_implementation_is_hidden_by_overloads() {
    let mut b = ProgramBuilder::new();
    let mut members = Vec::new();
    for (kind, has_body) in [
        (SyntaxKind::StringKeyword, false),
        (SyntaxKind::NumberKeyword, false),
        (SyntaxKind::AnyKeyword, true),
    ] {
        let param_type = b.keyword(kind);
        let param = b.parameter("input", param_type);
        let ret = b.keyword(SyntaxKind::StringKeyword);
        let mut parts = SignatureParts::new(vec![param], ret);
        if has_body {
            parts = parts.with_body();
        }
        members.push(b.method_declaration("format", ModifierFlags::empty(), parts, vec![]));
    }
    let formatter = b.symbol("Formatter", symbol_flags::CLASS);
    let decl = exported_class(
        &mut b,
        formatter,
        ClassParts {
            members,
            ..ClassParts::default()
        },
    );
    b.source_file("src/formatter.ts", vec![decl]);
    let schema = resolve(&b.build()).unwrap();

    let formatter = class(&schema, "./src/formatter", "Formatter");
    let SchemaType::Intersection { types } = &formatter.instance_type.member("format").unwrap().ty
    else {
        panic!("expected overloads");
    };
    assert_eq!(types.len(), 2);
}

#[test]
fn test_variables_record_kind_type_and_initializer() {
    let mut b = ProgramBuilder::new();
    let limit = b.symbol("limit", symbol_flags::BLOCK_SCOPED_VARIABLE);
    let n = b.keyword(SyntaxKind::NumberKeyword);
    let ten = b.numeric_literal("10");
    let limit_decl = b.variable_declaration(limit, n, ten);
    let consts = b.variable_statement(ModifierFlags::EXPORT, node_flags::CONST, vec![limit_decl]);
    let counter = b.symbol("counter", symbol_flags::BLOCK_SCOPED_VARIABLE);
    let zero = b.numeric_literal("0");
    let counter_decl = b.variable_declaration(counter, NodeIndex::NONE, zero);
    let lets = b.variable_statement(ModifierFlags::EXPORT, node_flags::LET, vec![counter_decl]);
    let legacy = b.symbol("legacy", symbol_flags::FUNCTION_SCOPED_VARIABLE);
    let legacy_decl = b.variable_declaration(legacy, NodeIndex::NONE, NodeIndex::NONE);
    let vars = b.variable_statement(ModifierFlags::EXPORT, node_flags::NONE, vec![legacy_decl]);
    b.source_file("src/vars.ts", vec![consts, lets, vars]);
    let schema = resolve(&b.build()).unwrap();

    let module_id = module(&schema, "./src/vars");
    let limit = schema.value(schema.find_value(module_id, "limit").unwrap());
    assert_eq!(limit.value_kind, Some(ValueKind::Const));
    assert_eq!(limit.ty, Some(primitive(PrimitiveKind::Number)));
    assert_eq!(limit.initializer, Some(Expression::number(10.0)));

    let counter = schema.value(schema.find_value(module_id, "counter").unwrap());
    assert_eq!(counter.value_kind, Some(ValueKind::Let));
    assert_eq!(counter.ty, Some(primitive(PrimitiveKind::Number)));

    let legacy = schema.value(schema.find_value(module_id, "legacy").unwrap());
    assert_eq!(legacy.value_kind, Some(ValueKind::Var));
    assert_eq!(legacy.ty, Some(SchemaType::any()));
    assert_eq!(legacy.initializer, None);
}

#[test]
fn test_destructuring_is_flattened_into_values() {
    let mut b = ProgramBuilder::new();
    let host = b.symbol("host", symbol_flags::BLOCK_SCOPED_VARIABLE);
    let s = b.keyword(SyntaxKind::StringKeyword);
    let host_element = b.binding_element("host", host, s);
    let port = b.symbol("port", symbol_flags::BLOCK_SCOPED_VARIABLE);
    let n = b.keyword(SyntaxKind::NumberKeyword);
    let port_element = b.binding_element("port", port, n);
    let pattern = b.object_binding_pattern(vec![host_element, port_element]);
    let source = b.opaque_expr(SyntaxKind::CallExpression, "load()");
    let decl = b.destructuring_declaration(pattern, NodeIndex::NONE, source);
    let statement = b.variable_statement(ModifierFlags::EXPORT, node_flags::CONST, vec![decl]);
    b.source_file("src/env.ts", vec![statement]);
    let schema = resolve(&b.build()).unwrap();

    let module_id = module(&schema, "./src/env");
    let host = schema.value(schema.find_value(module_id, "host").unwrap());
    assert_eq!(host.value_kind, Some(ValueKind::Const));
    assert_eq!(host.ty, Some(primitive(PrimitiveKind::String)));
    let port = schema.value(schema.find_value(module_id, "port").unwrap());
    assert_eq!(port.ty, Some(primitive(PrimitiveKind::Number)));
}

#[test]
fn test_merge_composite_keeps_existing_members() {
    let mut into = CompositeType::default();
    into.members.insert(
        "name".to_string(),
        Member::new(primitive(PrimitiveKind::String)),
    );
    let mut from = CompositeType::default();
    from.members.insert(
        "name".to_string(),
        Member::new(primitive(PrimitiveKind::Number)),
    );
    from.members.insert(
        "size".to_string(),
        Member::new(primitive(PrimitiveKind::Number)),
    );

    merge_composite(&mut into, from);

    assert_eq!(into.member("name").unwrap().ty, primitive(PrimitiveKind::String));
    assert!(into.member("size").is_some());
}
