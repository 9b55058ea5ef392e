use super::*;
use tsschema_common::ResolverOptions;
use tsschema_common::limits::MAX_EXPRESSION_DEPTH;
use tsschema_frontend::{
    ClassParts, ModifierFlags, Program, ProgramBuilder, PropertySpec, SignatureParts, SymbolId,
    node_flags,
};
use tsschema_model::{PrimitiveKind, SchemaType};

fn evaluate(program: &Program, node: NodeIndex) -> Result<Expression> {
    let options = ResolverOptions::default();
    let mut state = ResolverState::new(program, &options);
    state.expression(node, &TypeScope::new())
}

/// `export enum Color { Red, Green }` in `src/color.ts`.
fn color_enum(b: &mut ProgramBuilder) -> (SymbolId, SymbolId, NodeIndex) {
    let red = b.symbol("Red", symbol_flags::ENUM_MEMBER);
    let red_decl = b.enum_member("Red", red, NodeIndex::NONE);
    let green = b.symbol("Green", symbol_flags::ENUM_MEMBER);
    let green_decl = b.enum_member("Green", green, NodeIndex::NONE);
    let color = b.symbol("Color", symbol_flags::REGULAR_ENUM);
    let decl = b.enum_declaration(color, ModifierFlags::EXPORT, vec![red_decl, green_decl]);
    (color, red, decl)
}

#[test]
fn test_primitive_literals() {
    let mut b = ProgramBuilder::new();
    let text = b.string_literal("hello");
    let number = b.numeric_literal("2.5");
    let yes = b.boolean_literal(true);
    let no = b.boolean_literal(false);
    let program = b.build();

    assert_eq!(evaluate(&program, text).unwrap(), Expression::string("hello"));
    assert_eq!(evaluate(&program, number).unwrap(), Expression::number(2.5));
    assert_eq!(evaluate(&program, yes).unwrap(), Expression::boolean(true));
    assert_eq!(evaluate(&program, no).unwrap(), Expression::boolean(false));
}

#[test]
fn test_numeric_literal_forms() {
    assert_eq!(parse_numeric_literal("0x10"), Some(16.0));
    assert_eq!(parse_numeric_literal("0B101"), Some(5.0));
    assert_eq!(parse_numeric_literal("0o17"), Some(15.0));
    assert_eq!(parse_numeric_literal("1_000"), Some(1000.0));
    assert_eq!(parse_numeric_literal("1.5e3"), Some(1500.0));
    assert_eq!(parse_numeric_literal("0xZZ"), None);

    let mut b = ProgramBuilder::new();
    let hex = b.numeric_literal("0xFF");
    let program = b.build();
    assert_eq!(evaluate(&program, hex).unwrap(), Expression::number(255.0));
}

#[test]
fn test_unsupported_shapes_degrade_to_opaque() {
    let mut b = ProgramBuilder::new();
    let sum = b.opaque_expr(SyntaxKind::BinaryExpression, "1 + 2");
    let unbound = b.identifier("nowhere");
    let callee = b.identifier("Date");
    let construction = b.new_expr(callee, vec![]);
    let program = b.build();

    assert!(evaluate(&program, sum).unwrap().is_opaque());
    assert!(evaluate(&program, unbound).unwrap().is_opaque());
    assert!(evaluate(&program, construction).unwrap().is_opaque());
    assert!(evaluate(&program, NodeIndex::NONE).unwrap().is_opaque());
}

#[test]
fn test_names_resolve_to_values_and_classes() {
    let mut b = ProgramBuilder::new();
    let limit = b.symbol("limit", symbol_flags::BLOCK_SCOPED_VARIABLE);
    let ten = b.numeric_literal("10");
    let limit_decl = b.variable_declaration(limit, NodeIndex::NONE, ten);
    let statement = b.variable_statement(ModifierFlags::EXPORT, node_flags::CONST, vec![limit_decl]);
    let point = b.symbol("Point", symbol_flags::CLASS);
    let class = b.class_declaration(point, ModifierFlags::EXPORT, ClassParts::default());
    b.source_file("src/values.ts", vec![statement, class]);
    let limit_ref = b.identifier_expr("limit", limit);
    let point_ref = b.identifier_expr("Point", point);
    let program = b.build();
    let options = ResolverOptions::default();
    let mut state = ResolverState::new(&program, &options);
    let scope = TypeScope::new();

    let value = state.expression(limit_ref, &scope).unwrap();
    let class = state.expression(point_ref, &scope).unwrap();

    let module = state.schema().module("./src/values").unwrap();
    assert_eq!(
        value,
        Expression::Value {
            id: state.schema().find_value(module, "limit").unwrap()
        }
    );
    let Expression::ClassReference { id } = class else {
        panic!("expected a class reference, got {class:?}");
    };
    assert_eq!(state.schema().constructor(id).name, "Point");
}

#[test]
fn test_enum_member_access() {
    let mut b = ProgramBuilder::new();
    let (color, red, decl) = color_enum(&mut b);
    b.source_file("src/color.ts", vec![decl]);
    let target = b.identifier_expr("Color", color);
    let access = b.property_access(target, "Red", red);
    let program = b.build();
    let options = ResolverOptions::default();
    let mut state = ResolverState::new(&program, &options);

    let expression = state.expression(access, &TypeScope::new()).unwrap();

    let module = state.schema().module("./src/color").unwrap();
    assert_eq!(
        expression,
        Expression::EnumMember {
            id: state.schema().find_enum(module, "Color").unwrap(),
            member: "Red".to_string(),
        }
    );
}

#[test]
fn test_calls_objects_and_arrays_nest() {
    let mut b = ProgramBuilder::new();
    let make = b.symbol("make", symbol_flags::FUNCTION);
    let make_decl = b.function_declaration(make, ModifierFlags::EXPORT, SignatureParts::default());
    b.source_file("src/make.ts", vec![make_decl]);
    let one = b.numeric_literal("1");
    let two = b.numeric_literal("2");
    let list = b.array_literal(vec![one, two]);
    let label = b.string_literal("box");
    let name = b.property_assignment("name", label);
    let sizes = b.property_assignment("sizes", list);
    let config = b.object_literal(vec![name, sizes]);
    let callee = b.identifier_expr("make", make);
    let call = b.call(callee, vec![config]);
    let program = b.build();
    let options = ResolverOptions::default();
    let mut state = ResolverState::new(&program, &options);

    let expression = state.expression(call, &TypeScope::new()).unwrap();

    let Expression::Call {
        function,
        arguments,
    } = expression
    else {
        panic!("expected a call");
    };
    assert!(matches!(*function, Expression::Value { .. }));
    let [Expression::Object { properties }] = arguments.as_slice() else {
        panic!("expected one object argument");
    };
    assert_eq!(properties["name"], Expression::string("box"));
    assert_eq!(
        properties["sizes"],
        Expression::Array {
            elements: vec![Expression::number(1.0), Expression::number(2.0)]
        }
    );
}

#[test]
fn test_inline_functions_and_classes() {
    let mut b = ProgramBuilder::new();
    let s = b.keyword(SyntaxKind::StringKeyword);
    let param = b.parameter("value", s);
    let ret = b.keyword(SyntaxKind::BooleanKeyword);
    let arrow = b.arrow_function(SignatureParts::new(vec![param], ret));
    let n = b.keyword(SyntaxKind::NumberKeyword);
    let field = b.property_declaration(PropertySpec::new("count", n));
    let n2 = b.keyword(SyntaxKind::NumberKeyword);
    let mut shared = PropertySpec::new("instances", n2);
    shared.modifiers = ModifierFlags::STATIC;
    let shared = b.property_declaration(shared);
    let class = b.class_expression(ClassParts {
        members: vec![field, shared],
        ..ClassParts::default()
    });
    let program = b.build();

    let Expression::Function(signature) = evaluate(&program, arrow).unwrap() else {
        panic!("expected a function expression");
    };
    assert_eq!(signature.parameters[0].name, "value");
    assert_eq!(
        signature.return_type,
        SchemaType::primitive(PrimitiveKind::Boolean)
    );

    let Expression::Class(class) = evaluate(&program, class).unwrap() else {
        panic!("expected a class expression");
    };
    assert!(class.instance_type.member("count").is_some());
    assert!(class.static_type.member("instances").is_some());
    assert!(class.instance_type.member("instances").is_none());
}

#[test]
fn test_deep_nesting_falls_back_to_opaque() {
    let mut b = ProgramBuilder::new();
    let mut node = b.numeric_literal("1");
    for _ in 0..MAX_EXPRESSION_DEPTH + 5 {
        node = b.parenthesized_expr(node);
    }
    let program = b.build();

    assert!(evaluate(&program, node).unwrap().is_opaque());
}

#[test]
fn test_decorator_call_with_enum_argument() {
    let mut b = ProgramBuilder::new();
    let (color, red, color_decl) = color_enum(&mut b);
    let tag = b.symbol("Tag", symbol_flags::FUNCTION);
    let tag_decl = b.function_declaration(tag, ModifierFlags::EXPORT, SignatureParts::default());
    b.source_file("src/tags.ts", vec![color_decl, tag_decl]);
    let callee = b.identifier_expr("Tag", tag);
    let target = b.identifier_expr("Color", color);
    let argument = b.property_access(target, "Red", red);
    let call = b.call(callee, vec![argument]);
    let decorator = b.decorator(call);
    let program = b.build();
    let options = ResolverOptions::default();
    let mut state = ResolverState::new(&program, &options);

    let decorators = state.decorators(&[decorator], &TypeScope::new()).unwrap();

    let module = state.schema().module("./src/tags").unwrap();
    let tag_id = state.schema().find_value(module, "Tag").unwrap();
    let color_id = state.schema().find_enum(module, "Color").unwrap();
    assert_eq!(
        decorators,
        vec![Decorator {
            target: DecoratorTarget::Value { id: tag_id },
            arguments: Some(vec![Expression::EnumMember {
                id: color_id,
                member: "Red".to_string(),
            }]),
        }]
    );
}

#[test]
fn test_class_decorator_targets_the_class() {
    let mut b = ProgramBuilder::new();
    let entity = b.symbol("Entity", symbol_flags::CLASS);
    let class = b.class_declaration(entity, ModifierFlags::EXPORT, ClassParts::default());
    b.source_file("src/entity.ts", vec![class]);
    let callee = b.identifier_expr("Entity", entity);
    let decorator = b.decorator(callee);
    let program = b.build();
    let options = ResolverOptions::default();
    let mut state = ResolverState::new(&program, &options);

    let decorators = state.decorators(&[decorator], &TypeScope::new()).unwrap();
    let DecoratorTarget::Class { id } = decorators[0].target else {
        panic!("expected a class target");
    };
    assert_eq!(state.schema().constructor(id).name, "Entity");
    assert_eq!(decorators[0].arguments, None);
}

#[test]
fn test_unresolved_decorator_is_fatal() {
    let mut b = ProgramBuilder::new();
    let callee = b.identifier("missing");
    let decorator = b.decorator(callee);
    let program = b.build();
    let options = ResolverOptions::default();
    let mut state = ResolverState::new(&program, &options);

    assert_eq!(
        state.decorators(&[decorator], &TypeScope::new()),
        Err(SchemaError::DecoratorNotResolved {
            text: "missing".to_string()
        })
    );
}
