use super::*;
use tsschema_common::ResolverOptions;
use tsschema_frontend::{ClassParts, Program, ProgramBuilder, SignatureParts};
use tsschema_model::{ConstructorKind, Schema};

fn resolve(program: &Program) -> Schema {
    crate::resolve_program(program, &ResolverOptions::default()).unwrap()
}

/// `export class <name> {}`.
fn exported_class(b: &mut ProgramBuilder, name: &str) -> (SymbolId, NodeIndex) {
    let symbol = b.symbol(name, symbol_flags::CLASS);
    let class = b.class_declaration(symbol, ModifierFlags::EXPORT, ClassParts::default());
    (symbol, class)
}

fn class_reference(schema: &Schema, module: &str, name: &str) -> Reference {
    let container = schema.module(module).unwrap();
    Reference::Constructor(
        schema
            .find_constructor(container, ConstructorKind::Class, name)
            .unwrap(),
    )
}

fn reexport(schema: &Schema, module: &str, name: &str) -> Option<Reference> {
    let container = schema.module(module)?;
    schema.container(container).reexports.get(name).copied()
}

// =============================================================================
// Exports
// =============================================================================

#[test]
fn test_export_specifiers_become_reexports() {
    let mut b = ProgramBuilder::new();
    let (circle, class) = exported_class(&mut b, "Circle");
    b.source_file("src/circle.ts", vec![class]);
    let from = b.module_specifier("./circle", "src/circle.ts");
    let same = b.export_specifier("Circle", None, circle);
    let renamed = b.export_specifier("Round", Some("Circle"), circle);
    let export = b.export_declaration(Some(vec![same, renamed]), from);
    b.source_file("src/index.ts", vec![export]);
    let schema = resolve(&b.build());

    let circle = class_reference(&schema, "./src/circle", "Circle");
    assert_eq!(reexport(&schema, "./src/index", "Circle"), Some(circle));
    assert_eq!(reexport(&schema, "./src/index", "Round"), Some(circle));
    // The declaration stays in its own module.
    let index = schema.module("./src/index").unwrap();
    assert!(schema.find_class(index, "Circle").is_none());
}

#[test]
fn test_export_star_reexports_every_export() {
    let mut b = ProgramBuilder::new();
    let (_, circle) = exported_class(&mut b, "Circle");
    let (_, square) = exported_class(&mut b, "Square");
    b.source_file("src/shapes.ts", vec![circle, square]);
    let from = b.module_specifier("./shapes", "src/shapes.ts");
    let export = b.export_declaration(None, from);
    b.source_file("src/index.ts", vec![export]);
    let schema = resolve(&b.build());

    assert_eq!(
        reexport(&schema, "./src/index", "Circle"),
        Some(class_reference(&schema, "./src/shapes", "Circle"))
    );
    assert_eq!(
        reexport(&schema, "./src/index", "Square"),
        Some(class_reference(&schema, "./src/shapes", "Square"))
    );
}

#[test]
fn test_export_default_records_default_entry() {
    let mut b = ProgramBuilder::new();
    let widget = b.symbol("Widget", symbol_flags::CLASS);
    let class = b.class_declaration(widget, ModifierFlags::empty(), ClassParts::default());
    let expression = b.identifier_expr("Widget", widget);
    let export = b.export_assignment(expression, false);
    b.source_file("src/widget.ts", vec![class, export]);
    let schema = resolve(&b.build());

    assert_eq!(
        reexport(&schema, "./src/widget", "default"),
        Some(class_reference(&schema, "./src/widget", "Widget"))
    );
}

#[test]
fn test_export_default_declaration_records_default_entry() {
    let mut b = ProgramBuilder::new();
    let widget = b.symbol("Widget", symbol_flags::CLASS);
    let class = b.class_declaration(
        widget,
        ModifierFlags::EXPORT | ModifierFlags::DEFAULT,
        ClassParts::default(),
    );
    b.source_file("src/widget.ts", vec![class]);
    let from = b.module_specifier("./widget", "src/widget.ts");
    let star = b.export_declaration(None, from);
    b.source_file("src/index.ts", vec![star]);
    let schema = resolve(&b.build());

    let widget = class_reference(&schema, "./src/widget", "Widget");
    assert_eq!(reexport(&schema, "./src/widget", "default"), Some(widget));
    // `export *` does not forward `default`.
    assert_eq!(reexport(&schema, "./src/index", "default"), None);
}

#[test]
fn test_export_equals_namespace_becomes_the_module() {
    let mut b = ProgramBuilder::new();
    let (_, class) = exported_class(&mut b, "Client");
    let ns = b.symbol("Api", symbol_flags::NAMESPACE_MODULE);
    let namespace = b.namespace_declaration(ns, ModifierFlags::DECLARE, vec![class]);
    let expression = b.identifier_expr("Api", ns);
    let export = b.export_assignment(expression, true);
    b.source_file("src/api.ts", vec![namespace, export]);
    let schema = resolve(&b.build());

    let module = schema.module("./src/api").unwrap();
    assert!(schema.find_class(module, "Client").is_some());
    assert!(schema.find_container("./src/api", &["Api"]).is_none());
}

// =============================================================================
// Visibility
// =============================================================================

#[test]
fn test_module_files_skip_unexported_declarations() {
    let mut b = ProgramBuilder::new();
    let (_, public) = exported_class(&mut b, "Public");
    let hidden = b.symbol("Hidden", symbol_flags::INTERFACE);
    let hidden_decl = b.interface_declaration(hidden, ModifierFlags::empty(), vec![], vec![], vec![]);
    b.source_file("src/mixed.ts", vec![public, hidden_decl]);
    let schema = resolve(&b.build());

    let module = schema.module("./src/mixed").unwrap();
    assert!(schema.find_class(module, "Public").is_some());
    assert!(schema.find_interface(module, "Hidden").is_none());
}

#[test]
fn test_referenced_private_declaration_is_still_populated() {
    let mut b = ProgramBuilder::new();
    let s = b.keyword(SyntaxKind::StringKeyword);
    let name = b.property_signature("name", s, false);
    let hidden = b.symbol("Settings", symbol_flags::INTERFACE);
    let hidden_decl =
        b.interface_declaration(hidden, ModifierFlags::empty(), vec![], vec![], vec![name]);
    let settings = b.type_ref("Settings", hidden, vec![]);
    let configure = b.symbol("configure", symbol_flags::FUNCTION);
    let param = b.parameter("settings", settings);
    let function = b.function_declaration(
        configure,
        ModifierFlags::EXPORT,
        SignatureParts::new(vec![param], NodeIndex::NONE),
    );
    b.source_file("src/configure.ts", vec![hidden_decl, function]);
    let schema = resolve(&b.build());

    let module = schema.module("./src/configure").unwrap();
    let settings = schema.find_interface(module, "Settings").unwrap();
    assert!(settings.instance_type.member("name").is_some());
}

#[test]
fn test_script_files_contribute_everything_to_global_module() {
    let mut b = ProgramBuilder::new();
    let point = b.symbol("Point", symbol_flags::INTERFACE);
    let decl = b.interface_declaration(point, ModifierFlags::empty(), vec![], vec![], vec![]);
    let helper = b.symbol("helper", symbol_flags::FUNCTION);
    let function = b.function_declaration(helper, ModifierFlags::empty(), SignatureParts::default());
    b.source_file("src/globals.ts", vec![decl, function]);
    let schema = resolve(&b.build());

    let global = schema.module(GLOBAL_MODULE_NAME).unwrap();
    assert!(schema.find_interface(global, "Point").is_some());
    assert!(schema.find_value(global, "helper").is_some());
    assert!(schema.module("./src/globals").is_none());
}

#[test]
fn test_global_augmentation_lands_in_global_module() {
    let mut b = ProgramBuilder::new();
    let window = b.symbol("Window", symbol_flags::INTERFACE);
    let augmented = b.interface_declaration(window, ModifierFlags::empty(), vec![], vec![], vec![]);
    let global = b.global_augmentation(vec![augmented]);
    let (_, class) = exported_class(&mut b, "Plugin");
    b.source_file("src/plugin.ts", vec![global, class]);
    let schema = resolve(&b.build());

    let global = schema.module(GLOBAL_MODULE_NAME).unwrap();
    assert!(schema.find_interface(global, "Window").is_some());
    let module = schema.module("./src/plugin").unwrap();
    assert!(schema.find_interface(module, "Window").is_none());
}

#[test]
fn test_ambient_module_block_becomes_its_own_module() {
    let mut b = ProgramBuilder::new();
    let read_file = b.symbol("readFile", symbol_flags::FUNCTION);
    let function =
        b.function_declaration(read_file, ModifierFlags::empty(), SignatureParts::default());
    let stats = b.symbol("Stats", symbol_flags::INTERFACE);
    let interface = b.interface_declaration(stats, ModifierFlags::empty(), vec![], vec![], vec![]);
    let fs = b.symbol("\"fs\"", symbol_flags::VALUE_MODULE);
    let module = b.ambient_module_declaration(fs, ModifierFlags::DECLARE, vec![function, interface]);
    b.source_file("typings/node.d.ts", vec![module]);
    let schema = resolve(&b.build());

    let fs = schema.module("fs").unwrap();
    assert!(schema.find_value(fs, "readFile").is_some());
    assert!(schema.find_interface(fs, "Stats").is_some());
}

#[test]
fn test_namespaces_nest_and_reopen() {
    let mut b = ProgramBuilder::new();
    let (_, first) = exported_class(&mut b, "First");
    let geometry = b.symbol("Geometry", symbol_flags::NAMESPACE_MODULE);
    let opened = b.namespace_declaration(geometry, ModifierFlags::EXPORT, vec![first]);
    let (_, second) = exported_class(&mut b, "Second");
    let reopened = b.namespace_declaration(geometry, ModifierFlags::EXPORT, vec![second]);
    b.source_file("src/geometry.ts", vec![opened, reopened]);
    let schema = resolve(&b.build());

    let container = schema.find_container("./src/geometry", &["Geometry"]).unwrap();
    assert!(schema.find_class(container, "First").is_some());
    assert!(schema.find_class(container, "Second").is_some());
}
