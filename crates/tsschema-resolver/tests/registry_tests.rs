use super::*;

#[test]
fn test_type_parameter_names_are_recorded_only_on_creation() {
    let mut registry = ContainerRegistry::new();
    let module = registry.get_or_create_module("./box");
    let (id, created) = registry.get_or_create_constructor(
        module,
        ConstructorKind::Interface,
        "Box",
        vec!["T".to_string()],
    );
    assert!(created);

    let (again, created_again) =
        registry.get_or_create_constructor(module, ConstructorKind::Interface, "Box", Vec::new());
    assert!(!created_again);
    assert_eq!(again, id);
    let names: Vec<&str> = registry
        .schema()
        .constructor(id)
        .type_parameters
        .iter()
        .map(|tp| tp.name.as_str())
        .collect();
    assert_eq!(names, vec!["T"]);
}

#[test]
fn test_add_entry_skips_entries_already_in_place() {
    let mut registry = ContainerRegistry::new();
    let module = registry.get_or_create_module("./shapes");
    let other = registry.get_or_create_module("./index");
    let (circle, _) =
        registry.get_or_create_constructor(module, ConstructorKind::Class, "Circle", Vec::new());

    registry.add_entry(module, "Circle", Reference::Constructor(circle));
    assert!(registry.schema().container(module).reexports.is_empty());

    registry.add_entry(module, "Round", Reference::Constructor(circle));
    registry.add_entry(other, "Circle", Reference::Constructor(circle));
    assert_eq!(
        registry.schema().container(module).reexports.get("Round"),
        Some(&Reference::Constructor(circle))
    );
    assert_eq!(
        registry.schema().container(other).reexports.get("Circle"),
        Some(&Reference::Constructor(circle))
    );
}

#[test]
fn test_namespaces_are_reused_per_parent() {
    let mut registry = ContainerRegistry::new();
    let module = registry.get_or_create_module("./geo");
    let first = registry.get_or_create_namespace(module, "Shapes");
    let second = registry.get_or_create_namespace(module, "Shapes");
    assert_eq!(first, second);
    assert_eq!(registry.schema().container(first).parent, Some(module));
}
