use super::*;
use std::io::Write;

fn write_config(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("tsschema.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn test_load_full_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"{
            "rootDir": "/pkg",
            "relativePrefix": "my-pkg",
            "libFileName": "lib.es2020.d.ts",
            "includeModules": ["my-pkg/src"]
        }"#,
    );

    let config = load_schema_config(&path).unwrap();
    assert_eq!(config.root_dir.as_deref(), Some("/pkg"));
    assert_eq!(include_modules(&config), ["my-pkg/src".to_string()]);

    let options = resolve_options(&config, path.parent());
    assert_eq!(options.root_dir, "/pkg");
    assert_eq!(options.lib_file_name, "lib.es2020.d.ts");
    assert_eq!(options.module_name_for("/pkg/src/a.ts"), "my-pkg/src/a");
}

#[test]
fn test_empty_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "{}");

    let config = load_schema_config(&path).unwrap();
    let options = resolve_options(&config, None);
    assert_eq!(options.root_dir, ".");
    assert_eq!(options.lib_file_name, "lib.d.ts");
    assert!(options.relative_prefix.is_none());
    assert!(include_modules(&config).is_empty());
}

#[test]
fn test_relative_root_is_anchored_at_base_dir() {
    let config = SchemaConfig {
        root_dir: Some("packages/core".to_string()),
        ..SchemaConfig::default()
    };

    let options = resolve_options(&config, Some(std::path::Path::new("/repo")));
    assert_eq!(options.root_dir, "/repo/packages/core");
    assert_eq!(resolve_options(&config, None).root_dir, "packages/core");
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let err = load_schema_config(&path).unwrap_err();
    assert!(format!("{err:#}").contains("failed to read schema config"));
    assert!(format!("{err:#}").contains("absent.json"));
}

#[test]
fn test_malformed_json_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, r#"{ "rootDir": 42 }"#);

    let err = load_schema_config(&path).unwrap_err();
    assert!(format!("{err:#}").contains("failed to parse schema config"));
}

#[test]
fn test_empty_lib_file_name_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, r#"{ "libFileName": "" }"#);

    let err = load_schema_config(&path).unwrap_err();
    assert!(format!("{err:#}").contains("libFileName must not be empty"));
}
