//! Loading form definitions and driving them through the service.

use std::io::Write;
use std::path::Path;

use forma_cli::{DefinitionError, FormDefinition, load_values};
use forma_core::{FieldBinding, InitialValuePolicy};
use forma_model::FieldPath;
use serde_json::json;

const SIGNUP: &str = r#"
name = "signup"

[initial_values.user]
name = "Ann"

[[fields]]
path = "user.name"
default = ""
rules = [{ kind = "required" }]

[[fields]]
path = "user.email"
default = ""
rules = [
    { kind = "required", message = "Email is required" },
    { kind = "pattern", pattern = "^[^@]+@[^@]+$", message = "Not an email" },
]

[[fields]]
path = "terms"
default = false
value_prop_name = "checked"
"#;

fn signup() -> FormDefinition {
    FormDefinition::from_toml_str(SIGNUP, Path::new("signup.toml")).unwrap()
}

fn path(input: &str) -> FieldPath {
    FieldPath::parse(input).unwrap()
}

#[test]
fn parses_fields_in_file_order() {
    let definition = signup();
    assert_eq!(definition.display_name(), "signup");
    assert_eq!(
        definition.config.initial_value_policy,
        InitialValuePolicy::TruthyFallback
    );
    let paths: Vec<String> = definition
        .fields
        .iter()
        .map(|field| field.path.to_string())
        .collect();
    assert_eq!(paths, ["user.name", "user.email", "terms"]);
    assert_eq!(definition.fields[1].rules.len(), 2);
    assert_eq!(definition.fields[2].value_prop_name, "checked");
    assert_eq!(definition.fields[0].value_prop_name, "value");
}

#[test]
fn build_seeds_initial_values_and_defaults() {
    let form = signup().build().unwrap();
    assert_eq!(form.items.len(), 3);
    assert_eq!(
        form.service.get_item_value(&path("user.name")).unwrap(),
        json!("Ann")
    );
    assert_eq!(
        form.service.get_item_value(&path("user.email")).unwrap(),
        json!("")
    );
    assert_eq!(form.items[2].props().to_map()["checked"], json!(false));
}

#[test]
fn submit_rejects_until_values_are_valid() {
    let mut form = signup().build().unwrap();

    let applied = form
        .apply_values(&json!({"user": {"email": "not-an-email"}}))
        .unwrap();
    assert_eq!(applied, 1);
    assert!(!form.service.submit(None).unwrap().is_submitted());
    let errors: serde_json::Map<String, serde_json::Value> = form
        .service
        .errors_by_path()
        .unwrap()
        .into_iter()
        .map(|(path, messages)| (path.to_string(), json!(messages)))
        .collect();
    insta::assert_json_snapshot!(errors, @r#"
    {
      "user.email": [
        "Not an email"
      ]
    }
    "#);

    form.apply_values(&json!({"user": {"email": "ann@example.com"}, "terms": true}))
        .unwrap();
    let outcome = form.service.submit(None).unwrap();
    assert_eq!(
        outcome.values(),
        Some(&json!({
            "terms": true,
            "user": {"email": "ann@example.com", "name": "Ann"},
        }))
    );
    assert!(form.service.errors_by_path().unwrap().is_empty());
}

#[test]
fn reset_restores_initial_values() {
    let mut form = signup().build().unwrap();
    form.apply_values(&json!({"user": {"name": "Bob", "email": "b@x.io"}}))
        .unwrap();
    form.service.reset(None).unwrap();

    let binding = form.service.store().binding(&path("user.name")).unwrap();
    assert_eq!(binding.value(), json!("Ann"));
    assert_eq!(
        form.service.get_item_value(&path("user.email")).unwrap(),
        json!("")
    );
}

#[test]
fn duplicate_fields_are_rejected() {
    let input = r#"
[[fields]]
path = "a"

[[fields]]
path = "a"
"#;
    let definition = FormDefinition::from_toml_str(input, Path::new("dup.toml")).unwrap();
    let error = definition.build().unwrap_err();
    assert!(matches!(
        error,
        DefinitionError::DuplicateField { ref path } if path.to_string() == "a"
    ));
    assert_eq!(error.to_string(), "field a is defined more than once");
}

#[test]
fn invalid_patterns_name_the_field() {
    let input = r#"
[[fields]]
path = "code"
rules = [{ kind = "pattern", pattern = "(" }]
"#;
    let definition = FormDefinition::from_toml_str(input, Path::new("bad.toml")).unwrap();
    let error = definition.build().unwrap_err();
    assert!(matches!(error, DefinitionError::Rule { .. }));
    assert!(error.to_string().starts_with("invalid rule on field code"));
}

#[test]
fn malformed_toml_reports_origin() {
    let error =
        FormDefinition::from_toml_str("fields = 3", Path::new("broken.toml")).unwrap_err();
    assert!(matches!(error, DefinitionError::Toml { .. }));
    assert!(error.to_string().contains("broken.toml"));
}

#[test]
fn strict_policy_from_definition() {
    let input = r#"
initial_value_policy = "strict-absence"

[initial_values]
count = 0

[[fields]]
path = "count"
default = 5
"#;
    let form = FormDefinition::from_toml_str(input, Path::new("strict.toml"))
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(
        form.service.get_item_value(&path("count")).unwrap(),
        json!(0)
    );
}

#[test]
fn loads_definition_and_values_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let form_path = dir.path().join("signup.toml");
    std::fs::write(&form_path, SIGNUP).unwrap();
    let values_path = dir.path().join("values.json");
    let mut file = std::fs::File::create(&values_path).unwrap();
    writeln!(file, r#"{{"user": {{"email": "ann@example.com"}}}}"#).unwrap();

    let definition = FormDefinition::load(&form_path).unwrap();
    let values = load_values(&values_path).unwrap();
    let mut form = definition.build().unwrap();
    assert_eq!(form.apply_values(&values).unwrap(), 1);
    assert!(form.service.submit(None).unwrap().is_submitted());

    let missing = load_values(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(missing, DefinitionError::Io { .. }));
}
