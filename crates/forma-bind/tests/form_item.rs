//! Fields registered through `FormItem` driving a whole form.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Map, json};

use forma_bind::{FieldOptions, FormItem, REQUIRED_MESSAGE, Rule};
use forma_core::{FieldPath, FormService, SubmitOutcome, Value};

fn path(input: &str) -> FieldPath {
    FieldPath::parse(input).unwrap()
}

#[test]
fn new_field_starts_from_initial_value_then_default() {
    let mut service = FormService::builder()
        .initial_values(json!({"user": {"name": "Ann"}}))
        .build();

    let name = FormItem::register(
        &mut service,
        FieldOptions::new(path("user.name")).with_default_value(json!("anon")),
    );
    let city = FormItem::register(
        &mut service,
        FieldOptions::new(path("user.city")).with_default_value(json!("Oslo")),
    );

    assert_eq!(name.value(), json!("Ann"));
    assert_eq!(city.value(), json!("Oslo"));
    assert_eq!(service.get_item_value(&path("user.city")).unwrap(), json!("Oslo"));
}

#[test]
fn re_registering_keeps_value_and_errors() {
    let mut service = FormService::default();
    let first = FormItem::register(
        &mut service,
        FieldOptions::new(path("email")).with_rule(Rule::required()),
    );
    first.on_change(&mut service, json!("")).unwrap();
    assert!(!first.on_blur());

    let second = FormItem::register(
        &mut service,
        FieldOptions::new(path("email")).with_rule(Rule::required_with("email please")),
    );

    assert_eq!(second.value(), json!(""));
    assert_eq!(second.errors(), vec![REQUIRED_MESSAGE]);
    assert_eq!(service.registered_paths(), &[path("email")]);

    assert!(!second.on_blur());
    assert_eq!(service.get_item_errors(&path("email")).unwrap(), vec!["email please"]);
}

#[test]
fn handles_of_one_field_share_its_state() {
    let mut service = FormService::default();
    let first = FormItem::register(
        &mut service,
        FieldOptions::new(path("email")).with_rule(Rule::required()),
    );
    let second = FormItem::register(
        &mut service,
        FieldOptions::new(path("email")).with_rule(Rule::required_with("email please")),
    );

    first.on_change(&mut service, json!("typed")).unwrap();
    assert_eq!(second.value(), json!("typed"));
    assert_eq!(service.get_item_value(&path("email")).unwrap(), json!("typed"));
    assert_eq!(
        service.submit(None).unwrap().values(),
        Some(&json!({"email": "typed"}))
    );

    second.on_change(&mut service, json!("")).unwrap();
    assert!(!first.on_blur());
    assert_eq!(first.errors(), vec!["email please"]);

    first.unregister(&mut service);
    assert_eq!(service.registered_paths(), &[path("email")]);
    second.on_change(&mut service, json!("kept")).unwrap();
    assert_eq!(service.get_item_value(&path("email")).unwrap(), json!("kept"));

    second.unregister(&mut service);
    assert!(service.registered_paths().is_empty());
}

#[test]
fn on_change_notifies_subscribers() {
    let mut service = FormService::default();
    let country = FormItem::register(&mut service, FieldOptions::new(path("country")));
    let region = FormItem::register(&mut service, FieldOptions::new(path("region")));

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    service.subscribe(path("country"), move |value: &Value| {
        sink.borrow_mut().push(value.clone());
        Ok(())
    });

    country.on_change(&mut service, json!("NO")).unwrap();

    assert_eq!(*seen.borrow(), vec![json!("NO")]);
    assert_eq!(service.get_item_value(&path("country")).unwrap(), json!("NO"));
    assert_eq!(region.value(), Value::Null);
}

#[test]
fn submit_and_reset_through_bound_fields() {
    let submitted = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&submitted);
    let mut service = FormService::builder()
        .on_submit(move |values| *sink.borrow_mut() = Some(values.clone()))
        .build();

    let name = FormItem::register(
        &mut service,
        FieldOptions::new(path("user.name")).with_rule(Rule::required()),
    );
    let age = FormItem::register(
        &mut service,
        FieldOptions::new(path("user.age"))
            .with_default_value(json!(18))
            .with_validate(|value| match value.as_i64() {
                Some(age) if age >= 18 => Vec::new(),
                _ => vec!["too young".to_string()],
            }),
    );

    age.on_change(&mut service, json!(12)).unwrap();
    assert_eq!(service.submit(None).unwrap(), SubmitOutcome::Rejected);
    assert_eq!(name.errors(), vec![REQUIRED_MESSAGE]);
    assert_eq!(age.errors(), vec!["too young"]);
    assert!(submitted.borrow().is_none());

    service.reset(None).unwrap();
    assert_eq!(age.value(), json!(18));
    assert!(name.errors().is_empty());
    assert!(age.errors().is_empty());

    name.on_change(&mut service, json!("Ann")).unwrap();
    assert!(service.submit(None).unwrap().is_submitted());
    assert_eq!(
        *submitted.borrow(),
        Some(json!({"user": {"name": "Ann", "age": 18}}))
    );
}

#[test]
fn props_apply_value_prop_name_and_error_formatter() {
    let mut service = FormService::default();
    let terms = FormItem::register(
        &mut service,
        FieldOptions::new(path("terms"))
            .with_default_value(json!(false))
            .with_value_prop_name("checked")
            .with_validate(|value| {
                if value == &json!(true) {
                    Vec::new()
                } else {
                    vec!["accept the terms".to_string()]
                }
            })
            .with_error_props(|errors| {
                let mut props = Map::new();
                props.insert("invalid".to_string(), json!(!errors.is_empty()));
                props.insert("helper".to_string(), json!(errors.join(", ")));
                props
            }),
    );

    assert!(!terms.on_blur());
    assert_eq!(
        Value::Object(terms.props().to_map()),
        json!({"checked": false, "invalid": true, "helper": "accept the terms"})
    );
}

#[test]
fn unregister_removes_field_and_instance() {
    let mut service = FormService::default();
    let field = FormItem::register(&mut service, FieldOptions::new(path("notes[0]")));
    field.set_instance(&service, Rc::new(42_u32));
    assert!(service.item_instance(&path("notes[0]")).is_some());

    field.unregister(&mut service);
    assert!(service.registered_paths().is_empty());
    assert!(service.item_instance(&path("notes[0]")).is_none());
}
