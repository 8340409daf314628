//! Test doubles for field bindings.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use forma_core::{FieldBinding, FieldPath, FormService, Value};

pub type Journal = Rc<RefCell<Vec<String>>>;
type Check = Box<dyn Fn(&Value) -> Vec<String>>;

/// Binding that keeps its state in cells and counts every push.
pub struct SpyField {
    name: String,
    value: RefCell<Value>,
    errors: RefCell<Vec<String>>,
    check: Check,
    journal: Journal,
    pub value_pushes: Cell<usize>,
    pub error_pushes: Cell<usize>,
    pub validations: Cell<usize>,
}

impl SpyField {
    pub fn new(name: &str, value: Value, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            value: RefCell::new(value),
            errors: RefCell::new(Vec::new()),
            check: Box::new(|_| Vec::new()),
            journal: Rc::clone(journal),
            value_pushes: Cell::new(0),
            error_pushes: Cell::new(0),
            validations: Cell::new(0),
        }
    }

    /// Fails with "required" on null or empty strings.
    pub fn required(mut self) -> Self {
        self.check = Box::new(|value| match value {
            Value::Null => vec!["required".to_string()],
            Value::String(text) if text.is_empty() => vec!["required".to_string()],
            _ => Vec::new(),
        });
        self
    }

    /// Seed errors without counting a push.
    pub fn with_errors(self, errors: &[&str]) -> Self {
        *self.errors.borrow_mut() = errors.iter().map(|e| e.to_string()).collect();
        self
    }

    fn log(&self, event: &str) {
        self.journal
            .borrow_mut()
            .push(format!("{event}:{}", self.name));
    }
}

impl FieldBinding for SpyField {
    fn value(&self) -> Value {
        self.value.borrow().clone()
    }

    fn set_value(&self, value: Value) {
        self.log("set_value");
        self.value_pushes.set(self.value_pushes.get() + 1);
        *self.value.borrow_mut() = value;
    }

    fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }

    fn set_errors(&self, errors: Vec<String>) {
        self.log("set_errors");
        self.error_pushes.set(self.error_pushes.get() + 1);
        *self.errors.borrow_mut() = errors;
    }

    fn validate(&self, value: &Value) -> bool {
        self.log("validate");
        self.validations.set(self.validations.get() + 1);
        let errors = (self.check)(value);
        let valid = errors.is_empty();
        self.set_errors(errors);
        valid
    }
}

pub fn path(input: &str) -> FieldPath {
    FieldPath::parse(input).expect("valid test path")
}

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

/// Register `field` at `input` and attach it as the binding.
pub fn register(service: &mut FormService, input: &str, field: SpyField) -> Rc<SpyField> {
    register_with_default(service, input, field, None)
}

pub fn register_with_default(
    service: &mut FormService,
    input: &str,
    field: SpyField,
    default_value: Option<Value>,
) -> Rc<SpyField> {
    let field = Rc::new(field);
    let item = service.create_or_get_item_ref(&path(input));
    let mut record = item.borrow_mut();
    record.attach(field.clone());
    record.set_default_value(default_value);
    field
}
