use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use forma_core::FieldBinding;
use forma_model::{FieldPath, Value};

use crate::rules::{Rule, run_rules};

/// Custom validation: value in, ordered error messages out.
pub type ValidateFn = Rc<dyn Fn(&Value) -> Vec<String>>;

/// Live state of one field: the value and errors the store reads and pushes.
pub struct FieldState {
    path: FieldPath,
    value: RefCell<Value>,
    errors: RefCell<Vec<String>>,
    rules: RefCell<Vec<Rule>>,
    validate: RefCell<Option<ValidateFn>>,
    value_pushes: Cell<usize>,
    error_pushes: Cell<usize>,
}

impl FieldState {
    pub fn new(path: FieldPath, value: Value) -> Self {
        Self {
            path,
            value: RefCell::new(value),
            errors: RefCell::new(Vec::new()),
            rules: RefCell::new(Vec::new()),
            validate: RefCell::new(None),
            value_pushes: Cell::new(0),
            error_pushes: Cell::new(0),
        }
    }

    #[must_use]
    pub fn with_rules(self, rules: Vec<Rule>) -> Self {
        *self.rules.borrow_mut() = rules;
        self
    }

    #[must_use]
    pub fn with_validate(self, validate: Option<ValidateFn>) -> Self {
        *self.validate.borrow_mut() = validate;
        self
    }

    /// Seed errors carried over from an earlier binding of the same field.
    #[must_use]
    pub fn with_errors(self, errors: Vec<String>) -> Self {
        *self.errors.borrow_mut() = errors;
        self
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn rule_count(&self) -> usize {
        self.rules.borrow().len()
    }

    /// Swap in the rules and validator of a newer registration. Value and
    /// errors stay as they are.
    pub fn replace_checks(&self, rules: Vec<Rule>, validate: Option<ValidateFn>) {
        *self.rules.borrow_mut() = rules;
        *self.validate.borrow_mut() = validate;
    }

    /// Errors produced by the rules and the custom validator, without
    /// pushing them anywhere.
    pub fn check(&self, value: &Value) -> Vec<String> {
        let rules = self.rules.borrow().clone();
        let mut errors = run_rules(&rules, value);
        let validate = self.validate.borrow().clone();
        if let Some(validate) = validate {
            errors.extend(validate(value));
        }
        errors
    }

    /// How many times a value was pushed into this field.
    pub fn value_pushes(&self) -> usize {
        self.value_pushes.get()
    }

    /// How many times an error list was pushed into this field.
    pub fn error_pushes(&self) -> usize {
        self.error_pushes.get()
    }
}

impl FieldBinding for FieldState {
    fn value(&self) -> Value {
        self.value.borrow().clone()
    }

    fn set_value(&self, value: Value) {
        trace!(path = %self.path, "field value updated");
        self.value_pushes.set(self.value_pushes.get() + 1);
        *self.value.borrow_mut() = value;
    }

    fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }

    fn set_errors(&self, errors: Vec<String>) {
        trace!(path = %self.path, errors = errors.len(), "field errors updated");
        self.error_pushes.set(self.error_pushes.get() + 1);
        *self.errors.borrow_mut() = errors;
    }

    fn validate(&self, value: &Value) -> bool {
        let errors = self.check(value);
        let valid = errors.is_empty();
        self.set_errors(errors);
        valid
    }
}

impl fmt::Debug for FieldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldState")
            .field("path", &self.path)
            .field("value", &self.value.borrow())
            .field("errors", &self.errors.borrow())
            .field("rules", &self.rules.borrow())
            .field("has_validate", &self.validate.borrow().is_some())
            .finish()
    }
}
