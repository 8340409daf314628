//! Glue between one field and the form service.

use std::any::Any;
use std::fmt;
use std::ptr;
use std::rc::Rc;

use tracing::debug;

use forma_core::{FieldBinding, FormError, FormService};
use forma_model::{FieldPath, Value};

use crate::props::{DEFAULT_VALUE_PROP, ErrorPropsFn, FieldProps, default_error_props};
use crate::rules::Rule;
use crate::state::{FieldState, ValidateFn};

/// Registration options for a single field.
#[derive(Clone)]
pub struct FieldOptions {
    pub path: FieldPath,
    pub default_value: Option<Value>,
    pub value_prop_name: String,
    pub make_error_props: Option<ErrorPropsFn>,
    pub rules: Vec<Rule>,
    pub validate: Option<ValidateFn>,
}

impl FieldOptions {
    pub fn new(path: FieldPath) -> Self {
        Self {
            path,
            default_value: None,
            value_prop_name: DEFAULT_VALUE_PROP.to_string(),
            make_error_props: None,
            rules: Vec::new(),
            validate: None,
        }
    }

    #[must_use]
    pub fn with_default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    #[must_use]
    pub fn with_value_prop_name(mut self, name: impl Into<String>) -> Self {
        self.value_prop_name = name.into();
        self
    }

    #[must_use]
    pub fn with_error_props<F>(mut self, make_error_props: F) -> Self
    where
        F: Fn(&[String]) -> serde_json::Map<String, Value> + 'static,
    {
        self.make_error_props = Some(Rc::new(make_error_props));
        self
    }

    #[must_use]
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    #[must_use]
    pub fn with_validate<F>(mut self, validate: F) -> Self
    where
        F: Fn(&Value) -> Vec<String> + 'static,
    {
        self.validate = Some(Rc::new(validate));
        self
    }
}

impl fmt::Debug for FieldOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldOptions")
            .field("path", &self.path)
            .field("default_value", &self.default_value)
            .field("value_prop_name", &self.value_prop_name)
            .field("rules", &self.rules)
            .field("has_make_error_props", &self.make_error_props.is_some())
            .field("has_validate", &self.validate.is_some())
            .finish()
    }
}

/// A registered field: its live state plus the options it was registered
/// with.
///
/// Registering a path that already carries a [`FieldState`] hands back a
/// handle to that same state with the new rules and validator swapped in, so
/// every handle for a field reads and writes one value. A binding of any
/// other kind is replaced by a fresh state seeded with its value and errors.
pub struct FormItem {
    state: Rc<FieldState>,
    value_prop_name: String,
    make_error_props: Option<ErrorPropsFn>,
}

impl FormItem {
    pub fn register(service: &mut FormService, options: FieldOptions) -> FormItem {
        let FieldOptions {
            path,
            default_value,
            value_prop_name,
            make_error_props,
            rules,
            validate,
        } = options;

        let item = service.create_or_get_item_ref(&path);
        item.borrow_mut().set_default_value(default_value);

        let previous = item.borrow().binding().cloned();
        let state = match previous.map(field_state) {
            Some(Ok(state)) => {
                debug!(path = %path, rules = rules.len(), "refreshing bound field");
                state.replace_checks(rules, validate);
                state
            }
            Some(Err(binding)) => {
                debug!(path = %path, rules = rules.len(), "replacing foreign binding");
                let state = Rc::new(
                    FieldState::new(path, binding.value())
                        .with_rules(rules)
                        .with_validate(validate)
                        .with_errors(binding.errors()),
                );
                item.borrow_mut().attach(state.clone());
                state
            }
            None => {
                debug!(path = %path, rules = rules.len(), "binding field");
                let initial = service.get_item_initial_value(&path);
                let state = Rc::new(
                    FieldState::new(path, initial)
                        .with_rules(rules)
                        .with_validate(validate),
                );
                item.borrow_mut().attach(state.clone());
                state
            }
        };

        FormItem {
            state,
            value_prop_name,
            make_error_props,
        }
    }

    pub fn path(&self) -> &FieldPath {
        self.state.path()
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn value(&self) -> Value {
        self.state.value()
    }

    pub fn errors(&self) -> Vec<String> {
        self.state.errors()
    }

    /// Push a new value from the host and notify the path's observers.
    pub fn on_change(&self, service: &mut FormService, value: Value) -> Result<(), FormError> {
        self.state.set_value(value.clone());
        service.observe(self.state.path(), &value)
    }

    /// Validate the current value, as a host does when the field loses focus.
    pub fn on_blur(&self) -> bool {
        let value = self.state.value();
        self.state.validate(&value)
    }

    pub fn set_instance(&self, service: &FormService, instance: Rc<dyn Any>) {
        if let Some(item) = service.store().item_ref(self.state.path()) {
            item.borrow_mut().set_instance(instance);
        }
    }

    pub fn props(&self) -> FieldProps {
        let errors = self.state.errors();
        let error_props = match &self.make_error_props {
            Some(make) => make(&errors),
            None => default_error_props(&errors),
        };
        FieldProps {
            value_prop_name: self.value_prop_name.clone(),
            value: self.state.value(),
            error_props,
        }
    }

    /// Drop this handle. The field leaves the store once no other handle
    /// shares its state and the store still holds this state as its binding.
    pub fn unregister(self, service: &mut FormService) {
        let path = self.state.path();
        if !self.is_attached(service) {
            debug!(path = %path, "binding was replaced; field stays registered");
            return;
        }
        // One reference from the record, one from this handle.
        if Rc::strong_count(&self.state) > 2 {
            debug!(path = %path, "field still has live handles");
            return;
        }
        service.remove_item_ref(path);
    }

    fn is_attached(&self, service: &FormService) -> bool {
        let Some(item) = service.store().item_ref(self.state.path()) else {
            return false;
        };
        let record = item.borrow();
        record
            .binding()
            .is_some_and(|binding| ptr::addr_eq(Rc::as_ptr(binding), Rc::as_ptr(&self.state)))
    }
}

fn field_state(binding: Rc<dyn FieldBinding>) -> Result<Rc<FieldState>, Rc<dyn FieldBinding>> {
    let any: Rc<dyn Any> = binding.clone();
    any.downcast::<FieldState>().map_err(|_| binding)
}

impl fmt::Debug for FormItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormItem")
            .field("state", &self.state)
            .field("value_prop_name", &self.value_prop_name)
            .finish()
    }
}
