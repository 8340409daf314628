//! The per-form service: registration, accessors and the submit/reset
//! protocol.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use serde_json::Map;
use tracing::{debug, info, info_span, trace};

use forma_model::{FieldPath, Value, get_at_path, is_truthy, same_value, set_at_path};

use crate::bus::SubscriptionBus;
use crate::config::{FormConfig, InitialValuePolicy};
use crate::error::{BoxError, Result};
use crate::event::HostEvent;
use crate::store::{FieldStore, ItemRef};

pub type SubmitCallback = Box<dyn FnMut(&Value)>;

/// Result of [`FormService::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Every field validated; carries the values handed to `on_submit`.
    Submitted(Value),
    /// At least one field failed validation; `on_submit` was not called.
    Rejected,
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted(_))
    }

    pub fn values(&self) -> Option<&Value> {
        match self {
            SubmitOutcome::Submitted(values) => Some(values),
            SubmitOutcome::Rejected => None,
        }
    }
}

/// One form instance: its field store, its subscriptions and its submit
/// callback.
///
/// The service is single-threaded (`Rc`/`RefCell` inside) and meant to be
/// created once per form instance.
pub struct FormService {
    store: FieldStore,
    subscriptions: SubscriptionBus,
    config: FormConfig,
    on_submit: Option<SubmitCallback>,
}

impl FormService {
    pub fn new(config: FormConfig) -> Self {
        Self {
            store: FieldStore::new(),
            subscriptions: SubscriptionBus::new(),
            config,
            on_submit: None,
        }
    }

    pub fn builder() -> FormServiceBuilder {
        FormServiceBuilder::default()
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    pub fn registered_paths(&self) -> &[FieldPath] {
        self.store.registered_paths()
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    pub fn create_or_get_item_ref(&mut self, path: &FieldPath) -> ItemRef {
        self.store.create_or_get_item_ref(path)
    }

    pub fn remove_item_ref(&mut self, path: &FieldPath) -> Option<ItemRef> {
        self.store.remove_item_ref(path)
    }

    /// The opaque handle attached to the field at `path`, if any.
    pub fn item_instance(&self, path: &FieldPath) -> Option<Rc<dyn Any>> {
        let item = self.store.item_ref(path)?;
        let record = item.borrow();
        record.instance().cloned()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn get_item_value(&self, path: &FieldPath) -> Result<Value> {
        Ok(self.store.binding(path)?.value())
    }

    pub fn set_item_value(&self, path: &FieldPath, value: Value) -> Result<()> {
        let binding = self.store.binding(path)?;
        trace!(path = %path, "pushing value");
        binding.set_value(value);
        Ok(())
    }

    pub fn get_item_errors(&self, path: &FieldPath) -> Result<Vec<String>> {
        Ok(self.store.binding(path)?.errors())
    }

    pub fn set_item_error(&self, path: &FieldPath, errors: Vec<String>) -> Result<()> {
        let binding = self.store.binding(path)?;
        trace!(path = %path, errors = errors.len(), "pushing errors");
        binding.set_errors(errors);
        Ok(())
    }

    /// The value a reset restores for `path`.
    ///
    /// Looks in the configured initial values first and falls back to the
    /// field's default value (or `null`). Under
    /// [`InitialValuePolicy::TruthyFallback`] a falsy initial value counts as
    /// missing.
    pub fn get_item_initial_value(&self, path: &FieldPath) -> Value {
        let initial = get_at_path(&self.config.initial_values, path);
        let use_initial = match self.config.initial_value_policy {
            InitialValuePolicy::TruthyFallback => initial.filter(|value| is_truthy(value)),
            InitialValuePolicy::StrictAbsence => initial,
        };
        match use_initial {
            Some(value) => value.clone(),
            None => self.store.default_value(path).unwrap_or(Value::Null),
        }
    }

    /// Current errors of every field, in registration order, skipping fields
    /// without errors.
    pub fn errors_by_path(&self) -> Result<Vec<(FieldPath, Vec<String>)>> {
        let mut out = Vec::new();
        for path in self.store.registered_paths() {
            let errors = self.get_item_errors(path)?;
            if !errors.is_empty() {
                out.push((path.clone(), errors));
            }
        }
        Ok(out)
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Clear errors, collect values, validate, and hand the values to
    /// `on_submit` if the whole form is valid.
    pub fn submit(&mut self, event: Option<&mut dyn HostEvent>) -> Result<SubmitOutcome> {
        if let Some(event) = event {
            event.prevent_default();
        }
        let span = info_span!("submit", fields = self.store.len());
        let _guard = span.enter();

        self.reset_errors()?;
        let values = self.collect_values()?;

        if !self.validate_form()? {
            let invalid = self.errors_by_path()?.len();
            info!(invalid, "submit rejected");
            return Ok(SubmitOutcome::Rejected);
        }

        if let Some(on_submit) = self.on_submit.as_mut() {
            on_submit(&values);
        }
        info!("submit accepted");
        Ok(SubmitOutcome::Submitted(values))
    }

    /// Nested snapshot of every registered field's current value.
    pub fn collect_values(&self) -> Result<Value> {
        let mut values = Value::Object(Map::new());
        for path in self.store.registered_paths() {
            set_at_path(&mut values, path, self.get_item_value(path)?)?;
        }
        Ok(values)
    }

    /// Push each field's initial value where it differs from the current one,
    /// then clear all errors.
    pub fn reset(&self, event: Option<&mut dyn HostEvent>) -> Result<()> {
        if let Some(event) = event {
            event.prevent_default();
        }
        let span = info_span!("reset", fields = self.store.len());
        let _guard = span.enter();

        let mut pushed = 0usize;
        for path in self.store.registered_paths() {
            let current = self.get_item_value(path)?;
            let initial = self.get_item_initial_value(path);
            if same_value(&current, &initial) {
                continue;
            }
            self.set_item_value(path, initial)?;
            pushed += 1;
        }
        debug!(pushed, "restored initial values");

        self.reset_errors()
    }

    /// Clear the errors of every field that currently has any.
    pub fn reset_errors(&self) -> Result<()> {
        for path in self.store.registered_paths() {
            if !self.get_item_errors(path)?.is_empty() {
                self.set_item_error(path, Vec::new())?;
            }
        }
        Ok(())
    }

    /// Validate every registered field against its current value.
    ///
    /// All fields are validated even after one fails, so every field's errors
    /// reflect this pass.
    pub fn validate_form(&self) -> Result<bool> {
        let mut valid = true;
        for path in self.store.registered_paths() {
            let binding = self.store.binding(path)?;
            let current = binding.value();
            if !binding.validate(&current) {
                debug!(path = %path, "field invalid");
                valid = false;
            }
        }
        Ok(valid)
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    pub fn subscribe<F>(&mut self, path: FieldPath, observer: F)
    where
        F: FnMut(&Value) -> std::result::Result<(), BoxError> + 'static,
    {
        self.subscriptions.subscribe(path, observer);
    }

    pub fn observe(&mut self, path: &FieldPath, value: &Value) -> Result<()> {
        self.subscriptions.observe(path, value)
    }

    pub fn observer_count(&self, path: &FieldPath) -> usize {
        self.subscriptions.observer_count(path)
    }
}

impl Default for FormService {
    fn default() -> Self {
        Self::new(FormConfig::default())
    }
}

impl fmt::Debug for FormService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormService")
            .field("store", &self.store)
            .field("subscriptions", &self.subscriptions)
            .field("config", &self.config)
            .field("has_on_submit", &self.on_submit.is_some())
            .finish()
    }
}

#[derive(Default)]
pub struct FormServiceBuilder {
    config: FormConfig,
    on_submit: Option<SubmitCallback>,
}

impl FormServiceBuilder {
    #[must_use]
    pub fn config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn initial_values(mut self, initial_values: Value) -> Self {
        self.config.initial_values = initial_values;
        self
    }

    #[must_use]
    pub fn initial_value_policy(mut self, policy: InitialValuePolicy) -> Self {
        self.config.initial_value_policy = policy;
        self
    }

    #[must_use]
    pub fn on_submit<F>(mut self, on_submit: F) -> Self
    where
        F: FnMut(&Value) + 'static,
    {
        self.on_submit = Some(Box::new(on_submit));
        self
    }

    pub fn build(self) -> FormService {
        FormService {
            on_submit: self.on_submit,
            ..FormService::new(self.config)
        }
    }
}
