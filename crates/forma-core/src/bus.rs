//! Path-keyed observer registry.

use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use forma_model::{FieldPath, Value};

use crate::error::{BoxError, FormError, Result};

pub type Observer = Box<dyn FnMut(&Value) -> std::result::Result<(), BoxError>>;

/// Observers keyed by field path.
///
/// Lists are created on first subscribe and only ever grow. There is no
/// unsubscribe; observers live as long as the bus.
#[derive(Default)]
pub struct SubscriptionBus {
    observers: HashMap<FieldPath, Vec<Observer>>,
}

impl SubscriptionBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `observer` to the list for `path`. The same closure logic may be
    /// subscribed several times and then runs once per subscription.
    pub fn subscribe<F>(&mut self, path: FieldPath, observer: F)
    where
        F: FnMut(&Value) -> std::result::Result<(), BoxError> + 'static,
    {
        let list = self.observers.entry(path).or_default();
        list.push(Box::new(observer));
    }

    /// Call every observer of `path` in subscription order.
    ///
    /// An observer error stops the dispatch: later observers are not called
    /// and the error is returned to the caller.
    pub fn observe(&mut self, path: &FieldPath, value: &Value) -> Result<()> {
        let Some(list) = self.observers.get_mut(path) else {
            return Ok(());
        };
        trace!(path = %path, observers = list.len(), "notifying observers");
        for observer in list.iter_mut() {
            observer(value).map_err(|source| FormError::Observer {
                path: path.clone(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn observer_count(&self, path: &FieldPath) -> usize {
        self.observers.get(path).map_or(0, Vec::len)
    }
}

impl fmt::Debug for SubscriptionBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts: Vec<(String, usize)> = self
            .observers
            .iter()
            .map(|(path, list)| (path.to_string(), list.len()))
            .collect();
        counts.sort();
        f.debug_struct("SubscriptionBus")
            .field("observers", &counts)
            .finish()
    }
}
