//! Path-addressed field store.
//!
//! Records live in a tree that mirrors the segments of their paths. Next to
//! the tree the store keeps the registered path list, which fixes the
//! traversal order of every whole-form operation.

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use forma_model::{FieldPath, Segment, Value};

use crate::error::{FormError, Result};

/// Capabilities supplied by whoever owns a field's live state.
///
/// The store never keeps its own copy of a value or an error list. Reads go
/// through [`value`](Self::value) and [`errors`](Self::errors), writes
/// through the setters, so the owner stays the single source of truth.
///
/// Bindings are `Any` so an owner can recover its concrete state from the
/// record when the same field registers again.
pub trait FieldBinding: Any {
    fn value(&self) -> Value;

    fn set_value(&self, value: Value);

    fn errors(&self) -> Vec<String>;

    fn set_errors(&self, errors: Vec<String>);

    /// Apply the field's rules to `value`, push the resulting errors through
    /// `set_errors`, and report whether the value is valid.
    fn validate(&self, value: &Value) -> bool;
}

/// Per-field entry of the store.
#[derive(Default)]
pub struct FieldRecord {
    binding: Option<Rc<dyn FieldBinding>>,
    default_value: Option<Value>,
    instance: Option<Rc<dyn Any>>,
}

impl FieldRecord {
    pub fn attach(&mut self, binding: Rc<dyn FieldBinding>) {
        self.binding = Some(binding);
    }

    pub fn detach(&mut self) -> Option<Rc<dyn FieldBinding>> {
        self.binding.take()
    }

    pub fn binding(&self) -> Option<&Rc<dyn FieldBinding>> {
        self.binding.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    pub fn set_default_value(&mut self, value: Option<Value>) {
        self.default_value = value;
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Attach the rendered element or other handle backing this field.
    pub fn set_instance(&mut self, instance: Rc<dyn Any>) {
        self.instance = Some(instance);
    }

    pub fn instance(&self) -> Option<&Rc<dyn Any>> {
        self.instance.as_ref()
    }
}

impl fmt::Debug for FieldRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRecord")
            .field("bound", &self.binding.is_some())
            .field("default_value", &self.default_value)
            .field("has_instance", &self.instance.is_some())
            .finish()
    }
}

/// Shared, mutable handle to a [`FieldRecord`].
///
/// The handle returned by registration stays valid for as long as the field
/// is registered; registering the same path again hands back the same handle.
#[derive(Clone, Default)]
pub struct ItemRef(Rc<RefCell<FieldRecord>>);

impl ItemRef {
    pub fn borrow(&self) -> Ref<'_, FieldRecord> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, FieldRecord> {
        self.0.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &ItemRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(record) => fmt::Debug::fmt(&*record, f),
            Err(_) => f.write_str("FieldRecord(<borrowed>)"),
        }
    }
}

#[derive(Debug, Default)]
struct StoreNode {
    record: Option<ItemRef>,
    children: BTreeMap<Segment, StoreNode>,
}

impl StoreNode {
    fn is_empty(&self) -> bool {
        self.record.is_none() && self.children.is_empty()
    }

    fn find(&self, segments: &[Segment]) -> Option<&StoreNode> {
        segments
            .iter()
            .try_fold(self, |node, segment| node.children.get(segment))
    }

    fn count(&self) -> usize {
        usize::from(self.record.is_some())
            + self.children.values().map(StoreNode::count).sum::<usize>()
    }

    fn remove(&mut self, segments: &[Segment]) -> Option<ItemRef> {
        let (first, rest) = segments.split_first()?;
        let child = self.children.get_mut(first)?;
        let removed = if rest.is_empty() {
            child.record.take()
        } else {
            child.remove(rest)
        };
        if child.is_empty() {
            self.children.remove(first);
        }
        removed
    }
}

/// Tree of field records plus the ordered list of registered paths.
#[derive(Debug, Default)]
pub struct FieldStore {
    root: StoreNode,
    registered: Vec<FieldPath>,
}

impl FieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the record at `path`, creating it on first registration.
    ///
    /// Registering an existing path returns the existing handle untouched and
    /// does not append to the registered list again.
    pub fn create_or_get_item_ref(&mut self, path: &FieldPath) -> ItemRef {
        if let Some(existing) = self.item_ref(path) {
            trace!(path = %path, "field already registered");
            return existing;
        }

        let mut node = &mut self.root;
        for segment in path.segments() {
            node = node.children.entry(segment.clone()).or_default();
        }
        let item = ItemRef::default();
        node.record = Some(item.clone());
        self.registered.push(path.clone());
        debug!(path = %path, registered = self.registered.len(), "registered field");
        item
    }

    /// Unregister `path`, pruning containers left empty. Unknown paths are
    /// ignored.
    pub fn remove_item_ref(&mut self, path: &FieldPath) -> Option<ItemRef> {
        self.registered.retain(|registered| registered != path);
        let removed = self.root.remove(path.segments());
        if removed.is_some() {
            debug!(path = %path, registered = self.registered.len(), "removed field");
        }
        removed
    }

    pub fn item_ref(&self, path: &FieldPath) -> Option<ItemRef> {
        self.root
            .find(path.segments())
            .and_then(|node| node.record.clone())
    }

    pub fn contains(&self, path: &FieldPath) -> bool {
        self.root
            .find(path.segments())
            .is_some_and(|node| node.record.is_some())
    }

    /// Registered paths in registration order.
    pub fn registered_paths(&self) -> &[FieldPath] {
        &self.registered
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// Number of records reachable in the tree. Equal to [`len`](Self::len)
    /// whenever registration and removal went through this store.
    pub fn record_count(&self) -> usize {
        self.root.count()
    }

    /// The capabilities registered at `path`.
    ///
    /// The binding is cloned out of the record so callers never hold a borrow
    /// of the record while calling into the owner.
    pub fn binding(&self, path: &FieldPath) -> Result<Rc<dyn FieldBinding>> {
        let item = self
            .item_ref(path)
            .ok_or_else(|| FormError::UnregisteredField { path: path.clone() })?;
        let record = item.borrow();
        record
            .binding()
            .cloned()
            .ok_or_else(|| FormError::MissingBinding { path: path.clone() })
    }

    pub fn default_value(&self, path: &FieldPath) -> Option<Value> {
        let item = self.item_ref(path)?;
        let record = item.borrow();
        record.default_value().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(input: &str) -> FieldPath {
        FieldPath::parse(input).unwrap()
    }

    #[test]
    fn registration_is_idempotent() {
        let mut store = FieldStore::new();
        let first = store.create_or_get_item_ref(&path("user.name"));
        first.borrow_mut().set_default_value(Some(Value::from("Ann")));
        let second = store.create_or_get_item_ref(&path("user.name"));

        assert!(first.ptr_eq(&second));
        assert_eq!(store.registered_paths(), &[path("user.name")]);
        assert_eq!(
            second.borrow().default_value(),
            Some(&Value::from("Ann"))
        );
    }

    #[test]
    fn removal_prunes_empty_ancestors() {
        let mut store = FieldStore::new();
        store.create_or_get_item_ref(&path("user.addresses[0].city"));
        store.create_or_get_item_ref(&path("user.name"));

        assert!(store.remove_item_ref(&path("user.addresses[0].city")).is_some());
        let addresses = [Segment::from("user"), Segment::from("addresses")];
        assert!(store.root.find(&addresses).is_none());
        assert!(store.contains(&path("user.name")));

        store.remove_item_ref(&path("user.name"));
        assert!(store.root.children.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn removing_a_parent_keeps_registered_children() {
        let mut store = FieldStore::new();
        store.create_or_get_item_ref(&path("user"));
        store.create_or_get_item_ref(&path("user.name"));

        store.remove_item_ref(&path("user"));
        assert!(!store.contains(&path("user")));
        assert!(store.contains(&path("user.name")));
        assert_eq!(store.registered_paths(), &[path("user.name")]);
        assert_eq!(store.record_count(), 1);
    }

    #[test]
    fn removing_unknown_path_is_a_no_op() {
        let mut store = FieldStore::new();
        store.create_or_get_item_ref(&path("a"));
        assert!(store.remove_item_ref(&path("a.b")).is_none());
        assert!(store.remove_item_ref(&path("zzz")).is_none());
        assert_eq!(store.registered_paths(), &[path("a")]);
    }

    #[test]
    fn binding_lookup_distinguishes_failures() {
        let mut store = FieldStore::new();
        store.create_or_get_item_ref(&path("a"));

        assert!(matches!(
            store.binding(&path("b")),
            Err(FormError::UnregisteredField { .. })
        ));
        assert!(matches!(
            store.binding(&path("a")),
            Err(FormError::MissingBinding { .. })
        ));
    }
}
