use crate::dispatcher::Dispatcher;
use crate::errors::RuntimeError;
use crate::object::{Class, Object, ObjectId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Objects addressable by id, for callers that hold ids instead of handles.
#[derive(Default)]
pub struct ObjectRegistry {
    objects: RwLock<HashMap<ObjectId, Object>>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&self, class: &Arc<Class>) -> ObjectId {
        let object = class.instantiate();
        let id = object.id();
        self.insert(object);
        id
    }

    pub fn insert(&self, object: Object) {
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(object.id(), object);
    }

    pub fn get(&self, id: ObjectId) -> Option<Object> {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn remove(&self, id: ObjectId) -> Option<Object> {
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
    }

    pub fn len(&self) -> usize {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The registry lock is only held for the id lookup; creation itself is
    /// serialized by the receiver's own member table.
    pub fn get_or_create_dispatcher(
        &self,
        receiver: ObjectId,
        name: &str,
    ) -> Result<Arc<Dispatcher>, RuntimeError> {
        let object = self
            .get(receiver)
            .ok_or(RuntimeError::UnknownReceiver(receiver))?;
        object.get_or_create_dispatcher(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_receiver() {
        let registry = ObjectRegistry::new();
        assert_eq!(
            registry.get_or_create_dispatcher(42_000_000, "a").unwrap_err(),
            RuntimeError::UnknownReceiver(42_000_000)
        );
    }

    #[test]
    fn create_by_id_is_memoized() {
        let registry = ObjectRegistry::new();
        let id = registry.allocate(&Class::new("Example"));
        let first = registry.get_or_create_dispatcher(id, "a").unwrap();
        let second = registry.get_or_create_dispatcher(id, "a").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(registry.get(id).unwrap().members().dispatcher("a").is_some());
    }

    #[test]
    fn builtin_names_are_not_created() {
        let registry = ObjectRegistry::new();
        let id = registry.allocate(&Class::new("Example"));
        assert_eq!(
            registry.get_or_create_dispatcher(id, "to_string").unwrap_err(),
            RuntimeError::InvalidMemberName("to_string".to_string())
        );
        let object = registry.get(id).unwrap();
        assert_eq!(object.members().revision(), 0);
        assert_eq!(
            object.call("to_string", vec![]),
            Ok(crate::value::string(object.describe()))
        );
    }

    #[test]
    fn class_dispatcher_is_reused() {
        let class = Class::new("Example");
        let registered = crate::register_multi_method(&class, "a").unwrap();
        let registry = ObjectRegistry::new();
        let id = registry.allocate(&class);
        let dispatcher = registry.get_or_create_dispatcher(id, "a").unwrap();
        assert!(Arc::ptr_eq(&registered, &dispatcher));
        assert_eq!(registry.get(id).unwrap().members().revision(), 0);
    }

    #[test]
    fn fields_are_not_replaced() {
        let registry = ObjectRegistry::new();
        let id = registry.allocate(&Class::new("Example"));
        let object = registry.get(id).unwrap();
        object.set_field("size", crate::value::number(1)).unwrap();
        assert_eq!(
            registry.get_or_create_dispatcher(id, "size").unwrap_err(),
            RuntimeError::NotCallable("size".to_string())
        );
        assert_eq!(object.members().revision(), 0);
    }

    #[test]
    fn remove_object() {
        let registry = ObjectRegistry::new();
        let id = registry.allocate(&Class::new("Example"));
        assert_eq!(registry.len(), 1);
        assert!(registry.remove(id).is_some());
        assert!(registry.is_empty());
    }
}
