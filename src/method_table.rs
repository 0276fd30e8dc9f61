use crate::dispatcher::{Dispatcher, make_dispatcher};
use crate::errors::RuntimeError;
use crate::object::Object;
use crate::signature::Signature;
use crate::value::Value;
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

pub type MethodFn = fn(&Object, Vec<Value>) -> Result<Value, RuntimeError>;
pub(crate) type MethodMap = HashMap<Signature, MethodFn>;
pub(crate) type DispatcherMap = HashMap<String, Arc<Dispatcher>>;

#[derive(Default, Clone)]
pub(crate) struct Members {
    pub(crate) methods: MethodMap,
    pub(crate) dispatchers: DispatcherMap,
    pub(crate) revision: u64,
}

/// Handlers and named dispatchers of one receiver or class.
///
/// Readers work on an immutable snapshot. Writers serialize on `write_lock`,
/// re-check the current snapshot and publish a new one, so a name is only
/// ever bound to one dispatcher.
pub struct MemberTable {
    snapshot: ArcSwap<Members>,
    write_lock: Mutex<()>,
    frozen: AtomicBool,
}

impl Default for MemberTable {
    fn default() -> Self {
        Self::new()
    }
}

impl MemberTable {
    pub fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(Members::default()),
            write_lock: Mutex::new(()),
            frozen: AtomicBool::new(false),
        }
    }

    pub fn method(&self, signature: &Signature) -> Option<MethodFn> {
        self.snapshot.load().methods.get(signature).copied()
    }

    pub fn dispatcher(&self, name: &str) -> Option<Arc<Dispatcher>> {
        self.snapshot.load().dispatchers.get(name).cloned()
    }

    /// Number of writes published so far.
    pub fn revision(&self) -> u64 {
        self.snapshot.load().revision
    }

    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::Release);
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    pub fn define_method(
        &self,
        signature: Signature,
        method: MethodFn,
        owner: &str,
    ) -> Result<(), RuntimeError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.check_writable(&signature.to_string(), owner)?;
        let current = self.snapshot.load_full();
        if current.methods.contains_key(&signature) {
            return Err(RuntimeError::DuplicateMethod(signature.to_string()));
        }
        debug!("defining {} on {}", signature, owner);
        let mut next = (*current).clone();
        next.methods.insert(signature, method);
        next.revision += 1;
        self.snapshot.store(Arc::new(next));
        Ok(())
    }

    /// Returns the dispatcher bound to `name`, creating and storing it first
    /// if there is none. An existing dispatcher is returned even when frozen.
    pub fn get_or_create_dispatcher(
        &self,
        name: &str,
        owner: &str,
    ) -> Result<Arc<Dispatcher>, RuntimeError> {
        if let Some(dispatcher) = self.dispatcher(name) {
            return Ok(dispatcher);
        }
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.snapshot.load_full();
        if let Some(dispatcher) = current.dispatchers.get(name) {
            return Ok(dispatcher.clone());
        }
        self.check_writable(name, owner)?;
        debug!("synthesizing dispatcher {} on {}", name, owner);
        let dispatcher = make_dispatcher(name);
        let mut next = (*current).clone();
        next.dispatchers.insert(name.to_string(), dispatcher.clone());
        next.revision += 1;
        self.snapshot.store(Arc::new(next));
        Ok(dispatcher)
    }

    /// Dispatcher names and rendered handler signatures, sorted.
    pub fn names(&self) -> Vec<String> {
        let members = self.snapshot.load();
        let mut names: Vec<String> = members
            .dispatchers
            .keys()
            .cloned()
            .chain(members.methods.keys().map(|signature| signature.to_string()))
            .collect();
        names.sort();
        names
    }

    fn check_writable(&self, member: &str, owner: &str) -> Result<(), RuntimeError> {
        if self.is_frozen() {
            Err(RuntimeError::WriteDenied {
                member: member.to_string(),
                receiver: owner.to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::TypeTag;

    fn noop(_: &Object, _: Vec<Value>) -> Result<Value, RuntimeError> {
        Ok(Value::Undefined)
    }

    #[test]
    fn dispatcher_is_created_once() {
        let table = MemberTable::new();
        let first = table.get_or_create_dispatcher("a", "t").unwrap();
        let second = table.get_or_create_dispatcher("a", "t").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(table.revision(), 1);
    }

    #[test]
    fn duplicate_method_is_rejected() {
        let table = MemberTable::new();
        let sig = Signature::new("a", vec![TypeTag::Number]);
        table.define_method(sig.clone(), noop, "t").unwrap();
        assert_eq!(
            table.define_method(sig, noop, "t"),
            Err(RuntimeError::DuplicateMethod("a$number".to_string()))
        );
    }

    #[test]
    fn frozen_table_denies_writes_but_serves_existing() {
        let table = MemberTable::new();
        let existing = table.get_or_create_dispatcher("a", "t").unwrap();
        table.freeze();
        assert!(Arc::ptr_eq(
            &existing,
            &table.get_or_create_dispatcher("a", "t").unwrap()
        ));
        assert_eq!(
            table.get_or_create_dispatcher("b", "t").unwrap_err(),
            RuntimeError::WriteDenied {
                member: "b".to_string(),
                receiver: "t".to_string()
            }
        );
    }

    #[test]
    fn names_are_sorted() {
        let table = MemberTable::new();
        table.get_or_create_dispatcher("b", "t").unwrap();
        table
            .define_method(Signature::new("a", vec![TypeTag::String]), noop, "t")
            .unwrap();
        assert_eq!(table.names(), vec!["a$string".to_string(), "b".to_string()]);
    }
}
