use crate::builtins;
use crate::dispatcher::Dispatcher;
use crate::errors::RuntimeError;
use crate::method_table::{MemberTable, MethodFn};
use crate::signature::{SEPARATOR, Signature, is_member_name};
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

pub type ObjectId = u64;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Shared behavior template. Handlers and dispatchers stored here are visible
/// from every instance.
pub struct Class {
    name: String,
    members: MemberTable,
}

impl Class {
    pub fn new(name: &str) -> Arc<Class> {
        Arc::new(Class {
            name: name.to_string(),
            members: MemberTable::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &MemberTable {
        &self.members
    }

    /// Registers a handler under its conventional name, e.g. `a$number$number`.
    pub fn define_method(&self, name: &str, method: MethodFn) -> Result<(), RuntimeError> {
        self.members
            .define_method(Signature::parse(name)?, method, &self.name)
    }

    pub fn dispatcher(&self, name: &str) -> Option<Arc<Dispatcher>> {
        self.members.dispatcher(name)
    }

    pub fn freeze(&self) {
        self.members.freeze()
    }

    pub fn member_names(&self) -> Vec<String> {
        self.members.names()
    }

    pub fn instantiate(self: &Arc<Self>) -> Object {
        Object::new(self)
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class").field("name", &self.name).finish()
    }
}

/// What a member access resolved to.
#[derive(Clone)]
pub enum Member {
    Field(Value),
    Dispatcher(Arc<Dispatcher>),
    Method(Signature, MethodFn),
    Builtin(&'static str, MethodFn),
}

impl Member {
    pub fn invoke(&self, receiver: &Object, args: Vec<Value>) -> Result<Value, RuntimeError> {
        match self {
            Member::Dispatcher(dispatcher) => dispatcher.call(receiver, args),
            Member::Method(_, method) | Member::Builtin(_, method) => method(receiver, args),
            Member::Field(value) => Err(RuntimeError::NotCallable(value.to_string())),
        }
    }

    pub fn as_dispatcher(&self) -> Option<&Arc<Dispatcher>> {
        match self {
            Member::Dispatcher(dispatcher) => Some(dispatcher),
            _ => None,
        }
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Field(value) => write!(f, "Field({:?})", value),
            Member::Dispatcher(dispatcher) => write!(f, "Dispatcher({})", dispatcher.prefix()),
            Member::Method(signature, _) => write!(f, "Method({})", signature),
            Member::Builtin(name, _) => write!(f, "Builtin({})", name),
        }
    }
}

struct ObjectData {
    id: ObjectId,
    class: Arc<Class>,
    fields: RwLock<HashMap<String, Value>>,
    members: MemberTable,
}

/// Receiver handle. Clones share the same underlying object.
#[derive(Clone)]
pub struct Object(Arc<ObjectData>);

impl Object {
    pub fn new(class: &Arc<Class>) -> Object {
        Object(Arc::new(ObjectData {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            class: class.clone(),
            fields: RwLock::new(HashMap::new()),
            members: MemberTable::new(),
        }))
    }

    pub fn id(&self) -> ObjectId {
        self.0.id
    }

    pub fn class(&self) -> &Arc<Class> {
        &self.0.class
    }

    pub fn members(&self) -> &MemberTable {
        &self.0.members
    }

    pub fn describe(&self) -> String {
        format!("[object {}#{}]", self.0.class.name, self.0.id)
    }

    pub fn get_field(&self, name: &str) -> Option<Value> {
        self.0
            .fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn set_field(&self, name: &str, value: Value) -> Result<(), RuntimeError> {
        if !is_member_name(name) {
            return Err(RuntimeError::InvalidMemberName(name.to_string()));
        }
        if self.is_frozen() {
            return Err(RuntimeError::WriteDenied {
                member: name.to_string(),
                receiver: self.describe(),
            });
        }
        self.0
            .fields
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value);
        Ok(())
    }

    /// Registers a handler on this object only; it shadows a class handler
    /// with the same signature.
    pub fn define_method(&self, name: &str, method: MethodFn) -> Result<(), RuntimeError> {
        self.0
            .members
            .define_method(Signature::parse(name)?, method, &self.describe())
    }

    pub fn resolve_method(&self, signature: &Signature) -> Option<MethodFn> {
        self.0
            .members
            .method(signature)
            .or_else(|| self.0.class.members.method(signature))
    }

    /// Looks `name` up through the object, its class and the built-in object
    /// members, in that order.
    pub fn member(&self, name: &str) -> Option<Member> {
        if let Some(value) = self.get_field(name) {
            return Some(Member::Field(value));
        }
        if let Some(dispatcher) = self.0.members.dispatcher(name) {
            return Some(Member::Dispatcher(dispatcher));
        }
        if name.contains(SEPARATOR)
            && let Ok(signature) = Signature::parse(name)
            && let Some(method) = self.resolve_method(&signature)
        {
            return Some(Member::Method(signature, method));
        }
        if let Some(dispatcher) = self.0.class.members.dispatcher(name) {
            return Some(Member::Dispatcher(dispatcher));
        }
        builtins::lookup(name).map(|(name, method)| Member::Builtin(name, method))
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.member(name).is_some()
    }

    /// Plain method call: nothing is synthesized for a missing name.
    pub fn call(&self, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        match self.member(name) {
            Some(Member::Field(_)) | None => Err(RuntimeError::NotCallable(name.to_string())),
            Some(member) => member.invoke(self, args),
        }
    }

    /// Returns the dispatcher `name` already resolves to, own or inherited,
    /// or binds a new one on this object. Fields and built-in members are
    /// never replaced.
    pub fn get_or_create_dispatcher(&self, name: &str) -> Result<Arc<Dispatcher>, RuntimeError> {
        match self.member(name) {
            Some(Member::Dispatcher(dispatcher)) => return Ok(dispatcher),
            Some(Member::Field(_)) => return Err(RuntimeError::NotCallable(name.to_string())),
            Some(Member::Method(..)) | Some(Member::Builtin(..)) => {
                return Err(RuntimeError::InvalidMemberName(name.to_string()));
            }
            None => {}
        }
        if !is_member_name(name) {
            return Err(RuntimeError::InvalidMemberName(name.to_string()));
        }
        self.0
            .members
            .get_or_create_dispatcher(name, &self.describe())
    }

    pub fn freeze(&self) {
        self.0.members.freeze()
    }

    pub fn is_frozen(&self) -> bool {
        self.0.members.is_frozen()
    }

    /// Own fields and members followed by the class members, each group sorted.
    pub fn member_names(&self) -> Vec<String> {
        let mut fields: Vec<String> = self
            .0
            .fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        fields.sort();
        fields.extend(self.0.members.names());
        fields.extend(self.0.class.member_names());
        fields
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("id", &self.0.id)
            .field("class", &self.0.class.name)
            .finish()
    }
}
