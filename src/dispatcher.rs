use crate::errors::RuntimeError;
use crate::object::Object;
use crate::signature::build_signature;
use crate::value::Value;
use std::sync::Arc;
use tracing::debug;

/// Callable bound to a method prefix. Picks the handler whose signature
/// matches the runtime type tags of the arguments exactly.
#[derive(Debug, PartialEq, Eq)]
pub struct Dispatcher {
    prefix: String,
}

pub fn make_dispatcher(prefix: &str) -> Arc<Dispatcher> {
    Arc::new(Dispatcher {
        prefix: prefix.to_string(),
    })
}

impl Dispatcher {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn call(&self, receiver: &Object, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let signature = build_signature(&self.prefix, &args);
        match receiver.resolve_method(&signature) {
            Some(method) => {
                debug!("dispatching {} on {}", signature, receiver.describe());
                method(receiver, args)
            }
            None => {
                debug!("no method {} on {}", signature, receiver.describe());
                Err(RuntimeError::DispatchNotFound {
                    signature: signature.to_string(),
                    receiver: receiver.describe(),
                })
            }
        }
    }
}
