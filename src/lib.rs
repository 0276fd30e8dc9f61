use crate::dispatcher::Dispatcher;
use crate::errors::RuntimeError;
use crate::signature::is_member_name;
use std::sync::Arc;

mod builtins;
pub mod dispatcher;
pub mod errors;
pub mod example;
pub mod method_table;
pub mod object;
pub mod registry;
pub mod signature;
pub mod synthesizer;
pub mod value;

pub use dispatcher::make_dispatcher;
pub use object::{Class, Member, Object};
pub use registry::ObjectRegistry;
pub use signature::{Signature, TypeTag, build_signature};
pub use synthesizer::{MultiDispatch, wrap_with_multi_dispatch};
pub use value::Value;

/// Binds a dispatcher named `name` on the class itself, so every instance can
/// call it without going through [`MultiDispatch`]. Registering an existing
/// name returns the dispatcher already bound to it.
pub fn register_multi_method(class: &Class, name: &str) -> Result<Arc<Dispatcher>, RuntimeError> {
    if !is_member_name(name) || builtins::is_builtin(name) {
        return Err(RuntimeError::InvalidMemberName(name.to_string()));
    }
    class.members().get_or_create_dispatcher(name, class.name())
}
