use crate::errors::RuntimeError;
use crate::object::{Member, Object};
use crate::signature::is_member_name;
use crate::value::Value;
use tracing::trace;

/// Wrapper whose member access turns any undeclared name into a
/// multi-method dispatcher for that name.
#[derive(Clone, Debug)]
pub struct MultiDispatch {
    target: Object,
}

pub fn wrap_with_multi_dispatch(object: Object) -> MultiDispatch {
    MultiDispatch { target: object }
}

impl MultiDispatch {
    pub fn target(&self) -> &Object {
        &self.target
    }

    pub fn get(&self, name: &str) -> Result<Member, RuntimeError> {
        if let Some(member) = self.target.member(name) {
            trace!("{} resolved on {}", name, self.target.describe());
            return Ok(member);
        }
        if !is_member_name(name) {
            return Err(RuntimeError::InvalidMemberName(name.to_string()));
        }
        self.target
            .get_or_create_dispatcher(name)
            .map(Member::Dispatcher)
    }

    pub fn call(&self, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        match self.get(name)? {
            Member::Field(_) => Err(RuntimeError::NotCallable(name.to_string())),
            member => member.invoke(&self.target, args),
        }
    }
}
