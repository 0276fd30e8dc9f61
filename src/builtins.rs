use crate::errors::RuntimeError;
use crate::method_table::MethodFn;
use crate::object::Object;
use crate::value::{Value, bool, string};
use std::collections::HashMap;
use std::sync::LazyLock;

pub(crate) type BuiltinMap = HashMap<&'static str, MethodFn>;

// Members every object has. They sit at the end of the lookup chain and are
// never replaced by a synthesized dispatcher.
static OBJECT_MEMBERS: LazyLock<BuiltinMap> = LazyLock::new(|| {
    let mut object_members: BuiltinMap = HashMap::new();
    let m = &mut object_members;
    add(m, "to_string", object_to_string);
    add(m, "class_name", object_class_name);
    add(m, "has_member", object_has_member);
    add(m, "member_names", object_member_names);
    object_members
});

pub(crate) fn add(m: &mut BuiltinMap, name: &'static str, method: MethodFn) {
    m.insert(name, method);
}

pub(crate) fn lookup(name: &str) -> Option<(&'static str, MethodFn)> {
    OBJECT_MEMBERS
        .get_key_value(name)
        .map(|(name, method)| (*name, *method))
}

pub(crate) fn is_builtin(name: &str) -> bool {
    OBJECT_MEMBERS.contains_key(name)
}

pub(crate) fn expected(expected_type: &str) -> RuntimeError {
    RuntimeError::ExpectedType(expected_type.to_string())
}

fn object_to_string(receiver: &Object, _args: Vec<Value>) -> Result<Value, RuntimeError> {
    Ok(string(receiver.describe()))
}

fn object_class_name(receiver: &Object, _args: Vec<Value>) -> Result<Value, RuntimeError> {
    Ok(string(receiver.class().name()))
}

fn object_has_member(receiver: &Object, args: Vec<Value>) -> Result<Value, RuntimeError> {
    match args.first() {
        Some(Value::String(name)) => Ok(bool(receiver.has_member(name))),
        _ => Err(expected("string")),
    }
}

fn object_member_names(receiver: &Object, _args: Vec<Value>) -> Result<Value, RuntimeError> {
    Ok(Value::List(
        receiver.member_names().into_iter().map(string).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Class;

    #[test]
    fn lookup_known_member() {
        let object = Class::new("Point").instantiate();
        let (name, method) = lookup("class_name").unwrap();
        assert_eq!(name, "class_name");
        assert_eq!(method(&object, vec![]), Ok(string("Point")));
    }

    #[test]
    fn has_member_expects_a_string() {
        let object = Class::new("Point").instantiate();
        assert_eq!(
            object_has_member(&object, vec![Value::Number(1.0)]),
            Err(expected("string"))
        );
        assert_eq!(
            object_has_member(&object, vec![string("to_string")]),
            Ok(bool(true))
        );
    }

    #[test]
    fn unknown_member() {
        assert!(lookup("area").is_none());
        assert!(!is_builtin("area"));
    }
}
