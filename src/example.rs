use crate::builtins::expected;
use crate::errors::RuntimeError;
use crate::object::{Class, Object};
use crate::value::{Value, number, string};
use std::sync::Arc;

const MAX_STRING_LEN: usize = 1 << 29;

/// `Example` class with the two `a` handlers the driver exercises.
pub fn example_class() -> Result<Arc<Class>, RuntimeError> {
    let class = Class::new("Example");
    class.define_method("a$number$number", a_number_number)?;
    class.define_method("a$string$number", a_string_number)?;
    Ok(class)
}

fn a_number_number(_receiver: &Object, args: Vec<Value>) -> Result<Value, RuntimeError> {
    match (args.first(), args.get(1)) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => Ok(number(x + y)),
        _ => Err(expected("number, number")),
    }
}

fn a_string_number(_receiver: &Object, args: Vec<Value>) -> Result<Value, RuntimeError> {
    match (args.first(), args.get(1)) {
        (Some(Value::String(s)), Some(n)) => {
            let count = n
                .cast_usize()
                .filter(|count| *count <= u32::MAX as usize)
                .ok_or_else(|| {
                    RuntimeError::IllegalArgumentException(format!(
                        "Repeat count must be an integer in 0..={}, got {}",
                        u32::MAX,
                        n
                    ))
                })?;
            match s.len().checked_mul(count) {
                Some(len) if len <= MAX_STRING_LEN => Ok(string(s.repeat(count))),
                _ => Err(RuntimeError::IllegalArgumentException(format!(
                    "Invalid string length: {} repeated {} times",
                    s.len(),
                    count
                ))),
            }
        }
        _ => Err(expected("string, number")),
    }
}
