use crate::object::Object;
use crate::signature::TypeTag;
use chrono::{DateTime, Utc};
use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Bool(bool),
    Number(f64),
    String(String),
    Date(DateTime<Utc>),
    List(Vec<Value>),
    Object(Object),
}

impl Value {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Undefined => TypeTag::Undefined,
            Value::Bool(_) => TypeTag::Boolean,
            Value::Number(_) => TypeTag::Number,
            Value::String(_) => TypeTag::String,
            Value::Date(_) => TypeTag::Date,
            Value::List(_) => TypeTag::List,
            Value::Object(_) => TypeTag::Object,
        }
    }

    pub fn cast_usize(&self) -> Option<usize> {
        match self {
            Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 && *n < usize::MAX as f64 => {
                Some(*n as usize)
            }
            _ => None,
        }
    }
}

pub fn number(v: impl Into<f64>) -> Value {
    Value::Number(v.into())
}

pub fn string(v: impl Into<String>) -> Value {
    Value::String(v.into())
}

pub fn bool(v: bool) -> Value {
    Value::Bool(v)
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Date(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::Object(v)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", d.to_rfc3339()),
            Value::List(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
            Value::Object(object) => write!(f, "{}", object.describe()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_print_without_fraction() {
        assert_eq!(number(3).to_string(), "3");
        assert_eq!(number(2.5).to_string(), "2.5");
    }

    #[test]
    fn list_display() {
        let list: Value = vec![number(1), string("x"), bool(true)].into();
        assert_eq!(list.to_string(), "[1, x, true]");
    }

    #[test]
    fn cast_usize_rejects_fractions_and_negatives() {
        assert_eq!(number(5).cast_usize(), Some(5));
        assert_eq!(number(2.5).cast_usize(), None);
        assert_eq!(number(-1).cast_usize(), None);
        assert_eq!(string("5").cast_usize(), None);
        assert_eq!(number(1e20).cast_usize(), None);
        assert_eq!(number(f64::INFINITY).cast_usize(), None);
    }
}
