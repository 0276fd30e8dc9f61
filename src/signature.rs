use crate::errors::RuntimeError;
use crate::value::Value;
use regex::Regex;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

pub const SEPARATOR: char = '$';

static MEMBER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{XID_Start}_]\p{XID_Continue}*$").unwrap());

/// Unicode identifiers: an `XID_Start` character or `_`, then `XID_Continue`
/// characters. The separator is never part of a member name.
pub fn is_member_name(name: &str) -> bool {
    MEMBER_NAME.is_match(name)
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    Undefined,
    Boolean,
    Number,
    String,
    Date,
    List,
    Object,
}

impl TypeTag {
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Undefined => "undefined",
            TypeTag::Boolean => "boolean",
            TypeTag::Number => "number",
            TypeTag::String => "string",
            TypeTag::Date => "date",
            TypeTag::List => "list",
            TypeTag::Object => "object",
        }
    }
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeTag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "undefined" => Ok(TypeTag::Undefined),
            "boolean" => Ok(TypeTag::Boolean),
            "number" => Ok(TypeTag::Number),
            "string" => Ok(TypeTag::String),
            "date" => Ok(TypeTag::Date),
            "list" => Ok(TypeTag::List),
            "object" => Ok(TypeTag::Object),
            _ => Err(()),
        }
    }
}

/// Dispatch key: a method prefix plus the ordered type tags of the arguments.
///
/// Renders as `prefix$tag1$tag2...`, which is also the form handlers are
/// registered under. Equality and hashing work on the structured parts, so a
/// prefix can never be confused with a tag.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Signature {
    pub(crate) prefix: String,
    pub(crate) tags: Vec<TypeTag>,
}

impl Signature {
    pub fn new(prefix: &str, tags: Vec<TypeTag>) -> Self {
        Self {
            prefix: prefix.to_string(),
            tags,
        }
    }

    pub fn parse(name: &str) -> Result<Self, RuntimeError> {
        let mut parts = name.split(SEPARATOR);
        let prefix = parts.next().unwrap_or_default();
        if !is_member_name(prefix) {
            return Err(RuntimeError::InvalidSignature(
                name.to_string(),
                "prefix is not a valid member name",
            ));
        }
        let tags = parts
            .map(|part| {
                part.parse::<TypeTag>().map_err(|_| {
                    RuntimeError::InvalidSignature(name.to_string(), "unknown type tag")
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Signature::new(prefix, tags))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn tags(&self) -> &[TypeTag] {
        &self.tags
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix)?;
        for tag in &self.tags {
            write!(f, "{}{}", SEPARATOR, tag)?;
        }
        Ok(())
    }
}

pub fn type_tag(value: &Value) -> TypeTag {
    value.type_tag()
}

pub fn build_signature(prefix: &str, args: &[Value]) -> Signature {
    Signature::new(prefix, args.iter().map(type_tag).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{number, string};

    #[test]
    fn same_tags_same_signature() {
        let a = build_signature("a", &[number(1), number(2)]);
        let b = build_signature("a", &[number(3), number(4)]);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "a$number$number");
    }

    #[test]
    fn argument_order_matters() {
        let a = build_signature("a", &[string("x"), number(5)]);
        let b = build_signature("a", &[number(5), string("x")]);
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "a$string$number");
    }

    #[test]
    fn no_arguments_is_prefix_alone() {
        let sig = build_signature("reset", &[]);
        assert_eq!(sig.to_string(), "reset");
        assert!(sig.tags().is_empty());
    }

    #[test]
    fn parse_conventional_name() {
        let sig = Signature::parse("a$string$number").unwrap();
        assert_eq!(sig, Signature::new("a", vec![TypeTag::String, TypeTag::Number]));
    }

    #[test]
    fn parse_rejects_unknown_tag() {
        assert_eq!(
            Signature::parse("a$string$widget"),
            Err(RuntimeError::InvalidSignature(
                "a$string$widget".to_string(),
                "unknown type tag"
            ))
        );
    }

    #[test]
    fn parse_rejects_bad_prefix() {
        assert!(Signature::parse("$number").is_err());
        assert!(Signature::parse("1a$number").is_err());
    }

    #[test]
    fn member_names() {
        assert!(is_member_name("a"));
        assert!(is_member_name("_area2"));
        assert!(is_member_name("größe"));
        assert!(!is_member_name("a$number"));
        assert!(!is_member_name(""));
    }
}
