use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::ModelError;

/// Type tag attached to every test literal.
///
/// The tag names are the Java-flavoured names the sender shims interpret;
/// header-only tags (`queue`, `topic`) and the `java.lang.*` class names of
/// the object domain share the same namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueType {
    None,
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    String,
    Bytes,
    Text,
    Queue,
    Topic,
    JavaBoolean,
    JavaByte,
    JavaCharacter,
    JavaDouble,
    JavaFloat,
    JavaInteger,
    JavaLong,
    JavaShort,
    JavaString,
}

impl ValueType {
    pub const ALL: [ValueType; 23] = [
        ValueType::None,
        ValueType::Boolean,
        ValueType::Byte,
        ValueType::Short,
        ValueType::Int,
        ValueType::Long,
        ValueType::Float,
        ValueType::Double,
        ValueType::Char,
        ValueType::String,
        ValueType::Bytes,
        ValueType::Text,
        ValueType::Queue,
        ValueType::Topic,
        ValueType::JavaBoolean,
        ValueType::JavaByte,
        ValueType::JavaCharacter,
        ValueType::JavaDouble,
        ValueType::JavaFloat,
        ValueType::JavaInteger,
        ValueType::JavaLong,
        ValueType::JavaShort,
        ValueType::JavaString,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::None => "none",
            ValueType::Boolean => "boolean",
            ValueType::Byte => "byte",
            ValueType::Short => "short",
            ValueType::Int => "int",
            ValueType::Long => "long",
            ValueType::Float => "float",
            ValueType::Double => "double",
            ValueType::Char => "char",
            ValueType::String => "string",
            ValueType::Bytes => "bytes",
            ValueType::Text => "text",
            ValueType::Queue => "queue",
            ValueType::Topic => "topic",
            ValueType::JavaBoolean => "java.lang.Boolean",
            ValueType::JavaByte => "java.lang.Byte",
            ValueType::JavaCharacter => "java.lang.Character",
            ValueType::JavaDouble => "java.lang.Double",
            ValueType::JavaFloat => "java.lang.Float",
            ValueType::JavaInteger => "java.lang.Integer",
            ValueType::JavaLong => "java.lang.Long",
            ValueType::JavaShort => "java.lang.Short",
            ValueType::JavaString => "java.lang.String",
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| ModelError::UnknownValueType(s.to_string()))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ValueType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ValueType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single test literal as handed to shims.
///
/// Numeric literals are hex text, floating point values are IEEE-754 bit
/// patterns, and bytes use backslash escapes, so no literal depends on a
/// decimal-to-binary conversion. `None` encodes as JSON `null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Literal(Option<String>);

impl Literal {
    pub fn null() -> Self {
        Literal(None)
    }

    pub fn new(value: impl Into<String>) -> Self {
        Literal(Some(value.into()))
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::new(value)
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::new(value)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => write!(f, "{value:?}"),
            None => f.write_str("null"),
        }
    }
}
