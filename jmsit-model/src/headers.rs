use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::ModelError;
use crate::value_type::{Literal, ValueType};

/// JMS headers a client may set before send and the broker must preserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeaderName {
    CorrelationId,
    ReplyTo,
    Type,
}

impl HeaderName {
    pub const ALL: [HeaderName; 3] =
        [HeaderName::CorrelationId, HeaderName::ReplyTo, HeaderName::Type];

    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderName::CorrelationId => "JMS_CORRELATIONID_HEADER",
            HeaderName::ReplyTo => "JMS_REPLYTO_HEADER",
            HeaderName::Type => "JMS_TYPE_HEADER",
        }
    }

    /// Name without the `JMS_` prefix and `_HEADER` suffix.
    pub fn short_name(&self) -> &'static str {
        let name = self.as_str();
        &name["JMS_".len()..name.len() - "_HEADER".len()]
    }
}

impl Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for HeaderName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for HeaderName {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HeaderName::ALL
            .into_iter()
            .find(|header| header.as_str() == s)
            .ok_or_else(|| ModelError::UnknownHeader(s.to_string()))
    }
}

/// A literal with its declared type; serializes as `{type: literal}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedValue {
    pub value_type: ValueType,
    pub literal: Literal,
}

impl TypedValue {
    pub fn new(value_type: ValueType, literal: impl Into<Literal>) -> Self {
        Self {
            value_type,
            literal: literal.into(),
        }
    }
}

/// Ordered name -> typed value mapping used for headers and properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap<K> {
    fields: Vec<(K, TypedValue)>,
}

impl<K> Default for FieldMap<K> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<K: PartialEq> FieldMap<K> {
    pub fn single(name: K, value: TypedValue) -> Self {
        Self {
            fields: vec![(name, value)],
        }
    }

    pub fn insert(&mut self, name: K, value: TypedValue) {
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &K) -> Option<&TypedValue> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &TypedValue)> {
        self.fields.iter().map(|(name, value)| (name, value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub type MessageHeaders = FieldMap<HeaderName>;

/// Application properties are keyed by free-form names.
pub type MessageProperties = FieldMap<String>;

#[cfg(feature = "serde")]
mod serde_impls {
    use super::{FieldMap, TypedValue};
    use serde::ser::{Serialize, SerializeMap, Serializer};

    impl Serialize for TypedValue {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry(self.value_type.as_str(), &self.literal)?;
            map.end()
        }
    }

    impl<K: AsRef<str>> Serialize for FieldMap<K> {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.fields.len()))?;
            for (name, value) in &self.fields {
                map.serialize_entry(name.as_ref(), value)?;
            }
            map.end()
        }
    }
}
