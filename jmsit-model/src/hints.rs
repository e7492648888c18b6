//! Decode hints handed to receiver shims.
//!
//! Some header encodings are ambiguous on the wire: a binary correlation id
//! and a topic reply-to address cannot be told apart from their string and
//! queue counterparts without knowing what the sender meant. Receivers get
//! an explicit set of named hints instead of inferring from header presence.

use std::collections::BTreeSet;
use std::fmt::{self, Display};

use crate::headers::{HeaderName, MessageHeaders};
use crate::value_type::ValueType;

/// Version of the hint vocabulary below. Bump when adding a hint.
pub const DECODE_HINTS_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DecodeHint {
    CorrelationIdAsBytes,
    ReplyToAsTopic,
}

impl DecodeHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecodeHint::CorrelationIdAsBytes => "JMS_CORRELATIONID_AS_BYTES",
            DecodeHint::ReplyToAsTopic => "JMS_REPLYTO_AS_TOPIC",
        }
    }
}

impl Display for DecodeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hint set for one case; serializes as `{hint: true, ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeHints(BTreeSet<DecodeHint>);

impl DecodeHints {
    pub fn for_headers(headers: &MessageHeaders) -> Self {
        let mut hints = BTreeSet::new();
        if headers
            .get(&HeaderName::CorrelationId)
            .is_some_and(|value| value.value_type == ValueType::Bytes)
        {
            hints.insert(DecodeHint::CorrelationIdAsBytes);
        }
        if headers
            .get(&HeaderName::ReplyTo)
            .is_some_and(|value| value.value_type == ValueType::Topic)
        {
            hints.insert(DecodeHint::ReplyToAsTopic);
        }
        Self(hints)
    }

    pub fn contains(&self, hint: DecodeHint) -> bool {
        self.0.contains(&hint)
    }

    pub fn iter(&self) -> impl Iterator<Item = DecodeHint> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for DecodeHints {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for hint in &self.0 {
            map.serialize_entry(hint.as_str(), &true)?;
        }
        map.end()
    }
}
