use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::ModelError;

/// JMS message types exercised by the suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MessageKind {
    Message,
    Bytes,
    Map,
    Stream,
    Text,
    /// Requires Java class descriptors only the producing side understands,
    /// so it is listed but never scheduled.
    Object,
}

impl MessageKind {
    pub const ALL: [MessageKind; 6] = [
        MessageKind::Message,
        MessageKind::Bytes,
        MessageKind::Map,
        MessageKind::Stream,
        MessageKind::Text,
        MessageKind::Object,
    ];

    /// Name passed to shims on the command line.
    pub fn wire_name(&self) -> &'static str {
        match self {
            MessageKind::Message => "JMS_MESSAGE_TYPE",
            MessageKind::Bytes => "JMS_BYTESMESSAGE_TYPE",
            MessageKind::Map => "JMS_MAPMESSAGE_TYPE",
            MessageKind::Stream => "JMS_STREAMMESSAGE_TYPE",
            MessageKind::Text => "JMS_TEXTMESSAGE_TYPE",
            MessageKind::Object => "JMS_OBJECTMESSAGE_TYPE",
        }
    }

    /// Wire name without the `JMS_` prefix and `_TYPE` suffix.
    pub fn short_name(&self) -> &'static str {
        let wire = self.wire_name();
        &wire["JMS_".len()..wire.len() - "_TYPE".len()]
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, MessageKind::Object)
    }

    pub fn active() -> impl Iterator<Item = MessageKind> {
        Self::ALL.into_iter().filter(MessageKind::is_active)
    }
}

impl Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for MessageKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageKind::ALL
            .into_iter()
            .find(|kind| kind.wire_name() == s)
            .ok_or_else(|| ModelError::UnknownMessageKind(s.to_string()))
    }
}
