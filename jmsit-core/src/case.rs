use std::fmt::{self, Display};
use std::sync::Arc;

use jmsit_model::{MessageHeaders, MessageKind, MessageProperties, TestValues};

use crate::shim::ShimHandle;

/// A labelled header or property configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant<M> {
    pub label: String,
    pub fields: M,
}

impl<M: Default> Variant<M> {
    /// The empty variant; contributes nothing to a case identifier.
    pub fn none() -> Self {
        Self {
            label: String::new(),
            fields: M::default(),
        }
    }
}

impl<M> Variant<M> {
    pub fn new(label: impl Into<String>, fields: M) -> Self {
        Self {
            label: label.into(),
            fields,
        }
    }
}

pub type HeaderVariant = Variant<MessageHeaders>;
pub type PropertyVariant = Variant<MessageProperties>;

/// Deterministic, human-readable case identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaseId(String);

impl CaseId {
    pub fn new(
        kind: MessageKind,
        header_label: &str,
        property_label: &str,
        sender: &str,
        receiver: &str,
    ) -> Self {
        CaseId(format!(
            "test_{}{header_label}{property_label}_{sender}->{receiver}",
            kind.short_name()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One executable cell of the matrix. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct TestCase {
    id: CaseId,
    kind: MessageKind,
    headers: HeaderVariant,
    properties: PropertyVariant,
    sender: Arc<dyn ShimHandle>,
    receiver: Arc<dyn ShimHandle>,
    body: Arc<TestValues>,
}

impl TestCase {
    pub fn new(
        kind: MessageKind,
        headers: HeaderVariant,
        properties: PropertyVariant,
        sender: Arc<dyn ShimHandle>,
        receiver: Arc<dyn ShimHandle>,
        body: Arc<TestValues>,
    ) -> Self {
        let id = CaseId::new(
            kind,
            &headers.label,
            &properties.label,
            sender.name(),
            receiver.name(),
        );
        Self {
            id,
            kind,
            headers,
            properties,
            sender,
            receiver,
            body,
        }
    }

    pub fn id(&self) -> &CaseId {
        &self.id
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn headers(&self) -> &HeaderVariant {
        &self.headers
    }

    pub fn properties(&self) -> &PropertyVariant {
        &self.properties
    }

    pub fn sender(&self) -> &Arc<dyn ShimHandle> {
        &self.sender
    }

    pub fn receiver(&self) -> &Arc<dyn ShimHandle> {
        &self.receiver
    }

    pub fn body(&self) -> &TestValues {
        &self.body
    }
}
