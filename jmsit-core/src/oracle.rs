//! Exact structural comparison of sent and received messages.
//!
//! Both sides are reduced to `serde_json::Value` and compared with `==`.
//! Literals travel as strings, so a NaN is compared by its bit pattern and a
//! receiver that hands back a number where a string was sent is a mismatch.

use serde_json::Value;

use crate::case::TestCase;
use crate::outcome::{FieldMismatch, ReceivedField};

/// The four fields as the sender intended them.
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub kind: String,
    pub body: Value,
    pub headers: Value,
    pub properties: Value,
}

impl SentMessage {
    pub fn from_case(case: &TestCase) -> serde_json::Result<Self> {
        Ok(Self {
            kind: case.kind().wire_name().to_string(),
            body: serde_json::to_value(case.body())?,
            headers: serde_json::to_value(&case.headers().fields)?,
            properties: serde_json::to_value(&case.properties().fields)?,
        })
    }
}

/// The four fields a receiver reported.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedMessage {
    pub kind: String,
    pub body: Value,
    pub headers: Value,
    pub properties: Value,
}

impl ReceivedMessage {
    /// Parse receiver stdout: message kind, then body, headers and
    /// properties as one JSON document per line.
    pub fn parse(stdout: &str) -> Result<Self, String> {
        let lines: Vec<&str> = stdout.lines().collect();
        let [kind, body, headers, properties] = lines.as_slice() else {
            return Err(format!(
                "expected 4 output lines (type, body, headers, properties), got {}: {:?}",
                lines.len(),
                stdout
            ));
        };

        let json = |field: ReceivedField, raw: &str| {
            serde_json::from_str::<Value>(raw)
                .map_err(|err| format!("malformed {field}: {err}: {raw:?}"))
        };

        Ok(Self {
            kind: kind.to_string(),
            body: json(ReceivedField::Body, *body)?,
            headers: json(ReceivedField::Headers, *headers)?,
            properties: json(ReceivedField::Properties, *properties)?,
        })
    }
}

/// Every field that differs. Empty means the case passed.
pub fn compare(
    sent: &SentMessage,
    received: &ReceivedMessage,
) -> Vec<FieldMismatch> {
    let mut mismatches = Vec::new();

    if sent.kind != received.kind {
        mismatches.push(FieldMismatch {
            field: ReceivedField::MessageKind,
            sent: sent.kind.clone(),
            received: received.kind.clone(),
        });
    }

    for (field, sent, received) in [
        (ReceivedField::Body, &sent.body, &received.body),
        (ReceivedField::Headers, &sent.headers, &received.headers),
        (ReceivedField::Properties, &sent.properties, &received.properties),
    ] {
        if sent != received {
            mismatches.push(FieldMismatch {
                field,
                sent: sent.to_string(),
                received: received.to_string(),
            });
        }
    }

    mismatches
}
