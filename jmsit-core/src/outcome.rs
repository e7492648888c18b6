use std::fmt::{self, Display};
use std::time::Duration;

use thiserror::Error;

use crate::error::LaunchError;
use crate::shim::{Role, ShimOutput};

/// The four fields a receiver reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceivedField {
    MessageKind,
    Body,
    Headers,
    Properties,
}

impl Display for ReceivedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReceivedField::MessageKind => f.write_str("JMS message type"),
            ReceivedField::Body => f.write_str("JMS message body"),
            ReceivedField::Headers => f.write_str("JMS message headers"),
            ReceivedField::Properties => f.write_str("JMS message properties"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMismatch {
    pub field: ReceivedField,
    pub sent: String,
    pub received: String,
}

impl Display for FieldMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error:\n\n    sent:{}\n\n    received:{}",
            self.field, self.sent, self.received
        )
    }
}

/// A unit that had to be killed, with whatever it wrote first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedOutUnit {
    pub shim: String,
    pub role: Role,
    pub partial: ShimOutput,
}

/// The other unit of a timed-out case, when it finished with a complaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedUnit {
    pub shim: String,
    pub role: Role,
    pub output: ShimOutput,
}

/// Why a case did not pass.
#[derive(Debug, Error)]
pub enum Failure {
    #[error("Send shim '{shim}':\n{diagnostic}")]
    Sender { shim: String, diagnostic: String },
    #[error("Receive shim '{shim}' returned no valid result: {detail}")]
    ProtocolViolation { shim: String, detail: String },
    #[error("{}", render_mismatches(.mismatches))]
    Comparison { mismatches: Vec<FieldMismatch> },
    #[error("{}", render_timeout(.deadline, .units, .completed))]
    Timeout {
        deadline: Duration,
        units: Vec<TimedOutUnit>,
        completed: Vec<CompletedUnit>,
    },
    #[error(transparent)]
    Launch(#[from] LaunchError),
}

impl Failure {
    /// Timeouts and launch problems point at the harness or the shim
    /// process, not at the protocol.
    pub fn is_error(&self) -> bool {
        matches!(self, Failure::Timeout { .. } | Failure::Launch(_))
    }
}

fn render_mismatches(mismatches: &[FieldMismatch]) -> String {
    mismatches
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_timeout(
    deadline: &Duration,
    units: &[TimedOutUnit],
    completed: &[CompletedUnit],
) -> String {
    let mut out = format!("Timed out after {deadline:?}, killed:");
    for unit in units {
        out.push_str(&format!("\n    {} shim '{}'", unit.role, unit.shim));
        let partial = unit.partial.diagnostic();
        if !partial.is_empty() {
            out.push_str(&format!(" (partial output: {partial})"));
        }
    }
    for unit in completed {
        out.push_str(&format!(
            "\n    {} shim '{}' finished first ({})",
            unit.role,
            unit.shim,
            unit.output.exit_detail()
        ));
        let diagnostic = unit.output.diagnostic();
        if !diagnostic.is_empty() {
            out.push_str(&format!(":\n{diagnostic}"));
        }
    }
    out
}

#[derive(Debug)]
pub enum TestOutcome {
    Pass,
    Fail(Failure),
    Skipped(String),
}

impl TestOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestOutcome::Pass)
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            TestOutcome::Fail(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<Failure> for TestOutcome {
    fn from(failure: Failure) -> Self {
        TestOutcome::Fail(failure)
    }
}
