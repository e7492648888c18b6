//! Launch seam between the runner and client shims.
//!
//! A shim is an external program that encodes or decodes JMS messages with
//! one client library. The runner only needs to start it in a role, hand it
//! a payload, and collect its terminal output within a deadline.

mod subprocess;

pub use subprocess::{CommandSpec, DECODE_HINTS_ENV, SubprocessShim};

use std::fmt::{self, Display};
use std::time::Duration;

use async_trait::async_trait;
use jmsit_model::MessageKind;

use crate::error::LaunchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Sender,
    Receiver,
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Sender => f.write_str("sender"),
            Role::Receiver => f.write_str("receiver"),
        }
    }
}

/// Everything a shim needs to know to take part in one case.
#[derive(Debug, Clone, Copy)]
pub struct LaunchRequest<'a> {
    pub broker: &'a str,
    pub queue: &'a str,
    pub kind: MessageKind,
    /// JSON document: `[body, headers, properties]` for senders and
    /// `[counts, hints]` for receivers.
    pub payload: &'a str,
}

/// Output captured from a shim, complete or partial.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShimOutput {
    /// `None` when the unit was killed or its status could not be read.
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ShimOutput {
    /// Trimmed stderr followed by trimmed stdout, blank when both are.
    pub fn diagnostic(&self) -> String {
        [self.stderr.trim(), self.stdout.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// `exit status N`, or `terminated by signal` when there is no code.
    pub fn exit_detail(&self) -> String {
        match self.exit_code {
            Some(code) => format!("exit status {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShimExit {
    Completed(ShimOutput),
    /// The unit was forcibly terminated; `partial` holds what it wrote first.
    TimedOut { partial: ShimOutput },
}

/// A launched sender or receiver.
#[async_trait]
pub trait RunningShim: Send {
    /// Wait for termination. On expiry of `deadline` the unit is killed and
    /// [`ShimExit::TimedOut`] is returned.
    async fn join(self: Box<Self>, deadline: Duration) -> ShimExit;
}

/// Immutable launch template shared by every case that names this shim.
pub trait ShimHandle: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn launch(
        &self,
        role: Role,
        request: &LaunchRequest<'_>,
    ) -> Result<Box<dyn RunningShim>, LaunchError>;
}
