//! Execution of a single test case across two shim processes.

use std::time::Duration;

use jmsit_model::{DecodeHints, MessageKind};
use tracing::{Instrument, debug, error, info_span, warn};

use crate::case::TestCase;
use crate::error::LaunchError;
use crate::oracle::{ReceivedMessage, SentMessage, compare};
use crate::outcome::{CompletedUnit, Failure, TestOutcome, TimedOutUnit};
use crate::shim::{LaunchRequest, Role, ShimExit, ShimOutput};

pub const DEFAULT_SHIM_TIMEOUT: Duration = Duration::from_secs(10);

/// Broker queue used by every case of one (kind, sender, receiver) triple.
///
/// Cases run one at a time, so reusing the address across header variants of
/// the same triple never puts two live receivers on it.
pub fn queue_name(kind: MessageKind, sender: &str, receiver: &str) -> String {
    format!(
        "jms.queue.qpid-interop.jms_message_type_tests.{}.{sender}.{receiver}",
        kind.wire_name()
    )
}

#[derive(Debug, Clone)]
pub struct CrossProcessRunner {
    broker: String,
    timeout: Duration,
}

impl CrossProcessRunner {
    pub fn new(broker: impl Into<String>, timeout: Duration) -> Self {
        Self {
            broker: broker.into(),
            timeout,
        }
    }

    pub fn broker(&self) -> &str {
        &self.broker
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn execute(&self, case: &TestCase) -> TestOutcome {
        let span = info_span!("case", id = %case.id());
        match self.run(case).instrument(span.clone()).await {
            Ok(()) => {
                debug!(parent: &span, "case passed");
                TestOutcome::Pass
            }
            Err(failure) => {
                if matches!(failure, Failure::Timeout { .. }) {
                    warn!(parent: &span, error = %failure, "case timed out");
                } else {
                    error!(parent: &span, error = %failure, "case failed");
                }
                TestOutcome::Fail(failure)
            }
        }
    }

    async fn run(&self, case: &TestCase) -> Result<(), Failure> {
        let sent = SentMessage::from_case(case).map_err(|source| {
            LaunchError::Payload {
                role: Role::Sender,
                source,
            }
        })?;
        let hints = DecodeHints::for_headers(&case.headers().fields);
        let receiver_payload =
            serde_json::to_string(&(case.body().counts(), &hints)).map_err(
                |source| LaunchError::Payload {
                    role: Role::Receiver,
                    source,
                },
            )?;
        let sender_payload = serde_json::to_string(&(
            &sent.body,
            &sent.headers,
            &sent.properties,
        ))
        .map_err(|source| LaunchError::Payload {
            role: Role::Sender,
            source,
        })?;

        let sender = case.sender();
        let receiver = case.receiver();
        let queue = queue_name(case.kind(), sender.name(), receiver.name());

        // No readiness handshake: the receiver is only known to have been
        // spawned when the sender starts.
        debug!(shim = receiver.name(), %queue, "launching receiver");
        let receiving = receiver.launch(
            Role::Receiver,
            &LaunchRequest {
                broker: &self.broker,
                queue: &queue,
                kind: case.kind(),
                payload: &receiver_payload,
            },
        )?;
        debug!(shim = sender.name(), %queue, "launching sender");
        // A launch error drops `receiving`, which kills the receiver.
        let sending = sender.launch(
            Role::Sender,
            &LaunchRequest {
                broker: &self.broker,
                queue: &queue,
                kind: case.kind(),
                payload: &sender_payload,
            },
        )?;

        let (receiver_exit, sender_exit) = tokio::join!(
            receiving.join(self.timeout),
            sending.join(self.timeout)
        );

        let (sender_output, receiver_output) = match (sender_exit, receiver_exit)
        {
            (ShimExit::Completed(sender), ShimExit::Completed(receiver)) => {
                (sender, receiver)
            }
            (sender_exit, receiver_exit) => {
                let mut units = Vec::new();
                let mut completed = Vec::new();
                for (shim, role, exit) in [
                    (receiver.name(), Role::Receiver, receiver_exit),
                    (sender.name(), Role::Sender, sender_exit),
                ] {
                    match exit {
                        ShimExit::TimedOut { partial } => {
                            units.push(TimedOutUnit {
                                shim: shim.to_string(),
                                role,
                                partial,
                            })
                        }
                        ShimExit::Completed(output) if complained(role, &output) => {
                            completed.push(CompletedUnit {
                                shim: shim.to_string(),
                                role,
                                output,
                            })
                        }
                        ShimExit::Completed(_) => {}
                    }
                }
                return Err(Failure::Timeout {
                    deadline: self.timeout,
                    units,
                    completed,
                });
            }
        };

        check_sender(sender.name(), &sender_output)?;
        let received = check_receiver(receiver.name(), &receiver_output)?;

        let mismatches = compare(&sent, &received);
        if mismatches.is_empty() {
            Ok(())
        } else {
            Err(Failure::Comparison { mismatches })
        }
    }
}

/// Whether a unit that finished before its partner timed out said anything
/// worth reporting. Regular receiver output on stdout does not count.
fn complained(role: Role, output: &ShimOutput) -> bool {
    let noisy = match role {
        Role::Sender => !output.diagnostic().is_empty(),
        Role::Receiver => !output.stderr.trim().is_empty(),
    };
    !output.success || noisy
}

/// A sender reports nothing on success.
fn check_sender(shim: &str, output: &ShimOutput) -> Result<(), Failure> {
    let diagnostic = output.diagnostic();
    if output.success && diagnostic.is_empty() {
        return Ok(());
    }

    let diagnostic = match (output.success, diagnostic.is_empty()) {
        (false, true) => output.exit_detail(),
        (false, false) => format!("{diagnostic}\n({})", output.exit_detail()),
        _ => diagnostic,
    };
    Err(Failure::Sender {
        shim: shim.to_string(),
        diagnostic,
    })
}

fn check_receiver(
    shim: &str,
    output: &ShimOutput,
) -> Result<ReceivedMessage, Failure> {
    let violation = |detail: String| Failure::ProtocolViolation {
        shim: shim.to_string(),
        detail,
    };

    if !output.success {
        return Err(violation(format!(
            "{}: {}",
            output.exit_detail(),
            output.diagnostic()
        )));
    }
    let stderr = output.stderr.trim();
    if !stderr.is_empty() {
        return Err(violation(stderr.to_string()));
    }
    ReceivedMessage::parse(&output.stdout).map_err(violation)
}
