//! Plain-text suite report in the familiar unittest layout.

use crate::driver::{CaseResult, SuiteCounts, SuiteReport};
use crate::outcome::TestOutcome;

const HEAVY_RULE: &str =
    "======================================================================";
const LIGHT_RULE: &str =
    "----------------------------------------------------------------------";

/// `<id> ... ok`, `... FAIL`, `... ERROR` or `... skipped '<reason>'`.
pub fn status_line(result: &CaseResult) -> String {
    let status = match &result.outcome {
        TestOutcome::Pass => "ok".to_string(),
        TestOutcome::Skipped(reason) => format!("skipped '{reason}'"),
        TestOutcome::Fail(failure) if failure.is_error() => "ERROR".to_string(),
        TestOutcome::Fail(_) => "FAIL".to_string(),
    };
    format!("{} ... {status}", result.id)
}

/// One block per failed case, in execution order.
pub fn failure_details(report: &SuiteReport) -> String {
    let mut out = String::new();
    for result in &report.results {
        let TestOutcome::Fail(failure) = &result.outcome else {
            continue;
        };
        let label = if failure.is_error() { "ERROR" } else { "FAIL" };
        out.push_str(&format!(
            "{HEAVY_RULE}\n{label}: {}\n{LIGHT_RULE}\n{failure}\n\n",
            result.id
        ));
    }
    out
}

/// `Ran N tests in X.XXXs` and the verdict line.
pub fn summary(report: &SuiteReport) -> String {
    let counts = report.counts();
    let plural = if counts.ran == 1 { "" } else { "s" };
    format!(
        "{LIGHT_RULE}\nRan {} test{plural} in {:.3}s\n\n{}\n",
        counts.ran,
        report.elapsed.as_secs_f64(),
        verdict(&counts)
    )
}

fn verdict(counts: &SuiteCounts) -> String {
    if counts.failures == 0 && counts.errors == 0 {
        if counts.skipped == 0 {
            "OK".to_string()
        } else {
            format!("OK (skipped={})", counts.skipped)
        }
    } else {
        format!(
            "FAILED (failures={}, errors={}, skipped={})",
            counts.failures, counts.errors, counts.skipped
        )
    }
}

/// Details followed by the summary.
pub fn render(report: &SuiteReport) -> String {
    let mut out = failure_details(report);
    out.push_str(&summary(report));
    out
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::time::Duration;

    use jmsit_model::MessageKind;

    use super::*;
    use crate::broker::BrokerIdentity;
    use crate::case::CaseId;
    use crate::error::LaunchError;
    use crate::outcome::{
        CompletedUnit, Failure, FieldMismatch, ReceivedField, TimedOutUnit,
    };
    use crate::shim::{Role, ShimOutput};

    fn id(sender: &str) -> CaseId {
        CaseId::new(MessageKind::Text, "", "", sender, "B")
    }

    fn report(outcomes: Vec<TestOutcome>) -> SuiteReport {
        SuiteReport {
            broker: BrokerIdentity::Unknown,
            results: outcomes
                .into_iter()
                .map(|outcome| CaseResult {
                    id: id("A"),
                    outcome,
                })
                .collect(),
            elapsed: Duration::from_millis(1500),
        }
    }

    #[test]
    fn status_lines_use_unittest_tokens() {
        let skipped = CaseResult {
            id: id("A"),
            outcome: TestOutcome::Skipped("QPID-1234".into()),
        };
        assert_eq!(
            status_line(&skipped),
            "test_TEXTMESSAGE_A->B ... skipped 'QPID-1234'"
        );

        let timed_out = CaseResult {
            id: id("A"),
            outcome: TestOutcome::Fail(Failure::Timeout {
                deadline: Duration::from_secs(10),
                units: vec![TimedOutUnit {
                    shim: "B".into(),
                    role: Role::Receiver,
                    partial: ShimOutput::default(),
                }],
                completed: Vec::new(),
            }),
        };
        assert_eq!(status_line(&timed_out), "test_TEXTMESSAGE_A->B ... ERROR");
    }

    #[test]
    fn summary_counts_failures_errors_and_skips() {
        let report = report(vec![
            TestOutcome::Pass,
            TestOutcome::Skipped("reason".into()),
            TestOutcome::Fail(Failure::Sender {
                shim: "A".into(),
                diagnostic: "boom".into(),
            }),
        ]);

        let text = summary(&report);
        assert!(text.contains("Ran 3 tests in 1.500s"), "{text}");
        assert!(
            text.contains("FAILED (failures=1, errors=0, skipped=1)"),
            "{text}"
        );
    }

    #[test]
    fn all_passing_suite_is_ok() {
        let text = summary(&report(vec![TestOutcome::Pass]));
        assert!(text.contains("Ran 1 test in"), "{text}");
        assert!(text.ends_with("\nOK\n"), "{text}");
    }

    #[test]
    fn details_show_sent_and_received() {
        let report = report(vec![TestOutcome::Fail(Failure::Comparison {
            mismatches: vec![FieldMismatch {
                field: ReceivedField::Body,
                sent: r#"{"text":["a"]}"#.into(),
                received: r#"{"text":["b"]}"#.into(),
            }],
        })]);

        let details = failure_details(&report);
        assert!(details.contains("FAIL: test_TEXTMESSAGE_A->B"), "{details}");
        assert!(details.contains("JMS message body error:"), "{details}");
        assert!(details.contains(r#"sent:{"text":["a"]}"#), "{details}");
        assert!(details.contains(r#"received:{"text":["b"]}"#), "{details}");
    }

    #[test]
    fn launch_errors_name_the_os_cause() {
        let report = report(vec![TestOutcome::Fail(Failure::Launch(
            LaunchError::Spawn {
                shim: "A".into(),
                role: Role::Sender,
                program: "/opt/shim".into(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            },
        ))]);

        let details = failure_details(&report);
        assert!(details.contains("ERROR: test_TEXTMESSAGE_A->B"), "{details}");
        assert!(
            details.contains("failed to spawn sender for shim 'A' (/opt/shim): permission denied"),
            "{details}"
        );
    }

    #[test]
    fn timeout_details_keep_the_other_units_complaint() {
        let report = report(vec![TestOutcome::Fail(Failure::Timeout {
            deadline: Duration::from_secs(1),
            units: vec![TimedOutUnit {
                shim: "B".into(),
                role: Role::Receiver,
                partial: ShimOutput::default(),
            }],
            completed: vec![CompletedUnit {
                shim: "A".into(),
                role: Role::Sender,
                output: ShimOutput {
                    exit_code: Some(1),
                    success: false,
                    stdout: String::new(),
                    stderr: "amqp:connection refused\n".into(),
                },
            }],
        })]);

        let details = failure_details(&report);
        assert!(details.contains("receiver shim 'B'"), "{details}");
        assert!(
            details.contains("sender shim 'A' finished first (exit status 1):\namqp:connection refused"),
            "{details}"
        );
    }
}
