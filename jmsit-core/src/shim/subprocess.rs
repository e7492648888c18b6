use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use jmsit_model::DECODE_HINTS_VERSION;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::{LaunchRequest, Role, RunningShim, ShimExit, ShimHandle, ShimOutput};
use crate::error::LaunchError;

/// Environment variable carrying the decode hint vocabulary version.
pub const DECODE_HINTS_ENV: &str = "JMSIT_DECODE_HINTS_VERSION";

/// How long to keep reading pipes after the process itself is gone.
/// Grandchildren can hold a pipe open well past the shim's own exit.
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Program plus leading arguments, e.g. `java -cp <classpath> <class>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// First element is the program; `None` for an empty argv.
    pub fn from_argv(argv: Vec<String>) -> Option<Self> {
        let mut argv = argv.into_iter();
        let program = argv.next()?;
        Some(Self {
            program,
            args: argv.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub(crate) fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

/// Shim implemented as a pair of executables.
///
/// Both are invoked as `<program> <args...> <broker> <queue> <kind> <json>`.
#[derive(Debug, Clone)]
pub struct SubprocessShim {
    name: String,
    sender: CommandSpec,
    receiver: CommandSpec,
}

impl SubprocessShim {
    pub fn new(
        name: impl Into<String>,
        sender: CommandSpec,
        receiver: CommandSpec,
    ) -> Self {
        Self {
            name: name.into(),
            sender,
            receiver,
        }
    }

    pub fn sender(&self) -> &CommandSpec {
        &self.sender
    }

    pub fn receiver(&self) -> &CommandSpec {
        &self.receiver
    }
}

impl ShimHandle for SubprocessShim {
    fn name(&self) -> &str {
        &self.name
    }

    fn launch(
        &self,
        role: Role,
        request: &LaunchRequest<'_>,
    ) -> Result<Box<dyn RunningShim>, LaunchError> {
        let spec = match role {
            Role::Sender => &self.sender,
            Role::Receiver => &self.receiver,
        };

        let mut cmd = spec.command();
        cmd.arg(request.broker)
            .arg(request.queue)
            .arg(request.kind.wire_name())
            .arg(request.payload)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if role == Role::Receiver {
            cmd.env(DECODE_HINTS_ENV, DECODE_HINTS_VERSION.to_string());
        }

        debug!(shim = %self.name, %role, program = spec.program(), "spawning shim");
        let mut child = cmd.spawn().map_err(|source| LaunchError::Spawn {
            shim: self.name.clone(),
            role,
            program: spec.program().to_string(),
            source,
        })?;

        let stdout = OutputBuffer::default();
        let stderr = OutputBuffer::default();
        let readers = [
            child.stdout.take().map(|pipe| stdout.collect(pipe)),
            child.stderr.take().map(|pipe| stderr.collect(pipe)),
        ]
        .into_iter()
        .flatten()
        .collect();

        Ok(Box::new(ChildShim {
            label: format!("{} {}", self.name, role),
            child,
            stdout,
            stderr,
            readers,
        }))
    }
}

/// Pipe contents accumulated chunk by chunk so a kill never loses what was
/// already written.
#[derive(Debug, Clone, Default)]
struct OutputBuffer(Arc<Mutex<Vec<u8>>>);

impl OutputBuffer {
    fn collect<R>(&self, mut pipe: R) -> JoinHandle<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let sink = self.clone();
        tokio::spawn(async move {
            let mut chunk = [0u8; 4096];
            loop {
                match pipe.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        sink.0
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .extend_from_slice(&chunk[..n]);
                    }
                }
            }
        })
    }

    fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

struct ChildShim {
    label: String,
    child: Child,
    stdout: OutputBuffer,
    stderr: OutputBuffer,
    readers: Vec<JoinHandle<()>>,
}

impl ChildShim {
    async fn drain(&mut self) {
        for mut reader in self.readers.drain(..) {
            if timeout(OUTPUT_DRAIN_GRACE, &mut reader).await.is_err() {
                debug!(shim = %self.label, "pipe still open after exit; abandoning reader");
                reader.abort();
            }
        }
    }

    fn output(&self, status: Option<ExitStatus>) -> ShimOutput {
        ShimOutput {
            exit_code: status.and_then(|status| status.code()),
            success: status.is_some_and(|status| status.success()),
            stdout: self.stdout.contents(),
            stderr: self.stderr.contents(),
        }
    }
}

#[async_trait]
impl RunningShim for ChildShim {
    async fn join(mut self: Box<Self>, deadline: Duration) -> ShimExit {
        match timeout(deadline, self.child.wait()).await {
            Ok(Ok(status)) => {
                self.drain().await;
                ShimExit::Completed(self.output(Some(status)))
            }
            Ok(Err(err)) => {
                warn!(shim = %self.label, error = %err, "failed to read shim exit status");
                self.drain().await;
                let mut output = self.output(None);
                output.stderr.push_str(&format!("\nwait failed: {err}"));
                ShimExit::Completed(output)
            }
            Err(_) => {
                warn!(shim = %self.label, ?deadline, "shim timed out; killing");
                if let Err(err) = self.child.kill().await {
                    warn!(shim = %self.label, error = %err, "failed to kill shim");
                }
                self.drain().await;
                ShimExit::TimedOut {
                    partial: self.output(None),
                }
            }
        }
    }
}
