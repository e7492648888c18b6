//! In-process shims talking through a fake broker.
//!
//! A receiver registers a one-shot slot under its queue at launch time; a
//! sender delivers its payload into that slot. A sender launched before its
//! receiver finds nobody listening and fails, so launch order is observable.
#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use jmsit_core::{
    LaunchError, LaunchRequest, Role, RunningShim, ShimExit, ShimHandle,
    ShimOutput,
};
use serde_json::{Value, json};
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Echo,
    CorruptBody,
    SenderComplains,
    ReceiverGarbage,
    ReceiverHangs,
    Unlaunchable,
}

#[derive(Debug, Default)]
pub struct FakeBroker {
    queues: Mutex<HashMap<String, oneshot::Sender<String>>>,
    pub launches: Mutex<Vec<(String, Role)>>,
    pub receiver_payloads: Mutex<Vec<Value>>,
}

impl FakeBroker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn launches(&self) -> Vec<(String, Role)> {
        self.launches.lock().unwrap().clone()
    }

    pub fn receiver_payloads(&self) -> Vec<Value> {
        self.receiver_payloads.lock().unwrap().clone()
    }
}

#[derive(Debug)]
pub struct FakeShim {
    name: String,
    behavior: Behavior,
    broker: Arc<FakeBroker>,
}

pub fn fake_shim(
    name: &str,
    behavior: Behavior,
    broker: &Arc<FakeBroker>,
) -> Arc<dyn ShimHandle> {
    Arc::new(FakeShim {
        name: name.to_string(),
        behavior,
        broker: Arc::clone(broker),
    })
}

fn ok_output(stdout: String) -> ShimOutput {
    ShimOutput {
        exit_code: Some(0),
        success: true,
        stdout,
        stderr: String::new(),
    }
}

fn failed_output(stderr: String) -> ShimOutput {
    ShimOutput {
        exit_code: Some(1),
        success: false,
        stdout: String::new(),
        stderr,
    }
}

impl ShimHandle for FakeShim {
    fn name(&self) -> &str {
        &self.name
    }

    fn launch(
        &self,
        role: Role,
        request: &LaunchRequest<'_>,
    ) -> Result<Box<dyn RunningShim>, LaunchError> {
        if self.behavior == Behavior::Unlaunchable {
            return Err(LaunchError::Spawn {
                shim: self.name.clone(),
                role,
                program: "missing-shim".into(),
                source: io::Error::new(io::ErrorKind::NotFound, "not found"),
            });
        }
        self.broker
            .launches
            .lock()
            .unwrap()
            .push((self.name.clone(), role));

        match role {
            Role::Receiver => {
                let payload = serde_json::from_str(request.payload).unwrap();
                self.broker.receiver_payloads.lock().unwrap().push(payload);

                let (slot, delivery) = oneshot::channel();
                self.broker
                    .queues
                    .lock()
                    .unwrap()
                    .insert(request.queue.to_string(), slot);
                Ok(Box::new(FakeReceiver {
                    kind: request.kind.wire_name().to_string(),
                    behavior: self.behavior,
                    delivery,
                }))
            }
            Role::Sender => {
                let listener =
                    self.broker.queues.lock().unwrap().remove(request.queue);
                let output = match (self.behavior, listener) {
                    (Behavior::SenderComplains, _) => {
                        failed_output("send failed: link detached\n".into())
                    }
                    (_, None) => failed_output(format!(
                        "no receiver attached to {}\n",
                        request.queue
                    )),
                    (_, Some(slot)) => {
                        let _ = slot.send(request.payload.to_string());
                        ok_output(String::new())
                    }
                };
                Ok(Box::new(Finished(output)))
            }
        }
    }
}

struct Finished(ShimOutput);

#[async_trait]
impl RunningShim for Finished {
    async fn join(self: Box<Self>, _deadline: Duration) -> ShimExit {
        ShimExit::Completed(self.0)
    }
}

struct FakeReceiver {
    kind: String,
    behavior: Behavior,
    delivery: oneshot::Receiver<String>,
}

#[async_trait]
impl RunningShim for FakeReceiver {
    async fn join(self: Box<Self>, deadline: Duration) -> ShimExit {
        let FakeReceiver {
            kind,
            behavior,
            delivery,
        } = *self;
        if behavior == Behavior::ReceiverHangs {
            tokio::time::sleep(deadline).await;
            return ShimExit::TimedOut {
                partial: ok_output(format!("{kind}\n")),
            };
        }

        let payload = match tokio::time::timeout(deadline, delivery).await {
            Ok(Ok(payload)) => payload,
            Ok(Err(_)) => {
                return ShimExit::Completed(failed_output(
                    "sender went away\n".into(),
                ));
            }
            Err(_) => {
                return ShimExit::TimedOut {
                    partial: ShimOutput::default(),
                };
            }
        };

        let [mut body, headers, properties]: [Value; 3] =
            serde_json::from_str(&payload).unwrap();
        let stdout = match behavior {
            Behavior::ReceiverGarbage => "not a result\n".to_string(),
            Behavior::CorruptBody => {
                body = json!({ "string": ["corrupted"] });
                format!("{kind}\n{body}\n{headers}\n{properties}\n")
            }
            _ => format!("{kind}\n{body}\n{headers}\n{properties}\n"),
        };
        ShimExit::Completed(ok_output(stdout))
    }
}
