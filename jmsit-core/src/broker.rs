//! Broker identity discovery.
//!
//! Identity is only used for reporting and skip rule lookup, so every probe
//! failure degrades to [`BrokerIdentity::Unknown`] instead of an error.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::timeout;
use tracing::warn;

use crate::shim::CommandSpec;

/// Connection properties advertised by the broker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BrokerProperties {
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BrokerIdentity {
    #[default]
    Unknown,
    Known(BrokerProperties),
}

impl BrokerIdentity {
    /// Product name as matched against skip rules.
    pub fn product(&self) -> &str {
        match self {
            BrokerIdentity::Unknown => "unknown",
            BrokerIdentity::Known(props) => props
                .product
                .as_deref()
                .unwrap_or("<product not found>"),
        }
    }

    /// `None` for an unknown broker.
    pub fn describe(&self) -> Option<String> {
        let BrokerIdentity::Known(props) = self else {
            return None;
        };
        Some(format!(
            "Test Broker: {} v.{} on {}",
            self.product(),
            props.version.as_deref().unwrap_or("<version not found>"),
            props.platform.as_deref().unwrap_or("<platform not found>"),
        ))
    }
}

#[async_trait]
pub trait BrokerProbe: Send + Sync {
    async fn probe(&self, broker: &str) -> BrokerIdentity;
}

/// Used when no probe command is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBrokerProbe;

#[async_trait]
impl BrokerProbe for NoBrokerProbe {
    async fn probe(&self, _broker: &str) -> BrokerIdentity {
        BrokerIdentity::Unknown
    }
}

/// Runs `<command> <broker>` and reads a JSON object with `product`,
/// `version` and `platform` from its stdout.
#[derive(Debug, Clone)]
pub struct CommandBrokerProbe {
    command: CommandSpec,
    timeout: Duration,
}

impl CommandBrokerProbe {
    pub fn new(command: CommandSpec, timeout: Duration) -> Self {
        Self { command, timeout }
    }

    async fn query(&self, broker: &str) -> Result<BrokerProperties, String> {
        let mut cmd = self.command.command();
        cmd.arg(broker)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| format!("no answer within {:?}", self.timeout))?
            .map_err(|err| {
                format!("failed to run {}: {err}", self.command.program())
            })?;

        if !output.status.success() {
            return Err(format!(
                "{} exited with {}: {}",
                self.command.program(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        serde_json::from_slice(&output.stdout)
            .map_err(|err| format!("unreadable broker properties: {err}"))
    }
}

#[async_trait]
impl BrokerProbe for CommandBrokerProbe {
    async fn probe(&self, broker: &str) -> BrokerIdentity {
        match self.query(broker).await {
            Ok(props) => BrokerIdentity::Known(props),
            Err(reason) => {
                warn!(%broker, %reason, "unable to get connection properties");
                BrokerIdentity::Unknown
            }
        }
    }
}
